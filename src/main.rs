//!
//! RDV scheduling service for the after-sales platform.
//! Reads configuration from TOML file (~/.config/rdv-service/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use sav_rdv::application::{
    start_slot_purge_task, AvailabilityService, BookingService, SlotService,
};
use sav_rdv::config::AppConfig;
use sav_rdv::domain::{JobRegistry, RepositoryProvider, TechnicianDirectory};
use sav_rdv::infrastructure::database::migrator::Migrator;
use sav_rdv::infrastructure::{OpenJobRegistry, StaticTechnicianDirectory};
use sav_rdv::notifications::{start_dispatcher, EventBus, LoggingNotificationSink};
use sav_rdv::shared::{Clock, ShutdownCoordinator, SystemClock};
use sav_rdv::{
    create_api_router, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("RDV_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting SAV RDV Scheduling Service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("📊 Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Repository provider over the shared connection pool
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // ── Collaborator ports ─────────────────────────────────────
    let directory = Arc::new(StaticTechnicianDirectory::new(
        app_cfg
            .technicians
            .iter()
            .map(|t| (t.id, t.name.clone())),
    ));
    if !app_cfg.technicians.is_empty() {
        info!(
            count = app_cfg.technicians.len(),
            "Technician directory seeded from config"
        );
    }
    let directory: Arc<dyn TechnicianDirectory> = directory;
    let jobs: Arc<dyn JobRegistry> = Arc::new(OpenJobRegistry);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // ── Event bus for transition notifications ─────────────────
    let event_bus = Arc::new(EventBus::with_capacity(app_cfg.notifications.bus_capacity));
    info!("🔔 Event bus initialized for transition notifications");

    // ── Services ───────────────────────────────────────────────
    let slot_service = Arc::new(SlotService::new(repos.clone(), jobs.clone(), clock.clone()));
    let availability_service = Arc::new(AvailabilityService::new(repos.clone()));
    let booking_service = Arc::new(BookingService::new(
        repos.clone(),
        jobs.clone(),
        event_bus.clone(),
        clock.clone(),
    ));

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();

    // Start listening for shutdown signals (SIGTERM, SIGINT)
    shutdown.start_signal_listener();

    // Notification dispatcher (best-effort delivery, never blocks the workflow)
    start_dispatcher(
        event_bus.clone(),
        Arc::new(LoggingNotificationSink),
        shutdown_signal.clone(),
    );

    // Stale-slot purge task
    if app_cfg.scheduling.purge_enabled {
        start_slot_purge_task(
            repos.clone(),
            clock.clone(),
            shutdown_signal.clone(),
            app_cfg.scheduling.purge_interval_secs,
            app_cfg.scheduling.purge_retention_days,
        );
    }

    // Create REST API router
    let api_router = create_api_router(
        slot_service,
        availability_service,
        booking_service,
        directory,
        db.clone(),
        prometheus_handle,
    );

    // Start REST API server with graceful shutdown
    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    info!("🚀 Server started. Press Ctrl+C to shutdown gracefully.");

    axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        })
        .await?;

    // Perform final cleanup
    info!("🧹 Performing final cleanup...");

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("✅ Database connection closed");
    }

    info!("👋 SAV RDV Scheduling Service shutdown complete");
    Ok(())
}
