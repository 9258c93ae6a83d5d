//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::access::Operation;
use crate::application::{AvailabilityService, BookingService, SlotService};
use crate::domain::TechnicianDirectory;
use crate::interfaces::http::common::{ApiResponse, EmptyData, PaginationParams};
use crate::interfaces::http::middleware::capability_middleware;
use crate::interfaces::http::modules::{availability, health, metrics, requests, slots};

/// Unified state for the whole scheduling API.
/// Axum extracts the specific handler state via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub slot_service: Arc<SlotService>,
    pub availability: Arc<AvailabilityService>,
    pub booking: Arc<BookingService>,
    pub directory: Arc<dyn TechnicianDirectory>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
    pub prometheus: PrometheusHandle,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ApiState> for slots::SlotAppState {
    fn from_ref(s: &ApiState) -> Self {
        slots::SlotAppState {
            slot_service: Arc::clone(&s.slot_service),
            directory: Arc::clone(&s.directory),
        }
    }
}

impl FromRef<ApiState> for availability::AvailabilityAppState {
    fn from_ref(s: &ApiState) -> Self {
        availability::AvailabilityAppState {
            availability: Arc::clone(&s.availability),
            directory: Arc::clone(&s.directory),
        }
    }
}

impl FromRef<ApiState> for requests::RequestAppState {
    fn from_ref(s: &ApiState) -> Self {
        requests::RequestAppState {
            booking: Arc::clone(&s.booking),
        }
    }
}

impl FromRef<ApiState> for health::HealthState {
    fn from_ref(s: &ApiState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<ApiState> for metrics::MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        metrics::MetricsState {
            handle: s.prometheus.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Availability
        availability::handlers::list_availability,
        availability::handlers::list_availability_paged,
        // Slots
        slots::handlers::create_slot,
        slots::handlers::generate_slots,
        slots::handlers::delete_slot,
        slots::handlers::reserve_slot,
        slots::handlers::release_slot,
        slots::handlers::list_technician_slots,
        // Requests
        requests::handlers::create_request,
        requests::handlers::get_request,
        requests::handlers::list_requests,
        requests::handlers::list_client_requests,
        requests::handlers::process_request,
        requests::handlers::cancel_request,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            PaginationParams,
            // Slots
            slots::SlotDto,
            slots::CreateSlotRequest,
            slots::GenerateSlotsRequest,
            slots::GeneratedSlotsResponse,
            slots::ReserveSlotRequest,
            // Availability
            availability::AvailabilityPageDto,
            // Requests
            requests::RequestDto,
            requests::CreateRequestBody,
            requests::ProcessRequestBody,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Availability", description = "Paginated availability over technician slots"),
        (name = "Slots", description = "Technician slot management: creation, recurrence generation, reservation"),
        (name = "Requests", description = "Client appointment requests (demandes de RDV) and their workflow"),
    ),
    info(
        title = "SAV RDV Scheduling API",
        version = "1.0.0",
        description = "REST API for technician slot scheduling and appointment booking",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    slot_service: Arc<SlotService>,
    availability_service: Arc<AvailabilityService>,
    booking_service: Arc<BookingService>,
    directory: Arc<dyn TechnicianDirectory>,
    db: DatabaseConnection,
    prometheus: PrometheusHandle,
) -> Router {
    let state = ApiState {
        slot_service,
        availability: availability_service,
        booking: booking_service,
        directory,
        db,
        started_at: Arc::new(Instant::now()),
        prometheus,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Every business route carries its operation; the capability table
    // in `application::access` decides per caller role.
    let api_v1 = Router::new()
        // --- Availability ---
        .route(
            "/availability",
            get(availability::list_availability).layer(middleware::from_fn_with_state(
                Operation::QueryAvailability,
                capability_middleware,
            )),
        )
        .route(
            "/availability/paged",
            get(availability::list_availability_paged).layer(middleware::from_fn_with_state(
                Operation::QueryAvailability,
                capability_middleware,
            )),
        )
        // --- Slots ---
        .route(
            "/slots",
            post(slots::create_slot).layer(middleware::from_fn_with_state(
                Operation::CreateSlot,
                capability_middleware,
            )),
        )
        .route(
            "/slots/generate",
            post(slots::generate_slots).layer(middleware::from_fn_with_state(
                Operation::GenerateSlots,
                capability_middleware,
            )),
        )
        .route(
            "/slots/{slot_id}",
            delete(slots::delete_slot).layer(middleware::from_fn_with_state(
                Operation::DeleteSlot,
                capability_middleware,
            )),
        )
        .route(
            "/slots/{slot_id}/reserve",
            post(slots::reserve_slot).layer(middleware::from_fn_with_state(
                Operation::ReserveSlot,
                capability_middleware,
            )),
        )
        .route(
            "/slots/{slot_id}/release",
            post(slots::release_slot).layer(middleware::from_fn_with_state(
                Operation::ReleaseSlot,
                capability_middleware,
            )),
        )
        .route(
            "/technicians/{technician_id}/slots",
            get(slots::list_technician_slots).layer(middleware::from_fn_with_state(
                Operation::ListTechnicianSlots,
                capability_middleware,
            )),
        )
        // --- Requests ---
        .route(
            "/requests",
            post(requests::create_request).layer(middleware::from_fn_with_state(
                Operation::CreateRequest,
                capability_middleware,
            )),
        )
        .route(
            "/requests",
            get(requests::list_requests).layer(middleware::from_fn_with_state(
                Operation::ListRequests,
                capability_middleware,
            )),
        )
        .route(
            "/requests/{request_id}",
            get(requests::get_request).layer(middleware::from_fn_with_state(
                Operation::ViewRequest,
                capability_middleware,
            )),
        )
        .route(
            "/requests/{request_id}/process",
            post(requests::process_request).layer(middleware::from_fn_with_state(
                Operation::ProcessRequest,
                capability_middleware,
            )),
        )
        .route(
            "/requests/{request_id}/cancel",
            post(requests::cancel_request).layer(middleware::from_fn_with_state(
                Operation::CancelRequest,
                capability_middleware,
            )),
        )
        .route(
            "/clients/{client_id}/requests",
            get(requests::list_client_requests).layer(middleware::from_fn_with_state(
                Operation::ListOwnRequests,
                capability_middleware,
            )),
        );

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .nest("/api/v1", api_v1)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
