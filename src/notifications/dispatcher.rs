//! Background dispatcher draining the event bus toward the delivery
//! collaborator.
//!
//! Runs in a tokio::spawn loop until shutdown. A failed delivery is
//! logged and dropped; the workflow transition that produced the event
//! has already committed and is never rolled back.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::NotificationSink;
use crate::notifications::{EventMessage, SharedEventBus};
use crate::shared::ShutdownSignal;

/// Start the notification dispatcher task.
pub fn start_dispatcher(
    bus: SharedEventBus,
    sink: Arc<dyn NotificationSink>,
    shutdown: ShutdownSignal,
) {
    tokio::spawn(async move {
        let mut subscriber = bus.subscribe();
        info!("🔔 Notification dispatcher started");

        loop {
            tokio::select! {
                message = subscriber.recv() => {
                    match message {
                        Some(message) => deliver(&*sink, &message).await,
                        None => {
                            // Bus dropped, nothing left to dispatch
                            break;
                        }
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("🔔 Notification dispatcher shutting down");
                    break;
                }
            }
        }

        info!("🔔 Notification dispatcher stopped");
    });
}

async fn deliver(sink: &dyn NotificationSink, message: &EventMessage) {
    if let Err(e) = sink.deliver(message).await {
        warn!(
            event_type = message.event.event_type(),
            request_id = %message.event.request_id(),
            error = %e,
            "Notification delivery failed"
        );
    }
}

/// Default sink: logs the delivery. The platform's mail/push service
/// replaces this in production wiring.
pub struct LoggingNotificationSink;

#[async_trait::async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn deliver(&self, message: &EventMessage) -> Result<(), String> {
        info!(
            event_type = message.event.event_type(),
            request_id = %message.event.request_id(),
            client_id = message.event.client_id(),
            to_manager = message.event.notifies_manager(),
            "Notification dispatched"
        );
        Ok(())
    }
}
