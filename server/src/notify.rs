//! Delivers lifecycle events to the parties involved.
//!
//! Delivery is a structured log line per event. Failures never reach the
//! request that caused the event.

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use jobportal::LifecycleBroadcaster;

/// Spawns the notifier. It runs until every sender is dropped.
pub fn spawn_notifier(events: &LifecycleBroadcaster) -> JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    tracing::info!(
                        target: "jobportal::notify",
                        kind = ?event.kind,
                        application_id = %event.application_id,
                        interview_id = event.interview_id.as_deref().unwrap_or("-"),
                        company_id = %event.company_id,
                        user_id = %event.user_id,
                        status = %event.status,
                        "{}",
                        event.message
                    );
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "notifier fell behind, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
