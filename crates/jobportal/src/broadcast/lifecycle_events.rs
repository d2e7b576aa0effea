//! Lifecycle event broadcaster for application and interview changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::{Interview, JobApplication};

/// What happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ApplicationSubmitted,
    ApplicationStatusChanged,
    InterviewScheduled,
    InterviewRescheduled,
    InterviewConfirmed,
    InterviewCancelled,
    InterviewCompleted,
    FeedbackAdded,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::ApplicationSubmitted => write!(f, "Application submitted"),
            EventKind::ApplicationStatusChanged => write!(f, "Application status changed"),
            EventKind::InterviewScheduled => write!(f, "Interview scheduled"),
            EventKind::InterviewRescheduled => write!(f, "Interview rescheduled"),
            EventKind::InterviewConfirmed => write!(f, "Interview confirmed"),
            EventKind::InterviewCancelled => write!(f, "Interview cancelled"),
            EventKind::InterviewCompleted => write!(f, "Interview completed"),
            EventKind::FeedbackAdded => write!(f, "Feedback added"),
        }
    }
}

/// A notification-worthy change to an application or interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    pub kind: EventKind,
    pub application_id: String,
    /// Set for interview events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_id: Option<String>,
    pub company_id: String,
    pub user_id: String,
    /// Status of the changed entity after the change.
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LifecycleEvent {
    pub fn for_application(kind: EventKind, app: &JobApplication, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            application_id: app.id.clone(),
            interview_id: None,
            company_id: app.company_id.clone(),
            user_id: app.user_id.clone(),
            status: app.status.to_string(),
            message: format!("{}: {}", kind, app.status),
            timestamp,
        }
    }

    pub fn for_interview(kind: EventKind, interview: &Interview, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            application_id: interview.application_id.clone(),
            interview_id: Some(interview.id.clone()),
            company_id: interview.company_id.clone(),
            user_id: interview.user_id.clone(),
            status: interview.status.to_string(),
            message: format!(
                "{} for {} {}-{}",
                kind,
                interview.schedule.scheduled_date,
                interview.schedule.start_time.format("%H:%M"),
                interview.schedule.end_time.format("%H:%M"),
            ),
            timestamp,
        }
    }
}

/// Broadcasts lifecycle events to subscribers.
#[derive(Clone)]
pub struct LifecycleBroadcaster {
    sender: Arc<broadcast::Sender<LifecycleEvent>>,
}

impl LifecycleBroadcaster {
    /// Creates a new broadcaster with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sends an event to all subscribers.
    pub fn send(&self, event: LifecycleEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}

impl Default for LifecycleBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}
