//! Job applications and their status machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LifecycleError;

/// Status of a candidate's application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Viewed,
    Shortlisted,
    Interviewing,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Viewed,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Viewed => "viewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// `hired` and `rejected` end the manual workflow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Hired | ApplicationStatus::Rejected)
    }

    /// Checks a company-driven status change.
    ///
    /// Any status may move to any other until a terminal status is reached.
    /// Re-setting the current status is always accepted.
    pub fn check_transition(self, to: ApplicationStatus) -> Result<(), LifecycleError> {
        if self == to || !self.is_terminal() {
            return Ok(());
        }
        Err(LifecycleError::invalid_state(format!(
            "application is already {} and cannot move to {}",
            self, to
        )))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                LifecycleError::invalid_argument(format!("unknown application status '{}'", s))
            })
    }
}

/// A candidate's bid for a specific job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: String,
    pub job_id: String,
    pub company_id: String,
    pub user_id: String,
    pub status: ApplicationStatus,
    /// Creation time, never modified.
    pub date: DateTime<Utc>,
    #[serde(skip)]
    pub version: i64,
}

impl JobApplication {
    pub fn is_owned_by_company(&self, company_id: &str) -> bool {
        self.company_id == company_id
    }
}
