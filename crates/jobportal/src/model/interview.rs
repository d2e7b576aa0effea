//! Interviews scheduled against an application, and their status machine.
//!
//! ```text
//! [scheduled] --reschedule--> rescheduled
//! [scheduled|rescheduled] --confirm--> confirmed
//! {scheduled|confirmed|rescheduled} --cancel--> cancelled     (terminal)
//! {confirmed} --complete, guarded--> completed                (terminal)
//! {scheduled|confirmed|rescheduled} --reschedule--> rescheduled, userConfirmed=false
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LifecycleError;
use crate::model::principal::Principal;
use crate::model::reference::PartySummary;

/// Status of an interview.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Confirmed => "confirmed",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
            InterviewStatus::Rescheduled => "rescheduled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InterviewStatus::Completed | InterviewStatus::Cancelled)
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(InterviewStatus::Scheduled),
            "confirmed" => Ok(InterviewStatus::Confirmed),
            "completed" => Ok(InterviewStatus::Completed),
            "cancelled" => Ok(InterviewStatus::Cancelled),
            "rescheduled" => Ok(InterviewStatus::Rescheduled),
            other => Err(LifecycleError::invalid_argument(format!(
                "unknown interview status '{}'",
                other
            ))),
        }
    }
}

/// Where the interview takes place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InterviewLocation {
    Online,
    Onsite,
    Phone,
}

impl InterviewLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewLocation::Online => "online",
            InterviewLocation::Onsite => "onsite",
            InterviewLocation::Phone => "phone",
        }
    }
}

impl FromStr for InterviewLocation {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(InterviewLocation::Online),
            "onsite" => Ok(InterviewLocation::Onsite),
            "phone" => Ok(InterviewLocation::Phone),
            other => Err(LifecycleError::invalid_argument(format!(
                "unknown interview location '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Technical,
    Hr,
    Culture,
    Screening,
    Final,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Hr => "hr",
            InterviewType::Culture => "culture",
            InterviewType::Screening => "screening",
            InterviewType::Final => "final",
        }
    }
}

impl FromStr for InterviewType {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(InterviewType::Technical),
            "hr" => Ok(InterviewType::Hr),
            "culture" => Ok(InterviewType::Culture),
            "screening" => Ok(InterviewType::Screening),
            "final" => Ok(InterviewType::Final),
            other => Err(LifecycleError::invalid_argument(format!(
                "unknown interview type '{}'",
                other
            ))),
        }
    }
}

/// Scheduling fields as submitted by a company, not yet validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleFields {
    pub scheduled_date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub meeting_address: Option<String>,
    pub interview_type: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ScheduleFields {
    /// Parses and cross-checks the fields.
    pub fn validate(self) -> Result<Schedule, LifecycleError> {
        let scheduled_date = NaiveDate::parse_from_str(self.scheduled_date.trim(), "%Y-%m-%d")
            .map_err(|_| {
                LifecycleError::invalid_argument(format!(
                    "scheduledDate '{}' is not a YYYY-MM-DD date",
                    self.scheduled_date
                ))
            })?;
        let start_time = parse_wall_clock("startTime", &self.start_time)?;
        let end_time = parse_wall_clock("endTime", &self.end_time)?;
        if end_time <= start_time {
            return Err(LifecycleError::invalid_argument(
                "endTime must be after startTime",
            ));
        }

        let location: InterviewLocation = self.location.trim().parse()?;
        let interview_type: InterviewType = self.interview_type.trim().parse()?;
        let meeting_link = non_blank(self.meeting_link);
        let meeting_address = non_blank(self.meeting_address);

        let (meeting_link, meeting_address) = match location {
            InterviewLocation::Online => match meeting_link {
                Some(link) => (Some(link), None),
                None => {
                    return Err(LifecycleError::invalid_argument(
                        "meetingLink is required for online interviews",
                    ))
                }
            },
            InterviewLocation::Onsite => match meeting_address {
                Some(address) => (None, Some(address)),
                None => {
                    return Err(LifecycleError::invalid_argument(
                        "meetingAddress is required for onsite interviews",
                    ))
                }
            },
            InterviewLocation::Phone => (None, None),
        };

        Ok(Schedule {
            scheduled_date,
            start_time,
            end_time,
            location,
            meeting_link,
            meeting_address,
            interview_type,
            notes: non_blank(self.notes),
        })
    }
}

/// Partial scheduling fields for the generic update endpoint.
///
/// An absent field keeps its current value. An empty string clears an
/// optional field (`notes`, `meetingLink`, `meetingAddress`), subject to the
/// location rules in [`ScheduleFields::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub scheduled_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub meeting_address: Option<String>,
    pub interview_type: Option<String>,
    pub notes: Option<String>,
}

impl ScheduleUpdate {
    /// Overlays the supplied fields on top of an existing schedule.
    pub fn merge_over(self, current: &Schedule) -> ScheduleFields {
        ScheduleFields {
            scheduled_date: self
                .scheduled_date
                .unwrap_or_else(|| current.scheduled_date.format("%Y-%m-%d").to_string()),
            start_time: self
                .start_time
                .unwrap_or_else(|| current.start_time.format("%H:%M").to_string()),
            end_time: self
                .end_time
                .unwrap_or_else(|| current.end_time.format("%H:%M").to_string()),
            location: self
                .location
                .unwrap_or_else(|| current.location.as_str().to_string()),
            meeting_link: self.meeting_link.or_else(|| current.meeting_link.clone()),
            meeting_address: self
                .meeting_address
                .or_else(|| current.meeting_address.clone()),
            interview_type: self
                .interview_type
                .unwrap_or_else(|| current.interview_type.as_str().to_string()),
            notes: self.notes.or_else(|| current.notes.clone()),
        }
    }
}

/// Validated scheduling fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub scheduled_date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
    pub location: InterviewLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_address: Option<String>,
    pub interview_type: InterviewType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Schedule {
    /// The instant the interview ends, reading the wall-clock fields at `offset`.
    pub fn ends_at(&self, offset: FixedOffset) -> DateTime<Utc> {
        let local = self.scheduled_date.and_time(self.end_time);
        offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| local.and_utc())
    }
}

/// Which side of an interview a principal is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Company,
    Candidate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub job_id: String,
    pub company_id: String,
    pub user_id: String,
    pub application_id: String,
    #[serde(flatten)]
    pub schedule: Schedule,
    pub status: InterviewStatus,
    pub user_confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub version: i64,
}

impl Interview {
    /// Resolves the principal's side of this interview.
    pub fn participant(&self, principal: &Principal) -> Result<Participant, LifecycleError> {
        match principal {
            Principal::Company(id) if *id == self.company_id => Ok(Participant::Company),
            Principal::User(id) if *id == self.user_id => Ok(Participant::Candidate),
            _ => Err(LifecycleError::Forbidden),
        }
    }

    pub fn ensure_owned_by_company(&self, principal: &Principal) -> Result<(), LifecycleError> {
        match self.participant(principal)? {
            Participant::Company => Ok(()),
            Participant::Candidate => Err(LifecycleError::Forbidden),
        }
    }

    fn ensure_open(&self, action: &str) -> Result<(), LifecycleError> {
        if self.status.is_terminal() {
            return Err(LifecycleError::invalid_state(format!(
                "cannot {} an interview that is {}",
                action, self.status
            )));
        }
        Ok(())
    }

    /// Replaces the schedule. The candidate has to confirm again.
    pub fn reschedule(&mut self, schedule: Schedule) -> Result<(), LifecycleError> {
        self.ensure_open("reschedule")?;
        self.schedule = schedule;
        self.status = InterviewStatus::Rescheduled;
        self.user_confirmed = false;
        Ok(())
    }

    /// Candidate confirmation. Returns `false` when already confirmed.
    pub fn confirm(&mut self) -> Result<bool, LifecycleError> {
        self.ensure_open("confirm")?;
        if self.status == InterviewStatus::Confirmed && self.user_confirmed {
            return Ok(false);
        }
        self.status = InterviewStatus::Confirmed;
        self.user_confirmed = true;
        Ok(true)
    }

    /// Returns `false` when the interview was already cancelled.
    pub fn cancel(&mut self) -> Result<bool, LifecycleError> {
        match self.status {
            InterviewStatus::Cancelled => Ok(false),
            InterviewStatus::Completed => Err(LifecycleError::invalid_state(
                "cannot cancel an interview that is completed",
            )),
            _ => {
                self.status = InterviewStatus::Cancelled;
                Ok(true)
            }
        }
    }

    /// Marks the interview completed once it is confirmed and over.
    pub fn complete(
        &mut self,
        now: DateTime<Utc>,
        offset: FixedOffset,
        company_feedback: Option<String>,
    ) -> Result<(), LifecycleError> {
        self.ensure_open("complete")?;
        if !self.user_confirmed {
            return Err(LifecycleError::invalid_state(
                "the candidate has not confirmed this interview",
            ));
        }
        let ends_at = self.schedule.ends_at(offset);
        if now < ends_at {
            return Err(LifecycleError::invalid_state(format!(
                "the interview has not ended yet (ends at {})",
                ends_at.to_rfc3339()
            )));
        }
        self.status = InterviewStatus::Completed;
        if let Some(feedback) = non_blank(company_feedback) {
            self.company_feedback = Some(feedback);
        }
        Ok(())
    }

    /// Stores feedback on the caller's side of the interview.
    pub fn add_feedback(
        &mut self,
        principal: &Principal,
        feedback: &str,
    ) -> Result<Participant, LifecycleError> {
        let participant = self.participant(principal)?;
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(LifecycleError::invalid_argument("feedback must not be empty"));
        }
        match participant {
            Participant::Company => self.company_feedback = Some(feedback.to_string()),
            Participant::Candidate => self.user_feedback = Some(feedback.to_string()),
        }
        Ok(participant)
    }
}

/// An interview with its referenced entities populated for read responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterviewDetail {
    #[serde(flatten)]
    pub interview: Interview,
    pub job_title: String,
    pub company: PartySummary,
    pub candidate: PartySummary,
}

fn parse_wall_clock(field: &str, value: &str) -> Result<NaiveTime, LifecycleError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        LifecycleError::invalid_argument(format!("{} '{}' is not an HH:MM time", field, value))
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `HH:MM` serde representation for wall-clock times.
mod wall_clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
