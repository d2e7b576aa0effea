//! Builders for lifecycle requests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};

use jobportal::model::ScheduleFields;

/// Parses an RFC 3339 instant.
pub fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 instant")
        .with_timezone(&Utc)
}

/// Builder for `ScheduleFields`. Defaults to an online technical interview
/// on 2026-03-10 from 10:00 to 11:00.
pub struct ScheduleBuilder {
    fields: ScheduleFields,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self {
            fields: ScheduleFields {
                scheduled_date: "2026-03-10".to_string(),
                start_time: "10:00".to_string(),
                end_time: "11:00".to_string(),
                location: "online".to_string(),
                meeting_link: Some("https://x".to_string()),
                meeting_address: None,
                interview_type: "technical".to_string(),
                notes: None,
            },
        }
    }

    pub fn date(mut self, date: &str) -> Self {
        self.fields.scheduled_date = date.to_string();
        self
    }

    pub fn times(mut self, start: &str, end: &str) -> Self {
        self.fields.start_time = start.to_string();
        self.fields.end_time = end.to_string();
        self
    }

    pub fn online(mut self, link: &str) -> Self {
        self.fields.location = "online".to_string();
        self.fields.meeting_link = Some(link.to_string());
        self
    }

    pub fn onsite(mut self, address: &str) -> Self {
        self.fields.location = "onsite".to_string();
        self.fields.meeting_address = Some(address.to_string());
        self
    }

    pub fn phone(mut self) -> Self {
        self.fields.location = "phone".to_string();
        self
    }

    /// Sets the raw location string, valid or not.
    pub fn location(mut self, location: &str) -> Self {
        self.fields.location = location.to_string();
        self
    }

    pub fn without_link(mut self) -> Self {
        self.fields.meeting_link = None;
        self
    }

    pub fn interview_type(mut self, interview_type: &str) -> Self {
        self.fields.interview_type = interview_type.to_string();
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.fields.notes = Some(notes.to_string());
        self
    }

    pub fn build(self) -> ScheduleFields {
        self.fields
    }
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
