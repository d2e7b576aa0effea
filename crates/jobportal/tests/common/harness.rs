//! Test harness for lifecycle integration tests.
//!
//! The `TestHarness` provides an isolated workflow environment:
//! - An in-memory database with migrations applied
//! - A `FixedClock` the test moves explicitly
//! - Companies C and D, candidates U and V, and a job J posted by C
//! - A subscription to the lifecycle event channel

#![allow(dead_code)]

use std::sync::Arc;

use chrono::FixedOffset;
use tokio::sync::broadcast::Receiver;

use jobportal::model::{Job, NewJob};
use jobportal::{
    Database, EventKind, FixedClock, Interview, JobApplication, Lifecycle, LifecycleBroadcaster,
    LifecycleEvent, Principal, PrincipalKind, ScheduleFields,
};

use super::builders::instant;

/// Test harness providing an isolated workflow for integration tests.
pub struct TestHarness {
    pub lifecycle: Lifecycle,
    pub clock: Arc<FixedClock>,
    events: Receiver<LifecycleEvent>,
    /// Company C, owner of `job`.
    pub company: Principal,
    /// Company D, owns nothing.
    pub other_company: Principal,
    /// Candidate U.
    pub candidate: Principal,
    /// Candidate V.
    pub other_candidate: Principal,
    pub admin: Principal,
    pub job: Job,
}

impl TestHarness {
    /// Create a harness reading interview times at UTC, with the clock at
    /// 2026-03-01T08:00:00Z.
    pub fn new() -> Self {
        Self::with_offset_minutes(0)
    }

    /// Create a harness reading interview times at the given UTC offset.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let broadcaster = LifecycleBroadcaster::new(256);
        let events = broadcaster.subscribe();
        let clock = Arc::new(FixedClock::new(instant("2026-03-01T08:00:00Z")));
        let offset = FixedOffset::east_opt(minutes * 60).expect("valid offset");
        let lifecycle = Lifecycle::new(db, broadcaster, offset).with_clock(clock.clone());

        let register = |kind: PrincipalKind, name: &str, email: &str| {
            let party = lifecycle
                .register_party(kind, name, email)
                .expect("Failed to register party");
            Principal::new(kind, party.id)
        };
        let company = register(PrincipalKind::Company, "Acme", "hr@acme.test");
        let other_company = register(PrincipalKind::Company, "Globex", "hr@globex.test");
        let candidate = register(PrincipalKind::User, "Ursula", "ursula@mail.test");
        let other_candidate = register(PrincipalKind::User, "Victor", "victor@mail.test");
        let admin = register(PrincipalKind::Admin, "Root", "root@portal.test");

        let job = lifecycle
            .create_job(
                &company,
                NewJob {
                    title: "Backend Engineer".to_string(),
                    description: Some("Rust services".to_string()),
                    location: Some("Berlin".to_string()),
                },
            )
            .expect("Failed to create job");

        Self {
            lifecycle,
            clock,
            events,
            company,
            other_company,
            candidate,
            other_candidate,
            admin,
            job,
        }
    }

    /// Candidate U applies to job J.
    pub fn apply(&self) -> JobApplication {
        self.lifecycle
            .apply_to_job(&self.candidate, &self.job.id)
            .expect("Failed to apply")
    }

    /// Company C schedules an interview for the application.
    pub fn schedule(&self, application_id: &str, fields: ScheduleFields) -> Interview {
        self.lifecycle
            .schedule_interview(&self.company, application_id, fields)
            .expect("Failed to schedule interview")
    }

    /// Re-reads an application as an admin.
    pub fn application(&self, id: &str) -> JobApplication {
        self.lifecycle
            .get_application(&self.admin, id)
            .expect("Failed to read application")
    }

    /// Re-reads an interview as its company.
    pub fn interview(&self, id: &str) -> Interview {
        self.lifecycle
            .get_interview(&self.company, id)
            .expect("Failed to read interview")
            .interview
    }

    /// Kinds of all events broadcast since the last call.
    pub fn drain_events(&mut self) -> Vec<EventKind> {
        let mut kinds = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            kinds.push(event.kind);
        }
        kinds
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
