//! The application and interview workflow.
//!
//! [`Lifecycle`] owns the database handle, the clock and the event
//! broadcaster. Every operation takes the acting [`Principal`] explicitly,
//! performs its guards and writes inside one locked read-modify-write, and
//! announces the change after the write has committed.

mod applications;
mod clock;
mod interviews;

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::broadcast::{LifecycleBroadcaster, LifecycleEvent};
use crate::db::{job_repo, party_repo, Database, DatabaseError};
use crate::error::LifecycleError;
use crate::model::{Job, NewJob, PartySummary, Principal, PrincipalKind};

pub use clock::{Clock, FixedClock, SystemClock};

pub struct Lifecycle {
    db: Database,
    clock: Arc<dyn Clock>,
    events: LifecycleBroadcaster,
    offset: FixedOffset,
}

impl Lifecycle {
    /// Creates a lifecycle manager on the system clock.
    ///
    /// `offset` is the UTC offset at which interview wall-clock fields are read.
    pub fn new(db: Database, events: LifecycleBroadcaster, offset: FixedOffset) -> Self {
        Self {
            db,
            clock: Arc::new(SystemClock),
            events,
            offset,
        }
    }

    /// Replaces the clock. Used by tests to drive the completion guard.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn events(&self) -> &LifecycleBroadcaster {
        &self.events
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn announce(&self, event: LifecycleEvent) {
        debug!(kind = ?event.kind, application_id = %event.application_id, "announcing");
        self.events.send(event);
    }

    /// Registers a company, candidate or admin and returns it with its new id.
    pub fn register_party(
        &self,
        kind: PrincipalKind,
        name: &str,
        email: &str,
    ) -> Result<PartySummary, LifecycleError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(LifecycleError::invalid_argument("name must not be empty"));
        }
        if !email.contains('@') {
            return Err(LifecycleError::invalid_argument(format!(
                "'{}' is not an e-mail address",
                email
            )));
        }

        let party = PartySummary {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        let now = self.now();
        self.db.with_conn(|conn| {
            party_repo::insert(conn, kind, &party, now).map_err(|e| {
                unique_to_conflict(e, || {
                    format!("a {} with e-mail {} already exists", kind, party.email)
                })
            })
        })?;

        info!(kind = %kind, id = %party.id, "Registered party");
        Ok(party)
    }

    /// Posts a job on behalf of the acting company.
    pub fn create_job(&self, principal: &Principal, new_job: NewJob) -> Result<Job, LifecycleError> {
        let company_id = principal.require_company()?;
        new_job.validate()?;

        let job = Job {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            title: new_job.title.trim().to_string(),
            description: new_job.description,
            location: new_job.location,
            created_at: self.now(),
        };
        self.db.with_conn(|conn| {
            if !party_repo::exists(conn, PrincipalKind::Company, company_id)? {
                return Err(LifecycleError::not_found("Company", company_id));
            }
            job_repo::insert(conn, &job).map_err(LifecycleError::from)
        })?;

        info!(job_id = %job.id, company_id = %job.company_id, "Job created");
        Ok(job)
    }

    pub fn list_jobs(&self) -> Result<Vec<Job>, LifecycleError> {
        self.db.with_conn(|conn| job_repo::list(conn).map_err(LifecycleError::from))
    }

    /// Deletes a job together with its applications and their interviews.
    /// Returns how many applications went with it.
    pub fn delete_job(&self, principal: &Principal, job_id: &str) -> Result<u64, LifecycleError> {
        let _span = info_span!("lifecycle.delete_job", job_id = %job_id, principal = %principal)
            .entered();

        let removed = self.db.with_transaction(|conn| {
            let job = job_repo::find_by_id(conn, job_id)?
                .ok_or_else(|| LifecycleError::not_found("Job", job_id))?;
            match principal {
                Principal::Admin(_) => {}
                Principal::Company(id) if *id == job.company_id => {}
                _ => return Err(LifecycleError::Forbidden),
            }
            job_repo::delete(conn, job_id)?.ok_or_else(|| LifecycleError::not_found("Job", job_id))
        })?;

        info!(applications_removed = removed, "Job deleted");
        Ok(removed)
    }
}

/// Maps a unique-constraint violation to `Conflict`, passing other faults through.
fn unique_to_conflict(err: DatabaseError, message: impl FnOnce() -> String) -> LifecycleError {
    if err.is_unique_violation() {
        LifecycleError::Conflict(message())
    } else {
        LifecycleError::Database(err)
    }
}

/// Reports a lost optimistic-concurrency race.
fn stale(entity: &str) -> LifecycleError {
    LifecycleError::Conflict(format!(
        "{} was modified concurrently, reload and retry",
        entity
    ))
}
