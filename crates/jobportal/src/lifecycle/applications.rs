//! Job application operations.

use tracing::{info, info_span};
use uuid::Uuid;

use super::{stale, unique_to_conflict, Lifecycle};
use crate::broadcast::{EventKind, LifecycleEvent};
use crate::db::application_repo::{self, ApplicationFilter};
use crate::db::job_repo;
use crate::error::LifecycleError;
use crate::model::{ApplicationStatus, JobApplication, Principal};

impl Lifecycle {
    /// Files an application for the acting candidate.
    pub fn apply_to_job(
        &self,
        principal: &Principal,
        job_id: &str,
    ) -> Result<JobApplication, LifecycleError> {
        let user_id = principal.require_user()?;
        let _span = info_span!("lifecycle.apply", job_id = %job_id, user_id = %user_id).entered();
        let now = self.now();

        let app = self.db.with_conn(|conn| {
            let job = job_repo::find_by_id(conn, job_id)?
                .ok_or_else(|| LifecycleError::not_found("Job", job_id))?;
            if application_repo::find_by_user_and_job(conn, user_id, job_id)?.is_some() {
                return Err(LifecycleError::Conflict(
                    "you have already applied to this job".to_string(),
                ));
            }

            let app = JobApplication {
                id: Uuid::new_v4().to_string(),
                job_id: job.id,
                company_id: job.company_id,
                user_id: user_id.to_string(),
                status: ApplicationStatus::Pending,
                date: now,
                version: 1,
            };
            application_repo::insert(conn, &app).map_err(|e| {
                unique_to_conflict(e, || "you have already applied to this job".to_string())
            })?;
            Ok(app)
        })?;

        info!(application_id = %app.id, "Application submitted");
        self.announce(LifecycleEvent::for_application(
            EventKind::ApplicationSubmitted,
            &app,
            now,
        ));
        Ok(app)
    }

    /// Moves an application to `new_status` on behalf of its company.
    ///
    /// `hired` and `rejected` are final; setting the current status again is
    /// accepted without a write.
    pub fn set_application_status(
        &self,
        principal: &Principal,
        application_id: &str,
        new_status: &str,
    ) -> Result<JobApplication, LifecycleError> {
        let company_id = principal.require_company()?;
        let _span = info_span!(
            "lifecycle.set_application_status",
            application_id = %application_id,
            company_id = %company_id,
        )
        .entered();

        let (app, changed) = self.db.with_conn(|conn| {
            let mut app = application_repo::find_by_id(conn, application_id)?
                .ok_or_else(|| LifecycleError::not_found("Application", application_id))?;
            if app.company_id != company_id {
                return Err(LifecycleError::Forbidden);
            }
            let status: ApplicationStatus = new_status.trim().parse()?;
            app.status.check_transition(status)?;
            if app.status == status {
                return Ok((app, false));
            }

            if !application_repo::update_status(conn, &app.id, app.version, status)? {
                return Err(stale("Application"));
            }
            app.status = status;
            app.version += 1;
            Ok((app, true))
        })?;

        if changed {
            info!(status = %app.status, "Application status changed");
            self.announce(LifecycleEvent::for_application(
                EventKind::ApplicationStatusChanged,
                &app,
                self.now(),
            ));
        }
        Ok(app)
    }

    /// Reads one application. Its company, its candidate and admins may read it.
    pub fn get_application(
        &self,
        principal: &Principal,
        application_id: &str,
    ) -> Result<JobApplication, LifecycleError> {
        let app = self.db.with_conn(|conn| {
            application_repo::find_by_id(conn, application_id)?
                .ok_or_else(|| LifecycleError::not_found("Application", application_id))
        })?;

        let allowed = match principal {
            Principal::Company(id) => *id == app.company_id,
            Principal::User(id) => *id == app.user_id,
            Principal::Admin(_) => true,
        };
        if !allowed {
            return Err(LifecycleError::Forbidden);
        }
        Ok(app)
    }

    /// Lists the applications visible to the principal, newest first.
    pub fn list_applications(
        &self,
        principal: &Principal,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<JobApplication>, LifecycleError> {
        let mut filter = ApplicationFilter {
            status,
            ..Default::default()
        };
        match principal {
            Principal::Company(id) => filter.company_id = Some(id.clone()),
            Principal::User(id) => filter.user_id = Some(id.clone()),
            Principal::Admin(_) => {}
        }
        self.db
            .with_conn(|conn| application_repo::query(conn, &filter).map_err(LifecycleError::from))
    }
}
