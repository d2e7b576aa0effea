//! Interview operations.

use rusqlite::Connection;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use super::{stale, Lifecycle};
use crate::broadcast::{EventKind, LifecycleEvent};
use crate::db::application_repo;
use crate::db::interview_repo::{self, Owner};
use crate::error::LifecycleError;
use crate::model::interview::Participant;
use crate::model::{
    ApplicationStatus, Interview, InterviewDetail, InterviewStatus, Principal, ScheduleFields,
    ScheduleUpdate,
};

fn load(conn: &Connection, interview_id: &str) -> Result<Interview, LifecycleError> {
    interview_repo::find_by_id(conn, interview_id)?
        .ok_or_else(|| LifecycleError::not_found("Interview", interview_id))
}

fn load_for_company(
    conn: &Connection,
    principal: &Principal,
    interview_id: &str,
) -> Result<Interview, LifecycleError> {
    let interview = load(conn, interview_id)?;
    interview.ensure_owned_by_company(principal)?;
    Ok(interview)
}

fn save(conn: &Connection, interview: &mut Interview) -> Result<(), LifecycleError> {
    if !interview_repo::update(conn, interview)? {
        return Err(stale("Interview"));
    }
    interview.version += 1;
    Ok(())
}

impl Lifecycle {
    /// Schedules an interview against an application the acting company owns.
    ///
    /// The interview starts `scheduled` and the application is forced to
    /// `interviewing` in the same transaction, whatever its prior status.
    pub fn schedule_interview(
        &self,
        principal: &Principal,
        application_id: &str,
        fields: ScheduleFields,
    ) -> Result<Interview, LifecycleError> {
        let company_id = principal.require_company()?;
        let _span = info_span!(
            "lifecycle.schedule_interview",
            application_id = %application_id,
            company_id = %company_id,
        )
        .entered();
        let now = self.now();

        let (interview, app, previous) = self.db.with_transaction(|conn| {
            let mut app = application_repo::find_by_id(conn, application_id)?
                .ok_or_else(|| LifecycleError::not_found("Application", application_id))?;
            if !app.is_owned_by_company(company_id) {
                return Err(LifecycleError::Forbidden);
            }
            let schedule = fields.validate()?;

            let interview = Interview {
                id: Uuid::new_v4().to_string(),
                job_id: app.job_id.clone(),
                company_id: app.company_id.clone(),
                user_id: app.user_id.clone(),
                application_id: app.id.clone(),
                schedule,
                status: InterviewStatus::Scheduled,
                user_confirmed: false,
                company_feedback: None,
                user_feedback: None,
                created_at: now,
                updated_at: now,
                version: 1,
            };
            interview_repo::insert(conn, &interview)?;

            let previous = app.status;
            if !application_repo::update_status(
                conn,
                &app.id,
                app.version,
                ApplicationStatus::Interviewing,
            )? {
                return Err(stale("Application"));
            }
            app.status = ApplicationStatus::Interviewing;
            app.version += 1;
            Ok((interview, app, previous))
        })?;

        info!(interview_id = %interview.id, "Interview scheduled");
        self.announce(LifecycleEvent::for_interview(
            EventKind::InterviewScheduled,
            &interview,
            now,
        ));
        if previous != app.status {
            self.announce(LifecycleEvent::for_application(
                EventKind::ApplicationStatusChanged,
                &app,
                now,
            ));
        }
        Ok(interview)
    }

    /// Replaces the scheduling fields. The candidate has to confirm again.
    pub fn reschedule_interview(
        &self,
        principal: &Principal,
        interview_id: &str,
        fields: ScheduleFields,
    ) -> Result<Interview, LifecycleError> {
        let _span = info_span!("lifecycle.reschedule_interview", interview_id = %interview_id)
            .entered();
        self.rescheduled(principal, interview_id, |_| fields)
    }

    /// Merges the supplied fields over the current schedule, then behaves
    /// exactly like [`Lifecycle::reschedule_interview`].
    pub fn update_interview(
        &self,
        principal: &Principal,
        interview_id: &str,
        update: ScheduleUpdate,
    ) -> Result<Interview, LifecycleError> {
        let _span =
            info_span!("lifecycle.update_interview", interview_id = %interview_id).entered();
        self.rescheduled(principal, interview_id, |interview| {
            update.merge_over(&interview.schedule)
        })
    }

    fn rescheduled<F>(
        &self,
        principal: &Principal,
        interview_id: &str,
        fields: F,
    ) -> Result<Interview, LifecycleError>
    where
        F: FnOnce(&Interview) -> ScheduleFields,
    {
        let now = self.now();
        let interview = self.db.with_conn(|conn| {
            let mut interview = load_for_company(conn, principal, interview_id)?;
            let schedule = fields(&interview).validate()?;
            interview.reschedule(schedule)?;
            interview.updated_at = now;
            save(conn, &mut interview)?;
            Ok::<_, LifecycleError>(interview)
        })?;

        info!("Interview rescheduled");
        self.announce(LifecycleEvent::for_interview(
            EventKind::InterviewRescheduled,
            &interview,
            now,
        ));
        Ok(interview)
    }

    /// Cancels the interview. Cancelling a cancelled interview changes nothing.
    pub fn cancel_interview(
        &self,
        principal: &Principal,
        interview_id: &str,
    ) -> Result<Interview, LifecycleError> {
        let _span =
            info_span!("lifecycle.cancel_interview", interview_id = %interview_id).entered();
        let now = self.now();

        let (interview, changed) = self.db.with_conn(|conn| {
            let mut interview = load_for_company(conn, principal, interview_id)?;
            if !interview.cancel()? {
                return Ok::<_, LifecycleError>((interview, false));
            }
            interview.updated_at = now;
            save(conn, &mut interview)?;
            Ok((interview, true))
        })?;

        if changed {
            info!("Interview cancelled");
            self.announce(LifecycleEvent::for_interview(
                EventKind::InterviewCancelled,
                &interview,
                now,
            ));
        }
        Ok(interview)
    }

    /// Candidate confirmation of their own interview.
    pub fn confirm_interview(
        &self,
        principal: &Principal,
        interview_id: &str,
    ) -> Result<Interview, LifecycleError> {
        principal.require_user()?;
        let _span =
            info_span!("lifecycle.confirm_interview", interview_id = %interview_id).entered();
        let now = self.now();

        let (interview, changed) = self.db.with_conn(|conn| {
            let mut interview = load(conn, interview_id)?;
            if interview.participant(principal)? != Participant::Candidate {
                return Err(LifecycleError::Forbidden);
            }
            if !interview.confirm()? {
                return Ok((interview, false));
            }
            interview.updated_at = now;
            save(conn, &mut interview)?;
            Ok((interview, true))
        })?;

        if changed {
            info!("Interview confirmed");
            self.announce(LifecycleEvent::for_interview(
                EventKind::InterviewConfirmed,
                &interview,
                now,
            ));
        }
        Ok(interview)
    }

    /// Marks the interview completed.
    ///
    /// Fails with `InvalidState` unless the interview is open, confirmed by
    /// the candidate, and its end time has passed.
    pub fn complete_interview(
        &self,
        principal: &Principal,
        interview_id: &str,
        company_feedback: Option<String>,
    ) -> Result<Interview, LifecycleError> {
        let _span =
            info_span!("lifecycle.complete_interview", interview_id = %interview_id).entered();
        let now = self.now();
        let offset = self.offset;

        let interview = self.db.with_conn(|conn| {
            let mut interview = load_for_company(conn, principal, interview_id)?;
            if let Err(e) = interview.complete(now, offset, company_feedback) {
                warn!(reason = %e, "Completion rejected");
                return Err(e);
            }
            interview.updated_at = now;
            save(conn, &mut interview)?;
            Ok(interview)
        })?;

        info!("Interview completed");
        self.announce(LifecycleEvent::for_interview(
            EventKind::InterviewCompleted,
            &interview,
            now,
        ));
        Ok(interview)
    }

    /// Stores feedback on the caller's side of the interview, in any status.
    pub fn add_feedback(
        &self,
        principal: &Principal,
        interview_id: &str,
        feedback: &str,
    ) -> Result<Interview, LifecycleError> {
        let _span = info_span!("lifecycle.add_feedback", interview_id = %interview_id).entered();
        let now = self.now();

        let (interview, side) = self.db.with_conn(|conn| {
            let mut interview = load(conn, interview_id)?;
            let side = interview.add_feedback(principal, feedback)?;
            interview.updated_at = now;
            save(conn, &mut interview)?;
            Ok::<_, LifecycleError>((interview, side))
        })?;

        info!(side = ?side, "Feedback added");
        self.announce(LifecycleEvent::for_interview(
            EventKind::FeedbackAdded,
            &interview,
            now,
        ));
        Ok(interview)
    }

    /// Reads an interview with job, company and candidate populated.
    /// Only the owning company and the candidate may read it.
    pub fn get_interview(
        &self,
        principal: &Principal,
        interview_id: &str,
    ) -> Result<InterviewDetail, LifecycleError> {
        let detail = self.db.with_conn(|conn| {
            interview_repo::find_detail(conn, interview_id)?
                .ok_or_else(|| LifecycleError::not_found("Interview", interview_id))
        })?;
        detail.interview.participant(principal)?;
        Ok(detail)
    }

    /// Lists the interviews of the acting company or candidate, soonest first.
    pub fn list_interviews(
        &self,
        principal: &Principal,
    ) -> Result<Vec<InterviewDetail>, LifecycleError> {
        let owner = match principal {
            Principal::Company(id) => Owner::Company(id),
            Principal::User(id) => Owner::User(id),
            Principal::Admin(_) => return Err(LifecycleError::Forbidden),
        };
        self.db.with_conn(|conn| {
            interview_repo::list_details(conn, owner).map_err(LifecycleError::from)
        })
    }
}
