//! Integration tests for the application and interview workflow.

mod common;

use chrono::Duration;

use common::{instant, ScheduleBuilder, TestHarness};
use jobportal::model::{InterviewLocation, ScheduleUpdate};
use jobportal::{ApplicationStatus, EventKind, InterviewStatus, LifecycleError, Principal};

// ============================================================================
// Walkthrough
// ============================================================================

#[test]
fn test_full_interview_walkthrough() {
    let mut h = TestHarness::new();
    let app = h.apply();
    h.drain_events();

    // 1. C schedules an online interview for A.
    let interview = h.schedule(&app.id, ScheduleBuilder::new().online("https://x").build());
    assert_eq!(interview.status, InterviewStatus::Scheduled);
    assert!(!interview.user_confirmed);
    assert_eq!(interview.schedule.meeting_link.as_deref(), Some("https://x"));
    assert_eq!(h.application(&app.id).status, ApplicationStatus::Interviewing);

    // 2. U confirms.
    let confirmed = h
        .lifecycle
        .confirm_interview(&h.candidate, &interview.id)
        .unwrap();
    assert_eq!(confirmed.status, InterviewStatus::Confirmed);
    assert!(confirmed.user_confirmed);

    // 3. C reschedules to a new date.
    let rescheduled = h
        .lifecycle
        .reschedule_interview(
            &h.company,
            &interview.id,
            ScheduleBuilder::new().date("2026-03-12").build(),
        )
        .unwrap();
    assert_eq!(rescheduled.status, InterviewStatus::Rescheduled);
    assert!(!rescheduled.user_confirmed);
    assert_eq!(rescheduled.schedule.scheduled_date.to_string(), "2026-03-12");

    // 4. Completing now fails and changes nothing.
    let before = h.interview(&interview.id);
    let err = h
        .lifecycle
        .complete_interview(&h.company, &interview.id, None)
        .unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidState(_)));
    assert_eq!(h.interview(&interview.id), before);

    // 5. U reconfirms, time passes the end, C completes.
    h.lifecycle
        .confirm_interview(&h.candidate, &interview.id)
        .unwrap();
    h.clock.set(instant("2026-03-12T11:00:00Z"));
    let completed = h
        .lifecycle
        .complete_interview(&h.company, &interview.id, Some("Great fit".to_string()))
        .unwrap();
    assert_eq!(completed.status, InterviewStatus::Completed);
    assert_eq!(completed.company_feedback.as_deref(), Some("Great fit"));

    assert_eq!(
        h.drain_events(),
        vec![
            EventKind::InterviewScheduled,
            EventKind::ApplicationStatusChanged,
            EventKind::InterviewConfirmed,
            EventKind::InterviewRescheduled,
            EventKind::InterviewConfirmed,
            EventKind::InterviewCompleted,
        ]
    );
}

#[test]
fn test_non_owner_cannot_cancel() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());

    let err = h
        .lifecycle
        .cancel_interview(&h.other_company, &interview.id)
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Forbidden));
    assert_eq!(h.interview(&interview.id), interview);
}

// ============================================================================
// Applications
// ============================================================================

#[test]
fn test_apply_copies_company_from_job() {
    let h = TestHarness::new();
    let app = h.apply();
    assert_eq!(app.status, ApplicationStatus::Pending);
    assert_eq!(app.company_id, h.company.id());
    assert_eq!(app.user_id, h.candidate.id());
    assert_eq!(app.date, instant("2026-03-01T08:00:00Z"));
}

#[test]
fn test_apply_twice_conflicts() {
    let h = TestHarness::new();
    h.apply();
    let err = h
        .lifecycle
        .apply_to_job(&h.candidate, &h.job.id)
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Conflict(_)));

    // A different candidate may still apply.
    assert!(h
        .lifecycle
        .apply_to_job(&h.other_candidate, &h.job.id)
        .is_ok());
}

#[test]
fn test_apply_guards() {
    let h = TestHarness::new();
    assert!(matches!(
        h.lifecycle.apply_to_job(&h.company, &h.job.id),
        Err(LifecycleError::Forbidden)
    ));
    assert!(matches!(
        h.lifecycle.apply_to_job(&h.candidate, "no-such-job"),
        Err(LifecycleError::NotFound { .. })
    ));
}

#[test]
fn test_set_status_accepts_every_enumerated_status_for_owner() {
    for status in ApplicationStatus::ALL {
        let h = TestHarness::new();
        let app = h.apply();
        let updated = h
            .lifecycle
            .set_application_status(&h.company, &app.id, status.as_str())
            .unwrap();
        assert_eq!(updated.status, status);
        assert_eq!(h.application(&app.id).status, status);
    }
}

#[test]
fn test_set_status_failures_leave_status_unchanged() {
    let h = TestHarness::new();
    let app = h.apply();

    let err = h
        .lifecycle
        .set_application_status(&h.company, &app.id, "archived")
        .unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidArgument(_)));

    let err = h
        .lifecycle
        .set_application_status(&h.other_company, &app.id, "viewed")
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Forbidden));

    let err = h
        .lifecycle
        .set_application_status(&h.candidate, &app.id, "hired")
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Forbidden));

    let err = h
        .lifecycle
        .set_application_status(&h.company, "missing", "viewed")
        .unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound { .. }));

    assert_eq!(h.application(&app.id).status, ApplicationStatus::Pending);
}

#[test]
fn test_hired_and_rejected_are_final() {
    let h = TestHarness::new();
    let app = h.apply();
    h.lifecycle
        .set_application_status(&h.company, &app.id, "hired")
        .unwrap();

    let err = h
        .lifecycle
        .set_application_status(&h.company, &app.id, "pending")
        .unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidState(_)));

    // Setting the same status again is accepted.
    let same = h
        .lifecycle
        .set_application_status(&h.company, &app.id, "hired")
        .unwrap();
    assert_eq!(same.status, ApplicationStatus::Hired);
}

#[test]
fn test_application_visibility() {
    let h = TestHarness::new();
    let app = h.apply();

    assert!(h.lifecycle.get_application(&h.company, &app.id).is_ok());
    assert!(h.lifecycle.get_application(&h.candidate, &app.id).is_ok());
    assert!(h.lifecycle.get_application(&h.admin, &app.id).is_ok());
    assert!(matches!(
        h.lifecycle.get_application(&h.other_company, &app.id),
        Err(LifecycleError::Forbidden)
    ));
    assert!(matches!(
        h.lifecycle.get_application(&h.other_candidate, &app.id),
        Err(LifecycleError::Forbidden)
    ));

    assert_eq!(h.lifecycle.list_applications(&h.company, None).unwrap().len(), 1);
    assert!(h
        .lifecycle
        .list_applications(&h.other_company, None)
        .unwrap()
        .is_empty());
    assert_eq!(h.lifecycle.list_applications(&h.admin, None).unwrap().len(), 1);
    assert!(h
        .lifecycle
        .list_applications(&h.company, Some(ApplicationStatus::Hired))
        .unwrap()
        .is_empty());
}

#[test]
fn test_deleting_job_removes_applications_and_interviews() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());

    assert_eq!(h.lifecycle.delete_job(&h.company, &h.job.id).unwrap(), 1);
    assert!(matches!(
        h.lifecycle.get_application(&h.admin, &app.id),
        Err(LifecycleError::NotFound { .. })
    ));
    assert!(matches!(
        h.lifecycle.get_interview(&h.company, &interview.id),
        Err(LifecycleError::NotFound { .. })
    ));
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn test_scheduling_forces_interviewing_from_any_status() {
    for prior in ["pending", "viewed", "shortlisted", "interviewing", "hired", "rejected"] {
        let h = TestHarness::new();
        let app = h.apply();
        if prior != "pending" {
            h.lifecycle
                .set_application_status(&h.company, &app.id, prior)
                .unwrap();
        }

        h.schedule(&app.id, ScheduleBuilder::new().build());
        assert_eq!(
            h.application(&app.id).status,
            ApplicationStatus::Interviewing,
            "prior status {}",
            prior
        );
    }
}

#[test]
fn test_schedule_guards() {
    let h = TestHarness::new();
    let app = h.apply();

    assert!(matches!(
        h.lifecycle
            .schedule_interview(&h.other_company, &app.id, ScheduleBuilder::new().build()),
        Err(LifecycleError::Forbidden)
    ));
    assert!(matches!(
        h.lifecycle
            .schedule_interview(&h.candidate, &app.id, ScheduleBuilder::new().build()),
        Err(LifecycleError::Forbidden)
    ));
    assert!(matches!(
        h.lifecycle
            .schedule_interview(&h.company, "missing", ScheduleBuilder::new().build()),
        Err(LifecycleError::NotFound { .. })
    ));
    assert_eq!(h.application(&app.id).status, ApplicationStatus::Pending);
}

#[test]
fn test_invalid_schedule_leaves_application_untouched() {
    let h = TestHarness::new();
    let app = h.apply();

    for fields in [
        ScheduleBuilder::new().without_link().build(),
        ScheduleBuilder::new().location("onsite").build(),
        ScheduleBuilder::new().location("moon").build(),
        ScheduleBuilder::new().times("11:00", "10:00").build(),
        ScheduleBuilder::new().date("tomorrow").build(),
        ScheduleBuilder::new().interview_type("lunch").build(),
    ] {
        let err = h
            .lifecycle
            .schedule_interview(&h.company, &app.id, fields)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidArgument(_)));
    }

    assert_eq!(h.application(&app.id).status, ApplicationStatus::Pending);
    assert!(h.lifecycle.list_interviews(&h.company).unwrap().is_empty());
}

#[test]
fn test_onsite_clears_meeting_link() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(
        &app.id,
        ScheduleBuilder::new().onsite("1 Main St").notes("Ask for Bob").build(),
    );
    assert_eq!(interview.schedule.location, InterviewLocation::Onsite);
    assert!(interview.schedule.meeting_link.is_none());
    assert_eq!(interview.schedule.meeting_address.as_deref(), Some("1 Main St"));
    assert_eq!(interview.schedule.notes.as_deref(), Some("Ask for Bob"));
}

// ============================================================================
// Rescheduling and updating
// ============================================================================

#[test]
fn test_reschedule_always_resets_confirmation() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());

    // Unconfirmed.
    let rescheduled = h
        .lifecycle
        .reschedule_interview(&h.company, &interview.id, ScheduleBuilder::new().build())
        .unwrap();
    assert!(!rescheduled.user_confirmed);

    // Confirmed.
    h.lifecycle
        .confirm_interview(&h.candidate, &interview.id)
        .unwrap();
    let rescheduled = h
        .lifecycle
        .reschedule_interview(
            &h.company,
            &interview.id,
            ScheduleBuilder::new().phone().build(),
        )
        .unwrap();
    assert!(!rescheduled.user_confirmed);
    assert_eq!(rescheduled.status, InterviewStatus::Rescheduled);
    assert!(rescheduled.schedule.meeting_link.is_none());
}

#[test]
fn test_update_merges_and_forces_rescheduled() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());
    h.lifecycle
        .confirm_interview(&h.candidate, &interview.id)
        .unwrap();

    let updated = h
        .lifecycle
        .update_interview(
            &h.company,
            &interview.id,
            ScheduleUpdate {
                start_time: Some("10:30".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.status, InterviewStatus::Rescheduled);
    assert!(!updated.user_confirmed);
    assert_eq!(updated.schedule.start_time.format("%H:%M").to_string(), "10:30");
    assert_eq!(updated.schedule.end_time, interview.schedule.end_time);
    assert_eq!(updated.schedule.meeting_link, interview.schedule.meeting_link);

    let err = h
        .lifecycle
        .update_interview(
            &h.company,
            &interview.id,
            ScheduleUpdate {
                end_time: Some("09:00".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidArgument(_)));
}

#[test]
fn test_terminal_interviews_reject_changes() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());
    h.lifecycle
        .cancel_interview(&h.company, &interview.id)
        .unwrap();

    assert!(matches!(
        h.lifecycle
            .reschedule_interview(&h.company, &interview.id, ScheduleBuilder::new().build()),
        Err(LifecycleError::InvalidState(_))
    ));
    assert!(matches!(
        h.lifecycle.confirm_interview(&h.candidate, &interview.id),
        Err(LifecycleError::InvalidState(_))
    ));
    assert!(matches!(
        h.lifecycle.complete_interview(&h.company, &interview.id, None),
        Err(LifecycleError::InvalidState(_))
    ));
}

// ============================================================================
// Confirmation, cancellation, completion
// ============================================================================

#[test]
fn test_confirm_by_other_candidate_is_forbidden() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());

    for principal in [&h.other_candidate, &h.company, &h.admin] {
        let err = h
            .lifecycle
            .confirm_interview(principal, &interview.id)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Forbidden));
    }

    let stored = h.interview(&interview.id);
    assert_eq!(stored.status, InterviewStatus::Scheduled);
    assert!(!stored.user_confirmed);
}

#[test]
fn test_confirm_twice_is_idempotent() {
    let mut h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());
    h.drain_events();

    h.lifecycle
        .confirm_interview(&h.candidate, &interview.id)
        .unwrap();
    let again = h
        .lifecycle
        .confirm_interview(&h.candidate, &interview.id)
        .unwrap();
    assert_eq!(again.status, InterviewStatus::Confirmed);
    assert_eq!(h.drain_events(), vec![EventKind::InterviewConfirmed]);
}

#[test]
fn test_cancel_twice_stays_cancelled() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());

    let first = h
        .lifecycle
        .cancel_interview(&h.company, &interview.id)
        .unwrap();
    let second = h
        .lifecycle
        .cancel_interview(&h.company, &interview.id)
        .unwrap();
    assert_eq!(first.status, InterviewStatus::Cancelled);
    assert_eq!(second.status, InterviewStatus::Cancelled);
    assert_eq!(second.version, first.version);
}

#[test]
fn test_complete_requires_confirmation_even_after_end() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());
    h.clock.set(instant("2026-03-11T00:00:00Z"));

    let err = h
        .lifecycle
        .complete_interview(&h.company, &interview.id, None)
        .unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidState(_)));
    assert_eq!(h.interview(&interview.id).status, InterviewStatus::Scheduled);
}

#[test]
fn test_complete_waits_for_end_time() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());
    h.lifecycle
        .confirm_interview(&h.candidate, &interview.id)
        .unwrap();

    h.clock.set(instant("2026-03-10T10:59:59Z"));
    assert!(matches!(
        h.lifecycle.complete_interview(&h.company, &interview.id, None),
        Err(LifecycleError::InvalidState(_))
    ));

    h.clock.advance(Duration::seconds(1));
    let completed = h
        .lifecycle
        .complete_interview(&h.company, &interview.id, None)
        .unwrap();
    assert_eq!(completed.status, InterviewStatus::Completed);

    // Completed interviews cannot be cancelled.
    assert!(matches!(
        h.lifecycle.cancel_interview(&h.company, &interview.id),
        Err(LifecycleError::InvalidState(_))
    ));
}

#[test]
fn test_complete_reads_times_at_configured_offset() {
    // 11:00 at UTC+02:00 is 09:00Z.
    let h = TestHarness::with_offset_minutes(120);
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());
    h.lifecycle
        .confirm_interview(&h.candidate, &interview.id)
        .unwrap();

    h.clock.set(instant("2026-03-10T09:00:00Z"));
    assert!(h
        .lifecycle
        .complete_interview(&h.company, &interview.id, None)
        .is_ok());
}

#[test]
fn test_only_owner_completes() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());
    h.lifecycle
        .confirm_interview(&h.candidate, &interview.id)
        .unwrap();
    h.clock.set(instant("2026-03-10T12:00:00Z"));

    for principal in [&h.other_company, &h.candidate] {
        assert!(matches!(
            h.lifecycle.complete_interview(principal, &interview.id, None),
            Err(LifecycleError::Forbidden)
        ));
    }
}

// ============================================================================
// Feedback and reads
// ============================================================================

#[test]
fn test_feedback_lands_on_callers_side() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());

    h.lifecycle
        .add_feedback(&h.company, &interview.id, "Solid fundamentals")
        .unwrap();
    let after = h
        .lifecycle
        .add_feedback(&h.candidate, &interview.id, "Friendly panel")
        .unwrap();
    assert_eq!(after.company_feedback.as_deref(), Some("Solid fundamentals"));
    assert_eq!(after.user_feedback.as_deref(), Some("Friendly panel"));

    assert!(matches!(
        h.lifecycle
            .add_feedback(&h.other_company, &interview.id, "Sneaky"),
        Err(LifecycleError::Forbidden)
    ));
    assert!(matches!(
        h.lifecycle.add_feedback(&h.candidate, &interview.id, "   "),
        Err(LifecycleError::InvalidArgument(_))
    ));
}

#[test]
fn test_feedback_allowed_after_cancellation() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());
    h.lifecycle
        .cancel_interview(&h.company, &interview.id)
        .unwrap();

    let after = h
        .lifecycle
        .add_feedback(&h.candidate, &interview.id, "Sorry to miss it")
        .unwrap();
    assert_eq!(after.status, InterviewStatus::Cancelled);
}

#[test]
fn test_interview_detail_is_populated_and_guarded() {
    let h = TestHarness::new();
    let app = h.apply();
    let interview = h.schedule(&app.id, ScheduleBuilder::new().build());

    let detail = h
        .lifecycle
        .get_interview(&h.candidate, &interview.id)
        .unwrap();
    assert_eq!(detail.job_title, "Backend Engineer");
    assert_eq!(detail.company.name, "Acme");
    assert_eq!(detail.candidate.name, "Ursula");

    for principal in [&h.other_company, &h.other_candidate, &h.admin] {
        assert!(matches!(
            h.lifecycle.get_interview(principal, &interview.id),
            Err(LifecycleError::Forbidden)
        ));
    }
    assert!(matches!(
        h.lifecycle.get_interview(&h.company, "missing"),
        Err(LifecycleError::NotFound { .. })
    ));
}

#[test]
fn test_list_interviews_per_side() {
    let h = TestHarness::new();
    let app = h.apply();
    h.schedule(&app.id, ScheduleBuilder::new().date("2026-03-20").build());
    h.schedule(&app.id, ScheduleBuilder::new().date("2026-03-15").build());

    let for_company = h.lifecycle.list_interviews(&h.company).unwrap();
    let dates: Vec<String> = for_company
        .iter()
        .map(|d| d.interview.schedule.scheduled_date.to_string())
        .collect();
    assert_eq!(dates, vec!["2026-03-15", "2026-03-20"]);

    assert_eq!(h.lifecycle.list_interviews(&h.candidate).unwrap().len(), 2);
    assert!(h
        .lifecycle
        .list_interviews(&h.other_company)
        .unwrap()
        .is_empty());
    assert!(matches!(
        h.lifecycle.list_interviews(&Principal::Admin("root".to_string())),
        Err(LifecycleError::Forbidden)
    ));
}
