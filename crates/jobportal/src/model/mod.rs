//! Domain types for the job portal workflow.

pub mod application;
pub mod interview;
pub mod principal;
pub mod reference;

pub use application::{ApplicationStatus, JobApplication};
pub use interview::{
    Interview, InterviewDetail, InterviewLocation, InterviewStatus, InterviewType, Schedule,
    ScheduleFields, ScheduleUpdate,
};
pub use principal::{Principal, PrincipalKind};
pub use reference::{Job, NewJob, PartySummary};
