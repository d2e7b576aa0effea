pub mod auth;
pub mod broadcast;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod telemetry;

pub use auth::TokenStore;
pub use broadcast::{EventKind, LifecycleBroadcaster, LifecycleEvent};
pub use config::{load_config, load_with_env, Config};
pub use db::{default_database_path, Database, DatabaseError};
pub use error::{AuthError, ConfigError, LifecycleError, PortalError, Result};
pub use lifecycle::{Clock, FixedClock, Lifecycle, SystemClock};
pub use model::{
    ApplicationStatus, Interview, InterviewDetail, InterviewStatus, JobApplication, Principal,
    PrincipalKind, ScheduleFields, ScheduleUpdate,
};
