pub mod applications;
pub mod interviews;
pub mod jobs;
pub mod probes;
