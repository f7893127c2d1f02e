//! Conversion job orchestration module.

mod orchestrator;

pub use orchestrator::{ConversionJob, JobConfig};
