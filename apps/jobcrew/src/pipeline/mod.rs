// Stage pipeline: stage values, the static DAG, the sequential runner,
// and report assembly.

pub mod definition;
pub mod executor;
pub mod graph;
pub mod report;
pub mod runner;
pub mod stage;

#[cfg(test)]
pub mod testing;

pub use definition::job_application_pipeline;
pub use executor::{StageError, StageExecutor, StageRequest};
pub use report::Report;
pub use runner::{PipelineRunner, RetryPolicy};
