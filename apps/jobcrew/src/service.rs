//! Job search service. The one entry point both surfaces call.
//!
//! Flow: inputs → pipeline definition → runner → report → artifact file.
//! A failed artifact write does not fail the run; the caller gets the report
//! text plus a warning.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::agents::AgentCatalog;
use crate::artifacts;
use crate::errors::AppError;
use crate::pipeline::{job_application_pipeline, PipelineRunner, Report};
use crate::tasks::PipelineInputs;

#[derive(Debug, Clone, Serialize)]
pub struct JobSearchOutcome {
    pub report: Report,
    pub text: String,
    pub filename: Option<String>,
    pub warning: Option<String>,
}

pub struct JobSearchService {
    catalog: AgentCatalog,
    runner: PipelineRunner,
    results_dir: PathBuf,
}

impl JobSearchService {
    pub fn new(catalog: AgentCatalog, runner: PipelineRunner, results_dir: PathBuf) -> Self {
        Self {
            catalog,
            runner,
            results_dir,
        }
    }

    pub fn results_dir(&self) -> &std::path::Path {
        &self.results_dir
    }

    pub async fn run(
        self: Arc<Self>,
        inputs: PipelineInputs,
        cancel: CancellationToken,
    ) -> Result<JobSearchOutcome, AppError> {
        info!(
            "Job search: role='{}' location='{}' experience='{}' tracking={}",
            inputs.criteria.role,
            inputs.criteria.location,
            inputs.criteria.experience_level,
            inputs.include_tracking
        );

        let graph = job_application_pipeline(&inputs, &self.catalog)?;
        let results = self.runner.run(&graph, &cancel).await?;

        let report = Report::assemble(&results, &graph.labels())?;
        let text = report.render();

        let (filename, warning) = match artifacts::write_report(&self.results_dir, &text).await {
            Ok(name) => (Some(name), None),
            Err(e) => {
                warn!("{e}");
                (None, Some(e.to_string()))
            }
        };

        Ok(JobSearchOutcome {
            report,
            text,
            filename,
            warning,
        })
    }
}
