//! The job-application pipeline: research → resume tailoring → cover letter →
//! interview prep, with an optional application-tracking stage at the end.

use crate::agents::AgentCatalog;
use crate::errors::AppError;
use crate::pipeline::graph::{PipelineStage, StageGraph};
use crate::pipeline::stage::StageKind;
use crate::tasks::{self, PipelineInputs, RESEARCHED_COMPANIES};

const TRACKING_APPLICATIONS: &str = "Use each job posting from the job research as one application. \
    Treat every application as planned (not yet submitted) and use the cover letter as the \
    application material for all of them.";

/// Builds the validated stage graph for one run.
///
/// Dependencies:
/// - resume_tailor  ← research
/// - cover_letter   ← research, resume_tailor
/// - interview_prep ← research
/// - tracking       ← research, cover_letter (only when requested)
pub fn job_application_pipeline(
    inputs: &PipelineInputs,
    catalog: &AgentCatalog,
) -> Result<StageGraph, AppError> {
    let criteria = &inputs.criteria;
    let job_description = inputs.job_description();
    let resume_summary = inputs.resume_summary();

    let job_info = format!(
        "{job_description}. Location: {}. Experience level: {}. \
        Target the strongest posting from the job research.",
        criteria.location, criteria.experience_level
    );

    let mut stages = vec![
        PipelineStage {
            spec: tasks::research(criteria),
            profile: catalog.researcher(),
        },
        PipelineStage {
            spec: tasks::tailor_resume(&job_description, &resume_summary)
                .with_dependencies([StageKind::Research.into()]),
            profile: catalog.resume_strategist(),
        },
        PipelineStage {
            spec: tasks::cover_letter(&job_info, &resume_summary).with_dependencies([
                StageKind::Research.into(),
                StageKind::ResumeTailor.into(),
            ]),
            profile: catalog.cover_letter_writer(),
        },
        PipelineStage {
            spec: tasks::interview_prep(RESEARCHED_COMPANIES, &job_description, &criteria.role)
                .with_dependencies([StageKind::Research.into()]),
            profile: catalog.interview_coach(),
        },
    ];

    if inputs.include_tracking {
        stages.push(PipelineStage {
            spec: tasks::track_applications(TRACKING_APPLICATIONS).with_dependencies([
                StageKind::Research.into(),
                StageKind::CoverLetter.into(),
            ]),
            profile: catalog.application_tracker(),
        });
    }

    StageGraph::new(stages)
}
