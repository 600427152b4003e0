//! Prompt builders: render a `StageSpec` for each stage kind.
//!
//! Every builder is a pure function of its inputs. Free text is substituted
//! verbatim; the only normalisation is default substitution in `JobCriteria`.

pub mod criteria;
pub mod prompts;

pub use criteria::{JobCriteria, PipelineInputs};

use crate::llm_client::prompts::fill_template;
use crate::pipeline::stage::{StageKind, StageSpec};
use prompts::*;

/// Company placeholder used before research has named any employers.
pub const RESEARCHED_COMPANIES: &str = "the companies identified in the job research";

pub fn research(criteria: &JobCriteria) -> StageSpec {
    let prompt = fill_template(
        RESEARCH_PROMPT_TEMPLATE,
        &[
            ("role", &criteria.role),
            ("location", &criteria.location),
            ("experience", &criteria.experience_level),
            ("keywords", &criteria.keywords),
        ],
    );

    let query = format!(
        "{} jobs {} {} {}",
        criteria.role, criteria.location, criteria.experience_level, criteria.keywords
    );

    StageSpec::new(StageKind::Research, prompt, RESEARCH_EXPECTED_OUTPUT).with_search_query(query)
}

pub fn tailor_resume(job_description: &str, current_resume: &str) -> StageSpec {
    let prompt = fill_template(
        TAILOR_RESUME_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("current_resume", current_resume),
        ],
    );

    StageSpec::new(StageKind::ResumeTailor, prompt, TAILOR_RESUME_EXPECTED_OUTPUT)
}

pub fn cover_letter(job_info: &str, candidate_info: &str) -> StageSpec {
    let prompt = fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[("job_info", job_info), ("candidate_info", candidate_info)],
    );

    StageSpec::new(StageKind::CoverLetter, prompt, COVER_LETTER_EXPECTED_OUTPUT)
}

pub fn track_applications(applications_data: &str) -> StageSpec {
    let prompt = fill_template(
        TRACK_APPLICATIONS_PROMPT_TEMPLATE,
        &[("applications_data", applications_data)],
    );

    StageSpec::new(StageKind::Tracking, prompt, TRACK_APPLICATIONS_EXPECTED_OUTPUT)
}

/// `role` only shapes the search query; the prompt itself names the company
/// and job description.
pub fn interview_prep(company_name: &str, job_description: &str, role: &str) -> StageSpec {
    let prompt = fill_template(
        INTERVIEW_PREP_PROMPT_TEMPLATE,
        &[
            ("company_name", company_name),
            ("job_description", job_description),
        ],
    );

    let query = if company_name == RESEARCHED_COMPANIES {
        format!("{role} interview questions")
    } else {
        format!("{company_name} {role} interview questions")
    };

    StageSpec::new(StageKind::InterviewPrep, prompt, INTERVIEW_PREP_EXPECTED_OUTPUT)
        .with_search_query(query)
}
