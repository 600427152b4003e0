use serde::Serialize;

pub const DEFAULT_ROLE: &str = "Software Developer";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_EXPERIENCE: &str = "Mid-level";
pub const DEFAULT_KEYWORDS: &str = "Python, AI";

/// Job-search criteria supplied by the caller. Every field is always populated;
/// absent or blank inputs fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobCriteria {
    pub role: String,
    pub location: String,
    pub experience_level: String,
    pub keywords: String,
}

impl JobCriteria {
    pub fn new(
        role: Option<&str>,
        location: Option<&str>,
        experience_level: Option<&str>,
        keywords: Option<&str>,
    ) -> Self {
        Self {
            role: or_default(role, DEFAULT_ROLE),
            location: or_default(location, DEFAULT_LOCATION),
            experience_level: or_default(experience_level, DEFAULT_EXPERIENCE),
            keywords: or_default(keywords, DEFAULT_KEYWORDS),
        }
    }
}

impl Default for JobCriteria {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}

/// Everything needed to define one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineInputs {
    pub criteria: JobCriteria,
    pub resume_summary: Option<String>,
    pub include_tracking: bool,
}

impl PipelineInputs {
    pub fn new(criteria: JobCriteria) -> Self {
        Self {
            criteria,
            resume_summary: None,
            include_tracking: false,
        }
    }

    pub fn with_resume_summary(mut self, summary: Option<&str>) -> Self {
        self.resume_summary = summary
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_tracking(mut self, include: bool) -> Self {
        self.include_tracking = include;
        self
    }

    /// The job description the tailoring and interview stages work against.
    pub fn job_description(&self) -> String {
        format!(
            "Looking for a {} with skills in {}",
            self.criteria.role, self.criteria.keywords
        )
    }

    /// The candidate's resume summary, or a stand-in built from the experience level.
    pub fn resume_summary(&self) -> String {
        self.resume_summary.clone().unwrap_or_else(|| {
            format!(
                "{} level professional with relevant experience",
                self.criteria.experience_level
            )
        })
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_absent_fields_use_defaults() {
        let criteria = JobCriteria::default();
        assert_eq!(criteria.role, "Software Developer");
        assert_eq!(criteria.location, "Remote");
        assert_eq!(criteria.experience_level, "Mid-level");
        assert_eq!(criteria.keywords, "Python, AI");
    }

    #[test]
    fn test_blank_fields_use_defaults() {
        let criteria = JobCriteria::new(Some(""), Some("   "), Some("\t"), Some(""));
        assert_eq!(criteria, JobCriteria::default());
    }

    #[test]
    fn test_supplied_fields_are_trimmed_and_kept() {
        let criteria = JobCriteria::new(Some("  Rust Engineer "), Some("Berlin"), None, None);
        assert_eq!(criteria.role, "Rust Engineer");
        assert_eq!(criteria.location, "Berlin");
        assert_eq!(criteria.experience_level, "Mid-level");
    }

    #[test]
    fn test_resume_summary_falls_back_to_experience_level() {
        let inputs = PipelineInputs::new(JobCriteria::new(None, None, Some("Senior"), None))
            .with_resume_summary(Some("  "));
        assert_eq!(
            inputs.resume_summary(),
            "Senior level professional with relevant experience"
        );
    }

    #[test]
    fn test_job_description_uses_role_and_keywords() {
        let inputs = PipelineInputs::new(JobCriteria::new(
            Some("Data Engineer"),
            None,
            None,
            Some("Spark, SQL"),
        ));
        assert_eq!(
            inputs.job_description(),
            "Looking for a Data Engineer with skills in Spark, SQL"
        );
    }
}
