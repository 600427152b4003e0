use std::fmt;

use serde::{Deserialize, Serialize};

/// The kinds of work a stage can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Research,
    ResumeTailor,
    CoverLetter,
    InterviewPrep,
    Tracking,
}

impl StageKind {
    /// Stable identifier used as the default stage id.
    pub fn slug(self) -> &'static str {
        match self {
            StageKind::Research => "research",
            StageKind::ResumeTailor => "resume_tailor",
            StageKind::CoverLetter => "cover_letter",
            StageKind::InterviewPrep => "interview_prep",
            StageKind::Tracking => "tracking",
        }
    }

    /// Section heading used in the assembled report.
    pub fn label(self) -> &'static str {
        match self {
            StageKind::Research => "JOB RESEARCH",
            StageKind::ResumeTailor => "RESUME TAILORING",
            StageKind::CoverLetter => "COVER LETTER",
            StageKind::InterviewPrep => "INTERVIEW PREPARATION",
            StageKind::Tracking => "APPLICATION TRACKER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StageId(String);

impl StageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<StageKind> for StageId {
    fn from(kind: StageKind) -> Self {
        Self::new(kind.slug())
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully rendered unit of pipeline work. Immutable once built; dependencies
/// are attached by consuming `with_dependencies` at definition time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSpec {
    pub id: StageId,
    pub kind: StageKind,
    pub prompt: String,
    pub expected_output: String,
    pub depends_on: Vec<StageId>,
    /// Query handed to the search capability, when the bound profile has one.
    pub search_query: Option<String>,
}

impl StageSpec {
    pub fn new(kind: StageKind, prompt: String, expected_output: impl Into<String>) -> Self {
        Self {
            id: kind.into(),
            kind,
            prompt,
            expected_output: expected_output.into(),
            depends_on: Vec::new(),
            search_query: None,
        }
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = StageId>) -> Self {
        self.depends_on = deps.into_iter().collect();
        self
    }

    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Output of one executed stage. Written once by the runner, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResult {
    pub stage_id: StageId,
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_id_is_kind_slug() {
        let spec = StageSpec::new(StageKind::CoverLetter, "p".to_string(), "e");
        assert_eq!(spec.id.as_str(), "cover_letter");
        assert!(spec.depends_on.is_empty());
        assert!(spec.search_query.is_none());
    }

    #[test]
    fn test_stage_kind_serializes_snake_case() {
        let json = serde_json::to_string(&StageKind::InterviewPrep).unwrap();
        assert_eq!(json, r#""interview_prep""#);
    }

    #[test]
    fn test_with_dependencies_preserves_order() {
        let spec = StageSpec::new(StageKind::CoverLetter, "p".to_string(), "e")
            .with_dependencies([StageKind::ResumeTailor.into(), StageKind::Research.into()]);
        assert_eq!(
            spec.depends_on,
            vec![StageId::new("resume_tailor"), StageId::new("research")]
        );
    }
}
