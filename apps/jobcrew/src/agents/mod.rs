//! Agent catalog: the fixed roster of capability profiles.
//!
//! Profiles are plain values built once from `Config`. They carry the model
//! binding by name; the shared `LlmClient` itself lives in the executor.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::errors::AppError;

pub mod executor;

pub use executor::AgentExecutor;

/// An external tool a profile is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Search,
    Scrape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Researcher,
    ResumeStrategist,
    CoverLetterWriter,
    ApplicationTracker,
    InterviewCoach,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityProfile {
    pub kind: AgentKind,
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    pub capabilities: BTreeSet<Capability>,
    pub model: String,
}

impl CapabilityProfile {
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Read-only profile roster. Cloning is cheap; profiles are behind `Arc`.
#[derive(Debug, Clone)]
pub struct AgentCatalog {
    researcher: Arc<CapabilityProfile>,
    resume_strategist: Arc<CapabilityProfile>,
    cover_letter_writer: Arc<CapabilityProfile>,
    application_tracker: Arc<CapabilityProfile>,
    interview_coach: Arc<CapabilityProfile>,
}

impl AgentCatalog {
    /// Builds every profile up front. Fails when the model credential is absent,
    /// or when the search credential is absent while a profile needs search.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        if config.groq_api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "GROQ_API_KEY is required to bind agents to the model".to_string(),
            ));
        }

        let model = config.model.clone();
        let tools = || BTreeSet::from([Capability::Search, Capability::Scrape]);

        let catalog = Self {
            researcher: Arc::new(CapabilityProfile {
                kind: AgentKind::Researcher,
                role: "Job Research Specialist",
                goal: "Find the most relevant job postings based on user preferences",
                backstory: "You are an expert at finding job opportunities.",
                capabilities: tools(),
                model: model.clone(),
            }),
            resume_strategist: Arc::new(CapabilityProfile {
                kind: AgentKind::ResumeStrategist,
                role: "Resume Optimization Specialist",
                goal: "Analyze job descriptions and suggest resume improvements",
                backstory: "You are a professional resume writer.",
                capabilities: BTreeSet::new(),
                model: model.clone(),
            }),
            cover_letter_writer: Arc::new(CapabilityProfile {
                kind: AgentKind::CoverLetterWriter,
                role: "Cover Letter Expert",
                goal: "Write compelling cover letters",
                backstory: "You are a master of persuasive writing.",
                capabilities: BTreeSet::new(),
                model: model.clone(),
            }),
            application_tracker: Arc::new(CapabilityProfile {
                kind: AgentKind::ApplicationTracker,
                role: "Application Organization Specialist",
                goal: "Track job applications and deadlines",
                backstory: "You are highly organized.",
                capabilities: BTreeSet::new(),
                model: model.clone(),
            }),
            interview_coach: Arc::new(CapabilityProfile {
                kind: AgentKind::InterviewCoach,
                role: "Interview Preparation Coach",
                goal: "Prepare interview questions and answers",
                backstory: "You are an interview coach.",
                capabilities: tools(),
                model,
            }),
        };

        let needs_search = catalog
            .all()
            .iter()
            .any(|p| p.can(Capability::Search));
        if needs_search && config.serper_api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "SERPER_API_KEY is required for agents with search capability".to_string(),
            ));
        }

        Ok(catalog)
    }

    pub fn researcher(&self) -> Arc<CapabilityProfile> {
        Arc::clone(&self.researcher)
    }

    pub fn resume_strategist(&self) -> Arc<CapabilityProfile> {
        Arc::clone(&self.resume_strategist)
    }

    pub fn cover_letter_writer(&self) -> Arc<CapabilityProfile> {
        Arc::clone(&self.cover_letter_writer)
    }

    pub fn application_tracker(&self) -> Arc<CapabilityProfile> {
        Arc::clone(&self.application_tracker)
    }

    pub fn interview_coach(&self) -> Arc<CapabilityProfile> {
        Arc::clone(&self.interview_coach)
    }

    pub fn all(&self) -> [&CapabilityProfile; 5] {
        [
            self.researcher.as_ref(),
            self.resume_strategist.as_ref(),
            self.cover_letter_writer.as_ref(),
            self.application_tracker.as_ref(),
            self.interview_coach.as_ref(),
        ]
    }
}
