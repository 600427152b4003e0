//! Production `StageExecutor`: gathers web evidence for profiles that may
//! search or scrape, composes the agent prompts, and calls the model.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::agents::{Capability, CapabilityProfile};
use crate::llm_client::prompts::{
    fill_template, AGENT_SYSTEM_TEMPLATE, CONTEXT_HEADER, EVIDENCE_HEADER,
    EXPECTED_OUTPUT_TEMPLATE,
};
use crate::llm_client::{LlmClient, LlmError};
use crate::pipeline::{StageError, StageExecutor, StageRequest};
use crate::tools::{ScrapeTool, SearchHit, SearchTool, ToolError};

const SEARCH_RESULTS: usize = 5;
const PAGES_TO_FETCH: usize = 2;

pub struct AgentExecutor {
    llm: Arc<LlmClient>,
    search: SearchTool,
    scrape: ScrapeTool,
}

impl AgentExecutor {
    pub fn new(llm: Arc<LlmClient>, search: SearchTool, scrape: ScrapeTool) -> Self {
        Self {
            llm,
            search,
            scrape,
        }
    }

    /// Runs search (and page fetch, if allowed) for the stage's query.
    /// Search failures abort the stage; individual page fetches are best-effort.
    async fn gather_evidence(
        &self,
        profile: &CapabilityProfile,
        query: &str,
    ) -> Result<String, StageError> {
        let hits = self
            .search
            .search(query, SEARCH_RESULTS)
            .await
            .map_err(tool_error)?;

        let mut evidence = format_hits(&hits);

        if profile.can(Capability::Scrape) {
            for hit in hits.iter().take(PAGES_TO_FETCH) {
                match self.scrape.fetch(&hit.link).await {
                    Ok(text) if !text.is_empty() => {
                        evidence.push_str(&format!(
                            "\n\nPage content from {}:\n{}",
                            hit.link, text
                        ));
                    }
                    Ok(_) => {}
                    Err(ToolError::RateLimited(msg)) => return Err(StageError::RateLimited(msg)),
                    Err(e) => warn!("Skipping page {}: {}", hit.link, e),
                }
            }
        }

        Ok(evidence)
    }
}

#[async_trait]
impl StageExecutor for AgentExecutor {
    async fn execute(&self, request: StageRequest<'_>) -> Result<String, StageError> {
        let profile = request.profile;
        let stage = request.stage;

        let evidence = match &stage.search_query {
            Some(query) if profile.can(Capability::Search) => {
                debug!("Agent {:?} searching: {}", profile.kind, query);
                Some(self.gather_evidence(profile, query).await?)
            }
            _ => None,
        };

        let system = render_system_prompt(profile);
        let prompt = compose_prompt(
            &stage.prompt,
            &stage.expected_output,
            request.context,
            evidence.as_deref(),
        );

        self.llm
            .complete(&profile.model, &system, &prompt)
            .await
            .map_err(llm_error)
    }
}

pub fn render_system_prompt(profile: &CapabilityProfile) -> String {
    fill_template(
        AGENT_SYSTEM_TEMPLATE,
        &[
            ("role", profile.role),
            ("backstory", profile.backstory),
            ("goal", profile.goal),
        ],
    )
}

/// Task prompt, then expected output, then prior-stage context, then evidence.
pub fn compose_prompt(
    prompt: &str,
    expected_output: &str,
    context: Option<&str>,
    evidence: Option<&str>,
) -> String {
    let mut out = String::from(prompt);
    out.push_str(&fill_template(
        EXPECTED_OUTPUT_TEMPLATE,
        &[("expected_output", expected_output)],
    ));
    if let Some(context) = context {
        out.push_str(CONTEXT_HEADER);
        out.push_str(context);
    }
    if let Some(evidence) = evidence {
        out.push_str(EVIDENCE_HEADER);
        out.push_str(evidence);
    }
    out
}

fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, h)| format!("{}. {} - {}\n   {}", i + 1, h.title, h.link, h.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

fn llm_error(e: LlmError) -> StageError {
    match e {
        LlmError::RateLimited(msg) => StageError::RateLimited(msg),
        LlmError::Auth { .. } => StageError::Auth(e.to_string()),
        LlmError::TransientNetwork(msg) => StageError::TransientNetwork(msg),
        other => StageError::Capability(format!("model call failed: {other}")),
    }
}

fn tool_error(e: ToolError) -> StageError {
    match e {
        ToolError::RateLimited(msg) => StageError::RateLimited(msg),
        ToolError::Network(msg) => StageError::TransientNetwork(format!("search failed: {msg}")),
        ToolError::NotFound(msg) => StageError::Capability(format!("search failed: {msg}")),
    }
}
