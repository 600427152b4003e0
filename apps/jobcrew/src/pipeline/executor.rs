//! The stage execution seam. The runner only sees this trait; the production
//! implementation is `agents::executor::AgentExecutor`.

use async_trait::async_trait;
use thiserror::Error;

use crate::agents::CapabilityProfile;
use crate::pipeline::stage::StageSpec;

/// Everything one stage call needs.
#[derive(Debug, Clone, Copy)]
pub struct StageRequest<'a> {
    pub stage: &'a StageSpec,
    pub profile: &'a CapabilityProfile,
    /// Concatenated outputs of the stage's declared dependencies, if any.
    pub context: Option<&'a str>,
}

#[derive(Debug, Error)]
pub enum StageError {
    /// Transient throttling; the runner retries the same stage.
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    TransientNetwork(String),

    #[error("{0}")]
    Capability(String),
}

impl StageError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StageError::RateLimited(_))
    }
}

#[async_trait]
pub trait StageExecutor: Send + Sync {
    async fn execute(&self, request: StageRequest<'_>) -> Result<String, StageError>;
}
