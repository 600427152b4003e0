//! External capabilities available to agents: web search and page fetch.
//!
//! Both wrap a single HTTP call and report failures as `ToolError`. Rate limiting
//! is surfaced separately so the runner can retry the stage.

use thiserror::Error;

pub mod scrape;
pub mod search;

pub use scrape::ScrapeTool;
pub use search::{SearchHit, SearchTool};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited: {0}")]
    RateLimited(String),
}
