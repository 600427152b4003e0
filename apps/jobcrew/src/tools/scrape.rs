//! Page fetch: downloads a URL and reduces the HTML to readable text.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use scraper::{Html, Node};

use crate::tools::ToolError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);
/// Upper bound on characters kept per page so a single page cannot swamp the prompt.
pub const MAX_PAGE_CHARS: usize = 4000;

#[derive(Clone)]
pub struct ScrapeTool {
    client: Client,
}

impl ScrapeTool {
    pub fn new() -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("jobcrew/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ToolError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                return Err(ToolError::NotFound(url.to_string()))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ToolError::RateLimited(url.to_string()))
            }
            s if !s.is_success() => {
                return Err(ToolError::Network(format!("{url} returned {s}")))
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        Ok(truncate_chars(&html_to_text(&body), MAX_PAGE_CHARS))
    }
}

/// Text content of the page outside `<script>`, `<style>` and `<noscript>`,
/// with whitespace collapsed.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut pieces: Vec<&str> = Vec::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript"))
        });
        if !hidden {
            pieces.push(&**text);
        }
    }

    pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
