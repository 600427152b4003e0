//! Report assembly: stage outputs in execution order, one ruled section each.

use anyhow::anyhow;
use serde::Serialize;

use crate::errors::AppError;
use crate::pipeline::stage::StageResult;

pub const REPORT_TITLE: &str = "JOB APPLICATION ASSISTANT REPORT";
const RULE: &str = "============================================================";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub label: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub sections: Vec<ReportSection>,
}

impl Report {
    /// Pairs each result with the label at the same position. Both slices
    /// are in execution order.
    pub fn assemble(results: &[StageResult], labels: &[&str]) -> Result<Self, AppError> {
        if results.len() != labels.len() {
            return Err(AppError::Internal(anyhow!(
                "{} stage results but {} labels",
                results.len(),
                labels.len()
            )));
        }

        let sections = results
            .iter()
            .zip(labels)
            .map(|(result, label)| ReportSection {
                label: (*label).to_string(),
                body: result.output.clone(),
            })
            .collect();

        Ok(Self { sections })
    }

    pub fn render(&self) -> String {
        let mut out = format!("{REPORT_TITLE}\n\n");
        for section in &self.sections {
            out.push_str(&section_header(&section.label));
            out.push_str(&section.body);
            out.push_str("\n\n");
        }
        out
    }
}

fn section_header(label: &str) -> String {
    format!("{RULE}\n{label}\n{RULE}\n\n")
}

/// Recovers section bodies from rendered text, given the labels in order.
/// Returns `None` if any header is missing or out of order.
pub fn parse_sections(text: &str, labels: &[&str]) -> Option<Vec<String>> {
    let headers: Vec<String> = labels.iter().map(|l| section_header(l)).collect();

    let mut starts = Vec::with_capacity(headers.len());
    let mut cursor = 0;
    for header in &headers {
        let at = cursor + text[cursor..].find(header.as_str())?;
        starts.push(at);
        cursor = at + header.len();
    }

    let mut bodies = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let body_start = starts[i] + header.len();
        let body_end = starts.get(i + 1).copied().unwrap_or(text.len());
        let body = text[body_start..body_end].strip_suffix("\n\n")?;
        bodies.push(body.to_string());
    }

    Some(bodies)
}
