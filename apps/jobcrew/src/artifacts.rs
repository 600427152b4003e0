//! Report files: timestamp-named plain text under the results directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

const PREFIX: &str = "results_";
const EXTENSION: &str = ".txt";

/// `results_{YYYYmmdd-HHMMSS}_{8 hex}.txt`. The suffix keeps concurrent runs
/// finishing in the same second from overwriting each other.
pub fn report_filename(at: DateTime<Local>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{PREFIX}{}_{}{EXTENSION}",
        at.format("%Y%m%d-%H%M%S"),
        &suffix[..8]
    )
}

/// Only names this module could have produced are served back.
pub fn is_report_filename(name: &str) -> bool {
    name.starts_with(PREFIX)
        && name.ends_with(EXTENSION)
        && name.len() > PREFIX.len() + EXTENSION.len()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.contains("..")
}

/// Writes `text` as UTF-8 and returns the bare filename.
pub async fn write_report(dir: &Path, text: &str) -> Result<String, AppError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::ReportWrite(format!("{}: {e}", dir.display())))?;

    let filename = report_filename(Local::now());
    let path = dir.join(&filename);

    tokio::fs::write(&path, text.as_bytes())
        .await
        .map_err(|e| AppError::ReportWrite(format!("{}: {e}", path.display())))?;

    info!("Report written to {}", path.display());
    Ok(filename)
}

/// Resolves a previously written report. Unknown or malformed names are `NotFound`.
pub async fn read_report(dir: &Path, filename: &str) -> Result<Vec<u8>, AppError> {
    let path = resolve(dir, filename)?;
    tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(format!("Report {filename} not found")))
}

fn resolve(dir: &Path, filename: &str) -> Result<PathBuf, AppError> {
    if !is_report_filename(filename) {
        return Err(AppError::NotFound(format!("Report {filename} not found")));
    }
    Ok(dir.join(filename))
}
