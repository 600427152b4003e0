use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_SERPER_URL: &str = "https://google.serper.dev/search";

/// Process-wide configuration loaded from environment variables.
/// Built once at startup and shared by reference; fails before any stage runs
/// if a required credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub serper_api_key: String,
    pub model: String,
    pub groq_base_url: String,
    pub serper_url: String,
    pub port: u16,
    pub results_dir: PathBuf,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub stage_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` is the only
    /// production caller; tests pass a map.
    pub fn from_source<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_attempts = parse_or(&lookup, "MAX_ATTEMPTS", 3u32)?;
        if max_attempts == 0 {
            return Err(AppError::Configuration(
                "MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(Config {
            groq_api_key: require(&lookup, "GROQ_API_KEY")?,
            serper_api_key: require(&lookup, "SERPER_API_KEY")?,
            model: lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            groq_base_url: lookup("GROQ_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
            serper_url: lookup("SERPER_URL").unwrap_or_else(|| DEFAULT_SERPER_URL.to_string()),
            port: parse_or(&lookup, "PORT", 5000u16)?,
            results_dir: lookup("RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/tmp")),
            max_attempts,
            retry_delay: Duration::from_secs(parse_or(&lookup, "RETRY_DELAY_SECS", 15u64)?),
            stage_timeout: Duration::from_secs(parse_or(&lookup, "STAGE_TIMEOUT_SECS", 180u64)?),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            AppError::Configuration(format!("Required environment variable '{key}' is not set"))
        })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Configuration(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        groq_api_key: "test-groq-key".to_string(),
        serper_api_key: "test-serper-key".to_string(),
        model: DEFAULT_MODEL.to_string(),
        groq_base_url: DEFAULT_GROQ_BASE_URL.to_string(),
        serper_url: DEFAULT_SERPER_URL.to_string(),
        port: 5000,
        results_dir: std::env::temp_dir(),
        max_attempts: 3,
        retry_delay: Duration::from_secs(15),
        stage_timeout: Duration::from_secs(180),
        rust_log: "info".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_credentials_set() {
        let config = Config::from_source(lookup_from(&[
            ("GROQ_API_KEY", "g"),
            ("SERPER_API_KEY", "s"),
        ]))
        .unwrap();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.port, 5000);
        assert_eq!(config.results_dir, PathBuf::from("/tmp"));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(15));
    }

    #[test]
    fn test_missing_groq_key_is_configuration_error() {
        let err = Config::from_source(lookup_from(&[("SERPER_API_KEY", "s")])).unwrap_err();
        assert!(matches!(err, AppError::Configuration(ref m) if m.contains("GROQ_API_KEY")));
    }

    #[test]
    fn test_blank_serper_key_is_configuration_error() {
        let err = Config::from_source(lookup_from(&[
            ("GROQ_API_KEY", "g"),
            ("SERPER_API_KEY", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Configuration(ref m) if m.contains("SERPER_API_KEY")));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = Config::from_source(lookup_from(&[
            ("GROQ_API_KEY", "g"),
            ("SERPER_API_KEY", "s"),
            ("MAX_ATTEMPTS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = Config::from_source(lookup_from(&[
            ("GROQ_API_KEY", "g"),
            ("SERPER_API_KEY", "s"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Configuration(ref m) if m.contains("PORT")));
    }
}
