use std::time::Duration;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";
pub const ANALYSIS_URL_ENV: &str = "ANALYSIS_SERVICE_URL";
pub const ANALYSIS_FALLBACK_URL_ENV: &str = "ANALYSIS_FALLBACK_URL";
pub const REQUEST_TIMEOUT_MS_ENV: &str = "INSIGHT_REQUEST_TIMEOUT_MS";

const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 20_000;

// Service-mesh hostname first, local dev host second.
const DEFAULT_ANALYSIS_BASES: [&str; 2] = ["http://back-end-fasta:5000", "http://localhost:5000"];

/// Explicit configuration for the insight pipeline. Built once per request
/// path and passed into each component; there is no process-wide singleton.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub analysis_url: Option<String>,
    pub analysis_fallback_url: Option<String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            analysis_url: None,
            analysis_fallback_url: None,
        }
    }
}

impl InsightConfig {
    pub fn from_env() -> Self {
        Self {
            model: non_empty_env(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty_env(BASE_URL_ENV)
                .and_then(|raw| normalize_base_url(&raw))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: non_empty_env(API_KEY_ENV),
            request_timeout: Duration::from_millis(
                non_empty_env(REQUEST_TIMEOUT_MS_ENV)
                    .and_then(|raw| raw.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
            ),
            analysis_url: non_empty_env(ANALYSIS_URL_ENV),
            analysis_fallback_url: non_empty_env(ANALYSIS_FALLBACK_URL_ENV),
        }
    }

    /// Ordered, de-duplicated analysis-service base URLs: configured primary,
    /// configured fallback, then the hard-coded defaults.
    pub fn analysis_candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = vec![];
        let configured = [
            self.analysis_url.as_deref(),
            self.analysis_fallback_url.as_deref(),
        ];
        for base in configured
            .into_iter()
            .flatten()
            .chain(DEFAULT_ANALYSIS_BASES)
        {
            if let Some(normalized) = normalize_base_url(base) {
                if !candidates.contains(&normalized) {
                    candidates.push(normalized);
                }
            }
        }
        candidates
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    Some(with_scheme.trim_end_matches('/').to_string())
}
