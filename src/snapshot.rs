use crate::config::InsightConfig;
use crate::error::{InsightError, InsightErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const ANALYSIS_PATH: &str = "/dados-analise";

/// One reported difference between reference and sample at a given position.
/// Fields stay loosely typed; upstream services have sent positions both as
/// numbers and as strings, and a bad variant must not sink the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Variant {
    pub exon_position: Option<Value>,
    pub ref_base: Option<String>,
    pub alt_base: Option<String>,
    #[serde(rename = "type")]
    pub variant_type: Option<String>,
}

impl Variant {
    /// 1-based exon position, if the field is actually numeric.
    pub fn position(&self) -> Option<usize> {
        match self.exon_position.as_ref()? {
            Value::Number(n) => n
                .as_u64()
                .map(|v| v as usize)
                .or_else(|| n.as_f64().filter(|v| *v >= 0.0).map(|v| v as usize)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageMetrics {
    pub coverage_pct: Option<Value>,
    pub total_variants: Option<Value>,
}

/// Raw snapshot body as served by the analysis microservice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisData {
    pub identity: Option<Value>,
    pub identity_pct: Option<Value>,
    pub score: Option<Value>,
    pub confidence: Option<Value>,
    pub confidence_float: Option<Value>,
    pub classification: Option<i64>,
    pub reference_sequence: String,
    pub sample_sequence: String,
    pub variants: Vec<Variant>,
    pub coverage_metrics: CoverageMetrics,
}

/// The latest analysis snapshot, tagged with the endpoint that answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub source: String,
    pub data: AnalysisData,
}

/// Discovers the latest snapshot across an ordered list of candidate service
/// endpoints. Each candidate gets exactly one attempt with a bounded timeout;
/// the loop is strictly sequential, so at most one request is in flight.
pub struct SnapshotResolver {
    client: reqwest::blocking::Client,
    candidates: Vec<String>,
}

impl SnapshotResolver {
    pub fn new(config: &InsightConfig) -> Result<Self, InsightError> {
        Self::with_candidates(config.analysis_candidates(), config.request_timeout)
    }

    pub fn with_candidates(
        candidates: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, InsightError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                InsightError::upstream(format!("could not build analysis client: {e}"))
            })?;
        Ok(Self { client, candidates })
    }

    /// Returns the first candidate's snapshot, or `NotFound` when every
    /// candidate reported 404, or `Upstream` when any candidate failed for
    /// another reason (including timeouts and connect errors after a 404).
    pub fn fetch_latest(&self) -> Result<AnalysisSnapshot, InsightError> {
        let mut errors: Vec<String> = vec![];
        let mut only_not_found = true;

        for base in &self.candidates {
            let endpoint = format!("{base}{ANALYSIS_PATH}");
            let response = match self.client.get(&endpoint).send() {
                Ok(response) => response,
                Err(e) => {
                    only_not_found = false;
                    warn!(candidate = %base, error = %e, "analysis candidate unreachable");
                    errors.push(format!("{base}: {e}"));
                    continue;
                }
            };
            let status = response.status();
            if status.as_u16() == 404 {
                debug!(candidate = %base, "no analysis available, trying next candidate");
                errors.push(format!("no analysis available at {base}"));
                continue;
            }
            only_not_found = false;
            if !status.is_success() {
                warn!(candidate = %base, %status, "analysis candidate failed");
                errors.push(format!("failure {} at {base}", status.as_u16()));
                continue;
            }
            match response.json::<AnalysisData>() {
                Ok(data) => {
                    debug!(candidate = %base, "analysis snapshot resolved");
                    return Ok(AnalysisSnapshot {
                        source: base.clone(),
                        data,
                    });
                }
                Err(e) => {
                    errors.push(format!("{base}: invalid snapshot body: {e}"));
                    continue;
                }
            }
        }

        let kind = if only_not_found && !errors.is_empty() {
            InsightErrorKind::NotFound
        } else {
            InsightErrorKind::Upstream
        };
        let message = if errors.is_empty() {
            "no analysis service answered".to_string()
        } else {
            "could not obtain analysis data".to_string()
        };
        Err(InsightError::with_details(kind, message, errors))
    }
}
