use crate::config::{InsightConfig, API_KEY_ENV};
use crate::error::InsightError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

const EXCERPT_LEN: usize = 280;

/// Per-section commentary as the model returns it. Every field is optional;
/// shape mismatches degrade to `None` instead of failing the parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub id: Option<String>,
    pub comentario: Option<String>,
    pub probabilidade: Option<Value>,
    pub gravidade: Option<String>,
}

/// Structured payload recovered from the model's free-form answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPayload {
    pub sections: Vec<ModelSection>,
    pub insights_globais: Vec<String>,
    pub possiveis_doencas: Vec<String>,
}

/// Calls the generateContent endpoint with a bounded timeout and unwraps the
/// response envelope down to the raw answer text.
pub struct InsightClient {
    client: reqwest::blocking::Client,
    config: InsightConfig,
}

impl InsightClient {
    pub fn new(config: InsightConfig) -> Result<Self, InsightError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| InsightError::config(format!("could not build model client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    /// One attempt, no retry. A timeout aborts the in-flight request and
    /// surfaces as `Upstream`.
    pub fn call_model(&self, prompt: &str) -> Result<String, InsightError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| InsightError::config(format!("{API_KEY_ENV} is not configured")))?;
        let endpoint = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        });

        debug!(model = %self.config.model, "calling insight model");
        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| InsightError::upstream(format!("model request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| InsightError::upstream(format!("could not read model response: {e}")))?;
        if !status.is_success() {
            return Err(InsightError::upstream(format!(
                "model call failed (status={}): {}",
                status.as_u16(),
                excerpt(&body)
            )));
        }

        let response_json = serde_json::from_str::<Value>(&body).map_err(|e| {
            InsightError::malformed(format!("model returned invalid JSON envelope: {e}"))
        })?;
        let candidates = response_json
            .get("candidates")
            .and_then(Value::as_array)
            .filter(|candidates| !candidates.is_empty())
            .ok_or_else(|| InsightError::malformed("model response has no candidates"))?;
        let parts = candidates[0]
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let full_text = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if full_text.trim().is_empty() {
            return Err(InsightError::malformed("model response text is empty"));
        }
        Ok(full_text)
    }
}

/// Locates the first `{` and the last `}` in the raw answer and parses that
/// slice, tolerating prose around the JSON block. Array fields that are
/// missing or mistyped default to empty; only syntax failures are errors.
pub fn extract_structured_payload(raw_text: &str) -> Result<ModelPayload, InsightError> {
    let first = raw_text.find('{');
    let last = raw_text.rfind('}');
    let (Some(first), Some(last)) = (first, last) else {
        return Err(InsightError::malformed(format!(
            "model did not return a JSON block: {}",
            excerpt(raw_text)
        )));
    };
    let parsed = serde_json::from_str::<Value>(&raw_text[first..=last]).map_err(|e| {
        InsightError::malformed(format!(
            "model JSON block does not parse ({e}): {}",
            excerpt(raw_text)
        ))
    })?;

    Ok(ModelPayload {
        sections: section_array(parsed.get("sections")),
        insights_globais: string_array(parsed.get("insights_globais")),
        possiveis_doencas: string_array(parsed.get("possiveis_doencas")),
    })
}

fn section_array(value: Option<&Value>) -> Vec<ModelSection> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| ModelSection {
                    id: item
                        .get("id")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    comentario: item
                        .get("comentario")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    probabilidade: item.get("probabilidade").cloned(),
                    gravidade: item
                        .get("gravidade")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn excerpt(raw: &str) -> String {
    raw.trim().chars().take(EXCERPT_LEN).collect()
}
