use crate::error::InsightError;
use crate::insights::InsightPayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored report record, as persisted by the CRUD layer. Identity, score and
/// confidence arrive as strings or numbers depending on how the record was
/// written, so they stay loosely typed until section building coerces them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    pub id: i64,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub client: Option<String>,
    pub age: Option<String>,
    pub breed: Option<String>,
    pub material: Option<String>,
    pub method: Option<String>,
    pub identity: Option<Value>,
    pub score: Option<Value>,
    pub classification: Option<String>,
    pub confidence: Option<Value>,
}

/// Report persistence, implemented outside this crate.
pub trait ReportStore {
    fn get_report_by_id(&self, id: i64) -> Result<Option<Report>, InsightError>;
    fn get_latest_report(&self) -> Result<Option<Report>, InsightError>;
}

/// Insight persistence, implemented outside this crate. `upsert` is keyed by
/// report id with last-write-wins semantics: concurrent regenerations for the
/// same report race, and the response returned to the loser may not match
/// what ends up persisted. Serializing those writes is the store's problem.
pub trait InsightStore {
    fn get_insight_by_report_id(&self, id: i64) -> Result<Option<InsightPayload>, InsightError>;
    fn upsert_insight(&self, id: i64, payload: &InsightPayload) -> Result<(), InsightError>;
}
