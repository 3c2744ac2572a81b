use crate::error::InsightError;
use crate::llm_client::{extract_structured_payload, InsightClient};
use crate::prompt::build_prompt;
use crate::report::Report;
use crate::sections::{build_base_sections, merge_sections, MergedSection};
use crate::snapshot::AnalysisSnapshot;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// The persisted insight record, upserted 1:1 with a report. Regenerable: a
/// later call overwrites the prior record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightPayload {
    pub sections: Vec<MergedSection>,
    pub global_insights: Vec<String>,
    pub possible_conditions: Vec<String>,
    pub model_name: String,
    pub data_source: String,
    pub generated_at_unix_ms: u128,
}

fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Full synthesis pipeline for one report: baseline sections → prompt →
/// model call → payload extraction → merge. Network and parse failures
/// propagate as typed errors; missing content fields never do.
pub fn generate_structured_insights(
    report: &Report,
    snapshot: &AnalysisSnapshot,
    client: &InsightClient,
) -> Result<InsightPayload, InsightError> {
    let base_sections = build_base_sections(report, &snapshot.data);
    let prompt = build_prompt(report, &snapshot.data, &base_sections);
    let raw_text = client.call_model(&prompt)?;
    let structured = extract_structured_payload(&raw_text)?;
    let sections = merge_sections(&base_sections, &structured.sections);

    Ok(InsightPayload {
        sections,
        global_insights: structured.insights_globais,
        possible_conditions: structured.possiveis_doencas,
        model_name: client.model_name().to_string(),
        data_source: snapshot.source.clone(),
        generated_at_unix_ms: now_unix_ms(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InsightConfig;
    use crate::error::InsightErrorKind;
    use crate::sections::NO_MODEL_COMMENT;
    use crate::snapshot::AnalysisData;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    // Model answer with prose around the JSON block, as Gemini tends to send.
    const MODEL_ANSWER: &str = r#"{
        "candidates": [
            {
                "content": {
                    "parts": [
                        { "text": "Here is the report analysis:\n{\"sections\":[{\"id\":\"risk\",\"comentario\":\"High probability of a pathogenic pattern.\",\"probabilidade\":0.83,\"gravidade\":\"high\"}],\"insights_globais\":[\"Confirm with a follow-up panel.\"],\"possiveis_doencas\":[\"polycystic kidney disease\"]}\nLet me know if you need more." }
                    ]
                }
            }
        ]
    }"#;

    fn spawn_stub(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut buf = [0u8; 65536];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn snapshot() -> AnalysisSnapshot {
        AnalysisSnapshot {
            source: "http://back-end-fasta:5000".to_string(),
            data: AnalysisData::default(),
        }
    }

    #[test]
    fn generate_merges_model_commentary_into_payload() {
        let client = InsightClient::new(InsightConfig {
            base_url: spawn_stub(MODEL_ANSWER),
            api_key: Some("test-key".to_string()),
            request_timeout: Duration::from_secs(5),
            ..InsightConfig::default()
        })
        .unwrap();

        let payload =
            generate_structured_insights(&Report::default(), &snapshot(), &client).unwrap();
        assert_eq!(payload.sections.len(), 7);
        assert_eq!(
            payload.sections[0].comment,
            "High probability of a pathogenic pattern."
        );
        assert_eq!(payload.sections[0].probability, Some(0.83));
        assert_eq!(payload.sections[1].comment, NO_MODEL_COMMENT);
        assert_eq!(
            payload.global_insights,
            vec!["Confirm with a follow-up panel.".to_string()]
        );
        assert_eq!(
            payload.possible_conditions,
            vec!["polycystic kidney disease".to_string()]
        );
        assert_eq!(payload.data_source, "http://back-end-fasta:5000");
        assert!(payload.generated_at_unix_ms > 0);
    }

    #[test]
    fn generate_without_api_key_is_config_error() {
        let client = InsightClient::new(InsightConfig {
            api_key: None,
            ..InsightConfig::default()
        })
        .unwrap();
        let err = generate_structured_insights(&Report::default(), &snapshot(), &client)
            .unwrap_err();
        assert_eq!(err.kind(), InsightErrorKind::Config);
    }
}
