use crate::report::Report;
use crate::sections::{summarize_variants, Section};
use crate::snapshot::AnalysisData;
use serde::Serialize;
use serde_json::Value;

/// Everything the model is allowed to see, serialized verbatim into the
/// prompt's data block.
#[derive(Debug, Serialize)]
struct PromptPayload<'a> {
    patient: PatientBlock<'a>,
    sections: &'a [Section],
    metrics: &'a crate::snapshot::CoverageMetrics,
    summarized_variants: String,
}

#[derive(Debug, Serialize)]
struct PatientBlock<'a> {
    id: i64,
    name: Option<&'a str>,
    sex: Option<&'a str>,
    age: Option<&'a str>,
    breed: Option<&'a str>,
}

/// Builds the single-turn clinical prompt. This string is the sole channel
/// of instruction to the model: it embeds the section contexts and mandates
/// the exact JSON shape of the answer.
pub fn build_prompt(report: &Report, data: &AnalysisData, sections: &[Section]) -> String {
    let payload = PromptPayload {
        patient: PatientBlock {
            id: report.id,
            name: report.name.as_deref(),
            sex: report.sex.as_deref(),
            age: report.age.as_deref(),
            breed: report.breed.as_deref(),
        },
        sections,
        metrics: &data.coverage_metrics,
        summarized_variants: summarize_variants(&data.variants),
    };
    let data_block = serde_json::to_value(&payload)
        .map(|value| serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
        .unwrap_or_else(|_| Value::Null.to_string());

    format!(
        "You are a veterinary geneticist. Write short commentary to complement a report on \
exon-level mutations from a genetic test.
Answer strictly in the following JSON format, with no additional text:
{{
  \"sections\": [
    {{ \"id\": \"\", \"comentario\": \"\", \"probabilidade\": 0.0, \"gravidade\": \"\" }}
  ],
  \"insights_globais\": [\"text\"],
  \"possiveis_doencas\": [\"optional condition\"]
}}

Rules:
- Use 2 or 3 sentences per comment, always relating the provided values (score, \
probability, mutations) to clinical interpretation.
- Use an objective clinical tone, cite probabilities when available, and recommend \
next steps in plain language.
- When a value is missing, write \"Insufficient information\".
- For alignmentDetail, describe what the score/coverage suggest and how the mutations \
affect the alignment. For rnaFocus and proteinMap, highlight consequences for \
transcription and amino acids in an educational way.

Input data:
{data_block}
"
    )
}
