use crate::llm_client::ModelSection;
use crate::report::Report;
use crate::snapshot::{AnalysisData, Variant};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Human-readable sentinel for values the snapshot/report did not provide.
pub const NOT_DETERMINED: &str = "N/D";
pub const NO_VARIANTS_SUMMARY: &str = "No variants recorded";
pub const NO_MODEL_COMMENT: &str = "Model provided no addition.";

const VARIANT_HIGHLIGHT_CAP: usize = 5;

/// The fixed set of report facets. Exactly one section per id, always in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    Risk,
    Confidence,
    Identity,
    AlignmentScore,
    AlignmentDetail,
    RnaFocus,
    ProteinMap,
}

impl SectionId {
    pub const ALL: [SectionId; 7] = [
        Self::Risk,
        Self::Confidence,
        Self::Identity,
        Self::AlignmentScore,
        Self::AlignmentDetail,
        Self::RnaFocus,
        Self::ProteinMap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Risk => "risk",
            Self::Confidence => "confidence",
            Self::Identity => "identity",
            Self::AlignmentScore => "alignmentScore",
            Self::AlignmentDetail => "alignmentDetail",
            Self::RnaFocus => "rnaFocus",
            Self::ProteinMap => "proteinMap",
        }
    }
}

/// Baseline section derived from the snapshot and the stored report. The
/// `context` fragment is fed verbatim into the prompt so the model can ground
/// its commentary on concrete values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub value: String,
    pub probability: Option<f64>,
    pub context: String,
}

/// Section after the model's commentary has been overlaid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedSection {
    pub id: SectionId,
    pub title: String,
    pub value: String,
    pub probability: Option<f64>,
    pub context: String,
    pub comment: String,
    pub severity: Option<String>,
}

/// Coerces a loosely typed JSON value to a finite number. Strings that parse
/// to a finite float count; everything else is `None`.
pub fn safe_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Renders a loose value for display, without JSON string quoting.
fn display_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_or_nd(value: Option<&Value>) -> String {
    display_value(value).unwrap_or_else(|| NOT_DETERMINED.to_string())
}

/// Caps at five highlighted variants plus a "+N more" suffix.
pub fn summarize_variants(variants: &[Variant]) -> String {
    if variants.is_empty() {
        return NO_VARIANTS_SUMMARY.to_string();
    }
    let highlights = variants
        .iter()
        .take(VARIANT_HIGHLIGHT_CAP)
        .map(|variant| {
            let position = variant
                .position()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "?".to_string());
            let ref_base = variant.ref_base.as_deref().unwrap_or("?");
            let alt_base = variant.alt_base.as_deref().unwrap_or("?");
            let label = variant
                .variant_type
                .as_deref()
                .unwrap_or("variant")
                .to_lowercase();
            format!("{label} at exon {position} ({ref_base}→{alt_base})")
        })
        .join(", ");
    if variants.len() > VARIANT_HIGHLIGHT_CAP {
        format!(
            "{highlights} +{} more",
            variants.len() - VARIANT_HIGHLIGHT_CAP
        )
    } else {
        highlights
    }
}

/// Derives the seven baseline sections. Pure and deterministic; missing or
/// malformed fields degrade to sentinels, never to an error.
pub fn build_base_sections(report: &Report, data: &AnalysisData) -> Vec<Section> {
    let identity = display_value(data.identity.as_ref())
        .or_else(|| display_value(report.identity.as_ref()))
        .unwrap_or_else(|| NOT_DETERMINED.to_string());
    let score = display_value(data.score.as_ref())
        .or_else(|| display_value(report.score.as_ref()))
        .unwrap_or_else(|| NOT_DETERMINED.to_string());
    let classification = report
        .classification
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| match data.classification {
            Some(1) => "Positive".to_string(),
            Some(0) => "Negative".to_string(),
            _ => "Undefined".to_string(),
        });
    let confidence = report
        .confidence
        .clone()
        .or_else(|| data.confidence.clone())
        .or_else(|| data.confidence_float.clone());
    let coverage_pct = safe_number(data.coverage_metrics.coverage_pct.as_ref());
    let coverage_display = value_or_nd(data.coverage_metrics.coverage_pct.as_ref());
    let total_variants_display = display_value(data.coverage_metrics.total_variants.as_ref())
        .unwrap_or_else(|| "0".to_string());
    let variant_summary = summarize_variants(&data.variants);
    let total_mutations = data.variants.len();

    vec![
        Section {
            id: SectionId::Risk,
            title: "Risk classification".to_string(),
            value: classification,
            probability: safe_number(confidence.as_ref()),
            context: format!(
                "Current classifier result and clinical record associated with report {}.",
                report.id
            ),
        },
        Section {
            id: SectionId::Confidence,
            title: "Model confidence".to_string(),
            value: display_value(data.confidence.as_ref())
                .or_else(|| display_value(report.confidence.as_ref()))
                .unwrap_or_else(|| NOT_DETERMINED.to_string()),
            probability: safe_number(data.confidence_float.as_ref())
                .or_else(|| safe_number(report.confidence.as_ref())),
            context: "Raw confidence returned by the classifier for the exon of interest."
                .to_string(),
        },
        Section {
            id: SectionId::Identity,
            title: "Genetic identity".to_string(),
            value: identity,
            probability: safe_number(data.identity_pct.as_ref()),
            context: format!(
                "Percentage and characteristics of the Needleman-Wunsch alignment. Score: {score}."
            ),
        },
        Section {
            id: SectionId::AlignmentScore,
            title: "Alignment score".to_string(),
            value: score.clone(),
            probability: coverage_pct,
            context: format!(
                "Estimated exon coverage: {coverage_display}%. Variants: {total_variants_display}."
            ),
        },
        Section {
            id: SectionId::AlignmentDetail,
            title: "Mutation-focused windows".to_string(),
            value: if total_mutations > 0 {
                format!("{total_mutations} variant(s) monitored")
            } else {
                "No relevant mutations".to_string()
            },
            probability: coverage_pct,
            context: format!(
                "Explain what score {score} and coverage {coverage_display}% indicate for the \
                 Needleman-Wunsch alignment, and describe the clinical consequences of the \
                 mutations: {variant_summary}."
            ),
        },
        Section {
            id: SectionId::RnaFocus,
            title: "Transcription highlight".to_string(),
            value: if total_mutations > 0 {
                "Transcripts affected".to_string()
            } else {
                "Transcription preserved".to_string()
            },
            probability: None,
            context: "Comment in two or three sentences on how the mutations affect \
                      transcription of the exon, citing altered codons, potential \
                      messenger-RNA changes and practical recommendations."
                .to_string(),
        },
        Section {
            id: SectionId::ProteinMap,
            title: "Amino-acid map".to_string(),
            value: if total_mutations > 0 {
                "Amino acids altered".to_string()
            } else {
                "No changes detected".to_string()
            },
            probability: None,
            context: format!(
                "Summarize the possible protein impact: highlight stop-codon risk, critical \
                 substitutions or structural preservation based on the variants \
                 ({variant_summary})."
            ),
        },
    ]
}

/// Overlays model commentary onto the baseline. Output order and count always
/// match the base sections; unknown model ids are silently ignored.
pub fn merge_sections(base: &[Section], model_sections: &[ModelSection]) -> Vec<MergedSection> {
    let by_id: HashMap<&str, &ModelSection> = model_sections
        .iter()
        .filter_map(|section| section.id.as_deref().map(|id| (id, section)))
        .collect();

    base.iter()
        .map(|section| {
            let model = by_id.get(section.id.as_str());
            MergedSection {
                id: section.id,
                title: section.title.clone(),
                value: section.value.clone(),
                probability: model
                    .and_then(|m| safe_number(m.probabilidade.as_ref()))
                    .or(section.probability),
                context: section.context.clone(),
                comment: model
                    .and_then(|m| m.comentario.clone())
                    .filter(|comment| !comment.trim().is_empty())
                    .unwrap_or_else(|| NO_MODEL_COMMENT.to_string()),
                severity: model
                    .and_then(|m| m.gravidade.clone())
                    .filter(|severity| !severity.trim().is_empty()),
            }
        })
        .collect()
}
