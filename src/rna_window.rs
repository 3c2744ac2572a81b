use crate::codons::{dna_to_rna, Residue};
use crate::sequence_window::{build_windows, WindowColumn};
use crate::snapshot::Variant;
use serde::Serialize;

pub const DEFAULT_RNA_MAX_WINDOWS: usize = 3;

/// One codon on the track beneath an RNA window. Codon strings may be
/// shorter than three bases at the sequence tail; those never translate.
#[derive(Debug, Clone, Serialize)]
pub struct CodonCall {
    pub codon_index: usize,
    pub ref_codon: String,
    pub sample_codon: String,
    pub ref_residue: Option<Residue>,
    pub sample_residue: Option<Residue>,
    pub differs: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RnaWindow {
    pub center: usize,
    pub range_start: usize,
    pub range_end: usize,
    pub columns: Vec<WindowColumn>,
    pub codons: Vec<CodonCall>,
}

/// Same windows as the alignment view, but over the transcribed sequences
/// and with a codon track grouped on absolute sequence position.
pub fn build_rna_windows(
    ref_seq: &str,
    sample_seq: &str,
    variants: &[Variant],
    radius: usize,
    max_windows: usize,
) -> Vec<RnaWindow> {
    let ref_rna = dna_to_rna(ref_seq);
    let sample_rna = dna_to_rna(sample_seq);

    build_windows(&ref_rna, &sample_rna, variants, radius, max_windows)
        .into_iter()
        .map(|window| RnaWindow {
            center: window.center,
            range_start: window.range_start,
            range_end: window.range_end,
            codons: codon_track(&window.columns, &ref_rna, &sample_rna),
            columns: window.columns,
        })
        .collect()
}

/// Codon index = floor(absolute index / 3); one entry per codon touched by
/// the window, in column order.
fn codon_track(columns: &[WindowColumn], ref_rna: &str, sample_rna: &str) -> Vec<CodonCall> {
    let mut seen: Vec<usize> = vec![];
    let mut track: Vec<CodonCall> = vec![];
    for column in columns {
        let codon_index = column.index / 3;
        if seen.contains(&codon_index) {
            continue;
        }
        seen.push(codon_index);
        let start = codon_index * 3;
        let ref_codon = codon_slice(ref_rna, start);
        let sample_codon = codon_slice(sample_rna, start);
        track.push(CodonCall {
            codon_index,
            differs: ref_codon != sample_codon,
            ref_residue: Residue::from_rna_str(&ref_codon),
            sample_residue: Residue::from_rna_str(&sample_codon),
            ref_codon,
            sample_codon,
        });
    }
    track
}

fn codon_slice(sequence: &str, start: usize) -> String {
    let bytes = sequence.as_bytes();
    let end = (start + 3).min(bytes.len());
    if start >= end {
        return String::new();
    }
    String::from_utf8_lossy(&bytes[start..end]).into_owned()
}
