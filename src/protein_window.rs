use crate::codons::{dna_to_rna, translate, Residue, ResidueProperty};
use crate::snapshot::Variant;
use itertools::Itertools;
use serde::Serialize;

pub const DEFAULT_PROTEIN_RADIUS: usize = 2;
/// Cap across all centers combined, to keep the card strip readable.
pub const MAX_PROTEIN_CARDS: usize = 18;

/// One visualized amino-acid position. `differs` compares the residues at
/// this codon index; a residue missing on one side (shorter track or
/// untranslatable codon) counts as a difference when the other side has one.
#[derive(Debug, Clone, Serialize)]
pub struct AminoAcidCard {
    pub index: usize,
    pub ref_residue: Option<Residue>,
    pub sample_residue: Option<Residue>,
    pub property: Option<ResidueProperty>,
    pub differs: bool,
}

/// Codon indices touched by the variants: `floor((position - 1) / 3)`,
/// de-duplicated preserving first-seen order.
pub fn variant_codon_indexes(variants: &[Variant]) -> Vec<usize> {
    let mut indexes: Vec<usize> = vec![];
    for variant in variants {
        let Some(position) = variant.position() else {
            continue;
        };
        let index = position.saturating_sub(1) / 3;
        if !indexes.contains(&index) {
            indexes.push(index);
        }
    }
    indexes
}

/// Translates both sequences and windows the residue tracks around the
/// variant codons.
pub fn build_protein_cards_from_sequences(
    ref_seq: &str,
    sample_seq: &str,
    variants: &[Variant],
    radius: usize,
) -> Vec<AminoAcidCard> {
    let ref_residues = translate(&dna_to_rna(ref_seq));
    let sample_residues = translate(&dna_to_rna(sample_seq));
    build_protein_cards(
        &ref_residues,
        &sample_residues,
        &variant_codon_indexes(variants),
        radius,
    )
}

/// Windows two pre-translated residue tracks around codon-index centers.
/// Output is de-duplicated across overlapping centers, sorted ascending and
/// capped at [`MAX_PROTEIN_CARDS`].
pub fn build_protein_cards(
    ref_residues: &[Option<Residue>],
    sample_residues: &[Option<Residue>],
    centers: &[usize],
    radius: usize,
) -> Vec<AminoAcidCard> {
    let total = ref_residues.len().max(sample_residues.len());
    if total == 0 {
        return vec![];
    }
    let upper = total - 1;
    let centers: Vec<usize> = if centers.is_empty() {
        vec![total / 2]
    } else {
        centers.iter().map(|c| (*c).min(upper)).collect()
    };

    centers
        .iter()
        .flat_map(|center| {
            let start = center.saturating_sub(radius);
            let end = total.min(center + radius + 1);
            start..end
        })
        .unique()
        .sorted_unstable()
        .take(MAX_PROTEIN_CARDS)
        .map(|index| {
            let ref_residue = ref_residues.get(index).copied().flatten();
            let sample_residue = sample_residues.get(index).copied().flatten();
            AminoAcidCard {
                index,
                ref_residue,
                sample_residue,
                property: ref_residue.or(sample_residue).map(Residue::property),
                differs: ref_residue != sample_residue,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn variant_at(position: i64) -> Variant {
        Variant {
            exon_position: Some(json!(position)),
            ..Variant::default()
        }
    }

    #[test]
    fn test_variant_codon_indexes() {
        // Positions 1..=3 share codon 0; 4 starts codon 1.
        let variants = vec![variant_at(1), variant_at(3), variant_at(4)];
        assert_eq!(variant_codon_indexes(&variants), vec![0, 1]);
    }

    #[test]
    fn test_cards_flag_substitution() {
        // Codon 1 differs: GCU (Ala) vs GGU (Gly).
        let cards = build_protein_cards_from_sequences(
            "ATGGCTTAA",
            "ATGGGTTAA",
            &[variant_at(5)],
            DEFAULT_PROTEIN_RADIUS,
        );
        let mutated = cards.iter().find(|c| c.index == 1).unwrap();
        assert!(mutated.differs);
        assert_eq!(mutated.ref_residue, Some(Residue::Ala));
        assert_eq!(mutated.sample_residue, Some(Residue::Gly));
        assert_eq!(mutated.property, Some(ResidueProperty::Hydrophobic));
        let unchanged = cards.iter().find(|c| c.index == 0).unwrap();
        assert!(!unchanged.differs);
        assert_eq!(unchanged.ref_residue, Some(Residue::Met));
    }

    #[test]
    fn test_cards_sorted_and_capped() {
        let ref_residues = vec![Some(Residue::Ala); 60];
        let sample_residues = vec![Some(Residue::Ala); 60];
        let centers: Vec<usize> = vec![50, 10, 30, 20, 40];
        let cards = build_protein_cards(&ref_residues, &sample_residues, &centers, 2);
        assert!(cards.len() <= MAX_PROTEIN_CARDS);
        let indices: Vec<usize> = cards.iter().map(|c| c.index).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_overlapping_centers_deduplicate() {
        let ref_residues = vec![Some(Residue::Ala); 10];
        let sample_residues = vec![Some(Residue::Ala); 10];
        let cards = build_protein_cards(&ref_residues, &sample_residues, &[3, 4], 2);
        let indices: Vec<usize> = cards.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_center_fallback_and_clamp() {
        let ref_residues = vec![Some(Residue::Ala); 9];
        let sample_residues = vec![Some(Residue::Ala); 9];
        let fallback = build_protein_cards(&ref_residues, &sample_residues, &[], 1);
        assert_eq!(
            fallback.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![3, 4, 5]
        );
        let clamped = build_protein_cards(&ref_residues, &sample_residues, &[99], 1);
        assert_eq!(
            clamped.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![7, 8]
        );
    }

    #[test]
    fn test_stop_gain_is_flagged() {
        // Codon 1 mutates UGG (Trp) into UGA (STOP).
        let cards = build_protein_cards_from_sequences("ATGTGGAAA", "ATGTGAAAA", &[variant_at(6)], 1);
        let stop = cards.iter().find(|c| c.index == 1).unwrap();
        assert!(stop.differs);
        assert_eq!(stop.sample_residue, Some(Residue::Stop));
        assert_eq!(stop.ref_residue, Some(Residue::Trp));
    }

    #[test]
    fn test_empty_tracks_produce_no_cards() {
        assert!(build_protein_cards(&[], &[], &[0], 2).is_empty());
    }
}
