use crate::snapshot::Variant;
use serde::Serialize;

pub const DEFAULT_WINDOW_RADIUS: usize = 6;
pub const DEFAULT_MAX_WINDOWS: usize = 4;

/// Per-column comparison verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Gap,
    Match,
    Mismatch,
}

/// One aligned column inside a window. The symbol is `-` wherever the
/// shorter sequence has no base at that index.
#[derive(Debug, Clone, Serialize)]
pub struct WindowColumn {
    pub index: usize,
    pub ref_symbol: char,
    pub sample_symbol: char,
    pub kind: ColumnKind,
    pub is_center: bool,
}

/// A bounded slice of the alignment centered on a point of interest.
/// Ephemeral: recomputed on every render, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentWindow {
    pub center: usize,
    /// 1-based inclusive display range.
    pub range_start: usize,
    pub range_end: usize,
    pub columns: Vec<WindowColumn>,
}

pub fn classify(ref_symbol: char, sample_symbol: char) -> ColumnKind {
    if ref_symbol == '-' || sample_symbol == '-' {
        ColumnKind::Gap
    } else if ref_symbol == sample_symbol {
        ColumnKind::Match
    } else {
        ColumnKind::Mismatch
    }
}

fn symbol_at(sequence: &[u8], index: usize) -> char {
    sequence.get(index).map(|b| *b as char).unwrap_or('-')
}

/// Maps variants to zero-based window centers: `position - 1`, clamped into
/// `[0, total_len - 1]`, de-duplicated preserving first-seen order, truncated
/// to `max_windows`. Falls back to the sequence midpoint when no variant has
/// a usable position.
pub fn window_centers(variants: &[Variant], total_len: usize, max_windows: usize) -> Vec<usize> {
    let upper = total_len.saturating_sub(1);
    let mut centers: Vec<usize> = vec![];
    for variant in variants {
        if centers.len() == max_windows {
            break;
        }
        let Some(position) = variant.position() else {
            continue;
        };
        let center = position.saturating_sub(1).min(upper);
        if !centers.contains(&center) {
            centers.push(center);
        }
    }
    if centers.is_empty() {
        centers.push(total_len / 2);
    }
    centers
}

/// Columns over `[max(0, center - radius), min(total, center + radius + 1))`.
pub fn build_columns(
    ref_seq: &str,
    sample_seq: &str,
    center: usize,
    radius: usize,
) -> Vec<WindowColumn> {
    let ref_bytes = ref_seq.as_bytes();
    let sample_bytes = sample_seq.as_bytes();
    let total = ref_bytes.len().max(sample_bytes.len());
    let start = center.saturating_sub(radius);
    let end = total.min(center + radius + 1);

    (start..end)
        .map(|index| {
            let ref_symbol = symbol_at(ref_bytes, index);
            let sample_symbol = symbol_at(sample_bytes, index);
            WindowColumn {
                index,
                ref_symbol,
                sample_symbol,
                kind: classify(ref_symbol, sample_symbol),
                is_center: index == center,
            }
        })
        .collect()
}

/// Computes one window per de-duplicated variant center.
pub fn build_windows(
    ref_seq: &str,
    sample_seq: &str,
    variants: &[Variant],
    radius: usize,
    max_windows: usize,
) -> Vec<AlignmentWindow> {
    let total = ref_seq.len().max(sample_seq.len());
    window_centers(variants, total, max_windows)
        .into_iter()
        .map(|center| {
            let columns = build_columns(ref_seq, sample_seq, center, radius);
            let range_start = columns.first().map(|c| c.index).unwrap_or(center) + 1;
            let range_end = columns.last().map(|c| c.index).unwrap_or(center) + 1;
            AlignmentWindow {
                center,
                range_start,
                range_end,
                columns,
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
    fn test_classify() {
        assert_eq!(classify('A', 'A'), ColumnKind::Match);
        assert_eq!(classify('A', 'G'), ColumnKind::Mismatch);
        assert_eq!(classify('A', '-'), ColumnKind::Gap);
        assert_eq!(classify('-', '-'), ColumnKind::Gap);
    }

    #[test]
    fn test_single_variant_window() {
        let windows = build_windows("ACGTACGTACGT", "ACGTACGTACGT", &[variant_at(5)], 2, 4);
        assert_eq!(windows.len(), 1);
        let window = &windows[0];
        assert_eq!(window.center, 4);
        assert_eq!(window.range_start, 3);
        assert_eq!(window.range_end, 7);
        let indices: Vec<usize> = window.columns.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![2, 3, 4, 5, 6]);
        for column in &window.columns {
            assert_eq!(column.is_center, column.index == 4);
        }
    }

    #[test]
    fn test_window_clamps_to_sequence_start() {
        let windows = build_windows("ACGTACGT", "ACGTACGT", &[variant_at(1)], 3, 4);
        let indices: Vec<usize> = windows[0].columns.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(windows[0].columns.len() <= 2 * 3 + 1);
    }

    #[test]
    fn test_center_clamped_to_sequence_end() {
        let windows = build_windows("ACGT", "ACGT", &[variant_at(99)], 2, 4);
        assert_eq!(windows[0].center, 3);
        let indices: Vec<usize> = windows[0].columns.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_positions_deduplicate() {
        let windows = build_windows(
            "ACGTACGT",
            "ACGTACGT",
            &[variant_at(3), variant_at(3)],
            2,
            4,
        );
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_max_windows_truncates() {
        let variants: Vec<Variant> = (1..=6).map(variant_at).collect();
        let windows = build_windows("ACGTACGTAC", "ACGTACGTAC", &variants, 1, 3);
        assert_eq!(windows.len(), 3);
        let centers: Vec<usize> = windows.iter().map(|w| w.center).collect();
        assert_eq!(centers, vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_max_windows_yields_only_fallback() {
        let variants: Vec<Variant> = (1..=6).map(variant_at).collect();
        let windows = build_windows("ACGTACGTAC", "ACGTACGTAC", &variants, 1, 0);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].center, 5);
    }

    #[test]
    fn test_fallback_center_when_no_usable_positions() {
        let unplaced = Variant {
            exon_position: Some(json!("somewhere")),
            ..Variant::default()
        };
        let windows = build_windows("ACGTACGTAC", "ACGTACGTAC", &[unplaced], 2, 4);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].center, 5);
    }

    #[test]
    fn test_shorter_sample_pads_with_gap() {
        let windows = build_windows("ACGTAC", "ACG", &[variant_at(5)], 1, 4);
        let columns = &windows[0].columns;
        assert_eq!(columns[0].index, 3);
        assert_eq!(columns[0].sample_symbol, '-');
        assert_eq!(columns[0].kind, ColumnKind::Gap);
    }

    #[test]
    fn test_empty_sequences_yield_empty_window() {
        let windows = build_windows("", "", &[], 3, 4);
        assert_eq!(windows.len(), 1);
        assert!(windows[0].columns.is_empty());
        assert_eq!(windows[0].center, 0);
    }
}
