use serde::{Deserialize, Serialize};

/// Which analysis pass a window belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pass {
    Primary,
    Overlap,
}

/// A window of `window_length` samples starting at `offset` within a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpan {
    pub offset: usize,
    pub pass: Pass,
}

/// Sample offset of the overlap pass relative to the primary grid.
pub fn overlap_shift(window_length: usize, overlap: f32) -> usize {
    let overlapped = (f64::from(overlap) * window_length as f64).floor() as usize;
    window_length - overlapped.min(window_length)
}

/// Windows for a chunk of `total_samples`, primary pass first.
///
/// Trailing samples that do not fill a whole window are not analysed. The
/// overlap pass, when enabled, re-tiles the chunk shifted by
/// [`overlap_shift`] so events split across a primary boundary are seen whole.
pub fn plan_windows(
    total_samples: usize,
    window_length: usize,
    overlap: Option<f32>,
) -> Vec<WindowSpan> {
    if window_length == 0 {
        return Vec::new();
    }

    let mut spans: Vec<WindowSpan> = (0..total_samples / window_length)
        .map(|k| WindowSpan {
            offset: k * window_length,
            pass: Pass::Primary,
        })
        .collect();

    if let Some(fraction) = overlap.filter(|&f| f > 0.0) {
        let shift = overlap_shift(window_length, fraction);
        if shift > 0 && shift < total_samples {
            let count = (total_samples - shift) / window_length;
            spans.extend((0..count).map(|k| WindowSpan {
                offset: shift + k * window_length,
                pass: Pass::Overlap,
            }));
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_pass_tiles_whole_windows() {
        let spans = plan_windows(18_500, 6000, None);
        let offsets: Vec<usize> = spans.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 6000, 12_000]);
        assert!(spans.iter().all(|s| s.pass == Pass::Primary));
    }

    #[test]
    fn overlap_pass_follows_primary_pass() {
        let spans = plan_windows(18_000, 6000, Some(0.3));
        let overlap: Vec<usize> = spans
            .iter()
            .filter(|s| s.pass == Pass::Overlap)
            .map(|s| s.offset)
            .collect();
        assert_eq!(overlap, vec![4200, 10_200]);
        assert_eq!(spans[2].pass, Pass::Primary);
        assert_eq!(spans[3].pass, Pass::Overlap);
    }

    #[test]
    fn zero_overlap_and_short_chunks_add_nothing() {
        assert_eq!(plan_windows(12_000, 6000, Some(0.0)).len(), 2);
        assert_eq!(plan_windows(6000, 6000, Some(0.3)).len(), 1);
        assert!(plan_windows(100, 6000, Some(0.3)).is_empty());
        assert!(plan_windows(100, 0, None).is_empty());
    }

    #[test]
    fn shift_rounds_overlap_down() {
        assert_eq!(overlap_shift(6000, 0.3), 4200);
        assert_eq!(overlap_shift(100, 0.255), 75);
    }
}
