use crate::index::TranscriptIndex;
use crate::types::{MatchResult, MatchStrategy};

const EXACT_CONFIDENCE: f32 = 1.0;
const MULTI_EXACT_CONFIDENCE: f32 = 0.95;

/// Strategy 1: the quote appears verbatim inside a single segment.
pub(super) fn single_segment(
    index: &TranscriptIndex,
    quote: &str,
    start_segment: usize,
) -> Option<MatchResult> {
    for b in index.bounds().iter().skip(start_segment) {
        let text = index.norm_segment(b.segment_idx);
        if let Some(pos) = text.find(quote) {
            let start = b.start_pos + pos;
            return super::result_for_range(
                index,
                start,
                start + quote.len(),
                EXACT_CONFIDENCE,
                MatchStrategy::Exact,
            );
        }
    }
    None
}

/// Strategy 2: the quote straddles a boundary but appears verbatim in a
/// join of at most `max_window` consecutive segments.
pub(super) fn joined_segments(
    index: &TranscriptIndex,
    quote: &str,
    max_window: usize,
    start_segment: usize,
) -> Option<MatchResult> {
    for (pos, _) in index.joined().match_indices(quote) {
        let candidate = super::result_for_range(
            index,
            pos,
            pos + quote.len(),
            MULTI_EXACT_CONFIDENCE,
            MatchStrategy::MultiExact,
        );
        if let Some(result) = candidate {
            if result.start_segment < start_segment {
                continue;
            }
            let span = result.end_segment - result.start_segment + 1;
            if span >= 2 && span <= max_window {
                return Some(result);
            }
        }
    }
    None
}
