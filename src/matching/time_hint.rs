use crate::index::TranscriptIndex;
use crate::matching::{MatchOptions, TimeHint};
use crate::types::{MatchResult, MatchStrategy};

/// Leading/trailing words used for the anchor-phrase containment check.
const PHRASE_WORDS: usize = 3;

/// Strategy 4: rescue pass for quotes whose wording drifted too far for the
/// fuzzy scan but whose producer-stated time is still roughly trustworthy.
///
/// Restricts the search to segments starting within the hint radius, then
/// accepts an anchor-phrase containment or a relaxed-similarity fuzzy match.
pub(super) fn relaxed_search(
    index: &TranscriptIndex,
    quote: &str,
    hint: TimeHint,
    opts: &MatchOptions,
) -> Option<MatchResult> {
    let (lo, hi) = hinted_segment_range(index, hint, opts.time_hint_radius_secs)?;

    let words: Vec<&str> = quote.split(' ').filter(|w| !w.is_empty()).collect();
    if words.len() >= PHRASE_WORDS {
        let head = words[..PHRASE_WORDS].join(" ");
        let tail = words[words.len() - PHRASE_WORDS..].join(" ");
        for phrase in [head.as_str(), tail.as_str()] {
            if let Some(result) = find_phrase(index, phrase, lo, hi, opts) {
                return Some(result);
            }
        }
    }

    super::fuzzy::sliding_window(
        index,
        quote,
        opts.time_hint_min_similarity,
        opts.max_segment_window,
        Some((lo, hi)),
        MatchStrategy::TimeGuided,
    )
}

/// Contiguous segment range whose start times fall inside the hint window.
fn hinted_segment_range(
    index: &TranscriptIndex,
    hint: TimeHint,
    radius_secs: f64,
) -> Option<(usize, usize)> {
    let window_start = hint.start - radius_secs;
    let window_end = hint.end.unwrap_or(hint.start) + radius_secs;

    let mut lo = None;
    let mut hi = None;
    for idx in 0..index.segment_count() {
        let start = index.segment(idx).start;
        if start > window_end {
            break;
        }
        if start >= window_start {
            lo.get_or_insert(idx);
            hi = Some(idx);
        }
    }
    match (lo, hi) {
        (Some(lo), Some(hi)) => Some((lo, hi)),
        _ => {
            tracing::debug!(
                hint_start = hint.start,
                radius_secs,
                "no segments inside time-hint window"
            );
            None
        }
    }
}

fn find_phrase(
    index: &TranscriptIndex,
    phrase: &str,
    lo: usize,
    hi: usize,
    opts: &MatchOptions,
) -> Option<MatchResult> {
    let bounds = index.bounds();
    let window_start = bounds[lo].start_pos;
    let window_end = bounds[hi].end_pos;
    let slice = &index.joined()[window_start..window_end];

    let pos = slice.find(phrase)?;
    let start = window_start + pos;
    super::result_for_range(
        index,
        start,
        start + phrase.len(),
        opts.time_hint_min_similarity,
        MatchStrategy::TimeGuided,
    )
}
