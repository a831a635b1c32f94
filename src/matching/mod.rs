//! Multi-strategy quote matching.
//!
//! Strategies are tried in a fixed order and the first one that clears its
//! own confidence bar wins; the engine never searches all strategies for a
//! global maximum. This keeps runtime predictable and prefers exactness
//! over approximation when both are available.

mod exact;
mod fuzzy;
mod time_hint;

use crate::config::AlignConfig;
use crate::index::TranscriptIndex;
use crate::normalize::normalize_for_match;
use crate::types::{MatchResult, MatchStrategy};

/// Approximate source position claimed by the quote producer, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeHint {
    pub start: f64,
    pub end: Option<f64>,
}

/// Knobs for one match call.
#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub min_similarity: f32,
    pub hinted_min_similarity: f32,
    pub time_hint_min_similarity: f32,
    pub max_segment_window: usize,
    pub min_quote_words: usize,
    pub time_hint: Option<TimeHint>,
    pub time_hint_radius_secs: f64,
    /// Skip segments before this index. Useful when quotes arrive in
    /// transcript order and earlier segments are already consumed.
    pub start_segment: usize,
}

impl MatchOptions {
    pub fn from_config(config: &AlignConfig) -> Self {
        Self {
            min_similarity: config.min_similarity,
            hinted_min_similarity: config.hinted_min_similarity,
            time_hint_min_similarity: config.time_hint_min_similarity,
            max_segment_window: config.max_segment_window,
            min_quote_words: config.min_quote_words,
            time_hint: None,
            time_hint_radius_secs: config.time_hint_radius_secs,
            start_segment: 0,
        }
    }

    pub fn with_time_hint(mut self, hint: TimeHint) -> Self {
        self.time_hint = Some(hint);
        self
    }

    pub fn with_start_segment(mut self, start_segment: usize) -> Self {
        self.start_segment = start_segment;
        self
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::from_config(&AlignConfig::default())
    }
}

/// Locates `quote_text` in the indexed transcript.
///
/// Returns `None` when no strategy clears its bar; this is an expected,
/// common outcome for hallucinated quotes and never an error.
pub fn match_quote(
    index: &TranscriptIndex,
    quote_text: &str,
    opts: &MatchOptions,
) -> Option<MatchResult> {
    let quote = normalize_for_match(quote_text);
    let word_count = quote.split(' ').filter(|w| !w.is_empty()).count();
    if word_count < opts.min_quote_words {
        tracing::debug!(words = word_count, "quote too short to match safely");
        return None;
    }
    if index.is_empty() {
        return None;
    }

    if let Some(result) = exact::single_segment(index, &quote, opts.start_segment) {
        log_match(&result);
        return Some(result);
    }
    if let Some(result) =
        exact::joined_segments(index, &quote, opts.max_segment_window, opts.start_segment)
    {
        log_match(&result);
        return Some(result);
    }

    let fuzzy_bar = if opts.time_hint.is_some() {
        opts.hinted_min_similarity
    } else {
        opts.min_similarity
    };
    if let Some(result) = fuzzy::sliding_window(
        index,
        &quote,
        fuzzy_bar,
        opts.max_segment_window,
        Some((opts.start_segment, index.segment_count().saturating_sub(1))),
        MatchStrategy::Fuzzy,
    ) {
        log_match(&result);
        return Some(result);
    }

    if let Some(hint) = opts.time_hint {
        if let Some(result) = time_hint::relaxed_search(index, &quote, hint, opts) {
            log_match(&result);
            return Some(result);
        }
    }

    tracing::debug!("no strategy cleared its bar");
    None
}

fn log_match(result: &MatchResult) {
    tracing::debug!(
        strategy = result.strategy.as_str(),
        confidence = format!("{:.3}", result.confidence),
        start_segment = result.start_segment,
        end_segment = result.end_segment,
        "quote matched"
    );
}

/// Builds a result from a byte range of the joined text; `end` exclusive.
pub(crate) fn result_for_range(
    index: &TranscriptIndex,
    start: usize,
    end: usize,
    confidence: f32,
    strategy: MatchStrategy,
) -> Option<MatchResult> {
    let start_segment = index.segment_at_offset(start)?;
    let end_segment = index.segment_at_offset(end.checked_sub(1)?)?;
    Some(MatchResult {
        start_segment,
        end_segment,
        start_offset: start,
        end_offset: end,
        confidence,
        strategy,
    })
}
