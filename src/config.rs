use std::path::Path;

use crate::error::AlignError;

/// Tuning knobs for matching, span resolution, and citation extraction.
///
/// The thresholds and windows are empirically chosen constants carried over
/// from production use; they are exposed as named fields rather than
/// re-derived.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Minimum similarity for the sliding-window fuzzy strategy.
    pub min_similarity: f32,
    /// Fuzzy bar used instead of `min_similarity` when the quote carries a
    /// timestamp hint.
    pub hinted_min_similarity: f32,
    /// Relaxed bar for the time-guided rescue strategy.
    pub time_hint_min_similarity: f32,
    /// Maximum consecutive segments a single match may span.
    pub max_segment_window: usize,
    /// Quotes with fewer normalized words are rejected outright.
    pub min_quote_words: usize,
    /// Search radius in seconds around a quote's timestamp hint.
    pub time_hint_radius_secs: f64,
    /// Minimum viewable span duration; `end` is extended forward to reach
    /// it, never `start` backward.
    pub min_span_secs: f64,
    /// Spans closer than this are merged into one.
    pub merge_gap_secs: f64,
    /// Segments of surrounding context added on each side of a resolved
    /// span; 0 gives minimal-span citations.
    pub context_segments: usize,
    /// Characters captured around a citation token for UI preview.
    pub context_chars: usize,
    /// Word cap applied to the captured citation context.
    pub context_max_words: usize,
    /// Emit a low-confidence span anchored at the quote's own timestamp
    /// when every matching strategy fails.
    pub timestamp_fallback: bool,
    pub timestamp_fallback_confidence: f32,
}

impl AlignConfig {
    pub const DEFAULT_MIN_SIMILARITY: f32 = 0.80;
    pub const DEFAULT_HINTED_MIN_SIMILARITY: f32 = 0.75;
    pub const DEFAULT_TIME_HINT_MIN_SIMILARITY: f32 = 0.60;
    pub const DEFAULT_MAX_SEGMENT_WINDOW: usize = 5;
    pub const DEFAULT_MIN_QUOTE_WORDS: usize = 3;
    pub const DEFAULT_TIME_HINT_RADIUS_SECS: f64 = 30.0;
    pub const DEFAULT_MIN_SPAN_SECS: f64 = 15.0;
    pub const DEFAULT_MERGE_GAP_SECS: f64 = 5.0;
    pub const DEFAULT_CONTEXT_SEGMENTS: usize = 2;
    pub const DEFAULT_CONTEXT_CHARS: usize = 150;
    pub const DEFAULT_CONTEXT_MAX_WORDS: usize = 40;
    pub const DEFAULT_TIMESTAMP_FALLBACK_CONFIDENCE: f32 = 0.3;

    pub fn load(path: &Path) -> Result<Self, AlignError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| AlignError::io("read config json", e))?;
        serde_json::from_str(&data).map_err(|e| AlignError::json("parse config json", e))
    }

    pub(crate) fn validate(&self) -> Result<(), AlignError> {
        if !(0.0..=1.0).contains(&self.min_similarity)
            || !(0.0..=1.0).contains(&self.hinted_min_similarity)
            || !(0.0..=1.0).contains(&self.time_hint_min_similarity)
            || !(0.0..=1.0).contains(&self.timestamp_fallback_confidence)
        {
            return Err(AlignError::invalid_input(
                "similarity and confidence thresholds must lie in [0, 1]",
            ));
        }
        if self.max_segment_window == 0 {
            return Err(AlignError::invalid_input(
                "max_segment_window must be at least 1",
            ));
        }
        if self.min_quote_words == 0 {
            return Err(AlignError::invalid_input(
                "min_quote_words must be at least 1",
            ));
        }
        if self.time_hint_radius_secs < 0.0
            || self.min_span_secs < 0.0
            || self.merge_gap_secs < 0.0
        {
            return Err(AlignError::invalid_input(
                "time windows and span durations must be non-negative",
            ));
        }
        Ok(())
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            min_similarity: Self::DEFAULT_MIN_SIMILARITY,
            hinted_min_similarity: Self::DEFAULT_HINTED_MIN_SIMILARITY,
            time_hint_min_similarity: Self::DEFAULT_TIME_HINT_MIN_SIMILARITY,
            max_segment_window: Self::DEFAULT_MAX_SEGMENT_WINDOW,
            min_quote_words: Self::DEFAULT_MIN_QUOTE_WORDS,
            time_hint_radius_secs: Self::DEFAULT_TIME_HINT_RADIUS_SECS,
            min_span_secs: Self::DEFAULT_MIN_SPAN_SECS,
            merge_gap_secs: Self::DEFAULT_MERGE_GAP_SECS,
            context_segments: Self::DEFAULT_CONTEXT_SEGMENTS,
            context_chars: Self::DEFAULT_CONTEXT_CHARS,
            context_max_words: Self::DEFAULT_CONTEXT_MAX_WORDS,
            timestamp_fallback: true,
            timestamp_fallback_confidence: Self::DEFAULT_TIMESTAMP_FALLBACK_CONFIDENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_observed_constants() {
        let config = AlignConfig::default();
        assert!((config.min_similarity - 0.80).abs() < f32::EPSILON);
        assert!((config.hinted_min_similarity - 0.75).abs() < f32::EPSILON);
        assert!((config.time_hint_min_similarity - 0.60).abs() < f32::EPSILON);
        assert_eq!(config.max_segment_window, 5);
        assert_eq!(config.min_quote_words, 3);
        assert!((config.time_hint_radius_secs - 30.0).abs() < f64::EPSILON);
        assert!((config.min_span_secs - 15.0).abs() < f64::EPSILON);
        assert!((config.merge_gap_secs - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.context_segments, 2);
        assert_eq!(config.context_chars, 150);
        assert_eq!(config.context_max_words, 40);
        assert!(config.timestamp_fallback);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AlignConfig =
            serde_json::from_str(r#"{"min_similarity": 0.9, "merge_gap_secs": 2.5}"#)
                .expect("valid config json");
        assert!((config.min_similarity - 0.9).abs() < f32::EPSILON);
        assert!((config.merge_gap_secs - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.max_segment_window, 5);
        assert!((config.min_span_secs - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_out_of_range_similarity() {
        let config = AlignConfig {
            min_similarity: 1.5,
            ..AlignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let config = AlignConfig {
            max_segment_window: 0,
            ..AlignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_durations() {
        let config = AlignConfig {
            merge_gap_secs: -1.0,
            ..AlignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_fails_on_missing_file() {
        let result = AlignConfig::load(Path::new("/nonexistent/align_config.json"));
        assert!(result.is_err());
    }
}
