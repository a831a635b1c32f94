//! Converts matched segment ranges into timestamp intervals and coalesces
//! near-adjacent intervals so a timeline UI is not flooded with
//! micro-highlights.

use std::cmp::Ordering;

use crate::config::AlignConfig;
use crate::index::TranscriptIndex;
use crate::matching::TimeHint;
use crate::types::{MatchResult, ResolvedSpan};

/// Separator inserted between texts of merged spans.
const MERGE_SEPARATOR: &str = " ... ";

/// Converts a match into a `{start, end}` interval in seconds.
///
/// The segment range is widened by `config.context_segments` on each side,
/// then the `min_span_secs` floor extends `end` forward — never `start`
/// backward, so the anchor point the viewer lands on is preserved. Both
/// edges stay within the transcript's total duration; near the tail the
/// floor is therefore best-effort.
pub fn resolve_span(
    result: &MatchResult,
    index: &TranscriptIndex,
    config: &AlignConfig,
    source: Option<&str>,
) -> ResolvedSpan {
    resolve_segment_range(
        index,
        result.start_segment,
        result.end_segment,
        result.confidence,
        config,
        source,
    )
}

/// Span anchored at a quote's own timestamp hint, used when every matching
/// strategy failed but the hinted time lands inside the transcript.
pub fn span_for_time_hint(
    index: &TranscriptIndex,
    hint: TimeHint,
    config: &AlignConfig,
    source: &str,
) -> Option<ResolvedSpan> {
    let first = index.segment_at_time(hint.start)?;
    let last = hint
        .end
        .and_then(|t| index.segment_at_time(t))
        .filter(|&l| l >= first)
        .unwrap_or(first);
    Some(resolve_segment_range(
        index,
        first,
        last,
        config.timestamp_fallback_confidence,
        config,
        Some(source),
    ))
}

fn resolve_segment_range(
    index: &TranscriptIndex,
    start_segment: usize,
    end_segment: usize,
    confidence: f32,
    config: &AlignConfig,
    source: Option<&str>,
) -> ResolvedSpan {
    let count = index.segment_count();
    if count == 0 {
        return ResolvedSpan {
            start: 0.0,
            end: 0.0,
            text: String::new(),
            confidence,
            sources: source.map(|s| vec![s.to_string()]).unwrap_or_default(),
        };
    }

    let first = start_segment.saturating_sub(config.context_segments);
    let last = (end_segment + config.context_segments).min(count - 1);

    let start = index.segment(first).start;
    let mut end = index.segment(last).end();
    let total = index.total_duration();
    if end - start < config.min_span_secs {
        end = (start + config.min_span_secs).min(total);
    }
    end = end.max(start);

    ResolvedSpan {
        start,
        end,
        text: index.display_range(first, last),
        confidence,
        sources: source.map(|s| vec![s.to_string()]).unwrap_or_default(),
    }
}

/// Merges spans whose temporal gap is at most `gap_secs`.
///
/// Input order does not matter; output is sorted by `start`. Merged texts
/// are joined with a visible separator and source attributions are unioned.
pub fn merge_spans(mut spans: Vec<ResolvedSpan>, gap_secs: f64) -> Vec<ResolvedSpan> {
    if spans.len() < 2 {
        return spans;
    }
    spans.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));

    let mut merged: Vec<ResolvedSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(prev) if span.start - prev.end <= gap_secs => {
                tracing::debug!(
                    prev_end = prev.end,
                    next_start = span.start,
                    gap_secs,
                    "merging near-adjacent spans"
                );
                // A span fully inside the previous one contributes no new text.
                let redundant_text = span.end <= prev.end && prev.text.contains(&span.text);
                if !redundant_text && !span.text.is_empty() {
                    if prev.text.is_empty() {
                        prev.text = span.text;
                    } else {
                        prev.text.push_str(MERGE_SEPARATOR);
                        prev.text.push_str(&span.text);
                    }
                }
                prev.end = prev.end.max(span.end);
                prev.confidence = prev.confidence.max(span.confidence);
                for s in span.sources {
                    if !prev.sources.contains(&s) {
                        prev.sources.push(s);
                    }
                }
            }
            _ => merged.push(span),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchStrategy, TranscriptSegment};

    fn seg(text: &str, start: f64, duration: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start,
            duration,
        }
    }

    fn long_transcript() -> Vec<TranscriptSegment> {
        (0..20)
            .map(|i| seg(&format!("segment number {i} words"), i as f64 * 4.0, 4.0))
            .collect()
    }

    fn match_on(start_segment: usize, end_segment: usize) -> MatchResult {
        MatchResult {
            start_segment,
            end_segment,
            start_offset: 0,
            end_offset: 1,
            confidence: 0.9,
            strategy: MatchStrategy::Fuzzy,
        }
    }

    fn span(start: f64, end: f64) -> ResolvedSpan {
        ResolvedSpan {
            start,
            end,
            text: format!("text {start}"),
            confidence: 0.8,
            sources: vec![format!("quote {start}")],
        }
    }

    #[test]
    fn minimal_span_respects_floor() {
        let segments = long_transcript();
        let index = crate::index::TranscriptIndex::build(&segments);
        let config = AlignConfig {
            context_segments: 0,
            ..AlignConfig::default()
        };
        let resolved = resolve_span(&match_on(2, 2), &index, &config, Some("q"));
        assert!((resolved.start - 8.0).abs() < 1e-9);
        assert!(resolved.end - resolved.start >= config.min_span_secs - 1e-9);
        assert!((resolved.end - 23.0).abs() < 1e-9);
    }

    #[test]
    fn floor_never_moves_start_backward() {
        let segments = long_transcript();
        let index = crate::index::TranscriptIndex::build(&segments);
        let config = AlignConfig {
            context_segments: 0,
            ..AlignConfig::default()
        };
        let resolved = resolve_span(&match_on(5, 5), &index, &config, None);
        assert!((resolved.start - 20.0).abs() < 1e-9);
    }

    #[test]
    fn floor_clamps_to_transcript_tail() {
        let segments = vec![seg("the quick brown fox", 0.0, 3.0), seg("over the lazy dog", 3.0, 2.0)];
        let index = crate::index::TranscriptIndex::build(&segments);
        let config = AlignConfig {
            context_segments: 0,
            ..AlignConfig::default()
        };
        let resolved = resolve_span(&match_on(0, 1), &index, &config, None);
        assert!((resolved.start - 0.0).abs() < 1e-9);
        assert!((resolved.end - 5.0).abs() < 1e-9);
    }

    #[test]
    fn context_extension_widens_segment_range() {
        let segments = long_transcript();
        let index = crate::index::TranscriptIndex::build(&segments);
        let config = AlignConfig::default();
        let resolved = resolve_span(&match_on(5, 5), &index, &config, None);
        // Two segments on each side: 3..=7, so start at 12s.
        assert!((resolved.start - 12.0).abs() < 1e-9);
        assert!(resolved.text.contains("segment number 3"));
        assert!(resolved.text.contains("segment number 7"));
    }

    #[test]
    fn context_extension_clamps_at_edges() {
        let segments = long_transcript();
        let index = crate::index::TranscriptIndex::build(&segments);
        let config = AlignConfig::default();
        let resolved = resolve_span(&match_on(0, 0), &index, &config, None);
        assert!((resolved.start - 0.0).abs() < 1e-9);
        let resolved = resolve_span(&match_on(19, 19), &index, &config, None);
        assert!(resolved.end <= index.total_duration() + 1e-9);
    }

    #[test]
    fn merges_spans_within_gap() {
        let merged = merge_spans(vec![span(10.0, 20.0), span(23.0, 30.0)], 5.0);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].start - 10.0).abs() < 1e-9);
        assert!((merged[0].end - 30.0).abs() < 1e-9);
        assert_eq!(merged[0].text, "text 10 ... text 23");
    }

    #[test]
    fn does_not_merge_spans_beyond_gap() {
        let merged = merge_spans(vec![span(10.0, 20.0), span(40.0, 50.0)], 5.0);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_sorts_unordered_input() {
        let merged = merge_spans(vec![span(23.0, 30.0), span(10.0, 20.0)], 5.0);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].start - 10.0).abs() < 1e-9);
    }

    #[test]
    fn merge_unions_sources_and_keeps_max_confidence() {
        let mut a = span(10.0, 20.0);
        a.confidence = 0.6;
        let mut b = span(22.0, 28.0);
        b.confidence = 0.95;
        let merged = merge_spans(vec![a, b], 5.0);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].confidence - 0.95).abs() < f32::EPSILON);
        assert_eq!(
            merged[0].sources,
            vec!["quote 10".to_string(), "quote 22".to_string()]
        );
    }

    #[test]
    fn contained_duplicate_span_adds_no_text() {
        let a = ResolvedSpan {
            start: 10.0,
            end: 30.0,
            text: "outer text".to_string(),
            confidence: 0.9,
            sources: vec!["a".to_string()],
        };
        let b = ResolvedSpan {
            start: 12.0,
            end: 20.0,
            text: "outer text".to_string(),
            confidence: 0.5,
            sources: vec!["b".to_string()],
        };
        let merged = merge_spans(vec![a, b], 5.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "outer text");
        assert_eq!(merged[0].sources.len(), 2);
    }

    #[test]
    fn fallback_span_uses_hint_containing_segment() {
        let segments = long_transcript();
        let index = crate::index::TranscriptIndex::build(&segments);
        let config = AlignConfig {
            context_segments: 0,
            ..AlignConfig::default()
        };
        let hint = TimeHint {
            start: 41.0,
            end: None,
        };
        let resolved = span_for_time_hint(&index, hint, &config, "claimed quote")
            .expect("hint lands inside the transcript");
        assert!((resolved.start - 40.0).abs() < 1e-9);
        assert!(
            (resolved.confidence - config.timestamp_fallback_confidence).abs() < f32::EPSILON
        );
        assert_eq!(resolved.sources, vec!["claimed quote".to_string()]);
    }

    #[test]
    fn fallback_span_rejects_out_of_range_hint() {
        let segments = long_transcript();
        let index = crate::index::TranscriptIndex::build(&segments);
        let config = AlignConfig::default();
        let hint = TimeHint {
            start: 500.0,
            end: None,
        };
        assert!(span_for_time_hint(&index, hint, &config, "q").is_none());
    }
}
