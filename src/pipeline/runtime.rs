use crate::citations::parse_time_hint;
use crate::config::AlignConfig;
use crate::index::TranscriptIndex;
use crate::matching::MatchOptions;
use crate::pipeline::traits::{CitationScanner, QuoteMatcher, SpanResolver};
use crate::span::{merge_spans, span_for_time_hint};
use crate::types::{AlignOutput, CitedAnswer, Quote, ResolvedSpan, TranscriptSegment};

/// Request-scoped alignment engine: stateless between calls, no shared
/// mutable state. Each call builds its own [`TranscriptIndex`]; the index
/// is read-only after construction, so matches over it are pure functions
/// a host may fan out across threads.
pub struct QuoteAligner {
    config: AlignConfig,
    matcher: Box<dyn QuoteMatcher>,
    resolver: Box<dyn SpanResolver>,
    citation_scanner: Box<dyn CitationScanner>,
}

pub(crate) struct QuoteAlignerParts {
    pub config: AlignConfig,
    pub matcher: Box<dyn QuoteMatcher>,
    pub resolver: Box<dyn SpanResolver>,
    pub citation_scanner: Box<dyn CitationScanner>,
}

impl QuoteAligner {
    pub(crate) fn from_parts(parts: QuoteAlignerParts) -> Self {
        Self {
            config: parts.config,
            matcher: parts.matcher,
            resolver: parts.resolver,
            citation_scanner: parts.citation_scanner,
        }
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Aligns a batch of quotes against one transcript.
    ///
    /// Per-quote failure isolation: a quote that fails to match (or carries
    /// garbage input) lands in `unmatched` and never aborts the rest of the
    /// batch. Resolved spans are merged before being returned.
    pub fn align(&self, segments: &[TranscriptSegment], quotes: &[Quote]) -> AlignOutput {
        if segments.is_empty() || quotes.is_empty() {
            return AlignOutput {
                spans: Vec::new(),
                unmatched: quotes.to_vec(),
            };
        }

        let index = TranscriptIndex::build(segments);
        let total = index.total_duration();
        let mut spans: Vec<ResolvedSpan> = Vec::with_capacity(quotes.len());
        let mut unmatched: Vec<Quote> = Vec::new();

        for quote in quotes {
            let hint = quote.timestamp.as_deref().and_then(parse_time_hint);
            if let Some(h) = hint {
                if h.start > total {
                    tracing::warn!(
                        hint_start = h.start,
                        total_duration = total,
                        "timestamp hint beyond transcript end"
                    );
                }
            }

            let mut opts = MatchOptions::from_config(&self.config);
            if let Some(h) = hint {
                opts = opts.with_time_hint(h);
            }

            match self.matcher.match_quote(&index, &quote.text, &opts) {
                Some(result) => {
                    spans.push(
                        self.resolver
                            .resolve(&result, &index, &self.config, Some(&quote.text)),
                    );
                }
                None => match self.fallback_span(&index, hint, quote) {
                    Some(span) => spans.push(span),
                    None => {
                        tracing::debug!(quote = quote.text.as_str(), "quote unmatched");
                        unmatched.push(quote.clone());
                    }
                },
            }
        }

        AlignOutput {
            spans: merge_spans(spans, self.config.merge_gap_secs),
            unmatched,
        }
    }

    /// Extracts inline `[MM:SS]` citations from a free-form answer.
    pub fn cite(&self, segments: &[TranscriptSegment], answer: &str) -> CitedAnswer {
        let index = TranscriptIndex::build(segments);
        self.citation_scanner.scan(answer, &index, &self.config)
    }

    fn fallback_span(
        &self,
        index: &TranscriptIndex,
        hint: Option<crate::matching::TimeHint>,
        quote: &Quote,
    ) -> Option<ResolvedSpan> {
        if !self.config.timestamp_fallback {
            return None;
        }
        let span = span_for_time_hint(index, hint?, &self.config, &quote.text)?;
        tracing::debug!(
            start = span.start,
            end = span.end,
            "quote unmatched by text; using timestamp-only span"
        );
        Some(span)
    }
}
