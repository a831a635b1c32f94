use crate::config::AlignConfig;
use crate::error::AlignError;
use crate::pipeline::defaults::{CascadeMatcher, ContextSpanResolver, InlineCitationScanner};
use crate::pipeline::runtime::{QuoteAligner, QuoteAlignerParts};
use crate::pipeline::traits::{CitationScanner, QuoteMatcher, SpanResolver};

pub struct QuoteAlignerBuilder {
    config: AlignConfig,
    matcher: Option<Box<dyn QuoteMatcher>>,
    resolver: Option<Box<dyn SpanResolver>>,
    citation_scanner: Option<Box<dyn CitationScanner>>,
}

impl QuoteAlignerBuilder {
    pub fn new(config: AlignConfig) -> Self {
        Self {
            config,
            matcher: None,
            resolver: None,
            citation_scanner: None,
        }
    }

    pub fn with_matcher(mut self, matcher: Box<dyn QuoteMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn with_resolver(mut self, resolver: Box<dyn SpanResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_citation_scanner(mut self, citation_scanner: Box<dyn CitationScanner>) -> Self {
        self.citation_scanner = Some(citation_scanner);
        self
    }

    pub fn build(self) -> Result<QuoteAligner, AlignError> {
        self.config.validate()?;
        Ok(QuoteAligner::from_parts(QuoteAlignerParts {
            config: self.config,
            matcher: self.matcher.unwrap_or_else(|| Box::new(CascadeMatcher)),
            resolver: self.resolver.unwrap_or_else(|| Box::new(ContextSpanResolver)),
            citation_scanner: self
                .citation_scanner
                .unwrap_or_else(|| Box::new(InlineCitationScanner)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TranscriptIndex;
    use crate::matching::MatchOptions;
    use crate::types::{MatchResult, MatchStrategy, Quote, TranscriptSegment};

    struct FixedMatcher;

    impl QuoteMatcher for FixedMatcher {
        fn match_quote(
            &self,
            _index: &TranscriptIndex,
            _quote_text: &str,
            _opts: &MatchOptions,
        ) -> Option<MatchResult> {
            Some(MatchResult {
                start_segment: 0,
                end_segment: 0,
                start_offset: 0,
                end_offset: 1,
                confidence: 0.5,
                strategy: MatchStrategy::Fuzzy,
            })
        }
    }

    fn seg(text: &str, start: f64, duration: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start,
            duration,
        }
    }

    #[test]
    fn build_succeeds_with_defaults() {
        let aligner = QuoteAlignerBuilder::new(AlignConfig::default())
            .build()
            .expect("default config is valid");
        let out = aligner.align(&[], &[]);
        assert!(out.spans.is_empty());
        assert!(out.unmatched.is_empty());
    }

    #[test]
    fn build_fails_on_invalid_config() {
        let config = AlignConfig {
            min_similarity: 2.0,
            ..AlignConfig::default()
        };
        assert!(QuoteAlignerBuilder::new(config).build().is_err());
    }

    #[test]
    fn matcher_override_is_used() {
        let aligner = QuoteAlignerBuilder::new(AlignConfig::default())
            .with_matcher(Box::new(FixedMatcher))
            .build()
            .expect("valid config");
        let segments = vec![seg("anything at all here", 0.0, 20.0)];
        let quotes = vec![Quote {
            timestamp: None,
            text: "words that appear nowhere in the transcript".to_string(),
        }];
        let out = aligner.align(&segments, &quotes);
        assert_eq!(out.spans.len(), 1);
        assert!(out.unmatched.is_empty());
        assert!((out.spans[0].confidence - 0.5).abs() < f32::EPSILON);
    }
}
