use crate::citations::extract_citations;
use crate::config::AlignConfig;
use crate::index::TranscriptIndex;
use crate::matching::{match_quote, MatchOptions};
use crate::pipeline::traits::{CitationScanner, QuoteMatcher, SpanResolver};
use crate::span::resolve_span;
use crate::types::{CitedAnswer, MatchResult, ResolvedSpan};

pub struct CascadeMatcher;

impl QuoteMatcher for CascadeMatcher {
    fn match_quote(
        &self,
        index: &TranscriptIndex,
        quote_text: &str,
        opts: &MatchOptions,
    ) -> Option<MatchResult> {
        match_quote(index, quote_text, opts)
    }
}

pub struct ContextSpanResolver;

impl SpanResolver for ContextSpanResolver {
    fn resolve(
        &self,
        result: &MatchResult,
        index: &TranscriptIndex,
        config: &AlignConfig,
        source: Option<&str>,
    ) -> ResolvedSpan {
        resolve_span(result, index, config, source)
    }
}

pub struct InlineCitationScanner;

impl CitationScanner for InlineCitationScanner {
    fn scan(&self, answer: &str, index: &TranscriptIndex, config: &AlignConfig) -> CitedAnswer {
        extract_citations(answer, index, config)
    }
}
