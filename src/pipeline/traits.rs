use crate::config::AlignConfig;
use crate::index::TranscriptIndex;
use crate::matching::MatchOptions;
use crate::types::{CitedAnswer, MatchResult, ResolvedSpan};

pub trait QuoteMatcher: Send + Sync {
    fn match_quote(
        &self,
        index: &TranscriptIndex,
        quote_text: &str,
        opts: &MatchOptions,
    ) -> Option<MatchResult>;
}

pub trait SpanResolver: Send + Sync {
    fn resolve(
        &self,
        result: &MatchResult,
        index: &TranscriptIndex,
        config: &AlignConfig,
        source: Option<&str>,
    ) -> ResolvedSpan;
}

pub trait CitationScanner: Send + Sync {
    fn scan(&self, answer: &str, index: &TranscriptIndex, config: &AlignConfig) -> CitedAnswer;
}
