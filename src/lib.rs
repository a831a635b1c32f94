pub mod citations;
pub mod config;
pub mod error;
pub mod index;
pub mod matching;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod span;
pub mod types;

pub use citations::{extract_citations, parse_time_hint};
pub use config::AlignConfig;
pub use error::AlignError;
pub use index::{SegmentBounds, TranscriptIndex};
pub use matching::{match_quote, MatchOptions, TimeHint};
pub use pipeline::builder::QuoteAlignerBuilder;
pub use pipeline::runtime::QuoteAligner;
pub use pipeline::traits::{CitationScanner, QuoteMatcher, SpanResolver};
pub use span::{merge_spans, resolve_span, span_for_time_hint};
pub use types::{
    AlignOutput, Citation, CitedAnswer, MatchResult, MatchStrategy, Quote, ResolvedSpan,
    TranscriptSegment,
};
