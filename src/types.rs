use serde::{Deserialize, Serialize};

/// One timed unit of transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Seconds from the start of the video.
    pub start: f64,
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Containment check is inclusive on both edges; adjacent segments may
    /// overlap slightly, so a boundary instant can belong to two segments.
    pub fn contains_time(&self, t: f64) -> bool {
        self.start <= t && t <= self.end()
    }
}

/// One quote proposed by the text generator. Untrusted: the text may be
/// paraphrased, truncated, or invented, and the timestamp may be absent,
/// malformed, or inconsistent with the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Producer-claimed source position, `[MM:SS]` or `[MM:SS-MM:SS]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    MultiExact,
    Fuzzy,
    TimeGuided,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::MultiExact => "multi_exact",
            MatchStrategy::Fuzzy => "fuzzy",
            MatchStrategy::TimeGuided => "time_guided",
        }
    }
}

/// Location of a matched quote inside the indexed transcript.
///
/// Offsets index the joined normalized text, `[start_offset, end_offset)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub start_segment: usize,
    pub end_segment: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Strength of the correspondence in [0, 1].
    pub confidence: f32,
    pub strategy: MatchStrategy,
}

/// Timestamp interval attributed to one or more quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSpan {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub confidence: f32,
    /// Source-quote attributions; merged spans union these.
    pub sources: Vec<String>,
}

/// Numbered reference from rewritten answer text back to a transcript time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    /// 1-based, assigned in first-appearance order. Repeated timestamps
    /// reuse their first number rather than being renumbered.
    pub number: u32,
    pub timestamp: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    pub text: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitedAnswer {
    pub content: String,
    pub citations: Vec<Citation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignOutput {
    pub spans: Vec<ResolvedSpan>,
    /// Quotes no strategy could place. Callers hide these or render them
    /// without a clickable timestamp.
    pub unmatched: Vec<Quote>,
}
