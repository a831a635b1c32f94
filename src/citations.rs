//! Inline-citation pipeline: scan a free-form answer for `[MM:SS]` /
//! `[MM:SS-MM:SS]` tokens, resolve each against the transcript, and rewrite
//! the answer with numbered citation markers.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::AlignConfig;
use crate::index::TranscriptIndex;
use crate::matching::TimeHint;
use crate::types::{Citation, CitedAnswer};

const TIMESTAMP_PATTERN: &str = r"\[(\d{1,3}):([0-5]\d)(?:\s*-\s*(\d{1,3}):([0-5]\d))?\]";

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TIMESTAMP_PATTERN).expect("timestamp pattern compiles"))
}

/// Parses a `[MM:SS]` or `[MM:SS-MM:SS]` token (brackets optional noise
/// around it is tolerated). Returns `None` for anything unparseable.
pub fn parse_time_hint(text: &str) -> Option<TimeHint> {
    let caps = timestamp_re().captures(text)?;
    let start = mmss_seconds(caps.get(1)?.as_str(), caps.get(2)?.as_str())?;
    let end = match (caps.get(3), caps.get(4)) {
        (Some(m), Some(s)) => Some(mmss_seconds(m.as_str(), s.as_str())?),
        _ => None,
    };
    Some(TimeHint { start, end })
}

fn mmss_seconds(minutes: &str, seconds: &str) -> Option<f64> {
    let m: u32 = minutes.parse().ok()?;
    let s: u32 = seconds.parse().ok()?;
    Some(f64::from(m * 60 + s))
}

/// Single left-to-right scan of `answer`.
///
/// Tokens whose start time no segment contains are removed and emit no
/// citation — precision over coverage, never a guess at the nearest
/// segment. Recognized tokens are rewritten in place as `[n]`, with `n`
/// stable per resolved `(start, end)` time across repeats.
pub fn extract_citations(
    answer: &str,
    index: &TranscriptIndex,
    config: &AlignConfig,
) -> CitedAnswer {
    let mut citations: Vec<Citation> = Vec::new();
    let mut numbers: HashMap<(u32, Option<u32>), u32> = HashMap::new();
    let mut content = String::with_capacity(answer.len());
    let mut cursor = 0;

    for token in timestamp_re().find_iter(answer) {
        content.push_str(&answer[cursor..token.start()]);
        cursor = token.end();

        let Some(hint) = parse_time_hint(token.as_str()) else {
            continue;
        };
        let Some(segment_idx) = index.segment_at_time(hint.start) else {
            tracing::warn!(
                token = token.as_str(),
                "citation timestamp outside transcript; dropping token"
            );
            continue;
        };

        let key = (hint.start as u32, hint.end.map(|e| e as u32));
        let number = match numbers.get(&key) {
            Some(&n) => n,
            None => {
                let n = (citations.len() + 1) as u32;
                numbers.insert(key, n);
                citations.push(Citation {
                    number: n,
                    timestamp: hint.start,
                    end_time: hint.end,
                    text: index.display_segment(segment_idx).to_string(),
                    context: capture_context(answer, token.start(), token.end(), config),
                });
                n
            }
        };
        let _ = write!(content, "[{number}]");
    }
    content.push_str(&answer[cursor..]);

    CitedAnswer {
        content: cleanup_whitespace(&content),
        citations,
    }
}

/// Characters around the token in the original answer, other tokens
/// stripped, whitespace collapsed, word-capped. UI preview only; never used
/// for matching.
fn capture_context(answer: &str, tok_start: usize, tok_end: usize, config: &AlignConfig) -> String {
    let begin = if config.context_chars == 0 {
        tok_start
    } else {
        answer[..tok_start]
            .char_indices()
            .rev()
            .nth(config.context_chars - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let end = answer[tok_end..]
        .char_indices()
        .nth(config.context_chars)
        .map(|(i, _)| tok_end + i)
        .unwrap_or(answer.len());

    let stripped = timestamp_re().replace_all(&answer[begin..end], "");
    stripped
        .split_whitespace()
        .take(config.context_max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses space/tab runs but preserves newlines (paragraph structure).
fn cleanup_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
