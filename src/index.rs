//! Derived, read-only view of one transcript, built once per alignment
//! request and consulted by every matching strategy. Never mutated after
//! construction, so it can be shared by reference across concurrent quote
//! lookups without synchronization; a changed transcript requires a rebuild.

use crate::normalize::{normalize_for_display, normalize_for_match};
use crate::types::TranscriptSegment;

/// Maps a byte range of the joined normalized text back to a segment.
///
/// Ranges are `[start_pos, end_pos)`, contiguous, and cover the whole
/// joined text; the separator space after a segment belongs to that
/// segment's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBounds {
    pub segment_idx: usize,
    pub start_pos: usize,
    pub end_pos: usize,
}

/// One whitespace-delimited word of the joined normalized text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WordSpan {
    pub start: usize,
    pub end: usize,
}

pub struct TranscriptIndex {
    segments: Vec<TranscriptSegment>,
    display: Vec<String>,
    norm: Vec<String>,
    joined: String,
    joined_display: String,
    bounds: Vec<SegmentBounds>,
    words: Vec<WordSpan>,
}

impl TranscriptIndex {
    /// O(total text length). Callers must not rebuild per quote; one build
    /// serves every lookup against the same transcript.
    pub fn build(segments: &[TranscriptSegment]) -> Self {
        let display: Vec<String> = segments
            .iter()
            .map(|s| normalize_for_display(&s.text))
            .collect();
        let norm: Vec<String> = segments
            .iter()
            .map(|s| normalize_for_match(&s.text))
            .collect();

        let total: usize = norm.iter().map(|t| t.len() + 1).sum();
        let last_nonempty = norm.iter().rposition(|t| !t.is_empty());

        let mut joined = String::with_capacity(total);
        let mut bounds = Vec::with_capacity(norm.len());
        for (i, text) in norm.iter().enumerate() {
            let start_pos = joined.len();
            joined.push_str(text);
            if !text.is_empty() && Some(i) != last_nonempty {
                joined.push(' ');
            }
            bounds.push(SegmentBounds {
                segment_idx: i,
                start_pos,
                end_pos: joined.len(),
            });
        }

        let joined_display = display
            .iter()
            .filter(|t| !t.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        let words = collect_words(&joined);
        tracing::debug!(
            segments = segments.len(),
            joined_len = joined.len(),
            words = words.len(),
            "built transcript index"
        );

        Self {
            segments: segments.to_vec(),
            display,
            norm,
            joined,
            joined_display,
            bounds,
            words,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment(&self, idx: usize) -> &TranscriptSegment {
        &self.segments[idx]
    }

    pub fn norm_segment(&self, idx: usize) -> &str {
        &self.norm[idx]
    }

    pub fn display_segment(&self, idx: usize) -> &str {
        &self.display[idx]
    }

    /// Joined normalized transcript text; what every strategy searches.
    pub fn joined(&self) -> &str {
        &self.joined
    }

    /// Joined display-form transcript text, casing preserved.
    pub fn joined_display(&self) -> &str {
        &self.joined_display
    }

    pub fn bounds(&self) -> &[SegmentBounds] {
        &self.bounds
    }

    pub(crate) fn words(&self) -> &[WordSpan] {
        &self.words
    }

    /// Resolves a byte offset of the joined text to its segment, O(log n).
    pub fn segment_at_offset(&self, pos: usize) -> Option<usize> {
        if pos >= self.joined.len() {
            return None;
        }
        let idx = self.bounds.partition_point(|b| b.start_pos <= pos);
        let b = self.bounds.get(idx.checked_sub(1)?)?;
        (pos < b.end_pos).then_some(b.segment_idx)
    }

    /// First segment containing the instant `t`. Linear over the segment
    /// list; transcripts are bounded in practice and the overlap invariant
    /// rules out a plain binary search on `start` alone.
    pub fn segment_at_time(&self, t: f64) -> Option<usize> {
        self.segments.iter().position(|s| s.contains_time(t))
    }

    pub fn total_duration(&self) -> f64 {
        self.segments.iter().fold(0.0, |acc, s| acc.max(s.end()))
    }

    /// Display text of segments `first..=last`, skipping empty entries.
    pub fn display_range(&self, first: usize, last: usize) -> String {
        self.display[first..=last.min(self.display.len().saturating_sub(1))]
            .iter()
            .filter(|t| !t.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn collect_words(joined: &str) -> Vec<WordSpan> {
    let mut words = Vec::new();
    let mut start = None;
    for (i, c) in joined.char_indices() {
        if c == ' ' {
            if let Some(s) = start.take() {
                words.push(WordSpan { start: s, end: i });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push(WordSpan {
            start: s,
            end: joined.len(),
        });
    }
    words
}
