use crate::index::TranscriptIndex;
use crate::types::{MatchResult, MatchStrategy};

/// Strategy 3: slide a quote-length word subsequence over the transcript
/// and score each candidate by normalized edit distance.
///
/// Candidates are word ranges of the joined text restricted to at most
/// `max_segment_window` consecutive segments; cost is O(words · quote
/// length) with the window caps, which stays practical for multi-hour
/// transcripts. An optional segment range further restricts the scan for
/// the time-guided strategy.
pub(super) fn sliding_window(
    index: &TranscriptIndex,
    quote: &str,
    min_similarity: f32,
    max_segment_window: usize,
    segment_range: Option<(usize, usize)>,
    strategy: MatchStrategy,
) -> Option<MatchResult> {
    let words = index.words();
    let quote_words = quote.split(' ').filter(|w| !w.is_empty()).count();
    if quote_words == 0 || words.len() < quote_words {
        return None;
    }

    let quote_chars: Vec<char> = quote.chars().collect();
    let mut best: Option<(f32, usize, usize)> = None;

    for k in 0..=(words.len() - quote_words) {
        let start = words[k].start;
        let end = words[k + quote_words - 1].end;

        let Some(first_seg) = index.segment_at_offset(start) else {
            continue;
        };
        let Some(last_seg) = index.segment_at_offset(end - 1) else {
            continue;
        };
        if last_seg - first_seg + 1 > max_segment_window {
            continue;
        }
        if let Some((lo, hi)) = segment_range {
            if first_seg < lo || last_seg > hi {
                continue;
            }
        }

        let candidate = &index.joined()[start..end];
        let candidate_chars: Vec<char> = candidate.chars().collect();
        if !passes_length_gate(candidate_chars.len(), quote_chars.len(), min_similarity) {
            continue;
        }

        let sim = similarity(&candidate_chars, &quote_chars);
        if best.map_or(true, |(b, _, _)| sim > b) {
            best = Some((sim, start, end));
        }
    }

    let (sim, start, end) = best?;
    if sim < min_similarity {
        tracing::debug!(
            best_similarity = format!("{:.3}", sim),
            bar = format!("{:.2}", min_similarity),
            "fuzzy candidate below similarity bar"
        );
        return None;
    }
    super::result_for_range(index, start, end, sim, strategy)
}

/// The edit distance is at least the length difference, so candidates whose
/// length differs too much cannot clear the bar; skip the DP for them.
fn passes_length_gate(a_len: usize, b_len: usize, min_similarity: f32) -> bool {
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return true;
    }
    let diff = a_len.abs_diff(b_len);
    (diff as f32) / (max_len as f32) <= 1.0 - min_similarity
}

/// Normalized similarity: `(max_len - levenshtein) / max_len`, in [0, 1].
pub(super) fn similarity(a: &[char], b: &[char]) -> f32 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    let dist = levenshtein(a, b);
    (max_len - dist) as f32 / max_len as f32
}

/// Two-row Levenshtein; O(len(a) · len(b)) time, O(len(b)) space.
pub(super) fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitute.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein(&chars(""), &chars("")), 0);
        assert_eq!(levenshtein(&chars("abc"), &chars("")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars("flaw"), &chars("lawn")), 2);
        assert_eq!(levenshtein(&chars("same"), &chars("same")), 0);
    }

    #[test]
    fn similarity_is_normalized() {
        assert!((similarity(&chars("abcd"), &chars("abcd")) - 1.0).abs() < f32::EPSILON);
        assert!((similarity(&chars(""), &chars("")) - 1.0).abs() < f32::EPSILON);
        let sim = similarity(&chars("abcd"), &chars("abcx"));
        assert!((sim - 0.75).abs() < 1e-6);
    }

    #[test]
    fn length_gate_rejects_hopeless_candidates() {
        // 10 vs 20 chars: distance is at least 10, similarity at most 0.5.
        assert!(!passes_length_gate(10, 20, 0.8));
        assert!(passes_length_gate(19, 20, 0.8));
        assert!(passes_length_gate(0, 0, 0.8));
    }
}
