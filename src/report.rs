//! Serializable quality report over one alignment batch, produced by the
//! `align-report` binary.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{MatchResult, MatchStrategy, Quote, ResolvedSpan};

/// Matched cases below this confidence are counted separately in the
/// aggregates so drift in the fuzzy thresholds is visible at a glance.
const LOW_CONFIDENCE_THRESHOLD: f32 = 0.7;

#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    pub schema_version: u32,
    pub meta: ReportMeta,
    pub cases: Vec<CaseReport>,
    pub aggregates: AggregateReport,
}

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub generated_at: String,
    pub transcript_segments: usize,
    pub total_duration_secs: f64,
    pub case_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub quote: String,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MatchStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_secs: Option<f64>,
}

impl CaseReport {
    pub fn from_outcome(quote: &Quote, outcome: Option<(&MatchResult, &ResolvedSpan)>) -> Self {
        match outcome {
            Some((result, span)) => Self {
                quote: quote.text.clone(),
                matched: true,
                strategy: Some(result.strategy),
                confidence: Some(result.confidence),
                start_secs: Some(span.start),
                end_secs: Some(span.end),
            },
            None => Self {
                quote: quote.text.clone(),
                matched: false,
                strategy: None,
                confidence: None,
                start_secs: None,
                end_secs: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub matched_count: usize,
    pub unmatched_count: usize,
    pub match_rate: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_confidence: Option<f32>,
    pub low_confidence_count: usize,
    pub strategy_counts: BTreeMap<&'static str, usize>,
    pub merged_span_count: usize,
}

pub fn aggregate_cases(cases: &[CaseReport], merged_span_count: usize) -> AggregateReport {
    let matched: Vec<&CaseReport> = cases.iter().filter(|c| c.matched).collect();
    let matched_count = matched.len();
    let unmatched_count = cases.len() - matched_count;

    let mut strategy_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for case in &matched {
        if let Some(strategy) = case.strategy {
            *strategy_counts.entry(strategy.as_str()).or_insert(0) += 1;
        }
    }

    let confidences: Vec<f32> = matched.iter().filter_map(|c| c.confidence).collect();
    let mean_confidence = if confidences.is_empty() {
        None
    } else {
        Some(confidences.iter().sum::<f32>() / confidences.len() as f32)
    };
    let low_confidence_count = confidences
        .iter()
        .filter(|&&c| c < LOW_CONFIDENCE_THRESHOLD)
        .count();

    let match_rate = if cases.is_empty() {
        0.0
    } else {
        matched_count as f32 / cases.len() as f32
    };

    AggregateReport {
        matched_count,
        unmatched_count,
        match_rate,
        mean_confidence,
        low_confidence_count,
        strategy_counts,
        merged_span_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(matched: bool, strategy: Option<MatchStrategy>, confidence: Option<f32>) -> CaseReport {
        CaseReport {
            quote: "q".to_string(),
            matched,
            strategy,
            confidence,
            start_secs: matched.then_some(0.0),
            end_secs: matched.then_some(15.0),
        }
    }

    #[test]
    fn aggregates_counts_and_rates() {
        let cases = vec![
            case(true, Some(MatchStrategy::Exact), Some(1.0)),
            case(true, Some(MatchStrategy::Fuzzy), Some(0.85)),
            case(true, Some(MatchStrategy::TimeGuided), Some(0.6)),
            case(false, None, None),
        ];
        let agg = aggregate_cases(&cases, 2);
        assert_eq!(agg.matched_count, 3);
        assert_eq!(agg.unmatched_count, 1);
        assert!((agg.match_rate - 0.75).abs() < 1e-6);
        assert_eq!(agg.low_confidence_count, 1);
        assert_eq!(agg.strategy_counts.get("exact"), Some(&1));
        assert_eq!(agg.strategy_counts.get("fuzzy"), Some(&1));
        assert_eq!(agg.strategy_counts.get("time_guided"), Some(&1));
        assert_eq!(agg.merged_span_count, 2);
        let mean = agg.mean_confidence.expect("has matches");
        assert!((mean - (1.0 + 0.85 + 0.6) / 3.0).abs() < 1e-6);
    }

    #[test]
    fn empty_batch_aggregates_to_zeroes() {
        let agg = aggregate_cases(&[], 0);
        assert_eq!(agg.matched_count, 0);
        assert_eq!(agg.match_rate, 0.0);
        assert!(agg.mean_confidence.is_none());
    }
}
