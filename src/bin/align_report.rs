use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use quote_align::report::{
    aggregate_cases, AlignmentReport, CaseReport, ReportMeta, REPORT_SCHEMA_VERSION,
};
use quote_align::{
    match_quote, parse_time_hint, resolve_span, AlignConfig, MatchOptions, Quote,
    QuoteAlignerBuilder, TranscriptIndex, TranscriptSegment,
};

/// Align a batch of LLM quotes (or an answer's inline citations) against a
/// transcript and emit a JSON quality report.
#[derive(Debug, Parser)]
#[command(name = "align-report")]
struct Args {
    /// Transcript JSON: array of {text, start, duration}.
    #[arg(long)]
    transcript: PathBuf,
    /// Quotes JSON: array of {timestamp?, text}.
    #[arg(long, conflicts_with = "answer")]
    quotes: Option<PathBuf>,
    /// Free-form answer text to scan for [MM:SS] citation tokens.
    #[arg(long)]
    answer: Option<PathBuf>,
    /// Config JSON overriding the default thresholds.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("align-report: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => AlignConfig::load(path).map_err(|e| e.to_string())?,
        None => AlignConfig::default(),
    };
    let segments: Vec<TranscriptSegment> = load_json(&args.transcript, "transcript")?;

    let report_json = match (&args.quotes, &args.answer) {
        (Some(quotes_path), None) => {
            let quotes: Vec<Quote> = load_json(quotes_path, "quotes")?;
            let report = quote_report(&segments, &quotes, &config)?;
            serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?
        }
        (None, Some(answer_path)) => {
            let answer = fs::read_to_string(answer_path)
                .map_err(|e| format!("read answer file: {e}"))?;
            let aligner = QuoteAlignerBuilder::new(config)
                .build()
                .map_err(|e| e.to_string())?;
            let cited = aligner.cite(&segments, &answer);
            serde_json::to_string_pretty(&cited).map_err(|e| e.to_string())?
        }
        _ => return Err("exactly one of --quotes or --answer is required".to_string()),
    };

    match args.output {
        Some(path) => fs::write(&path, report_json)
            .map_err(|e| format!("write report to {}: {e}", path.display()))?,
        None => println!("{report_json}"),
    }
    Ok(())
}

fn quote_report(
    segments: &[TranscriptSegment],
    quotes: &[Quote],
    config: &AlignConfig,
) -> Result<AlignmentReport, String> {
    let index = TranscriptIndex::build(segments);
    let aligner = QuoteAlignerBuilder::new(config.clone())
        .build()
        .map_err(|e| e.to_string())?;

    let progress = ProgressBar::new(quotes.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut cases = Vec::with_capacity(quotes.len());
    for quote in quotes {
        progress.set_message(truncate_for_display(&quote.text));
        let mut opts = MatchOptions::from_config(config);
        if let Some(hint) = quote.timestamp.as_deref().and_then(parse_time_hint) {
            opts = opts.with_time_hint(hint);
        }
        let outcome = match_quote(&index, &quote.text, &opts)
            .map(|result| {
                let span = resolve_span(&result, &index, config, Some(&quote.text));
                (result, span)
            });
        cases.push(CaseReport::from_outcome(
            quote,
            outcome.as_ref().map(|(r, s)| (r, s)),
        ));
        progress.inc(1);
    }
    progress.finish_and_clear();

    let merged = aligner.align(segments, quotes);
    let aggregates = aggregate_cases(&cases, merged.spans.len());

    Ok(AlignmentReport {
        schema_version: REPORT_SCHEMA_VERSION,
        meta: ReportMeta {
            generated_at: Utc::now().to_rfc3339(),
            transcript_segments: segments.len(),
            total_duration_secs: index.total_duration(),
            case_count: cases.len(),
        },
        cases,
        aggregates,
    })
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T, String> {
    let data =
        fs::read_to_string(path).map_err(|e| format!("read {what} {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("parse {what} {}: {e}", path.display()))
}

fn truncate_for_display(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    if text.chars().count() <= MAX_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_CHARS).collect();
    format!("{cut}...")
}
