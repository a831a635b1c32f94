//! Canonicalization applied to transcript and quote text before comparison,
//! so matching is not defeated by cosmetic differences in quoting, dashes,
//! or whitespace.

/// Matching form: punctuation folded, whitespace collapsed, case folded.
///
/// All matching strategies compare this form; display output keeps the
/// original casing via [`normalize_for_display`].
pub fn normalize_for_match(text: &str) -> String {
    collapse_whitespace(&fold_punctuation(text)).to_lowercase()
}

/// Display form: same folding as the matching form but case-preserving.
pub fn normalize_for_display(text: &str) -> String {
    collapse_whitespace(&fold_punctuation(text))
}

fn fold_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2039}' | '\u{203A}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => out.push('-'),
            c if c.is_whitespace() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
