use once_cell::sync::Lazy;
use regex::Regex;

/// Longest line (in characters) that can still be a subtitle
pub const SUBTITLE_MAX_CHARS: usize = 70;
/// Most words an all-caps line can have and still be a subtitle
pub const SUBTITLE_MAX_WORDS: usize = 8;

/// A short "label:" heading such as `PRIMERA:` or `Objeto del contrato:`
static LABEL_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L} ]{3,40}:\s*$").expect("label heading pattern is valid"));

/// One classified source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paragraph<'a> {
    /// A heading: drawn bold and underlined, never wrapped
    Subtitle(&'a str),
    /// Prose: wrapped and justified
    Body(&'a str),
    /// A blank source line, i.e. vertical separation
    Blank,
}

/// Decide whether a normalised line is a subtitle, body text or blank.
///
/// Subtitles are recognised heuristically, in order:
/// 1. at most 70 characters and shaped like a short label ending in a colon
/// 2. at most 70 characters, entirely upper-case and no more than 8 words
///
/// Everything else is body text.
pub fn classify_line(line: &str) -> Paragraph<'_> {
    if line.trim().is_empty() {
        return Paragraph::Blank;
    }

    if is_subtitle(line) {
        Paragraph::Subtitle(line)
    } else {
        Paragraph::Body(line)
    }
}

/// Classify every normalised line, preserving order
pub fn classify_lines(lines: &[String]) -> Vec<Paragraph<'_>> {
    lines
        .iter()
        .map(|line| {
            let paragraph = classify_line(line);
            log::trace!("classified {:?} ({} chars)", paragraph, line.chars().count());
            paragraph
        })
        .collect()
}

fn is_subtitle(line: &str) -> bool {
    if line.chars().count() > SUBTITLE_MAX_CHARS {
        return false;
    }

    if LABEL_HEADING.is_match(line) {
        return true;
    }

    // digits and punctuation alone are not "upper-case"
    let has_letter = line.chars().any(char::is_alphabetic);
    has_letter
        && line == line.to_uppercase()
        && line.split_whitespace().count() <= SUBTITLE_MAX_WORDS
}
