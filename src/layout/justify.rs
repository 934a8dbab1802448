use super::wrap::WrappedLine;
use crate::units::Pt;

/// A word placed on a justified line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedWord<'a> {
    pub word: &'a str,
    /// Distance from the left margin to the start of the word
    pub offset: Pt,
    pub width: Pt,
}

/// How a wrapped line is to be drawn
#[derive(Debug, Clone, PartialEq)]
pub enum LineRender<'a> {
    /// Left aligned with single spaces, drawn as one run
    Natural(String),
    /// Every word drawn at its own offset so the line spans the full target width
    Justified(Vec<PlacedWord<'a>>),
}

/// Distribute the residual width of a line evenly across its inter-word gaps.
///
/// The last line of a paragraph and lines with fewer than two words keep their natural
/// spacing. So does a line whose words and single spaces already meet or exceed
/// `target_width`: spacing is never compressed below a normal space.
pub fn justify<'a>(
    line: &WrappedLine<'a>,
    target_width: Pt,
    measure: impl Fn(&str) -> Pt,
) -> LineRender<'a> {
    if line.is_last_of_group || line.words.len() < 2 {
        return LineRender::Natural(line.text());
    }

    let widths: Vec<Pt> = line.words.iter().map(|word| measure(word)).collect();
    let words_width: Pt = widths.iter().copied().sum();
    let space_width = measure(" ");
    let gaps = (line.words.len() - 1) as f32;
    let base_width = words_width + space_width * gaps;
    let extra = target_width - base_width;

    if *extra <= 0.0 {
        log::debug!(
            "no room to justify {:?}: natural width {} exceeds {}",
            line.text(),
            base_width,
            target_width
        );
        return LineRender::Natural(line.text());
    }

    let extra_per_gap = extra / gaps;
    let mut offset = Pt(0.0);
    let mut placed: Vec<PlacedWord<'a>> = Vec::with_capacity(line.words.len());
    for (word, width) in line.words.iter().copied().zip(widths) {
        placed.push(PlacedWord {
            word,
            offset,
            width,
        });
        offset += width + space_width + extra_per_gap;
    }

    LineRender::Justified(placed)
}
