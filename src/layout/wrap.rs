use crate::units::Pt;

/// One physical output line of a wrapped paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine<'a> {
    pub words: Vec<&'a str>,
    /// Set on the final line of the paragraph, which is never justified
    pub is_last_of_group: bool,
}

impl<'a> WrappedLine<'a> {
    /// The words joined with single spaces, i.e. the line at its natural spacing
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    /// A line wider than the usable width can only be a single unbreakable word
    pub fn is_overflow(&self, measure: impl Fn(&str) -> Pt, max_width: Pt) -> bool {
        self.words.len() == 1 && measure(self.words[0]) > max_width
    }
}

/// Greedily break `text` into lines no wider than `max_width`.
///
/// Words are accumulated while `measure(line + " " + word) <= max_width`; the word that would
/// overflow starts the next line. A single word wider than `max_width` is placed alone on its
/// own line rather than split. The last line returned has `is_last_of_group` set. Text without
/// any words produces no lines.
pub fn wrap_words<'a>(
    text: &'a str,
    max_width: Pt,
    measure: impl Fn(&str) -> Pt,
) -> Vec<WrappedLine<'a>> {
    let mut lines: Vec<WrappedLine<'a>> = Vec::new();
    let mut current: Vec<&'a str> = Vec::new();
    let mut current_text = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push(word);
            current_text.push_str(word);
            continue;
        }

        let candidate = format!("{current_text} {word}");
        if measure(&candidate) <= max_width {
            current.push(word);
            current_text = candidate;
        } else {
            lines.push(WrappedLine {
                words: std::mem::take(&mut current),
                is_last_of_group: false,
            });
            current.push(word);
            current_text.clear();
            current_text.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(WrappedLine {
            words: current,
            is_last_of_group: true,
        });
    }

    lines
}
