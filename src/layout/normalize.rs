/// Normalise raw contract text into one entry per source line.
///
/// Tabs and non-breaking spaces become plain spaces, runs of spaces collapse into one, and trailing
/// whitespace is stripped. Blank lines are kept as empty strings: they separate paragraphs and must
/// survive normalisation.
pub fn normalize_text(raw: &str) -> Vec<String> {
    let raw = raw.replace("\r\n", "\n").replace('\r', "\n");
    raw.split('\n').map(normalize_line).collect()
}

fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut previous_space = false;
    for ch in line.chars() {
        let ch = match ch {
            '\t' | '\u{a0}' => ' ',
            other => other,
        };
        if ch == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        out.push(ch);
    }
    out.truncate(out.trim_end().len());
    out
}
