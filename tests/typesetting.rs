use contract_typeset::layout::{DocumentBuilder, LayoutConfig};
use contract_typeset::surface::{DrawOp, FontStyle, Recording, RecordingSurface};
use contract_typeset::Pt;

/// 300 x 400 page, 200pt of usable width, body between y = 80 and y = 360, 5pt per glyph
fn config() -> LayoutConfig {
    LayoutConfig::default()
        .with_page_size((Pt(300.0), Pt(400.0)))
        .with_margin(Pt(50.0))
        .with_offsets(Pt(80.0), Pt(40.0))
        .with_font_size(Pt(10.0))
        .with_line_height(Pt(14.0))
}

fn layout(config: &LayoutConfig, text: &str) -> Recording {
    DocumentBuilder::new(config, RecordingSurface::new(config.page_size))
        .expect("valid config")
        .build(text)
        .expect("recording never fails")
}

struct Text<'r> {
    text: &'r str,
    x: Pt,
    y: Pt,
    width: Pt,
    style: FontStyle,
}

/// Text drawn in the body area of page `index`, i.e. neither title nor footer
fn body<'r>(config: &LayoutConfig, recording: &'r Recording, index: usize) -> Vec<Text<'r>> {
    recording.pages[index]
        .texts()
        .filter_map(|op| match op {
            DrawOp::Text {
                text,
                x,
                y,
                width,
                style,
                ..
            } if *y >= config.top_offset && *y < config.flow_limit() => Some(Text {
                text: text.as_str(),
                x: *x,
                y: *y,
                width: *width,
                style: *style,
            }),
            _ => None,
        })
        .collect()
}

/// Body text of a page grouped into drawn lines, in order
fn lines<'r>(config: &LayoutConfig, recording: &'r Recording, index: usize) -> Vec<Vec<Text<'r>>> {
    let mut lines: Vec<Vec<Text<'r>>> = Vec::new();
    for text in body(config, recording, index) {
        let same_line = lines.last().is_some_and(|line| line[0].y == text.y);
        if same_line {
            lines.last_mut().expect("a line to extend").push(text);
        } else {
            lines.push(vec![text]);
        }
    }
    lines
}

fn footers(recording: &Recording) -> Vec<String> {
    recording
        .pages
        .iter()
        .map(|page| {
            page.strings()
                .into_iter()
                .filter(|s| s.starts_with("Page "))
                .collect::<Vec<&str>>()
                .join("|")
        })
        .collect()
}

#[test]
fn wraps_after_fox_and_justifies_only_the_first_line() {
    // 120pt wide: "The quick brown fox jumps" is 125pt, "jumps over the lazy dog" 115pt
    let config = config()
        .with_page_size((Pt(220.0), Pt(400.0)))
        .with_margin(Pt(50.0));
    let recording = layout(&config, "The quick brown fox jumps over the lazy dog");
    let lines = lines(&config, &recording, 0);
    assert_eq!(lines.len(), 2);

    let first: Vec<&str> = lines[0].iter().map(|t| t.text).collect();
    assert_eq!(first, vec!["The", "quick", "brown", "fox"]);
    assert_eq!(lines[0][0].x, config.margin);
    let last = lines[0].last().expect("words");
    let right_edge = last.x + last.width;
    assert!((*right_edge - *(config.margin + config.max_width())).abs() < 1e-3);

    assert_eq!(lines[1].len(), 1);
    assert_eq!(lines[1][0].text, "jumps over the lazy dog");
    assert_eq!(lines[1][0].x, config.margin);
    assert!(lines[1][0].width < config.max_width());
}

#[test]
fn label_subtitle_is_bold_underlined_and_unwrapped() {
    let config = config();
    let recording = layout(&config, "PRIMERA:");
    let body = body(&config, &recording, 0);
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].text, "PRIMERA:");
    assert_eq!(body[0].style, FontStyle::Bold);
    assert_eq!(body[0].x, config.margin);

    let underline = recording.pages[0]
        .lines()
        .find_map(|op| match op {
            DrawOp::Line { from, to, .. } if from.1 > body[0].y => Some((*from, *to)),
            _ => None,
        })
        .expect("underline drawn");
    assert_eq!(underline.0 .0, config.margin);
    assert_eq!(underline.1 .0 - underline.0 .0, body[0].width);
}

#[test]
fn long_subtitle_is_never_wrapped() {
    // 46 characters, 230pt against 200pt of usable width
    let heading = "OBJETO DEL CONTRATO DE PRESTACION DE SERVICIOS";
    let config = config();
    let recording = layout(&config, heading);
    let body = body(&config, &recording, 0);
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].text, heading);
    assert!(body[0].width > config.max_width());
}

#[test]
fn many_paragraphs_paginate_with_numbered_footers() {
    let config = config();
    let text: Vec<String> = (1..=80)
        .map(|i| format!("Parrafo numero {i} del contrato."))
        .collect();
    let recording = layout(&config, &text.join("\n"));

    assert!(recording.page_count() >= 2);
    let expected: Vec<String> = (1..=recording.page_count())
        .map(|n| format!("Page {n}"))
        .collect();
    assert_eq!(footers(&recording), expected);
    assert_eq!(recording.footers(), expected);

    // every footer sits at the same place, below the flow limit
    for page in recording.pages.iter() {
        let Some(DrawOp::Text { y, .. }) = page.texts().last() else {
            panic!("footer drawn");
        };
        assert_eq!(*y, config.footer_y());
    }
}

#[test]
fn no_body_line_crosses_the_flow_limit() {
    let config = config();
    let text = format!(
        "{}\n\nSEGUNDA:\n{}\n{}",
        lipsum::lipsum(300),
        lipsum::lipsum(200),
        lipsum::lipsum(150)
    );
    let recording = layout(&config, &text);
    assert!(recording.page_count() >= 3);

    for (page, op) in recording.texts() {
        let DrawOp::Text { text, y, .. } = op else {
            unreachable!()
        };
        if *y == config.footer_y() {
            continue;
        }
        assert!(
            *y + config.line_height < config.flow_limit(),
            "{text:?} drawn at {y} on page {page}"
        );
    }

    // a line that does not fit moves to the next page, which starts at the top of the body
    for index in 1..recording.page_count() {
        let body = body(&config, &recording, index);
        assert_eq!(body[0].y, config.top_offset);
    }
}

#[test]
fn justified_lines_end_exactly_at_the_right_margin() {
    let config = config();
    let recording = layout(&config, &lipsum::lipsum(400));
    let right = config.margin + config.max_width();

    let mut justified = 0;
    for index in 0..recording.page_count() {
        for line in lines(&config, &recording, index) {
            if line.len() > 1 {
                justified += 1;
                let last = line.last().expect("words");
                assert!((*(last.x + last.width) - *right).abs() < 1e-2);
            } else {
                assert!(line[0].width <= config.max_width());
            }
        }
    }
    assert!(justified > 10);
}

#[test]
fn last_line_of_a_paragraph_stays_ragged() {
    let config = config();
    // 17 words of 4 glyphs: 8 per 195pt line, the last line holds one word
    let words: Vec<String> = (1..=17).map(|i| format!("p{i:02}.")).collect();
    let recording = layout(&config, &words.join(" "));
    let lines = lines(&config, &recording, 0);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].len(), 8);
    assert_eq!(lines[1].len(), 8);

    assert_eq!(lines[2].len(), 1);
    assert_eq!(lines[2][0].text, "p17.");
    assert_eq!(lines[2][0].x, config.margin);
}

#[test]
fn two_blank_lines_make_one_gap() {
    let config = config();
    let y_of_second = |text: &str| {
        let recording = layout(&config, text);
        let y = body(&config, &recording, 0)
            .iter()
            .find(|t| t.text == "dos")
            .map(|t| t.y)
            .expect("second paragraph drawn");
        y
    };

    let one = y_of_second("uno\n\ndos");
    let two = y_of_second("uno\n\n\ndos");
    assert_eq!(one, two);
    assert_eq!(
        two,
        config.top_offset + config.line_height + config.paragraph_gap + config.blank_line_gap
    );
}

#[test]
fn blank_lines_alone_never_break_a_page() {
    let mut config = config();
    config.blank_line_gap = Pt(12.0);

    // 15 single-line paragraphs use 80 + 15 * 18 = 350 of the 360 available
    let mut text = "linea\n".repeat(15);
    text.push_str("\n\n\n\n");
    let recording = layout(&config, &text);
    assert_eq!(recording.page_count(), 1);
    assert_eq!(footers(&recording), vec!["Page 1"]);
}

#[test]
fn overlong_word_is_drawn_alone_without_justification() {
    let config = config();
    let word = "x".repeat(100);
    let recording = layout(&config, &format!("antes {word} despues"));
    let lines = lines(&config, &recording, 0);
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[1].len(), 1);
    assert_eq!(lines[1][0].text, word);
    assert_eq!(lines[1][0].x, config.margin);
    assert!(lines[1][0].width > config.max_width());
}

#[test]
fn overlong_word_alone_does_not_crash() {
    let config = config();
    let recording = layout(&config, &"x".repeat(100));
    assert_eq!(recording.page_count(), 1);
    assert_eq!(body(&config, &recording, 0).len(), 1);
}

#[test]
fn empty_text_makes_one_decorated_page() {
    let config = config().with_title("CONTRATO");
    let recording = layout(&config, "");
    assert_eq!(recording.page_count(), 1);
    assert_eq!(recording.pages[0].strings(), vec!["CONTRATO", "Page 1"]);
    assert_eq!(recording.pages[0].lines().count(), 1);
}

#[test]
fn title_repeats_and_body_never_inherits_bold() {
    let config = config().with_title("CONTRATO");
    let recording = layout(&config, &lipsum::lipsum(500));
    assert!(recording.page_count() > 1);

    for (index, page) in recording.pages.iter().enumerate() {
        assert_eq!(page.strings()[0], "CONTRATO");
        for text in body(&config, &recording, index) {
            assert_eq!(text.style, FontStyle::Regular, "{:?} is bold", text.text);
        }
    }
}

#[test]
fn whitespace_is_normalised_before_layout() {
    let config = config();
    let recording = layout(&config, "El\tjugador\u{a0}\u{a0}acepta   \r\n");
    let body = body(&config, &recording, 0);
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].text, "El jugador acepta");
}

#[test]
fn config_deserialises_with_defaults() {
    let config: LayoutConfig = serde_json::from_str(
        r#"{
            "page_size": [300.0, 400.0],
            "margin": 50.0,
            "title": "CONTRATO",
            "footer_label": "Página",
            "watermark": { "path": "logo.png" }
        }"#,
    )
    .expect("valid json");

    assert_eq!(config.max_width(), Pt(200.0));
    assert_eq!(config.font_size, LayoutConfig::default().font_size);
    assert!(config.watermark.is_some());
    config.validate().expect("usable config");

    let recording = layout(&config, "");
    assert_eq!(recording.pages[0].strings(), vec!["CONTRATO", "Página 1"]);
}
