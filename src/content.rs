//! Content stream rendering for pages.

use crate::font::Font;
use crate::page::{ImageLayout, LineLayout, PageContents, SpanFont, SpanLayout};
use id_arena::Arena;
use std::io::Write;

/// Renders page contents to a PDF content stream, converting high-level content items into
/// low-level PDF operators. `opacities` is the page's graphics state table as returned by
/// `Page::opacities`.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    opacities: &[f32],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    // consecutive spans share a text-state block
    let mut run: Vec<&SpanLayout> = Vec::new();
    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(span) => run.push(span),
            PageContents::Line(line) => {
                render_text_spans(&mut content, &run, fonts)?;
                run.clear();
                render_line(&mut content, line)?;
            }
            PageContents::Image(image) => {
                render_text_spans(&mut content, &run, fonts)?;
                run.clear();
                render_image(&mut content, image, opacities)?;
            }
        }
    }
    render_text_spans(&mut content, &run, fonts)?;

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[&SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), std::io::Error> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;

    let mut current_font: SpanFont = first.font;

    write!(
        content,
        "/F{} {} Tf\n",
        current_font.id.index(),
        current_font.size
    )?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write!(
                content,
                "/F{} {} Tf\n",
                current_font.id.index(),
                current_font.size
            )?;
        }

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
        write!(
            content,
            "{} Tj\n",
            fonts[current_font.id].encode_operand(&span.text)
        )?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_line(content: &mut Vec<u8>, line: &LineLayout) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    write!(content, "{} w\n", line.width)?;
    write!(content, "{} {} m\n", line.from.0, line.from.1)?;
    write!(content, "{} {} l\n", line.to.0, line.to.1)?;
    write!(content, "S\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_image(
    content: &mut Vec<u8>,
    image: &ImageLayout,
    opacities: &[f32],
) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    if let Some(n) = opacities.iter().position(|&o| o == image.opacity) {
        write!(content, "/GS{n} gs\n")?;
    }
    write!(
        content,
        "{} 0 0 {} {} {} cm\n",
        image.position.x2 - image.position.x1,
        image.position.y2 - image.position.y1,
        image.position.x1,
        image.position.y1
    )?;
    write!(content, "/I{} Do\n", image.image_id.index())?;
    write!(content, "Q\n")?;
    Ok(())
}
