use super::{FontStyle, TextSurface};
use crate::image::Image;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;
use crate::TypesetError;

/// A single operation performed on a [RecordingSurface]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: Pt,
        y: Pt,
        style: FontStyle,
        size: Pt,
        /// advance width of `text` as measured by the surface
        width: Pt,
    },
    Line {
        from: (Pt, Pt),
        to: (Pt, Pt),
        width: Pt,
    },
    Image {
        handle: usize,
        position: Rect,
        opacity: f32,
    },
}

/// Everything drawn on one page of a [RecordingSurface]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedPage {
    pub ops: Vec<DrawOp>,
}

impl RecordedPage {
    /// Text operations on this page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Text { .. }))
    }

    /// The drawn strings on this page, in drawing order
    pub fn strings(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Image { .. }))
    }
}

/// The finished output of a [RecordingSurface]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    pub pages: Vec<RecordedPage>,
    pub page_size: PageSize,
    /// Number of images embedded over the life of the surface
    pub embedded_images: usize,
}

impl Recording {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The last string drawn on every page. Pages are closed by their footer, so for a finished
    /// document this is the footer of each page.
    pub fn footers(&self) -> Vec<&str> {
        self.pages
            .iter()
            .filter_map(|page| page.strings().last().copied())
            .collect()
    }

    /// Every text operation across all pages together with its 1-based page number
    pub fn texts(&self) -> impl Iterator<Item = (usize, &DrawOp)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(i, page)| page.texts().map(move |op| (i + 1, op)))
    }
}

/// A [TextSurface] with fixed-advance metrics that records what is drawn instead of rendering it.
///
/// Every character advances by `em × size` (`bold_em × size` in the bold style), which makes
/// expected widths trivial to compute in tests.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    page_size: PageSize,
    em: f32,
    bold_em: f32,
    style: FontStyle,
    size: Pt,
    pages: Vec<RecordedPage>,
    embedded_images: usize,
}

impl RecordingSurface {
    /// A surface where every glyph is half an em wide in both styles
    pub fn new(page_size: PageSize) -> RecordingSurface {
        RecordingSurface::with_advances(page_size, 0.5, 0.5)
    }

    pub fn with_advances(page_size: PageSize, em: f32, bold_em: f32) -> RecordingSurface {
        RecordingSurface {
            page_size,
            em,
            bold_em,
            style: FontStyle::Regular,
            size: Pt(12.0),
            pages: vec![RecordedPage::default()],
            embedded_images: 0,
        }
    }

    fn current(&mut self) -> &mut RecordedPage {
        if self.pages.is_empty() {
            self.pages.push(RecordedPage::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Pages recorded so far, including the one being drawn
    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }
}

impl TextSurface for RecordingSurface {
    type ImageHandle = usize;
    type Output = Recording;

    fn measure_width(&self, text: &str, style: FontStyle, size: Pt) -> Pt {
        let em = match style {
            FontStyle::Regular => self.em,
            FontStyle::Bold => self.bold_em,
        };
        size * (em * text.chars().count() as f32)
    }

    fn set_font(&mut self, style: FontStyle, size: Pt) {
        self.style = style;
        self.size = size;
    }

    fn font(&self) -> (FontStyle, Pt) {
        (self.style, self.size)
    }

    fn draw_text(&mut self, text: &str, x: Pt, y: Pt) {
        let (style, size) = (self.style, self.size);
        let width = self.measure_width(text, style, size);
        self.current().ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style,
            size,
            width,
        });
    }

    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), width: Pt) {
        self.current().ops.push(DrawOp::Line { from, to, width });
    }

    fn embed_image(&mut self, _image: Image) -> usize {
        self.embedded_images += 1;
        self.embedded_images - 1
    }

    fn draw_image(&mut self, image: usize, position: Rect, opacity: f32) {
        self.current().ops.push(DrawOp::Image {
            handle: image,
            position,
            opacity,
        });
    }

    fn new_page(&mut self) {
        self.pages.push(RecordedPage::default());
    }

    fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn current_page_number(&self) -> usize {
        self.pages.len().max(1)
    }

    fn finish(self) -> Result<Recording, TypesetError> {
        Ok(Recording {
            pages: self.pages,
            page_size: self.page_size,
            embedded_images: self.embedded_images,
        })
    }
}
