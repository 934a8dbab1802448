use super::{FontStyle, TextSurface};
use crate::document::Document;
use crate::font::Font;
use crate::image::Image;
use crate::info::Info;
use crate::page::{ImageLayout, LineLayout, Page, SpanFont, SpanLayout};
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;
use crate::TypesetError;
use id_arena::Id;

/// A [TextSurface] that builds a PDF [Document], one [Page] at a time
pub struct PdfSurface {
    document: Document,
    page_size: PageSize,
    /// content box of every page, in PDF user space
    content_box: Rect,
    current: Page,
    page_number: usize,
    regular: Id<Font>,
    bold: Id<Font>,
    style: FontStyle,
    size: Pt,
}

impl PdfSurface {
    /// Create a surface whose first page is ready for drawing. `content_box` is in top-down
    /// coordinates and is recorded as each page's art box.
    pub fn new(page_size: PageSize, content_box: Rect, regular: Font, bold: Font) -> PdfSurface {
        let mut document = Document::default();
        let regular = document.add_font(regular);
        let bold = document.add_font(bold);

        let content_box = Rect {
            x1: content_box.x1,
            y1: page_size.1 - content_box.y2,
            x2: content_box.x2,
            y2: page_size.1 - content_box.y1,
        };

        PdfSurface {
            document,
            page_size,
            content_box,
            current: Page::new(page_size, content_box),
            page_number: 1,
            regular,
            bold,
            style: FontStyle::Regular,
            size: Pt(12.0),
        }
    }

    /// Set the metadata written into the document's info dictionary
    pub fn set_info(&mut self, info: Info) {
        self.document.set_info(info);
    }

    fn font_id(&self, style: FontStyle) -> Id<Font> {
        match style {
            FontStyle::Regular => self.regular,
            FontStyle::Bold => self.bold,
        }
    }

    /// Flip a top-down y coordinate into PDF user space
    fn flip(&self, y: Pt) -> Pt {
        self.page_size.1 - y
    }
}

impl TextSurface for PdfSurface {
    type ImageHandle = Id<Image>;
    type Output = Vec<u8>;

    fn measure_width(&self, text: &str, style: FontStyle, size: Pt) -> Pt {
        self.document.fonts[self.font_id(style)].width_of_text(text, size)
    }

    fn set_font(&mut self, style: FontStyle, size: Pt) {
        self.style = style;
        self.size = size;
    }

    fn font(&self) -> (FontStyle, Pt) {
        (self.style, self.size)
    }

    fn draw_text(&mut self, text: &str, x: Pt, y: Pt) {
        if text.is_empty() {
            return;
        }
        let span = SpanLayout {
            text: text.to_string(),
            font: SpanFont {
                id: self.font_id(self.style),
                size: self.size,
            },
            coords: (x, self.flip(y)),
        };
        self.current.add_span(span);
    }

    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), width: Pt) {
        let line = LineLayout {
            from: (from.0, self.flip(from.1)),
            to: (to.0, self.flip(to.1)),
            width,
        };
        self.current.add_line(line);
    }

    fn embed_image(&mut self, image: Image) -> Id<Image> {
        self.document.add_image(image)
    }

    fn draw_image(&mut self, image: Id<Image>, position: Rect, opacity: f32) {
        let position = Rect {
            x1: position.x1,
            y1: self.flip(position.y2),
            x2: position.x2,
            y2: self.flip(position.y1),
        };
        self.current.add_image(ImageLayout {
            image_id: image,
            position,
            opacity: opacity.clamp(0.0, 1.0),
        });
    }

    fn new_page(&mut self) {
        let finished = std::mem::replace(
            &mut self.current,
            Page::new(self.page_size, self.content_box),
        );
        self.document.add_page(finished);
        self.page_number += 1;
    }

    fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn current_page_number(&self) -> usize {
        self.page_number
    }

    fn finish(self) -> Result<Vec<u8>, TypesetError> {
        let PdfSurface {
            mut document,
            current,
            ..
        } = self;
        document.add_page(current);
        document.to_bytes()
    }
}
