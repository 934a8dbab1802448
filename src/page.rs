use crate::content::render_contents;
use crate::font::Font;
use crate::image::Image;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A run of text drawn at a single position. Coordinates are PDF user space (origin bottom-left)
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub coords: (Pt, Pt),
}

/// A straight stroked segment
#[derive(Clone, PartialEq, Debug)]
pub struct LineLayout {
    pub from: (Pt, Pt),
    pub to: (Pt, Pt),
    pub width: Pt,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f32,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(SpanLayout),
    Line(LineLayout),
    Image(ImageLayout),
}

pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The laid out contents, in painting order
    pub contents: Vec<PageContents>,
}

impl Page {
    /// Create an empty page. `content_box` is expressed in PDF user space
    pub fn new(size: PageSize, content_box: Rect) -> Page {
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: size.0,
                y2: size.1,
            },
            content_box,
            contents: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(span));
    }

    pub fn add_line(&mut self, line: LineLayout) {
        self.contents.push(PageContents::Line(line));
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    /// The distinct opacities of images on this page, in first-use order. Each one gets its own
    /// graphics state resource named `/GS{n}`
    pub(crate) fn opacities(&self) -> Vec<f32> {
        let mut opacities: Vec<f32> = Vec::new();
        for content in self.contents.iter() {
            if let PageContents::Image(image) = content {
                if !opacities.contains(&image.opacity) {
                    opacities.push(image.opacity);
                }
            }
        }
        opacities
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), std::io::Error> {
        let opacities = self.opacities();
        let gs_refs: Vec<_> = (0..opacities.len())
            .map(|n| refs.gen(RefType::GraphicsState(page_index, n)))
            .collect();
        for (gs_ref, opacity) in gs_refs.iter().zip(opacities.iter()) {
            writer
                .ext_graphics(*gs_ref)
                .non_stroking_alpha(*opacity)
                .stroking_alpha(*opacity);
        }

        let content_id = refs.gen(RefType::ContentForPage(page_index));
        let id = refs
            .get(RefType::Page(page_index))
            .expect("page refs are generated before pages are written");
        let tree = refs
            .get(RefType::PageTree)
            .expect("page tree ref is generated first");

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(tree);
        page.contents(content_id);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (i, _) in fonts.iter() {
            if let Some(font_ref) = refs.get(RefType::Font(i.index())) {
                resource_fonts.pair(Name(format!("F{}", i.index()).as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();

        let mut resource_xobjects = resources.x_objects();
        for (i, _) in images.iter() {
            if let Some(image_ref) = refs.get(RefType::Image(i.index())) {
                resource_xobjects.pair(Name(format!("I{}", i.index()).as_bytes()), image_ref);
            }
        }
        resource_xobjects.finish();

        let mut resource_states = resources.ext_g_states();
        for (n, gs_ref) in gs_refs.iter().enumerate() {
            resource_states.pair(Name(format!("GS{n}").as_bytes()), *gs_ref);
        }
        resource_states.finish();
        resources.finish();
        page.finish();

        let rendered = render_contents(&self.contents, &opacities, fonts)?;
        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}
