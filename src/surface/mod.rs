//! The drawing capability the layout engine renders through.
//!
//! The engine never talks to a PDF writer directly: everything it needs (measuring, drawing text,
//! lines and images, starting pages) goes through [TextSurface]. Two implementations ship with the
//! crate:
//!
//! - [PdfSurface] writes a real PDF document
//! - [RecordingSurface] records every operation with deterministic metrics, for tests and for
//!   inspecting a layout without producing a file
//!
//! All coordinates are top-down: `x` grows to the right from the left page edge, `y` grows downwards
//! from the top page edge, and the `y` of a text draw is its baseline.

mod pdf;
mod recording;

pub use pdf::*;
pub use recording::*;

use crate::image::Image;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;
use crate::TypesetError;
use serde::{Deserialize, Serialize};

/// The two faces of the configured font family
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// A page-oriented drawing backend with font metrics
pub trait TextSurface {
    /// Reference to an image embedded with [TextSurface::embed_image]
    type ImageHandle: Copy;
    /// What [TextSurface::finish] produces
    type Output;

    /// Width of `text` when set in `style` at `size`
    fn measure_width(&self, text: &str, style: FontStyle, size: Pt) -> Pt;

    /// Select the font used by subsequent [TextSurface::draw_text] calls
    fn set_font(&mut self, style: FontStyle, size: Pt);

    /// The currently selected font
    fn font(&self) -> (FontStyle, Pt);

    /// Draw `text` with its baseline starting at (`x`, `y`)
    fn draw_text(&mut self, text: &str, x: Pt, y: Pt);

    /// Stroke a straight line
    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), width: Pt);

    /// Make an image available for drawing on any page
    fn embed_image(&mut self, image: Image) -> Self::ImageHandle;

    /// Paint an embedded image into `position` with the given opacity (0.0 to 1.0)
    fn draw_image(&mut self, image: Self::ImageHandle, position: Rect, opacity: f32);

    /// Close the current page and start drawing on a fresh one
    fn new_page(&mut self);

    /// Size of every page on this surface
    fn page_size(&self) -> PageSize;

    /// 1-based number of the page currently being drawn
    fn current_page_number(&self) -> usize;

    /// Close the last page and produce the finished output
    fn finish(self) -> Result<Self::Output, TypesetError>;
}
