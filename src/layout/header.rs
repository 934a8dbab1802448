use super::config::LayoutConfig;
use super::wrap::{wrap_words, WrappedLine};
use crate::rect::Rect;
use crate::surface::{FontStyle, TextSurface};
use crate::units::Pt;

/// An image embedded on the surface, painted faintly behind every page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Watermark<H> {
    pub handle: H,
    /// Width over height of the source image
    pub aspect_ratio: f32,
}

/// The title lines and the vertical extent of the title block, the same on every page
#[derive(Debug, Clone, PartialEq)]
pub struct TitleBlock<'t> {
    /// The title wrapped at the usable width in the bold style
    pub lines: Vec<WrappedLine<'t>>,
    /// `y` of the rule beneath the title
    pub rule_y: Pt,
    /// Where body text starts: the configured top offset, pushed down if the title runs past it
    pub body_top: Pt,
}

impl<'t> TitleBlock<'t> {
    /// Lay out the title of `config` with the metrics of `surface`, without drawing anything
    pub fn measure<S: TextSurface>(surface: &S, config: &'t LayoutConfig) -> TitleBlock<'t> {
        let size = config.title_font_size;
        let lines = wrap_words(&config.title, config.max_width(), |text| {
            surface.measure_width(text, FontStyle::Bold, size)
        });

        let rule_y = match lines.len() {
            0 => config.title_top,
            n => config.title_top + config.title_line_height * (n - 1) as f32 + config.rule_gap,
        };

        TitleBlock {
            lines,
            rule_y,
            body_top: config.top_offset.max(rule_y + config.line_height),
        }
    }

    /// Whether at least one body line fits between the title block and the flow limit
    pub fn leaves_room_for_body(&self, config: &LayoutConfig) -> bool {
        self.body_top + config.line_height < config.flow_limit()
    }
}

/// Draws the per-page decorations: the title block with its rule and the watermark at the top of
/// every page, the page number at the bottom.
///
/// Both drawing methods leave the surface set to the regular body font, so whatever is drawn next
/// never inherits the bold title style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderFooterRenderer<H> {
    watermark: Option<Watermark<H>>,
}

impl<H: Copy> HeaderFooterRenderer<H> {
    pub fn new(watermark: Option<Watermark<H>>) -> HeaderFooterRenderer<H> {
        HeaderFooterRenderer { watermark }
    }

    pub fn watermark(&self) -> Option<&Watermark<H>> {
        self.watermark.as_ref()
    }

    /// Draw the watermark, the centered (wrapped) title and the rule beneath it.
    ///
    /// Returns the `y` at which body text starts on this page: the configured top offset, pushed
    /// down if the title block runs past it.
    pub fn draw_header<S>(&self, surface: &mut S, config: &LayoutConfig) -> Pt
    where
        S: TextSurface<ImageHandle = H>,
    {
        let (page_width, page_height) = surface.page_size();

        if let Some(watermark) = &self.watermark {
            let width = config.max_width() * config.watermark_scale;
            let height = width / watermark.aspect_ratio.max(f32::EPSILON);
            let position = Rect::from_origin_size(
                (page_width - width) / 2.0,
                (page_height - height) / 2.0,
                width,
                height,
            );
            surface.draw_image(watermark.handle, position, config.watermark_opacity);
        }

        let title = TitleBlock::measure(&*surface, config);
        let size = config.title_font_size;
        surface.set_font(FontStyle::Bold, size);
        let mut baseline = config.title_top;
        for line in title.lines.iter() {
            let text = line.text();
            let width = surface.measure_width(&text, FontStyle::Bold, size);
            surface.draw_text(&text, (page_width - width) / 2.0, baseline);
            baseline += config.title_line_height;
        }

        surface.draw_line(
            (config.margin, title.rule_y),
            (page_width - config.margin, title.rule_y),
            config.rule_width,
        );

        surface.set_font(FontStyle::Regular, config.font_size);

        title.body_top
    }

    /// Draw the centered page number near the bottom of the page
    pub fn draw_footer<S>(&self, surface: &mut S, config: &LayoutConfig, page_number: usize)
    where
        S: TextSurface<ImageHandle = H>,
    {
        let label = config.footer_label.trim();
        let text = if label.is_empty() {
            page_number.to_string()
        } else {
            format!("{label} {page_number}")
        };

        let size = config.footer_font_size;
        surface.set_font(FontStyle::Regular, size);
        let width = surface.measure_width(&text, FontStyle::Regular, size);
        let (page_width, _) = surface.page_size();
        surface.draw_text(&text, (page_width - width) / 2.0, config.footer_y());

        surface.set_font(FontStyle::Regular, config.font_size);
    }
}
