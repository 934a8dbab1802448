use super::config::LayoutConfig;
use super::header::HeaderFooterRenderer;
use crate::surface::TextSurface;
use crate::units::Pt;

/// Vertical position on the current page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    /// 1-based page number
    pub page: usize,
    /// Top-down baseline position of the next line
    pub y: Pt,
}

/// Owns the cursor and decides when content has to move to a new page.
///
/// Every draw is preceded by [PageFlowController::ensure_space], so a page break always happens
/// before a line that would cross the flow limit, never after it.
#[derive(Debug, Clone)]
pub struct PageFlowController<'c, H> {
    config: &'c LayoutConfig,
    decorations: HeaderFooterRenderer<H>,
    cursor: Cursor,
    body_top: Pt,
    page_has_content: bool,
}

impl<'c, H: Copy> PageFlowController<'c, H> {
    pub fn new(config: &'c LayoutConfig, decorations: HeaderFooterRenderer<H>) -> Self {
        PageFlowController {
            config,
            decorations,
            cursor: Cursor {
                page: 1,
                y: config.top_offset,
            },
            body_top: config.top_offset,
            page_has_content: false,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Where body text starts on the current page
    pub fn body_top(&self) -> Pt {
        self.body_top
    }

    /// Decorate the first page and move the cursor to its body
    pub fn start<S>(&mut self, surface: &mut S)
    where
        S: TextSurface<ImageHandle = H>,
    {
        self.body_top = self.decorations.draw_header(surface, self.config);
        self.cursor = Cursor {
            page: surface.current_page_number(),
            y: self.body_top,
        };
        self.page_has_content = false;
    }

    /// Make sure a line of `needed` height fits above the flow limit, breaking the page first if
    /// it does not. Returns whether a page break happened.
    ///
    /// An empty page is never broken: content too tall for a whole page is drawn where it is.
    pub fn ensure_space<S>(&mut self, surface: &mut S, needed: Pt) -> bool
    where
        S: TextSurface<ImageHandle = H>,
    {
        if self.cursor.y + needed < self.config.flow_limit() {
            return false;
        }

        if !self.page_has_content {
            log::debug!(
                "{needed} does not fit on empty page {}, drawing it anyway",
                self.cursor.page
            );
            return false;
        }

        self.break_page(surface);
        true
    }

    /// Consume vertical space for something just drawn
    pub fn advance(&mut self, height: Pt) {
        self.cursor.y += height;
        self.page_has_content = true;
    }

    /// Insert a vertical gap. Gaps are dropped at the top of a page body and when they would
    /// reach the flow limit: a gap alone never causes a page break. Returns whether the gap was
    /// inserted.
    pub fn add_gap(&mut self, gap: Pt) -> bool {
        if !self.page_has_content || self.cursor.y + gap >= self.config.flow_limit() {
            return false;
        }
        self.cursor.y += gap;
        true
    }

    /// Footer on the current page, new page, header on the new page, cursor back to the body top
    pub fn break_page<S>(&mut self, surface: &mut S)
    where
        S: TextSurface<ImageHandle = H>,
    {
        log::debug!(
            "page break after page {} at y = {}",
            self.cursor.page,
            self.cursor.y
        );

        self.decorations
            .draw_footer(surface, self.config, self.cursor.page);
        surface.new_page();
        self.body_top = self.decorations.draw_header(surface, self.config);
        self.cursor = Cursor {
            page: self.cursor.page + 1,
            y: self.body_top,
        };
        self.page_has_content = false;

        debug_assert_eq!(surface.current_page_number(), self.cursor.page);
    }

    /// Draw the footer of the last page
    pub fn finish<S>(&mut self, surface: &mut S)
    where
        S: TextSurface<ImageHandle = H>,
    {
        self.decorations
            .draw_footer(surface, self.config, self.cursor.page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
            .with_page_size((Pt(400.0), Pt(300.0)))
            .with_margin(Pt(40.0))
            .with_offsets(Pt(80.0), Pt(40.0))
            .with_line_height(Pt(20.0))
    }

    #[test]
    fn breaks_before_crossing_the_limit() {
        let config = config();
        let mut surface = RecordingSurface::new(config.page_size);
        let mut flow = PageFlowController::new(&config, HeaderFooterRenderer::new(None));
        flow.start(&mut surface);
        assert_eq!(flow.cursor(), Cursor { page: 1, y: Pt(80.0) });

        // limit is 260: lines at 80, 100, ... 220 fit, 240 + 20 reaches it
        let mut breaks = 0;
        for _ in 0..8 {
            if flow.ensure_space(&mut surface, config.line_height) {
                breaks += 1;
            }
            assert!(flow.cursor().y + config.line_height < config.flow_limit());
            flow.advance(config.line_height);
        }
        assert_eq!(breaks, 0);
        assert_eq!(flow.cursor().y, Pt(240.0));

        assert!(flow.ensure_space(&mut surface, config.line_height));
        assert_eq!(flow.cursor(), Cursor { page: 2, y: Pt(80.0) });
        assert_eq!(surface.current_page_number(), 2);

        // footer of page 1 was drawn before the break
        assert_eq!(surface.pages()[0].strings().last(), Some(&"Page 1"));
    }

    #[test]
    fn gaps_never_break_pages() {
        let config = config();
        let mut surface = RecordingSurface::new(config.page_size);
        let mut flow = PageFlowController::new(&config, HeaderFooterRenderer::new(None));
        flow.start(&mut surface);

        // no gap at the top of the body
        assert!(!flow.add_gap(Pt(10.0)));
        assert_eq!(flow.cursor().y, Pt(80.0));

        flow.advance(Pt(170.0));
        assert!(!flow.add_gap(Pt(10.0)));
        assert_eq!(flow.cursor().page, 1);
        assert_eq!(flow.cursor().y, Pt(250.0));

        flow.advance(Pt(-100.0));
        assert!(flow.add_gap(Pt(10.0)));
        assert_eq!(flow.cursor().y, Pt(160.0));
    }

    #[test]
    fn empty_page_is_never_broken() {
        let config = config();
        let mut surface = RecordingSurface::new(config.page_size);
        let mut flow = PageFlowController::new(&config, HeaderFooterRenderer::new(None));
        flow.start(&mut surface);

        assert!(!flow.ensure_space(&mut surface, Pt(1000.0)));
        assert_eq!(surface.current_page_number(), 1);
    }
}
