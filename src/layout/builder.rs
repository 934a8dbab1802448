use super::classify::{classify_lines, Paragraph};
use super::config::LayoutConfig;
use super::flow::PageFlowController;
use super::header::{HeaderFooterRenderer, TitleBlock, Watermark};
use super::justify::{justify, LineRender};
use super::normalize::normalize_text;
use super::wrap::wrap_words;
use crate::image::Image;
use crate::surface::{FontStyle, TextSurface};
use crate::TypesetError;

/// Where a [DocumentBuilder] is in its lifecycle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuilderState {
    /// Nothing drawn yet
    Idle,
    /// The first page is decorated, no body content yet
    HeaderDrawn,
    /// At least one paragraph has been pushed
    BodyStreaming,
    /// The last footer is drawn and the output produced
    Finalized,
}

/// Typesets classified paragraphs onto a [TextSurface], one document per builder.
///
/// Page breaks happen inside [DocumentBuilder::push] and do not change the visible state.
pub struct DocumentBuilder<'c, S: TextSurface> {
    config: &'c LayoutConfig,
    surface: S,
    flow: PageFlowController<'c, S::ImageHandle>,
    state: BuilderState,
    in_blank_run: bool,
}

impl<'c, S: TextSurface> DocumentBuilder<'c, S> {
    /// Validates `config` before anything is drawn, including that the title block measured with
    /// the fonts of `surface` leaves room for at least one body line above the flow limit
    pub fn new(config: &'c LayoutConfig, surface: S) -> Result<Self, TypesetError> {
        config.validate()?;

        let title = TitleBlock::measure(&surface, config);
        if !title.leaves_room_for_body(config) {
            return Err(TypesetError::InvalidConfig(format!(
                "the title block ({} lines) pushes body text down to {}, leaving no line above the flow limit {}",
                title.lines.len(),
                title.body_top,
                config.flow_limit()
            )));
        }

        Ok(DocumentBuilder {
            config,
            surface,
            flow: PageFlowController::new(config, HeaderFooterRenderer::new(None)),
            state: BuilderState::Idle,
            in_blank_run: false,
        })
    }

    /// Embed `image` and paint it behind every page. Only has an effect before [DocumentBuilder::start].
    pub fn with_watermark(mut self, image: Image) -> Self {
        if self.state != BuilderState::Idle {
            log::warn!("watermark added after the first page was drawn, ignoring it");
            return self;
        }

        let aspect_ratio = image.aspect_ratio();
        let handle = self.surface.embed_image(image);
        let watermark = Watermark {
            handle,
            aspect_ratio,
        };
        self.flow = PageFlowController::new(self.config, HeaderFooterRenderer::new(Some(watermark)));
        self
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Draw the header of the first page. Called implicitly by the first push.
    pub fn start(&mut self) {
        if self.state != BuilderState::Idle {
            return;
        }
        self.flow.start(&mut self.surface);
        self.state = BuilderState::HeaderDrawn;
    }

    /// Typeset one classified line
    pub fn push(&mut self, paragraph: Paragraph<'_>) {
        self.start();
        self.state = BuilderState::BodyStreaming;

        match paragraph {
            Paragraph::Blank => {
                if !self.in_blank_run {
                    self.flow.add_gap(self.config.blank_line_gap);
                }
                self.in_blank_run = true;
            }
            Paragraph::Subtitle(text) => {
                self.in_blank_run = false;
                self.push_subtitle(text);
            }
            Paragraph::Body(text) => {
                self.in_blank_run = false;
                self.push_body(text);
            }
        }
    }

    /// Normalise, classify and typeset a whole text
    pub fn push_text(&mut self, text: &str) {
        let lines = normalize_text(text);
        for paragraph in classify_lines(&lines) {
            self.push(paragraph);
        }
    }

    /// Bold, underlined and never wrapped, at the left margin
    fn push_subtitle(&mut self, text: &str) {
        let config = self.config;
        self.flow.ensure_space(&mut self.surface, config.line_height);
        let y = self.flow.cursor().y;

        self.surface.set_font(FontStyle::Bold, config.font_size);
        self.surface.draw_text(text, config.margin, y);
        let width = self
            .surface
            .measure_width(text, FontStyle::Bold, config.font_size);
        let underline_y = y + config.underline_offset;
        self.surface.draw_line(
            (config.margin, underline_y),
            (config.margin + width, underline_y),
            config.rule_width / 1.5,
        );
        self.surface.set_font(FontStyle::Regular, config.font_size);

        self.flow.advance(config.line_height);
    }

    fn push_body(&mut self, text: &str) {
        let config = self.config;
        let size = config.font_size;
        let max_width = config.max_width();
        self.surface.set_font(FontStyle::Regular, size);

        let lines = {
            let surface = &self.surface;
            wrap_words(text, max_width, |t| {
                surface.measure_width(t, FontStyle::Regular, size)
            })
        };

        for line in lines.iter() {
            self.flow.ensure_space(&mut self.surface, config.line_height);
            let y = self.flow.cursor().y;

            let render = {
                let surface = &self.surface;
                let measure = |t: &str| surface.measure_width(t, FontStyle::Regular, size);
                if line.is_overflow(measure, max_width) {
                    log::debug!(
                        "{:?} is wider than the {max_width} line on page {}",
                        line.text(),
                        self.flow.cursor().page
                    );
                }
                justify(line, max_width, measure)
            };

            match render {
                LineRender::Natural(text) => self.surface.draw_text(&text, config.margin, y),
                LineRender::Justified(words) => {
                    for word in words {
                        self.surface
                            .draw_text(word.word, config.margin + word.offset, y);
                    }
                }
            }

            self.flow.advance(config.line_height);
        }

        if !lines.is_empty() {
            self.flow.advance(config.paragraph_gap);
        }
    }

    /// Draw the final footer and produce the surface's output. An empty document still gets one
    /// decorated page.
    pub fn finish(mut self) -> Result<S::Output, TypesetError> {
        self.start();
        self.flow.finish(&mut self.surface);
        self.state = BuilderState::Finalized;

        log::info!(
            "typeset {:?} on {} page(s)",
            self.config.title,
            self.surface.current_page_number()
        );
        self.surface.finish()
    }

    /// Typeset all of `text` and finish the document
    pub fn build(mut self, text: &str) -> Result<S::Output, TypesetError> {
        self.start();
        self.push_text(text);
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use crate::units::Pt;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
            .with_page_size((Pt(300.0), Pt(400.0)))
            .with_margin(Pt(50.0))
            .with_offsets(Pt(80.0), Pt(40.0))
            .with_font_size(Pt(10.0))
            .with_line_height(Pt(14.0))
    }

    #[test]
    fn state_machine_walks_forward() {
        let config = config();
        let surface = RecordingSurface::new(config.page_size);
        let mut builder = DocumentBuilder::new(&config, surface).expect("valid config");
        assert_eq!(builder.state(), BuilderState::Idle);

        builder.start();
        assert_eq!(builder.state(), BuilderState::HeaderDrawn);

        builder.push(Paragraph::Body("hello"));
        assert_eq!(builder.state(), BuilderState::BodyStreaming);

        let recording = builder.finish().expect("recording");
        assert_eq!(recording.pages[0].strings(), vec!["hello", "Page 1"]);
    }

    #[test]
    fn invalid_config_fails_before_drawing() {
        let config = config().with_margin(Pt(200.0));
        let surface = RecordingSurface::new(config.page_size);
        assert!(matches!(
            DocumentBuilder::new(&config, surface),
            Err(TypesetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn title_leaving_no_room_for_body_fails_before_drawing() {
        // 15pt per bold glyph: at most 13 glyphs per 200pt line, 8 title lines 45pt apart
        let mut config = config().with_title(
            "CONTRATO DE PRESTACION DE SERVICIOS DEPORTIVOS ENTRE LA ACADEMIA Y EL JUGADOR Y SUS TUTORES LEGALES",
        );
        config.title_font_size = Pt(30.0);
        config.title_line_height = Pt(45.0);
        config.validate().expect("geometry alone is valid");

        let surface = RecordingSurface::new(config.page_size);
        let title = TitleBlock::measure(&surface, &config);
        assert!(title.lines.len() >= 8);
        assert!(title.body_top + config.line_height >= config.flow_limit());

        assert!(matches!(
            DocumentBuilder::new(&config, surface),
            Err(TypesetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn wrapped_title_pushes_body_down_but_leaves_room() {
        let mut config = config().with_title("CONTRATO DE PRESTACION DE SERVICIOS");
        config.title_font_size = Pt(30.0);
        config.title_line_height = Pt(45.0);

        let recording = DocumentBuilder::new(&config, RecordingSurface::new(config.page_size))
            .expect("title fits")
            .build("El jugador acepta.")
            .expect("recording");
        let body = recording.pages[0]
            .texts()
            .find_map(|op| match op {
                DrawOp::Text { text, y, .. } if text == "El jugador acepta." => Some(*y),
                _ => None,
            })
            .expect("body drawn");
        assert!(body + config.line_height < config.flow_limit());
    }

    #[test]
    fn subtitle_is_bold_underlined_and_followed_by_regular_text() {
        let config = config();
        let surface = RecordingSurface::new(config.page_size);
        let recording = DocumentBuilder::new(&config, surface)
            .expect("valid config")
            .build("PRIMERA:\nEl jugador acepta.")
            .expect("recording");

        let page = &recording.pages[0];
        let texts: Vec<&DrawOp> = page.texts().collect();
        let DrawOp::Text { text, x, y, style, width, .. } = texts[0] else {
            panic!("subtitle drawn first");
        };
        assert_eq!(text, "PRIMERA:");
        assert_eq!(*style, FontStyle::Bold);
        assert_eq!(*x, config.margin);

        // the rule under the (empty) title comes first, then the underline
        let underline = page.lines().nth(1).expect("underline");
        let DrawOp::Line { from, to, .. } = underline else {
            unreachable!()
        };
        assert_eq!(from.1, *y + config.underline_offset);
        assert_eq!(*to.0 - *from.0, **width);

        let DrawOp::Text { style, .. } = texts[1] else {
            unreachable!()
        };
        assert_eq!(*style, FontStyle::Regular);
    }

    #[test]
    fn blank_runs_collapse_into_one_gap() {
        let config = config();
        let one_blank = DocumentBuilder::new(&config, RecordingSurface::new(config.page_size))
            .expect("valid config")
            .build("uno\n\ndos")
            .expect("recording");
        let three_blanks = DocumentBuilder::new(&config, RecordingSurface::new(config.page_size))
            .expect("valid config")
            .build("uno\n\n\n\ndos")
            .expect("recording");

        let y_of = |recording: &crate::surface::Recording| {
            recording
                .texts()
                .find_map(|(_, op)| match op {
                    DrawOp::Text { text, y, .. } if text == "dos" => Some(*y),
                    _ => None,
                })
                .expect("dos drawn")
        };

        let expected = config.top_offset
            + config.line_height
            + config.paragraph_gap
            + config.blank_line_gap;
        assert_eq!(y_of(&one_blank), expected);
        assert_eq!(y_of(&three_blanks), expected);
    }

    #[test]
    fn watermark_is_embedded_once_and_drawn_on_every_page() {
        let config = config();
        let image = Image::new(::image::DynamicImage::new_rgba8(20, 10));
        let words = "palabra ".repeat(400);
        let recording = DocumentBuilder::new(&config, RecordingSurface::new(config.page_size))
            .expect("valid config")
            .with_watermark(image)
            .build(&words)
            .expect("recording");

        assert!(recording.page_count() > 1);
        assert_eq!(recording.embedded_images, 1);
        for page in recording.pages.iter() {
            assert_eq!(page.images().count(), 1);
        }
    }
}
