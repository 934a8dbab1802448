use crate::assets::Assets;
use crate::info::Info;
use crate::layout::{DocumentBuilder, LayoutConfig};
use crate::rect::Rect;
use crate::surface::PdfSurface;
use crate::TypesetError;

/// Typeset `text` into a paginated, justified PDF document.
///
/// The configuration is validated first; an invalid one is the only error a caller will see in
/// practice. Fonts and the watermark are then loaded once, each falling back (standard Helvetica,
/// no watermark) when it cannot be loaded.
///
/// ```
/// use contract_typeset::{typeset, layout::LayoutConfig};
///
/// let config = LayoutConfig::default().with_title("CONTRATO");
/// let pdf = typeset("PRIMERA:\nLas partes acuerdan lo siguiente.", &config).expect("valid config");
/// assert!(pdf.starts_with(b"%PDF"));
/// ```
pub fn typeset(text: &str, config: &LayoutConfig) -> Result<Vec<u8>, TypesetError> {
    config.validate()?;

    let Assets {
        regular,
        bold,
        watermark,
    } = Assets::load(config);

    let (page_width, page_height) = config.page_size;
    let content_box = Rect {
        x1: config.margin,
        y1: config.top_offset,
        x2: page_width - config.margin,
        y2: page_height - config.bottom_offset,
    };
    let mut surface = PdfSurface::new(config.page_size, content_box, regular, bold);

    surface.set_info(Info::from_config(config));

    let mut builder = DocumentBuilder::new(config, surface)?;
    if let Some(watermark) = watermark {
        builder = builder.with_watermark(watermark);
    }
    builder.build(text)
}
