use crate::font::Font;
use crate::image::Image;
use crate::layout::{AssetSource, LayoutConfig};
use crate::standard_fonts::StandardFont;
use crate::TypesetError;

/// Read the raw bytes behind an asset source
fn read(source: &AssetSource) -> Result<Vec<u8>, TypesetError> {
    match source {
        AssetSource::Path(path) => Ok(std::fs::read(path)?),
        AssetSource::Bytes(bytes) => Ok(bytes.clone()),
    }
}

/// Load a TrueType / OpenType face, named `name` unless the face carries its own PostScript name
pub fn load_font(source: &AssetSource, name: &str) -> Result<Font, TypesetError> {
    Font::load(read(source)?, name)
}

/// Load and decode a raster image
pub fn load_image(source: &AssetSource) -> Result<Image, TypesetError> {
    Image::from_bytes(&read(source)?)
}

/// The external assets of a document after the one-time load.
///
/// Loading never fails: every asset that cannot be read or decoded is logged and replaced by its
/// fallback (standard Helvetica for fonts, no watermark for the image).
pub struct Assets {
    pub regular: Font,
    pub bold: Font,
    pub watermark: Option<Image>,
}

impl Assets {
    pub fn load(config: &LayoutConfig) -> Assets {
        let regular = load_face(
            config.regular_font.as_ref(),
            &config.face_name(false),
            StandardFont::Helvetica,
        );
        let bold = load_face(
            config.bold_font.as_ref(),
            &config.face_name(true),
            StandardFont::HelveticaBold,
        );

        let watermark = config
            .watermark
            .as_ref()
            .and_then(|source| match load_image(source) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!(
                        "failed to load watermark {}, continuing without it: {e}",
                        source.describe()
                    );
                    None
                }
            });

        Assets {
            regular,
            bold,
            watermark,
        }
    }
}

fn load_face(source: Option<&AssetSource>, name: &str, fallback: StandardFont) -> Font {
    let Some(source) = source else {
        return Font::standard(fallback);
    };

    match load_font(source, name) {
        Ok(font) => font,
        Err(e) => {
            log::warn!(
                "failed to load font {name} from {}, falling back to {}: {e}",
                source.describe(),
                fallback.base_font()
            );
            Font::standard(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let image = ::image::DynamicImage::new_rgba8(4, 2);
        let mut bytes = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, ::image::ImageOutputFormat::Png)
            .expect("can encode png");
        bytes.into_inner()
    }

    #[test]
    fn missing_assets_fall_back() {
        let config = LayoutConfig::default()
            .with_fonts(
                AssetSource::Path("does/not/exist.ttf".into()),
                AssetSource::Bytes(vec![0, 1, 2, 3]),
            )
            .with_watermark(AssetSource::Path("does/not/exist.png".into()));

        let assets = Assets::load(&config);
        assert_eq!(assets.regular.name(), "Helvetica");
        assert_eq!(assets.bold.name(), "Helvetica-Bold");
        assert!(assets.watermark.is_none());
    }

    #[test]
    fn loads_an_in_memory_watermark() {
        let config =
            LayoutConfig::default().with_watermark(AssetSource::Bytes(png_bytes()));
        let assets = Assets::load(&config);
        let watermark = assets.watermark.expect("watermark decoded");
        assert_eq!(watermark.aspect_ratio(), 2.0);
    }

    #[test]
    fn load_errors_are_typed() {
        assert!(matches!(
            load_font(&AssetSource::Path("nope.ttf".into()), "x"),
            Err(TypesetError::Io(_))
        ));
        assert!(matches!(
            load_image(&AssetSource::Bytes(vec![1, 2, 3])),
            Err(TypesetError::Image(_))
        ));
    }
}
