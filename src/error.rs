use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum TypesetError {
    #[error("invalid layout configuration: {0}")]
    /// The [LayoutConfig](crate::layout::LayoutConfig) cannot describe a usable page
    InvalidConfig(String),

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to parse the image
    Image(#[from] image::ImageError),
}
