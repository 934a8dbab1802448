//! Typesets plain contract text into a paginated PDF with justified body text, detected subtitles
//! and a repeating title block, watermark and page-numbered footer.
//!
//! Most callers only need [typeset]. The engine itself lives in [layout] and draws through the
//! [surface::TextSurface] capability, so it can also run against the deterministic
//! [surface::RecordingSurface].

mod assets;
pub use assets::*;

mod content;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// The layout and pagination engine
pub mod layout;

mod page;
pub use page::*;

/// Standard page sizes
pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod standard_fonts;
pub use standard_fonts::*;

/// Drawing backends for the layout engine
pub mod surface;

mod typeset;
pub use typeset::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
