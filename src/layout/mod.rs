//! The layout and pagination engine.
//!
//! Text flows through the stages in this order:
//!
//! 1. [normalize_text] cleans whitespace and splits the text into source lines
//! 2. [classify_lines] tags every line as a [Paragraph::Subtitle], [Paragraph::Body] or
//!    [Paragraph::Blank]
//! 3. [wrap_words] greedily breaks body lines at the usable width
//! 4. [justify] stretches every wrapped line but the last of its paragraph to the full width
//! 5. [PageFlowController] owns the vertical [Cursor] and breaks pages before a line would cross
//!    the flow limit, asking [HeaderFooterRenderer] to decorate each page
//!
//! [DocumentBuilder] drives the stages against any [TextSurface](crate::surface::TextSurface).
//!
//! # Example
//!
//! ```
//! use contract_typeset::layout::{DocumentBuilder, LayoutConfig};
//! use contract_typeset::surface::RecordingSurface;
//!
//! let config = LayoutConfig::default().with_title("CONTRATO DE PRESTACION DE SERVICIOS");
//! let surface = RecordingSurface::new(config.page_size);
//!
//! let recording = DocumentBuilder::new(&config, surface)
//!     .expect("default config is valid")
//!     .build("PRIMERA:\nEl jugador se compromete a asistir a los entrenamientos.")
//!     .expect("recording never fails");
//!
//! assert_eq!(recording.page_count(), 1);
//! ```

mod builder;
mod classify;
mod config;
mod flow;
mod header;
mod justify;
mod normalize;
mod wrap;

pub use builder::*;
pub use classify::*;
pub use config::*;
pub use flow::*;
pub use header::*;
pub use justify::*;
pub use normalize::*;
pub use wrap::*;
