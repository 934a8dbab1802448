use crate::pagesize::{PageOrientation, PageSize, A4};
use crate::units::{Mm, Pt};
use crate::TypesetError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where an external asset (font file, watermark image) comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl AssetSource {
    /// Short human readable description, for log output
    pub fn describe(&self) -> String {
        match self {
            AssetSource::Path(path) => path.display().to_string(),
            AssetSource::Bytes(bytes) => format!("<{} bytes in memory>", bytes.len()),
        }
    }
}

/// Every parameter of a typeset document. Created once, never mutated during layout.
///
/// Coordinates are top-down: `top_offset` is measured from the top edge of the page and the flow
/// limit for body text is `page_height - bottom_offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_size: PageSize,
    /// Left and right margin
    pub margin: Pt,
    /// Baseline of the first body line on every page
    pub top_offset: Pt,
    /// Space reserved at the bottom of every page for the footer
    pub bottom_offset: Pt,

    pub font_family: String,
    pub regular_style: String,
    pub bold_style: String,
    pub regular_font: Option<AssetSource>,
    pub bold_font: Option<AssetSource>,

    pub font_size: Pt,
    pub line_height: Pt,
    /// Extra space after each body paragraph
    pub paragraph_gap: Pt,
    /// Space inserted for a run of blank source lines
    pub blank_line_gap: Pt,
    /// Distance of the subtitle underline below its baseline
    pub underline_offset: Pt,

    pub title: String,
    pub title_font_size: Pt,
    pub title_top: Pt,
    pub title_line_height: Pt,
    /// Distance from the last title baseline to the rule beneath it
    pub rule_gap: Pt,
    pub rule_width: Pt,

    pub footer_label: String,
    pub footer_font_size: Pt,

    pub watermark: Option<AssetSource>,
    pub watermark_opacity: f32,
    /// Watermark width as a fraction of the usable line width
    pub watermark_scale: f32,

    pub author: Option<String>,
    pub subject: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let font_size = Pt(11.0);
        let title_font_size = Pt(14.0);
        LayoutConfig {
            page_size: A4,
            margin: Mm(20.0).into(),
            top_offset: Mm(45.0).into(),
            bottom_offset: Mm(20.0).into(),
            font_family: "Helvetica".into(),
            regular_style: "normal".into(),
            bold_style: "bold".into(),
            regular_font: None,
            bold_font: None,
            font_size,
            line_height: font_size * 1.35,
            paragraph_gap: Pt(4.0),
            blank_line_gap: Pt(6.0),
            underline_offset: Pt(1.5),
            title: String::new(),
            title_font_size,
            title_top: Mm(20.0).into(),
            title_line_height: title_font_size * 1.3,
            rule_gap: Pt(6.0),
            rule_width: Pt(0.75),
            footer_label: "Page".into(),
            footer_font_size: Pt(9.0),
            watermark: None,
            watermark_opacity: 0.08,
            watermark_scale: 0.6,
            author: None,
            subject: None,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> LayoutConfig {
        LayoutConfig::default()
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Turn the page sideways, keeping its paper size
    pub fn landscape(mut self) -> Self {
        self.page_size = self.page_size.landscape();
        self
    }

    pub fn with_margin<D: Into<Pt>>(mut self, margin: D) -> Self {
        self.margin = margin.into();
        self
    }

    /// Set where body text starts and how much room the footer keeps at the bottom
    pub fn with_offsets<T: Into<Pt>, B: Into<Pt>>(mut self, top: T, bottom: B) -> Self {
        self.top_offset = top.into();
        self.bottom_offset = bottom.into();
        self
    }

    /// Set the body font size; the line height follows at 1.35 × size
    pub fn with_font_size(mut self, size: Pt) -> Self {
        self.font_size = size;
        self.line_height = size * 1.35;
        self
    }

    pub fn with_line_height(mut self, line_height: Pt) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_font_family<S: ToString>(mut self, family: S, regular: S, bold: S) -> Self {
        self.font_family = family.to_string();
        self.regular_style = regular.to_string();
        self.bold_style = bold.to_string();
        self
    }

    pub fn with_fonts(mut self, regular: AssetSource, bold: AssetSource) -> Self {
        self.regular_font = Some(regular);
        self.bold_font = Some(bold);
        self
    }

    pub fn with_title<S: ToString>(mut self, title: S) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_footer_label<S: ToString>(mut self, label: S) -> Self {
        self.footer_label = label.to_string();
        self
    }

    pub fn with_watermark(mut self, watermark: AssetSource) -> Self {
        self.watermark = Some(watermark);
        self
    }

    pub fn with_author<S: ToString>(mut self, author: S) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn with_subject<S: ToString>(mut self, subject: S) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn page_width(&self) -> Pt {
        self.page_size.0
    }

    pub fn page_height(&self) -> Pt {
        self.page_size.1
    }

    /// Usable line width: page width minus both margins
    pub fn max_width(&self) -> Pt {
        self.page_size.0 - self.margin * 2.0
    }

    /// No line may be drawn at or below this `y`
    pub fn flow_limit(&self) -> Pt {
        self.page_size.1 - self.bottom_offset
    }

    /// Baseline of the footer text
    pub fn footer_y(&self) -> Pt {
        self.page_size.1 - self.bottom_offset / 2.0
    }

    /// The face name for a style, e.g. `Helvetica-bold`
    pub fn face_name(&self, bold: bool) -> String {
        let style = if bold {
            &self.bold_style
        } else {
            &self.regular_style
        };
        format!("{}-{}", self.font_family, style)
    }

    /// Reject configurations that cannot describe a usable page. Called before any layout work.
    pub fn validate(&self) -> Result<(), TypesetError> {
        fn positive(name: &str, value: Pt) -> Result<(), TypesetError> {
            if value.is_finite() && *value > 0.0 {
                Ok(())
            } else {
                Err(TypesetError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        }

        fn non_negative(name: &str, value: Pt) -> Result<(), TypesetError> {
            if value.is_finite() && *value >= 0.0 {
                Ok(())
            } else {
                Err(TypesetError::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )))
            }
        }

        positive("page width", self.page_size.0)?;
        positive("page height", self.page_size.1)?;
        non_negative("margin", self.margin)?;
        if self.margin * 2.0 >= self.page_size.0 {
            return Err(TypesetError::InvalidConfig(format!(
                "margins ({} each) leave no room on a page {} wide",
                self.margin, self.page_size.0
            )));
        }

        positive("font size", self.font_size)?;
        positive("line height", self.line_height)?;
        positive("title font size", self.title_font_size)?;
        positive("title line height", self.title_line_height)?;
        positive("footer font size", self.footer_font_size)?;

        non_negative("top offset", self.top_offset)?;
        non_negative("bottom offset", self.bottom_offset)?;
        non_negative("title top", self.title_top)?;
        non_negative("paragraph gap", self.paragraph_gap)?;
        non_negative("blank line gap", self.blank_line_gap)?;
        non_negative("rule gap", self.rule_gap)?;
        non_negative("rule width", self.rule_width)?;
        non_negative("underline offset", self.underline_offset)?;

        if self.top_offset >= self.flow_limit() {
            return Err(TypesetError::InvalidConfig(format!(
                "top offset {} leaves no room for body text above {}",
                self.top_offset,
                self.flow_limit()
            )));
        }

        if !(0.0..=1.0).contains(&self.watermark_opacity) {
            return Err(TypesetError::InvalidConfig(format!(
                "watermark opacity must be within 0..=1, got {}",
                self.watermark_opacity
            )));
        }
        if !(self.watermark_scale > 0.0 && self.watermark_scale <= 1.0) {
            return Err(TypesetError::InvalidConfig(format!(
                "watermark scale must be within (0, 1], got {}",
                self.watermark_scale
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        LayoutConfig::default().validate().expect("defaults are usable");
    }

    #[test]
    fn rejects_degenerate_pages() {
        let zero_width = LayoutConfig::default().with_page_size((Pt(0.0), Pt(800.0)));
        assert!(matches!(
            zero_width.validate(),
            Err(TypesetError::InvalidConfig(_))
        ));

        let negative = LayoutConfig::default().with_page_size((Pt(-10.0), Pt(800.0)));
        assert!(negative.validate().is_err());

        let nan = LayoutConfig::default().with_page_size((Pt(f32::NAN), Pt(800.0)));
        assert!(nan.validate().is_err());
    }

    #[test]
    fn rejects_margins_wider_than_the_page() {
        let config = LayoutConfig::default()
            .with_page_size((Pt(100.0), Pt(800.0)))
            .with_margin(Pt(50.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_offsets_that_leave_no_body() {
        let config = LayoutConfig::default()
            .with_page_size((Pt(400.0), Pt(300.0)))
            .with_offsets(Pt(200.0), Pt(100.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_watermark_opacity() {
        let mut config = LayoutConfig::default();
        config.watermark_opacity = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn landscape_swaps_the_page_edges() {
        let config = LayoutConfig::default().landscape();
        assert_eq!(config.page_size, (A4.1, A4.0));
        assert_eq!(config.landscape().page_size, (A4.1, A4.0));
    }

    #[test]
    fn derived_geometry() {
        let config = LayoutConfig::default()
            .with_page_size((Pt(600.0), Pt(800.0)))
            .with_margin(Pt(50.0))
            .with_offsets(Pt(120.0), Pt(60.0));
        assert_eq!(config.max_width(), Pt(500.0));
        assert_eq!(config.flow_limit(), Pt(740.0));
        assert_eq!(config.footer_y(), Pt(770.0));
        assert_eq!(config.face_name(true), "Helvetica-bold");
    }
}
