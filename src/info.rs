use crate::layout::LayoutConfig;
use crate::refs::{ObjectReferences, RefType};
use chrono::{DateTime, Datelike, FixedOffset, Local, Offset, Timelike};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// The document information dictionary of a typeset contract
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Info {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

impl Info {
    /// Metadata for a document laid out with `config`. Blank values are left out.
    pub fn from_config(config: &LayoutConfig) -> Info {
        fn non_blank(value: &str) -> Option<String> {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }

        Info {
            title: non_blank(&config.title),
            author: config.author.as_deref().and_then(non_blank),
            subject: config.subject.as_deref().and_then(non_blank),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject));
        }

        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));

        let now = Local::now();
        info.creation_date(pdf_date(now.with_timezone(&now.offset().fix())));
    }
}

/// A timestamp as a PDF date, keeping its UTC offset
fn pdf_date(time: DateTime<FixedOffset>) -> PDate {
    let offset_minutes = time.offset().local_minus_utc() / 60;
    PDate::new(time.year() as u16)
        .month(time.month() as u8)
        .day(time.day() as u8)
        .hour(time.hour() as u8)
        .minute(time.minute() as u8)
        .second(time.second() as u8)
        .utc_offset_hour((offset_minutes / 60) as i8)
        .utc_offset_minute((offset_minutes % 60).unsigned_abs() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn takes_metadata_from_the_layout() {
        let config = LayoutConfig::default()
            .with_title("  CONTRATO DE SERVICIOS ")
            .with_author("Academia")
            .with_subject("   ");

        let info = Info::from_config(&config);
        assert_eq!(info.title.as_deref(), Some("CONTRATO DE SERVICIOS"));
        assert_eq!(info.author.as_deref(), Some("Academia"));
        assert_eq!(info.subject, None);
    }

    #[test]
    fn untitled_layout_has_no_title() {
        assert_eq!(Info::from_config(&LayoutConfig::default()), Info::default());
    }

    #[test]
    fn writes_metadata_and_creator() {
        let info = Info::from_config(&LayoutConfig::default().with_title("CONTRATO"));
        let mut refs = ObjectReferences::new();
        let mut writer = Pdf::new();
        info.write(&mut refs, &mut writer);

        let bytes = writer.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(CONTRATO)"));
        assert!(text.contains("(contract-typeset v"));
        assert!(!text.contains("/Author"));
    }

    #[test]
    fn dates_keep_negative_offsets() {
        let offset = FixedOffset::west_opt(3 * 3600 + 1800).expect("valid offset");
        let time = offset
            .with_ymd_and_hms(2024, 3, 5, 14, 30, 0)
            .single()
            .expect("unambiguous time");

        let mut refs = ObjectReferences::new();
        let mut writer = Pdf::new();
        writer
            .document_info(refs.gen(RefType::Info))
            .creation_date(pdf_date(time));
        let bytes = writer.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("D:20240305143000-03"));
    }
}
