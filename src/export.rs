//! Output rendering: JSON for callers, CSV for inspection.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{Error, Result};
use crate::events::CalendarEvent;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Render events as a JSON array.
pub fn to_json(events: &[CalendarEvent], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(events),
        JsonFormat::Compact => serde_json::to_string(events),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write events as `event_name,event_date` CSV.
pub fn write_csv<W: Write>(events: &[CalendarEvent], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["event_name", "event_date"])?;
    for event in events {
        csv.write_record([
            event.event_name.as_str(),
            &event.event_date.format("%Y-%m-%d").to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Save events to a timestamped CSV file in `dir`.
///
/// Returns the written path, or `None` when there is nothing to write.
pub fn save_csv(events: &[CalendarEvent], dir: &Path) -> Result<Option<PathBuf>> {
    if events.is_empty() {
        return Ok(None);
    }

    let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
    let path = dir.join(format!("schedule_extracted_{stamp}.csv"));
    write_csv(events, File::create(&path)?)?;

    log::info!("CSV saved to {}", path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Vec<CalendarEvent> {
        vec![
            CalendarEvent::new(
                "Commencement of classes",
                NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            ),
            CalendarEvent::new(
                "Series Test, \"first\"",
                NaiveDate::from_ymd_opt(2025, 8, 23).unwrap(),
            ),
        ]
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"event_date\": \"2025-08-01\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample()[..1], JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"[{"event_name":"Commencement of classes","event_date":"2025-08-01"}]"#
        );
        assert_eq!(to_json(&[], JsonFormat::Compact).unwrap(), "[]");
    }

    #[test]
    fn test_write_csv_quotes_fields() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "event_name,event_date\n\
             Commencement of classes,2025-08-01\n\
             \"Series Test, \"\"first\"\"\",2025-08-23\n"
        );
    }

    #[test]
    fn test_save_csv_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(save_csv(&[], dir.path()).unwrap(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_save_csv_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_csv(&sample(), dir.path()).unwrap().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("schedule_extracted_"));
        assert!(name.ends_with(".csv"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("event_name,event_date\n"));
    }
}
