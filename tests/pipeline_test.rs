//! End-to-end tests: synthetic calendar PDF → events.

mod common;

use chrono::NaiveDate;
use common::{build_pdf, row, run, two_program_calendar, HEADER};
use uncal::parser::collect_fragments_blocking;
use uncal::{
    extract_events, extract_events_blocking, AcademicProfile, CalendarEvent, DateOptions, Error,
    PageSelection, ParseOptions, Pipeline, PipelineOptions, Uncal,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn cse_s5() -> AcademicProfile {
    AcademicProfile::new("cse").with_semester(5)
}

fn expected() -> Vec<CalendarEvent> {
    vec![
        CalendarEvent::new("Commencement of classes", ymd(2025, 8, 1)),
        CalendarEvent::new("First Series Test", ymd(2025, 8, 23)),
    ]
}

#[test]
fn test_two_page_calendar_blocking() {
    let events = extract_events_blocking(&two_program_calendar(), &cse_s5()).unwrap();
    assert_eq!(events, expected());
}

#[tokio::test]
async fn test_two_page_calendar_async() {
    let events = extract_events(two_program_calendar(), &cse_s5()).await.unwrap();
    assert_eq!(events, expected());
}

#[test]
fn test_reconstructed_text_has_columns() {
    let text = uncal::extract_text(&two_program_calendar()).unwrap();
    assert!(text.contains(&format!("{HEADER}\nMCA S1\n1 | Orientation programme | 04-08-2025")));
    assert!(text.contains("1 | Commencement of classes | 01-08-2025"));
    assert!(text.contains("\n\n"));
}

#[test]
fn test_line_count_matches_distinct_rows() {
    let rows = collect_fragments_blocking(&two_program_calendar(), &ParseOptions::default()).unwrap();
    let keys: usize = rows.values().map(|page| page.len()).sum();

    let text = Pipeline::default().reconstruct(&rows);
    assert_eq!(text.line_count(), keys);
    // page 1: header, program, one row; page 2: header, program, footer, two rows
    assert_eq!(keys, 8);
}

#[test]
fn test_pipeline_is_idempotent() {
    let data = two_program_calendar();
    let pipeline = Pipeline::default();
    let first = pipeline.extract_blocking(&data, &cse_s5()).unwrap();
    let second = pipeline.extract_blocking(&data, &cse_s5()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unmatched_profile_falls_back_to_full_text() {
    let profile = AcademicProfile::new("mba").with_semester(2);

    let events = extract_events_blocking(&two_program_calendar(), &profile).unwrap();
    let names: Vec<_> = events.iter().map(|e| e.event_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Commencement of classes", "Orientation programme", "First Series Test"]
    );

    let strict = Uncal::new()
        .strict()
        .extract_bytes(&two_program_calendar(), &profile)
        .unwrap();
    assert!(strict.is_empty());
}

#[test]
fn test_page_selection_limits_blocks() {
    let options = PipelineOptions::new()
        .with_parse(ParseOptions::new().with_pages(PageSelection::Pages(vec![1])))
        .with_date(DateOptions::new().with_year_hint(2025));
    let profile = AcademicProfile::new("mca").with_semester(1);

    let events = Pipeline::new(options)
        .extract_blocking(&two_program_calendar(), &profile)
        .unwrap();
    assert_eq!(
        events,
        vec![CalendarEvent::new("Orientation programme", ymd(2025, 8, 4))]
    );
}

#[test]
fn test_duplicate_rows_across_pages_collapse() {
    let mut page1 = vec![run(50.0, 800.0, HEADER), run(50.0, 780.0, "B.Tech S5")];
    page1.extend(row(760.0, "3", "Exam Registration", "01-07-2025"));
    let mut page2 = row(760.0, "3", "Exam Registration", "01-07-2025");
    page2.extend(row(740.0, "4", "Exam Registration", "02-07-2025"));

    let events = extract_events_blocking(&build_pdf(&[page1, page2]), &cse_s5()).unwrap();
    assert_eq!(
        events,
        vec![
            CalendarEvent::new("Exam Registration", ymd(2025, 7, 1)),
            CalendarEvent::new("Exam Registration", ymd(2025, 7, 2)),
        ]
    );
}

#[test]
fn test_csv_sink_written_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let events = Uncal::new()
        .with_csv_dir(dir.path())
        .extract_bytes(&two_program_calendar(), &cse_s5())
        .unwrap();
    assert_eq!(events.len(), 2);

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(&files[0]).unwrap();
    assert_eq!(
        content,
        "event_name,event_date\n\
         Commencement of classes,2025-08-01\n\
         First Series Test,2025-08-23\n"
    );
}

#[test]
fn test_csv_sink_failure_is_not_fatal() {
    let events = Uncal::new()
        .with_csv_dir("/nonexistent/uncal/exports")
        .extract_bytes(&two_program_calendar(), &cse_s5())
        .unwrap();
    assert_eq!(events, expected());
}

#[test]
fn test_blank_page_yields_no_events() {
    let events = extract_events_blocking(&build_pdf(&[vec![]]), &cse_s5()).unwrap();
    assert!(events.is_empty());
}

// ==================== Error Tests ====================

#[test]
fn test_truncated_pdf_is_document_parse_error() {
    let data = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog";
    let err = extract_events_blocking(data, &cse_s5()).unwrap_err();
    assert!(err.is_document_parse(), "unexpected error: {err:?}");
}

#[test]
fn test_non_pdf_is_rejected() {
    let err = extract_events_blocking(b"<html>calendar</html>", &cse_s5()).unwrap_err();
    assert!(matches!(err, Error::UnknownFormat));
    assert!(err.is_document_parse());
}

#[tokio::test]
async fn test_async_error_resolves_once() {
    let err = extract_events(b"garbage".to_vec(), &cse_s5()).await.unwrap_err();
    assert!(err.is_document_parse());
}
