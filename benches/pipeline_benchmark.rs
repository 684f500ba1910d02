//! Benchmarks for uncal extraction performance.
//!
//! Run with: cargo bench
//!
//! The text stages run on generated calendar text; the parse stage runs
//! on a synthetic PDF with one table row per line.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uncal::{AcademicProfile, DateOptions, Pipeline, PipelineOptions};

const HEADER: &str = "APJ ABDUL KALAM TECHNOLOGICAL UNIVERSITY";

/// Reconstructed text of `blocks` program blocks with `rows` events each.
fn calendar_text(blocks: usize, rows: usize) -> String {
    let mut text = String::new();
    for b in 0..blocks {
        text.push_str(&format!("{HEADER}\nAcademic Calendar\nB.Tech S{}\n", b + 1));
        text.push_str("SL.No | Event | Date\n");
        for r in 0..rows {
            text.push_str(&format!(
                "{} | Scheduled activity number {} | {:02}-{:02}-2025\n",
                r + 1,
                r,
                r % 28 + 1,
                r % 12 + 1
            ));
        }
        text.push_str("Page 1 of 1\n\n");
    }
    text
}

/// Minimal PDF with `rows` three-column rows on one page.
fn calendar_pdf(rows: usize) -> Vec<u8> {
    let mut stream = format!("BT /F1 10 Tf 50 820 Td ({HEADER}) Tj ET\n");
    stream.push_str("BT /F1 10 Tf 50 808 Td (B.Tech S5) Tj ET\n");
    for r in 0..rows {
        let y = 796 - (r as i32 % 70) * 11;
        stream.push_str(&format!(
            "BT /F1 10 Tf 50 {y} Td ({}) Tj ET\n\
             BT /F1 10 Tf 100 {y} Td (Scheduled activity {r}) Tj ET\n\
             BT /F1 10 Tf 400 {y} Td ({:02}-{:02}-2025) Tj ET\n",
            r + 1,
            r % 28 + 1,
            r % 12 + 1
        ));
    }

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] /Contents 4 0 R >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", stream.len(), stream),
    ];

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }
    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    out.extend_from_slice(xref.as_bytes());
    out
}

fn pipeline() -> Pipeline {
    Pipeline::new(PipelineOptions::new().with_date(DateOptions::new().with_year_hint(2025)))
}

/// Benchmark normalization, block location and event assembly.
fn bench_text_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_stages");
    let pipeline = pipeline();
    let profile = AcademicProfile::new("cse").with_semester(8);

    for (blocks, rows) in [(1, 20), (8, 40), (8, 200)] {
        let text = calendar_text(blocks, rows);
        group.bench_function(format!("{}x{}", blocks, rows), |b| {
            b.iter(|| pipeline.process_text(black_box(&text), &profile));
        });
    }

    group.finish();
}

/// Benchmark the full pipeline on a synthetic PDF.
fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let pipeline = pipeline();
    let profile = AcademicProfile::new("cse").with_semester(5);

    for rows in [10, 60] {
        let data = calendar_pdf(rows);
        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| pipeline.extract_blocking(black_box(&data), &profile));
        });
    }

    group.finish();
}

/// Benchmark upload sniffing.
fn bench_sniff(c: &mut Criterion) {
    let data = calendar_pdf(1);
    let non_pdf = b"Not a PDF file at all, just random text content";

    c.bench_function("sniff_valid_pdf", |b| {
        b.iter(|| uncal::sniff(black_box(&data)));
    });

    c.bench_function("sniff_non_pdf", |b| {
        b.iter(|| uncal::sniff(black_box(non_pdf)).is_err());
    });
}

criterion_group!(benches, bench_text_stages, bench_full_pipeline, bench_sniff);
criterion_main!(benches);
