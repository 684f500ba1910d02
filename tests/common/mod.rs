//! Synthetic calendar PDFs for integration tests.

#![allow(dead_code)]

/// A text run placed with `Td` at `(x, y)` in PDF space (origin bottom-left).
pub struct Run {
    pub x: f32,
    pub y: f32,
    pub text: &'static str,
}

pub fn run(x: f32, y: f32, text: &'static str) -> Run {
    Run { x, y, text }
}

pub const HEADER: &str = "APJ ABDUL KALAM TECHNOLOGICAL UNIVERSITY";

/// One table row: index, event name and date in three columns.
pub fn row(y: f32, index: &'static str, name: &'static str, date: &'static str) -> Vec<Run> {
    vec![run(50.0, y, index), run(100.0, y, name), run(400.0, y, date)]
}

/// Build a PDF whose pages show `pages[i]` at size 10 on an A4 MediaBox.
///
/// No font resources are attached, so string bytes are read as-is.
pub fn build_pdf(pages: &[Vec<Run>]) -> Vec<u8> {
    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets: Vec<usize> = Vec::new();

    fn object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: &str) {
        offsets.push(out.len());
        let id = offsets.len();
        out.extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();
    object(&mut out, &mut offsets, "<< /Type /Catalog /Pages 2 0 R >>");
    object(
        &mut out,
        &mut offsets,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    );

    for (i, runs) in pages.iter().enumerate() {
        let content_id = 4 + 2 * i;
        object(
            &mut out,
            &mut offsets,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] /Contents {content_id} 0 R >>"
            ),
        );

        let stream: String = runs
            .iter()
            .map(|r| format!("BT /F1 10 Tf {} {} Td ({}) Tj ET\n", r.x, r.y, r.text))
            .collect();
        object(
            &mut out,
            &mut offsets,
            &format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ),
        );
    }

    let xref_offset = out.len();
    let size = offsets.len() + 1;
    let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
    for offset in &offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
    ));
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Two pages, one program block each: MCA S1 first, B.Tech S5 second.
pub fn two_program_calendar() -> Vec<u8> {
    let mut page1 = vec![run(50.0, 800.0, HEADER), run(50.0, 780.0, "MCA S1")];
    page1.extend(row(760.0, "1", "Orientation programme", "04-08-2025"));

    let mut page2 = vec![
        run(50.0, 800.0, HEADER),
        run(50.0, 780.0, "B.Tech S5"),
        run(50.0, 770.0, "Page 2 of 2"),
    ];
    page2.extend(row(760.0, "1", "Commencement of classes", "01-08-2025"));
    page2.extend(row(740.0, "2", "First Series Test", "23-08-2025"));

    build_pdf(&[page1, page2])
}
