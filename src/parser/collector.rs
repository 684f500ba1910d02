//! Document parse boundary.
//!
//! The walker reports fragments one notification at a time. This module
//! turns that stream into a single result: the fully populated
//! [`PageRows`] or one error. The async entry point runs the walk on a
//! rayon worker and hands the result back through a oneshot channel, so
//! callers have exactly one await.

use tokio::sync::oneshot;

use super::backend::{LopdfBackend, PdfBackend};
use super::fragments::{FragmentCollector, PageRows};
use super::options::ParseOptions;
use super::walker::walk_document;
use crate::detect;
use crate::error::{Error, Result};

/// Collect the positioned fragments of a document buffer.
///
/// Resolves once with the complete page/row arena, or with an error for
/// which [`Error::is_document_parse`] holds when the buffer is unusable.
/// Dropping the future abandons the walk's result.
pub async fn collect_fragments(data: Vec<u8>, options: ParseOptions) -> Result<PageRows> {
    let (tx, rx) = oneshot::channel();

    rayon::spawn(move || {
        let result = collect_fragments_blocking(&data, &options);
        // The receiver is gone if the caller stopped waiting.
        let _ = tx.send(result);
    });

    rx.await
        .map_err(|_| Error::DocumentParse("parse worker exited without a result".to_string()))?
}

/// Synchronous form of [`collect_fragments`].
pub fn collect_fragments_blocking(data: &[u8], options: &ParseOptions) -> Result<PageRows> {
    let header = detect::sniff(data)?;
    log::debug!("Loading {} ({} bytes)", header, data.len());

    let backend = LopdfBackend::load_bytes(data)?;
    collect_from_backend(&backend, options)
}

/// Collect fragments from an already loaded backend.
pub fn collect_from_backend<B>(backend: &B, options: &ParseOptions) -> Result<PageRows>
where
    B: PdfBackend + ?Sized,
{
    let mut collector = FragmentCollector::new(options.row_tolerance);
    walk_document(backend, options, |event| collector.accept(event))?;

    if !collector.is_finished() {
        return Err(Error::DocumentParse(
            "fragment stream ended without a terminal signal".to_string(),
        ));
    }

    log::debug!("Collected {} rows", collector.row_count());
    Ok(collector.into_rows())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_rejects_non_pdf() {
        let err = collect_fragments_blocking(b"hello world", &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
        assert!(err.is_document_parse());
    }

    #[tokio::test]
    async fn test_async_rejects_truncated_pdf() {
        let err = collect_fragments(b"%PDF-1.4\n1 0 obj".to_vec(), ParseOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_document_parse(), "unexpected error: {err:?}");
    }
}
