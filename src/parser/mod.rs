//! Fragment collection: document buffer → positioned text grouped by page and row.

mod backend;
mod collector;
mod fragments;
mod options;
mod walker;

pub use backend::{decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use collector::{collect_fragments, collect_fragments_blocking, collect_from_backend};
pub use fragments::{
    FragmentCollector, PageLayout, PageRows, ParseEvent, RowKey, TextFragment, DEFAULT_CHAR_WIDTH,
};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use walker::walk_document;
