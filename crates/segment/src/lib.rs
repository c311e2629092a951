pub mod document;
pub mod export;
pub mod segmenter;

pub use document::{Document, EditError, Paragraph, TitleSource, PLACEHOLDER_PARAGRAPH};
pub use export::{export_file_name, export_file_name_today, to_plain_text};
pub use segmenter::{Segmenter, SegmenterConfig, DEFAULT_TITLE, TITLE_MARKER};

/// Segment raw generated text with the default title rules
pub fn segment(raw_text: &str) -> Document {
    Segmenter::default().segment(raw_text)
}
