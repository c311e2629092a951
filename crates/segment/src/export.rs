use chrono::NaiveDate;

use crate::document::Document;

pub const EXPORT_FILE_PREFIX: &str = "호치민출장후기";

/// Title and paragraphs separated by blank lines, the copy/download format
pub fn to_plain_text(doc: &Document) -> String {
    if doc.paragraphs.is_empty() {
        return doc.title.clone();
    }
    format!("{}\n\n{}", doc.title, doc.body_text())
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}_{}.txt", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// File name stamped with today's local date
pub fn export_file_name_today() -> String {
    export_file_name(chrono::Local::now().date_naive())
}
