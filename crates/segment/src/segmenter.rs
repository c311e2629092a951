use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Document, TitleSource};

pub const TITLE_MARKER: &str = "제목:";
pub const DEFAULT_TITLE: &str = "호치민 출장의 완벽한 밸런스: 노보텔 사이공 센터에서의 기록";
pub const SHORT_LINE_THRESHOLD: usize = 100;

static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.").unwrap());

pub struct SegmenterConfig {
    pub title_marker: String,
    pub default_title: String,
    /// A first line shorter than this (in chars) is taken as the title
    pub short_line_threshold: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            title_marker: TITLE_MARKER.to_string(),
            default_title: DEFAULT_TITLE.to_string(),
            short_line_threshold: SHORT_LINE_THRESHOLD,
        }
    }
}

pub struct Segmenter {
    config: SegmenterConfig,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmenterConfig::default())
    }
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Split generated text into a title and numbered paragraphs.
    ///
    /// Never fails: text that does not look like a story still produces a
    /// document, and the analyzers report the shortfall.
    pub fn segment(&self, raw_text: &str) -> Document {
        let lines: Vec<&str> = raw_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let (title, source) = match lines.first() {
            Some(first) => self.detect_title(first),
            None => (self.config.default_title.clone(), TitleSource::Default),
        };

        let body = if source.consumed_line() {
            &lines[1..]
        } else {
            &lines[..]
        };

        Document::new(
            title,
            source,
            body.iter().map(|line| line.to_string()).collect(),
        )
    }

    fn detect_title(&self, first_line: &str) -> (String, TitleSource) {
        if let Some(rest) = first_line.strip_prefix(self.config.title_marker.as_str()) {
            let title = rest.trim();
            let title = if title.is_empty() {
                self.config.default_title.clone()
            } else {
                title.to_string()
            };
            return (title, TitleSource::Marker);
        }

        if !NUMBERED_LINE.is_match(first_line)
            && first_line.chars().count() < self.config.short_line_threshold
        {
            return (first_line.to_string(), TitleSource::ShortLine);
        }

        (self.config.default_title.clone(), TitleSource::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_title_is_stripped() {
        let doc = Segmenter::default().segment("제목: 어떤 제목\n\n1. 첫 문단\n2. 둘째 문단");

        assert_eq!(doc.title, "어떤 제목");
        assert_eq!(doc.title_source, TitleSource::Marker);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.paragraphs[0].content, "1. 첫 문단");
    }

    #[test]
    fn test_numbered_first_line_uses_default_title() {
        let doc = Segmenter::default().segment("1. 본문 시작\n2. 다음 문단");

        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.title_source, TitleSource::Default);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_short_first_line_becomes_title() {
        let doc = Segmenter::default().segment("  노보텔 사이공센터에서의 나흘  \n본문 하나");

        assert_eq!(doc.title, "노보텔 사이공센터에서의 나흘");
        assert_eq!(doc.title_source, TitleSource::ShortLine);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_long_first_line_is_a_paragraph() {
        let long_line = "가".repeat(SHORT_LINE_THRESHOLD);
        let doc = Segmenter::default().segment(&format!("{}\n끝", long_line));

        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_ordinals_ignore_source_numbering() {
        let doc = Segmenter::default().segment("제목: 테스트\n3. 셋\n\n   \n7. 일곱\n1. 하나");

        let numbers: Vec<_> = doc.paragraphs.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(doc.paragraphs[1].content, "7. 일곱");
    }

    #[test]
    fn test_empty_marker_falls_back_to_default() {
        let doc = Segmenter::default().segment("제목:   \n본문");

        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.title_source, TitleSource::Marker);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let doc = Segmenter::default().segment("  \n\n\t\n");

        assert_eq!(doc.title, DEFAULT_TITLE);
        assert!(doc.is_empty());
    }
}
