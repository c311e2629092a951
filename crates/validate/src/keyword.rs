use segment::{Document, Paragraph};
use serde::{Deserialize, Serialize};

use crate::naturalness::{HeuristicNaturalness, NaturalnessChecker};

pub const CIRCLED_NUMBERS: [&str; 6] = ["①", "②", "③", "④", "⑤", "⑥"];

/// Characters kept on each side of a match when extracting context
pub const CONTEXT_WINDOW_CHARS: usize = 30;

/// Ordered markers handed out to keyword occurrences.
///
/// The Nth occurrence gets the Nth marker; occurrences past the end reuse
/// the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    markers: Vec<String>,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::circled(5)
    }
}

impl MarkerSet {
    /// Six-placement variant of the story format
    pub fn six() -> Self {
        Self::circled(6)
    }

    fn circled(count: usize) -> Self {
        Self {
            markers: CIRCLED_NUMBERS[..count].iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Custom markers; an empty list falls back to the default set
    pub fn from_markers(markers: Vec<String>) -> Self {
        if markers.is_empty() {
            return Self::default();
        }
        Self { markers }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker for the 1-based `sequence`, capped at the last marker
    pub fn marker_for(&self, sequence: usize) -> &str {
        let idx = sequence.saturating_sub(1).min(self.markers.len() - 1);
        &self.markers[idx]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordOccurrence {
    /// 1-based order of discovery across the document
    pub sequence: usize,
    pub marker: String,
    pub paragraph: usize,
    pub context: String,
    pub is_natural: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlacementVerdict {
    Perfect,
    VeryGood,
    Fair,
    NeedsWork,
}

impl PlacementVerdict {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            100.. => PlacementVerdict::Perfect,
            80..=99 => PlacementVerdict::VeryGood,
            50..=79 => PlacementVerdict::Fair,
            _ => PlacementVerdict::NeedsWork,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PlacementVerdict::Perfect => "모든 키워드가 자연스럽고 문법적으로 정확하게 배치되었습니다.",
            PlacementVerdict::VeryGood => "대부분의 키워드가 자연스럽게 배치되었습니다. 검토 필요 항목을 확인하세요.",
            PlacementVerdict::Fair => "키워드 배치가 부분적으로 어색합니다. 검토 필요 항목을 수정하시기를 권장합니다.",
            PlacementVerdict::NeedsWork => "많은 키워드가 어색하게 배치되었습니다. 문장을 다시 작성하시기를 권장합니다.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordReport {
    pub keyword: String,
    pub occurrences: Vec<KeywordOccurrence>,
    pub total: usize,
    pub natural: usize,
    pub natural_percentage: u32,
    pub verdict: PlacementVerdict,
}

impl KeywordReport {
    fn from_occurrences(keyword: &str, occurrences: Vec<KeywordOccurrence>) -> Self {
        let total = occurrences.len();
        let natural = occurrences.iter().filter(|o| o.is_natural).count();
        let natural_percentage = if total > 0 {
            (natural as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };

        Self {
            keyword: keyword.to_string(),
            occurrences,
            total,
            natural,
            natural_percentage,
            verdict: PlacementVerdict::from_percentage(natural_percentage),
        }
    }
}

/// Locates every literal, case-sensitive match of a keyword and grades it.
pub struct KeywordAnalyzer<N = HeuristicNaturalness> {
    markers: MarkerSet,
    checker: N,
}

impl Default for KeywordAnalyzer<HeuristicNaturalness> {
    fn default() -> Self {
        Self::new(MarkerSet::default(), HeuristicNaturalness)
    }
}

impl<N: NaturalnessChecker> KeywordAnalyzer<N> {
    pub fn new(markers: MarkerSet, checker: N) -> Self {
        Self { markers, checker }
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn analyze(&self, doc: &Document, keyword: &str) -> KeywordReport {
        if keyword.is_empty() {
            return KeywordReport::from_occurrences(keyword, Vec::new());
        }

        let mut occurrences = Vec::new();

        for paragraph in &doc.paragraphs {
            let mut natural = None;

            for (idx, _) in paragraph.content.match_indices(keyword) {
                let sequence = occurrences.len() + 1;
                // Naturalness is a paragraph-level property, compute it once
                let is_natural =
                    *natural.get_or_insert_with(|| self.checker.is_natural(&paragraph.content, keyword));

                occurrences.push(KeywordOccurrence {
                    sequence,
                    marker: self.markers.marker_for(sequence).to_string(),
                    paragraph: paragraph.number,
                    context: extract_context(&paragraph.content, idx, keyword.len()),
                    is_natural,
                });
            }
        }

        KeywordReport::from_occurrences(keyword, occurrences)
    }

    /// Copy of the document with each keyword match prefixed by its marker
    pub fn annotate(&self, doc: &Document, keyword: &str) -> Document {
        let mut annotated = doc.clone();
        if keyword.is_empty() {
            return annotated;
        }

        let mut sequence = 0;
        for paragraph in &mut annotated.paragraphs {
            let mut marked = String::with_capacity(paragraph.content.len() + 16);
            let mut last = 0;

            for (idx, matched) in paragraph.content.match_indices(keyword) {
                sequence += 1;
                marked.push_str(&paragraph.content[last..idx]);
                marked.push_str(self.markers.marker_for(sequence));
                marked.push_str(matched);
                last = idx + matched.len();
            }
            marked.push_str(&paragraph.content[last..]);
            paragraph.content = marked;
        }

        annotated
    }
}

/// Number of non-overlapping keyword matches across all paragraphs
pub fn count_occurrences(doc: &Document, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    doc.paragraphs
        .iter()
        .map(|p: &Paragraph| p.content.matches(keyword).count())
        .sum()
}

/// Up to `CONTEXT_WINDOW_CHARS` on either side of the match, trimmed
fn extract_context(text: &str, start: usize, len: usize) -> String {
    let end = start + len;

    let before_start = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_WINDOW_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let after_end = text[end..]
        .char_indices()
        .nth(CONTEXT_WINDOW_CHARS)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    text[before_start..after_end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use segment::TitleSource;

    fn doc(paragraphs: &[&str]) -> Document {
        Document::new(
            "제목".to_string(),
            TitleSource::Marker,
            paragraphs.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[test]
    fn test_five_occurrences_in_distinct_paragraphs() {
        let d = doc(&[
            "1. 출장 첫날 호치민공항에 도착했어요.",
            "2. 라운지가 조용했죠.",
            "3. 호치민시내로 이동했습니다.",
            "4. 객실은 넓었어요.",
            "5. 루프탑에서 호치민야경을 봤죠.",
            "6. 조식은 다양했어요.",
            "7. 바에서 호치민의 밤을 즐겼어요.",
            "8. 마지막 날 호치민을 떠났습니다.",
        ]);
        let report = KeywordAnalyzer::default().analyze(&d, "호치민");

        assert_eq!(report.total, 5);
        let markers: Vec<_> = report.occurrences.iter().map(|o| o.marker.as_str()).collect();
        assert_eq!(markers, vec!["①", "②", "③", "④", "⑤"]);
        let sequences: Vec<_> = report.occurrences.iter().map(|o| o.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
        let paragraphs: Vec<_> = report.occurrences.iter().map(|o| o.paragraph).collect();
        assert_eq!(paragraphs, vec![1, 3, 5, 7, 8]);
    }

    #[test]
    fn test_markers_cap_at_last() {
        let d = doc(&["호치민 호치민 호치민", "호치민 호치민 호치민 호치민"]);
        let report = KeywordAnalyzer::default().analyze(&d, "호치민");

        assert_eq!(report.total, 7);
        assert_eq!(report.occurrences[4].marker, "⑤");
        assert_eq!(report.occurrences[5].marker, "⑤");
        assert_eq!(report.occurrences[6].marker, "⑤");
        assert_eq!(report.occurrences[6].sequence, 7);
    }

    #[test]
    fn test_six_marker_variant() {
        let d = doc(&["a k", "b k", "c k", "d k", "e k", "f k"]);
        let analyzer = KeywordAnalyzer::new(MarkerSet::six(), HeuristicNaturalness);
        let report = analyzer.analyze(&d, "k");

        assert_eq!(report.occurrences[5].marker, "⑥");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let d = doc(&["Saigon and saigon and SAIGON"]);
        let report = KeywordAnalyzer::default().analyze(&d, "Saigon");

        assert_eq!(report.total, 1);
    }

    #[test]
    fn test_context_window_is_clipped() {
        let before = "가".repeat(40);
        let after = "나".repeat(40);
        let text = format!("{}호치민{}", before, after);
        let d = doc(&[text.as_str()]);
        let report = KeywordAnalyzer::default().analyze(&d, "호치민");

        let expected = format!("{}호치민{}", "가".repeat(30), "나".repeat(30));
        assert_eq!(report.occurrences[0].context, expected);
    }

    #[test]
    fn test_context_near_paragraph_edges() {
        let d = doc(&["  호치민 도착  "]);
        let report = KeywordAnalyzer::default().analyze(&d, "호치민");

        assert_eq!(report.occurrences[0].context, "호치민 도착");
    }

    #[test]
    fn test_natural_percentage_and_verdict() {
        let d = doc(&[
            "공항에서 호치민여행이 시작됐어요.",
            "호치민 그리고 끝",
            "호텔에서 호치민시내를 걸었습니다.",
        ]);
        let report = KeywordAnalyzer::default().analyze(&d, "호치민");

        assert_eq!(report.total, 3);
        assert_eq!(report.natural, 2);
        assert_eq!(report.natural_percentage, 67);
        assert_eq!(report.verdict, PlacementVerdict::Fair);
    }

    #[test]
    fn test_no_occurrences() {
        let report = KeywordAnalyzer::default().analyze(&doc(&["아무것도 없어요."]), "호치민");

        assert_eq!(report.total, 0);
        assert_eq!(report.natural_percentage, 0);
        assert_eq!(report.verdict, PlacementVerdict::NeedsWork);
    }

    #[test]
    fn test_empty_keyword() {
        let d = doc(&["문단"]);
        let analyzer = KeywordAnalyzer::default();

        assert_eq!(analyzer.analyze(&d, "").total, 0);
        assert_eq!(count_occurrences(&d, ""), 0);
        assert_eq!(analyzer.annotate(&d, ""), d);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let d = doc(&["공항에서 호치민여행이 시작됐어요.", "호치민"]);
        let analyzer = KeywordAnalyzer::default();

        assert_eq!(analyzer.analyze(&d, "호치민"), analyzer.analyze(&d, "호치민"));
    }

    #[test]
    fn test_annotate_numbers_across_paragraphs() {
        let d = doc(&["호치민 도착", "다시 호치민, 또 호치민"]);
        let annotated = KeywordAnalyzer::default().annotate(&d, "호치민");

        assert_eq!(annotated.paragraphs[0].content, "①호치민 도착");
        assert_eq!(annotated.paragraphs[1].content, "다시 ②호치민, 또 ③호치민");
        assert_eq!(annotated.title, d.title);
    }

    #[test]
    fn test_count_occurrences() {
        let d = doc(&["호치민 호치민", "호치", "호치민"]);
        assert_eq!(count_occurrences(&d, "호치민"), 3);
    }

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(PlacementVerdict::from_percentage(100), PlacementVerdict::Perfect);
        assert_eq!(PlacementVerdict::from_percentage(80), PlacementVerdict::VeryGood);
        assert_eq!(PlacementVerdict::from_percentage(79), PlacementVerdict::Fair);
        assert_eq!(PlacementVerdict::from_percentage(50), PlacementVerdict::Fair);
        assert_eq!(PlacementVerdict::from_percentage(49), PlacementVerdict::NeedsWork);
    }
}
