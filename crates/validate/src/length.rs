use segment::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStats {
    pub number: usize,
    pub chars: usize,
    pub chars_without_spaces: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStats {
    pub total_chars: usize,
    pub total_chars_without_spaces: usize,
    pub paragraph_count: usize,
    pub paragraph_stats: Vec<ParagraphStats>,
}

/// Character counts for the whole body and each paragraph.
///
/// `total_chars` counts the paragraphs joined by blank lines, the same text
/// a reader copies out of the editor.
pub fn calculate_stats(doc: &Document) -> WordStats {
    let paragraph_stats: Vec<ParagraphStats> = doc
        .paragraphs
        .iter()
        .map(|p| ParagraphStats {
            number: p.number,
            chars: p.char_count(),
            chars_without_spaces: p.char_count_without_spaces(),
        })
        .collect();

    let separators = doc.paragraphs.len().saturating_sub(1) * 2;
    let total_chars = paragraph_stats.iter().map(|s| s.chars).sum::<usize>() + separators;
    let total_chars_without_spaces = paragraph_stats
        .iter()
        .map(|s| s.chars_without_spaces)
        .sum();

    WordStats {
        total_chars,
        total_chars_without_spaces,
        paragraph_count: paragraph_stats.len(),
        paragraph_stats,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthThresholds {
    pub introduction_min: usize,
    pub body_paragraph_min: usize,
    pub conclusion_min: usize,
    pub total_min: usize,
}

impl Default for LengthThresholds {
    fn default() -> Self {
        Self {
            introduction_min: 250,
            body_paragraph_min: 150,
            conclusion_min: 250,
            total_min: 2900,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCheck {
    pub chars: usize,
    pub passed: bool,
    pub required: usize,
}

impl SectionCheck {
    fn new(chars: usize, required: usize) -> Self {
        Self {
            chars,
            passed: chars >= required,
            required,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyCheck {
    pub avg_chars: usize,
    pub min_chars: usize,
    pub passed: bool,
    pub required: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthReport {
    pub introduction: SectionCheck,
    pub body: BodyCheck,
    pub conclusion: SectionCheck,
    pub total: SectionCheck,
    pub all_passed: bool,
}

/// Checks section lengths (whitespace excluded) against fixed minimums.
///
/// The first paragraph is the introduction, the last is the conclusion and
/// everything strictly between is body.
#[derive(Debug, Clone, Default)]
pub struct LengthAnalyzer {
    thresholds: LengthThresholds,
}

impl LengthAnalyzer {
    pub fn new(thresholds: LengthThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &LengthThresholds {
        &self.thresholds
    }

    pub fn analyze(&self, doc: &Document) -> LengthReport {
        let stats = calculate_stats(doc);
        let counts: Vec<usize> = stats
            .paragraph_stats
            .iter()
            .map(|s| s.chars_without_spaces)
            .collect();

        let intro_chars = counts.first().copied().unwrap_or(0);
        let conclusion_chars = counts.last().copied().unwrap_or(0);
        let body = if counts.len() > 2 {
            &counts[1..counts.len() - 1]
        } else {
            &[][..]
        };

        // An empty body reports zero and fails, the document is missing its middle
        let body_min = body.iter().copied().min().unwrap_or(0);
        let body_avg = if body.is_empty() {
            0
        } else {
            let sum: usize = body.iter().sum();
            (sum as f64 / body.len() as f64).round() as usize
        };

        let introduction = SectionCheck::new(intro_chars, self.thresholds.introduction_min);
        let conclusion = SectionCheck::new(conclusion_chars, self.thresholds.conclusion_min);
        let total = SectionCheck::new(
            stats.total_chars_without_spaces,
            self.thresholds.total_min,
        );
        let body = BodyCheck {
            avg_chars: body_avg,
            min_chars: body_min,
            passed: body_min >= self.thresholds.body_paragraph_min,
            required: self.thresholds.body_paragraph_min,
        };

        LengthReport {
            all_passed: introduction.passed && body.passed && conclusion.passed && total.passed,
            introduction,
            body,
            conclusion,
            total,
        }
    }
}
