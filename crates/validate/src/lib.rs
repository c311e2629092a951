pub mod keyword;
pub mod length;
pub mod naturalness;

pub use keyword::{
    count_occurrences, KeywordAnalyzer, KeywordOccurrence, KeywordReport, MarkerSet,
    PlacementVerdict,
};
pub use length::{
    calculate_stats, BodyCheck, LengthAnalyzer, LengthReport, LengthThresholds, SectionCheck,
    WordStats,
};
pub use naturalness::{HeuristicNaturalness, NaturalnessChecker};

use segment::Document;
use serde::Serialize;

/// Everything the editor shows for one document/keyword pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub stats: WordStats,
    pub length: LengthReport,
    pub keywords: KeywordReport,
}

/// Runs the length and keyword analyzers over the same document.
///
/// Stateless; call it again after every edit.
pub struct Validator<N = HeuristicNaturalness> {
    length: LengthAnalyzer,
    keyword: KeywordAnalyzer<N>,
}

impl Default for Validator<HeuristicNaturalness> {
    fn default() -> Self {
        Self::new(LengthAnalyzer::default(), KeywordAnalyzer::default())
    }
}

impl<N: NaturalnessChecker> Validator<N> {
    pub fn new(length: LengthAnalyzer, keyword: KeywordAnalyzer<N>) -> Self {
        Self { length, keyword }
    }

    pub fn validate(&self, doc: &Document, keyword: &str) -> ValidationReport {
        ValidationReport {
            stats: calculate_stats(doc),
            length: self.length.analyze(doc),
            keywords: self.keyword.analyze(doc, keyword),
        }
    }

    pub fn keyword_analyzer(&self) -> &KeywordAnalyzer<N> {
        &self.keyword
    }
}
