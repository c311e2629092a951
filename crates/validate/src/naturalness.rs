use once_cell::sync::Lazy;
use regex::Regex;

/// Best-effort grammar sanity check for a keyword placed in a paragraph.
///
/// Implementations are heuristics, not parsers; callers treat the result as
/// a hint for manual review.
pub trait NaturalnessChecker: Send + Sync {
    fn is_natural(&self, paragraph: &str, keyword: &str) -> bool;
}

/// Hangul followed by a final verb ending (다, 요, 죠, 예, 습니다 ...)
static FINAL_ENDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[가-힣]+[다요죠예습니]+$").unwrap());

/// Hangul followed by a subject/object/adverbial particle
static PARTICLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[가-힣]+[이가을를에게서로부터]").unwrap());

const TRAILING_PUNCTUATION: &[char] = &['.', '!', '?', '…', '"', '\'', '”', '’', ')', '~'];

/// Fixed-pattern checker for Korean prose.
///
/// A paragraph is natural when it ends in a verb ending, contains a
/// particle, and the keyword is attached to surrounding word characters on
/// at least one side.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicNaturalness;

impl HeuristicNaturalness {
    pub fn new() -> Self {
        Self
    }

    fn ends_with_verb_ending(paragraph: &str) -> bool {
        let stripped = paragraph
            .trim_end()
            .trim_end_matches(|c: char| c.is_whitespace() || TRAILING_PUNCTUATION.contains(&c));
        FINAL_ENDING.is_match(stripped)
    }

    fn has_particle(paragraph: &str) -> bool {
        PARTICLE.is_match(paragraph)
    }

    fn keyword_is_attached(paragraph: &str, keyword: &str) -> bool {
        paragraph.match_indices(keyword).any(|(idx, _)| {
            let before = paragraph[..idx].chars().next_back();
            let after = paragraph[idx + keyword.len()..].chars().next();
            before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric)
        })
    }
}

impl NaturalnessChecker for HeuristicNaturalness {
    fn is_natural(&self, paragraph: &str, keyword: &str) -> bool {
        if keyword.is_empty() {
            return false;
        }

        Self::ends_with_verb_ending(paragraph)
            && Self::has_particle(paragraph)
            && Self::keyword_is_attached(paragraph, keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_sentence() {
        let checker = HeuristicNaturalness::new();
        let paragraph = "공항에서 내려 호치민여행이 시작됐어요.";

        assert!(checker.is_natural(paragraph, "호치민"));
    }

    #[test]
    fn test_trailing_quote_and_period_are_ignored() {
        let checker = HeuristicNaturalness::new();
        let paragraph = "창밖으로 호치민의 밤이 보였죠.\"";

        assert!(checker.is_natural(paragraph, "호치민"));
    }

    #[test]
    fn test_isolated_keyword_is_not_natural() {
        let checker = HeuristicNaturalness::new();
        let paragraph = "공항에서 내려 호치민 여행이 시작됐어요.";

        assert!(!checker.is_natural(paragraph, "호치민"));
    }

    #[test]
    fn test_missing_verb_ending() {
        let checker = HeuristicNaturalness::new();
        let paragraph = "공항에서 만난 호치민의 풍경";

        assert!(!checker.is_natural(paragraph, "호치민"));
    }

    #[test]
    fn test_missing_particle() {
        let checker = HeuristicNaturalness::new();

        assert!(!checker.is_natural("호치민출장 좋다", "호치민"));
    }

    #[test]
    fn test_keyword_absent_or_empty() {
        let checker = HeuristicNaturalness::new();

        assert!(!checker.is_natural("공항에서 내려 여행이 시작됐어요.", "호치민"));
        assert!(!checker.is_natural("공항에서 내려 여행이 시작됐어요.", ""));
    }

    #[test]
    fn test_checker_is_object_safe() {
        let checker: Box<dyn NaturalnessChecker> = Box::new(HeuristicNaturalness);
        assert!(checker.is_natural("호텔에서 호치민시내를 걸었습니다", "호치민"));
    }
}
