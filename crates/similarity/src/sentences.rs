use once_cell::sync::Lazy;
use regex::Regex;

/// Sentences sent to the similarity scorer per document
pub const MAX_KEYWORD_SENTENCES: usize = 5;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Sentences that contain `keyword`, in text order, at most five.
pub fn extract_keyword_sentences(text: &str, keyword: &str) -> Vec<String> {
    if keyword.is_empty() {
        return Vec::new();
    }

    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.contains(keyword))
        .take(MAX_KEYWORD_SENTENCES)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_at_five_sentences() {
        let text = (1..=6)
            .map(|i| format!("{}번째 호치민 문장입니다", i))
            .collect::<Vec<_>>()
            .join(". ");
        let sentences = extract_keyword_sentences(&text, "호치민");

        assert_eq!(sentences.len(), 5);
        assert_eq!(sentences[0], "1번째 호치민 문장입니다");
        assert_eq!(sentences[4], "5번째 호치민 문장입니다");
    }

    #[test]
    fn test_splits_on_repeated_terminators() {
        let text = "호치민은 더웠어요!!! 정말요?? 호치민 커피가 좋았죠... 끝";
        let sentences = extract_keyword_sentences(text, "호치민");

        assert_eq!(sentences, vec!["호치민은 더웠어요", "호치민 커피가 좋았죠"]);
    }

    #[test]
    fn test_numbering_periods_also_split() {
        let text = "1. 공항에 도착했어요\n2. 호치민\n시내가 보였죠. 끝";
        let sentences = extract_keyword_sentences(text, "호치민");

        assert_eq!(sentences, vec!["호치민\n시내가 보였죠"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(extract_keyword_sentences("", "호치민").is_empty());
        assert!(extract_keyword_sentences("문장. 문장.", "").is_empty());
    }
}
