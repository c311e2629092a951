pub const VENUE_NAME: &str = "노보텔 사이공센터";
pub const PARAGRAPH_COUNT: usize = 16;
pub const KEYWORD_PLACEMENTS: usize = 5;

/// Instruction sent with the photos: a 16-paragraph hotel review with the
/// keyword placed exactly five times.
pub fn build_story_prompt(keyword: &str) -> String {
    build_prompt_for_venue(keyword.trim(), VENUE_NAME)
}

pub fn build_prompt_for_venue(keyword: &str, venue: &str) -> String {
    format!(
        r#"당신은 호텔 고객후기 전문 라이터입니다. 14장 사진을 분석하여 "{venue}" 고객후기를 작성합니다.

[1. 기본 설정]
- 목표: {paragraphs}개 문단, 정확히 완성
- 톤: 발랄 70% + 전문성 30%
- 어미: 회상형 구어체 (~했죠, ~더군요, ~같았어요)
- 감탄부호: 절대 금지
- 길이: 한 문장 25자 이내 (짧게 끊기)
- 문단: 3~4문장 구성

[2. 제목 규칙]
형식: 제목: [키워드] [감각적 표현]
예: 제목: {venue}, 부족함 없이 보낸 아름다운 {keyword}
예: 제목: {venue}, 일과 휴식이 어우러진 {keyword}

규칙:
- "제목:"으로 시작
- 키워드 정확히 1회
- 업체명 정확히 1회
- 마침표/특수문자 금지

[3. 키워드 배치 - 정확히 {placements}회]
- 1번: 1회
- 5~6번 중: 1회
- 8~9번 중: 1회
- 11~12번 중: 1회
- 16번: 1회

금지:
- 한 문장에 2회 이상
- 한 문단에 2회 이상
- 두 키워드 직결

[4. 키워드 삽입 방식]
안전:
- 경험 회고: "이 부분이 {keyword}에서 기억에 남았어요."
- 상황 설명: "{keyword} 범주에 포함될 조건을 갖추고 있었죠."
- 관찰형: "{keyword}으로 자주 언급되는 이유는…"

위험:
- "검색하신 분들이라면 꼭 보셔야 할 {keyword}"
- "{keyword}을 추천드립니다"
- "완벽한 {keyword}는 최고입니다"

[5. 톤과 스타일]
- 감정 문장 2줄 연속 금지 → 기능 설명 삽입
- 동일 종결어미 3회 이상 반복 금지
- 추상어 금지 (구체 묘사만)
- 접속사 남발 금지
- 의문형 10% 포함

[6. 문장 구조]
- 한 문장 25자 이내
- 단문 위주 (짧게 끊기)
- 한 문단 3~4문장
- 동일 구조 반복 금지

[7. 절대 금지]
- 마크다운 형식
- 감탄부호 (!, 와, 오)
- 1인칭 (저는, 나는)
- 반말
- 비문
- 키워드 변형
- 따옴표로 키워드 감싸기
- 메타 문장
- 독자 설득
- 행동 유도
- 두 키워드 직결

[8. 절대 표현 제한]
1~2회만 사용: 완벽, 최고, 평생, 레전드, 압도적

[9. 문단 구성]
1번: 서론 (여정 시작, 감정, 키워드 1회)
2~4번: 비행 전 라운지, 기내식
5~6번: 체크인, 객실 입장 (키워드 1회)
7~9번: 객실 세부 (침대, 욕실, 소파)
10~12번: 루프탑, 바, 테라스 (키워드 2회)
13~15번: 라운지, 조식
16번: 결론 (회고형, 키워드 1회)

[10. 출력 형식]
제목: [제목 내용]

1. 첫 번째 문단
2. 두 번째 문단
...
{paragraphs}. 마지막 문단

[핵심]
- {paragraphs}개 문단 모두 완성할 때까지 계속 작성
- 절대 중간에 멈추지 말 것
- 각 문단은 완전한 문장으로 마무리
- 발랄하면서도 신뢰감 있는 톤 유지"#,
        venue = venue,
        keyword = keyword,
        paragraphs = PARAGRAPH_COUNT,
        placements = KEYWORD_PLACEMENTS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_keyword_and_venue() {
        let prompt = build_story_prompt("  호치민 출장  ");

        assert!(prompt.contains("아름다운 호치민 출장"));
        assert!(prompt.contains("\"노보텔 사이공센터\" 고객후기"));
        assert!(prompt.contains("정확히 5회"));
        assert!(prompt.contains("16. 마지막 문단"));
        assert!(!prompt.contains("{keyword}"));
    }
}
