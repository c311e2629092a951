use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content used for a freshly added paragraph before the user edits it.
pub const PLACEHOLDER_PARAGRAPH: &str = "새로운 문단을 입력하세요.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Positional ordinal, always 1..N within a document
    pub number: usize,
    pub content: String,
}

impl Paragraph {
    pub fn new(number: usize, content: impl Into<String>) -> Self {
        Self {
            number,
            content: content.into(),
        }
    }

    /// Character count including whitespace
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Character count with every whitespace character removed
    pub fn char_count_without_spaces(&self) -> usize {
        self.content.chars().filter(|c| !c.is_whitespace()).count()
    }
}

/// How the title of a document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TitleSource {
    /// First line carried the title marker
    Marker,
    /// First line was short and unnumbered
    ShortLine,
    /// Nothing usable, fallback constant
    Default,
}

impl TitleSource {
    /// Whether the title consumed a line of the raw text
    pub fn consumed_line(&self) -> bool {
        !matches!(self, TitleSource::Default)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    #[serde(default = "default_title_source")]
    pub title_source: TitleSource,
    pub paragraphs: Vec<Paragraph>,
}

fn default_title_source() -> TitleSource {
    TitleSource::Default
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("paragraph {number} not found (document has {len} paragraphs)")]
    ParagraphNotFound { number: usize, len: usize },

    #[error("paragraph content must not be empty")]
    EmptyContent,
}

impl Document {
    pub fn new(title: String, title_source: TitleSource, contents: Vec<String>) -> Self {
        let paragraphs = contents
            .into_iter()
            .enumerate()
            .map(|(idx, content)| Paragraph::new(idx + 1, content))
            .collect();

        Self {
            title,
            title_source,
            paragraphs,
        }
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn paragraph(&self, number: usize) -> Option<&Paragraph> {
        number
            .checked_sub(1)
            .and_then(|idx| self.paragraphs.get(idx))
    }

    /// Paragraph bodies joined by blank lines, without the title
    pub fn body_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), EditError> {
        let title = clean_content(title)?;
        self.title = title;
        self.title_source = TitleSource::Marker;
        Ok(())
    }

    pub fn update_paragraph(&mut self, number: usize, content: &str) -> Result<(), EditError> {
        let content = clean_content(content)?;
        let idx = self.index_of(number)?;
        self.paragraphs[idx].content = content;
        Ok(())
    }

    pub fn delete_paragraph(&mut self, number: usize) -> Result<Paragraph, EditError> {
        let idx = self.index_of(number)?;
        let removed = self.paragraphs.remove(idx);
        self.renumber();
        Ok(removed)
    }

    /// Append a paragraph at the end and return its ordinal
    pub fn append_paragraph(&mut self, content: &str) -> Result<usize, EditError> {
        let content = clean_content(content)?;
        let number = self.paragraphs.len() + 1;
        self.paragraphs.push(Paragraph::new(number, content));
        Ok(number)
    }

    pub fn append_placeholder(&mut self) -> usize {
        let number = self.paragraphs.len() + 1;
        self.paragraphs
            .push(Paragraph::new(number, PLACEHOLDER_PARAGRAPH));
        number
    }

    /// Move paragraph `from` so that it ends up at position `to`
    pub fn move_paragraph(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        if from_idx == to_idx {
            return Ok(());
        }

        let paragraph = self.paragraphs.remove(from_idx);
        self.paragraphs.insert(to_idx, paragraph);
        self.renumber();
        Ok(())
    }

    /// Restore the 1..N ordinal invariant, e.g. after a client sent an edited document
    pub fn renumber(&mut self) {
        for (idx, paragraph) in self.paragraphs.iter_mut().enumerate() {
            paragraph.number = idx + 1;
        }
    }

    /// Drop paragraphs that became blank and renumber
    pub fn normalize(&mut self) {
        self.paragraphs.retain(|p| !p.content.trim().is_empty());
        for paragraph in &mut self.paragraphs {
            let trimmed = paragraph.content.trim();
            if trimmed.len() != paragraph.content.len() {
                paragraph.content = trimmed.to_string();
            }
        }
        self.renumber();
    }

    fn index_of(&self, number: usize) -> Result<usize, EditError> {
        if number == 0 || number > self.paragraphs.len() {
            return Err(EditError::ParagraphNotFound {
                number,
                len: self.paragraphs.len(),
            });
        }
        Ok(number - 1)
    }
}

fn clean_content(content: &str) -> Result<String, EditError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(EditError::EmptyContent);
    }
    Ok(trimmed.to_string())
}
