//! Derived properties of an input text

/// Word count and case-folded copy of a title or abstract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStats {
    /// Number of whitespace-delimited tokens
    pub word_count: usize,
    /// Lowercased text for keyword checks
    pub lowercase: String,
}

impl TextStats {
    pub fn new(text: &str) -> Self {
        Self {
            word_count: word_count(text),
            lowercase: text.to_lowercase(),
        }
    }
}

/// Count whitespace-delimited tokens. Runs of separators count as one.
///
/// Separators are Unicode whitespace plus the ASCII information separators
/// U+001C..=U+001F.
pub fn word_count(text: &str) -> usize {
    text.split(is_separator).filter(|w| !w.is_empty()).count()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}
