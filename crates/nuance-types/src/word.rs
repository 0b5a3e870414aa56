use serde::{Deserialize, Serialize};

/// One explained Quranic word.
///
/// Entries are immutable once built: fields are only readable, and the saved
/// list replaces whole entries instead of editing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    arabic: String,
    transliteration: String,
    meaning: String,
    nuance: String,
    reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl WordEntry {
    pub fn new(
        arabic: impl Into<String>,
        transliteration: impl Into<String>,
        meaning: impl Into<String>,
        nuance: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            arabic: arabic.into(),
            transliteration: transliteration.into(),
            meaning: meaning.into(),
            nuance: nuance.into(),
            reference: reference.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn arabic(&self) -> &str {
        &self.arabic
    }

    pub fn transliteration(&self) -> &str {
        &self.transliteration
    }

    pub fn meaning(&self) -> &str {
        &self.meaning
    }

    pub fn nuance(&self) -> &str {
        &self.nuance
    }

    /// Human-readable citation, e.g. "সূরা আল-বাকারা ২:২"
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Bookmark identity: the `(arabic, reference)` pair, compared exactly.
    pub fn identity(&self) -> (&str, &str) {
        (&self.arabic, &self.reference)
    }

    pub fn same_word(&self, other: &WordEntry) -> bool {
        self.identity() == other.identity()
    }
}
