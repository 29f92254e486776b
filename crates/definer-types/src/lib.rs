//! Dictionary entry types recovered from a "define <word>" results page.
//!
//! Every field is a plain owned string or vector. Missing data is represented
//! by an empty value rather than `Option`, which keeps the JSON shape stable
//! for clients: a field that the page did not render is `""` or `[]`.
//!
//! [`WordEntry::is_found`] is the single not-found signal. An entry whose
//! headword is empty carries no usable data, whatever else it holds.
//!
//! ```rust
//! use definer_types::{DefinitionEntry, PartOfSpeechEntry, WordEntry};
//!
//! let entry = WordEntry {
//!     headword: "run".into(),
//!     parts_of_speech: vec![PartOfSpeechEntry {
//!         label: "verb".into(),
//!         definitions: vec![DefinitionEntry::new("move swiftly on foot")],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//! assert!(entry.is_found());
//! assert_eq!(entry.definition_count(), 1);
//! ```

use serde::Serialize;

/// Root record for one looked-up word.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WordEntry {
    /// The word as rendered on the page. Empty means nothing was found.
    #[serde(rename = "word")]
    pub headword: String,
    #[serde(rename = "audio")]
    pub audio_url: String,
    pub phonetic: String,
    /// Groups in document order.
    #[serde(rename = "parts_of_speeches")]
    pub parts_of_speech: Vec<PartOfSpeechEntry>,
}

impl WordEntry {
    /// `false` when the headword is empty, which callers treat as "not found".
    pub fn is_found(&self) -> bool {
        !self.headword.is_empty()
    }

    /// Total number of definitions across every part of speech.
    pub fn definition_count(&self) -> usize {
        self.parts_of_speech
            .iter()
            .map(|pos| pos.definitions.len())
            .sum()
    }
}

/// One grammatical category and the senses listed under it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PartOfSpeechEntry {
    /// Category label exactly as rendered (no canonicalization).
    #[serde(rename = "parts_of_speech")]
    pub label: String,
    pub phonetic: String,
    #[serde(rename = "audio")]
    pub audio_url: String,
    pub definitions: Vec<DefinitionEntry>,
}

/// A single sense. Only built when the gloss text is non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DefinitionEntry {
    #[serde(rename = "definition")]
    pub text: String,
    pub example: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

impl DefinitionEntry {
    /// Gloss-only entry; example and word lists start empty.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}
