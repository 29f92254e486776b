//! Dictionary entry extraction from a "define <word>" results page.
//!
//! The input is a parsed page ([`scraper::Html`]); the output is a
//! [`WordEntry`]. Extraction never fails: any part of the layout that cannot
//! be found yields empty fields, and an empty headword is the only
//! "not found" signal callers need to check.
//!
//! The walk is fixed:
//!
//! 1. locate the definition slot ([`layout::definition_slot`]),
//! 2. read the headword, its phonetic spelling and audio from the slot header,
//! 3. enumerate part-of-speech groups and the senses listed under each,
//! 4. classify each sense's related words ([`classify::Classifier`]).
//!
//! `scraper::Html` is `!Send`. Parse and extract in one synchronous step
//! (see [`extract_html`]) rather than holding a document across an `.await`.
//!
//! ```rust
//! let entry = definer_extract::extract_html("<html><body>no panel</body></html>");
//! assert!(!entry.is_found());
//! assert!(entry.parts_of_speech.is_empty());
//! ```

pub mod classify;
mod definition;
pub mod layout;

use scraper::{ElementRef, Html};
use tracing::debug;

pub use classify::{Classifier, RelatedWords, Section, classify};
pub use definer_types::{DefinitionEntry, PartOfSpeechEntry, WordEntry};
pub use definition::strip_quotes;

use crate::layout::{HEADWORD, PHONETIC, POS_GROUP, POS_LABEL, SENSE_ITEM};

/// Parse `html` and extract the entry it describes.
pub fn extract_html(html: &str) -> WordEntry {
    let document = Html::parse_document(html);
    extract(&document)
}

/// Extract the entry from an already parsed page.
pub fn extract(document: &Html) -> WordEntry {
    let Some(slot) = layout::definition_slot(document) else {
        debug!("definition slot not found");
        return WordEntry::default();
    };

    let mut entry = WordEntry {
        headword: layout::all_text(slot, &HEADWORD),
        ..Default::default()
    };
    if let Some(header) = slot.child_elements().next() {
        entry.audio_url = layout::audio_source(header);
        entry.phonetic = layout::first_text(header, &PHONETIC);
    }
    debug!(
        headword = %entry.headword,
        phonetic = %entry.phonetic,
        audio = %entry.audio_url,
        "read headword block"
    );

    for child in slot.child_elements() {
        for group in child.select(&POS_GROUP) {
            entry.parts_of_speech.push(part_of_speech(group));
        }
    }
    debug!(
        parts_of_speech = entry.parts_of_speech.len(),
        definitions = entry.definition_count(),
        "extracted entry"
    );
    entry
}

fn part_of_speech(group: ElementRef<'_>) -> PartOfSpeechEntry {
    let mut pos = PartOfSpeechEntry {
        label: layout::first_text(group, &POS_LABEL),
        phonetic: layout::first_text(group, &PHONETIC),
        audio_url: layout::audio_source(group),
        definitions: Vec::new(),
    };
    for item in group.select(&SENSE_ITEM) {
        for sense in item.child_elements() {
            if let Some(definition) = definition::extract_definition(sense) {
                pos.definitions.push(definition);
            }
        }
    }
    pos
}
