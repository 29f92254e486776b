//! Synonym/antonym partitioning of a flat word list.
//!
//! The page renders related words as one run of sibling nodes, with
//! `Similar:` and `Opposite:` label nodes switching the meaning of whatever
//! follows. [`Classifier`] walks that run with an explicit [`Section`] state.

use scraper::ElementRef;

use crate::layout::{self, WORD_LIST};

pub const SIMILAR_LABEL: &str = "Similar:";
pub const OPPOSITE_LABEL: &str = "Opposite:";
/// Stray single-letter node the markup emits inside word lists.
pub const STRAY_TOKEN: &str = "h";
/// Inline style of the greyed-out input slots mixed into word lists.
pub const PLACEHOLDER_STYLE: &str = "cursor:text";

/// Which output list words are currently appended to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Section {
    /// Words before any label land here as well. This mirrors pages that
    /// always open with `Similar:`; antonym-first pages have not been seen.
    #[default]
    Synonyms,
    Antonyms,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RelatedWords {
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Classifier {
    section: Section,
    words: RelatedWords,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Feed one list node's text. Labels switch the section even when the
    /// node is a placeholder; placeholders never produce output.
    pub fn push(&mut self, text: &str, placeholder: bool) {
        match text.trim() {
            SIMILAR_LABEL => self.section = Section::Synonyms,
            OPPOSITE_LABEL => self.section = Section::Antonyms,
            "" | STRAY_TOKEN => {}
            _ if placeholder => {}
            word => {
                let target = match self.section {
                    Section::Synonyms => &mut self.words.synonyms,
                    Section::Antonyms => &mut self.words.antonyms,
                };
                target.push(word.to_string());
            }
        }
    }

    pub fn finish(self) -> RelatedWords {
        self.words
    }
}

/// Classify `(text, placeholder)` pairs in order.
pub fn classify<'a, I>(items: I) -> RelatedWords
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    let mut classifier = Classifier::new();
    for (text, placeholder) in items {
        classifier.push(text, placeholder);
    }
    classifier.finish()
}

/// Run a fresh classifier over every word list inside `scope`.
pub(crate) fn related_words(scope: ElementRef<'_>) -> RelatedWords {
    let mut classifier = Classifier::new();
    for list in scope.select(&WORD_LIST) {
        for node in list.child_elements() {
            let text = layout::text_of(node);
            classifier.push(&text, is_placeholder(node));
        }
    }
    classifier.finish()
}

fn is_placeholder(node: ElementRef<'_>) -> bool {
    node.child_elements()
        .next()
        .and_then(|first| first.value().attr("style"))
        == Some(PLACEHOLDER_STYLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn plain(words: &[&'static str]) -> Vec<(&'static str, bool)> {
        words.iter().map(|w| (*w, false)).collect()
    }

    #[test]
    fn leading_words_default_to_synonyms() {
        let out = classify(plain(&["foo", "Similar:", "bar", "baz", "Opposite:", "qux"]));
        assert_eq!(out.synonyms, vec!["foo", "bar", "baz"]);
        assert_eq!(out.antonyms, vec!["qux"]);
    }

    #[test]
    fn placeholders_are_dropped_in_both_sections() {
        let out = classify(vec![
            ("Similar:", false),
            ("ghost", true),
            ("bar", false),
            ("Opposite:", false),
            ("phantom", true),
            ("qux", false),
        ]);
        assert_eq!(out.synonyms, vec!["bar"]);
        assert_eq!(out.antonyms, vec!["qux"]);
    }

    #[test]
    fn stray_h_and_blank_nodes_are_skipped() {
        let out = classify(plain(&["h", "Similar:", " h ", "fast", "  ", "Opposite:", "h", "slow"]));
        assert_eq!(out.synonyms, vec!["fast"]);
        assert_eq!(out.antonyms, vec!["slow"]);
    }

    #[test]
    fn labels_switch_back_and_forth() {
        let mut classifier = Classifier::new();
        assert_eq!(classifier.section(), Section::Synonyms);
        classifier.push("Opposite:", false);
        assert_eq!(classifier.section(), Section::Antonyms);
        classifier.push("slow", false);
        classifier.push("  Similar:\n", true);
        assert_eq!(classifier.section(), Section::Synonyms);
        classifier.push("fast", false);
        let out = classifier.finish();
        assert_eq!(out.synonyms, vec!["fast"]);
        assert_eq!(out.antonyms, vec!["slow"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let out = classify(plain(&["quick", "quick"]));
        assert_eq!(out.synonyms, vec!["quick", "quick"]);
    }

    #[test]
    fn reads_word_lists_from_markup() {
        let doc = Html::parse_document(
            r#"<div id="scope"><div role="list">
                <div><span>h</span></div>
                <div><span>Similar:</span></div>
                <div><span>dash</span></div>
                <div><span style="cursor:text">scurry</span></div>
                <div><span>Opposite:</span></div>
                <div><span> stroll </span></div>
            </div></div>"#,
        );
        let scope = doc
            .select(&scraper::Selector::parse("#scope").unwrap())
            .next()
            .unwrap();
        let out = related_words(scope);
        assert_eq!(out.synonyms, vec!["dash"]);
        assert_eq!(out.antonyms, vec!["stroll"]);
    }
}
