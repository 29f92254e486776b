//! Selectors and positional lookups for the results page layout.
//!
//! The page carries no semantic labels for the dictionary panel. Everything
//! here is keyed on obfuscated class names, data attributes and the position
//! of repeated, unlabeled blocks, so it breaks whenever the upstream markup
//! changes. Keep every such assumption in this module.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Zero-based position of the definition panel among the result card's slots.
/// The slots before it hold the header and the search box; the ones after it
/// hold translations and the usage-over-time graph.
pub const DEFINITION_SLOT: usize = 2;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("layout selectors are valid CSS")
}

pub(crate) static RESULTS: LazyLock<Selector> = LazyLock::new(|| selector("#center_col"));
pub(crate) static RESULT_CARD: LazyLock<Selector> = LazyLock::new(|| selector(".lr_container"));
pub(crate) static SLOT: LazyLock<Selector> = LazyLock::new(|| selector(r#"div[jsslot=""]"#));
pub(crate) static HEADWORD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[data-dobid="hdw"]"#));
pub(crate) static AUDIO: LazyLock<Selector> = LazyLock::new(|| selector("audio"));
pub(crate) static PHONETIC: LazyLock<Selector> = LazyLock::new(|| selector("span.LTKOO"));
pub(crate) static POS_GROUP: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[jsname="r5Nvmf"]"#));
pub(crate) static POS_LABEL: LazyLock<Selector> = LazyLock::new(|| selector("span.YrbPuc"));
pub(crate) static SENSE_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("ol > li"));
pub(crate) static GLOSS: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-dobid="dfn"]"#));
pub(crate) static WORD_LIST: LazyLock<Selector> = LazyLock::new(|| selector(r#"div[role="list"]"#));

/// Select the `n`th descendant of `scope` matching `selector`, counting in
/// document order from zero.
pub fn nth_match<'a>(scope: ElementRef<'a>, selector: &Selector, n: usize) -> Option<ElementRef<'a>> {
    scope.select(selector).nth(n)
}

/// Locate the slot holding the definition panel.
///
/// Walks `#center_col`, then its first `.lr_container`, then takes the slot at
/// [`DEFINITION_SLOT`]. Returns `None` if any step finds nothing.
pub fn definition_slot(document: &Html) -> Option<ElementRef<'_>> {
    let results = document.select(&RESULTS).next()?;
    let card = results.select(&RESULT_CARD).next()?;
    nth_match(card, &SLOT, DEFINITION_SLOT)
}

/// Concatenated text of every node under `el`, untrimmed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Concatenated text of every match of `selector` under `scope`.
pub(crate) fn all_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope.select(selector).flat_map(|el| el.text()).collect()
}

/// Text of the first match of `selector` under `scope`, or empty.
pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope.select(selector).next().map(text_of).unwrap_or_default()
}

/// `src` of the first source element nested in an `<audio>` under `scope`.
///
/// Only the first child element is consulted: when it has no `src` the result
/// is empty even if a later source carries one.
pub(crate) fn audio_source(scope: ElementRef<'_>) -> String {
    for audio in scope.select(&AUDIO) {
        if let Some(source) = audio.child_elements().next() {
            return source.value().attr("src").unwrap_or_default().to_string();
        }
    }
    String::new()
}

/// First sibling element of `el` in document order, preceding or following.
pub(crate) fn first_sibling(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let parent = el.parent().and_then(ElementRef::wrap)?;
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.id() != el.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(slots: usize) -> Html {
        let mut body = String::from(r#"<div id="center_col"><div class="lr_container">"#);
        for i in 0..slots {
            body.push_str(&format!(r#"<div jsslot=""><p>slot {i}</p></div>"#));
        }
        body.push_str("</div></div>");
        Html::parse_document(&body)
    }

    #[test]
    fn picks_third_slot() {
        let doc = page(5);
        let slot = definition_slot(&doc).expect("slot present");
        assert_eq!(text_of(slot), "slot 2");
    }

    #[test]
    fn missing_slot_is_none() {
        assert!(definition_slot(&page(2)).is_none());
        assert!(definition_slot(&Html::parse_document("<p>nothing</p>")).is_none());
    }

    #[test]
    fn nth_match_counts_in_document_order() {
        let doc = Html::parse_document("<ul><li>a</li><li>b<ul><li>c</li></ul></li><li>d</li></ul>");
        let li = selector("li");
        let root = doc.root_element();
        assert_eq!(text_of(nth_match(root, &li, 2).unwrap()), "c");
        assert_eq!(text_of(nth_match(root, &li, 3).unwrap()), "d");
        assert!(nth_match(root, &li, 4).is_none());
    }

    #[test]
    fn audio_source_reads_first_child_only() {
        let doc = Html::parse_document(
            r#"<div><audio><source><source src="late.mp3"></audio><audio><source src="other.mp3"></audio></div>"#,
        );
        assert_eq!(audio_source(doc.root_element()), "");

        let doc = Html::parse_document(r#"<div><audio><source src="a.mp3"></audio></div>"#);
        assert_eq!(audio_source(doc.root_element()), "a.mp3");
    }

    #[test]
    fn first_sibling_skips_self() {
        let doc = Html::parse_document(r#"<div><span id="a">x</span><i>y</i><b>z</b></div>"#);
        let a = doc.select(&selector("#a")).next().unwrap();
        assert_eq!(text_of(first_sibling(a).unwrap()), "y");
        let b = doc.select(&selector("b")).next().unwrap();
        assert_eq!(text_of(first_sibling(b).unwrap()), "x");
    }
}
