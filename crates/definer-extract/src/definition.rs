use scraper::ElementRef;
use tracing::trace;

use definer_types::DefinitionEntry;

use crate::classify::related_words;
use crate::layout::{self, GLOSS};

/// Build a definition from one sense node, or `None` when its gloss is empty.
pub(crate) fn extract_definition(sense: ElementRef<'_>) -> Option<DefinitionEntry> {
    let text = layout::all_text(sense, &GLOSS);
    if text.is_empty() {
        return None;
    }
    trace!(definition = %text, "found gloss");

    let example = sense
        .select(&GLOSS)
        .next()
        .and_then(layout::first_sibling)
        .map(|el| strip_quotes(&layout::text_of(el)).to_string())
        .unwrap_or_default();

    let related = related_words(sense);
    Some(DefinitionEntry {
        text,
        example,
        synonyms: related.synonyms,
        antonyms: related.antonyms,
    })
}

/// Remove one literal `"` from each end, when present.
pub fn strip_quotes(raw: &str) -> &str {
    let s = raw.strip_prefix('"').unwrap_or(raw);
    s.strip_suffix('"').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn sense(html: &str) -> Option<DefinitionEntry> {
        let doc = Html::parse_document(html);
        let li = Selector::parse("li").unwrap();
        let item = doc.select(&li).next().unwrap();
        extract_definition(item)
    }

    #[test]
    fn strips_one_quote_per_side() {
        assert_eq!(strip_quotes("\"to run quickly\""), "to run quickly");
        assert_eq!(strip_quotes("no quotes here"), "no quotes here");
        assert_eq!(strip_quotes("\"\"doubled\"\""), "\"doubled\"");
        assert_eq!(strip_quotes("\"open only"), "open only");
        assert_eq!(strip_quotes("\""), "");
    }

    #[test]
    fn empty_gloss_is_skipped() {
        assert!(sense(r#"<ol><li><div data-dobid="dfn"></div><div>"ex"</div></li></ol>"#).is_none());
        assert!(sense("<ol><li><div>no gloss</div></li></ol>").is_none());
    }

    #[test]
    fn reads_gloss_and_example() {
        let def = sense(
            r#"<ol><li><div data-dobid="dfn"><span>move fast</span></div><div>"she ran"</div></li></ol>"#,
        )
        .unwrap();
        assert_eq!(def.text, "move fast");
        assert_eq!(def.example, "she ran");
        assert!(def.synonyms.is_empty());
        assert!(def.antonyms.is_empty());
    }

    #[test]
    fn missing_sibling_leaves_example_empty() {
        let def = sense(r#"<ol><li><div><div data-dobid="dfn">alone</div></div></li></ol>"#).unwrap();
        assert_eq!(def.text, "alone");
        assert_eq!(def.example, "");
    }
}
