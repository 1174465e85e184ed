//! Suggestion fragments returned by the search endpoint.
//!
//! A fragment is a pre-rendered HTML snippet. Besides its visible text it may
//! embed a hidden element `#sparql_text_<index>` whose text content is a JSON
//! string literal: the snippet that gets inserted into the query when the
//! item is picked.

use scraper::{ElementRef, Html, Node};

use crate::error::{QuerypadError, Result};

pub const PAYLOAD_ID_PREFIX: &str = "sparql_text_";

/// Elements whose content never reaches the display text.
const HIDDEN_TAGS: &[&str] = &["script", "style", "template", "head"];

/// Elements that separate words when flattened to a single line.
const BREAKING_TAGS: &[&str] = &["br", "p", "div", "li", "td", "th", "tr", "hr"];

/// Id of the hidden payload element for the item at `index`.
pub fn payload_id(index: usize) -> String {
    format!("{PAYLOAD_ID_PREFIX}{index}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    markup: String,
    text: String,
    display: String,
}

impl Fragment {
    /// Parse a markup fragment and flatten its visible text.
    pub fn parse(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let text = visible_text(&markup);
        Self {
            display: text.clone(),
            markup,
            text,
        }
    }

    /// Raw markup as received from the server.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Visible text with tags and hidden payloads stripped.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text shown in the list; `text` after typesetting.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn set_display(&mut self, display: String) {
        self.display = display;
    }

    /// Decode the snippet stored in `#sparql_text_<index>`.
    pub fn payload(&self, index: usize) -> Result<String> {
        let id = payload_id(index);
        let html = Html::parse_fragment(&self.markup);

        let element = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(id.as_str()))
            .ok_or_else(|| QuerypadError::PayloadNotFound(id.clone()))?;

        let raw: String = element.text().collect();
        serde_json::from_str::<String>(raw.trim()).map_err(|e| QuerypadError::MalformedPayload {
            id,
            reason: e.to_string(),
        })
    }
}

fn is_hidden(el: &ElementRef<'_>) -> bool {
    let value = el.value();
    HIDDEN_TAGS.contains(&value.name())
        || value.attr("hidden").is_some()
        || value.id().is_some_and(|id| id.starts_with(PAYLOAD_ID_PREFIX))
        || value
            .attr("style")
            .is_some_and(|s| s.replace(' ', "").contains("display:none"))
}

fn visible_text(markup: &str) -> String {
    let html = Html::parse_fragment(markup);
    let mut raw = String::new();

    for node in html.root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|el| is_hidden(&el));
                if !hidden {
                    raw.push_str(text);
                }
            }
            Node::Element(el) if BREAKING_TAGS.contains(&el.name()) => raw.push(' '),
            _ => {}
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM: &str = r#"<a href="/e/R15">R15["is subclass of"]</a> <small>(relation)</small>
<script id="sparql_text_3" type="application/json">":R15[\"is subclass of\"]"</script>"#;

    #[test]
    fn test_visible_text_strips_tags_and_payload() {
        let frag = Fragment::parse(ITEM);
        assert_eq!(frag.text(), r#"R15["is subclass of"] (relation)"#);
        assert_eq!(frag.display(), frag.text());
    }

    #[test]
    fn test_payload_is_decoded_json_string() {
        let frag = Fragment::parse(ITEM);
        assert_eq!(frag.payload(3).unwrap(), r#":R15["is subclass of"]"#);
    }

    #[test]
    fn test_payload_for_other_index_is_missing() {
        let frag = Fragment::parse(ITEM);
        assert!(matches!(frag.payload(0), Err(QuerypadError::PayloadNotFound(_))));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let frag = Fragment::parse(r#"<b>x</b><span id="sparql_text_0" hidden>not json</span>"#);
        assert_eq!(frag.text(), "x");
        assert!(matches!(
            frag.payload(0),
            Err(QuerypadError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_entities_and_breaks() {
        let frag = Fragment::parse("<b>a &amp; b</b><br>c&nbsp;d");
        assert_eq!(frag.text(), "a & b c d");
    }

    #[test]
    fn test_plain_text_passes_through() {
        let frag = Fragment::parse("<b>foo1</b>");
        assert_eq!(frag.text(), "foo1");
        assert_eq!(frag.markup(), "<b>foo1</b>");
    }
}
