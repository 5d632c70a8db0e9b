//! Parameter value interpretation.
//!
//! Every `key = value` pair found by the template scanner goes through
//! [`interpret_value`]. The raw text is cleaned of HTML (entities, tags,
//! citations, hard spaces) and, for element-group keys, split into an
//! [`ElementMap`] keyed by the linked element name:
//!
//! ```text
//! element3 = [[Fire]] 12 [[Ice|Frost]] -4
//!   -> ElementMap { Fire: "12", Ice: "<span ...>-4</span>" }
//! ```
//!
//! Any value starting with `-` (and longer than just the dash) is wrapped in
//! the negative marker span so it shows up coloured in the rendered table.

use html_escape::decode_html_entities;
use lazy_regex::regex_replace_all;
use serde::{Serialize, Serializer};

use crate::wikitext::errors::{Result, WtError};
use crate::wikitext::types::links::parse_internal_link_at;

/// Keys starting with one of these carry several `[[Element]] value` pairs.
pub const ELEMENT_GROUP_PREFIXES: &[&str] = &["element", "debil"];

/// Colour used for the negative value marker.
pub const NEGATIVE_COLOUR: &str = "red";

/// An interpreted parameter value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ParsedValue {
    PlainText(String),
    ElementMap(ElementMap),
}

impl Default for ParsedValue {
    fn default() -> Self {
        ParsedValue::PlainText(String::new())
    }
}

impl ParsedValue {
    /// The text of a `PlainText` value.
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            ParsedValue::PlainText(text) => Some(text.as_str()),
            ParsedValue::ElementMap(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ParsedValue::PlainText(text) => text.is_empty(),
            ParsedValue::ElementMap(map) => map.is_empty(),
        }
    }
}

/// Ordered `element name -> value` pairs. Inserting an existing name replaces
/// its value but keeps its original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementMap(Vec<(String, String)>);

impl ElementMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ElementMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

/// Whether `key` names an element / debilitation group (`element`, `debil3`, ...).
pub fn is_element_group(key: &str) -> bool {
    let key = key.trim().to_lowercase();
    ELEMENT_GROUP_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

/// Interpret the raw (already trimmed) text of parameter `key`.
///
/// Fails only for element groups with broken link brackets; plain values
/// never fail.
pub fn interpret_value(key: &str, raw: &str) -> Result<ParsedValue> {
    let cleaned = clean_markup(raw);
    if is_element_group(key)
        && let Some(map) = split_element_group(&cleaned)?
    {
        return Ok(ParsedValue::ElementMap(map));
    }
    Ok(ParsedValue::PlainText(mark_negative(cleaned)))
}

/// Decode entities, drop citations, strip tags (keeping their text) and turn
/// newlines / hard spaces into plain spaces.
pub fn clean_markup(raw: &str) -> String {
    let s = decode_html_entities(raw).to_string();
    let s = regex_replace_all!(r"(?is)<ref\b[^>]*/>", &s, "").to_string();
    let s = regex_replace_all!(r"(?is)<ref\b[^>]*>.*?</ref\s*>", &s, "").to_string();
    let s = regex_replace_all!(r"(?i)<br\s*/?>", &s, " ").to_string();
    let s = regex_replace_all!(r"</?[A-Za-z][^>]*>", &s, "").to_string();
    s.replace("&nbsp;", " ")
        .replace("\r\n", " ")
        .replace(['\u{a0}', '\r', '\n'], " ")
        .trim()
        .to_string()
}

/// Wrap values such as `-4` in the negative marker. A lone `-` is a placeholder
/// and stays as it is.
pub fn mark_negative(value: String) -> String {
    if value.starts_with('-') && value.chars().count() > 1 {
        format!("<span style=\"color:{};\">{}</span>", NEGATIVE_COLOUR, value)
    } else {
        value
    }
}

/// Split `[[Fire]] 12 [[Ice|Frost]] 8` into element pairs.
///
/// Returns `Ok(None)` when the text holds no link at all, leaving the caller
/// to treat it as plain text.
fn split_element_group(text: &str) -> Result<Option<ElementMap>> {
    let mut map = ElementMap::new();
    let mut cursor = 0usize;
    let mut pending: Option<String> = None;

    loop {
        let next = text[cursor..].find("[[").map(|rel| cursor + rel);
        let end = next.unwrap_or(text.len());
        let segment = &text[cursor..end];

        if let Some(name) = pending.take() {
            if let Some(stray) = segment.find("]]") {
                return Err(WtError::parse_at(
                    format!("stray ']]' after element '{}'", name),
                    cursor + stray,
                ));
            }
            map.insert(name, mark_negative(segment.trim().to_string()));
        }

        let Some(at) = next else { break };
        let (consumed, target) = parse_internal_link_at(text, at)
            .ok_or_else(|| WtError::parse_at("unclosed '[[' in element group", at))?;
        pending = Some(target);
        cursor = at + consumed;
    }

    if map.is_empty() {
        return Ok(None);
    }
    Ok(Some(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_value_is_cleaned() {
        let v = interpret_value("bonus", "Fire&nbsp;Resist<br/>+10%").unwrap();
        assert_eq!(v, ParsedValue::PlainText("Fire Resist +10%".into()));
    }

    #[test]
    fn nested_entity_is_collapsed() {
        // `&amp;nbsp;` decodes to a literal `&nbsp;` which still becomes a space
        let v = interpret_value("bonus", "a&amp;nbsp;b").unwrap();
        assert_eq!(v.as_plain(), Some("a b"));
    }

    #[test]
    fn tags_are_stripped_but_text_kept() {
        let v = interpret_value("weight", "<b>4.5</b>\n<small>kg</small>").unwrap();
        assert_eq!(v.as_plain(), Some("4.5 kg"));
    }

    #[test]
    fn citations_are_dropped() {
        let v = interpret_value(
            "strength6",
            "312<ref name=\"da\">Dark Arisen only</ref><ref name=\"x\"/>",
        )
        .unwrap();
        assert_eq!(v.as_plain(), Some("312"));
    }

    #[test]
    fn negative_values_are_marked() {
        let v = interpret_value("stagger3", "-20").unwrap();
        assert_eq!(
            v.as_plain(),
            Some("<span style=\"color:red;\">-20</span>")
        );
        // placeholder dash is left alone
        let v = interpret_value("stagger3", "-").unwrap();
        assert_eq!(v.as_plain(), Some("-"));
    }

    #[test]
    fn element_group_is_split() {
        let v = interpret_value("element4", "[[Fire]] 12 [[Ice|Frost]] -4").unwrap();
        let ParsedValue::ElementMap(map) = v else {
            panic!("expected element map, got {:?}", v);
        };
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("Fire", "12"),
                ("Ice", "<span style=\"color:red;\">-4</span>")
            ]
        );
    }

    #[test]
    fn debilitation_group_is_split() {
        let v = interpret_value("debil0", "[[Poison]] 50%\n[[Blindness]] 30%").unwrap();
        let ParsedValue::ElementMap(map) = v else {
            panic!("expected element map");
        };
        assert_eq!(map.get("Poison"), Some("50%"));
        assert_eq!(map.get("Blindness"), Some("30%"));
    }

    #[test]
    fn element_group_without_links_stays_plain() {
        let v = interpret_value("element", "None").unwrap();
        assert_eq!(v, ParsedValue::PlainText("None".into()));
        let v = interpret_value("element", "").unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn element_without_value() {
        let v = interpret_value("element", "[[Holy]]").unwrap();
        let ParsedValue::ElementMap(map) = v else {
            panic!("expected element map");
        };
        assert_eq!(map.get("Holy"), Some(""));
    }

    #[test]
    fn malformed_element_group_is_an_error() {
        let err = interpret_value("element2", "[[Fire]] 12 [[Ice 8").unwrap_err();
        assert_eq!(err.kind(), "ParseError");
        let err = interpret_value("debil2", "[[Fire]] 12]]").unwrap_err();
        assert_eq!(err.kind(), "ParseError");
    }

    #[test]
    fn links_in_plain_values_are_untouched() {
        let v = interpret_value("type", "[[Swords|Sword]]").unwrap();
        assert_eq!(v.as_plain(), Some("[[Swords|Sword]]"));
    }

    #[test]
    fn element_map_insert_replaces_in_place() {
        let mut map = ElementMap::new();
        map.insert("Fire", "1");
        map.insert("Ice", "2");
        map.insert("Fire", "3");
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![("Fire", "3"), ("Ice", "2")]);
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"Fire":"3","Ice":"2"}"#
        );
    }
}
