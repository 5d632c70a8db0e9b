use std::collections::BTreeMap;

use serde::Serialize;

use crate::wikitext::value::{ElementMap, ParsedValue, interpret_value};

/// A top-level `{{Name|key=value|...}}` record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Default)]
pub struct Template {
    pub name: String,
    pub parameters: BTreeMap<String, ParsedValue>,
}

impl Template {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Template {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Get a parameter by exact key.
    pub fn get(&self, key: &str) -> Option<&ParsedValue> {
        self.parameters.get(key)
    }
}

/// Templates of one page keyed by name, in the order they first appeared.
///
/// A later template with the same name replaces the earlier one in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Default)]
pub struct TemplateMap {
    pub templates: Vec<Template>,
}

impl TemplateMap {
    pub fn new() -> Self {
        TemplateMap {
            templates: Vec::new(),
        }
    }

    pub fn insert(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// All templates whose name contains `fragment`, ignoring case.
    pub fn query<'a>(
        &'a self,
        fragment: &str,
    ) -> impl Iterator<Item = &'a Template> + use<'a> {
        let fragment = fragment.trim().to_lowercase();
        self.templates
            .iter()
            .filter(move |t| t.name.to_lowercase().contains(&fragment))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Parse every top-level template in `text` in a single forward scan.
///
/// Two counters track `{`/`}` and `[`/`]` depth. Inside a template (brace
/// depth of at least two) `|` and `}` end a segment, unless we are inside a
/// `[[link|label]]`. A segment holding `=` becomes a parameter, the first one
/// without `=` becomes the template name. The template is emitted when a `}}`
/// brings the brace depth back to zero.
///
/// Nested templates are not tracked separately: their parameters end up in the
/// enclosing template. Unbalanced markup never reaches an emit point and is
/// dropped without an error.
pub fn parse_templates(text: &str) -> TemplateMap {
    let mut templates = TemplateMap::new();
    let mut brace_depth: usize = 0;
    let mut bracket_depth: usize = 0;
    let mut cursor: usize = 0;
    let mut previous: Option<char> = None;
    let mut name: Option<String> = None;
    let mut parameters: BTreeMap<String, ParsedValue> = BTreeMap::new();

    for (index, character) in text.char_indices() {
        match character {
            '{' => {
                brace_depth += 1;
                if brace_depth == 2 {
                    cursor = index + 1;
                    name = None;
                    parameters = BTreeMap::new();
                }
            }
            '[' => bracket_depth += 1,
            ']' => bracket_depth = bracket_depth.saturating_sub(1),
            '|' | '}' => {
                if brace_depth > 1 && bracket_depth == 0 {
                    record_segment(&text[cursor..index], &mut name, &mut parameters);
                    cursor = index + 1;
                }

                if character == '}' {
                    brace_depth = brace_depth.saturating_sub(1);
                    cursor = index;
                    if brace_depth == 0
                        && previous == Some('}')
                        && let Some(name) = name.take()
                    {
                        log::debug!("template {:?} ({} parameters)", name, parameters.len());
                        templates.insert(Template {
                            name,
                            parameters: std::mem::take(&mut parameters),
                        });
                    }
                }
            }
            _ => {}
        }
        previous = Some(character);
    }

    templates
}

/// Store one `|`-delimited segment as a parameter or as the template name.
fn record_segment(
    segment: &str,
    name: &mut Option<String>,
    parameters: &mut BTreeMap<String, ParsedValue>,
) {
    let segment = segment.trim();
    match segment.split_once('=') {
        Some((key, raw)) => {
            let key = key.trim();
            let value = match interpret_value(key, raw.trim()) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("[{}] dropping malformed value ({})", key, e);
                    ParsedValue::ElementMap(ElementMap::new())
                }
            };
            parameters.insert(key.to_string(), value);
        }
        None => {
            if name.is_none() {
                *name = Some(segment.to_string());
            }
        }
    }
}

/// Return the text between the first `<title>` and `</title>` of an exported
/// page, with entities decoded.
pub fn extract_title(text: &str) -> Option<String> {
    let (_, title) = lazy_regex::regex_captures!(r"<title>(.*?)</title>", text)?;
    Some(html_escape::decode_html_entities(title.trim()).to_string())
}
