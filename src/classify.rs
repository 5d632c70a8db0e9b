use std::sync::LazyLock;

use crate::{
    definitions::{Category, RawPage},
    wikitext::{Result, TemplateMap, parse_templates},
};

/// Outcome of looking at one page: its category (if any) plus what was parsed.
#[derive(Debug, Clone)]
pub struct ClassifiedPage {
    pub category: Option<Category>,
    pub title: String,
    pub templates: TemplateMap,
}

/// Match vocabulary, built once per run.
static MATCH_TERMS: LazyLock<Vec<(String, Category)>> = LazyLock::new(match_terms);

/// Aggregate pages (sets, category listings) that never describe one item.
///
/// Any title containing "set" counts, including words such as "Sunset".
pub fn is_excluded(title: &str) -> bool {
    let title = title.to_lowercase();
    title.contains("set") || title.contains("category")
}

/// Every name a category can be recognised by, longest first.
///
/// Equal lengths are ordered by category name then term, so the order never
/// depends on declaration order.
fn match_terms() -> Vec<(String, Category)> {
    let mut terms: Vec<(String, Category)> = Category::ALL
        .iter()
        .flat_map(|c| [(c.name().to_lowercase(), *c), (c.singular().to_lowercase(), *c)])
        .collect();
    terms.sort_by(|(a_term, a_cat), (b_term, b_cat)| {
        b_term
            .len()
            .cmp(&a_term.len())
            .then_with(|| a_cat.name().cmp(b_cat.name()))
            .then_with(|| a_term.cmp(b_term))
    });
    terms.dedup();
    terms
}

/// Match a free-form `type` text against the category vocabulary.
///
/// "Magick Bow" contains "Bow", so longer terms are tried first.
pub fn match_category(type_text: &str) -> Option<Category> {
    let text = type_text.to_lowercase();
    MATCH_TERMS
        .iter()
        .find(|(term, _)| text.contains(term.as_str()))
        .map(|(_, category)| *category)
}

/// Category named by the `type` parameters of a page's templates.
///
/// Templates are visited in page order and a later match replaces an earlier
/// one.
pub fn categorise(templates: &TemplateMap) -> Option<Category> {
    let mut category = None;
    for template in templates.iter() {
        let Some(type_text) = template.get("type").and_then(|v| v.as_plain()) else {
            continue;
        };
        match match_category(type_text) {
            Some(found) => category = Some(found),
            None => log::debug!(
                "[{}] type {:?} matches no category",
                template.name,
                type_text
            ),
        }
    }
    category
}

/// Read a page's title and templates and decide its category.
///
/// Excluded pages come back with no category and no templates. A page without
/// a title is an error.
pub fn classify_page(page: &RawPage) -> Result<ClassifiedPage> {
    let title = page.title()?;
    if is_excluded(&title) {
        log::debug!("Skipping aggregate page {:?}", title);
        return Ok(ClassifiedPage {
            category: None,
            title,
            templates: TemplateMap::new(),
        });
    }

    let templates = parse_templates(&page.text);
    let category = categorise(&templates);
    Ok(ClassifiedPage {
        category,
        title,
        templates,
    })
}
