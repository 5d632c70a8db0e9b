use std::collections::BTreeMap;

use crate::{
    classify::classify_page,
    compile::{compile_item, stat_template},
    definitions::{Category, Item, RawPage},
    wikitext::Result,
};

/// Page counts of one compile run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub compiled: usize,
    /// Pages without a category or without a stat template.
    pub skipped: usize,
    /// Pages that could not be read (e.g. no title).
    pub failed: usize,
}

/// Compiled items grouped by category, in discovery order.
#[derive(Debug, Default, Clone)]
pub struct CategoryItems {
    items: BTreeMap<Category, Vec<Item>>,
    pub summary: Summary,
}

impl CategoryItems {
    pub fn push(&mut self, category: Category, item: Item) {
        self.items.entry(category).or_default().push(item);
    }

    pub fn get(&self, category: Category) -> &[Item] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Move a category's items out, leaving it empty.
    pub fn take(&mut self, category: Category) -> Vec<Item> {
        self.items.remove(&category).unwrap_or_default()
    }
}

/// Turn one page into at most one categorised item.
pub fn compile_page(page: &RawPage) -> Result<Option<(Category, Item)>> {
    let classified = classify_page(page)?;
    let Some(category) = classified.category else {
        return Ok(None);
    };
    let Some(template) = stat_template(&classified.templates) else {
        log::debug!("[{}] no stat template on {:?}", category, classified.title);
        return Ok(None);
    };
    let item = compile_item(&classified.title, category.family(), template);
    Ok(Some((category, item)))
}

/// Compile every page, skipping (and logging) the ones that fail.
pub fn compile_pages<I>(pages: I) -> CategoryItems
where
    I: IntoIterator<Item = RawPage>,
{
    let mut result = CategoryItems::default();
    for page in pages {
        result.summary.total += 1;
        match compile_page(&page) {
            Ok(Some((category, item))) => {
                log::debug!("[{}] compiled {:?}", category, item.name);
                result.summary.compiled += 1;
                result.push(category, item);
            }
            Ok(None) => result.summary.skipped += 1,
            Err(e) => {
                log::warn!("Skipping page {:?}: {}", page.id, e);
                result.summary.failed += 1;
            }
        }
    }

    let summary = result.summary;
    log::info!(
        "[compile_pages] Total: {}. Compiled: {}. Skipped: {}. Failed: {}. Rate: {:.2}%",
        summary.total,
        summary.compiled,
        summary.skipped,
        summary.failed,
        if summary.total == 0 {
            0.0
        } else {
            (summary.compiled as f64 / summary.total as f64) * 100.0
        }
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_category;

    fn sword_page() -> RawPage {
        let stats = (0..7)
            .map(|i| format!("|strength{}={}", i, 100 + i * 10))
            .collect::<String>();
        RawPage::new(
            "id100".to_string(),
            format!(
                "<page><title>Iron Sword</title><text>\
                 {{{{Infobox Weapon|type=[[Swords|Sword]]}}}}\n\
                 {{{{DDWeaponStat|bludg=5|slash=95|element=None{}}}}}\
                 </text></page>",
                stats
            ),
        )
    }

    fn set_page() -> RawPage {
        RawPage::new(
            "id200",
            "<page><title>Fighter Set</title><text>{{Infobox|type=Sword}} \
             Includes [[Iron Sword]] and [[Set Helm]].</text></page>",
        )
    }

    #[test]
    fn groups_by_category() {
        let pages = vec![
            sword_page(),
            RawPage::new(
                "id300",
                "<title>Buckler</title>{{Infobox|type=Shield}}{{DDWeaponStat|strength6=1}}",
            ),
            RawPage::new("id301", "<title>Potion</title>{{Infobox|type=Consumable}}"),
            RawPage::new("id302", "{{Infobox|type=Sword}} no title"),
            set_page(),
        ];
        let items = compile_pages(pages);
        assert_eq!(items.get(Category::Swords).len(), 1);
        assert_eq!(items.get(Category::Shields).len(), 1);
        assert!(items.get(Category::Bows).is_empty());
        assert_eq!(
            items.summary,
            Summary {
                total: 5,
                compiled: 2,
                skipped: 2,
                failed: 1,
            }
        );
    }

    #[test]
    fn classified_page_without_stats_is_skipped() {
        let page = RawPage::new("id1", "<title>Odd Sword</title>{{Infobox|type=Sword}}");
        assert!(compile_page(&page).unwrap().is_none());
    }

    #[test]
    fn end_to_end_swords() {
        let mut items = compile_pages(vec![sword_page(), set_page()]);
        let swords = items.take(Category::Swords);
        assert_eq!(swords.len(), 1);
        assert!(swords.iter().all(|item| item.stats.len() == 7));

        let out = render_category(Category::Swords, swords);
        assert!(out.contains("'''[[Iron Sword]]'''"));
        assert!(out.contains("| 160 <!-- Strength -->"));
        assert!(!out.contains("Fighter Set"));
        assert!(!out.contains("Set Helm"));
        assert!(out.starts_with("<!-- BEGIN GENERATED CONTENT: Swords -->"));
        assert!(out.trim_end().ends_with("<!-- END GENERATED CONTENT: Swords -->"));
    }
}
