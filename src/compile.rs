use crate::{
    definitions::{Family, Field, Item, LevelStats, TIER_COUNT},
    wikitext::{ParsedValue, Template, TemplateMap},
};

/// Substring (case-insensitive) that marks a stat template, e.g.
/// `DDWeaponStat` or `DDArmorStat`.
pub const STAT_MARKER: &str = "stat";

/// First template on the page that carries equipment stats.
pub fn stat_template(templates: &TemplateMap) -> Option<&Template> {
    let mut stats = templates.query(STAT_MARKER);
    let first = stats.next()?;
    if let Some(ignored) = stats.next() {
        log::debug!(
            "Using {:?}, ignoring further stat template {:?}",
            first.name,
            ignored.name
        );
    }
    Some(first)
}

/// Wiki markup for the name column: a bold link to the item's page.
fn display_name(name: &str) -> ParsedValue {
    ParsedValue::PlainText(format!("'''[[{}]]'''", name))
}

/// Reshape one stat template into the fixed per-tier layout of `family`.
///
/// Levelless fields are shared by all tiers; tier fields read `<key><tier>`.
/// Anything missing becomes empty text.
pub fn compile_item(name: &str, family: Family, template: &Template) -> Item {
    let mut levelless = LevelStats::default();
    for field in family.levelless_fields() {
        let value = match field {
            Field::Name => display_name(name),
            other => template.get(other.key()).cloned().unwrap_or_default(),
        };
        levelless.insert(*field, value);
    }

    let stats: [LevelStats; TIER_COUNT] = std::array::from_fn(|tier| {
        let mut level = levelless.clone();
        for field in family.tier_fields() {
            let key = format!("{}{}", field.key(), tier);
            level.insert(*field, template.get(&key).cloned().unwrap_or_default());
        }
        level
    });

    Item {
        name: name.to_string(),
        stats,
    }
}
