//! Wiki table output.
//!
//! One sortable table per tier, all seven wrapped in a `<tabber>` so readers
//! can flip between enhancement levels. The whole block sits between two
//! comment markers so it can be found and replaced on the next run.

use itertools::Itertools;
use lazy_regex::{regex_is_match, regex_replace_all};

use crate::{
    definitions::{Category, Family, Field, Item, LevelStats, Tier},
    wikitext::{ElementMap, ParsedValue},
};

const TABLE_OPEN: &str = "{| class=\"wikitable-sortable sortable\" style=\"border-collapse:collapse; border:1px solid darkslategray; font-size:85%; text-align:center;\" cellpadding=\"3\" border=\"1\"";
const ELEMENT_TABLE_OPEN: &str =
    "{| class=\"element-table\" style=\"border-collapse:collapse; margin:auto;\"";
const HEADER_SEP: &str = "\n! class=\"txtbg1\" style=\"text-align: center;\" | ";
const CELL_SEP: &str = "| ";
const ROW_SEP: &str = "\n|-\n";

pub fn begin_marker(category: Category) -> String {
    format!("<!-- BEGIN GENERATED CONTENT: {} -->", category)
}

pub fn end_marker(category: Category) -> String {
    format!("<!-- END GENERATED CONTENT: {} -->", category)
}

/// Numeric reading of a cell for sorting. Markup and thousands separators are
/// ignored; placeholders (`-`, empty) and anything that is not a plain decimal
/// (`NaN`, `inf`, `1e3`, ...) count as zero.
pub fn sort_value(value: &ParsedValue) -> f64 {
    let Some(text) = value.as_plain() else {
        return 0.0;
    };
    let text = regex_replace_all!(r"<[^>]*>", text, "");
    let text = text.replace(',', "");
    let text = text.trim();
    if !regex_is_match!(r"^[+-]?(\d+(\.\d*)?|\.\d+)$", text) {
        return 0.0;
    }
    text.parse::<f64>().unwrap_or(0.0)
}

/// Sum of the family's sort fields at the top tier.
fn sort_key(family: Family, item: &Item) -> f64 {
    let top = item.tier(Tier::GoldRarified);
    family
        .sort_fields()
        .iter()
        .map(|field| sort_value(top.get(*field)))
        .sum()
}

/// Order items best first (weapons by strength + magick, armor by defense,
/// both at Gold Rarified). Equal items keep their order.
pub fn sort_items(family: Family, items: &mut [Item]) {
    items.sort_by(|a, b| sort_key(family, b).total_cmp(&sort_key(family, a)));
}

fn element_icon(name: &str) -> String {
    format!("[[File:{} Icon.png|20px|link={}]]", name, name)
}

/// Nested table pairing each element's icon with its value.
fn element_table(map: &ElementMap) -> String {
    let rows = map
        .iter()
        .map(|(name, value)| format!("| {} || {}", element_icon(name), value))
        .join(ROW_SEP);
    format!("\n{}\n{}\n|}}", ELEMENT_TABLE_OPEN, rows)
}

/// Header label as plain text for the trailing cell comment.
fn annotation(label: &str) -> String {
    format!(" <!-- {} -->", label.replace("<br/>", " ").trim())
}

fn render_cell(value: &ParsedValue, label: &str) -> String {
    match value {
        ParsedValue::ElementMap(map) if !map.is_empty() => {
            format!("{}{}", CELL_SEP, element_table(map))
        }
        ParsedValue::ElementMap(_) => format!("{}{}", CELL_SEP, annotation(label)),
        ParsedValue::PlainText(text) => format!("{}{}{}", CELL_SEP, text, annotation(label)),
    }
}

/// A single sortable table: header row from the labels, one row per item.
pub fn build_table(columns: &[(Field, &str)], rows: &[&LevelStats]) -> String {
    let mut table = vec![TABLE_OPEN.to_string()];
    table.push(format!(
        "{}{}",
        HEADER_SEP,
        columns.iter().map(|(_, label)| label).join(HEADER_SEP)
    ));

    for row in rows {
        let cells = columns
            .iter()
            .map(|(field, label)| render_cell(row.get(*field), label))
            .join("\n");
        table.push(format!("{}{}", ROW_SEP, cells));
    }

    table.push("\n|}".to_string());
    table.join("\n")
}

/// One table per tier, inside a `<tabber>` keyed by tier name.
pub fn build_tables(columns: &[(Field, &str)], items: &[Item]) -> String {
    let tabs = Tier::ALL
        .iter()
        .map(|tier| {
            let rows: Vec<&LevelStats> = items.iter().map(|item| item.tier(*tier)).collect();
            format!("{}={}", tier.name(), build_table(columns, &rows))
        })
        .join("|-|");
    ["<tabber>".to_string(), tabs, "</tabber>".to_string()].join("\n")
}

/// Sort a category's items and render the full marked block.
pub fn render_category(category: Category, mut items: Vec<Item>) -> String {
    let family = category.family();
    sort_items(family, &mut items);
    log::info!("[{}] rendering {} items", category, items.len());
    format!(
        "{}\n{}\n{}\n",
        begin_marker(category),
        build_tables(family.columns(), &items),
        end_marker(category)
    )
}
