use serde::Serialize;
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use crate::wikitext::{ParsedValue, Result, WtError, extract_title};

/// Number of enhancement tiers every item carries.
pub const TIER_COUNT: usize = 7;

/// Equipment family. Decides the column schema and the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Family {
    Weapon,
    Armor,
}

impl Family {
    /// Fields copied unchanged into every tier.
    pub fn levelless_fields(&self) -> &'static [Field] {
        match self {
            Family::Weapon => &[Field::Name, Field::Bludgeon, Field::Slash, Field::Element],
            Family::Armor => &[Field::Name, Field::Bonus],
        }
    }

    /// Fields looked up per tier as `<key><tier>`.
    pub fn tier_fields(&self) -> &'static [Field] {
        match self {
            Family::Weapon => &[
                Field::Strength,
                Field::Magick,
                Field::Stagger,
                Field::Knockdown,
                Field::Debilitation,
                Field::Requirement,
                Field::Weight,
            ],
            Family::Armor => &[
                Field::Defense,
                Field::MagickDefense,
                Field::Pierce,
                Field::Strike,
                Field::Element,
                Field::Stagger,
                Field::Knockdown,
                Field::Debilitation,
                Field::Requirement,
                Field::Weight,
            ],
        }
    }

    /// Rendered columns, in order, with their header labels.
    pub fn columns(&self) -> &'static [(Field, &'static str)] {
        match self {
            Family::Weapon => &[
                (Field::Name, "Name"),
                (Field::Strength, "Strength"),
                (Field::Magick, "Magick"),
                (Field::Slash, "Slash Strength"),
                (Field::Bludgeon, "Bludgeon Strength"),
                (Field::Stagger, "Stagger Power"),
                (Field::Knockdown, "Knockdown Power"),
                (Field::Element, "Element"),
                (Field::Debilitation, "Debilitations"),
                (Field::Weight, "Weight"),
            ],
            Family::Armor => &[
                (Field::Name, "Name<br/><br/>"),
                (Field::Defense, "Defense<br/><br/>"),
                (Field::MagickDefense, "Magick<br/>Defense<br/>"),
                (Field::Pierce, "Piercing<br/>Resist<br/>"),
                (Field::Strike, "Striking<br/>Resist<br/>"),
                (Field::Stagger, "Stagger<br/>Resist<br/>"),
                (Field::Knockdown, "Knockdown<br/>Resist<br/>"),
                (Field::Element, "Elemental<br/>Resist<br/>"),
                (Field::Debilitation, "Debilitation<br/>Resist<br/>"),
                (Field::Weight, "Weight<br/><br/>"),
                (Field::Bonus, "Bonus<br/><br/>"),
            ],
        }
    }

    /// Fields summed (at the top tier) to order a category's items.
    pub fn sort_fields(&self) -> &'static [Field] {
        match self {
            Family::Weapon => &[Field::Strength, Field::Magick],
            Family::Armor => &[Field::Defense],
        }
    }
}

/// Column key of a compiled item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Bludgeon,
    Slash,
    Element,
    Bonus,
    Strength,
    Magick,
    Stagger,
    Knockdown,
    Debilitation,
    Requirement,
    Weight,
    Defense,
    MagickDefense,
    Pierce,
    Strike,
}

impl Field {
    /// Parameter name used by the stat templates (tier fields get the tier
    /// index appended).
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Bludgeon => "bludg",
            Field::Slash => "slash",
            Field::Element => "element",
            Field::Bonus => "bonus",
            Field::Strength => "strength",
            Field::Magick => "magick",
            Field::Stagger => "stagger",
            Field::Knockdown => "knockdown",
            Field::Debilitation => "debil",
            Field::Requirement => "req",
            Field::Weight => "weight",
            Field::Defense => "def",
            Field::MagickDefense => "mdef",
            Field::Pierce => "pierce",
            Field::Strike => "strike",
        }
    }
}

/// Enhancement rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tier {
    ZeroStars,
    OneStar,
    TwoStars,
    ThreeStars,
    Dragonforged,
    SilverRarified,
    GoldRarified,
}

impl Tier {
    pub const ALL: [Tier; TIER_COUNT] = [
        Tier::ZeroStars,
        Tier::OneStar,
        Tier::TwoStars,
        Tier::ThreeStars,
        Tier::Dragonforged,
        Tier::SilverRarified,
        Tier::GoldRarified,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::ZeroStars => "0 Stars",
            Tier::OneStar => "1 Star",
            Tier::TwoStars => "2 Stars",
            Tier::ThreeStars => "3 Stars",
            Tier::Dragonforged => "Dragonforged",
            Tier::SilverRarified => "Silver Rarified",
            Tier::GoldRarified => "Gold Rarified",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Equipment category a page can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Swords,
    Maces,
    Longswords,
    Warhammers,
    Daggers,
    Staves,
    Archistaves,
    Longbows,
    MagickBows,
    Bows,
    Shields,
    MagickShields,
    HeadArmor,
    LegClothing,
    LegArmor,
    ChestClothing,
    TorsoArmor,
    ArmsArmor,
    Cloaks,
}

impl Category {
    pub const ALL: [Category; 19] = [
        Category::Swords,
        Category::Maces,
        Category::Longswords,
        Category::Warhammers,
        Category::Daggers,
        Category::Staves,
        Category::Archistaves,
        Category::Longbows,
        Category::MagickBows,
        Category::Bows,
        Category::Shields,
        Category::MagickShields,
        Category::HeadArmor,
        Category::LegClothing,
        Category::LegArmor,
        Category::ChestClothing,
        Category::TorsoArmor,
        Category::ArmsArmor,
        Category::Cloaks,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Swords => "Swords",
            Category::Maces => "Maces",
            Category::Longswords => "Longswords",
            Category::Warhammers => "Warhammers",
            Category::Daggers => "Daggers",
            Category::Staves => "Staves",
            Category::Archistaves => "Archistaves",
            Category::Longbows => "Longbows",
            Category::MagickBows => "Magick Bows",
            Category::Bows => "Bows",
            Category::Shields => "Shields",
            Category::MagickShields => "Magick Shields",
            Category::HeadArmor => "Head Armor",
            Category::LegClothing => "Leg Clothing",
            Category::LegArmor => "Leg Armor",
            Category::ChestClothing => "Chest Clothing",
            Category::TorsoArmor => "Torso Armor",
            Category::ArmsArmor => "Arms Armor",
            Category::Cloaks => "Cloaks",
        }
    }

    /// Singular form, as written in an infobox `type` field ("Magick Bow").
    pub fn singular(&self) -> &'static str {
        match self {
            Category::Swords => "Sword",
            Category::Maces => "Mace",
            Category::Longswords => "Longsword",
            Category::Warhammers => "Warhammer",
            Category::Daggers => "Dagger",
            Category::Staves => "Staff",
            Category::Archistaves => "Archistaff",
            Category::Longbows => "Longbow",
            Category::MagickBows => "Magick Bow",
            Category::Bows => "Bow",
            Category::Shields => "Shield",
            Category::MagickShields => "Magick Shield",
            Category::Cloaks => "Cloak",
            other => other.name(),
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Category::HeadArmor
            | Category::LegClothing
            | Category::LegArmor
            | Category::ChestClothing
            | Category::TorsoArmor
            | Category::ArmsArmor
            | Category::Cloaks => Family::Armor,
            _ => Family::Weapon,
        }
    }

    /// All category names, sorted alphabetically.
    pub fn sorted_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Category::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names
    }

    /// Message for a category name that is not in the vocabulary.
    pub fn unknown_message(requested: &str) -> String {
        format!(
            "\"{}\" category not recognized. Use one of:\n  {}",
            requested,
            Category::sorted_names().join("\n  ")
        )
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("\"{}\" category not recognized", s))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// Values of one tier, keyed by column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats(pub BTreeMap<Field, ParsedValue>);

impl LevelStats {
    /// Value of `field`; missing fields read as empty text.
    pub fn get(&self, field: Field) -> &ParsedValue {
        static EMPTY: ParsedValue = ParsedValue::PlainText(String::new());
        self.0.get(&field).unwrap_or(&EMPTY)
    }

    pub fn insert(&mut self, field: Field, value: ParsedValue) {
        self.0.insert(field, value);
    }
}

/// A compiled piece of equipment: one `LevelStats` per tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub name: String,
    pub stats: [LevelStats; TIER_COUNT],
}

impl Item {
    pub fn tier(&self, tier: Tier) -> &LevelStats {
        &self.stats[tier.index()]
    }
}

/// An exported wiki page as read from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    pub id: String,
    pub text: String,
}

impl RawPage {
    pub fn new<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Page title from the `<title>` element of the export.
    pub fn title(&self) -> Result<String> {
        extract_title(&self.text)
            .ok_or_else(|| WtError::not_found(format!("no <title> in page {:?}", self.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_str_and_display() {
        assert_eq!(
            Category::from_str("Magick Bows").unwrap(),
            Category::MagickBows
        );
        assert_eq!(Category::from_str(" Cloaks ").unwrap(), Category::Cloaks);
        assert!(Category::from_str("Magick Bow").is_err());
        assert_eq!(format!("{}", Category::HeadArmor), "Head Armor");
    }

    #[test]
    fn category_families() {
        assert_eq!(Category::Swords.family(), Family::Weapon);
        assert_eq!(Category::MagickShields.family(), Family::Weapon);
        assert_eq!(Category::TorsoArmor.family(), Family::Armor);
        assert_eq!(Category::Cloaks.family(), Family::Armor);
        let armor = Category::ALL
            .iter()
            .filter(|c| c.family() == Family::Armor)
            .count();
        assert_eq!(armor, 7);
    }

    #[test]
    fn sorted_names_are_sorted() {
        let names = Category::sorted_names();
        assert_eq!(names.len(), 19);
        assert_eq!(names.first(), Some(&"Archistaves"));
        assert_eq!(names.last(), Some(&"Warhammers"));
    }

    #[test]
    fn unknown_category_lists_vocabulary() {
        let msg = Category::unknown_message("Spears");
        let mut lines = msg.lines();
        assert_eq!(
            lines.next(),
            Some("\"Spears\" category not recognized. Use one of:")
        );
        let listed: Vec<_> = lines.map(str::trim).collect();
        assert_eq!(listed, Category::sorted_names());
        assert!(Category::from_str("Spears").is_err());
    }

    #[test]
    fn tiers_in_order() {
        let names: Vec<_> = Tier::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names[0], "0 Stars");
        assert_eq!(names[6], "Gold Rarified");
        assert_eq!(Tier::GoldRarified.index(), 6);
    }

    #[test]
    fn missing_field_reads_empty() {
        let stats = LevelStats::default();
        assert_eq!(stats.get(Field::Weight), &ParsedValue::default());
    }

    #[test]
    fn raw_page_title() {
        let page = RawPage::new("id1", "<title>Iron Sword</title>");
        assert_eq!(page.title().unwrap(), "Iron Sword");
        let page = RawPage::new("id2", "{{Stat}}");
        assert_eq!(page.title().unwrap_err().kind(), "NotFound");
    }
}
