//! Ingredient and tag catalogs as supplied by the data layer.
//!
//! Rows arrive as loosely shaped JSON: tag columns are pipe-delimited strings,
//! numeric columns may be blank or `"nan"`. Everything is normalized here so
//! the generator only ever sees typed, immutable records.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CatalogError;
use crate::numbers::truncate_f64_to_u64;

/// Rarity tier of an ingredient.
///
/// Unknown labels are kept verbatim in [`Rarity::Other`] and weighted as the
/// least likely tier instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Other(String),
}

impl Rarity {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Other(label) => label.as_str(),
        }
    }

    #[must_use]
    pub const fn is_rare(&self) -> bool {
        matches!(self, Self::Rare)
    }
}

impl Default for Rarity {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<&str> for Rarity {
    fn from(raw: &str) -> Self {
        let label = raw.trim().to_lowercase();
        match label.as_str() {
            "common" => Self::Common,
            "uncommon" => Self::Uncommon,
            "rare" => Self::Rare,
            _ => Self::Other(label),
        }
    }
}

impl From<String> for Rarity {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<Rarity> for String {
    fn from(rarity: Rarity) -> Self {
        rarity.as_str().to_string()
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a pipe-delimited tag cell into a normalized set.
#[must_use]
pub fn split_tags(cell: &str) -> BTreeSet<String> {
    cell.to_lowercase()
        .split('|')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// A harvestable ingredient as defined by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDefinition {
    pub name: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default, deserialize_with = "lenient_text")]
    pub environment: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub season: String,
    #[serde(
        rename = "required tag",
        alias = "required_tags",
        default,
        deserialize_with = "tag_cell"
    )]
    pub required_tags: BTreeSet<String>,
    #[serde(
        rename = "forbid tag",
        alias = "forbid_tags",
        default,
        deserialize_with = "tag_cell"
    )]
    pub forbid_tags: BTreeSet<String>,
    #[serde(
        rename = "specific tag",
        alias = "specific_tags",
        default,
        deserialize_with = "tag_cell"
    )]
    pub specific_tags: BTreeSet<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub mana: u32,
    #[serde(
        rename = "suroviny",
        alias = "resource_yield",
        default,
        deserialize_with = "lenient_u32"
    )]
    pub resource_yield: u32,
    #[serde(default, deserialize_with = "optional_text")]
    pub usage: Option<String>,
    #[serde(rename = "type", alias = "kind", default, deserialize_with = "optional_text")]
    pub kind: Option<String>,
}

impl IngredientDefinition {
    /// Create a definition with no tags, yields or descriptive text.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        rarity: Rarity,
        environment: impl Into<String>,
        season: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rarity,
            environment: environment.into(),
            season: season.into(),
            required_tags: BTreeSet::new(),
            forbid_tags: BTreeSet::new(),
            specific_tags: BTreeSet::new(),
            mana: 0,
            resource_yield: 0,
            usage: None,
            kind: None,
        }
    }

    #[must_use]
    pub fn with_required_tags(mut self, cell: &str) -> Self {
        self.required_tags = split_tags(cell);
        self
    }

    #[must_use]
    pub fn with_forbid_tags(mut self, cell: &str) -> Self {
        self.forbid_tags = split_tags(cell);
        self
    }

    #[must_use]
    pub fn with_specific_tags(mut self, cell: &str) -> Self {
        self.specific_tags = split_tags(cell);
        self
    }

    #[must_use]
    pub const fn with_yields(mut self, mana: u32, resource_yield: u32) -> Self {
        self.mana = mana;
        self.resource_yield = resource_yield;
        self
    }

    #[must_use]
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Whether the environment column is the `any` wildcard.
    #[must_use]
    pub fn grows_anywhere(&self) -> bool {
        self.environment.trim().to_lowercase() == crate::constants::ENV_ANY
    }

    /// Wildcard or substring match against a target environment.
    #[must_use]
    pub fn grows_in(&self, environment: &str) -> bool {
        self.grows_anywhere() || self.environment.contains(environment)
    }

    /// Whether any of this row's specific tags were selected.
    #[must_use]
    pub fn matches_specific(&self, selected_tags: &BTreeSet<String>) -> bool {
        !self.specific_tags.is_disjoint(selected_tags)
    }
}

/// Ordered, name-unique collection of ingredient definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    ingredients: Vec<IngredientDefinition>,
}

impl Catalog {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ingredients: Vec::new(),
        }
    }

    /// Build a catalog, rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateName`] when two rows share a name.
    pub fn from_ingredients(ingredients: Vec<IngredientDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(ingredients.len());
        for ingredient in &ingredients {
            if !seen.insert(ingredient.name.as_str()) {
                return Err(CatalogError::DuplicateName(ingredient.name.clone()));
            }
        }
        Ok(Self { ingredients })
    }

    /// Parse a catalog from its JSON array representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names are not unique.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let rows: Vec<IngredientDefinition> = serde_json::from_str(json)?;
        Self::from_ingredients(rows)
    }

    #[must_use]
    pub fn ingredients(&self) -> &[IngredientDefinition] {
        &self.ingredients
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IngredientDefinition> {
        self.ingredients.iter().find(|row| row.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

/// A tag as stored in the tag catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(rename = "tag_id", deserialize_with = "id_text")]
    pub id: String,
    #[serde(rename = "tag_name")]
    pub name: String,
    #[serde(rename = "tag_category")]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCategory {
    pub name: String,
    pub tags: Vec<TagEntry>,
}

/// Tags grouped by category, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TagCatalog {
    categories: Vec<TagCategory>,
}

impl TagCatalog {
    #[must_use]
    pub fn from_records(records: Vec<TagRecord>) -> Self {
        let mut categories: Vec<TagCategory> = Vec::new();
        for record in records {
            let entry = TagEntry {
                id: record.id,
                name: record.name,
            };
            if let Some(category) = categories
                .iter_mut()
                .find(|category| category.name == record.category)
            {
                category.tags.push(entry);
            } else {
                categories.push(TagCategory {
                    name: record.category,
                    tags: vec![entry],
                });
            }
        }
        Self { categories }
    }

    /// Parse the tag catalog from its JSON array representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into tag records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<TagRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    #[must_use]
    pub fn categories(&self) -> &[TagCategory] {
        &self.categories
    }

    /// Display name for a tag id, if the id is known.
    #[must_use]
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.categories
            .iter()
            .flat_map(|category| category.tags.iter())
            .find(|tag| tag.id == id)
            .map(|tag| tag.name.as_str())
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.display_name(id).is_some()
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value).unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value).filter(|text| !text.trim().is_empty()))
}

fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value).unwrap_or_default())
}

fn tag_cell<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let tags = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(value_to_text)
            .flat_map(|cell| split_tags(&cell))
            .collect(),
        other => value_to_text(other)
            .map(|cell| split_tags(&cell))
            .unwrap_or_default(),
    };
    Ok(tags)
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_lenient_u32(&value))
}

/// Interpret a loosely typed numeric cell, treating blanks and garbage as 0.
///
/// Strings keep only their leading integer part (`"12 vials"` is 12).
/// Negative values clamp to 0.
#[must_use]
pub fn parse_lenient_u32(value: &Value) -> u32 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().map(truncate_f64_to_u64))
            .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX)),
        Value::String(text) => leading_integer(text).map_or(0, |n| {
            if n <= 0 {
                0
            } else {
                u32::try_from(n).unwrap_or(u32::MAX)
            }
        }),
        _ => 0,
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end]
        .parse::<i64>()
        .ok()
        .map(|magnitude| sign * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_parses_known_and_unknown_labels() {
        assert_eq!(Rarity::from(" Common "), Rarity::Common);
        assert_eq!(Rarity::from("UNCOMMON"), Rarity::Uncommon);
        assert_eq!(Rarity::from("rare"), Rarity::Rare);
        assert_eq!(Rarity::from("legendary"), Rarity::Other("legendary".into()));
        assert!(!Rarity::Other("rare-ish".into()).is_rare());
    }

    #[test]
    fn split_tags_normalizes_cells() {
        let tags = split_tags(" Herb | ROOT||  ");
        assert_eq!(tags, BTreeSet::from(["herb".to_string(), "root".to_string()]));
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn lenient_numbers_cover_blank_and_garbage() {
        assert_eq!(parse_lenient_u32(&Value::Null), 0);
        assert_eq!(parse_lenient_u32(&Value::from("")), 0);
        assert_eq!(parse_lenient_u32(&Value::from("nan")), 0);
        assert_eq!(parse_lenient_u32(&Value::from("12 vials")), 12);
        assert_eq!(parse_lenient_u32(&Value::from("-3")), 0);
        assert_eq!(parse_lenient_u32(&Value::from(7)), 7);
        assert_eq!(parse_lenient_u32(&Value::from(4.9)), 4);
    }

    #[test]
    fn catalog_from_json_reads_spreadsheet_shaped_rows() {
        let json = r#"[
            {
                "name": "Moonpetal",
                "rarity": "Uncommon",
                "environment": "forest|swamp",
                "season": "spring|summer",
                "required tag": "night",
                "forbid tag": "Fire | drought",
                "specific tag": "flower",
                "mana": "15",
                "suroviny": null,
                "usage": "Brewed into sleeping draughts",
                "type": "herb"
            },
            {
                "name": "Plain moss",
                "rarity": "common",
                "environment": "any",
                "season": "any",
                "mana": "nan"
            }
        ]"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        let petal = catalog.get("Moonpetal").unwrap();
        assert_eq!(petal.rarity, Rarity::Uncommon);
        assert_eq!(petal.mana, 15);
        assert_eq!(petal.resource_yield, 0);
        assert!(petal.forbid_tags.contains("fire"));
        assert!(petal.forbid_tags.contains("drought"));
        assert_eq!(petal.kind.as_deref(), Some("herb"));
        let moss = catalog.get("Plain moss").unwrap();
        assert_eq!(moss.mana, 0);
        assert!(moss.grows_anywhere());
        assert!(moss.usage.is_none());
    }

    #[test]
    fn catalog_rejects_duplicate_names() {
        let rows = vec![
            IngredientDefinition::new("Twin", Rarity::Common, "any", "any"),
            IngredientDefinition::new("Twin", Rarity::Rare, "cave", "winter"),
        ];
        let err = Catalog::from_ingredients(rows).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(name) if name == "Twin"));
    }

    #[test]
    fn environment_matching_uses_wildcard_or_substring() {
        let row = IngredientDefinition::new("Reed", Rarity::Common, "swamp|lake", "any");
        assert!(row.grows_in("lake"));
        assert!(!row.grows_in("forest"));
        let wild = IngredientDefinition::new("Weed", Rarity::Common, " ANY ", "any");
        assert!(wild.grows_in("desert"));
    }

    #[test]
    fn tag_catalog_groups_by_category_in_first_seen_order() {
        let json = r#"[
            {"tag_id": 1, "tag_name": "Herbs", "tag_category": "Focus"},
            {"tag_id": "night", "tag_name": "Night", "tag_category": "Time"},
            {"tag_id": 3, "tag_name": "Roots", "tag_category": "Focus"}
        ]"#;
        let tags = TagCatalog::from_json(json).unwrap();
        let names: Vec<&str> = tags.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Focus", "Time"]);
        assert_eq!(tags.categories()[0].tags.len(), 2);
        assert_eq!(tags.display_name("1"), Some("Herbs"));
        assert_eq!(tags.display_name("night"), Some("Night"));
        assert!(!tags.contains("missing"));
    }
}
