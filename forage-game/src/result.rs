//! Generation result shapes handed to renderers.

use serde::{Deserialize, Serialize};

use crate::catalog::{IngredientDefinition, Rarity};
use crate::session::SessionContext;

/// One named ingredient in the yield, with the static fields of its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundIngredient {
    pub name: String,
    pub count: u32,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub mana: u32,
    pub resource_yield: u32,
    pub usage: Option<String>,
    pub rarity: Rarity,
}

impl FoundIngredient {
    #[must_use]
    pub fn from_definition(def: &IngredientDefinition, count: u32) -> Self {
        Self {
            name: def.name.clone(),
            count,
            kind: def.kind.clone(),
            mana: def.mana,
            resource_yield: def.resource_yield,
            usage: def.usage.clone(),
            rarity: def.rarity.clone(),
        }
    }
}

/// Bonus awarded on a critical success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "find", rename_all = "snake_case")]
pub enum CriticalFind {
    Ingredient(FoundIngredient),
    Mana { name: String, mana: i64 },
    Resource { name: String, resource_yield: i64 },
}

impl CriticalFind {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Ingredient(found) => &found.name,
            Self::Mana { name, .. } | Self::Resource { name, .. } => name,
        }
    }

    #[must_use]
    pub fn mana(&self) -> i64 {
        match self {
            Self::Ingredient(found) => i64::from(found.mana),
            Self::Mana { mana, .. } => *mana,
            Self::Resource { .. } => 0,
        }
    }

    #[must_use]
    pub fn resource_yield(&self) -> i64 {
        match self {
            Self::Ingredient(found) => i64::from(found.resource_yield),
            Self::Resource { resource_yield, .. } => *resource_yield,
            Self::Mana { .. } => 0,
        }
    }

    #[must_use]
    pub const fn rarity(&self) -> Option<&Rarity> {
        match self {
            Self::Ingredient(found) => Some(&found.rarity),
            Self::Mana { .. } | Self::Resource { .. } => None,
        }
    }
}

/// Echo of the parameters a result was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationInputs {
    pub environment: String,
    pub season: String,
    pub score: i64,
    pub hours: i64,
    pub tags: Vec<String>,
    pub critical_success: bool,
    pub critical_failure: bool,
}

impl From<&SessionContext> for GenerationInputs {
    fn from(ctx: &SessionContext) -> Self {
        Self {
            environment: ctx.environment.clone(),
            season: ctx.season.clone(),
            score: ctx.score,
            hours: ctx.hours,
            tags: ctx.selected_tags.iter().cloned().collect(),
            critical_success: ctx.critical_success,
            critical_failure: ctx.critical_failure,
        }
    }
}

/// Complete outcome of one forage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub inputs: GenerationInputs,
    /// Generic resource ("suroviny") yield.
    pub raw: i64,
    /// Named finds in first-draw order.
    pub ingredients: Vec<FoundIngredient>,
    pub rare_find: Option<CriticalFind>,
    pub rate_per_hour: i64,
    pub total_draws: u64,
    pub pool_size: usize,
}

impl GenerationResult {
    #[must_use]
    pub fn ingredient(&self, name: &str) -> Option<&FoundIngredient> {
        self.ingredients.iter().find(|found| found.name == name)
    }

    /// Sum of all ingredient counts.
    #[must_use]
    pub fn total_found(&self) -> u64 {
        self.ingredients
            .iter()
            .map(|found| u64::from(found.count))
            .sum()
    }
}

/// Fold draws into per-name counts, keeping first-draw order.
#[must_use]
pub fn tally_picks(picks: &[&IngredientDefinition]) -> Vec<FoundIngredient> {
    let mut found: Vec<FoundIngredient> = Vec::new();
    for pick in picks {
        if let Some(existing) = found.iter_mut().find(|entry| entry.name == pick.name) {
            existing.count = existing.count.saturating_add(1);
        } else {
            found.push(FoundIngredient::from_definition(pick, 1));
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_keeps_first_draw_order_and_static_fields() {
        let sage = IngredientDefinition::new("Sage", Rarity::Common, "any", "any")
            .with_yields(2, 1)
            .with_kind("herb");
        let moss = IngredientDefinition::new("Moss", Rarity::Uncommon, "any", "any")
            .with_usage("Bandages");
        let picks = [&moss, &sage, &moss, &moss];
        let found = tally_picks(&picks);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Moss");
        assert_eq!(found[0].count, 3);
        assert_eq!(found[0].usage.as_deref(), Some("Bandages"));
        assert_eq!(found[1].count, 1);
        assert_eq!(found[1].mana, 2);
        assert_eq!(found[1].kind.as_deref(), Some("herb"));
    }

    #[test]
    fn critical_find_accessors() {
        let mana = CriticalFind::Mana {
            name: "Spark".into(),
            mana: 25,
        };
        assert_eq!(mana.name(), "Spark");
        assert_eq!(mana.mana(), 25);
        assert_eq!(mana.resource_yield(), 0);
        assert!(mana.rarity().is_none());

        let json = serde_json::to_value(&mana).unwrap();
        assert_eq!(json["find"], "mana");
    }
}
