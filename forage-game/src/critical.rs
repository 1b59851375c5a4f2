//! Critical success and failure post-processing.

use rand::Rng;
use smallvec::SmallVec;

use crate::catalog::{IngredientDefinition, Rarity};
use crate::config::CriticalConfig;
use crate::constants::{CRIT_MANA_NAME, CRIT_RESOURCE_NAME};
use crate::result::{CriticalFind, FoundIngredient, GenerationResult};
use crate::sampler::weighted_random;

/// One weighted option for the critical-success draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalCandidate<'a> {
    pub option: CriticalOption<'a>,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriticalOption<'a> {
    Uncommon(&'a IngredientDefinition),
    Rare(&'a IngredientDefinition),
    Mana(i64),
    Resource(i64),
}

impl CriticalOption<'_> {
    fn into_find(self) -> CriticalFind {
        match self {
            Self::Uncommon(def) | Self::Rare(def) => {
                CriticalFind::Ingredient(FoundIngredient::from_definition(def, 1))
            }
            Self::Mana(mana) => CriticalFind::Mana {
                name: CRIT_MANA_NAME.to_string(),
                mana,
            },
            Self::Resource(resource_yield) => CriticalFind::Resource {
                name: CRIT_RESOURCE_NAME.to_string(),
                resource_yield,
            },
        }
    }
}

/// At most four options: uncommon, rare, mana, resource.
pub type CriticalCandidates<'a> = SmallVec<[CriticalCandidate<'a>; 4]>;

/// Inclusive bonus window for a score: floor `max((score - floor_offset) * scale, scale)`,
/// ceiling `max((score - ceiling_offset) * scale, floor)`.
#[must_use]
pub fn bonus_range(score: i64, scale: i64, cfg: &CriticalConfig) -> (i64, i64) {
    let min = score
        .saturating_sub(cfg.floor_offset)
        .saturating_mul(scale)
        .max(scale);
    let max = score
        .saturating_sub(cfg.ceiling_offset)
        .saturating_mul(scale)
        .max(min);
    (min, max)
}

fn pick_by_rarity<'a, R: Rng>(
    catalog: &'a [IngredientDefinition],
    rarity: &Rarity,
    rng: &mut R,
) -> Option<&'a IngredientDefinition> {
    let matching: Vec<&IngredientDefinition> =
        catalog.iter().filter(|row| row.rarity == *rarity).collect();
    if matching.is_empty() {
        return None;
    }
    Some(matching[rng.gen_range(0..matching.len())])
}

/// Assemble the weighted options for a critical success.
///
/// Catalog-backed slots only appear when the catalog has a row of that rarity;
/// the two abstract slots are always present.
pub fn critical_candidates<'a, R: Rng>(
    catalog: &'a [IngredientDefinition],
    score: i64,
    cfg: &CriticalConfig,
    rng: &mut R,
) -> CriticalCandidates<'a> {
    let mut candidates = CriticalCandidates::new();

    if let Some(def) = pick_by_rarity(catalog, &Rarity::Uncommon, rng) {
        candidates.push(CriticalCandidate {
            option: CriticalOption::Uncommon(def),
            weight: cfg.uncommon_weight,
        });
    }
    if let Some(def) = pick_by_rarity(catalog, &Rarity::Rare, rng) {
        candidates.push(CriticalCandidate {
            option: CriticalOption::Rare(def),
            weight: cfg.rare_weight,
        });
    }

    let (mana_min, mana_max) = bonus_range(score, cfg.mana_scale, cfg);
    candidates.push(CriticalCandidate {
        option: CriticalOption::Mana(rng.gen_range(mana_min..=mana_max)),
        weight: cfg.mana_weight,
    });

    let (res_min, res_max) = bonus_range(score, cfg.resource_scale, cfg);
    candidates.push(CriticalCandidate {
        option: CriticalOption::Resource(rng.gen_range(res_min..=res_max)),
        weight: cfg.resource_weight,
    });

    candidates
}

/// Choose the critical find for a successful forage.
pub fn apply_critical_success<R: Rng>(
    result: &mut GenerationResult,
    catalog: &[IngredientDefinition],
    cfg: &CriticalConfig,
    rng: &mut R,
) {
    let candidates = critical_candidates(catalog, result.inputs.score, cfg, rng);
    let weights: SmallVec<[f64; 4]> = candidates.iter().map(|c| c.weight).collect();
    let Some(idx) = weighted_random(&weights, rng) else {
        return;
    };
    let find = candidates[idx].option.clone().into_find();
    log::debug!("Forage critical success | {} of {}", find.name(), candidates.len());
    result.rare_find = Some(find);
}

/// Halve the raw yield and every ingredient count, dropping emptied entries.
pub fn apply_critical_failure(result: &mut GenerationResult) {
    result.raw = result.raw.div_euclid(2);
    for found in &mut result.ingredients {
        found.count /= 2;
    }
    result.ingredients.retain(|found| found.count > 0);
    log::debug!(
        "Forage critical failure | raw:{} kept:{}",
        result.raw,
        result.ingredients.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::GenerationInputs;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn empty_result(score: i64, raw: i64) -> GenerationResult {
        GenerationResult {
            inputs: GenerationInputs {
                environment: "forest".into(),
                season: "spring".into(),
                score,
                hours: 1,
                tags: Vec::new(),
                critical_success: false,
                critical_failure: false,
            },
            raw,
            ingredients: Vec::new(),
            rare_find: None,
            rate_per_hour: 0,
            total_draws: 0,
            pool_size: 0,
        }
    }

    #[test]
    fn bonus_ranges_have_floors() {
        let cfg = CriticalConfig::default();
        assert_eq!(bonus_range(3, 5, &cfg), (5, 5));
        assert_eq!(bonus_range(12, 5, &cfg), (10, 35));
        assert_eq!(bonus_range(12, 10, &cfg), (20, 70));
        assert_eq!(bonus_range(8, 10, &cfg), (10, 30));
    }

    #[test]
    fn rare_slot_absent_without_rare_rows() {
        let catalog = vec![
            IngredientDefinition::new("Sage", Rarity::Common, "any", "any"),
            IngredientDefinition::new("Moss", Rarity::Uncommon, "any", "any"),
        ];
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let candidates = critical_candidates(&catalog, 12, &CriticalConfig::default(), &mut rng);
        assert_eq!(candidates.len(), 3);
        assert!(
            !candidates
                .iter()
                .any(|c| matches!(c.option, CriticalOption::Rare(_)))
        );
        assert!(matches!(
            candidates[0].option,
            CriticalOption::Uncommon(def) if def.name == "Moss"
        ));
    }

    #[test]
    fn full_candidate_list_has_expected_weights() {
        let catalog = vec![
            IngredientDefinition::new("Moss", Rarity::Uncommon, "any", "any"),
            IngredientDefinition::new("Starbloom", Rarity::Rare, "any", "any"),
        ];
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let candidates = critical_candidates(&catalog, 20, &CriticalConfig::default(), &mut rng);
        let weights: Vec<f64> = candidates.iter().map(|c| c.weight).collect();
        assert_eq!(weights, vec![1.0, 0.25, 1.0, 1.0]);
        match candidates[2].option {
            CriticalOption::Mana(mana) => assert!((50..=75).contains(&mana)),
            ref other => panic!("expected mana slot, got {other:?}"),
        }
        match candidates[3].option {
            CriticalOption::Resource(res) => assert!((100..=150).contains(&res)),
            ref other => panic!("expected resource slot, got {other:?}"),
        }
    }

    #[test]
    fn critical_success_sets_a_find() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let mut result = empty_result(6, 6);
        apply_critical_success(&mut result, &[], &CriticalConfig::default(), &mut rng);
        let find = result.rare_find.expect("abstract slots are always present");
        assert!(matches!(
            find,
            CriticalFind::Mana { mana: 5, .. } | CriticalFind::Resource { resource_yield: 10, .. }
        ));
    }

    #[test]
    fn critical_failure_halves_and_drops_empty_entries() {
        let sage = IngredientDefinition::new("Sage", Rarity::Common, "any", "any");
        let moss = IngredientDefinition::new("Moss", Rarity::Common, "any", "any");
        let mut result = empty_result(10, 21);
        result.ingredients = vec![
            FoundIngredient::from_definition(&sage, 5),
            FoundIngredient::from_definition(&moss, 1),
        ];
        apply_critical_failure(&mut result);
        assert_eq!(result.raw, 10);
        assert_eq!(result.ingredients.len(), 1);
        assert_eq!(result.ingredients[0].name, "Sage");
        assert_eq!(result.ingredients[0].count, 2);
        assert!(result.ingredients.iter().all(|found| found.count > 0));
    }
}
