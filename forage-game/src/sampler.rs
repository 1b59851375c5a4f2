//! Adaptive weighted draws from a candidate pool.
//!
//! Weights are recomputed from scratch before every draw. A second find of
//! the same ingredient spikes its weight, a third holds it on a plateau, and
//! from the fourth find onward the weight decays.

use std::collections::{BTreeSet, HashMap};

use rand::Rng;

use crate::catalog::IngredientDefinition;
use crate::config::{DrawWeighting, RarityWeights};
use crate::error::ForageError;
use crate::numbers::saturating_u64_to_usize;

/// Draws made so far in one sampling run, keyed by ingredient name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawCounter<'a> {
    counts: HashMap<&'a str, u32>,
}

impl<'a> DrawCounter<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn record(&mut self, name: &'a str) {
        let slot = self.counts.entry(name).or_insert(0);
        *slot = slot.saturating_add(1);
    }
}

/// Pick an index proportionally to `weights`.
///
/// Returns `None` only for an empty list. When the total weight is not
/// positive the last candidate is returned.
pub fn weighted_random<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let last = weights.len().checked_sub(1)?;
    let total: f64 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return Some(last);
    }

    let mut remaining = rng.r#gen::<f64>() * total;
    for (idx, weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining <= 0.0 {
            return Some(idx);
        }
    }
    Some(last)
}

/// Effective weight of `row` given how often it has already been drawn.
#[must_use]
pub fn draw_weight(
    row: &IngredientDefinition,
    times_drawn: u32,
    selected_tags: &BTreeSet<String>,
    rarity_weights: &RarityWeights,
    weighting: &DrawWeighting,
) -> f64 {
    let base = rarity_weights.for_rarity(&row.rarity);
    let mut weight = base;
    if row.matches_specific(selected_tags) {
        weight *= weighting.specific_boost;
    }
    match times_drawn {
        0 => {}
        1 => weight *= weighting.second_find_spike.mul_add(base, 1.0),
        2 => weight *= weighting.third_find_plateau,
        n => {
            let excess = f64::from(n - 2);
            weight /= excess.mul_add(weighting.repeat_decay, 1.0);
        }
    }
    weight
}

/// Draw `total_draws` entries from `pool` with default weighting.
///
/// # Errors
///
/// Returns [`ForageError::EmptyPool`] when draws are requested from an empty pool.
pub fn pick_from_pool<'a, R: Rng>(
    pool: &[&'a IngredientDefinition],
    total_draws: u64,
    selected_tags: &BTreeSet<String>,
    rng: &mut R,
) -> Result<Vec<&'a IngredientDefinition>, ForageError> {
    pick_from_pool_with_config(
        pool,
        total_draws,
        selected_tags,
        &RarityWeights::default(),
        &DrawWeighting::default(),
        rng,
    )
}

/// Draw `total_draws` entries from `pool`, in draw order.
///
/// # Errors
///
/// Returns [`ForageError::EmptyPool`] when draws are requested from an empty pool.
pub fn pick_from_pool_with_config<'a, R: Rng>(
    pool: &[&'a IngredientDefinition],
    total_draws: u64,
    selected_tags: &BTreeSet<String>,
    rarity_weights: &RarityWeights,
    weighting: &DrawWeighting,
    rng: &mut R,
) -> Result<Vec<&'a IngredientDefinition>, ForageError> {
    if pool.is_empty() {
        return Err(ForageError::EmptyPool { draws: total_draws });
    }

    let mut counter = DrawCounter::new();
    let mut picks = Vec::with_capacity(saturating_u64_to_usize(total_draws).min(4096));
    let mut weights = Vec::with_capacity(pool.len());

    for _ in 0..total_draws {
        weights.clear();
        weights.extend(pool.iter().map(|row| {
            draw_weight(
                row,
                counter.count(&row.name),
                selected_tags,
                rarity_weights,
                weighting,
            )
        }));
        let Some(idx) = weighted_random(&weights, rng) else {
            break;
        };
        let chosen = pool[idx];
        counter.record(chosen.name.as_str());
        picks.push(chosen);
    }

    log::debug!(
        "Forage draws | pool:{} draws:{}",
        pool.len(),
        picks.len()
    );
    Ok(picks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Rarity;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    fn none() -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn weight(row: &IngredientDefinition, times: u32) -> f64 {
        draw_weight(
            row,
            times,
            &none(),
            &RarityWeights::default(),
            &DrawWeighting::default(),
        )
    }

    #[test]
    fn zero_weights_fall_back_to_last_candidate() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(weighted_random(&[0.0, 0.0, 0.0], &mut rng), Some(2));
        }
        assert_eq!(weighted_random(&[], &mut rng), None);
    }

    #[test]
    fn weighted_random_never_picks_zero_weight_when_others_positive() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let idx = weighted_random(&[0.0, 1.0, 0.0, 2.0], &mut rng).unwrap();
            assert!(idx == 1 || idx == 3, "picked {idx}");
        }
    }

    #[test]
    fn second_find_spikes_then_decays() {
        let row = IngredientDefinition::new("Sage", Rarity::Uncommon, "any", "any");
        let first = weight(&row, 0);
        assert!((first - 0.35).abs() < 1e-12);
        let second = weight(&row, 1);
        assert!((second - 0.35 * (1.0 + 3.0 * 0.35)).abs() < 1e-12);
        assert!(second > first);
        assert!((weight(&row, 2) - 0.35 * 1.2).abs() < 1e-12);

        let mut previous = weight(&row, 3);
        for times in 4..12 {
            let next = weight(&row, times);
            assert!(next < previous, "weight did not decay at {times}");
            previous = next;
        }
    }

    #[test]
    fn specific_tags_boost_weight() {
        let row = IngredientDefinition::new("Chanterelle", Rarity::Common, "forest", "autumn")
            .with_specific_tags("mushroom");
        let selected: BTreeSet<String> = ["mushroom".to_string()].into();
        let boosted = draw_weight(
            &row,
            0,
            &selected,
            &RarityWeights::default(),
            &DrawWeighting::default(),
        );
        assert!((boosted - 1.6).abs() < 1e-12);
    }

    #[test]
    fn unknown_rarity_uses_lowest_weight() {
        let row = IngredientDefinition::new("Odd", Rarity::from("mythic"), "any", "any");
        assert!((weight(&row, 0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn pick_returns_exactly_n_entries_from_pool() {
        let catalog = vec![
            IngredientDefinition::new("A", Rarity::Common, "any", "any"),
            IngredientDefinition::new("B", Rarity::Rare, "any", "any"),
            IngredientDefinition::new("C", Rarity::Uncommon, "any", "any"),
        ];
        let pool: Vec<&IngredientDefinition> = catalog.iter().collect();
        let mut rng = SmallRng::seed_from_u64(99);
        for draws in [1_u64, 5, 40] {
            let picks = pick_from_pool(&pool, draws, &none(), &mut rng).unwrap();
            assert_eq!(picks.len() as u64, draws);
            assert!(picks.iter().all(|p| catalog.iter().any(|c| c.name == p.name)));
        }
    }

    #[test]
    fn repeat_counts_feed_back_into_later_draws() {
        let catalog = vec![
            IngredientDefinition::new("Sage", Rarity::Common, "any", "any"),
            IngredientDefinition::new("Thyme", Rarity::Common, "any", "any"),
        ];
        let pool: Vec<&IngredientDefinition> = catalog.iter().collect();
        // Every roll lands on 0.5 of the running total.
        let mut rng = StepRng::new(1 << 63, 0);
        let picks = pick_from_pool(&pool, 4, &none(), &mut rng).unwrap();
        let names: Vec<&str> = picks.iter().map(|p| p.name.as_str()).collect();
        // Sage: 1.0, then spike 4.0, plateau 1.2, decay 1/1.7 against Thyme at 1.0.
        assert_eq!(names, ["Sage", "Sage", "Sage", "Thyme"]);
    }

    #[test]
    fn empty_pool_is_an_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        let err = pick_from_pool(&[], 2, &none(), &mut rng).unwrap_err();
        assert_eq!(err, ForageError::EmptyPool { draws: 2 });
    }

    #[test]
    fn counter_tracks_names() {
        let mut counter = DrawCounter::new();
        counter.record("Sage");
        counter.record("Sage");
        assert_eq!(counter.count("Sage"), 2);
        assert_eq!(counter.count("Thyme"), 0);
    }
}
