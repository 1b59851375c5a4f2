//! End-to-end forage generation.

use rand::Rng;

use crate::catalog::IngredientDefinition;
use crate::config::{DrawRate, ForageConfig};
use crate::critical::{apply_critical_failure, apply_critical_success};
use crate::error::ForageError;
use crate::numbers::clamp_i64_to_u64;
use crate::pool::build_pool_with_config;
use crate::result::{GenerationInputs, GenerationResult, tally_picks};
use crate::sampler::pick_from_pool_with_config;
use crate::session::SessionContext;

/// Generic resource yield: `max(score, 0) * hours`.
#[must_use]
pub fn raw_yield(score: i64, hours: i64) -> i64 {
    score.max(0).saturating_mul(hours)
}

/// Roll the fixed per-hour draw rate for a call.
///
/// Scores below the floor never find named ingredients and consume no randomness.
pub fn rate_per_hour<R: Rng>(score: i64, rate: &DrawRate, rng: &mut R) -> i64 {
    if score < rate.score_floor {
        return 0;
    }
    let tier = (score - rate.score_floor)
        .checked_div(rate.tier_width)
        .unwrap_or(0);
    let low = rate.min_base.saturating_add(tier);
    let high = rate.max_base.saturating_add(tier).max(low);
    rng.gen_range(low..=high)
}

/// Generate a forage result with the default configuration.
///
/// # Errors
///
/// Returns [`ForageError::InvalidInput`] for non-positive score or hours and
/// [`ForageError::EmptyPool`] when draws are due but nothing qualifies.
pub fn generate<R: Rng>(
    catalog: &[IngredientDefinition],
    ctx: &SessionContext,
    rng: &mut R,
) -> Result<GenerationResult, ForageError> {
    generate_with_config(catalog, ctx, &ForageConfig::default(), rng)
}

/// Generate a forage result.
///
/// Success augmentation runs before failure halving when both flags are set.
///
/// # Errors
///
/// Returns [`ForageError::InvalidInput`] for non-positive score or hours,
/// [`ForageError::Config`] for an invalid configuration and
/// [`ForageError::EmptyPool`] when draws are due but nothing qualifies.
pub fn generate_with_config<R: Rng>(
    catalog: &[IngredientDefinition],
    ctx: &SessionContext,
    cfg: &ForageConfig,
    rng: &mut R,
) -> Result<GenerationResult, ForageError> {
    ctx.validate()?;
    cfg.validate()?;

    let raw = raw_yield(ctx.score, ctx.hours);
    let pool = build_pool_with_config(
        catalog,
        &ctx.environment,
        &ctx.season,
        &ctx.selected_tags,
        &cfg.admission,
        rng,
    );
    let rate = rate_per_hour(ctx.score, &cfg.rate, rng);
    let total_draws = clamp_i64_to_u64(rate.saturating_mul(ctx.hours));

    let picks = if total_draws == 0 {
        Vec::new()
    } else {
        pick_from_pool_with_config(
            &pool,
            total_draws,
            &ctx.selected_tags,
            &cfg.rarity_weights,
            &cfg.weighting,
            rng,
        )?
    };

    let mut result = GenerationResult {
        inputs: GenerationInputs::from(ctx),
        raw,
        ingredients: tally_picks(&picks),
        rare_find: None,
        rate_per_hour: rate,
        total_draws,
        pool_size: pool.len(),
    };

    if ctx.critical_success {
        apply_critical_success(&mut result, catalog, &cfg.critical, rng);
    }
    if ctx.critical_failure {
        apply_critical_failure(&mut result);
    }

    log::debug!(
        "Forage result | raw:{} rate:{} draws:{} kinds:{} critical:{}",
        result.raw,
        result.rate_per_hour,
        result.total_draws,
        result.ingredients.len(),
        result.rare_find.is_some()
    );
    Ok(result)
}
