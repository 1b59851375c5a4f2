//! Candidate pool construction.
//!
//! Each catalog row passes through the tag gates, then is admitted with a
//! probability that depends on how well it fits the environment and season.
//! A small fallback tops the pool up so the sampler always has a few
//! ordinary candidates to work with.

use std::collections::{BTreeSet, HashSet};

use rand::Rng;

use crate::catalog::IngredientDefinition;
use crate::config::AdmissionConfig;

/// Session-scoped candidates, borrowed from the catalog.
pub type Pool<'a> = Vec<&'a IngredientDefinition>;

/// How a single row fared against the gates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    /// A required tag was not selected.
    MissingRequired,
    /// A forbidden tag was selected, or the environment itself is forbidden.
    Forbidden,
    /// A selected specific tag in a matching, named environment.
    Guaranteed,
    /// Admitted with the given chance.
    Chance(f64),
}

/// Required and forbidden tag checks shared by admission and the fallback.
#[must_use]
pub fn tag_gate(
    row: &IngredientDefinition,
    environment: &str,
    selected_tags: &BTreeSet<String>,
) -> Option<Admission> {
    if !row.required_tags.is_subset(selected_tags) {
        return Some(Admission::MissingRequired);
    }
    if !row.forbid_tags.is_disjoint(selected_tags) || row.forbid_tags.contains(environment) {
        return Some(Admission::Forbidden);
    }
    None
}

/// Classify one row without consuming randomness.
#[must_use]
pub fn admission_for(
    row: &IngredientDefinition,
    environment: &str,
    season: &str,
    selected_tags: &BTreeSet<String>,
    cfg: &AdmissionConfig,
) -> Admission {
    if let Some(blocked) = tag_gate(row, environment, selected_tags) {
        return blocked;
    }

    let env_any = row.grows_anywhere();
    let mut env_match = env_any || row.environment.contains(environment);
    let season_match = row.season.contains(season);
    let specific_match = row.matches_specific(selected_tags);

    if specific_match {
        if env_match && !env_any {
            return Admission::Guaranteed;
        }
        env_match = true;
    }

    Admission::Chance(cfg.chance(env_match, season_match))
}

/// Build the pool with default admission settings.
pub fn build_pool<'a, R: Rng>(
    catalog: &'a [IngredientDefinition],
    environment: &str,
    season: &str,
    selected_tags: &BTreeSet<String>,
    rng: &mut R,
) -> Pool<'a> {
    build_pool_with_config(
        catalog,
        environment,
        season,
        selected_tags,
        &AdmissionConfig::default(),
        rng,
    )
}

pub fn build_pool_with_config<'a, R: Rng>(
    catalog: &'a [IngredientDefinition],
    environment: &str,
    season: &str,
    selected_tags: &BTreeSet<String>,
    cfg: &AdmissionConfig,
    rng: &mut R,
) -> Pool<'a> {
    let mut pool: Pool<'a> = Vec::new();

    for row in catalog {
        match admission_for(row, environment, season, selected_tags, cfg) {
            Admission::MissingRequired | Admission::Forbidden => {}
            Admission::Guaranteed => pool.push(row),
            Admission::Chance(chance) => {
                let roll: f64 = rng.r#gen();
                if roll <= chance {
                    pool.push(row);
                }
            }
        }
    }

    let admitted = pool.len();
    if admitted < cfg.min_pool_size {
        top_up_pool(
            &mut pool,
            catalog,
            environment,
            selected_tags,
            cfg.min_pool_size,
            rng,
        );
    }

    log::debug!(
        "Forage pool | env:{environment} season:{season} admitted:{admitted} total:{}",
        pool.len()
    );
    pool
}

/// Draw ordinary rows for this environment until the pool reaches `target`.
///
/// Tag gates still apply: a fallback row never bypasses a required or
/// forbidden tag.
fn top_up_pool<'a, R: Rng>(
    pool: &mut Pool<'a>,
    catalog: &'a [IngredientDefinition],
    environment: &str,
    selected_tags: &BTreeSet<String>,
    target: usize,
    rng: &mut R,
) {
    let existing: HashSet<&str> = pool.iter().map(|row| row.name.as_str()).collect();
    let mut candidates: Vec<&'a IngredientDefinition> = catalog
        .iter()
        .filter(|row| !row.rarity.is_rare() && row.grows_in(environment))
        .filter(|row| tag_gate(row, environment, selected_tags).is_none())
        .filter(|row| !existing.contains(row.name.as_str()))
        .collect();

    while pool.len() < target && !candidates.is_empty() {
        let idx = rng.gen_range(0..candidates.len());
        let row = candidates.swap_remove(idx);
        log::trace!("Forage pool fallback | added {}", row.name);
        pool.push(row);
    }
}
