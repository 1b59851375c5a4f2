//! Centralized balance and tuning constants for forage generation.
//!
//! These values define the default math for pool admission, draw weighting
//! and critical finds. `ForageConfig` starts from them and can be overridden
//! per call, but the defaults only change through reviewed code.

// Pool admission ----------------------------------------------------------
pub(crate) const ENV_ANY: &str = "any";
pub(crate) const ADMIT_CHANCE_FULL: f64 = 1.0;
pub(crate) const ADMIT_CHANCE_PARTIAL: f64 = 0.30;
pub(crate) const ADMIT_CHANCE_STRAY: f64 = 0.05;
pub(crate) const MIN_POOL_SIZE: usize = 3;

// Rarity base weights -----------------------------------------------------
pub(crate) const WEIGHT_COMMON: f64 = 1.0;
pub(crate) const WEIGHT_UNCOMMON: f64 = 0.35;
pub(crate) const WEIGHT_RARE: f64 = 0.12;
pub(crate) const WEIGHT_OTHER: f64 = 0.1;

// Draw weighting ----------------------------------------------------------
pub(crate) const SPECIFIC_BOOST: f64 = 1.6;
pub(crate) const SECOND_FIND_SPIKE: f64 = 3.0;
pub(crate) const THIRD_FIND_PLATEAU: f64 = 1.2;
pub(crate) const REPEAT_DECAY: f64 = 0.7;

// Draw rate ---------------------------------------------------------------
pub(crate) const RATE_SCORE_FLOOR: i64 = 5;
pub(crate) const RATE_TIER_WIDTH: i64 = 5;
pub(crate) const RATE_MIN_BASE: i64 = 1;
pub(crate) const RATE_MAX_BASE: i64 = 3;

// Critical finds ----------------------------------------------------------
pub(crate) const CRIT_UNCOMMON_WEIGHT: f64 = 1.0;
pub(crate) const CRIT_RARE_WEIGHT: f64 = 0.25;
pub(crate) const CRIT_MANA_WEIGHT: f64 = 1.0;
pub(crate) const CRIT_RESOURCE_WEIGHT: f64 = 1.0;
pub(crate) const CRIT_MANA_SCALE: i64 = 5;
pub(crate) const CRIT_RESOURCE_SCALE: i64 = 10;
pub(crate) const CRIT_FLOOR_OFFSET: i64 = 10;
pub(crate) const CRIT_CEILING_OFFSET: i64 = 5;
pub(crate) const CRIT_MANA_NAME: &str = "Abstract magical find";
pub(crate) const CRIT_RESOURCE_NAME: &str = "Abstract resource find";

// Seeding -----------------------------------------------------------------
pub(crate) const RNG_DOMAIN_TAG: &[u8] = b"forage.generate";
