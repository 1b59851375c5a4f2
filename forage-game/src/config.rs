//! Tunable forage configuration with validated defaults.

use serde::{Deserialize, Serialize};

use crate::catalog::Rarity;
use crate::constants::{
    ADMIT_CHANCE_FULL, ADMIT_CHANCE_PARTIAL, ADMIT_CHANCE_STRAY, CRIT_CEILING_OFFSET,
    CRIT_FLOOR_OFFSET, CRIT_MANA_SCALE, CRIT_MANA_WEIGHT, CRIT_RARE_WEIGHT, CRIT_RESOURCE_SCALE,
    CRIT_RESOURCE_WEIGHT, CRIT_UNCOMMON_WEIGHT, MIN_POOL_SIZE, RATE_MAX_BASE, RATE_MIN_BASE,
    RATE_SCORE_FLOOR, RATE_TIER_WIDTH, REPEAT_DECAY, SECOND_FIND_SPIKE, SPECIFIC_BOOST,
    THIRD_FIND_PLATEAU, WEIGHT_COMMON, WEIGHT_OTHER, WEIGHT_RARE, WEIGHT_UNCOMMON,
};
use crate::error::ConfigError;

/// Base draw weight per rarity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityWeights {
    #[serde(default = "RarityWeights::default_common")]
    pub common: f64,
    #[serde(default = "RarityWeights::default_uncommon")]
    pub uncommon: f64,
    #[serde(default = "RarityWeights::default_rare")]
    pub rare: f64,
    #[serde(default = "RarityWeights::default_other")]
    pub other: f64,
}

impl RarityWeights {
    const fn default_common() -> f64 {
        WEIGHT_COMMON
    }

    const fn default_uncommon() -> f64 {
        WEIGHT_UNCOMMON
    }

    const fn default_rare() -> f64 {
        WEIGHT_RARE
    }

    const fn default_other() -> f64 {
        WEIGHT_OTHER
    }

    #[must_use]
    pub fn for_rarity(&self, rarity: &Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Other(_) => self.other,
        }
    }
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: Self::default_common(),
            uncommon: Self::default_uncommon(),
            rare: Self::default_rare(),
            other: Self::default_other(),
        }
    }
}

/// Pool admission chances keyed by how many of environment/season match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionConfig {
    #[serde(default = "AdmissionConfig::default_full")]
    pub full: f64,
    #[serde(default = "AdmissionConfig::default_partial")]
    pub partial: f64,
    #[serde(default = "AdmissionConfig::default_stray")]
    pub stray: f64,
    #[serde(default = "AdmissionConfig::default_min_pool_size")]
    pub min_pool_size: usize,
}

impl AdmissionConfig {
    const fn default_full() -> f64 {
        ADMIT_CHANCE_FULL
    }

    const fn default_partial() -> f64 {
        ADMIT_CHANCE_PARTIAL
    }

    const fn default_stray() -> f64 {
        ADMIT_CHANCE_STRAY
    }

    const fn default_min_pool_size() -> usize {
        MIN_POOL_SIZE
    }

    #[must_use]
    pub const fn chance(&self, env_match: bool, season_match: bool) -> f64 {
        match (env_match, season_match) {
            (true, true) => self.full,
            (true, false) | (false, true) => self.partial,
            (false, false) => self.stray,
        }
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            full: Self::default_full(),
            partial: Self::default_partial(),
            stray: Self::default_stray(),
            min_pool_size: Self::default_min_pool_size(),
        }
    }
}

/// Multipliers applied to base weights on every draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawWeighting {
    #[serde(default = "DrawWeighting::default_specific_boost")]
    pub specific_boost: f64,
    #[serde(default = "DrawWeighting::default_second_find_spike")]
    pub second_find_spike: f64,
    #[serde(default = "DrawWeighting::default_third_find_plateau")]
    pub third_find_plateau: f64,
    #[serde(default = "DrawWeighting::default_repeat_decay")]
    pub repeat_decay: f64,
}

impl DrawWeighting {
    const fn default_specific_boost() -> f64 {
        SPECIFIC_BOOST
    }

    const fn default_second_find_spike() -> f64 {
        SECOND_FIND_SPIKE
    }

    const fn default_third_find_plateau() -> f64 {
        THIRD_FIND_PLATEAU
    }

    const fn default_repeat_decay() -> f64 {
        REPEAT_DECAY
    }
}

impl Default for DrawWeighting {
    fn default() -> Self {
        Self {
            specific_boost: Self::default_specific_boost(),
            second_find_spike: Self::default_second_find_spike(),
            third_find_plateau: Self::default_third_find_plateau(),
            repeat_decay: Self::default_repeat_decay(),
        }
    }
}

/// Per-hour draw rate derived from the skill score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRate {
    #[serde(default = "DrawRate::default_score_floor")]
    pub score_floor: i64,
    #[serde(default = "DrawRate::default_tier_width")]
    pub tier_width: i64,
    #[serde(default = "DrawRate::default_min_base")]
    pub min_base: i64,
    #[serde(default = "DrawRate::default_max_base")]
    pub max_base: i64,
}

impl DrawRate {
    const fn default_score_floor() -> i64 {
        RATE_SCORE_FLOOR
    }

    const fn default_tier_width() -> i64 {
        RATE_TIER_WIDTH
    }

    const fn default_min_base() -> i64 {
        RATE_MIN_BASE
    }

    const fn default_max_base() -> i64 {
        RATE_MAX_BASE
    }
}

impl Default for DrawRate {
    fn default() -> Self {
        Self {
            score_floor: Self::default_score_floor(),
            tier_width: Self::default_tier_width(),
            min_base: Self::default_min_base(),
            max_base: Self::default_max_base(),
        }
    }
}

/// Slot weights and bonus scaling for critical successes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalConfig {
    #[serde(default = "CriticalConfig::default_uncommon_weight")]
    pub uncommon_weight: f64,
    #[serde(default = "CriticalConfig::default_rare_weight")]
    pub rare_weight: f64,
    #[serde(default = "CriticalConfig::default_mana_weight")]
    pub mana_weight: f64,
    #[serde(default = "CriticalConfig::default_resource_weight")]
    pub resource_weight: f64,
    #[serde(default = "CriticalConfig::default_mana_scale")]
    pub mana_scale: i64,
    #[serde(default = "CriticalConfig::default_resource_scale")]
    pub resource_scale: i64,
    #[serde(default = "CriticalConfig::default_floor_offset")]
    pub floor_offset: i64,
    #[serde(default = "CriticalConfig::default_ceiling_offset")]
    pub ceiling_offset: i64,
}

impl CriticalConfig {
    const fn default_uncommon_weight() -> f64 {
        CRIT_UNCOMMON_WEIGHT
    }

    const fn default_rare_weight() -> f64 {
        CRIT_RARE_WEIGHT
    }

    const fn default_mana_weight() -> f64 {
        CRIT_MANA_WEIGHT
    }

    const fn default_resource_weight() -> f64 {
        CRIT_RESOURCE_WEIGHT
    }

    const fn default_mana_scale() -> i64 {
        CRIT_MANA_SCALE
    }

    const fn default_resource_scale() -> i64 {
        CRIT_RESOURCE_SCALE
    }

    const fn default_floor_offset() -> i64 {
        CRIT_FLOOR_OFFSET
    }

    const fn default_ceiling_offset() -> i64 {
        CRIT_CEILING_OFFSET
    }
}

impl Default for CriticalConfig {
    fn default() -> Self {
        Self {
            uncommon_weight: Self::default_uncommon_weight(),
            rare_weight: Self::default_rare_weight(),
            mana_weight: Self::default_mana_weight(),
            resource_weight: Self::default_resource_weight(),
            mana_scale: Self::default_mana_scale(),
            resource_scale: Self::default_resource_scale(),
            floor_offset: Self::default_floor_offset(),
            ceiling_offset: Self::default_ceiling_offset(),
        }
    }
}

/// Complete tuning surface for one generation call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForageConfig {
    #[serde(default)]
    pub rarity_weights: RarityWeights,
    #[serde(default)]
    pub admission: AdmissionConfig,
    #[serde(default)]
    pub weighting: DrawWeighting,
    #[serde(default)]
    pub rate: DrawRate,
    #[serde(default)]
    pub critical: CriticalConfig,
}

impl ForageConfig {
    /// Parse a config override; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check every tunable against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = &self.rarity_weights;
        non_negative("rarity_weights.common", weights.common)?;
        non_negative("rarity_weights.uncommon", weights.uncommon)?;
        non_negative("rarity_weights.rare", weights.rare)?;
        non_negative("rarity_weights.other", weights.other)?;

        probability("admission.full", self.admission.full)?;
        probability("admission.partial", self.admission.partial)?;
        probability("admission.stray", self.admission.stray)?;

        non_negative("weighting.specific_boost", self.weighting.specific_boost)?;
        non_negative("weighting.second_find_spike", self.weighting.second_find_spike)?;
        non_negative("weighting.third_find_plateau", self.weighting.third_find_plateau)?;
        non_negative("weighting.repeat_decay", self.weighting.repeat_decay)?;

        if self.rate.tier_width <= 0 {
            return Err(ConfigError::NonPositive {
                field: "rate.tier_width",
                value: self.rate.tier_width,
            });
        }
        if self.rate.min_base > self.rate.max_base {
            return Err(ConfigError::RateWindow {
                min: self.rate.min_base,
                max: self.rate.max_base,
            });
        }
        if self.rate.min_base < 0 {
            return Err(ConfigError::MinViolation {
                field: "rate.min_base",
                min: 0.0,
                value: crate::numbers::i64_to_f64(self.rate.min_base),
            });
        }

        let critical = &self.critical;
        non_negative("critical.uncommon_weight", critical.uncommon_weight)?;
        non_negative("critical.rare_weight", critical.rare_weight)?;
        non_negative("critical.mana_weight", critical.mana_weight)?;
        non_negative("critical.resource_weight", critical.resource_weight)?;
        for (field, value) in [
            ("critical.mana_scale", critical.mana_scale),
            ("critical.resource_scale", critical.resource_scale),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::MinViolation {
            field,
            min: 0.0,
            value,
        })
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            value,
        })
    }
}
