//! Forage Game Engine
//!
//! Platform-agnostic foraging logic for tabletop sessions: candidate pools,
//! adaptive weighted draws and critical finds. Catalogs arrive as already
//! loaded, immutable data and every call takes its random source explicitly.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod critical;
pub mod error;
pub mod generate;
pub mod numbers;
pub mod pool;
pub mod result;
pub mod rng;
pub mod sampler;
pub mod session;

// Re-export commonly used types
pub use catalog::{
    Catalog, IngredientDefinition, Rarity, TagCatalog, TagCategory, TagEntry, TagRecord,
    split_tags,
};
pub use config::{
    AdmissionConfig, CriticalConfig, DrawRate, DrawWeighting, ForageConfig, RarityWeights,
};
pub use critical::{
    CriticalCandidate, CriticalOption, apply_critical_failure, apply_critical_success,
    bonus_range, critical_candidates,
};
pub use error::{CatalogError, ConfigError, ForageError};
pub use generate::{generate, generate_with_config, rate_per_hour, raw_yield};
pub use pool::{
    Admission, Pool, admission_for, build_pool, build_pool_with_config, tag_gate,
};
pub use result::{CriticalFind, FoundIngredient, GenerationInputs, GenerationResult, tally_picks};
pub use rng::{CountingRng, ForageRng};
pub use sampler::{
    DrawCounter, draw_weight, pick_from_pool, pick_from_pool_with_config, weighted_random,
};
pub use session::{SessionContext, parse_form_int};

/// Trait for abstracting catalog loading operations
/// Platform-specific implementations should provide this
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the ingredient catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or parsed.
    fn load_ingredients(&self) -> Result<Catalog, Self::Error>;

    /// Load the tag catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the tags cannot be read or parsed.
    fn load_tags(&self) -> Result<TagCatalog, Self::Error>;
}

/// Loaded catalogs plus tuning, ready to serve generation calls.
#[derive(Debug, Clone)]
pub struct ForageEngine {
    catalog: Catalog,
    tags: TagCatalog,
    config: ForageConfig,
}

impl ForageEngine {
    /// Load both catalogs once from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if either catalog cannot be loaded.
    pub fn load<S: CatalogSource>(source: &S) -> Result<Self, S::Error> {
        let catalog = source.load_ingredients()?;
        let tags = source.load_tags()?;
        log::info!(
            "Forage engine loaded {} ingredients in {} tag categories",
            catalog.len(),
            tags.categories().len()
        );
        Ok(Self::new(catalog, tags))
    }

    #[must_use]
    pub fn new(catalog: Catalog, tags: TagCatalog) -> Self {
        Self {
            catalog,
            tags,
            config: ForageConfig::default(),
        }
    }

    /// Replace the tuning configuration after validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration violates an invariant.
    pub fn with_config(mut self, config: ForageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn tags(&self) -> &TagCatalog {
        &self.tags
    }

    #[must_use]
    pub const fn config(&self) -> &ForageConfig {
        &self.config
    }

    /// Run one forage with a stream derived from `seed`.
    ///
    /// # Errors
    ///
    /// Propagates [`ForageError`] from generation.
    pub fn generate(
        &self,
        ctx: &SessionContext,
        seed: u64,
    ) -> Result<GenerationResult, ForageError> {
        let mut rng = ForageRng::from_user_seed(seed);
        let result =
            generate_with_config(self.catalog.ingredients(), ctx, &self.config, &mut rng)?;
        log::debug!("Forage stream | seed:{seed} rng_draws:{}", rng.draws());
        Ok(result)
    }
}
