//! Filesystem-backed catalog source.

use std::fs;
use std::path::{Path, PathBuf};

use forage_game::{Catalog, CatalogError, CatalogSource, TagCatalog};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// Reads the ingredient and tag catalogs from JSON files.
#[derive(Debug, Clone)]
pub struct FsCatalogSource {
    ingredients: PathBuf,
    tags: PathBuf,
}

impl FsCatalogSource {
    pub fn new(ingredients: impl Into<PathBuf>, tags: impl Into<PathBuf>) -> Self {
        Self {
            ingredients: ingredients.into(),
            tags: tags.into(),
        }
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl CatalogSource for FsCatalogSource {
    type Error = LoadError;

    fn load_ingredients(&self) -> Result<Catalog, Self::Error> {
        let json = read(&self.ingredients)?;
        Catalog::from_json(&json).map_err(|source| LoadError::Parse {
            path: self.ingredients.clone(),
            source,
        })
    }

    fn load_tags(&self) -> Result<TagCatalog, Self::Error> {
        let json = read(&self.tags)?;
        TagCatalog::from_json(&json).map_err(|source| LoadError::Parse {
            path: self.tags.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
    }

    #[test]
    fn bundled_data_loads() {
        let source = FsCatalogSource::new(data_path("ingredients.json"), data_path("tags.json"));
        let catalog = source.load_ingredients().unwrap();
        let tags = source.load_tags().unwrap();
        assert!(catalog.len() >= 10);
        assert!(!tags.categories().is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let source = FsCatalogSource::new("does/not/exist.json", data_path("tags.json"));
        let err = source.load_ingredients().unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
