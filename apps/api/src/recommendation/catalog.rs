use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::card::CardRecord;

/// Fatal catalog load failure. Distinct from a recommendation with zero matches.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog must be a JSON array of card entries")]
    NotAnArray,
}

/// The read-only card catalog, loaded once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<CardRecord>,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(
            "Loaded {} cards from catalog {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parses a catalog document. Entries that are not JSON objects are skipped.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let entries = match serde_json::from_str::<Value>(raw)? {
            Value::Array(entries) => entries,
            _ => return Err(CatalogError::NotAnArray),
        };

        let mut cards = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            if !entry.is_object() {
                warn!("Skipping catalog entry {index}: not an object");
                continue;
            }
            match serde_json::from_value::<CardRecord>(entry) {
                Ok(card) => cards.push(card),
                Err(e) => warn!("Skipping catalog entry {index}: {e}"),
            }
        }
        Ok(Self { cards })
    }

    #[cfg(test)]
    pub fn from_cards(cards: Vec<CardRecord>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[CardRecord] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
