//! Static card database.
//!
//! Loads the card database JSON (a `cards` object keyed by stringified
//! numeric id) and resolves card ids to names and mana costs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::types::{CardRecord, DraftError};

#[derive(Debug, Deserialize)]
struct DatabaseFile {
    cards: HashMap<String, CardRecord>,
}

/// Card id → static card attributes.
#[derive(Debug, Clone, Default)]
pub struct CardDatabase {
    cards: HashMap<u32, CardRecord>,
}

impl CardDatabase {
    /// Load the database from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read card database {}", path.display()))?;
        let db = Self::from_json(&json)
            .with_context(|| format!("Failed to parse card database {}", path.display()))?;
        info!(path = %path.display(), cards = db.len(), "Card database loaded");
        Ok(db)
    }

    /// Parse the database document. Keys that are not numeric ids are
    /// rejected as malformed.
    pub fn from_json(json: &str) -> Result<Self, DraftError> {
        let file: DatabaseFile = serde_json::from_str(json).map_err(|e| DraftError::Malformed {
            source_name: "card database".to_string(),
            message: e.to_string(),
        })?;

        let mut cards = HashMap::with_capacity(file.cards.len());
        for (key, mut card) in file.cards {
            let id: u32 = key.parse().map_err(|_| DraftError::Malformed {
                source_name: "card database".to_string(),
                message: format!("non-numeric card id: {key}"),
            })?;
            card.id = id;
            cards.insert(id, card);
        }
        Ok(Self { cards })
    }

    /// Build a database from records already in memory.
    pub fn from_cards(records: impl IntoIterator<Item = CardRecord>) -> Self {
        Self {
            cards: records.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn card(&self, card_id: u32) -> Result<&CardRecord, DraftError> {
        self.cards.get(&card_id).ok_or(DraftError::CardNotFound(card_id))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardRecord> {
        self.cards.values()
    }
}
