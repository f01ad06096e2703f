//! Ranking index.
//!
//! Maps card name → statistics per archetype, applying the improvement
//! corrections from `BonusConfig`:
//!
//! - two-color archetypes get their own archetype bonus;
//! - the aggregate gets the mean color bonus plus a cross-archetype term,
//!   Σ (pair game count / aggregate game count) × pair bonus.

pub mod bonus;

use std::collections::HashMap;
use tracing::{debug, info};

use crate::cards::CardDatabase;
use crate::types::{Archetype, DraftError, RawStatsByArchetype, StatRecord};
pub use bonus::BonusConfig;

/// Archetype → (card name → record).
#[derive(Debug, Clone, Default)]
pub struct RankingIndex {
    by_archetype: HashMap<Archetype, HashMap<String, StatRecord>>,
}

impl RankingIndex {
    /// Build the index from raw per-archetype statistics.
    pub fn build(raw: &RawStatsByArchetype, bonuses: &BonusConfig) -> Self {
        let mut by_archetype: HashMap<Archetype, HashMap<String, StatRecord>> = HashMap::new();

        // Pairs first: the aggregate correction reads their game counts.
        for &pair in Archetype::PAIRS {
            let Some(records) = raw.get(&pair) else { continue };
            let bonus = if bonuses.enabled { bonuses.archetype_bonus(pair) } else { 0.0 };
            let map = records
                .iter()
                .map(|rec| {
                    let mut rec = rec.clone();
                    add_to_improvement(&mut rec, bonus);
                    (rec.name.clone(), rec)
                })
                .collect();
            by_archetype.insert(pair, map);
        }

        if let Some(records) = raw.get(&Archetype::XX) {
            let mut map = HashMap::with_capacity(records.len());
            for rec in records {
                let mut rec = rec.clone();
                if bonuses.enabled {
                    let bonus = bonuses.color_bonus(&rec.color)
                        + cross_archetype_bonus(&by_archetype, &rec, bonuses);
                    add_to_improvement(&mut rec, bonus);
                }
                map.insert(rec.name.clone(), rec);
            }
            by_archetype.insert(Archetype::XX, map);
        }

        info!(
            archetypes = by_archetype.len(),
            aggregate_cards = by_archetype.get(&Archetype::XX).map_or(0, HashMap::len),
            bonuses = bonuses.enabled,
            "Ranking index built"
        );

        Self { by_archetype }
    }

    /// Statistics for a card name within an archetype.
    pub fn lookup(&self, name: &str, archetype: Archetype) -> Result<&StatRecord, DraftError> {
        self.by_archetype
            .get(&archetype)
            .and_then(|m| m.get(name))
            .ok_or_else(|| DraftError::RankingNotFound {
                name: name.to_string(),
                archetype,
            })
    }

    /// Statistics for a card id, resolving its name through the database.
    pub fn ranking_for(
        &self,
        cards: &CardDatabase,
        card_id: u32,
        archetype: Archetype,
    ) -> Result<&StatRecord, DraftError> {
        let card = cards.card(card_id)?;
        self.lookup(&card.name, archetype)
    }

    /// Whether any statistics were loaded for an archetype.
    pub fn has_archetype(&self, archetype: Archetype) -> bool {
        self.by_archetype.contains_key(&archetype)
    }

    pub fn card_count(&self, archetype: Archetype) -> usize {
        self.by_archetype.get(&archetype).map_or(0, HashMap::len)
    }
}

fn add_to_improvement(rec: &mut StatRecord, bonus: f64) {
    if let Some(iwd) = rec.drawn_improvement_win_rate.as_mut() {
        *iwd += bonus;
    }
}

/// Game-count weighted sum of pair bonuses for an aggregate record.
fn cross_archetype_bonus(
    pairs: &HashMap<Archetype, HashMap<String, StatRecord>>,
    aggregate: &StatRecord,
    bonuses: &BonusConfig,
) -> f64 {
    if aggregate.game_count == 0 {
        return 0.0;
    }
    let total = aggregate.game_count as f64;
    Archetype::PAIRS
        .iter()
        .filter_map(|pair| {
            let rec = pairs.get(pair)?.get(&aggregate.name)?;
            Some(rec.game_count as f64 / total * bonuses.archetype_bonus(*pair))
        })
        .inspect(|term| debug!(card = %aggregate.name, term, "Cross-archetype term"))
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
