//! Signal scoring.
//!
//! A card that is still in the pack late despite a good (low) popularity
//! number suggests its color is being passed. The score is
//! `worth[floor(popularity)] * multiplier[pick]`.

use std::collections::HashMap;
use tracing::debug;

use crate::config::TuningConfig;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Lookup tables for the scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTables {
    /// Base value for popularity buckets 1, 2, 3, ...
    pub worth: Vec<f64>,
    /// Multiplier for pick positions `first_scored_pick`, +1, ...
    pub multipliers: Vec<f64>,
    pub first_scored_pick: u32,
}

impl Default for SignalTables {
    fn default() -> Self {
        Self::from_tuning(&TuningConfig::default())
    }
}

impl SignalTables {
    pub fn from_tuning(tuning: &TuningConfig) -> Self {
        Self {
            worth: tuning.worth.clone(),
            multipliers: tuning.multipliers.clone(),
            first_scored_pick: tuning.first_scored_pick,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

pub struct SignalScorer {
    tables: SignalTables,
}

impl SignalScorer {
    pub fn new(tables: SignalTables) -> Self {
        Self { tables }
    }

    /// Base value of a popularity statistic. Buckets clamp to the table.
    pub fn worth(&self, popularity: f64) -> f64 {
        let Some(&last) = self.tables.worth.last() else { return 0.0 };
        if !popularity.is_finite() {
            return 0.0;
        }
        let bucket = (popularity.floor() as i64).max(1) as usize;
        self.tables.worth.get(bucket - 1).copied().unwrap_or(last)
    }

    /// Multiplier for a pick position. Picks before the table score zero;
    /// picks past its end use the last entry.
    pub fn multiplier(&self, pick: u32) -> f64 {
        if pick < self.tables.first_scored_pick {
            return 0.0;
        }
        let idx = (pick - self.tables.first_scored_pick) as usize;
        self.tables
            .multipliers
            .get(idx)
            .or(self.tables.multipliers.last())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn score(&self, pick: u32, popularity: f64) -> f64 {
        let score = self.worth(popularity) * self.multiplier(pick);
        debug!(pick, popularity, score, "Signal score");
        score
    }
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Running signal totals keyed by the source color string.
#[derive(Debug, Clone, Default)]
pub struct SignalBoard {
    totals: HashMap<String, f64>,
}

impl SignalBoard {
    pub fn add(&mut self, color: &str, score: f64) {
        *self.totals.entry(color.to_string()).or_insert(0.0) += score;
    }

    pub fn get(&self, color: &str) -> f64 {
        self.totals.get(color).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn clear(&mut self) {
        self.totals.clear();
    }

    /// Totals by descending score; equal scores by color key.
    pub fn sorted(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> =
            self.totals.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
