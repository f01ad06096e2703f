//! Hand-tuned corrections to the improvement win rate.
//!
//! Values are opaque configuration; the defaults match the tables in
//! `config.toml`.

use std::collections::BTreeMap;

use crate::config::TuningConfig;
use crate::types::{Archetype, Color, DraftError};

/// Per-color and per-archetype additive bonuses.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusConfig {
    pub enabled: bool,
    pub color: BTreeMap<Color, f64>,
    pub archetype: BTreeMap<Archetype, f64>,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: [
                (Color::W, 0.0041),
                (Color::U, 0.0042),
                (Color::G, 0.0),
                (Color::B, 0.0086),
                (Color::R, 0.0180),
            ]
            .into_iter()
            .collect(),
            archetype: Archetype::ALL.iter().map(|a| (*a, 0.0)).collect(),
        }
    }
}

impl BonusConfig {
    /// No corrections at all.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn from_tuning(tuning: &TuningConfig) -> Result<Self, DraftError> {
        Ok(Self {
            enabled: tuning.apply_bonuses,
            color: tuning.typed_color_bonuses()?,
            archetype: tuning.typed_archetype_bonuses()?,
        })
    }

    /// Mean color bonus over the symbols of a source color string.
    /// Empty strings (colorless) get zero; unknown symbols count as zero.
    pub fn color_bonus(&self, color: &str) -> f64 {
        let symbols: Vec<char> = color.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.is_empty() {
            return 0.0;
        }
        let total: f64 = symbols
            .iter()
            .map(|c| {
                Color::from_char(*c)
                    .and_then(|col| self.color.get(&col).copied())
                    .unwrap_or(0.0)
            })
            .sum();
        total / symbols.len() as f64
    }

    pub fn archetype_bonus(&self, archetype: Archetype) -> f64 {
        self.archetype.get(&archetype).copied().unwrap_or(0.0)
    }
}
