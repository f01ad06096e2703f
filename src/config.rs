//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The tuning tables (color bonuses, archetype bonuses, signal tables)
//! default to the hand-tuned values and may be overridden per file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

use crate::types::{Archetype, Color, DraftError};

/// Upper bound for the freshness window and the query date range.
pub const MAX_WINDOW_DAYS: i64 = 365;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub stats: StatsConfig,
    pub cards: CardsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub tuning: TuningConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Set code, e.g. "VOW".
    pub expansion: String,
    #[serde(default = "default_format")]
    pub format: String,
    /// Width of the date window requested from the source.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// Snapshot older than this is refetched.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
    #[serde(default = "default_cache_path")]
    pub cache_path: String,
    /// Fetch and rank per two-color archetype, not just the aggregate.
    #[serde(default = "default_true")]
    pub archetype_aware: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CardsConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

/// Which statistic orders the pack and feeds the signal scorer.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PopularityStat {
    AvgSeen,
    AvgPick,
}

/// Descending sort key of the filtered view.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WinRateSort {
    EverDrawnWinRate,
    Improvement,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Cards need strictly more drawn games than this for the filtered view.
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: u64,
    #[serde(default = "default_popularity")]
    pub popularity: PopularityStat,
    #[serde(default = "default_sort_by")]
    pub sort_by: WinRateSort,
    /// Only picks from this pack feed the signal accumulator.
    #[serde(default = "default_signal_pack")]
    pub signal_pack: u32,
    #[serde(default = "default_final_pack")]
    pub final_pack: u32,
    #[serde(default = "default_final_pick")]
    pub final_pick: u32,
    /// ANSI color output.
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_sample_size: default_min_sample_size(),
            popularity: default_popularity(),
            sort_by: default_sort_by(),
            signal_pack: default_signal_pack(),
            final_pack: default_final_pack(),
            final_pick: default_final_pick(),
            color: true,
        }
    }
}

/// Hand-tuned correction and scoring tables.
#[derive(Debug, Deserialize, Clone)]
pub struct TuningConfig {
    #[serde(default = "default_true")]
    pub apply_bonuses: bool,
    /// Color symbol → improvement bonus.
    #[serde(default = "default_color_bonuses")]
    pub color_bonuses: BTreeMap<String, f64>,
    /// Archetype tag → improvement bonus.
    #[serde(default = "default_archetype_bonuses")]
    pub archetype_bonuses: BTreeMap<String, f64>,
    /// Base value per popularity bucket, starting at bucket 1.
    #[serde(default = "default_worth")]
    pub worth: Vec<f64>,
    /// Multiplier per pick position, starting at `first_scored_pick`.
    #[serde(default = "default_multipliers")]
    pub multipliers: Vec<f64>,
    #[serde(default = "default_first_scored_pick")]
    pub first_scored_pick: u32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            apply_bonuses: true,
            color_bonuses: default_color_bonuses(),
            archetype_bonuses: default_archetype_bonuses(),
            worth: default_worth(),
            multipliers: default_multipliers(),
            first_scored_pick: default_first_scored_pick(),
        }
    }
}

impl TuningConfig {
    /// Typed view of `color_bonuses`. Fails on unknown color symbols.
    pub fn typed_color_bonuses(&self) -> Result<BTreeMap<Color, f64>, DraftError> {
        self.color_bonuses
            .iter()
            .map(|(k, v)| {
                Color::from_symbol(k)
                    .map(|c| (c, *v))
                    .ok_or_else(|| DraftError::Config(format!("Unknown color in color_bonuses: {k}")))
            })
            .collect()
    }

    /// Typed view of `archetype_bonuses`. Fails on unknown tags.
    pub fn typed_archetype_bonuses(&self) -> Result<BTreeMap<Archetype, f64>, DraftError> {
        self.archetype_bonuses
            .iter()
            .map(|(k, v)| k.parse::<Archetype>().map(|a| (a, *v)))
            .collect()
    }
}

fn default_base_url() -> String {
    "https://www.17lands.com/card_ratings/data".to_string()
}
fn default_format() -> String {
    "PremierDraft".to_string()
}
fn default_lookback_days() -> i64 {
    60
}
fn default_max_age_days() -> i64 {
    5
}
fn default_cache_path() -> String {
    "resources/rankings.json".to_string()
}
fn default_database_path() -> String {
    "resources/database.json".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_min_sample_size() -> u64 {
    200
}
fn default_popularity() -> PopularityStat {
    PopularityStat::AvgSeen
}
fn default_sort_by() -> WinRateSort {
    WinRateSort::EverDrawnWinRate
}
fn default_signal_pack() -> u32 {
    1
}
fn default_final_pack() -> u32 {
    3
}
fn default_final_pick() -> u32 {
    14
}
fn default_first_scored_pick() -> u32 {
    2
}

fn default_color_bonuses() -> BTreeMap<String, f64> {
    [("W", 0.0041), ("U", 0.0042), ("G", 0.0), ("B", 0.0086), ("R", 0.0180)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn default_archetype_bonuses() -> BTreeMap<String, f64> {
    Archetype::ALL
        .iter()
        .map(|a| (a.as_str().to_string(), 0.0))
        .collect()
}

fn default_worth() -> Vec<f64> {
    vec![15.0, 10.0, 8.0, 3.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
}

fn default_multipliers() -> Vec<f64> {
    vec![0.0, 0.2, 0.35, 0.5, 0.7, 0.85, 1.0, 1.3, 1.5, 1.7, 1.8, 2.0, 2.2, 2.5]
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.stats.expansion.trim().is_empty() {
            return Err(DraftError::Config("stats.expansion must not be empty".into()));
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.stats.max_age_days) {
            return Err(DraftError::Config(format!(
                "stats.max_age_days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.stats.lookback_days) {
            return Err(DraftError::Config(format!(
                "stats.lookback_days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }
        if self.tuning.worth.is_empty() || self.tuning.multipliers.is_empty() {
            return Err(DraftError::Config("tuning.worth and tuning.multipliers must not be empty".into()));
        }
        self.tuning.typed_color_bonuses()?;
        self.tuning.typed_archetype_bonuses()?;
        Ok(())
    }
}
