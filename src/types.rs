//! Shared types for the DRAFTSIGNAL assistant.
//!
//! These types form the data model used across all modules: colors and
//! archetype tags, card and statistics records, and the domain error enum.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// One of the five card colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    W,
    U,
    B,
    R,
    G,
}

impl Color {
    /// All colors in canonical WUBRG order.
    pub const ALL: &'static [Color] = &[Color::W, Color::U, Color::B, Color::R, Color::G];

    /// Parse a single cost or color symbol (case-insensitive).
    /// Generic, hybrid and numeric symbols yield `None`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let mut chars = symbol.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(c)
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::W),
            'U' => Some(Color::U),
            'B' => Some(Color::B),
            'R' => Some(Color::R),
            'G' => Some(Color::G),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Color::W => 'W',
            Color::U => 'U',
            Color::B => 'B',
            Color::R => 'R',
            Color::G => 'G',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ---------------------------------------------------------------------------
// Archetypes
// ---------------------------------------------------------------------------

/// A two-color archetype, or `XX` for the color-agnostic aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Archetype {
    WU,
    WB,
    WR,
    WG,
    UB,
    UR,
    UG,
    BR,
    BG,
    RG,
    XX,
}

impl Archetype {
    /// The ten two-color pairs, in the order the ratings source lists them.
    pub const PAIRS: &'static [Archetype] = &[
        Archetype::WU,
        Archetype::WB,
        Archetype::WR,
        Archetype::WG,
        Archetype::UB,
        Archetype::UR,
        Archetype::UG,
        Archetype::BR,
        Archetype::BG,
        Archetype::RG,
    ];

    /// All eleven recognized tags (pairs followed by the aggregate).
    pub const ALL: &'static [Archetype] = &[
        Archetype::WU,
        Archetype::WB,
        Archetype::WR,
        Archetype::WG,
        Archetype::UB,
        Archetype::UR,
        Archetype::UG,
        Archetype::BR,
        Archetype::BG,
        Archetype::RG,
        Archetype::XX,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::WU => "WU",
            Archetype::WB => "WB",
            Archetype::WR => "WR",
            Archetype::WG => "WG",
            Archetype::UB => "UB",
            Archetype::UR => "UR",
            Archetype::UG => "UG",
            Archetype::BR => "BR",
            Archetype::BG => "BG",
            Archetype::RG => "RG",
            Archetype::XX => "XX",
        }
    }

    /// The two colors of a pair; `None` for the aggregate.
    pub fn colors(&self) -> Option<[Color; 2]> {
        let mut chars = self.as_str().chars().map(Color::from_char);
        match (chars.next().flatten(), chars.next().flatten()) {
            (Some(a), Some(b)) => Some([a, b]),
            _ => None,
        }
    }

    /// The pair whose color set equals `{a, b}` in either order.
    pub fn from_pair(a: Color, b: Color) -> Option<Self> {
        Self::PAIRS.iter().copied().find(|arch| match arch.colors() {
            Some([x, y]) => (x == a && y == b) || (x == b && y == a),
            None => false,
        })
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Archetype::XX)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a tag such as `"WU"` (case-insensitive). Reversed pairs such as
/// `"UW"` are not recognized tags.
impl std::str::FromStr for Archetype {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Archetype::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == upper)
            .ok_or_else(|| DraftError::Config(format!("Unknown archetype tag: {s}")))
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// Static card attributes from the card database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRecord {
    /// Numeric identifier. Filled in from the database key on load.
    #[serde(default)]
    pub id: u32,
    pub name: String,
    /// Mana cost symbols, e.g. `["2", "w", "w"]`.
    #[serde(default)]
    pub cost: Vec<String>,
}

impl CardRecord {
    /// Colored pips of the mana cost, in cost order.
    pub fn color_pips(&self) -> impl Iterator<Item = Color> + '_ {
        self.cost.iter().filter_map(|s| Color::from_symbol(s))
    }

    /// Distinct colors of the mana cost in WUBRG order.
    pub fn color_identity(&self) -> Vec<Color> {
        let mut colors: Vec<Color> = self.color_pips().collect();
        colors.sort();
        colors.dedup();
        colors
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Observed statistics for one card within one archetype.
///
/// Field names follow the ratings source so snapshots can be written back
/// verbatim. Win rates are null in the source for cards with no games.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatRecord {
    pub name: String,
    /// Color identity string as emitted by the source ("W", "UB", "" ...).
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub seen_count: u64,
    #[serde(default)]
    pub avg_seen: Option<f64>,
    #[serde(default)]
    pub pick_count: u64,
    #[serde(default)]
    pub avg_pick: Option<f64>,
    #[serde(default)]
    pub game_count: u64,
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub opening_hand_game_count: u64,
    #[serde(default)]
    pub opening_hand_win_rate: Option<f64>,
    #[serde(default)]
    pub drawn_game_count: u64,
    #[serde(default)]
    pub drawn_win_rate: Option<f64>,
    #[serde(default)]
    pub ever_drawn_game_count: u64,
    #[serde(default)]
    pub ever_drawn_win_rate: Option<f64>,
    #[serde(default)]
    pub never_drawn_game_count: u64,
    #[serde(default)]
    pub never_drawn_win_rate: Option<f64>,
    #[serde(default)]
    pub drawn_improvement_win_rate: Option<f64>,
}

impl StatRecord {
    /// A record with only a name and color set. Handy for tests and fixtures.
    pub fn named(name: &str, color: &str) -> Self {
        StatRecord {
            name: name.to_string(),
            color: color.to_string(),
            rarity: None,
            seen_count: 0,
            avg_seen: None,
            pick_count: 0,
            avg_pick: None,
            game_count: 0,
            win_rate: None,
            opening_hand_game_count: 0,
            opening_hand_win_rate: None,
            drawn_game_count: 0,
            drawn_win_rate: None,
            ever_drawn_game_count: 0,
            ever_drawn_win_rate: None,
            never_drawn_game_count: 0,
            never_drawn_win_rate: None,
            drawn_improvement_win_rate: None,
        }
    }
}

/// Raw statistics as fetched or cached, keyed by archetype.
pub type RawStatsByArchetype = HashMap<Archetype, Vec<StatRecord>>;

// ---------------------------------------------------------------------------
// Packs
// ---------------------------------------------------------------------------

/// The cards currently offered, with their position in the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pack {
    pub pack_number: u32,
    pub pick_number: u32,
    pub card_ids: Vec<u32>,
}

impl fmt::Display for Pack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pack {}, Pick {} ({} cards)",
            self.pack_number,
            self.pick_number,
            self.card_ids.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for DRAFTSIGNAL.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Card not found in database: {0}")]
    CardNotFound(u32),

    #[error("No ranking for {name} in archetype {archetype}")]
    RankingNotFound { name: String, archetype: Archetype },

    #[error("Fetch failed ({archetype}): {message}")]
    FetchFailed { archetype: Archetype, message: String },

    #[error("Malformed data ({source_name}): {message}")]
    Malformed { source_name: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
