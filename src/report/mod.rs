//! Pack reports.
//!
//! Builds the per-event views (by popularity, by win rate, signals,
//! end-of-draft inventory) from the ranking index and renders them as
//! text tables.

pub mod table;

use std::cmp::Ordering;
use std::fmt::Write as _;

use crate::cards::CardDatabase;
use crate::config::{PopularityStat, ReportConfig, WinRateSort};
use crate::ranking::RankingIndex;
use crate::types::{Archetype, DraftError, Pack, StatRecord};
use table::{TextTable, Tint};

const FIELD_NAMES: [&str; 11] = [
    "Color",
    "Name",
    "Archetype",
    "IWD",
    "IWD Arch",
    "GIH WR Arch",
    "GND WR Arch",
    "GIH WR Default",
    "GND WR Default",
    "Popularity",
    "Sample Size",
];

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One card's line in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub card_id: u32,
    pub name: String,
    /// Color string from the archetype ratings.
    pub color: String,
    pub archetype: Archetype,
    pub improvement_default: Option<f64>,
    pub improvement_archetype: Option<f64>,
    pub gih_wr_archetype: Option<f64>,
    pub gnd_wr_archetype: Option<f64>,
    pub gih_wr_default: Option<f64>,
    pub gnd_wr_default: Option<f64>,
    /// Average seen or average pick, per `ReportConfig::popularity`.
    pub popularity: Option<f64>,
    /// Games in which the card was drawn, within the archetype.
    pub sample_size: u64,
}

impl ReportRow {
    fn from_records(
        card_id: u32,
        archetype: Archetype,
        arch: &StatRecord,
        default: &StatRecord,
        popularity: PopularityStat,
    ) -> Self {
        Self {
            card_id,
            name: arch.name.clone(),
            color: arch.color.clone(),
            archetype,
            improvement_default: default.drawn_improvement_win_rate,
            improvement_archetype: arch.drawn_improvement_win_rate,
            gih_wr_archetype: arch.ever_drawn_win_rate,
            gnd_wr_archetype: arch.never_drawn_win_rate,
            gih_wr_default: default.ever_drawn_win_rate,
            gnd_wr_default: default.never_drawn_win_rate,
            popularity: popularity_of(arch, popularity),
            sample_size: arch.ever_drawn_game_count,
        }
    }

    fn win_rate_key(&self, sort: WinRateSort) -> Option<f64> {
        match sort {
            WinRateSort::EverDrawnWinRate => self.gih_wr_archetype,
            WinRateSort::Improvement => self.improvement_archetype,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.color.clone(),
            self.name.clone(),
            self.archetype.to_string(),
            pct(self.improvement_default),
            pct(self.improvement_archetype),
            pct(self.gih_wr_archetype),
            pct(self.gnd_wr_archetype),
            pct(self.gih_wr_default),
            pct(self.gnd_wr_default),
            self.popularity.map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
            self.sample_size.to_string(),
        ]
    }
}

pub fn popularity_of(rec: &StatRecord, stat: PopularityStat) -> Option<f64> {
    match stat {
        PopularityStat::AvgSeen => rec.avg_seen,
        PopularityStat::AvgPick => rec.avg_pick,
    }
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}%", v * 100.0))
}

/// Ascending with missing values last.
fn cmp_ascending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending with missing values last.
fn cmp_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        _ => cmp_ascending(a, b),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Read-only view over the index used to assemble report sections.
pub struct ReportBuilder<'a> {
    index: &'a RankingIndex,
    cards: &'a CardDatabase,
    config: &'a ReportConfig,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(index: &'a RankingIndex, cards: &'a CardDatabase, config: &'a ReportConfig) -> Self {
        Self { index, cards, config }
    }

    /// Rows for the given cards, in input order. Any missing card or
    /// ranking aborts the whole set.
    pub fn rows(&self, card_ids: &[u32], archetype: Archetype) -> Result<Vec<ReportRow>, DraftError> {
        card_ids
            .iter()
            .map(|&id| {
                let arch = self.index.ranking_for(self.cards, id, archetype)?;
                let default = self.index.ranking_for(self.cards, id, Archetype::XX)?;
                Ok(ReportRow::from_records(id, archetype, arch, default, self.config.popularity))
            })
            .collect()
    }

    /// Sort ascending by popularity (lower = more sought-after).
    pub fn sort_by_popularity(rows: &mut [ReportRow]) {
        rows.sort_by(|a, b| cmp_ascending(a.popularity, b.popularity));
    }

    /// Rows above the sample threshold, best win rate first.
    pub fn filtered_by_win_rate(&self, rows: &[ReportRow]) -> Vec<ReportRow> {
        let sort = self.config.sort_by;
        let mut kept: Vec<ReportRow> = rows
            .iter()
            .filter(|r| r.sample_size > self.config.min_sample_size)
            .cloned()
            .collect();
        kept.sort_by(|a, b| cmp_descending(a.win_rate_key(sort), b.win_rate_key(sort)));
        kept
    }
}

// ---------------------------------------------------------------------------
// Pack report
// ---------------------------------------------------------------------------

/// Everything produced for one pack event.
#[derive(Debug, Clone)]
pub struct PackReport {
    pub pack: Pack,
    pub archetype: Archetype,
    /// Section 1: every card, ascending popularity.
    pub by_popularity: Vec<ReportRow>,
    /// Section 2: sample-filtered cards, descending win rate.
    pub by_win_rate: Vec<ReportRow>,
    /// Section 3: signal totals, descending.
    pub signals: Vec<(String, f64)>,
    /// Section 4: picked cards on the final pick of the draft.
    pub inventory: Option<Vec<ReportRow>>,
}

impl PackReport {
    /// Render all sections as text.
    pub fn render(&self, config: &ReportConfig) -> String {
        let popularity = match config.popularity {
            PopularityStat::AvgSeen => "ALSA",
            PopularityStat::AvgPick => "ATA",
        };
        let sort = match config.sort_by {
            WinRateSort::EverDrawnWinRate => "GIH WR",
            WinRateSort::Improvement => "IWD",
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "\nPack {}, Pick: {} == Sorted by {popularity}",
            self.pack.pack_number, self.pack.pick_number
        );
        out.push_str(&rows_table(&self.by_popularity, popularity, config.color));

        let _ = writeln!(out, "====> Sorted by {sort} for archetype {}", self.archetype);
        out.push_str(&rows_table(&self.by_win_rate, popularity, config.color));

        let _ = writeln!(out, "====> Signals");
        out.push_str(&render_signals(&self.signals));

        if let Some(inventory) = &self.inventory {
            let _ = writeln!(out, "Printing inventory");
            out.push_str(&rows_table(inventory, popularity, config.color));
        }
        out
    }
}

fn rows_table(rows: &[ReportRow], popularity_header: &str, color: bool) -> String {
    let headers = FIELD_NAMES.map(|h| if h == "Popularity" { popularity_header } else { h });
    let mut table = TextTable::new(headers);
    for row in rows {
        table.add_row(row.cells(), Tint::for_card_color(&row.color));
    }
    table.render(color)
}

/// One `color: total` line per entry.
pub fn render_signals(signals: &[(String, f64)]) -> String {
    let mut out = String::new();
    for (color, total) in signals {
        let _ = writeln!(out, "{color}: {total:.2}");
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
