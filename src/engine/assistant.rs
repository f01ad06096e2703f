//! Draft assistant. Routes draft events through inference, lookup,
//! signal scoring and report assembly.
//!
//! Holds only immutable data (card database, ranking index, tables);
//! the draft session is passed in by the caller for every event.

use anyhow::Result;
use tracing::{debug, info};

use crate::cards::CardDatabase;
use crate::config::{AppConfig, ReportConfig};
use crate::draft::signals::{SignalScorer, SignalTables};
use crate::draft::DraftSession;
use crate::events::DraftEvent;
use crate::ranking::{BonusConfig, RankingIndex};
use crate::report::{PackReport, ReportBuilder};
use crate::types::{Archetype, DraftError, Pack, RawStatsByArchetype};

pub struct DraftAssistant {
    cards: CardDatabase,
    index: RankingIndex,
    scorer: SignalScorer,
    report: ReportConfig,
    archetype_aware: bool,
}

impl DraftAssistant {
    pub fn new(
        cards: CardDatabase,
        index: RankingIndex,
        scorer: SignalScorer,
        report: ReportConfig,
        archetype_aware: bool,
    ) -> Self {
        Self {
            cards,
            index,
            scorer,
            report,
            archetype_aware,
        }
    }

    /// Build the index from raw stats using the tuning in `cfg`.
    pub fn from_config(cfg: &AppConfig, cards: CardDatabase, raw: &RawStatsByArchetype) -> Result<Self> {
        let bonuses = BonusConfig::from_tuning(&cfg.tuning)?;
        let index = RankingIndex::build(raw, &bonuses);
        let scorer = SignalScorer::new(SignalTables::from_tuning(&cfg.tuning));
        Ok(Self::new(
            cards,
            index,
            scorer,
            cfg.report.clone(),
            cfg.stats.archetype_aware,
        ))
    }

    pub fn cards(&self) -> &CardDatabase {
        &self.cards
    }

    pub fn index(&self) -> &RankingIndex {
        &self.index
    }

    pub fn report_config(&self) -> &ReportConfig {
        &self.report
    }

    /// Handle one event. Pack events produce a report; picks don't.
    pub fn handle_event(
        &self,
        session: &mut DraftSession,
        event: &DraftEvent,
    ) -> Result<Option<PackReport>, DraftError> {
        match event {
            DraftEvent::CardPicked {
                pack_number,
                pick_number,
                card_id,
            } => {
                self.on_pick(session, *pack_number, *pick_number, *card_id);
                Ok(None)
            }
            DraftEvent::PackShown {
                draft_id,
                pack_number,
                pick_number,
                card_ids,
            } => {
                if !session.is_current(draft_id) {
                    session.reset(draft_id.clone());
                }
                let pack = Pack {
                    pack_number: *pack_number,
                    pick_number: *pick_number,
                    card_ids: card_ids.clone(),
                };
                self.process_pack(session, &pack).map(Some)
            }
        }
    }

    pub fn on_pick(&self, session: &mut DraftSession, pack: u32, pick: u32, card_id: u32) {
        session.record_pick(pack, pick, card_id);
    }

    /// Archetype used for lookups: inferred from picks, or the aggregate
    /// when archetype awareness is off.
    pub fn current_archetype(&self, session: &DraftSession) -> Result<Archetype, DraftError> {
        if self.archetype_aware {
            session.infer_archetype(&self.cards)
        } else {
            Ok(Archetype::XX)
        }
    }

    /// Build the report for one pack and update signal totals.
    ///
    /// All lookups happen before the session is touched, so a failed
    /// lookup leaves the signal totals unchanged.
    pub fn process_pack(&self, session: &mut DraftSession, pack: &Pack) -> Result<PackReport, DraftError> {
        let archetype = self.current_archetype(session)?;
        let builder = ReportBuilder::new(&self.index, &self.cards, &self.report);

        let mut by_popularity = builder.rows(&pack.card_ids, archetype)?;
        ReportBuilder::sort_by_popularity(&mut by_popularity);
        let by_win_rate = builder.filtered_by_win_rate(&by_popularity);

        let is_final = pack.pack_number == self.report.final_pack
            && pack.pick_number == self.report.final_pick;
        let inventory = if is_final {
            let picked = builder.rows(&session.picked_ids(), archetype)?;
            Some(builder.filtered_by_win_rate(&picked))
        } else {
            None
        };

        if pack.pack_number == self.report.signal_pack {
            for row in &by_popularity {
                let Some(popularity) = row.popularity else {
                    debug!(card = %row.name, "No popularity statistic, skipping signal");
                    continue;
                };
                let score = self.scorer.score(pack.pick_number, popularity);
                session.signals_mut().add(&row.color, score);
            }
        }

        info!(
            pack = pack.pack_number,
            pick = pack.pick_number,
            archetype = %archetype,
            cards = pack.card_ids.len(),
            picks = session.pick_count(),
            inventory = is_final,
            "Pack processed"
        );

        Ok(PackReport {
            pack: pack.clone(),
            archetype,
            by_popularity,
            by_win_rate,
            signals: session.signals().sorted(),
            inventory,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
