//! Draft session state: picks so far and accumulated signals.

pub mod archetype;
pub mod signals;

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::cards::CardDatabase;
use crate::types::{Archetype, DraftError};
use signals::SignalBoard;

/// State of one draft. The only mutable state in the pipeline; owned by the
/// event loop and replaced wholesale by `reset` when a new draft starts.
#[derive(Debug, Clone, Default)]
pub struct DraftSession {
    draft_id: Option<String>,
    /// (pack, pick) → chosen card id.
    picks: BTreeMap<(u32, u32), u32>,
    signals: SignalBoard,
}

impl DraftSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft_id(&self) -> Option<&str> {
        self.draft_id.as_deref()
    }

    /// Whether `draft_id` names the draft this session is tracking.
    pub fn is_current(&self, draft_id: &str) -> bool {
        self.draft_id.as_deref() == Some(draft_id)
    }

    /// Start tracking a new draft, discarding picks and signals.
    pub fn reset(&mut self, new_draft_id: impl Into<String>) {
        let new_draft_id = new_draft_id.into();
        info!(
            previous = ?self.draft_id,
            draft_id = %new_draft_id,
            discarded_picks = self.picks.len(),
            "Starting a new draft"
        );
        self.draft_id = Some(new_draft_id);
        self.picks.clear();
        self.signals.clear();
    }

    /// Record a pick. A second pick at the same position replaces the first;
    /// the replaced card id is returned.
    pub fn record_pick(&mut self, pack: u32, pick: u32, card_id: u32) -> Option<u32> {
        let previous = self.picks.insert((pack, pick), card_id);
        debug!(pack, pick, card_id, replaced = ?previous, "Pick recorded");
        previous
    }

    /// Picked card ids in (pack, pick) order.
    pub fn picked_ids(&self) -> Vec<u32> {
        self.picks.values().copied().collect()
    }

    pub fn pick_at(&self, pack: u32, pick: u32) -> Option<u32> {
        self.picks.get(&(pack, pick)).copied()
    }

    pub fn pick_count(&self) -> usize {
        self.picks.len()
    }

    pub fn signals(&self) -> &SignalBoard {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut SignalBoard {
        &mut self.signals
    }

    /// Infer the archetype from every pick so far.
    pub fn infer_archetype(&self, cards: &CardDatabase) -> Result<Archetype, DraftError> {
        let picked = self
            .picks
            .values()
            .map(|id| cards.card(*id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(archetype::infer_archetype(picked))
    }
}
