//! Mock ratings source for integration testing.
//!
//! Provides a deterministic `StatsSource` implementation that serves
//! fixed records per archetype and records every request, all in-memory
//! with no network access.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use draftsignal::stats::StatsSource;
use draftsignal::types::{Archetype, StatRecord};

/// A mock ratings source for deterministic testing.
pub struct MockSource {
    records: HashMap<Archetype, Vec<StatRecord>>,
    requests: Arc<Mutex<Vec<Archetype>>>,
    /// If set, every fetch returns this error.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockSource {
    /// Serve the same records for every archetype.
    pub fn uniform(records: Vec<StatRecord>) -> Self {
        let records = Archetype::ALL
            .iter()
            .map(|&a| (a, records.clone()))
            .collect();
        Self::with_records(records)
    }

    pub fn with_records(records: HashMap<Archetype, Vec<StatRecord>>) -> Self {
        Self {
            records,
            requests: Arc::new(Mutex::new(Vec::new())),
            force_error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Archetypes requested so far, in order.
    pub fn requests(&self) -> Vec<Archetype> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatsSource for MockSource {
    async fn fetch_ratings(&self, archetype: Archetype) -> Result<Vec<StatRecord>> {
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        self.requests.lock().unwrap().push(archetype);
        Ok(self.records.get(&archetype).cloned().unwrap_or_default())
    }
}

/// A rating record with the fields the pipeline reads.
pub fn rating(name: &str, color: &str, avg_pick: f64, games: u64, gih_wr: f64) -> StatRecord {
    let mut r = StatRecord::named(name, color);
    r.avg_pick = Some(avg_pick);
    r.avg_seen = Some(avg_pick + 0.5);
    r.ever_drawn_game_count = games;
    r.ever_drawn_win_rate = Some(gih_wr);
    r.never_drawn_win_rate = Some(gih_wr - 0.04);
    r.drawn_improvement_win_rate = Some(0.04);
    r
}
