//! Statistics cache.
//!
//! Serves the on-disk snapshot while it is fresh and refetches every
//! archetype of interest when it is missing, stale, or incomplete.
//! Staleness is judged by file modification time alone.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use super::{fetch_all, StatsSource};
use crate::storage;
use crate::types::{Archetype, RawStatsByArchetype};

/// Why a refresh was (or wasn't) needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Missing,
    Stale,
    Fresh,
}

/// TTL cache in front of a `StatsSource`.
pub struct StatsCache {
    path: String,
    max_age: Duration,
    archetypes: Vec<Archetype>,
}

impl StatsCache {
    pub fn new(path: impl Into<String>, max_age_days: i64, archetypes: &[Archetype]) -> Self {
        Self {
            path: path.into(),
            max_age: Duration::days(max_age_days),
            archetypes: archetypes.to_vec(),
        }
    }

    /// A snapshot is stale only once its age strictly exceeds the window.
    pub fn is_stale(&self, modified: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - modified > self.max_age
    }

    /// Freshness of the snapshot file as of `now`.
    pub fn freshness(&self, now: DateTime<Utc>) -> Result<Freshness> {
        Ok(match storage::snapshot_modified(Some(&self.path))? {
            None => Freshness::Missing,
            Some(modified) if self.is_stale(modified, now) => Freshness::Stale,
            Some(_) => Freshness::Fresh,
        })
    }

    /// Return cached ratings, refetching and overwriting the snapshot when
    /// needed. Fetch errors propagate unchanged.
    pub async fn load_or_refresh(&self, source: &dyn StatsSource) -> Result<RawStatsByArchetype> {
        self.load_or_refresh_at(source, Utc::now()).await
    }

    pub async fn load_or_refresh_at(
        &self,
        source: &dyn StatsSource,
        now: DateTime<Utc>,
    ) -> Result<RawStatsByArchetype> {
        match self.freshness(now)? {
            Freshness::Fresh => {
                if let Some(stats) = storage::load_snapshot(Some(&self.path))? {
                    let missing: Vec<Archetype> = self
                        .archetypes
                        .iter()
                        .copied()
                        .filter(|a| !stats.contains_key(a))
                        .collect();
                    if missing.is_empty() {
                        return Ok(stats);
                    }
                    warn!(path = %self.path, ?missing, "Snapshot lacks archetypes, refreshing");
                }
            }
            state => {
                info!(path = %self.path, ?state, max_age_days = self.max_age.num_days(), "Refreshing ratings");
            }
        }
        self.refresh(source).await
    }

    /// Fetch everything and overwrite the snapshot.
    pub async fn refresh(&self, source: &dyn StatsSource) -> Result<RawStatsByArchetype> {
        let stats = fetch_all(source, &self.archetypes).await?;
        storage::save_snapshot(&stats, Some(&self.path))?;
        info!(path = %self.path, archetypes = stats.len(), "Snapshot refreshed");
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
