//! Card rating statistics.
//!
//! Defines the `StatsSource` trait, the HTTP implementation for the public
//! ratings endpoint, and the TTL cache that sits in front of it.

pub mod cache;
pub mod seventeen_lands;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::types::{Archetype, RawStatsByArchetype, StatRecord};

/// Abstraction over per-archetype card rating sources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch ratings for one archetype. `Archetype::XX` asks for the
    /// color-agnostic aggregate.
    async fn fetch_ratings(&self, archetype: Archetype) -> Result<Vec<StatRecord>>;
}

/// Archetypes a session needs ratings for.
pub fn archetypes_of_interest(archetype_aware: bool) -> &'static [Archetype] {
    if archetype_aware {
        Archetype::ALL
    } else {
        &Archetype::ALL[Archetype::ALL.len() - 1..]
    }
}

/// Fetch every archetype of interest, one request at a time.
/// The first failure aborts the whole fetch.
pub async fn fetch_all(
    source: &dyn StatsSource,
    archetypes: &[Archetype],
) -> Result<RawStatsByArchetype> {
    let mut stats = RawStatsByArchetype::new();
    for &archetype in archetypes {
        let records = source.fetch_ratings(archetype).await?;
        info!(archetype = %archetype, records = records.len(), "Ratings fetched");
        stats.insert(archetype, records);
    }
    Ok(stats)
}
