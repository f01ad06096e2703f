//! Persistence layer.
//!
//! Saves and loads the statistics snapshot to/from a JSON file and reports
//! its age. The file's modification time is the only freshness signal.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::types::{Archetype, DraftError, RawStatsByArchetype, StatRecord};

/// Default snapshot file path.
pub const DEFAULT_SNAPSHOT_FILE: &str = "resources/rankings.json";

/// On-disk snapshot shapes. The earliest format was a bare list holding
/// only the aggregate ratings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    ByArchetype(RawStatsByArchetype),
    Flat(Vec<StatRecord>),
}

/// Save a snapshot, overwriting any existing file. Parent directories are
/// created as needed.
pub fn save_snapshot(stats: &RawStatsByArchetype, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_SNAPSHOT_FILE);
    let json = serde_json::to_string(stats).context("Failed to serialise stats snapshot")?;

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create snapshot directory for {path}"))?;
        }
    }
    std::fs::write(path, &json).context(format!("Failed to write snapshot to {path}"))?;

    debug!(path, archetypes = stats.len(), bytes = json.len(), "Snapshot saved");
    Ok(())
}

/// Load a snapshot.
/// Returns None if the file doesn't exist.
pub fn load_snapshot(path: Option<&str>) -> Result<Option<RawStatsByArchetype>> {
    let path = path.unwrap_or(DEFAULT_SNAPSHOT_FILE);

    if !Path::new(path).exists() {
        info!(path, "No stats snapshot found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path).context(format!("Failed to read snapshot from {path}"))?;
    let stats = parse_snapshot(&json, path)?;

    info!(
        path,
        archetypes = stats.len(),
        records = stats.values().map(Vec::len).sum::<usize>(),
        "Snapshot loaded from disk"
    );

    Ok(Some(stats))
}

/// Parse either snapshot shape.
pub fn parse_snapshot(json: &str, path: &str) -> Result<RawStatsByArchetype, DraftError> {
    let file: SnapshotFile = serde_json::from_str(json).map_err(|e| DraftError::Malformed {
        source_name: path.to_string(),
        message: e.to_string(),
    })?;

    Ok(match file {
        SnapshotFile::ByArchetype(map) => map,
        SnapshotFile::Flat(records) => {
            debug!(path, "Legacy flat snapshot, treating as aggregate ratings");
            let mut map = RawStatsByArchetype::new();
            map.insert(Archetype::XX, records);
            map
        }
    })
}

/// Modification time of the snapshot, or None if it doesn't exist.
pub fn snapshot_modified(path: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let path = path.unwrap_or(DEFAULT_SNAPSHOT_FILE);
    if !Path::new(path).exists() {
        return Ok(None);
    }
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .context(format!("Failed to read modification time of {path}"))?;
    Ok(Some(DateTime::<Utc>::from(modified)))
}

/// Delete the snapshot file (for testing or a forced refresh).
pub fn delete_snapshot(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_SNAPSHOT_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path).context(format!("Failed to delete snapshot {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("draftsignal_test_snapshot_{}.json", uuid::Uuid::new_v4()));
        p.to_string_lossy().to_string()
    }

    fn sample_stats() -> RawStatsByArchetype {
        let mut rec = StatRecord::named("Fleeting Spirit", "W");
        rec.ever_drawn_game_count = 1500;
        rec.ever_drawn_win_rate = Some(0.58);
        let mut stats = RawStatsByArchetype::new();
        stats.insert(Archetype::XX, vec![rec.clone()]);
        stats.insert(Archetype::WU, vec![rec]);
        stats
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path();
        save_snapshot(&sample_stats(), Some(&path)).unwrap();

        let loaded = load_snapshot(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&Archetype::WU][0].name, "Fleeting Spirit");
        assert_eq!(loaded[&Archetype::XX][0].ever_drawn_game_count, 1500);

        delete_snapshot(Some(&path)).unwrap();
    }

    #[test]
    fn test_load_nonexistent() {
        let loaded = load_snapshot(Some("/tmp/draftsignal_nonexistent_snapshot_12345.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_legacy_flat_snapshot() {
        let json = r#"[{"name": "Bat", "color": "B"}, {"name": "Cat", "color": "W"}]"#;
        let stats = parse_snapshot(json, "legacy.json").unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[&Archetype::XX].len(), 2);
    }

    #[test]
    fn test_malformed_snapshot() {
        let result = parse_snapshot(r#"{"QQ": 3}"#, "bad.json");
        assert!(matches!(result, Err(DraftError::Malformed { .. })));
    }

    #[test]
    fn test_modified_time() {
        let path = temp_path();
        assert!(snapshot_modified(Some(&path)).unwrap().is_none());
        save_snapshot(&sample_stats(), Some(&path)).unwrap();
        let modified = snapshot_modified(Some(&path)).unwrap().unwrap();
        assert!((Utc::now() - modified).num_seconds().abs() < 60);
        delete_snapshot(Some(&path)).unwrap();
    }

    #[test]
    fn test_delete_nonexistent_ok() {
        assert!(delete_snapshot(Some("/tmp/draftsignal_does_not_exist_xyz.json")).is_ok());
    }
}
