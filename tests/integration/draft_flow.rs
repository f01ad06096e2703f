//! End-to-end draft scenarios.
//!
//! Ratings come from `MockSource` through the on-disk cache; events are
//! fed as JSON lines exactly as the binary reads them.

use chrono::{Duration, Utc};
use std::io::Cursor;

use draftsignal::cards::CardDatabase;
use draftsignal::config::AppConfig;
use draftsignal::draft::DraftSession;
use draftsignal::engine::DraftAssistant;
use draftsignal::events::{DraftEvent, EventReader};
use draftsignal::report::PackReport;
use draftsignal::stats::archetypes_of_interest;
use draftsignal::stats::cache::StatsCache;
use draftsignal::storage;
use draftsignal::types::{Archetype, DraftError};

use crate::mock_source::{rating, MockSource};

const CARDS_JSON: &str = r#"{
  "cards": {
    "1": { "name": "Bolt", "cost": ["1", "r"] },
    "2": { "name": "Angel", "cost": ["2", "w", "w"] },
    "3": { "name": "Sage", "cost": ["u"] },
    "4": { "name": "Drake", "cost": ["3", "u"] }
  }
}"#;

fn temp_path() -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("draftsignal_it_{}.json", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

fn config(cache_path: &str, apply_bonuses: bool) -> AppConfig {
    let toml = format!(
        r#"
[stats]
expansion = "VOW"
cache_path = "{cache_path}"
max_age_days = 5

[cards]
database_path = "unused.json"

[report]
popularity = "avg_pick"
color = false

[tuning]
apply_bonuses = {apply_bonuses}
"#
    );
    AppConfig::from_toml(&toml).unwrap()
}

fn source() -> MockSource {
    MockSource::uniform(vec![
        rating("Bolt", "R", 2.1, 1200, 0.60),
        rating("Angel", "W", 4.5, 900, 0.57),
        rating("Sage", "U", 7.0, 100, 0.52),
        rating("Drake", "U", 5.2, 400, 0.55),
    ])
}

async fn assistant(cfg: &AppConfig, source: &MockSource) -> DraftAssistant {
    let cache = StatsCache::new(
        cfg.stats.cache_path.clone(),
        cfg.stats.max_age_days,
        archetypes_of_interest(cfg.stats.archetype_aware),
    );
    let raw = cache.load_or_refresh(source).await.unwrap();
    let cards = CardDatabase::from_json(CARDS_JSON).unwrap();
    DraftAssistant::from_config(cfg, cards, &raw).unwrap()
}

/// Run every line through the assistant, collecting reports and errors.
fn replay(
    assistant: &DraftAssistant,
    session: &mut DraftSession,
    lines: &str,
) -> (Vec<PackReport>, Vec<(usize, DraftError)>) {
    let mut reports = Vec::new();
    let mut errors = Vec::new();
    for (line, parsed) in EventReader::new(Cursor::new(lines)) {
        let result = match parsed {
            Ok(event) => assistant.handle_event(session, &event),
            Err(e) => Err(e),
        };
        match result {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            Err(e) => errors.push((line, e)),
        }
    }
    (reports, errors)
}

fn names(rows: &[draftsignal::report::ReportRow]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_first_pack_ranks_and_scores_signals() {
    let path = temp_path();
    let cfg = config(&path, false);
    let src = source();
    let assistant = assistant(&cfg, &src).await;
    assert_eq!(src.requests().len(), Archetype::ALL.len());

    let mut session = DraftSession::new();
    let events = r#"{"type":"pack_shown","draft_id":"d1","pack_number":1,"pick_number":3,"card_ids":[3,2,1]}"#;
    let (reports, errors) = replay(&assistant, &mut session, events);
    assert!(errors.is_empty());
    assert_eq!(reports.len(), 1);

    let report = &reports[0];
    assert_eq!(report.archetype, Archetype::XX);
    assert_eq!(names(&report.by_popularity), vec!["Bolt", "Angel", "Sage"]);
    // Sage has only 100 drawn games.
    assert_eq!(names(&report.by_win_rate), vec!["Bolt", "Angel"]);

    // Pick 3 multiplier is 0.2: Bolt 10 × 0.2, Angel 3 × 0.2, Sage 0.
    assert!((session.signals().get("R") - 2.0).abs() < 1e-9);
    assert!((session.signals().get("W") - 0.6).abs() < 1e-9);
    assert_eq!(session.signals().get("U"), 0.0);
    assert_eq!(report.signals[0].0, "R");
    assert!(report.inventory.is_none());

    let text = report.render(assistant.report_config());
    assert!(text.contains("Pack 1, Pick: 3 == Sorted by ATA"));
    assert!(text.contains("====> Sorted by GIH WR for archetype XX"));
    assert!(text.contains("====> Signals"));
    assert!(text.contains("R: 2.00"));
    assert!(!text.contains("Printing inventory"));

    storage::delete_snapshot(Some(&path)).unwrap();
}

#[tokio::test]
async fn test_picks_steer_archetype_and_final_pick_prints_inventory() {
    let path = temp_path();
    let cfg = config(&path, false);
    let src = source();
    let assistant = assistant(&cfg, &src).await;

    let mut session = DraftSession::new();
    let events = r#"
{"type":"pack_shown","draft_id":"d1","pack_number":1,"pick_number":1,"card_ids":[1,2,3,4]}
{"type":"card_picked","pack_number":1,"pick_number":1,"card_id":2}
{"type":"pack_shown","draft_id":"d1","pack_number":1,"pick_number":2,"card_ids":[1,3,4]}
{"type":"card_picked","pack_number":1,"pick_number":2,"card_id":4}
{"type":"pack_shown","draft_id":"d1","pack_number":2,"pick_number":1,"card_ids":[1,3]}
{"type":"card_picked","pack_number":2,"pick_number":1,"card_id":3}
{"type":"pack_shown","draft_id":"d1","pack_number":3,"pick_number":14,"card_ids":[1]}
"#;
    let (reports, errors) = replay(&assistant, &mut session, events);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(reports.len(), 4);

    // One color alone is not an archetype yet.
    assert_eq!(reports[1].archetype, Archetype::XX);
    // Two white pips, then blue cards: W and U lead, W first on ties.
    assert_eq!(reports[2].archetype, Archetype::WU);
    assert_eq!(reports[3].archetype, Archetype::WU);
    assert!(reports[..3].iter().all(|r| r.inventory.is_none()));

    let inventory = reports[3].inventory.as_ref().unwrap();
    // Sage falls under the sample threshold; the rest sort by win rate.
    assert_eq!(names(inventory), vec!["Angel", "Drake"]);

    let text = reports[3].render(assistant.report_config());
    assert!(text.contains("Printing inventory"));
    assert!(text.contains("archetype WU"));

    storage::delete_snapshot(Some(&path)).unwrap();
}

#[tokio::test]
async fn test_signals_only_count_the_first_pack() {
    let path = temp_path();
    let cfg = config(&path, false);
    let src = source();
    let assistant = assistant(&cfg, &src).await;

    let mut session = DraftSession::new();
    let events = r#"
{"type":"pack_shown","draft_id":"d1","pack_number":1,"pick_number":9,"card_ids":[1]}
{"type":"pack_shown","draft_id":"d1","pack_number":2,"pick_number":9,"card_ids":[1]}
{"type":"pack_shown","draft_id":"d1","pack_number":3,"pick_number":9,"card_ids":[1]}
"#;
    let (reports, _) = replay(&assistant, &mut session, events);
    assert_eq!(reports.len(), 3);
    // worth 10 × multiplier 1.3, once.
    assert!((session.signals().get("R") - 13.0).abs() < 1e-9);

    storage::delete_snapshot(Some(&path)).unwrap();
}

#[tokio::test]
async fn test_new_draft_clears_picks_and_signals() {
    let path = temp_path();
    let cfg = config(&path, false);
    let src = source();
    let assistant = assistant(&cfg, &src).await;

    let mut session = DraftSession::new();
    let events = r#"
{"type":"pack_shown","draft_id":"d1","pack_number":1,"pick_number":9,"card_ids":[1]}
{"type":"card_picked","pack_number":1,"pick_number":9,"card_id":1}
{"type":"pack_shown","draft_id":"d2","pack_number":1,"pick_number":1,"card_ids":[2]}
"#;
    let (reports, _) = replay(&assistant, &mut session, events);
    assert_eq!(reports.len(), 2);
    assert_eq!(session.draft_id(), Some("d2"));
    assert_eq!(session.pick_count(), 0);
    // Pick 1 carries no weight, so the fresh board stays at zero.
    assert_eq!(session.signals().get("R"), 0.0);

    storage::delete_snapshot(Some(&path)).unwrap();
}

#[tokio::test]
async fn test_bad_lines_and_unknown_cards_do_not_stop_the_stream() {
    let path = temp_path();
    let cfg = config(&path, false);
    let src = source();
    let assistant = assistant(&cfg, &src).await;

    let mut session = DraftSession::new();
    let events = r#"
{"type":"pack_shown","draft_id":"d1","pack_number":1,"pick_number":9,"card_ids":[1,99]}
not json
{"type":"pack_shown","draft_id":"d1","pack_number":1,"pick_number":10,"card_ids":[1]}
"#;
    let (reports, errors) = replay(&assistant, &mut session, events);
    assert_eq!(reports.len(), 1);
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], (2, DraftError::CardNotFound(99))));
    assert!(matches!(errors[1], (3, DraftError::Malformed { .. })));
    // Only pick 10 scored: 10 × 1.5.
    assert!((session.signals().get("R") - 15.0).abs() < 1e-9);

    storage::delete_snapshot(Some(&path)).unwrap();
}

#[tokio::test]
async fn test_aggregate_improvement_carries_color_bonus() {
    let path = temp_path();
    let cfg = config(&path, true);
    let src = source();
    let assistant = assistant(&cfg, &src).await;

    let index = assistant.index();
    let aggregate = index.lookup("Bolt", Archetype::XX).unwrap();
    let pair = index.lookup("Bolt", Archetype::BR).unwrap();
    // Pair bonuses are all zero, so only the red bonus applies.
    assert!((aggregate.drawn_improvement_win_rate.unwrap() - 0.058).abs() < 1e-9);
    assert!((pair.drawn_improvement_win_rate.unwrap() - 0.04).abs() < 1e-9);

    let by_id = index.ranking_for(assistant.cards(), 2, Archetype::WU).unwrap();
    assert_eq!(by_id.name, "Angel");
    assert!(matches!(
        index.ranking_for(assistant.cards(), 42, Archetype::WU),
        Err(DraftError::CardNotFound(42))
    ));

    storage::delete_snapshot(Some(&path)).unwrap();
}

// ---------------------------------------------------------------------------
// Cache behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_fresh_snapshot_is_reused_and_stale_one_refetched() {
    let path = temp_path();
    let cache = StatsCache::new(path.clone(), 5, archetypes_of_interest(true));

    let first = source();
    let raw = cache.load_or_refresh(&first).await.unwrap();
    assert_eq!(raw.len(), Archetype::ALL.len());

    let broken = source();
    broken.set_error("offline");
    let reused = cache.load_or_refresh(&broken).await.unwrap();
    assert_eq!(reused[&Archetype::XX].len(), 4);
    assert!(broken.requests().is_empty());

    let later = Utc::now() + Duration::days(6);
    let err = cache.load_or_refresh_at(&broken, later).await.unwrap_err();
    assert!(err.to_string().contains("offline"));

    let second = source();
    cache.load_or_refresh_at(&second, later).await.unwrap();
    assert_eq!(second.requests().len(), Archetype::ALL.len());

    storage::delete_snapshot(Some(&path)).unwrap();
}

#[tokio::test]
async fn test_aggregate_only_mode_fetches_one_archetype() {
    let path = temp_path();
    let cache = StatsCache::new(path.clone(), 5, archetypes_of_interest(false));
    let src = source();
    let raw = cache.load_or_refresh(&src).await.unwrap();
    assert_eq!(src.requests(), vec![Archetype::XX]);
    assert_eq!(raw.len(), 1);

    storage::delete_snapshot(Some(&path)).unwrap();
}

#[test]
fn test_event_json_shape() {
    let line = r#"{"type":"card_picked","pack_number":2,"pick_number":5,"card_id":7}"#;
    let (_, parsed) = EventReader::new(Cursor::new(line)).next().unwrap();
    assert_eq!(
        parsed.unwrap(),
        DraftEvent::CardPicked { pack_number: 2, pick_number: 5, card_id: 7 }
    );
}
