//! DRAFTSIGNAL: win-rate driven pick ranking for limited drafts
//!
//! Entry point. Loads configuration, initialises structured logging,
//! loads the card database and the (possibly refreshed) ratings snapshot,
//! then streams draft events through the pipeline and prints a report
//! for every pack shown.
//!
//! Usage: `draftsignal [config.toml] [events.jsonl | -]`

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use tracing::{error, info, warn};

use draftsignal::cards::CardDatabase;
use draftsignal::config;
use draftsignal::draft::DraftSession;
use draftsignal::engine::DraftAssistant;
use draftsignal::events::EventReader;
use draftsignal::stats::cache::StatsCache;
use draftsignal::stats::seventeen_lands::SeventeenLandsClient;
use draftsignal::stats::archetypes_of_interest;

const BANNER: &str = r#"
  ___  ___    _   ___ _____ ___ ___ ___ _  _   _   _
 |   \| _ \  /_\ | __|_   _/ __|_ _/ __| \| | /_\ | |
 | |) |   / / _ \| _|  | | \__ \| | (_ | .` |/ _ \| |__
 |___/|_|_\/_/ \_\_|   |_| |___/___\___|_|\_/_/ \_\____|

  Pick rankings and color signals from public win rates
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());
    let events_path = args.next().unwrap_or_else(|| "-".to_string());

    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        expansion = %cfg.stats.expansion,
        format = %cfg.stats.format,
        archetype_aware = cfg.stats.archetype_aware,
        max_age_days = cfg.stats.max_age_days,
        "DRAFTSIGNAL starting up"
    );

    // -- Static data -----------------------------------------------------

    let cards = CardDatabase::load(&cfg.cards.database_path)?;

    let source = SeventeenLandsClient::new(&cfg.stats)?;
    let cache = StatsCache::new(
        cfg.stats.cache_path.clone(),
        cfg.stats.max_age_days,
        archetypes_of_interest(cfg.stats.archetype_aware),
    );
    let raw = cache
        .load_or_refresh(&source)
        .await
        .context("Failed to load card ratings")?;

    let assistant = DraftAssistant::from_config(&cfg, cards, &raw)?;

    // -- Event loop ------------------------------------------------------

    let reader: Box<dyn BufRead> = if events_path == "-" {
        info!("Reading draft events from stdin");
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(&events_path)
            .with_context(|| format!("Failed to open event file: {events_path}"))?;
        info!(path = %events_path, "Reading draft events from file");
        Box::new(BufReader::new(file))
    };

    let mut session = DraftSession::new();
    let mut reports = 0usize;
    let mut failures = 0usize;

    for (line, parsed) in EventReader::new(reader) {
        let event = match parsed {
            Ok(event) => event,
            Err(e) => {
                warn!(line, error = %e, "Skipping unreadable event");
                failures += 1;
                continue;
            }
        };

        match assistant.handle_event(&mut session, &event) {
            Ok(Some(report)) => {
                print!("{}", report.render(assistant.report_config()));
                reports += 1;
            }
            Ok(None) => {}
            Err(e) => {
                error!(line, error = %e, "Report aborted");
                failures += 1;
            }
        }
    }

    info!(
        reports,
        failures,
        picks = session.pick_count(),
        draft_id = ?session.draft_id(),
        "Event stream finished"
    );

    Ok(())
}

/// Initialise the `tracing` subscriber. Logs go to stderr so reports on
/// stdout stay clean.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("draftsignal=info"));

    let json_logging = std::env::var("DRAFTSIGNAL_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
