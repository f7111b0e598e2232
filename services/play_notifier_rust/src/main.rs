mod config;

use anyhow::Result;
use config::Config;
use dotenv::dotenv;
use log::{debug, error, info, warn};
use playfeed_rust_core::clients::{DryRunPoster, StatsApiClient, StatsApiConfig, TwitterClient};
use playfeed_rust_core::models::GameStatus;
use playfeed_rust_core::{
    CycleReport, MessagePoster, PlayTracker, SnapshotStore, TrackerConfig, TrackerError,
};
use tokio::time::{interval, MissedTickBehavior};

fn build_poster(cfg: &Config) -> Box<dyn MessagePoster> {
    match &cfg.twitter_credentials {
        Some(credentials) if !cfg.dry_run => Box::new(TwitterClient::new(
            cfg.twitter_api_base_url.clone(),
            credentials.clone(),
        )),
        _ => Box::new(DryRunPoster),
    }
}

fn log_report(report: &CycleReport) {
    let Some(game_pk) = report.game_pk else {
        return;
    };
    let status = report.status.as_ref().map(GameStatus::as_str).unwrap_or("unknown");
    if report.sent > 0 || report.failed > 0 || report.final_sent {
        info!(
            "Game {} ({}): fragments={} sent={} duplicates={} failed={} final={}",
            game_pk,
            status,
            report.fragments,
            report.sent,
            report.duplicates,
            report.failed,
            report.final_sent
        );
    } else {
        debug!(
            "Game {} ({}): no new messages (fragments={} bootstrapped={} restated={})",
            game_pk, status, report.fragments, report.bootstrapped, report.restated
        );
    }
}

fn log_cycle_error(err: &TrackerError) {
    match err {
        TrackerError::Fetch { .. } => warn!("Cycle skipped, will retry: {}", err),
        TrackerError::Malformed(_) => error!("Cycle skipped: {}", err),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    info!("Starting play notifier...");

    let cfg = Config::from_env()?;
    info!(
        "Config: team={} sport={} tz={} interval={}s hashtags={} dry_run={}",
        cfg.team_id,
        cfg.sport_id,
        cfg.schedule_timezone.name(),
        cfg.poll_interval.as_secs(),
        cfg.hashtags_enabled,
        cfg.dry_run,
    );

    let feed = StatsApiClient::new(StatsApiConfig {
        base_url: cfg.mlb_api_base_url.clone(),
        sport_id: cfg.sport_id,
        team_id: cfg.team_id,
        schedule_timezone: cfg.schedule_timezone,
    });
    let poster = build_poster(&cfg);
    info!("Posting via {}", poster.poster_name());

    let tracker = PlayTracker::new(
        feed,
        poster,
        TrackerConfig {
            team_id: cfg.team_id,
            hashtags_enabled: cfg.hashtags_enabled,
        },
    );
    let mut store = SnapshotStore::new();

    if cfg.run_once {
        let report = tracker.run_cycle(&mut store).await?;
        log_report(&report);
        return Ok(());
    }

    // A slow cycle delays the next tick; cycles never overlap.
    let mut ticker = interval(cfg.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match tracker.run_cycle(&mut store).await {
                    Ok(report) => log_report(&report),
                    Err(e) => log_cycle_error(&e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested, stopping after {} tracked messages", store.dispatched_count());
                break;
            }
        }
    }

    Ok(())
}
