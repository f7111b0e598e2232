use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use playfeed_rust_core::clients::statsapi::STATSAPI_BASE_URL;
use playfeed_rust_core::clients::twitter::TWITTER_API_BASE_URL;
use playfeed_rust_core::clients::OAuthCredentials;

#[derive(Debug, Clone)]
pub struct Config {
    pub mlb_api_base_url: String,
    pub sport_id: u32,
    pub team_id: u64,
    pub schedule_timezone: Tz,

    pub poll_interval: Duration,
    pub run_once: bool,

    pub hashtags_enabled: bool,

    pub twitter_api_base_url: String,
    /// `None` only in dry-run mode
    pub twitter_credentials: Option<OAuthCredentials>,
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mlb_api_base_url =
            env::var("MLB_API_BASE_URL").unwrap_or_else(|_| STATSAPI_BASE_URL.to_string());

        let sport_id = parse_u32_env("SPORT_ID", 17)?;
        let team_id = parse_u64_env("TEAM_ID", 671)?;

        let schedule_timezone_str =
            env::var("SCHEDULE_TIMEZONE").unwrap_or_else(|_| "America/Los_Angeles".to_string());
        let schedule_timezone = parse_timezone(&schedule_timezone_str)?;

        let poll_interval_secs = parse_u64_env("POLL_INTERVAL_SECS", 30)?;
        if poll_interval_secs == 0 {
            return Err(anyhow!("POLL_INTERVAL_SECS must be at least 1"));
        }
        let run_once = parse_bool_env("RUN_ONCE", false);

        let hashtags_enabled = parse_bool_env("HASHTAGS_ENABLED", true);

        let twitter_api_base_url =
            env::var("TWITTER_API_BASE_URL").unwrap_or_else(|_| TWITTER_API_BASE_URL.to_string());
        let dry_run = parse_bool_env("DRY_RUN", false);
        let twitter_credentials = if dry_run {
            None
        } else {
            Some(twitter_credentials_from_env()?)
        };

        Ok(Self {
            mlb_api_base_url,
            sport_id,
            team_id,
            schedule_timezone,
            poll_interval: Duration::from_secs(poll_interval_secs),
            run_once,
            hashtags_enabled,
            twitter_api_base_url,
            twitter_credentials,
            dry_run,
        })
    }
}

fn twitter_credentials_from_env() -> Result<OAuthCredentials> {
    Ok(OAuthCredentials {
        consumer_key: required_env("TWITTER_CONSUMER_KEY")?,
        consumer_secret: required_env("TWITTER_CONSUMER_SECRET")?,
        access_token: required_env("TWITTER_ACCESS_TOKEN_KEY")?,
        access_token_secret: required_env("TWITTER_ACCESS_TOKEN_SECRET")?,
    })
}

fn required_env(key: &str) -> Result<String> {
    let value = env::var(key).with_context(|| format!("{key} must be set (or set DRY_RUN=true)"))?;
    if value.trim().is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_timezone(raw: &str) -> Result<Tz> {
    Tz::from_str(raw.trim()).map_err(|_| {
        anyhow!(
            "Invalid SCHEDULE_TIMEZONE: {} (expected IANA tz like America/Los_Angeles)",
            raw
        )
    })
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on"))
        .unwrap_or(default)
}

fn parse_u32_env(key: &str, default: u32) -> Result<u32> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    parse_u32(key, &raw)
}

fn parse_u32(key: &str, raw: &str) -> Result<u32> {
    let value = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Invalid {key}: {raw} (expected integer)"))?;
    u32::try_from(value).with_context(|| format!("Invalid {key}: {raw} (out of range)"))
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("Invalid {key}: {raw} (expected integer)"))
}
