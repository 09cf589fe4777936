//! # Configuration
//!
//! Startup configuration from environment variables (with `.env` support) or a
//! YAML/JSON file. Both sources fill the same raw layer, which is then validated
//! into a `Config`. Every validation failure is fatal at startup.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.1.0: Reject zero and out-of-range reminder offsets, collapse repeats
//! - 2.0.0: Config file support (`CONFIG_FILE` / `--config-file`), presence servers
//! - 1.1.0: Display timezone and message language
//! - 1.0.0: Environment-only configuration

use crate::core::duration::Language;
use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration as StdDuration;

pub const DEFAULT_STATUS_TITLE: &str = "Online players";
pub const DEFAULT_POINTER_PATH: &str = "cache.txt";
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";
pub const DEFAULT_TICK_MS: u64 = 1000;
pub const DEFAULT_QUERY_EVERY_S: u64 = 60;

/// A monitored game server and the HTTP endpoint reporting its players
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerEndpoint {
    pub name: String,
    pub url: String,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub status_channel_id: u64,
    pub join_leave_channel_id: u64,
    pub events_channel_id: Option<u64>,
    pub status_title: String,
    pub pointer_path: String,
    pub show_join_leave: bool,
    pub pin_player_list: bool,
    pub eventer_enabled: bool,
    pub reminder_offsets: Vec<Duration>,
    pub scheduler_tick: StdDuration,
    pub display_timezone: Tz,
    pub language: Language,
    pub servers: Vec<ServerEndpoint>,
    pub poll_interval: StdDuration,
    pub log_level: String,
    /// `None` logs to stderr
    pub log_file: Option<String>,
}

/// Channel ids may be written as numbers or strings in config files
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Snowflake {
    Num(u64),
    Text(String),
}

impl Snowflake {
    fn parse(&self, field: &str) -> Result<u64> {
        match self {
            Snowflake::Num(n) => Ok(*n),
            Snowflake::Text(s) => s
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{field} is not a valid channel id: {s:?}")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDiscord {
    bot_token: Option<String>,
    channel_id_status: Option<Snowflake>,
    channel_id_joinleave: Option<Snowflake>,
    channel_id_events: Option<Snowflake>,
    status_title: Option<String>,
    cache_path: Option<String>,
    show_join_leave: Option<bool>,
    pin_player_list: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEventer {
    enabled: Option<bool>,
    reminders: Vec<String>,
    tick_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDisplay {
    timezone: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPresence {
    servers: Vec<ServerEndpoint>,
    query_every_s: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    discord: RawDiscord,
    eventer: RawEventer,
    display: RawDisplay,
    presence: RawPresence,
    log_level: Option<String>,
    log_file: Option<String>,
}

impl Config {
    /// Load from `--config-file <path>` / `CONFIG_FILE` when given, else from the environment.
    pub fn load() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let from_args = args
            .iter()
            .position(|a| a == "--config-file")
            .and_then(|i| args.get(i + 1).cloned());
        let path = from_args.or_else(|| env_value("CONFIG_FILE"));

        match path {
            Some(path) => Self::from_file(&path),
            None => Self::from_env(),
        }
    }

    /// Parse a YAML (or JSON) configuration file
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        Self::from_yaml(&contents).with_context(|| format!("Failed to parse config file {path}"))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(contents)?;
        Self::resolve(raw)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_value)
    }

    /// Build from an arbitrary variable lookup (empty values count as unset)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let get_bool = |name: &str| get(name).map(|v| parse_bool(&v));
        let get_u64 = |name: &str| -> Result<Option<u64>> {
            get(name)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .with_context(|| format!("{name} is not a valid number: {v}"))
                })
                .transpose()
        };

        let servers = match get("PRESENCE_SERVERS") {
            Some(value) => parse_servers(&value).context("Failed to parse PRESENCE_SERVERS")?,
            None => Vec::new(),
        };

        let raw = RawConfig {
            discord: RawDiscord {
                bot_token: get("DISCORD_BOT_TOKEN"),
                channel_id_status: get("DISCORD_CHANNEL_ID_STATUS").map(Snowflake::Text),
                channel_id_joinleave: get("DISCORD_CHANNEL_ID_JOINLEAVE").map(Snowflake::Text),
                channel_id_events: get("DISCORD_CHANNEL_ID_EVENTS").map(Snowflake::Text),
                status_title: get("DISCORD_STATUS_TITLE"),
                cache_path: get("DISCORD_CACHE_PATH"),
                show_join_leave: get_bool("DISCORD_SHOW_JOINLEAVE"),
                pin_player_list: get_bool("DISCORD_PIN_PLAYERLIST"),
            },
            eventer: RawEventer {
                enabled: get_bool("EVENTER_ENABLED"),
                reminders: get("EVENTER_REMINDERS")
                    .map(|v| {
                        v.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
                tick_ms: get_u64("EVENTER_TICK_MS")?,
            },
            display: RawDisplay {
                timezone: get("DISPLAY_TIMEZONE"),
                language: get("MESSAGE_LANGUAGE"),
            },
            presence: RawPresence {
                servers,
                query_every_s: get_u64("PRESENCE_QUERY_EVERY_S")?,
            },
            log_level: get("LOG_LEVEL"),
            log_file: get("LOG_FILE"),
        };

        Self::resolve(raw)
    }

    fn resolve(raw: RawConfig) -> Result<Self> {
        let discord_token = raw
            .discord
            .bot_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("No discord bot token configured"))?;

        let status_channel_id = raw
            .discord
            .channel_id_status
            .as_ref()
            .ok_or_else(|| anyhow!("No discord status channel ID configured"))?
            .parse("status channel")?;

        let join_leave_channel_id = match &raw.discord.channel_id_joinleave {
            Some(id) => id.parse("join/leave channel")?,
            None => status_channel_id,
        };

        let events_channel_id = raw
            .discord
            .channel_id_events
            .as_ref()
            .map(|id| id.parse("events channel"))
            .transpose()?;

        let eventer_enabled = raw.eventer.enabled.unwrap_or(false);
        if eventer_enabled && events_channel_id.is_none() {
            return Err(anyhow!("Event reminders enabled but no events channel configured"));
        }

        let reminder_offsets = if raw.eventer.reminders.is_empty() {
            vec![Duration::hours(24), Duration::hours(2), Duration::minutes(15)]
        } else {
            parse_offsets(&raw.eventer.reminders).context("Failed to parse reminder offsets")?
        };

        let tz_name = raw
            .display
            .timezone
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let display_timezone: Tz = tz_name
            .trim()
            .parse()
            .map_err(|e| anyhow!("Could not load display timezone {tz_name:?}: {e}"))?;

        let language = raw
            .display
            .language
            .as_deref()
            .map(Language::from_selector)
            .unwrap_or(Language::German);

        if raw.presence.servers.is_empty() {
            return Err(anyhow!("No presence servers configured"));
        }

        let log_file = raw.log_file.filter(|f| f.trim() != "-" && !f.trim().is_empty());

        Ok(Config {
            discord_token,
            status_channel_id,
            join_leave_channel_id,
            events_channel_id,
            status_title: raw
                .discord
                .status_title
                .unwrap_or_else(|| DEFAULT_STATUS_TITLE.to_string()),
            pointer_path: raw
                .discord
                .cache_path
                .unwrap_or_else(|| DEFAULT_POINTER_PATH.to_string()),
            show_join_leave: raw.discord.show_join_leave.unwrap_or(true),
            pin_player_list: raw.discord.pin_player_list.unwrap_or(true),
            eventer_enabled,
            reminder_offsets,
            scheduler_tick: StdDuration::from_millis(
                raw.eventer.tick_ms.filter(|ms| *ms > 0).unwrap_or(DEFAULT_TICK_MS),
            ),
            display_timezone,
            language,
            servers: raw.presence.servers,
            poll_interval: StdDuration::from_secs(
                raw.presence
                    .query_every_s
                    .filter(|s| *s > 0)
                    .unwrap_or(DEFAULT_QUERY_EVERY_S),
            ),
            log_level: raw.log_level.unwrap_or_else(|| "info".to_string()),
            log_file,
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Longest accepted reminder offset
pub const MAX_OFFSET_WEEKS: i64 = 52;

static OFFSET_PATTERN: OnceLock<Regex> = OnceLock::new();

fn offset_pattern() -> Result<&'static Regex> {
    if let Some(re) = OFFSET_PATTERN.get() {
        return Ok(re);
    }
    let re = Regex::new(r"(?i)^\s*(\d+)\s*(m|min|minutes?|h|hours?|d|days?|w|weeks?)\s*$")?;
    Ok(OFFSET_PATTERN.get_or_init(|| re))
}

/// Parse a reminder offset such as `15 minutes`, `2 hours`, `1 day`, `1 week` or `30m`.
///
/// Offsets must be positive and at most [`MAX_OFFSET_WEEKS`] weeks.
pub fn parse_offset(value: &str) -> Result<Duration> {
    let caps = offset_pattern()?
        .captures(value)
        .ok_or_else(|| anyhow!("invalid duration format: {value:?}"))?;

    let amount: i64 = caps[1]
        .parse()
        .with_context(|| format!("invalid number in duration {value:?}"))?;
    if amount == 0 {
        return Err(anyhow!("reminder offset must be positive: {value:?}"));
    }

    let offset = match caps[2].to_lowercase().chars().next() {
        Some('m') => Duration::try_minutes(amount),
        Some('h') => Duration::try_hours(amount),
        Some('d') => Duration::try_days(amount),
        Some('w') => Duration::try_weeks(amount),
        _ => return Err(anyhow!("invalid unit in duration {value:?}")),
    };

    match offset {
        Some(offset) if offset <= Duration::weeks(MAX_OFFSET_WEEKS) => Ok(offset),
        _ => Err(anyhow!(
            "reminder offset {value:?} exceeds {MAX_OFFSET_WEEKS} weeks"
        )),
    }
}

/// Parse every offset, dropping repeats while keeping first-seen order
fn parse_offsets(values: &[String]) -> Result<Vec<Duration>> {
    let mut offsets: Vec<Duration> = Vec::with_capacity(values.len());
    for value in values {
        let offset = parse_offset(value)?;
        if !offsets.contains(&offset) {
            offsets.push(offset);
        }
    }
    Ok(offsets)
}

/// Parse `name,url;name,url` into server endpoints
fn parse_servers(value: &str) -> Result<Vec<ServerEndpoint>> {
    let mut servers = Vec::new();

    for (idx, entry) in value.split(';').map(str::trim).enumerate() {
        if entry.is_empty() {
            continue;
        }

        let parts: Vec<&str> = entry.splitn(2, ',').map(str::trim).collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(anyhow!(
                "invalid server entry #{}: expected `name,url` ({entry:?})",
                idx + 1
            ));
        }

        servers.push(ServerEndpoint {
            name: parts[0].to_string(),
            url: parts[1].to_string(),
        });
    }

    Ok(servers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DISCORD_BOT_TOKEN", "token"),
            ("DISCORD_CHANNEL_ID_STATUS", "111"),
            ("PRESENCE_SERVERS", "Island,http://10.0.0.1/players"),
        ]
    }

    #[test]
    fn test_env_defaults() {
        let config = Config::from_lookup(lookup(&minimal())).unwrap();

        assert_eq!(config.status_channel_id, 111);
        assert_eq!(config.join_leave_channel_id, 111);
        assert_eq!(config.events_channel_id, None);
        assert_eq!(config.status_title, DEFAULT_STATUS_TITLE);
        assert_eq!(config.pointer_path, DEFAULT_POINTER_PATH);
        assert!(config.show_join_leave);
        assert!(config.pin_player_list);
        assert!(!config.eventer_enabled);
        assert_eq!(
            config.reminder_offsets,
            vec![Duration::hours(24), Duration::hours(2), Duration::minutes(15)]
        );
        assert_eq!(config.scheduler_tick, StdDuration::from_secs(1));
        assert_eq!(config.display_timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.language, Language::German);
        assert_eq!(config.poll_interval, StdDuration::from_secs(60));
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_env_missing_token_is_fatal() {
        let vars = vec![
            ("DISCORD_CHANNEL_ID_STATUS", "111"),
            ("PRESENCE_SERVERS", "Island,http://x"),
        ];
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_eventer_requires_events_channel() {
        let mut vars = minimal();
        vars.push(("EVENTER_ENABLED", "true"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());

        vars.push(("DISCORD_CHANNEL_ID_EVENTS", "333"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert!(config.eventer_enabled);
        assert_eq!(config.events_channel_id, Some(333));
    }

    #[test]
    fn test_unknown_timezone_is_fatal() {
        let mut vars = minimal();
        vars.push(("DISPLAY_TIMEZONE", "Mars/Olympus_Mons"));
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("timezone"));
    }

    #[test]
    fn test_custom_offsets_and_servers() {
        let mut vars = minimal();
        vars.retain(|(k, _)| *k != "PRESENCE_SERVERS");
        vars.push(("EVENTER_REMINDERS", "1 week, 3 days ,30m"));
        vars.push(("PRESENCE_SERVERS", "Island,http://a;; Scorched , http://b "));
        vars.push(("LOG_FILE", "-"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(
            config.reminder_offsets,
            vec![Duration::weeks(1), Duration::days(3), Duration::minutes(30)]
        );
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.servers[1].name, "Scorched");
        assert_eq!(config.servers[1].url, "http://b");
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("15 minutes").unwrap(), Duration::minutes(15));
        assert_eq!(parse_offset("1 Hour").unwrap(), Duration::hours(1));
        assert_eq!(parse_offset("2 days").unwrap(), Duration::days(2));
        assert_eq!(parse_offset("2h").unwrap(), Duration::hours(2));
        assert!(parse_offset("soon").is_err());
        assert!(parse_offset("5 fortnights").is_err());
        assert!(parse_offset("").is_err());
    }

    #[test]
    fn test_parse_offset_rejects_zero() {
        assert!(parse_offset("0 minutes").is_err());
        assert!(parse_offset("0w").is_err());
    }

    #[test]
    fn test_parse_offset_rejects_out_of_range() {
        assert_eq!(parse_offset("52 weeks").unwrap(), Duration::weeks(52));
        assert!(parse_offset("53 weeks").is_err());
        assert!(parse_offset("100000000 days").is_err());
        assert!(parse_offset("9999999999999999 weeks").is_err());
        assert!(parse_offset("99999999999999999999999 minutes").is_err());
    }

    #[test]
    fn test_repeated_offsets_collapse() {
        let mut vars = minimal();
        vars.push(("EVENTER_REMINDERS", "15m, 2 hours, 15 minutes, 120 minutes"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(
            config.reminder_offsets,
            vec![Duration::minutes(15), Duration::hours(2)]
        );
    }

    #[test]
    fn test_zero_or_huge_offset_is_fatal() {
        for bad in ["0 minutes", "100000000 days", "9999999999999999 weeks"] {
            let mut vars = minimal();
            vars.push(("EVENTER_REMINDERS", bad));
            assert!(Config::from_lookup(lookup(&vars)).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_servers_rejects_incomplete_entry() {
        assert!(parse_servers("Island").is_err());
        assert!(parse_servers("Island,").is_err());
    }

    #[test]
    fn test_yaml_file() {
        let yaml = r#"
discord:
  bot_token: abc
  channel_id_status: 111
  channel_id_joinleave: "222"
  channel_id_events: 333
  show_join_leave: false
eventer:
  enabled: true
  reminders: ["1 hour"]
display:
  timezone: UTC
  language: en
presence:
  query_every_s: 30
  servers:
    - name: Island
      url: http://10.0.0.1/players
log_file: bot.log
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.join_leave_channel_id, 222);
        assert_eq!(config.events_channel_id, Some(333));
        assert!(!config.show_join_leave);
        assert_eq!(config.reminder_offsets, vec![Duration::hours(1)]);
        assert_eq!(config.display_timezone, chrono_tz::UTC);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.poll_interval, StdDuration::from_secs(30));
        assert_eq!(config.log_file.as_deref(), Some("bot.log"));
    }
}
