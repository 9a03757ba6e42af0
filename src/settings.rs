use config::{Config, File};
use cron::Schedule;
use serde::{de::IgnoredAny, Deserialize};
use std::{net::SocketAddr, path::Path, str::FromStr};
use url::Url;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub server: ServerSettings,
    pub api: ApiSettings,
    pub tracker: TrackerSettings,

    // Is required as we deny unknown fields, but allow users provide
    // path to config through PREFIX__CONFIG env variable. If removed,
    // the setup would fail with `unknown field `config`, expected one of...`
    #[serde(rename = "config")]
    pub config_path: IgnoredAny,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from_str("0.0.0.0:8050").expect("should be valid socket addr"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    pub base_url: Url,
    /// Per-request timeout, seconds. Expiry counts as a failed fetch; there
    /// is no automatic retry.
    pub request_timeout: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Url::try_from("https://api.motogp.pulselive.com/motogp/v1/")
                .expect("valid url"),
            request_timeout: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerSettings {
    /// Exact category label to resolve in the season's category list.
    pub category: String,
    /// Cron schedule re-running the chain head.
    #[serde(with = "serde_with::rust::display_fromstr")]
    pub refresh_schedule: Schedule,
    /// Config refreshes inside this window are coalesced, seconds.
    pub min_refresh_interval: u64,
    /// Readiness checks performed after the initial refresh before giving
    /// up and leaving recovery to the scheduled job.
    pub startup_attempts: u32,
    /// Delay between startup readiness checks, seconds.
    pub startup_retry_delay: u64,
    /// Offset applied when rendering timestamps, hours east of UTC.
    pub display_utc_offset_hours: i32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            category: "MotoGP™".to_string(),
            refresh_schedule: Schedule::from_str("0 */5 * * * * *").expect("valid schedule"), // every five minutes
            min_refresh_interval: 60,
            startup_attempts: 30,
            startup_retry_delay: 1,
            display_utc_offset_hours: 2,
        }
    }
}

impl Settings {
    pub fn new(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_file.filter(|path| path.exists()) {
            builder = builder.add_source(File::from(path));
        } else if let Ok(config_path) = std::env::var("MOTOGP_TRACKER__CONFIG") {
            builder = builder.add_source(File::with_name(&config_path));
        }
        // Use `__` so that it would be possible to address keys with underscores in names (e.g. `base_url`)
        builder = builder
            .add_source(config::Environment::with_prefix("MOTOGP_TRACKER").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let settings = Settings::default();
        assert!(settings.api.base_url.as_str().ends_with('/'));
        assert_eq!("MotoGP™", settings.tracker.category);
        assert!(settings.tracker.min_refresh_interval > 0);
    }
}
