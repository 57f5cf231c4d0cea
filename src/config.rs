use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const LIMIT_KEY: &str = "ANTIFLOOD_LIMIT";
pub const INTERVAL_KEY: &str = "ANTIFLOOD_INTERVAL";
pub const NOTIFY_TIMEOUT_KEY: &str = "ANTIFLOOD_NOTIFY_TIMEOUT";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum messages per interval. `0` rejects everything.
    pub limit: usize,
    /// Window length in seconds.
    pub interval: f64,
    /// Upper bound on how long a flood warning may take to deliver.
    pub notify_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: 5,
            interval: 10.0,
            notify_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn new(limit: usize, interval: f64) -> Result<Self, ConfigError> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "interval must be a positive number of seconds, got {}",
                interval
            )));
        }
        Ok(Self {
            limit,
            interval,
            ..Self::default()
        })
    }

    pub fn with_notify_timeout(mut self, notify_timeout: Duration) -> Self {
        self.notify_timeout = notify_timeout;
        self
    }

    /// Builds a config from key lookups. Missing keys fall back to defaults.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let limit = parse_or(&mut lookup, LIMIT_KEY, defaults.limit)?;
        let interval = parse_or(&mut lookup, INTERVAL_KEY, defaults.interval)?;
        let timeout_secs = parse_or(
            &mut lookup,
            NOTIFY_TIMEOUT_KEY,
            defaults.notify_timeout.as_secs_f64(),
        )?;
        let notify_timeout = Duration::try_from_secs_f64(timeout_secs).map_err(|_| {
            ConfigError::OutOfRange(format!(
                "{} must be a non-negative number of seconds, got {}",
                NOTIFY_TIMEOUT_KEY, timeout_secs
            ))
        })?;
        Ok(Self::new(limit, interval)?.with_notify_timeout(notify_timeout))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads a `.env`-style file without touching the process environment.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let entries = dotenvy::from_path_iter(path.as_ref())?
            .collect::<Result<Vec<(String, String)>, dotenvy::Error>>()?;
        Self::from_lookup(|key| {
            entries
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }
}

fn parse_or<T, F>(lookup: &mut F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: FnMut(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_middleware_defaults() {
        let config = Config::default();
        assert_eq!(config.limit, 5);
        assert_eq!(config.interval, 10.0);
        assert_eq!(config.notify_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_limit_is_accepted() {
        assert_eq!(Config::new(0, 1.0).unwrap().limit, 0);
    }

    #[test]
    fn rejects_bad_interval() {
        for interval in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Config::new(5, interval),
                Err(ConfigError::OutOfRange(_))
            ));
        }
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            (LIMIT_KEY, "3"),
            (INTERVAL_KEY, " 2.5 "),
            (NOTIFY_TIMEOUT_KEY, "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.limit, 3);
        assert_eq!(config.interval, 2.5);
        assert_eq!(config.notify_timeout, Duration::from_millis(500));
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::from_lookup(lookup(&[(LIMIT_KEY, "9")])).unwrap();
        assert_eq!(config.limit, 9);
        assert_eq!(config.interval, 10.0);
    }

    #[test]
    fn unparsable_value_names_the_key() {
        let err = Config::from_lookup(lookup(&[(LIMIT_KEY, "lots")])).unwrap_err();
        match err {
            ConfigError::Invalid { key, value } => {
                assert_eq!(key, LIMIT_KEY);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn negative_timeout_is_out_of_range() {
        let err = Config::from_lookup(lookup(&[(NOTIFY_TIMEOUT_KEY, "-3")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange(_)));
    }
}
