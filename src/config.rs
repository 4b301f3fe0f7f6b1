//! # Runtime configuration
//!
//! [`OrreryConfig`] gathers the knobs of the ephemeris client, the sequential loader and the
//! playback engine. Values come from, in increasing priority:
//!
//! 1. [`Default`] – production defaults (JPL Horizons, 300 ms pacing, 365 days/s playback),
//! 2. a TOML document – [`OrreryConfig::from_toml_str`], missing keys keep their default,
//! 3. `ORRERY_*` environment variables – [`OrreryConfig::with_env_overrides`].
//!
//! ```rust, no_run
//! use orrery::config::OrreryConfig;
//!
//! let config = OrreryConfig::from_toml_str("request_delay_ms = 500")
//!     .and_then(|c| c.with_env_overrides())
//!     .unwrap();
//! assert_eq!(config.request_delay().as_millis(), 500);
//! ```

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::horizons::space_point::NonFinitePolicy;
use crate::orrery_errors::OrreryError;

pub const DEFAULT_HORIZONS_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";

/// Playback speed in simulated days per real second (one year per second).
pub const DEFAULT_SPEED: f64 = 365.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Horizons API endpoint
    pub horizons_url: String,
    /// Horizons `STEP_SIZE`, e.g. `"1d"`
    pub step_size: String,
    /// Pause after every body of a load session (milliseconds)
    pub request_delay_ms: u64,
    /// Hard timeout of one Horizons request (seconds)
    pub request_timeout_secs: u64,
    /// Initial playback speed, simulated days per real second
    pub default_speed: f64,
    pub non_finite_policy: NonFinitePolicy,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        OrreryConfig {
            horizons_url: DEFAULT_HORIZONS_URL.to_string(),
            step_size: "1d".to_string(),
            request_delay_ms: 300,
            request_timeout_secs: 30,
            default_speed: DEFAULT_SPEED,
            non_finite_policy: NonFinitePolicy::PassThrough,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T, OrreryError> {
    raw.trim()
        .parse()
        .map_err(|_| OrreryError::InvalidConfig(format!("{name}={raw}")))
}

impl OrreryConfig {
    pub fn from_toml_str(doc: &str) -> Result<Self, OrreryError> {
        let config: OrreryConfig = toml::from_str(doc)?;
        config.validated()
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self, OrreryError> {
        OrreryConfig::default().with_env_overrides()
    }

    /// Apply `ORRERY_*` environment overrides on top of `self`.
    ///
    /// Recognized variables: `ORRERY_HORIZONS_URL`, `ORRERY_STEP_SIZE`,
    /// `ORRERY_REQUEST_DELAY_MS`, `ORRERY_REQUEST_TIMEOUT_SECS`, `ORRERY_DEFAULT_SPEED`,
    /// `ORRERY_NON_FINITE_POLICY` (`pass_through`, `drop_record`, `reject`).
    pub fn with_env_overrides(self) -> Result<Self, OrreryError> {
        self.with_overrides(|name| env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, OrreryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ORRERY_HORIZONS_URL") {
            self.horizons_url = url;
        }
        if let Some(step) = lookup("ORRERY_STEP_SIZE") {
            self.step_size = step;
        }
        if let Some(raw) = lookup("ORRERY_REQUEST_DELAY_MS") {
            self.request_delay_ms = parse_var("ORRERY_REQUEST_DELAY_MS", &raw)?;
        }
        if let Some(raw) = lookup("ORRERY_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("ORRERY_REQUEST_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("ORRERY_DEFAULT_SPEED") {
            self.default_speed = parse_var("ORRERY_DEFAULT_SPEED", &raw)?;
        }
        if let Some(raw) = lookup("ORRERY_NON_FINITE_POLICY") {
            self.non_finite_policy = match raw.trim() {
                "pass_through" => NonFinitePolicy::PassThrough,
                "drop_record" => NonFinitePolicy::DropRecord,
                "reject" => NonFinitePolicy::Reject,
                _ => {
                    return Err(OrreryError::InvalidConfig(format!(
                        "ORRERY_NON_FINITE_POLICY={raw}"
                    )))
                }
            };
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, OrreryError> {
        if self.horizons_url.trim().is_empty() {
            return Err(OrreryError::InvalidConfig("empty horizons_url".into()));
        }
        if self.step_size.trim().is_empty() {
            return Err(OrreryError::InvalidConfig("empty step_size".into()));
        }
        if !self.default_speed.is_finite() || self.default_speed < 0.0 {
            return Err(OrreryError::InvalidConfig(format!(
                "default_speed must be a finite non-negative number, got {}",
                self.default_speed
            )));
        }
        Ok(self)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod config_test {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = OrreryConfig::default();
        assert_eq!(config.horizons_url, DEFAULT_HORIZONS_URL);
        assert_eq!(config.request_delay(), Duration::from_millis(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.default_speed, 365.0);
        assert_eq!(config.non_finite_policy, NonFinitePolicy::PassThrough);
    }

    #[test]
    fn test_from_toml() {
        let config = OrreryConfig::from_toml_str(
            r#"
step_size = "12h"
request_delay_ms = 0
non_finite_policy = "drop_record"
"#,
        )
        .unwrap();
        assert_eq!(config.step_size, "12h");
        assert_eq!(config.request_delay_ms, 0);
        assert_eq!(config.non_finite_policy, NonFinitePolicy::DropRecord);
        assert_eq!(config.request_timeout_secs, 30);

        assert!(matches!(
            OrreryConfig::from_toml_str("request_delay_ms = \"fast\""),
            Err(OrreryError::TomlError(_))
        ));
        assert_eq!(
            OrreryConfig::from_toml_str("step_size = \"\""),
            Err(OrreryError::InvalidConfig("empty step_size".into()))
        );
    }

    #[test]
    fn test_overrides() {
        let config = OrreryConfig::default()
            .with_overrides(lookup_from(&[
                ("ORRERY_REQUEST_DELAY_MS", "50"),
                ("ORRERY_DEFAULT_SPEED", "30.5"),
                ("ORRERY_NON_FINITE_POLICY", "reject"),
            ]))
            .unwrap();
        assert_eq!(config.request_delay_ms, 50);
        assert_eq!(config.default_speed, 30.5);
        assert_eq!(config.non_finite_policy, NonFinitePolicy::Reject);

        assert_eq!(
            OrreryConfig::default()
                .with_overrides(lookup_from(&[("ORRERY_REQUEST_DELAY_MS", "-1")])),
            Err(OrreryError::InvalidConfig("ORRERY_REQUEST_DELAY_MS=-1".into()))
        );
        assert!(OrreryConfig::default()
            .with_overrides(lookup_from(&[("ORRERY_DEFAULT_SPEED", "NaN")]))
            .is_err());
    }
}
