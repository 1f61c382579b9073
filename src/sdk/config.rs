use crate::sdk::routing::coord::Coord;
use crate::sdk::util::rate_limit::{pacing_delay, ORS_REQUESTS_PER_MINUTE};
use std::env;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// The fleet depot every route starts from.
pub const DEFAULT_DEPOT: Coord = Coord::new(3.0738, 101.5183);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} is not a valid number: {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },

    #[error("DEPOT_LATITUDE and DEPOT_LONGITUDE must be set together")]
    PartialDepot,
}

/// Everything the routing core needs, passed in at construction time.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub depot: Coord,
    pub requests_per_minute: NonZeroU32,
    pub request_timeout: Duration,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            depot: DEFAULT_DEPOT,
            requests_per_minute: NonZeroU32::new(ORS_REQUESTS_PER_MINUTE)
                .unwrap_or(NonZeroU32::MIN),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RoutingConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = normalize_key(Some(api_key.into()));
        self
    }

    /// Reads the process environment. A missing API key is not an error
    /// here; queries fall back to zero until one is configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = normalize_key(lookup("ORS_API_KEY"))
            .or_else(|| normalize_key(lookup("OPENROUTESERVICE_API_KEY")));

        let base_url = lookup("ORS_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);

        let depot = match (lookup("DEPOT_LATITUDE"), lookup("DEPOT_LONGITUDE")) {
            (Some(lat), Some(lon)) => Coord::new(
                parse_number("DEPOT_LATITUDE", &lat)?,
                parse_number("DEPOT_LONGITUDE", &lon)?,
            ),
            (None, None) => defaults.depot,
            _ => return Err(ConfigError::PartialDepot),
        };

        let requests_per_minute = match lookup("ORS_REQUESTS_PER_MINUTE") {
            Some(raw) => {
                let n = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        name: "ORS_REQUESTS_PER_MINUTE",
                        value: raw.clone(),
                    })?;
                NonZeroU32::new(n).ok_or(ConfigError::Zero {
                    name: "ORS_REQUESTS_PER_MINUTE",
                })?
            }
            None => defaults.requests_per_minute,
        };

        let request_timeout = match lookup("ORS_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = parse_number("ORS_TIMEOUT_SECS", &raw)?;
                if secs <= 0.0 {
                    return Err(ConfigError::Zero {
                        name: "ORS_TIMEOUT_SECS",
                    });
                }
                Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidNumber {
                    name: "ORS_TIMEOUT_SECS",
                    value: raw.clone(),
                })?
            }
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_key,
            base_url,
            depot,
            requests_per_minute,
            request_timeout,
        })
    }

    /// Fixed gap the batch waits between two provider calls.
    pub fn pacing_delay(&self) -> Duration {
        pacing_delay(self.requests_per_minute)
    }
}

fn normalize_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

fn parse_number(name: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::InvalidNumber {
            name,
            value: raw.to_string(),
        })
}
