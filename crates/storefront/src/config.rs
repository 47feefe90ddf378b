use crate::carrier::{
    delhivery, shiprocket, CarrierSettings, DelhiveryConfig, PackageDimensions, ShiprocketConfig,
};
use crate::model::CarrierKind;
use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

/// Keys looked up in `/run/secrets` before the environment.
const SECRET_KEYS: &[&str] = &["SHIPROCKET_PASSWORD", "DELHIVERY_TOKEN"];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(String),

    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub carrier: CarrierSettings,
    pub carrier_timeout: Duration,
    /// `None` when `TRACKING_POLL_SECS=0`.
    pub poll_interval: Option<Duration>,
    pub package: PackageDimensions,
}

impl Config {
    /// Read the process environment, with secrets from `/run/secrets/<NAME>` when present.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let secret = SECRET_KEYS
                .contains(&key)
                .then(|| read_secret(key))
                .flatten();
            secret.or_else(|| env::var(key).ok())
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = Source { lookup: &lookup };

        let kind: CarrierKind = source.try_load("CARRIER", "shiprocket")?;
        let pickup_location: String = source.try_load("PICKUP_LOCATION", "Primary")?;
        let carrier = match kind {
            CarrierKind::Shiprocket => CarrierSettings::Shiprocket(ShiprocketConfig {
                base_url: source.try_load("CARRIER_BASE_URL", shiprocket::DEFAULT_BASE_URL)?,
                email: source.require("SHIPROCKET_EMAIL")?,
                password: source.require("SHIPROCKET_PASSWORD")?,
                pickup_location,
                pickup_pincode: source.require("PICKUP_PINCODE")?,
            }),
            CarrierKind::Delhivery => CarrierSettings::Delhivery(DelhiveryConfig {
                base_url: source.try_load("CARRIER_BASE_URL", delhivery::DEFAULT_BASE_URL)?,
                token: source.require("DELHIVERY_TOKEN")?,
                pickup_location,
            }),
        };

        let poll_secs: u64 = source.try_load("TRACKING_POLL_SECS", "300")?;
        let timeout_secs: u64 = source.try_load("CARRIER_TIMEOUT_SECS", "15")?;
        let package = PackageDimensions {
            weight_kg: source.try_load("PACKAGE_WEIGHT_KG", "0.5")?,
            length_cm: source.try_load("PACKAGE_LENGTH_CM", "10")?,
            breadth_cm: source.try_load("PACKAGE_BREADTH_CM", "10")?,
            height_cm: source.try_load("PACKAGE_HEIGHT_CM", "10")?,
        };
        if package.weight_kg <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "PACKAGE_WEIGHT_KG".into(),
                value: package.weight_kg.to_string(),
                reason: "must be positive".into(),
            });
        }

        Ok(Self {
            port: source.try_load("STOREFRONT_PORT", "8080")?,
            carrier,
            carrier_timeout: Duration::from_secs(timeout_secs),
            poll_interval: (poll_secs > 0).then(|| Duration::from_secs(poll_secs)),
            package,
        })
    }
}

struct Source<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Source<'_> {
    fn var(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn try_load<T: FromStr>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T::Err: Display,
    {
        let value = self.var(key).unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        });
        parse(key, value)
    }

    fn require<T: FromStr>(&self, key: &str) -> Result<T, ConfigError>
    where
        T::Err: Display,
    {
        let value = self
            .var(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))?;
        parse(key, value)
    }
}

fn parse<T: FromStr>(key: &str, value: String) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
            value,
        }
    })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("{secret_name} not readable from {path} ({e}), falling back to environment");
        })
        .ok()
}
