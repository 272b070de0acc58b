use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ClearSkyError, Result};
use crate::models::irradiance::SiteParameters;
use crate::models::sensor::{DOMAIN, UPDATE_INTERVAL};

pub const CONFIG_PATH_ENV: &str = "CLEAR_SKY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

fn default_update_interval_s() -> u64 { UPDATE_INTERVAL.as_secs() }
fn default_port() -> u16 { 8080 }
fn default_timezone() -> String { "UTC".to_string() }
fn default_broker_port() -> u16 { 1883 }
fn default_topic_prefix() -> String { DOMAIN.to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default = "default_update_interval_s")]
    pub update_interval_s: u64,
    #[serde(default)]
    pub mqtt: MqttConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

/// Site location and atmosphere. Latitude/longitude default to 0.0 when unset.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct SiteConfig {
    #[serde(flatten)]
    pub parameters: SiteParameters,
    /// IANA zone used for the local day of year
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { parameters: SiteParameters::default(), timezone: default_timezone() }
    }
}

impl SiteConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ClearSkyError::UnknownTimezone(self.timezone.clone()))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MqttConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub broker_host: String,
    #[serde(default = "default_broker_port")]
    pub broker_port: u16,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            broker_host: String::new(),
            broker_port: default_broker_port(),
            client_id: String::new(),
            topic_prefix: default_topic_prefix(),
            username: None,
            password: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Path from `CLEAR_SKY_CONFIG`, else `config.json`.
    pub fn default_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_s)
    }

    fn validate(&self) -> Result<()> {
        if self.update_interval_s == 0 {
            return Err(ClearSkyError::Config("update_interval_s must be at least 1".into()));
        }
        let site = &self.site.parameters;
        if !(-90.0..=90.0).contains(&site.latitude) {
            return Err(ClearSkyError::Config(format!("latitude {} out of range", site.latitude)));
        }
        if !(-180.0..=180.0).contains(&site.longitude) {
            return Err(ClearSkyError::Config(format!("longitude {} out of range", site.longitude)));
        }
        self.site.tz()?;
        Ok(())
    }
}
