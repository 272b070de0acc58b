use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::extract::FromRef;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::SiteConfig;
use crate::models::irradiance::ClearSkyResult;
use crate::models::sensor::SensorSnapshot;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Latest coordinator output; `None` until the first refresh
    pub snapshot: Arc<RwLock<Option<SensorSnapshot>>>,
    pub mqtt_connected: Arc<AtomicBool>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(None)),
            mqtt_connected: Arc::new(AtomicBool::new(false)),
            started_at: Instant::now(),
        }
    }

    pub fn set_result(&self, updated_at: DateTime<Utc>, result: &ClearSkyResult) -> SensorSnapshot {
        let snapshot = SensorSnapshot { updated_at, readings: result.as_readings() };
        if let Ok(mut slot) = self.snapshot.write() {
            *slot = Some(snapshot.clone());
        }
        snapshot
    }

    pub fn get_snapshot(&self) -> Option<SensorSnapshot> {
        self.snapshot.read().ok().and_then(|s| s.clone())
    }

    pub fn get_reading(&self, key: &str) -> Option<f64> {
        self.get_snapshot().and_then(|s| s.readings.get(key).copied())
    }

    pub fn is_mqtt_connected(&self) -> bool {
        self.mqtt_connected.load(Ordering::Relaxed)
    }

    pub fn set_mqtt_connected(&self, value: bool) {
        self.mqtt_connected.store(value, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Router state: handlers extract `State<AppState>` or `State<SiteContext>`
/// through `FromRef`.
#[derive(Clone, Debug)]
pub struct SharedState {
    pub app: AppState,
    pub site: SiteContext,
}

/// Configured site, resolved once at startup.
#[derive(Clone, Debug)]
pub struct SiteContext {
    pub config: SiteConfig,
    pub tz: Tz,
}

impl FromRef<SharedState> for AppState {
    fn from_ref(shared: &SharedState) -> Self {
        shared.app.clone()
    }
}

impl FromRef<SharedState> for SiteContext {
    fn from_ref(shared: &SharedState) -> Self {
        shared.site.clone()
    }
}
