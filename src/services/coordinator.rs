/// Periodic refresh of the clear-sky sensors.
///
/// The coordinator owns the site inputs and writes every result into the
/// shared state; readers never call the model directly.

use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::models::irradiance::SiteParameters;
use crate::models::sensor::SensorSnapshot;
use crate::services::clear_sky::compute_clear_sky;
use crate::shared_state::AppState;

#[derive(Clone, Debug)]
pub struct ClearSkyCoordinator {
    site: SiteParameters,
    tz: Tz,
    state: AppState,
}

impl ClearSkyCoordinator {
    pub fn new(site: SiteParameters, tz: Tz, state: AppState) -> Self {
        Self { site, tz, state }
    }

    pub fn site(&self) -> &SiteParameters {
        &self.site
    }

    /// Recalculate the estimates for `now` and publish them to the state.
    pub fn refresh_at(&self, now: DateTime<Utc>) -> SensorSnapshot {
        let local = now.with_timezone(&self.tz);
        let result = compute_clear_sky(&self.site, &local);
        debug!(
            at = %local,
            ghi = result.ghi,
            dni = result.dni,
            dhi = result.dhi,
            "clear-sky estimates refreshed"
        );
        self.state.set_result(now, &result)
    }

    pub fn refresh(&self) -> SensorSnapshot {
        self.refresh_at(Utc::now())
    }

    /// Refresh now, then once per `interval`, forever.
    pub async fn run(self, interval: Duration) {
        info!(
            latitude = self.site.latitude,
            longitude = self.site.longitude,
            timezone = self.tz.name(),
            interval_s = interval.as_secs(),
            "clear-sky coordinator started"
        );
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sensor::{DHI, DNI, GHI};
    use chrono::TimeZone;

    fn sf_coordinator(state: AppState) -> ClearSkyCoordinator {
        ClearSkyCoordinator::new(
            SiteParameters::new(37.7749, -122.4194).with_elevation(16.0),
            chrono_tz::America::Los_Angeles,
            state,
        )
    }

    #[test]
    fn test_refresh_returns_expected_keys() {
        let state = AppState::new();
        let coordinator = sf_coordinator(state.clone());
        let snapshot = coordinator.refresh_at(Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap());
        let keys: Vec<_> = snapshot.readings.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![DHI, DNI, GHI]);
        assert!(snapshot.readings[GHI] > 800.0);
        assert_eq!(state.get_snapshot(), Some(snapshot));
    }

    #[test]
    fn test_refresh_at_night_publishes_zeros() {
        let state = AppState::new();
        let coordinator = sf_coordinator(state.clone());
        coordinator.refresh_at(Utc.with_ymd_and_hms(2024, 6, 21, 8, 0, 0).unwrap());
        for key in [GHI, DNI, DHI] {
            assert_eq!(state.get_reading(key), Some(0.0));
        }
    }

    #[tokio::test]
    async fn test_run_populates_state() {
        let state = AppState::new();
        let coordinator = sf_coordinator(state.clone());
        let handle = tokio::spawn(coordinator.run(Duration::from_secs(60)));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(state.get_snapshot().is_some());
        handle.abort();
    }
}
