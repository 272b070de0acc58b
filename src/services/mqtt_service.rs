/// MQTT sensor publisher
///
/// Republishes the coordinator's readings to a configured broker.
/// Topic structure:
///   `{prefix}/{key}/state`  – numeric reading, one per sensor (ghi/dni/dhi)
///   `{prefix}/summary`      – retained JSON with all readings
///   `{prefix}/status`       – retained ONLINE/OFFLINE availability

use std::time::Duration;

use rumqttc::{AsyncClient, LastWill, MqttOptions, QoS};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::config::MqttConfig;
use crate::models::sensor::{SENSOR_DESCRIPTIONS, SensorSnapshot};
use crate::shared_state::AppState;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

pub fn state_topic(prefix: &str, key: &str) -> String {
    format!("{}/{}/state", prefix, key)
}

pub fn status_topic(prefix: &str) -> String {
    format!("{}/status", prefix)
}

pub fn summary_topic(prefix: &str) -> String {
    format!("{}/summary", prefix)
}

/// Sensor state payload, rounded to the display precision.
pub fn format_state(value: f64, precision: u8) -> String {
    format!("{:.*}", usize::from(precision), value)
}

pub fn summary_payload(snapshot: &SensorSnapshot) -> serde_json::Value {
    serde_json::json!({
        "timestamp": snapshot.updated_at.to_rfc3339(),
        "unit": crate::models::sensor::UNIT_IRRADIANCE,
        "readings": snapshot.readings,
    })
}

pub async fn run_publisher(cfg: MqttConfig, state: AppState, interval: Duration) {
    if !cfg.enabled || cfg.broker_host.is_empty() {
        info!("MQTT disabled or no broker configured, skipping publisher");
        return;
    }

    let client_id = if cfg.client_id.is_empty() {
        format!("clear-sky-solar-{}", uuid::Uuid::new_v4())
    } else {
        cfg.client_id.clone()
    };
    let prefix = cfg.topic_prefix.trim_end_matches('/').to_string();

    info!(
        broker = %cfg.broker_host,
        port = cfg.broker_port,
        %client_id,
        interval_s = interval.as_secs(),
        "connecting to MQTT broker"
    );

    let mut opts = MqttOptions::new(&client_id, &cfg.broker_host, cfg.broker_port);
    opts.set_keep_alive(Duration::from_secs(30));
    opts.set_clean_session(true);
    opts.set_last_will(LastWill::new(
        status_topic(&prefix),
        serde_json::json!({ "status": "OFFLINE" }).to_string(),
        QoS::AtLeastOnce,
        true,
    ));
    if let (Some(user), Some(pass)) = (&cfg.username, &cfg.password) {
        opts.set_credentials(user, pass);
    }

    let (client, mut eventloop) = AsyncClient::new(opts, 64);

    let birth = serde_json::json!({
        "status": "ONLINE",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    if let Err(e) = client
        .publish(status_topic(&prefix), QoS::AtLeastOnce, true, birth.to_string())
        .await
    {
        warn!(error = %e, "failed to queue MQTT birth message");
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            event = eventloop.poll() => {
                match event {
                    Ok(_) => state.set_mqtt_connected(true),
                    Err(e) => {
                        warn!(error = %e, "MQTT event loop error, will reconnect");
                        state.set_mqtt_connected(false);
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }
                continue;
            }
        }

        let Some(snapshot) = state.get_snapshot() else {
            continue;
        };

        for desc in &SENSOR_DESCRIPTIONS {
            let Some(value) = snapshot.readings.get(desc.key) else {
                continue;
            };
            let topic = state_topic(&prefix, desc.key);
            let payload = format_state(*value, desc.suggested_display_precision);
            if let Err(e) = client.publish(&topic, QoS::AtMostOnce, false, payload).await {
                warn!(%topic, error = %e, "MQTT publish failed");
                state.set_mqtt_connected(false);
            }
        }

        let summary = summary_payload(&snapshot);
        if let Err(e) = client
            .publish(summary_topic(&prefix), QoS::AtMostOnce, true, summary.to_string())
            .await
        {
            warn!(error = %e, "MQTT summary publish failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sensor::{DHI, DNI, GHI};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    #[test]
    fn test_topics() {
        assert_eq!(state_topic("clear_sky_solar", GHI), "clear_sky_solar/ghi/state");
        assert_eq!(status_topic("home/sun"), "home/sun/status");
        assert_eq!(summary_topic("home/sun"), "home/sun/summary");
    }

    #[test]
    fn test_format_state_uses_precision() {
        assert_eq!(format_state(864.7721, 1), "864.8");
        assert_eq!(format_state(0.0, 1), "0.0");
    }

    #[test]
    fn test_summary_payload() {
        let snapshot = SensorSnapshot {
            updated_at: Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap(),
            readings: BTreeMap::from([
                (GHI.to_string(), 111.0),
                (DNI.to_string(), 222.0),
                (DHI.to_string(), 33.0),
            ]),
        };
        let payload = summary_payload(&snapshot);
        assert_eq!(payload["readings"]["ghi"], 111.0);
        assert_eq!(payload["readings"]["dni"], 222.0);
        assert_eq!(payload["readings"]["dhi"], 33.0);
        assert_eq!(payload["timestamp"], "2024-06-21T20:00:00+00:00");
    }

    #[tokio::test]
    async fn test_disabled_publisher_returns_immediately() {
        let state = AppState::new();
        run_publisher(MqttConfig::default(), state.clone(), Duration::from_secs(1)).await;
        assert!(!state.is_mqtt_connected());
    }
}
