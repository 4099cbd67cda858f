//! Periodic sensor poll loop
//!
//! One read per interval, applied to shared state. No retry, no backoff;
//! a failed cycle leaves the previous reading in place. Polls are
//! sequential: the next one is scheduled only after the current one lands.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::sensor::SensorEndpoint;
use crate::state::StateHandle;

/// Run the poll loop until the cancellation token fires
pub async fn run(
    sensor: SensorEndpoint,
    state: StateHandle,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        poll_once(&sensor, &state).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Poll loop cancelled");
                break;
            }
        }
    }
}

/// One poll cycle: read the sensor and fold the outcome into state
pub async fn poll_once(sensor: &SensorEndpoint, state: &StateHandle) {
    match sensor.read().await {
        Ok(reading) => {
            tracing::debug!(
                "Poll {} -> moisture {:.1}%, temperature {:.1}°C",
                sensor.url(),
                reading.moisture,
                reading.temperature
            );
            state
                .write()
                .await
                .record_success(reading, current_epoch_ms());
        }
        Err(e) => {
            tracing::warn!("Poll {} failed: {}", sensor.url(), e);
            let streak = state.write().await.record_failure(current_epoch_ms());
            if streak == 5 {
                tracing::warn!("Sensor endpoint has {} consecutive errors", streak);
            }
        }
    }
}

pub(crate) fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
