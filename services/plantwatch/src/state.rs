//! Shared state for sensor readings, pump control, and the alert log

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::ThresholdConfig;
use crate::history::HistoricalPoint;

/// Alert appended when a reading falls below the moisture threshold
pub const LOW_MOISTURE_ALERT: &str = "Low moisture level detected!";
/// Alert appended when a reading exceeds the temperature threshold
pub const HIGH_TEMPERATURE_ALERT: &str = "High temperature detected!";
/// Alert appended when the pump is switched on manually
pub const MANUAL_WATERING_ALERT: &str = "Manual watering activated";

/// How many alerts the dashboard ever shows
pub const DISPLAYED_ALERTS: usize = 3;

/// The latest sensor reading, replaced wholesale on each successful poll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub moisture: f64,
    pub temperature: f64,
}

impl Default for Reading {
    fn default() -> Self {
        // Displayed until the first poll lands
        Self {
            moisture: 65.0,
            temperature: 23.0,
        }
    }
}

/// A user-facing advisory string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub timestamp_epoch_ms: u64,
}

/// Shared state accessible by the poller and the dashboard
#[derive(Debug)]
pub struct SharedState {
    pub reading: Reading,
    pub last_poll_epoch_ms: u64,
    pub consecutive_errors: u32,
    pub pump_active: bool,
    pub thresholds: ThresholdConfig,
    pub alerts: VecDeque<Alert>,
    pub alerts_max_size: usize,
    pub history: Vec<HistoricalPoint>,
    pub started_at: Instant,
}

impl SharedState {
    pub fn new(
        thresholds: ThresholdConfig,
        alerts_max_size: usize,
        history: Vec<HistoricalPoint>,
    ) -> Self {
        // The store may be capped, but never below the display window
        let alerts_max_size = alerts_max_size.max(DISPLAYED_ALERTS);
        Self {
            reading: Reading::default(),
            last_poll_epoch_ms: 0,
            consecutive_errors: 0,
            pump_active: false,
            thresholds,
            alerts: VecDeque::with_capacity(alerts_max_size),
            alerts_max_size,
            history,
            started_at: Instant::now(),
        }
    }

    /// Apply a successful poll: replace the reading and run the threshold checks
    pub fn record_success(&mut self, reading: Reading, now_ms: u64) {
        self.reading = reading;
        self.last_poll_epoch_ms = now_ms;
        self.consecutive_errors = 0;

        if reading.moisture < self.thresholds.moisture {
            self.push_alert(LOW_MOISTURE_ALERT, now_ms);
        }
        if reading.temperature > self.thresholds.temperature {
            self.push_alert(HIGH_TEMPERATURE_ALERT, now_ms);
        }
    }

    /// Apply a failed poll: the reading stays as it was. Returns the error streak.
    pub fn record_failure(&mut self, now_ms: u64) -> u32 {
        self.last_poll_epoch_ms = now_ms;
        self.consecutive_errors += 1;
        self.consecutive_errors
    }

    /// Flip the pump, returning the new state. Activation appends an alert,
    /// deactivation does not.
    pub fn toggle_pump(&mut self, now_ms: u64) -> bool {
        self.pump_active = !self.pump_active;
        if self.pump_active {
            self.push_alert(MANUAL_WATERING_ALERT, now_ms);
        }
        self.pump_active
    }

    /// Partial threshold update, returning the values now in effect
    pub fn set_thresholds(
        &mut self,
        moisture: Option<f64>,
        temperature: Option<f64>,
    ) -> ThresholdConfig {
        if let Some(moisture) = moisture {
            self.thresholds.moisture = moisture;
        }
        if let Some(temperature) = temperature {
            self.thresholds.temperature = temperature;
        }
        self.thresholds
    }

    /// Append an alert, evicting the oldest entry once the store is full
    pub fn push_alert(&mut self, message: &str, now_ms: u64) {
        if self.alerts.len() >= self.alerts_max_size {
            self.alerts.pop_front();
        }
        self.alerts.push_back(Alert {
            message: message.to_string(),
            timestamp_epoch_ms: now_ms,
        });
    }

    /// The last `n` alerts in insertion order
    pub fn recent_alerts(&self, n: usize) -> Vec<&Alert> {
        let skip = self.alerts.len().saturating_sub(n);
        self.alerts.iter().skip(skip).collect()
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<SharedState>>;

pub fn new_state_handle(
    thresholds: ThresholdConfig,
    alerts_max_size: usize,
    history: Vec<HistoricalPoint>,
) -> StateHandle {
    Arc::new(RwLock::new(SharedState::new(
        thresholds,
        alerts_max_size,
        history,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> SharedState {
        SharedState::new(ThresholdConfig::default(), 100, Vec::new())
    }

    #[test]
    fn new_state_has_initial_reading() {
        let state = test_state();
        assert_eq!(state.reading.moisture, 65.0);
        assert_eq!(state.reading.temperature, 23.0);
        assert!(!state.pump_active);
        assert!(state.alerts.is_empty());
        assert_eq!(state.consecutive_errors, 0);
    }

    #[test]
    fn low_moisture_reading_appends_alert() {
        let mut state = test_state();
        state.record_success(
            Reading {
                moisture: 35.0,
                temperature: 22.0,
            },
            1000,
        );
        assert_eq!(state.reading.moisture, 35.0);
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].message, LOW_MOISTURE_ALERT);
        assert_eq!(state.alerts[0].timestamp_epoch_ms, 1000);
    }

    #[test]
    fn normal_reading_appends_no_alert() {
        let mut state = test_state();
        state.record_success(
            Reading {
                moisture: 60.0,
                temperature: 22.0,
            },
            1000,
        );
        assert_eq!(state.reading.moisture, 60.0);
        assert!(state.alerts.is_empty());
    }

    #[test]
    fn moisture_at_threshold_appends_no_alert() {
        let mut state = test_state();
        state.record_success(
            Reading {
                moisture: 40.0,
                temperature: 22.0,
            },
            1000,
        );
        assert!(state.alerts.is_empty());
    }

    #[test]
    fn high_temperature_reading_appends_alert() {
        let mut state = test_state();
        state.record_success(
            Reading {
                moisture: 60.0,
                temperature: 30.0,
            },
            1000,
        );
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].message, HIGH_TEMPERATURE_ALERT);
    }

    #[test]
    fn low_moisture_and_high_temperature_append_both_alerts() {
        let mut state = test_state();
        state.record_success(
            Reading {
                moisture: 30.0,
                temperature: 30.0,
            },
            1000,
        );
        assert_eq!(state.alerts.len(), 2);
        assert_eq!(state.alerts[0].message, LOW_MOISTURE_ALERT);
        assert_eq!(state.alerts[1].message, HIGH_TEMPERATURE_ALERT);
    }

    #[test]
    fn repeated_low_readings_append_repeated_alerts() {
        let mut state = test_state();
        for i in 0..3 {
            state.record_success(
                Reading {
                    moisture: 35.0,
                    temperature: 22.0,
                },
                i * 1000,
            );
        }
        assert_eq!(state.alerts.len(), 3);
    }

    #[test]
    fn failure_leaves_reading_unchanged() {
        let mut state = test_state();
        state.record_success(
            Reading {
                moisture: 55.0,
                temperature: 21.0,
            },
            1000,
        );
        let streak = state.record_failure(2000);
        assert_eq!(streak, 1);
        assert_eq!(state.reading.moisture, 55.0);
        assert_eq!(state.reading.temperature, 21.0);
        assert_eq!(state.alerts.len(), 0);
        assert_eq!(state.last_poll_epoch_ms, 2000);
    }

    #[test]
    fn success_resets_error_streak() {
        let mut state = test_state();
        state.record_failure(1000);
        state.record_failure(2000);
        assert_eq!(state.consecutive_errors, 2);
        state.record_success(
            Reading {
                moisture: 60.0,
                temperature: 22.0,
            },
            3000,
        );
        assert_eq!(state.consecutive_errors, 0);
    }

    #[test]
    fn toggle_pump_on_appends_exactly_one_alert() {
        let mut state = test_state();
        let active = state.toggle_pump(1000);
        assert!(active);
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].message, MANUAL_WATERING_ALERT);
    }

    #[test]
    fn toggle_pump_off_appends_none() {
        let mut state = test_state();
        state.toggle_pump(1000);
        let active = state.toggle_pump(2000);
        assert!(!active);
        assert_eq!(state.alerts.len(), 1);
    }

    #[test]
    fn recent_alerts_shows_last_three_in_order() {
        let mut state = test_state();
        for i in 0..5 {
            state.push_alert(&format!("alert {}", i), i * 1000);
        }
        let recent = state.recent_alerts(DISPLAYED_ALERTS);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].message, "alert 2");
        assert_eq!(recent[1].message, "alert 3");
        assert_eq!(recent[2].message, "alert 4");
    }

    #[test]
    fn recent_alerts_with_fewer_entries_returns_all() {
        let mut state = test_state();
        state.push_alert("only one", 1000);
        let recent = state.recent_alerts(DISPLAYED_ALERTS);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].message, "only one");
    }

    #[test]
    fn alert_store_respects_max_size() {
        let mut state = SharedState::new(ThresholdConfig::default(), 4, Vec::new());
        for i in 0..10 {
            state.push_alert(&format!("alert {}", i), i * 1000);
        }
        assert_eq!(state.alerts.len(), 4);
        assert_eq!(state.alerts[0].message, "alert 6");
        assert_eq!(state.alerts[3].message, "alert 9");
    }

    #[test]
    fn alert_store_cap_never_starves_display_window() {
        let state = SharedState::new(ThresholdConfig::default(), 0, Vec::new());
        assert_eq!(state.alerts_max_size, DISPLAYED_ALERTS);
    }

    #[test]
    fn set_thresholds_partial_update() {
        let mut state = test_state();
        let updated = state.set_thresholds(Some(45.0), None);
        assert_eq!(updated.moisture, 45.0);
        assert_eq!(updated.temperature, 25.0);

        let updated = state.set_thresholds(None, Some(28.0));
        assert_eq!(updated.moisture, 45.0);
        assert_eq!(updated.temperature, 28.0);
    }

    #[test]
    fn updated_threshold_applies_to_next_reading() {
        let mut state = test_state();
        state.record_success(
            Reading {
                moisture: 45.0,
                temperature: 22.0,
            },
            1000,
        );
        assert!(state.alerts.is_empty());

        state.set_thresholds(Some(50.0), None);
        state.record_success(
            Reading {
                moisture: 45.0,
                temperature: 22.0,
            },
            2000,
        );
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].message, LOW_MOISTURE_ALERT);
    }
}
