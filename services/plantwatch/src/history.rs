//! Simulated historical chart data
//!
//! There is no real measurement store yet; the dashboard charts one
//! synthesized day of readings, generated once at startup.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One charted point of the simulated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub time: String,
    pub moisture: f64,
    pub temperature: f64,
}

/// Hours in the simulated series
pub const HISTORY_POINTS: usize = 24;

const MOISTURE_RANGE: std::ops::Range<f64> = 50.0..80.0;
const TEMPERATURE_RANGE: std::ops::Range<f64> = 20.0..30.0;

/// Synthesize one day of hourly readings, labeled "0:00" through "23:00"
pub fn simulated_day() -> Vec<HistoricalPoint> {
    let mut rng = rand::thread_rng();
    (0..HISTORY_POINTS)
        .map(|hour| HistoricalPoint {
            time: format!("{}:00", hour),
            moisture: rng.gen_range(MOISTURE_RANGE),
            temperature: rng.gen_range(TEMPERATURE_RANGE),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_day_has_24_points() {
        assert_eq!(simulated_day().len(), 24);
    }

    #[test]
    fn labels_are_strictly_increasing_hours() {
        let day = simulated_day();
        for (hour, point) in day.iter().enumerate() {
            assert_eq!(point.time, format!("{}:00", hour));
        }
        assert_eq!(day[0].time, "0:00");
        assert_eq!(day[23].time, "23:00");
    }

    #[test]
    fn values_stay_in_range() {
        for point in simulated_day() {
            assert!(
                (50.0..80.0).contains(&point.moisture),
                "moisture {} out of range",
                point.moisture
            );
            assert!(
                (20.0..30.0).contains(&point.temperature),
                "temperature {} out of range",
                point.temperature
            );
        }
    }

    #[test]
    fn successive_days_differ() {
        // 48 draws colliding exactly is not a realistic failure mode
        assert_ne!(simulated_day(), simulated_day());
    }
}
