//! Configuration types for the plantwatch service

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Where the sensor endpoint lives and how often to poll it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_sensor_port")]
    pub port: u16,
    #[serde(default = "default_polling_interval")]
    pub polling_interval_seconds: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_sensor_port(),
            polling_interval_seconds: default_polling_interval(),
        }
    }
}

/// Alert thresholds applied to each successful poll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_moisture_threshold")]
    pub moisture: f64,
    #[serde(default = "default_temperature_threshold")]
    pub temperature: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            moisture: default_moisture_threshold(),
            temperature: default_temperature_threshold(),
        }
    }
}

/// Alert log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_alert_history_size")]
    pub history_size: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            history_size: default_alert_history_size(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_sensor_port() -> u16 {
    5000
}

fn default_polling_interval() -> u64 {
    5
}

fn default_moisture_threshold() -> f64 {
    40.0
}

fn default_temperature_threshold() -> f64 {
    25.0
}

fn default_alert_history_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    8080
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::PlantwatchError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
