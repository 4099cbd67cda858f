//! Sensor endpoint client
//!
//! Reads the remote sensor bridge, which serves the latest readings as
//! `{"soil": <percent>, "temperature": <celsius>}`. The bridge may publish
//! additional fields (humidity, for one); they are ignored here.

use std::sync::Arc;

use serde::Deserialize;

use crate::config::SensorConfig;
use crate::io::HttpClient;
use crate::state::Reading;

/// Wire format of the sensor bridge response
#[derive(Debug, Deserialize)]
struct SensorPayload {
    soil: f64,
    temperature: f64,
}

/// Client for the sensor data endpoint
pub struct SensorEndpoint {
    url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for SensorEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorEndpoint")
            .field("url", &self.url)
            .finish()
    }
}

impl SensorEndpoint {
    pub fn new(config: &SensorConfig, http: Arc<dyn HttpClient>) -> Self {
        let url = format!("http://{}:{}/data", config.host, config.port);
        tracing::debug!("Created SensorEndpoint at {}", url);
        Self { url, http }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch one reading. Any failure (transport, status, parse) is an error;
    /// the caller decides what to do with the previous reading.
    pub async fn read(&self) -> crate::Result<Reading> {
        let response = self.http.get(&self.url).await?;

        if response.status != 200 {
            return Err(crate::PlantwatchError::Sensor(format!(
                "sensor endpoint returned status {}",
                response.status
            )));
        }

        let payload: SensorPayload = serde_json::from_str(&response.body)?;
        Ok(Reading {
            moisture: payload.soil,
            temperature: payload.temperature,
        })
    }
}
