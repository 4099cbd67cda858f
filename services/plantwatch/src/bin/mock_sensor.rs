//! Mock sensor bridge for testing
//!
//! Serves the `/data` endpoint the poller reads, with slowly drifting
//! simulated values. Used for exercising the dashboard without real
//! hardware or an MQTT bridge.
//!
//! Usage:
//!   mock_sensor [--port PORT]
//!
//! The port can also be set via the MOCK_SENSOR_PORT environment variable.
//! Command line argument takes precedence over environment variable.
//! Default port is 5000 (same as the sensor bridge).

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use rand::Rng;

#[derive(Debug, Clone, Copy)]
struct Simulated {
    soil: f64,
    temperature: f64,
    humidity: f64,
}

#[tokio::main]
async fn main() {
    // Port priority: command line arg > environment variable > default (5000)
    let port = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .or_else(|| {
            std::env::var("MOCK_SENSOR_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .unwrap_or(5000u16);

    eprintln!("Mock sensor starting on port {}", port);

    let sim = Arc::new(Mutex::new(Simulated {
        soil: 65.0,
        temperature: 23.0,
        humidity: 55.0,
    }));

    let app = Router::new().route("/data", get(data_handler)).with_state(sim);

    let listener = match tokio::net::TcpListener::bind(("127.0.0.1", port)).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to port {}: {}", port, e);
            std::process::exit(1);
        }
    };

    eprintln!("Mock sensor listening on port {}", port);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Mock sensor server error: {}", e);
        std::process::exit(1);
    }
}

async fn data_handler(State(sim): State<Arc<Mutex<Simulated>>>) -> Json<serde_json::Value> {
    let mut sim = sim.lock().expect("simulated state poisoned");
    let mut rng = rand::thread_rng();

    sim.soil = (sim.soil + rng.gen_range(-3.0..3.0)).clamp(20.0, 90.0);
    sim.temperature = (sim.temperature + rng.gen_range(-0.5..0.5)).clamp(15.0, 35.0);
    sim.humidity = (sim.humidity + rng.gen_range(-2.0..2.0)).clamp(30.0, 90.0);

    Json(serde_json::json!({
        "soil": sim.soil,
        "temperature": sim.temperature,
        "humidity": sim.humidity,
    }))
}
