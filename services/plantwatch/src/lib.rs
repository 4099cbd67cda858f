//! Plantwatch - plant watering monitoring and control
//!
//! Polls a sensor bridge for soil moisture and temperature, keeps an
//! in-memory alert log and manual pump state, and serves a web dashboard.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod io;
pub mod poller;
pub mod sensor;
pub mod state;

pub use config::{load_config, Config};
pub use error::{PlantwatchError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;
use crate::sensor::SensorEndpoint;

/// Run the plantwatch service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::default());
    let cancel = CancellationToken::new();

    let sensor = SensorEndpoint::new(&config.sensor, Arc::clone(&http));
    let interval = Duration::from_secs(config.sensor.polling_interval_seconds);

    // Shared state, with the simulated chart series generated once here
    let state = state::new_state_handle(
        config.thresholds,
        config.alerts.history_size,
        history::simulated_day(),
    );

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Start dashboard if enabled
    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let dashboard_state = Arc::clone(&state);
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            let router = dashboard::build_router(dashboard_state);
            let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
            tracing::info!("Dashboard listening on http://{}", addr);

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                        dashboard_port,
                        e
                    );
                    return;
                }
            };

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    tracing::info!(
        "Polling {} every {}s",
        sensor.url(),
        config.sensor.polling_interval_seconds
    );

    // Run the poll loop (blocks until cancelled)
    poller::run(sensor, state, interval, cancel).await;

    tracing::info!("Plantwatch stopped");
    Ok(())
}
