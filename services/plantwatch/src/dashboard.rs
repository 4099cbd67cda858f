//! Web dashboard with JSON API endpoints and a server-rendered index page

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::history::HistoricalPoint;
use crate::poller::current_epoch_ms;
use crate::state::{Alert, StateHandle, DISPLAYED_ALERTS};

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub state: StateHandle,
}

/// Partial threshold update body
#[derive(Debug, Deserialize)]
pub struct ThresholdUpdate {
    #[serde(default)]
    pub moisture: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Build the dashboard axum router
pub fn build_router(state: StateHandle) -> Router {
    let dashboard_state = DashboardState { state };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/status", get(status_handler))
        .route("/api/history", get(history_handler))
        .route("/api/alerts", get(alerts_handler))
        .route("/api/pump", post(pump_handler))
        .route("/api/thresholds", put(thresholds_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(dashboard_state)
}

const DASHBOARD_SCRIPT: &str = r#"<script>
        function togglePump() {
            fetch('/api/pump', {method: 'POST'}).then(refreshData);
        }
        function updateThresholds() {
            const moisture = parseFloat(document.getElementById('moisture-threshold').value);
            const temperature = parseFloat(document.getElementById('temperature-threshold').value);
            fetch('/api/thresholds', {
                method: 'PUT',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify({moisture: moisture, temperature: temperature})
            }).then(refreshData);
        }
        function refreshData() {
            fetch('/api/status')
                .then(r => r.json())
                .then(data => {
                    document.getElementById('moisture').textContent = data.moisture.toFixed(1);
                    document.getElementById('temperature').textContent = data.temperature.toFixed(1);
                    const badge = document.getElementById('pump-status');
                    badge.textContent = data.pump_active ? 'Active' : 'Inactive';
                    badge.style.color = data.pump_active ? '#155724' : '#383d41';
                    badge.style.backgroundColor = data.pump_active ? '#d4edda' : '#e2e3e5';
                    document.getElementById('pump-toggle').textContent =
                        data.pump_active ? 'Stop Watering' : 'Start Watering';
                });
            fetch('/api/alerts')
                .then(r => r.json())
                .then(alerts => {
                    document.getElementById('alert-list').innerHTML =
                        alerts.map(a => `<li>${a.message}</li>`).join('');
                });
        }
        setInterval(refreshData, 5000);
    </script>"#;

async fn index_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.state.read().await;

    let (pump_color, pump_bg, pump_label, pump_button) = if state.pump_active {
        ("#155724", "#d4edda", "Active", "Stop Watering")
    } else {
        ("#383d41", "#e2e3e5", "Inactive", "Start Watering")
    };

    let alert_items: String = state
        .recent_alerts(DISPLAYED_ALERTS)
        .iter()
        .map(|a| format!("<li>{}</li>", a.message))
        .collect();

    let chart = history_chart_svg(&state.history);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Plant Watering System Dashboard</title>
    {script}
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <h1>Plant Watering System Dashboard</h1>
    <div style="display: grid; grid-template-columns: 1fr 1fr; gap: 20px;">
        <section>
            <h2>Real-Time Monitoring</h2>
            <div style="padding: 0.25rem 0;"><strong>Soil Moisture:</strong> <span id="moisture">{moisture:.1}</span>%</div>
            <div style="padding: 0.25rem 0;"><strong>Temperature:</strong> <span id="temperature">{temperature:.1}</span>&deg;C</div>
            <div style="padding: 0.25rem 0;"><strong>Pump Status:</strong>
                <span id="pump-status" style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {pump_color}; background-color: {pump_bg};">{pump_label}</span>
            </div>
        </section>
        <section>
            <h2>Control Panel</h2>
            <button id="pump-toggle" onclick="togglePump()" style="padding: 0.5rem 1rem;">{pump_button}</button>
            <div style="padding: 0.25rem 0;">
                <label>Moisture Threshold (%):
                    <input id="moisture-threshold" type="number" value="{threshold_moisture}" onchange="updateThresholds()" style="width: 100%;">
                </label>
            </div>
            <div style="padding: 0.25rem 0;">
                <label>Temperature Threshold (&deg;C):
                    <input id="temperature-threshold" type="number" value="{threshold_temperature}" onchange="updateThresholds()" style="width: 100%;">
                </label>
            </div>
        </section>
        <section>
            <h2>System Alerts</h2>
            <ul id="alert-list">{alert_items}</ul>
        </section>
        <section>
            <h2>Historical Data</h2>
            {chart}
        </section>
    </div>
</body>
</html>"#,
        script = DASHBOARD_SCRIPT,
        moisture = state.reading.moisture,
        temperature = state.reading.temperature,
        pump_color = pump_color,
        pump_bg = pump_bg,
        pump_label = pump_label,
        pump_button = pump_button,
        threshold_moisture = state.thresholds.moisture,
        threshold_temperature = state.thresholds.temperature,
        alert_items = alert_items,
        chart = chart,
    );

    Html(html)
}

/// Render the simulated day as an inline SVG line chart.
/// Both series are plotted raw against one 0..100 axis.
fn history_chart_svg(history: &[HistoricalPoint]) -> String {
    const WIDTH: f64 = 720.0;
    const HEIGHT: f64 = 240.0;
    const PAD: f64 = 20.0;
    const Y_MAX: f64 = 100.0;

    let points = |value: fn(&HistoricalPoint) -> f64| -> String {
        let n = history.len();
        history
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let x = PAD + (i as f64) / ((n.saturating_sub(1)).max(1) as f64) * (WIDTH - 2.0 * PAD);
                let y = HEIGHT - PAD - (value(p) / Y_MAX) * (HEIGHT - 2.0 * PAD);
                format!("{:.1},{:.1}", x, y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    };

    let moisture_points = points(|p| p.moisture);
    let temperature_points = points(|p| p.temperature);

    format!(
        r#"<svg viewBox="0 0 {width} {height}" style="width: 100%; background: #fafafa; border: 1px solid #dee2e6;">
        <polyline fill="none" stroke="#8884d8" stroke-width="2" points="{moisture_points}"/>
        <polyline fill="none" stroke="#82ca9d" stroke-width="2" points="{temperature_points}"/>
        <text x="{pad}" y="{height}" font-size="12" fill="#6c757d">0:00</text>
        <text x="{label_x}" y="{height}" font-size="12" fill="#6c757d" text-anchor="end">23:00</text>
        <text x="{pad}" y="14" font-size="12" fill="#8884d8">moisture</text>
        <text x="{legend_x}" y="14" font-size="12" fill="#82ca9d">temperature</text>
    </svg>"#,
        width = WIDTH,
        height = HEIGHT,
        pad = PAD,
        label_x = WIDTH - PAD,
        legend_x = PAD + 80.0,
        moisture_points = moisture_points,
        temperature_points = temperature_points,
    )
}

async fn status_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.state.read().await;

    axum::Json(serde_json::json!({
        "moisture": state.reading.moisture,
        "temperature": state.reading.temperature,
        "pump_active": state.pump_active,
        "thresholds": state.thresholds,
        "last_poll_epoch_ms": state.last_poll_epoch_ms,
        "consecutive_errors": state.consecutive_errors,
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    }))
}

async fn history_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    axum::Json(state.history.clone())
}

async fn alerts_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    let alerts: Vec<Alert> = state
        .recent_alerts(DISPLAYED_ALERTS)
        .into_iter()
        .cloned()
        .collect();
    axum::Json(alerts)
}

async fn pump_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let active = dashboard.state.write().await.toggle_pump(current_epoch_ms());
    tracing::info!("Pump toggled: {}", if active { "on" } else { "off" });
    axum::Json(serde_json::json!({ "pump_active": active }))
}

async fn thresholds_handler(
    State(dashboard): State<DashboardState>,
    axum::Json(update): axum::Json<ThresholdUpdate>,
) -> impl IntoResponse {
    let thresholds = dashboard
        .state
        .write()
        .await
        .set_thresholds(update.moisture, update.temperature);
    tracing::info!(
        "Thresholds updated: moisture {}%, temperature {}°C",
        thresholds.moisture,
        thresholds.temperature
    );
    axum::Json(thresholds)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
