use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, MISSING_DATA_MESSAGE};
use crate::loader;
use crate::page;
use crate::view::{self, ViewModel};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StateQuery {
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

pub fn router(config: DashboardConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(dashboard))
        .route("/api/view", get(view_json))
        .route("/health", get(health))
        .with_state(state)
}

/// Every request reloads the inputs; nothing survives between renders.
fn render_fresh(
    config: &DashboardConfig,
    requested: Option<&str>,
) -> Result<ViewModel, DashboardError> {
    let started = Instant::now();
    let dataset = loader::load(&config.inputs)?;
    let view = view::render(&dataset, requested, config);
    info!(
        state = view.filter.selected().unwrap_or("-"),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "render complete"
    );
    Ok(view)
}

fn status_for(err: &DashboardError) -> StatusCode {
    if err.is_missing_input() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn log_failure(err: &DashboardError) {
    if err.is_missing_input() {
        warn!(error = %err, "render aborted");
    } else {
        error!(error = %err, "render failed");
    }
}

async fn dashboard(State(state): State<AppState>, Query(query): Query<StateQuery>) -> Response {
    let config = state.config.as_ref();

    match render_fresh(config, query.state.as_deref()) {
        Ok(view) => Html(page::build_page(&view, config)).into_response(),
        Err(err) => {
            log_failure(&err);
            let body = if err.is_missing_input() {
                page::build_missing_data_page(config)
            } else {
                page::build_error_page(config, &err.to_string())
            };
            (status_for(&err), Html(body)).into_response()
        }
    }
}

async fn view_json(State(state): State<AppState>, Query(query): Query<StateQuery>) -> Response {
    match render_fresh(&state.config, query.state.as_deref()) {
        Ok(view) => Json(view).into_response(),
        Err(err) => {
            log_failure(&err);
            let body = if err.is_missing_input() {
                ErrorBody {
                    code: "MISSING_INPUT_FILE",
                    message: MISSING_DATA_MESSAGE.to_string(),
                }
            } else {
                ErrorBody {
                    code: "RENDER_FAILED",
                    message: err.to_string(),
                }
            };
            (status_for(&err), Json(body)).into_response()
        }
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn serve(config: DashboardConfig, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "dashboard listening");

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn fetch(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn dashboard_renders_selected_state() {
        let dir = TempDir::new().unwrap();
        loader::tests::write_fixture(dir.path());
        let app = router(DashboardConfig::new(dir.path()));

        let (status, body) = fetch(app, "/?state=MH").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Monthly Trend – MH"));
        assert!(body.contains("3,300"));
    }

    #[tokio::test]
    async fn json_view_matches_the_pure_render() {
        let dir = TempDir::new().unwrap();
        let inputs = loader::tests::write_fixture(dir.path());
        let config = DashboardConfig::new(dir.path());
        let expected = view::render(&loader::load(&inputs).unwrap(), Some("KA"), &config);

        let (status, body) = fetch(router(config), "/api/view?state=KA").await;
        assert_eq!(status, StatusCode::OK);
        let actual: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(actual, serde_json::to_value(&expected).unwrap());
        assert_eq!(actual["kpis"]["total_warnings"], 5);
    }

    #[tokio::test]
    async fn missing_inputs_never_render_a_partial_dashboard() {
        let dir = TempDir::new().unwrap();
        let app = router(DashboardConfig::new(dir.path()));

        let (status, body) = fetch(app.clone(), "/").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains(MISSING_DATA_MESSAGE));
        assert!(!body.contains("Total Updates"));

        let (status, body) = fetch(app, "/api/view").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("MISSING_INPUT_FILE"));
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let dir = TempDir::new().unwrap();
        let (status, _) = fetch(router(DashboardConfig::new(dir.path())), "/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
