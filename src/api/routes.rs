use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::get,
    Json, Router,
};
use tower_http::services::ServeDir;
use tracing::info;

use crate::api::health::{HealthReport, HealthState};
use crate::error::AppError;
use crate::refresh::Refresher;
use crate::render::render_page;

#[derive(Clone)]
pub struct ApiState {
    pub refresher: Arc<Refresher>,
    pub health: Arc<HealthState>,
}

/// `/` and `/update` plus static assets (stylesheet, `forecast.json`) from the output dir.
pub fn router(state: ApiState) -> Router {
    let assets = ServeDir::new(state.refresher.store().dir());
    Router::new()
        .route("/", get(get_index))
        .route("/update", get(get_update))
        .route("/health", get(get_health))
        .fallback_service(assets)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Last generated page. Before any page exists, the "no data" page is rendered in memory.
async fn get_index(State(state): State<ApiState>) -> Result<Html<String>, AppError> {
    match state.refresher.store().read_page().await? {
        Some(html) => Ok(Html(html)),
        None => Ok(Html(render_page(None)?)),
    }
}

async fn get_update(State(state): State<ApiState>) -> Result<Redirect, AppError> {
    info!("Manual weather update requested");
    state.refresher.refresh().await?;
    Ok(Redirect::to("/"))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthReport> {
    Json(state.health.report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::output::OutputStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::collections::HashMap;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(api_url: &str, dir: &std::path::Path) -> (Router, Arc<Refresher>) {
        let env: HashMap<&str, String> = [
            ("WEATHER_API_KEY", "k".to_string()),
            ("LAT", "1".to_string()),
            ("LON", "2".to_string()),
            ("OWM_API_URL", api_url.to_string()),
            ("OUTPUT_DIR", dir.display().to_string()),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|k| env.get(k).cloned()).expect("config");
        let health = Arc::new(HealthState::new());
        let store = OutputStore::new(cfg.output_dir.clone());
        let refresher = Arc::new(Refresher::new(cfg, store, Arc::clone(&health)).expect("refresher"));
        let router = router(ApiState { refresher: Arc::clone(&refresher), health });
        (router, refresher)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body bytes");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    #[tokio::test]
    async fn index_before_first_run_serves_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, _) = app("http://127.0.0.1:9", dir.path());

        let resp = app.oneshot(get("/")).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("Unable to get weather data"));
    }

    #[tokio::test]
    async fn failed_update_is_500_and_index_keeps_last_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, refresher) = app(&server.uri(), dir.path());
        refresher.store().write_page("<p>last good</p>").await.expect("seed page");

        let resp = app.clone().oneshot(get("/update")).await.expect("response");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = app.oneshot(get("/")).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "<p>last good</p>");
    }

    #[tokio::test]
    async fn successful_update_redirects_home() {
        let now = chrono::Utc::now().timestamp();
        let body = serde_json::json!({
            "list": [{ "dt": now, "main": { "temp": 50.0 },
                       "weather": [{ "main": "Clouds", "description": "overcast", "icon": "04d" }] }],
            "city": { "name": "Redirect City", "sunrise": now, "sunset": now, "timezone": 0 }
        });
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, _) = app(&server.uri(), dir.path());

        let resp = app.clone().oneshot(get("/update")).await.expect("response");
        assert!(resp.status().is_redirection());
        assert_eq!(resp.headers()["location"], "/");

        let resp = app.clone().oneshot(get("/")).await.expect("response");
        assert!(body_text(resp).await.contains("Redirect City"));

        let resp = app.oneshot(get("/forecast.json")).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&body_text(resp).await).expect("json parse");
        assert_eq!(json["city_name"], "Redirect City");
    }

    #[tokio::test]
    async fn health_reports_counters() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, _) = app("http://127.0.0.1:9", dir.path());

        let resp = app.oneshot(get("/health")).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&body_text(resp).await).expect("json parse");
        assert_eq!(json["status"], "starting");
        assert_eq!(json["failures"], 0);
    }
}
