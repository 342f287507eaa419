use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use corgi_court_core::{RelayError, RelayService};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// HTTP rendering of a relay failure.
#[derive(Debug)]
pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (code, Json(body)).into_response()
    }
}

pub fn router(state: AppState, route: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(route, post(judge).fallback(method_not_allowed))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `POST <route>`: judge one case.
async fn judge(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let verdict = state.relay.judge(&body).await?;
    Ok(Json(verdict))
}

/// Any other method on the relay route. Runs without reading the body or the credential.
async fn method_not_allowed() -> ApiError {
    RelayError::MethodNotAllowed.into()
}

pub async fn serve(config: &ServerConfig, relay: RelayService) -> Result<()> {
    if !relay.is_configured() {
        tracing::warn!("API_KEY is not set; every judge request will fail with a configuration error");
    }
    let state = AppState {
        relay: Arc::new(relay),
    };
    let app = router(state, &config.route);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    tracing::info!(
        address = %listener.local_addr()?,
        route = %config.route,
        "listening for connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("corgi-court stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use corgi_court_core::{GenerationClient, GenerationError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    const CASE: &str = r#"{"eventDescription":"e","femaleName":"f","femaleArgument":"fa","maleName":"m","maleArgument":"ma"}"#;

    struct CannedGenerator {
        reply: Result<Option<&'static str>, u16>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerationClient for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(text.map(str::to_string)),
                Err(status) => Err(GenerationError::Status {
                    status,
                    body: String::new(),
                }),
            }
        }
    }

    fn app_with(reply: Result<Option<&'static str>, u16>) -> (Router, Arc<CannedGenerator>) {
        let generator = Arc::new(CannedGenerator {
            reply,
            calls: AtomicUsize::new(0),
        });
        let relay = RelayService::new(Some(generator.clone() as Arc<dyn GenerationClient>));
        let state = AppState {
            relay: Arc::new(relay),
        };
        (router(state, "/api/judge"), generator)
    }

    async fn call(app: Router, method: Method, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/judge")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn other_methods_are_rejected_without_upstream_call() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let (app, generator) = app_with(Ok(Some("{}")));
            let (status, body) = call(app, method, CASE).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body, json!({ "error": "Method Not Allowed" }));
            assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn oversized_bodies_on_other_methods_are_still_rejected() {
        let oversized = "x".repeat(3 * 1024 * 1024);
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let (app, generator) = app_with(Ok(Some("{}")));
            let (status, body) = call(app, method, &oversized).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body, json!({ "error": "Method Not Allowed" }));
            assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn missing_credential_is_server_error() {
        let state = AppState {
            relay: Arc::new(RelayService::new(None)),
        };
        for body in [CASE, "", "[1, 2, 3]"] {
            let (status, value) = call(router(state.clone(), "/api/judge"), Method::POST, body).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            let message = value["error"].as_str().unwrap();
            assert!(message.starts_with("Server Configuration Error"));
        }
    }

    #[tokio::test]
    async fn upstream_status_is_passed_through() {
        let (app, _) = app_with(Err(503));
        let (status, body) = call(app, Method::POST, CASE).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "error": "Upstream API Error: 503" }));
    }

    #[tokio::test]
    async fn empty_model_output_is_bad_gateway() {
        let (app, _) = app_with(Ok(None));
        let (status, body) = call(app, Method::POST, CASE).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!({ "error": "Empty response from AI model" }));
    }

    #[tokio::test]
    async fn model_json_is_returned_unchanged() {
        let (app, generator) = app_with(Ok(Some(
            r#"{"analysis":"ok","femaleResponsibility":60,"maleResponsibility":40,"verdictSummary":"s","winner":"female","advice":"a"}"#,
        )));
        let (status, body) = call(app, Method::POST, CASE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "analysis": "ok",
                "femaleResponsibility": 60,
                "maleResponsibility": 40,
                "verdictSummary": "s",
                "winner": "female",
                "advice": "a"
            })
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_json_model_output_is_wrapped() {
        let (app, _) = app_with(Ok(Some("not json")));
        let (status, body) = call(app, Method::POST, CASE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "raw": "not json" }));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, generator) = app_with(Ok(Some("{}")));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}
