//! HTTP surface: `POST /api/detect` and `GET /health`.

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Args;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::detect::{self, DetectionRequest, DetectionResult};
use crate::error::DetectError;
use crate::fetch::{FetchConfig, Fetcher};
use crate::telemetry::{self};
use crate::telemetry::ops::serve::Phase;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Args, Debug)]
pub struct ServeCmd {
    #[arg(long)] bind: Option<String>, // falls back to SLEUTH_BIND, then 127.0.0.1:3000
    #[arg(long)] timeout_secs: Option<u64>, // per-request fetch bound
}

/// Only immutable configuration is shared; every request builds its own client.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: FetchConfig,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/detect", post(handle_detect))
        .with_state(state)
}

pub async fn run(args: ServeCmd) -> Result<()> {
    let log = telemetry::serve();
    let bind = args
        .bind
        .or_else(|| std::env::var("SLEUTH_BIND").ok())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let config = FetchConfig::resolve(args.timeout_secs);
    let root = log.root_span_kv([("bind", bind.clone())]);

    async {
        let listener = TcpListener::bind(&bind)
            .instrument(log.span_kv(&Phase::Bind, [("addr", bind.clone())]))
            .await
            .with_context(|| format!("binding {bind}"))?;
        let addr = listener.local_addr().context("reading bound address")?;
        log.info_kv(&format!("🚀 Listening on http://{addr}"), [("addr", addr.to_string()), ("timeout_secs", config.timeout.as_secs().to_string())]);

        axum::serve(listener, router(AppState { config })).await.context("server error")
    }
    .instrument(root)
    .await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_detect(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<DetectionResult>) {
    let url = payload
        .ok()
        .and_then(|Json(body)| body.get("url").and_then(Value::as_str).map(str::to_owned));
    let Some(url) = url else {
        telemetry::serve().warn("rejected request without a usable url");
        return reply(400, DetectionResult::failed(&DetectError::missing_url()));
    };

    let fetcher = match Fetcher::new(state.config) {
        Ok(f) => f,
        Err(e) => return reply(e.status_code(), DetectionResult::failed(&e)),
    };
    let log = telemetry::detect();
    let span = telemetry::serve().span_kv(&Phase::Request, [("url", url.clone())]);
    let outcome = detect::detect(&fetcher, &DetectionRequest { url }, &log).instrument(span).await;
    reply(outcome.status, outcome.result)
}

fn reply(status: u16, result: DetectionResult) -> (StatusCode, Json<DetectionResult>) {
    (StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), Json(result))
}
