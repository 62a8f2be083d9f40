use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use roll_cutter::chunk::DEFAULT_CHUNK_SIZE;
use roll_cutter::config::DEFAULT_TIME_BUDGET;
use roll_cutter::{CutError, Demand, ParentRoll, RollPlan, RunConfig, SolutionSource, Solver};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct OptimizeRequest {
    stock: f64,
    cuts: Vec<Demand>,
    #[serde(default = "default_chunk_sizes")]
    chunk_sizes: Vec<usize>,
    #[serde(default = "default_time_budget_secs")]
    time_budget_secs: f64,
    #[serde(default = "default_true")]
    symmetry_breaking: bool,
}

fn default_chunk_sizes() -> Vec<usize> {
    vec![DEFAULT_CHUNK_SIZE]
}

fn default_time_budget_secs() -> f64 {
    DEFAULT_TIME_BUDGET.as_secs_f64()
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
struct OptimizeResponse {
    rolls: Vec<RollPlan>,
    stock: f64,
    rolls_used: usize,
    waste_percent: f64,
    source: SolutionSource,
}

async fn optimize(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    let time_budget = Duration::try_from_secs_f64(req.time_budget_secs).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "time_budget_secs must be a non-negative number".to_string(),
        )
    })?;

    let config = RunConfig {
        chunk_sizes: req.chunk_sizes,
        time_budget,
        emit_output: false,
        symmetry_breaking: req.symmetry_breaking,
        ..RunConfig::default()
    };

    let solver = Solver::new(ParentRoll::new(req.stock), req.cuts, config);
    let solution = solver.solve().await.map_err(|e| match e {
        CutError::Host(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        _ => (StatusCode::BAD_REQUEST, e.to_string()),
    })?;

    Ok(Json(OptimizeResponse {
        stock: solution.parent.width,
        rolls_used: solution.rolls_used(),
        waste_percent: solution.total_waste_percent(),
        source: solution.source,
        rolls: solution.rolls,
    }))
}

fn main() {
    let _sentry = sentry::init((
        std::env::var("SENTRY_DSN").ok(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
        .block_on(serve());
}

async fn serve() {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
