//! Thin Axum HTTP surface over the place resolution engine.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use place_core::{EngineConfig, Mode, PlaceEngine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

struct AppState {
    engine: Arc<PlaceEngine>,
}

#[derive(Deserialize)]
struct StandardizeRequest {
    text: String,
    #[serde(default)]
    default_country: Option<i64>,
    #[serde(default)]
    mode: Option<Mode>,
    #[serde(default = "default_num_results")]
    num_results: usize,
}

fn default_num_results() -> usize {
    3
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn standardize_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StandardizeRequest>,
) -> impl IntoResponse {
    let mode = req.mode.unwrap_or_default();
    info!(text = %req.text, ?mode, num_results = req.num_results, "standardize request");
    let results = state.engine.standardize(&req.text, req.default_country, mode, req.num_results);
    Json(results).into_response()
}

async fn place_handler(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.engine.place(id) {
        Some(place) => Json(place).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse { error: format!("no place with id {id}") }),
        )
            .into_response(),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Query-string form of `POST /standardize`, offered as a convenience for
/// quick manual checks (`GET /standardize?text=St.+Louis,+Missouri`).
#[derive(Deserialize)]
struct StandardizeQuery {
    text: String,
    #[serde(default)]
    num_results: Option<usize>,
}

async fn standardize_query_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<StandardizeQuery>,
) -> impl IntoResponse {
    let results = state.engine.standardize_top_n(&q.text, q.num_results.unwrap_or(3));
    Json(results)
}

fn load_engine() -> Arc<PlaceEngine> {
    let mut props: HashMap<String, String> = HashMap::new();
    props.insert("largeCountries".to_string(), "1500".to_string());
    props.insert("largeCountryLevelWeights".to_string(), "1.0,2.0,3.0,4.0".to_string());
    props.insert("mediumCountryLevelWeights".to_string(), "1.0,1.5,2.0,2.5".to_string());
    props.insert("smallCountryLevelWeights".to_string(), "1.0,1.2,1.4,1.6".to_string());
    props.insert("primaryMatchWeight".to_string(), "2.0".to_string());

    match (std::env::var("PLACES_FILE"), std::env::var("PLACE_WORDS_FILE")) {
        (Ok(places_path), Ok(words_path)) => {
            Arc::new(PlaceEngine::from_files(&places_path, &words_path, &props).expect("load gazetteer from disk"))
        }
        _ => {
            info!("PLACES_FILE/PLACE_WORDS_FILE not set, starting with an empty in-memory gazetteer");
            let store = place_core::store::InMemoryStore::default();
            Arc::new(PlaceEngine::from_config(Arc::new(store), &props).expect("build engine from default config"))
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let engine = load_engine();
    place_core::engine::install_global(engine.clone());
    let state = Arc::new(AppState { engine });

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = Router::new()
        .route("/standardize", post(standardize_handler))
        .route("/standardize", get(standardize_query_handler))
        .route("/places/:id", get(place_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("place-web listening on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
