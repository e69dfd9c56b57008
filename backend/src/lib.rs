pub mod config;
pub mod engine;
pub mod error;
pub mod gpx_export;
pub mod graph;
pub mod models;
pub mod planner;
pub mod routing;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{BuiltinGraph, DEFAULT_NEAREST_MAX_KM};
use crate::engine::{EngineError, RouteEngine};
use crate::error::RouteError;
use crate::models::{ApiError, Landmark, NearestLandmark, NearestQuery, RouteRequest, RouteResponse};
use crate::planner::plan_route;
use crate::routing::TripSettings;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RouteEngine>,
    pub trip: TripSettings,
    pub nearest_max_km: f64,
}

impl AppState {
    pub fn new(engine: RouteEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            trip: TripSettings::default(),
            nearest_max_km: DEFAULT_NEAREST_MAX_KM,
        }
    }
}

/// Load the graph named by `GRAPH_JSON`, or the embedded graph picked by
/// `PLANNER_GRAPH`.
pub fn load_engine(config: &config::PlannerConfig) -> Result<RouteEngine, EngineError> {
    match (&config.graph_path, config.builtin_graph) {
        (Some(path), _) => RouteEngine::from_file(path),
        (None, BuiltinGraph::Sample) => RouteEngine::dehradun_sample(),
        (None, BuiltinGraph::Roads) => RouteEngine::dehradun_roads(),
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/route", post(route_handler))
        .route("/api/locations", get(locations_handler))
        .route("/api/landmarks", get(landmarks_handler))
        .route("/api/landmarks/nearest", get(nearest_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

async fn health_handler() -> &'static str {
    "ok"
}

async fn route_handler(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> ApiResult<RouteResponse> {
    tracing::info!("Route request: {:?} -> {:?}", req.source, req.destination);

    plan_route(&state.engine, state.trip, &req)
        .map(Json)
        .map_err(route_error)
}

async fn locations_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.engine.locations())
}

async fn landmarks_handler(State(state): State<AppState>) -> Json<Vec<Landmark>> {
    Json(state.engine.landmarks())
}

async fn nearest_handler(
    State(state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> ApiResult<NearestLandmark> {
    let target = query.coordinate();
    if !target.is_valid() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid coordinate {:.5}, {:.5}", target.lat, target.lon),
        ));
    }

    match state.engine.closest_landmark(target, state.nearest_max_km) {
        Some((landmark, distance_km)) => Ok(Json(NearestLandmark {
            name: landmark.name,
            coordinate: landmark.coordinate,
            distance_km,
        })),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!(
                "No landmark within {} km of {:.5}, {:.5}",
                state.nearest_max_km, target.lat, target.lon
            ),
        )),
    }
}

fn route_error(err: RouteError) -> (StatusCode, Json<ApiError>) {
    let status = err.status();
    if status.is_server_error() {
        tracing::error!("route planning failed: {err}");
    } else {
        tracing::warn!("route request rejected: {err}");
    }
    api_error(status, err.to_string())
}

fn api_error(status: StatusCode, message: String) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError { message }))
}
