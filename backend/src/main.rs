use std::sync::Arc;

use backend::{AppState, config::PlannerConfig, create_router, load_engine};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PlannerConfig::from_env()?;
    let engine = load_engine(&config)?;
    match &config.graph_path {
        Some(path) => tracing::info!("loaded landmark graph from {}", path.display()),
        None => tracing::info!("loaded embedded Dehradun {:?} graph", config.builtin_graph),
    }
    tracing::info!(
        "{} landmarks, {} roads; {} km/h average speed",
        engine.node_count(),
        engine.edge_count(),
        config.trip.average_speed_kmh
    );

    let state = AppState {
        engine: Arc::new(engine),
        trip: config.trip,
        nearest_max_km: config.nearest_max_km,
    };
    let app = create_router(state);

    tracing::info!("starting backend on http://{}", config.addr);
    tracing::info!("  POST /api/route - shortest route between two landmarks");
    tracing::info!("  GET /api/locations - landmark names");
    tracing::info!("  GET /api/landmarks - landmarks with coordinates");
    tracing::info!("  GET /api/landmarks/nearest?lat=&lon= - closest landmark");

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
