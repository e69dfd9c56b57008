use std::path::PathBuf;

use backend::{
    engine::RouteEngine, error::RouteError, models::RouteRequest, planner::plan_route,
    routing::TripSettings,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Print the shortest route between two Dehradun landmarks"
)]
struct Args {
    /// Source landmark, e.g. "Forest Research Institute"
    #[arg(long, required_unless_present = "list")]
    from: Option<String>,

    /// Destination landmark, e.g. "Clock Tower"
    #[arg(long, required_unless_present = "list")]
    to: Option<String>,

    /// Graph JSON file; defaults to the embedded landmark graph
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Use the embedded distance-weighted road graph
    #[arg(long, conflicts_with = "graph")]
    roads: bool,

    /// Average speed in km/h for the time estimate
    #[arg(long, default_value_t = backend::routing::DEFAULT_SPEED_KMH)]
    speed: f64,

    /// List known landmarks and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let engine = match (&args.graph, args.roads) {
        (Some(path), _) => RouteEngine::from_file(path)?,
        (None, true) => RouteEngine::dehradun_roads()?,
        (None, false) => RouteEngine::dehradun_sample()?,
    };

    if args.list {
        for name in engine.locations() {
            println!("{name}");
        }
        return Ok(());
    }

    if !args.speed.is_finite() || args.speed <= 0.0 {
        return Err(format!("--speed must be positive, got {}", args.speed).into());
    }
    let trip = TripSettings {
        average_speed_kmh: args.speed,
        ..TripSettings::default()
    };
    let req = RouteRequest {
        source: args.from,
        destination: args.to,
    };

    match plan_route(&engine, trip, &req) {
        Ok(route) => {
            println!("{}", route.path.join(" -> "));
            for leg in route.path.windows(2) {
                if let Some(weight) = engine.edge_weight(&leg[0], &leg[1]) {
                    println!("  {} -> {}: {weight}", leg[0], leg[1]);
                }
            }
            println!("cost:     {}", route.cost);
            println!("distance: {} km", route.distance_km);
            println!("time:     {}", route.time);
            println!("fuel:     {}", route.fuel_budget);
            Ok(())
        }
        Err(err @ RouteError::NoRoute { .. }) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err @ (RouteError::MissingEndpoints | RouteError::UnknownLocation { .. })) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}
