use crate::{
    engine::RouteEngine,
    error::RouteError,
    gpx_export::encode_route_as_gpx,
    models::{Landmark, RouteRequest, RouteResponse},
    routing::{
        TripSettings, format_duration, fuel_budget, route_distance_km, route_polyline, travel_hours,
    },
};

/// Resolve a route request into the full trip summary served by `/api/route`.
pub fn plan_route(
    engine: &RouteEngine,
    trip: TripSettings,
    req: &RouteRequest,
) -> Result<RouteResponse, RouteError> {
    let source = required(req.source.as_deref())?;
    let destination = required(req.destination.as_deref())?;

    for name in [source, destination] {
        if !engine.contains(name) {
            return Err(RouteError::UnknownLocation {
                name: name.to_string(),
                choices: engine.locations().join(", "),
            });
        }
    }

    let result = engine.shortest_path(source, destination);
    if !result.is_reachable() {
        return Err(RouteError::NoRoute {
            from: source.to_string(),
            to: destination.to_string(),
        });
    }

    let stops: Vec<Landmark> = result
        .path
        .iter()
        .filter_map(|name| {
            engine.coordinate(name).map(|coordinate| Landmark {
                name: name.clone(),
                coordinate,
            })
        })
        .collect();
    let coords: Vec<_> = stops.iter().map(|stop| stop.coordinate).collect();

    let distance_km = route_distance_km(&coords);
    let duration_hours = travel_hours(distance_km, trip.average_speed_kmh);
    // Both endpoints were checked above.
    let polyline = match (engine.coordinate(source), engine.coordinate(destination)) {
        (Some(from), Some(to)) => route_polyline(&coords, from, to),
        _ => coords.clone(),
    };
    let gpx_base64 =
        encode_route_as_gpx(&format!("{source} to {destination}"), &stops, &polyline)?;

    tracing::debug!(
        "planned {source:?} -> {destination:?}: {} stops, cost {}, {distance_km} km",
        result.path.len(),
        result.distance
    );

    Ok(RouteResponse {
        source: source.to_string(),
        destination: destination.to_string(),
        path: result.path,
        cost: result.distance,
        distance_km,
        duration_hours,
        time: format_duration(duration_hours),
        fuel_budget: fuel_budget(
            distance_km,
            trip.fuel_price_per_litre,
            trip.mileage_km_per_litre,
        ),
        polyline,
        gpx_base64,
    })
}

fn required(name: Option<&str>) -> Result<&str, RouteError> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(RouteError::MissingEndpoints),
    }
}
