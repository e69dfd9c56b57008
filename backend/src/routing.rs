use crate::models::Coordinate;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Average driving speed used for time estimates.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;
pub const DEFAULT_FUEL_PRICE_PER_LITRE: f64 = 100.0;
pub const DEFAULT_MILEAGE_KM_PER_LITRE: f64 = 40.0;

/// Speed and fuel parameters for trip estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripSettings {
    pub average_speed_kmh: f64,
    pub fuel_price_per_litre: f64,
    pub mileage_km_per_litre: f64,
}

impl Default for TripSettings {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_SPEED_KMH,
            fuel_price_per_litre: DEFAULT_FUEL_PRICE_PER_LITRE,
            mileage_km_per_litre: DEFAULT_MILEAGE_KM_PER_LITRE,
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

pub fn approximate_distance_km(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Ground distance along the landmark coordinates, two decimals.
pub fn route_distance_km(path: &[Coordinate]) -> f64 {
    round2(approximate_distance_km(path))
}

pub fn travel_hours(distance_km: f64, speed_kmh: f64) -> f64 {
    round2(distance_km / speed_kmh)
}

/// "2 hours 5 minutes", or "35 minutes" under an hour.
///
/// Both parts are truncated, and minutes come from the fractional hour, so
/// 1.15 h reads "1 hours 8 minutes".
pub fn format_duration(hours: f64) -> String {
    let hours = hours.max(0.0);
    let whole_hours = hours.trunc();
    let minutes = ((hours - whole_hours) * 60.0).trunc() as u64;
    let whole_hours = whole_hours as u64;
    if whole_hours > 0 {
        format!("{whole_hours} hours {minutes} minutes")
    } else {
        format!("{minutes} minutes")
    }
}

/// Fuel cost of a round trip over `distance_km`.
pub fn fuel_budget(distance_km: f64, price_per_litre: f64, mileage_km_per_litre: f64) -> f64 {
    let both_ways_km = distance_km * 2.0;
    round2(both_ways_km / mileage_km_per_litre * price_per_litre)
}

/// Polyline for map rendering: the path's landmarks, or a straight segment
/// between the endpoints when the path has fewer than two points.
pub fn route_polyline(
    path: &[Coordinate],
    source: Coordinate,
    destination: Coordinate,
) -> Vec<Coordinate> {
    if path.len() >= 2 {
        path.to_vec()
    } else {
        vec![source, destination]
    }
}
