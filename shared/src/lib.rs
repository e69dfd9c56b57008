use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Source and destination are landmark names as listed by `/api/locations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteRequest {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

impl RouteRequest {
    pub fn between(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            destination: Some(destination.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub source: String,
    pub destination: String,
    /// Landmark names from source to destination.
    pub path: Vec<String>,
    /// Sum of graph edge weights along `path`.
    pub cost: f64,
    pub distance_km: f64,
    pub duration_hours: f64,
    /// Human readable travel time, e.g. "1 hours 5 minutes".
    pub time: String,
    pub fuel_budget: f64,
    pub polyline: Vec<Coordinate>,
    pub gpx_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestLandmark {
    pub name: String,
    pub coordinate: Coordinate,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}
