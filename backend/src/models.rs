use serde::Deserialize;

pub use shared::{
    ApiError, Coordinate, Landmark, NearestLandmark, RouteRequest, RouteResponse,
};

/// Query string of `GET /api/landmarks/nearest`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lon: f64,
}

impl NearestQuery {
    pub fn coordinate(self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}
