use axum::http::StatusCode;
use thiserror::Error;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Source and destination are required")]
    MissingEndpoints,
    #[error("Invalid location selected. Please choose from: {choices}")]
    UnknownLocation { name: String, choices: String },
    #[error("No route found")]
    NoRoute { from: String, to: String },
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("routing engine error: {0}")]
    Engine(#[from] EngineError),
}

impl RouteError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingEndpoints | Self::UnknownLocation { .. } => StatusCode::BAD_REQUEST,
            Self::NoRoute { .. } => StatusCode::NOT_FOUND,
            Self::Gpx(_) | Self::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
