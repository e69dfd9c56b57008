use std::{net::SocketAddr, path::PathBuf};

use crate::routing::TripSettings;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_NEAREST_MAX_KM: f64 = 20.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid socket address")]
    InvalidAddr { key: &'static str, value: String },
    #[error("{key}={value:?} must be a positive number")]
    InvalidNumber { key: &'static str, value: String },
    #[error("PLANNER_GRAPH={0:?} must be \"sample\" or \"roads\"")]
    InvalidGraph(String),
}

/// Which embedded graph to serve when no graph file is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuiltinGraph {
    /// Hand-weighted landmark chain.
    #[default]
    Sample,
    /// Road topology weighted by great-circle distance.
    Roads,
}

impl std::str::FromStr for BuiltinGraph {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "sample" => Ok(Self::Sample),
            "roads" => Ok(Self::Roads),
            _ => Err(ConfigError::InvalidGraph(raw.to_string())),
        }
    }
}

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub addr: SocketAddr,
    /// Graph file to load instead of the embedded Dehradun graph.
    pub graph_path: Option<PathBuf>,
    pub builtin_graph: BuiltinGraph,
    pub trip: TripSettings,
    pub nearest_max_km: f64,
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_raw = lookup("PLANNER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw.parse().map_err(|_| ConfigError::InvalidAddr {
            key: "PLANNER_ADDR",
            value: addr_raw.clone(),
        })?;

        let defaults = TripSettings::default();
        let positive = |key: &'static str, default: f64| -> Result<f64, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => match raw.trim().parse::<f64>() {
                    Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
                    _ => Err(ConfigError::InvalidNumber { key, value: raw }),
                },
            }
        };

        Ok(Self {
            addr,
            graph_path: lookup("GRAPH_JSON")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            builtin_graph: lookup("PLANNER_GRAPH")
                .map(|raw| raw.parse::<BuiltinGraph>())
                .transpose()?
                .unwrap_or_default(),
            trip: TripSettings {
                average_speed_kmh: positive("AVERAGE_SPEED_KMH", defaults.average_speed_kmh)?,
                fuel_price_per_litre: positive(
                    "FUEL_PRICE_PER_LITRE",
                    defaults.fuel_price_per_litre,
                )?,
                mileage_km_per_litre: positive(
                    "FUEL_MILEAGE_KM_PER_LITRE",
                    defaults.mileage_km_per_litre,
                )?,
            },
            nearest_max_km: positive("NEAREST_MAX_KM", DEFAULT_NEAREST_MAX_KM)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<PlannerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PlannerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]).expect("defaults");
        assert_eq!(config.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert!(config.graph_path.is_none());
        assert_eq!(config.builtin_graph, BuiltinGraph::Sample);
        assert_eq!(config.trip, TripSettings::default());
        assert_eq!(config.nearest_max_km, DEFAULT_NEAREST_MAX_KM);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PLANNER_ADDR", "127.0.0.1:3000"),
            ("GRAPH_JSON", "backend/data/dehradun_roads.json"),
            ("AVERAGE_SPEED_KMH", "30"),
            ("FUEL_PRICE_PER_LITRE", "105.5"),
            ("FUEL_MILEAGE_KM_PER_LITRE", " 25 "),
            ("NEAREST_MAX_KM", "5"),
        ])
        .expect("config");

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(
            config.graph_path,
            Some(PathBuf::from("backend/data/dehradun_roads.json"))
        );
        assert_eq!(config.trip.average_speed_kmh, 30.0);
        assert_eq!(config.trip.fuel_price_per_litre, 105.5);
        assert_eq!(config.trip.mileage_km_per_litre, 25.0);
        assert_eq!(config.nearest_max_km, 5.0);
    }

    #[test]
    fn selects_embedded_road_graph() {
        let config = config_from(&[("PLANNER_GRAPH", " Roads ")]).expect("config");
        assert_eq!(config.builtin_graph, BuiltinGraph::Roads);

        assert!(matches!(
            config_from(&[("PLANNER_GRAPH", "osm")]),
            Err(ConfigError::InvalidGraph(value)) if value == "osm"
        ));
    }

    #[test]
    fn blank_graph_path_means_embedded_graph() {
        let config = config_from(&[("GRAPH_JSON", "  ")]).expect("config");
        assert!(config.graph_path.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("PLANNER_ADDR", "localhost")]),
            Err(ConfigError::InvalidAddr { .. })
        ));
        for bad in ["0", "-40", "fast", "inf", "NaN"] {
            assert!(matches!(
                config_from(&[("AVERAGE_SPEED_KMH", bad)]),
                Err(ConfigError::InvalidNumber { key: "AVERAGE_SPEED_KMH", .. })
            ));
        }
    }
}
