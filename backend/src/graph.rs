use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

const DEHRADUN_SAMPLE: &str = include_str!("../data/dehradun_sample.json");
const DEHRADUN_ROADS: &str = include_str!("../data/dehradun_roads.json");

/// On-disk landmark graph.
///
/// Every undirected edge is listed once; the engine mirrors it. An edge
/// without an explicit `weight` is weighted by the great-circle distance
/// between its endpoints (km, two decimals).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphFile {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl NodeRecord {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl GraphFile {
    /// Hand-weighted chain of the sixteen Dehradun landmarks.
    pub fn dehradun_sample() -> Result<Self, serde_json::Error> {
        serde_json::from_str(DEHRADUN_SAMPLE)
    }

    /// Denser road topology over the same landmarks, weighted by distance.
    pub fn dehradun_roads() -> Result<Self, serde_json::Error> {
        serde_json::from_str(DEHRADUN_ROADS)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(BufReader::new(reader))
    }

    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        Self::from_reader(file).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), io::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()
    }
}
