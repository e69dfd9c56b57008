use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
    fs::File,
    io::{self, Read},
    path::Path,
};

use kdtree::KdTree;
use kdtree::distance::squared_euclidean;
use petgraph::{
    graph::{NodeIndex, UnGraph},
    visit::EdgeRef,
};

use crate::{
    graph::GraphFile,
    models::{Coordinate, Landmark},
    routing::{haversine_km, round2},
};

/// Shortest-path lookup over named landmarks.
///
/// # Contract
/// Implementations never fail: an unknown landmark or a disconnected pair
/// yields [`PathResult::unreachable`].
pub trait PathFinder: Send + Sync {
    fn shortest_path(&self, source: &str, destination: &str) -> PathResult;
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to read graph file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid graph definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("graph is empty")]
    EmptyGraph,
    #[error("landmark {0:?} is defined twice")]
    DuplicateNode(String),
    #[error("edge references unknown landmark {0:?}")]
    MissingNode(String),
    #[error("landmark {0:?} has an edge to itself")]
    SelfLoop(String),
    #[error("edge {from:?} - {to:?} has non-positive weight {weight}")]
    InvalidWeight { from: String, to: String, weight: f64 },
    #[error("edge {from:?} - {to:?} is listed twice with different weights")]
    ConflictingEdge { from: String, to: String },
    #[error("landmark {0:?} has an out-of-range coordinate")]
    InvalidCoordinate(String),
}

/// Outcome of a shortest-path query.
///
/// An unreachable destination is `distance == f64::INFINITY` with an empty path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub distance: f64,
    pub path: Vec<String>,
}

impl PathResult {
    pub fn unreachable() -> Self {
        Self {
            distance: f64::INFINITY,
            path: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

#[derive(Clone, Debug)]
struct NodeData {
    name: String,
    coord: Coordinate,
}

/// Immutable landmark graph with a spatial index over landmark coordinates.
#[derive(Clone)]
pub struct RouteEngine {
    graph: UnGraph<NodeData, f64>,
    index: HashMap<String, NodeIndex>,
    spatial_index: KdTree<f64, usize, [f64; 2]>,
    /// Degrees of longitude are shortened by `cos(latitude)`; the index is
    /// keyed on `[lon * lon_scale, lat]` so planar distance tracks ground distance.
    lon_scale: f64,
}

/// Candidates pulled from the KD-tree before re-ranking by haversine.
const NEAREST_CANDIDATES: usize = 4;

impl PathFinder for RouteEngine {
    fn shortest_path(&self, source: &str, destination: &str) -> PathResult {
        RouteEngine::shortest_path(self, source, destination)
    }
}

impl RouteEngine {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, EngineError> {
        let graph_file = GraphFile::from_reader(reader)?;
        Self::from_graph_file(graph_file)
    }

    /// Engine over the embedded hand-weighted Dehradun graph.
    pub fn dehradun_sample() -> Result<Self, EngineError> {
        Self::from_graph_file(GraphFile::dehradun_sample()?)
    }

    /// Engine over the embedded distance-weighted Dehradun road graph.
    pub fn dehradun_roads() -> Result<Self, EngineError> {
        Self::from_graph_file(GraphFile::dehradun_roads()?)
    }

    pub fn from_graph_file(graph_file: GraphFile) -> Result<Self, EngineError> {
        if graph_file.nodes.is_empty() {
            return Err(EngineError::EmptyGraph);
        }
        let mut graph = UnGraph::with_capacity(graph_file.nodes.len(), graph_file.edges.len());
        let mut index = HashMap::with_capacity(graph_file.nodes.len());

        for node in graph_file.nodes {
            let coord = node.coordinate();
            if !coord.is_valid() {
                return Err(EngineError::InvalidCoordinate(node.name));
            }
            if index.contains_key(&node.name) {
                return Err(EngineError::DuplicateNode(node.name));
            }
            let idx = graph.add_node(NodeData {
                name: node.name.clone(),
                coord,
            });
            index.insert(node.name, idx);
        }

        for edge in graph_file.edges {
            let from = *index
                .get(&edge.from)
                .ok_or_else(|| EngineError::MissingNode(edge.from.clone()))?;
            let to = *index
                .get(&edge.to)
                .ok_or_else(|| EngineError::MissingNode(edge.to.clone()))?;
            if from == to {
                return Err(EngineError::SelfLoop(edge.from));
            }

            let weight = edge
                .weight
                .unwrap_or_else(|| round2(haversine_km(graph[from].coord, graph[to].coord)));
            if !weight.is_finite() || weight <= 0.0 {
                return Err(EngineError::InvalidWeight {
                    from: edge.from,
                    to: edge.to,
                    weight,
                });
            }

            match graph.find_edge(from, to) {
                Some(existing) if graph[existing] == weight => continue,
                Some(_) => {
                    return Err(EngineError::ConflictingEdge {
                        from: edge.from,
                        to: edge.to,
                    });
                }
                None => {
                    graph.add_edge(from, to, weight);
                }
            }
        }

        let lon_scale = Self::lon_scale(&graph);
        let spatial_index = Self::build_spatial_index(&graph, lon_scale);

        tracing::debug!(
            "landmark graph ready: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(Self {
            graph,
            index,
            spatial_index,
            lon_scale,
        })
    }

    fn lon_scale(graph: &UnGraph<NodeData, f64>) -> f64 {
        let count = graph.node_count().max(1) as f64;
        let mean_lat = graph.node_weights().map(|node| node.coord.lat).sum::<f64>() / count;
        mean_lat.to_radians().cos()
    }

    fn build_spatial_index(
        graph: &UnGraph<NodeData, f64>,
        lon_scale: f64,
    ) -> KdTree<f64, usize, [f64; 2]> {
        let mut tree = KdTree::new(2);
        for idx in graph.node_indices() {
            let coord = graph[idx].coord;
            let _ = tree.add([coord.lon * lon_scale, coord.lat], idx.index());
        }
        tree
    }

    /// Dijkstra from `source`, stopping as soon as `destination` is settled.
    ///
    /// Nodes are settled in order of `(tentative distance, name)`, so among
    /// equal-cost alternatives the chosen path is fixed by landmark names
    /// rather than by storage order.
    ///
    /// Unknown names and disconnected pairs return [`PathResult::unreachable`].
    pub fn shortest_path(&self, source: &str, destination: &str) -> PathResult {
        let (Some(&start), Some(&goal)) = (self.index.get(source), self.index.get(destination))
        else {
            tracing::debug!("unknown landmark in query {source:?} -> {destination:?}");
            return PathResult::unreachable();
        };

        let node_count = self.graph.node_count();
        let mut distances = vec![f64::INFINITY; node_count];
        let mut previous: Vec<Option<NodeIndex>> = vec![None; node_count];
        let mut settled = vec![false; node_count];
        let mut frontier = BinaryHeap::new();

        distances[start.index()] = 0.0;
        frontier.push(Tentative {
            distance: 0.0,
            name: &self.graph[start].name,
            node: start,
        });

        while let Some(Tentative { distance, node, .. }) = frontier.pop() {
            if settled[node.index()] {
                continue;
            }
            settled[node.index()] = true;
            if node == goal {
                break;
            }

            for edge in self.graph.edges(node) {
                let neighbor = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                if settled[neighbor.index()] {
                    continue;
                }
                let candidate = distance + *edge.weight();
                if candidate < distances[neighbor.index()] {
                    distances[neighbor.index()] = candidate;
                    previous[neighbor.index()] = Some(node);
                    frontier.push(Tentative {
                        distance: candidate,
                        name: &self.graph[neighbor].name,
                        node: neighbor,
                    });
                }
            }
        }

        let mut route = Vec::new();
        let mut cursor = Some(goal);
        while let Some(node) = cursor {
            route.push(node);
            cursor = previous[node.index()];
        }
        route.reverse();

        if route.first() != Some(&start) {
            tracing::debug!("no path between {source:?} and {destination:?}");
            return PathResult::unreachable();
        }

        PathResult {
            distance: distances[goal.index()],
            path: route
                .into_iter()
                .map(|idx| self.graph[idx].name.clone())
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Landmark names in the order the graph file lists them.
    pub fn locations(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].name.clone())
            .collect()
    }

    pub fn landmarks(&self) -> Vec<Landmark> {
        self.graph
            .node_indices()
            .map(|idx| Landmark {
                name: self.graph[idx].name.clone(),
                coordinate: self.graph[idx].coord,
            })
            .collect()
    }

    pub fn coordinate(&self, name: &str) -> Option<Coordinate> {
        self.index.get(name).map(|&idx| self.graph[idx].coord)
    }

    /// Weight of the direct edge between two landmarks, if any.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let a = *self.index.get(a)?;
        let b = *self.index.get(b)?;
        self.graph.find_edge(a, b).map(|edge| self.graph[edge])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nearest landmark to `target` and its great-circle distance in km,
    /// or `None` when it lies farther than `max_distance_km`.
    pub fn closest_landmark(
        &self,
        target: Coordinate,
        max_distance_km: f64,
    ) -> Option<(Landmark, f64)> {
        let candidates = self
            .spatial_index
            .nearest(
                &[target.lon * self.lon_scale, target.lat],
                NEAREST_CANDIDATES.min(self.graph.node_count()),
                &squared_euclidean,
            )
            .ok()?;

        // The planar key is only an approximation; the final pick is by haversine.
        let (node, distance_km) = candidates
            .into_iter()
            .map(|(_, &idx)| {
                let node = &self.graph[NodeIndex::new(idx)];
                (node, haversine_km(target, node.coord))
            })
            .min_by(|(a, da), (b, db)| da.total_cmp(db).then_with(|| a.name.cmp(&b.name)))?;

        if distance_km > max_distance_km {
            return None;
        }

        Some((
            Landmark {
                name: node.name.clone(),
                coordinate: node.coord,
            },
            distance_km,
        ))
    }
}

/// Frontier entry; `BinaryHeap` is a max-heap so the ordering is reversed.
#[derive(Debug)]
struct Tentative<'a> {
    distance: f64,
    name: &'a str,
    node: NodeIndex,
}

impl Ord for Tentative<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.name.cmp(self.name))
    }
}

impl PartialOrd for Tentative<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Tentative<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Tentative<'_> {}
