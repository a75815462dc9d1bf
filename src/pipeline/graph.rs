//! Flow graph snapshot types.
//!
//! A [`FlowGraph`] is an immutable snapshot handed over by the canvas. Its
//! JSON form matches the canvas's graph export:
//!
//! ```text
//! { "nodes": [{ "id": "a", "type": "input-1", "x": 200, "y": 150,
//!               "properties": { "input": "1,2,3" } }],
//!   "edges": [{ "sourceNodeId": "a", "targetNodeId": "b" }] }
//! ```
//!
//! Unknown fields (node text, edge ids, styling) are ignored.

use crate::pipeline::id::NodeId;
use crate::pipeline::node_config::NodeConfig;
use crate::pipeline::node_type::NodeKind;
use serde::{Deserialize, Serialize};

/// Canvas coordinates of a node. Irrelevant to processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// A node of the flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(rename = "properties", default)]
    pub config: NodeConfig,
    #[serde(flatten)]
    pub position: Position,
}

impl FlowNode {
    /// Create a node seeded with its kind's default configuration.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            config: kind.default_config(),
            position: Position::default(),
        }
    }

    /// Replace the configuration entirely.
    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }
}

/// A directed connection `source -> target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub source_node_id: NodeId,
    pub target_node_id: NodeId,
}

impl FlowEdge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source_node_id: source.into(),
            target_node_id: target.into(),
        }
    }
}

/// Snapshot of the canvas: all nodes and edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn new(nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Decode a snapshot from its JSON form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// First node of kind `Input`, in node order.
    pub fn first_input(&self) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Input)
    }

    /// First edge leaving `id`, in edge order.
    pub fn first_outgoing(&self, id: &NodeId) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| &e.source_node_id == id)
    }

    pub fn out_degree(&self, id: &NodeId) -> usize {
        self.edges.iter().filter(|e| &e.source_node_id == id).count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
