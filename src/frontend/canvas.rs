//! Flow canvas: the owner of node/edge state.
//!
//! The [`Canvas`] trait is what the editor needs from a diagramming surface:
//! graph snapshots, node configuration updates and click events.
//! [`MemoryCanvas`] implements it without any UI; clicks are published to
//! subscribers over crossbeam channels.

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::graph::{FlowEdge, FlowGraph, FlowNode};
use crate::pipeline::id::NodeId;
use crate::pipeline::node_config::NodeConfig;
use crate::pipeline::node_type::NodeKind;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Where newly added nodes are placed
pub const NEW_NODE_POSITION: (f64, f64) = (200.0, 150.0);

/// Capacity of each click subscription channel
pub const CLICK_CHANNEL_CAPACITY: usize = 64;

/// A node click, as delivered to subscribers
#[derive(Debug, Clone, PartialEq)]
pub struct NodeClick {
    pub node_id: NodeId,
    pub kind: NodeKind,
    pub config: NodeConfig,
}

/// Diagramming surface owning the flow graph
pub trait Canvas {
    /// Immutable copy of the current graph
    fn snapshot(&self) -> FlowGraph;

    /// Add a node of `kind` with its default configuration
    fn add_node(&mut self, kind: NodeKind) -> NodeId;

    /// Connect `source` to `target`
    fn connect(&mut self, source: &NodeId, target: &NodeId) -> PipelineResult<()>;

    /// Merge `config` into the node's configuration
    fn set_properties(&mut self, id: &NodeId, config: NodeConfig) -> PipelineResult<()>;

    /// Click a node, publishing the event to subscribers
    fn click(&mut self, id: &NodeId) -> Option<NodeClick>;
}

/// In-memory canvas
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    next_id: u64,
    subscribers: Vec<Sender<NodeClick>>,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing graph snapshot
    pub fn from_graph(graph: FlowGraph) -> Self {
        Self {
            nodes: graph.nodes,
            edges: graph.edges,
            ..Self::default()
        }
    }

    /// Subscribe to node clicks
    pub fn subscribe_clicks(&mut self) -> Receiver<NodeClick> {
        let (tx, rx) = bounded(CLICK_CHANNEL_CAPACITY);
        self.subscribers.push(tx);
        rx
    }

    pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn allocate_id(&mut self) -> NodeId {
        loop {
            self.next_id += 1;
            let id = NodeId::new(format!("node_{}", self.next_id));
            if self.node(&id).is_none() {
                return id;
            }
        }
    }

    fn require(&self, id: &NodeId) -> PipelineResult<()> {
        match self.node(id) {
            Some(_) => Ok(()),
            None => Err(PipelineError::NodeNotFound(id.clone())),
        }
    }

    fn publish(&mut self, click: &NodeClick) {
        self.subscribers.retain(|tx| match tx.try_send(click.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Click subscriber is not keeping up; event dropped");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

impl Canvas for MemoryCanvas {
    fn snapshot(&self) -> FlowGraph {
        FlowGraph::new(self.nodes.clone(), self.edges.clone())
    }

    fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.allocate_id();
        let (x, y) = NEW_NODE_POSITION;
        self.nodes.push(FlowNode::new(id.clone(), kind).at(x, y));
        tracing::debug!("Added {} node {}", kind, id);
        id
    }

    fn connect(&mut self, source: &NodeId, target: &NodeId) -> PipelineResult<()> {
        self.require(source)?;
        self.require(target)?;
        self.edges.push(FlowEdge::new(source.clone(), target.clone()));
        Ok(())
    }

    fn set_properties(&mut self, id: &NodeId, config: NodeConfig) -> PipelineResult<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| PipelineError::NodeNotFound(id.clone()))?;
        node.config.merge(config);
        Ok(())
    }

    fn click(&mut self, id: &NodeId) -> Option<NodeClick> {
        let node = self.node(id)?;
        let click = NodeClick {
            node_id: node.id.clone(),
            kind: node.kind,
            config: node.config.clone(),
        };
        self.publish(&click);
        Some(click)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::node_config::{KEY_INPUT, KEY_SCALE, KEY_TRANSFORM_TYPE};

    #[test]
    fn test_add_node_defaults() {
        let mut canvas = MemoryCanvas::new();
        let a = canvas.add_node(NodeKind::Input);
        let b = canvas.add_node(NodeKind::Transform);
        assert_eq!(a, "node_1");
        assert_eq!(b, "node_2");

        let node = canvas.node(&a).unwrap();
        assert_eq!(node.config, NodeKind::Input.default_config());
        assert_eq!((node.position.x, node.position.y), NEW_NODE_POSITION);
    }

    #[test]
    fn test_ids_skip_loaded_nodes() {
        let graph = FlowGraph::new(vec![FlowNode::new("node_1", NodeKind::Input)], vec![]);
        let mut canvas = MemoryCanvas::from_graph(graph);
        assert_eq!(canvas.add_node(NodeKind::Output), "node_2");
    }

    #[test]
    fn test_connect_requires_nodes() {
        let mut canvas = MemoryCanvas::new();
        let a = canvas.add_node(NodeKind::Input);
        let ghost = NodeId::new("ghost");
        assert_eq!(
            canvas.connect(&a, &ghost),
            Err(PipelineError::NodeNotFound(ghost.clone()))
        );
        assert_eq!(canvas.edge_count(), 0);

        let b = canvas.add_node(NodeKind::Output);
        canvas.connect(&a, &b).unwrap();
        assert_eq!(canvas.snapshot().edges, vec![FlowEdge::new("node_1", "node_2")]);
    }

    #[test]
    fn test_set_properties_merges() {
        let mut canvas = MemoryCanvas::new();
        let t = canvas.add_node(NodeKind::Transform);
        canvas
            .set_properties(&t, NodeConfig::new().with(KEY_SCALE, 3.0))
            .unwrap();

        let config = &canvas.node(&t).unwrap().config;
        assert_eq!(config.get(KEY_SCALE).and_then(|v| v.as_number()), Some(3.0));
        assert_eq!(config.get(KEY_TRANSFORM_TYPE).and_then(|v| v.as_str()), Some("cos"));
    }

    #[test]
    fn test_set_properties_unknown_node() {
        let mut canvas = MemoryCanvas::new();
        let err = canvas
            .set_properties(&NodeId::new("x"), NodeConfig::new().with(KEY_INPUT, "1"))
            .unwrap_err();
        assert_eq!(err, PipelineError::NodeNotFound(NodeId::new("x")));
    }

    #[test]
    fn test_click_publishes() {
        let mut canvas = MemoryCanvas::new();
        let rx = canvas.subscribe_clicks();
        let a = canvas.add_node(NodeKind::Input);

        let click = canvas.click(&a).unwrap();
        assert_eq!(click.kind, NodeKind::Input);
        assert_eq!(rx.try_recv().unwrap(), click);
        assert!(canvas.click(&NodeId::new("missing")).is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_removed() {
        let mut canvas = MemoryCanvas::new();
        let rx = canvas.subscribe_clicks();
        drop(rx);
        let a = canvas.add_node(NodeKind::Output);
        canvas.click(&a);
        assert!(canvas.subscribers.is_empty());
    }
}
