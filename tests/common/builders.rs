//! Test data builders for creating flow graphs

use flowcode_rs::pipeline::node_config::{
    KEY_CONDITION, KEY_INPUT, KEY_SCALE, KEY_STAT_TYPE, KEY_THRESHOLD, KEY_TRANSFORM_TYPE,
};
use flowcode_rs::{FlowEdge, FlowGraph, FlowNode, NodeConfig, NodeKind};

/// Builder for flow graphs
///
/// Nodes get ids `a`, `b`, `c`, ... in insertion order unless named.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> String {
        let index = self.nodes.len();
        if index < 26 {
            ((b'a' + index as u8) as char).to_string()
        } else {
            format!("n{}", index)
        }
    }

    pub fn node(mut self, kind: NodeKind, config: NodeConfig) -> Self {
        let id = self.next_id();
        self.nodes.push(FlowNode::new(id, kind).with_config(config));
        self
    }

    pub fn named(mut self, id: &str, kind: NodeKind) -> Self {
        self.nodes.push(FlowNode::new(id, kind));
        self
    }

    pub fn input(self, literal: &str) -> Self {
        self.node(NodeKind::Input, NodeConfig::new().with(KEY_INPUT, literal))
    }

    pub fn function(self) -> Self {
        self.node(NodeKind::Function, NodeConfig::new())
    }

    pub fn transform(self, transform_type: &str, scale: f64) -> Self {
        self.node(
            NodeKind::Transform,
            NodeConfig::new()
                .with(KEY_TRANSFORM_TYPE, transform_type)
                .with(KEY_SCALE, scale),
        )
    }

    pub fn filter(self, condition: &str, threshold: f64) -> Self {
        self.node(
            NodeKind::Filter,
            NodeConfig::new()
                .with(KEY_CONDITION, condition)
                .with(KEY_THRESHOLD, threshold),
        )
    }

    pub fn stats(self, stat_type: &str) -> Self {
        self.node(NodeKind::Stats, NodeConfig::new().with(KEY_STAT_TYPE, stat_type))
    }

    pub fn output(self) -> Self {
        self.node(NodeKind::Output, NodeConfig::new())
    }

    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.edges.push(FlowEdge::new(source, target));
        self
    }

    /// Connect every node to the next one, in insertion order
    pub fn linked(mut self) -> Self {
        let edges: Vec<FlowEdge> = self
            .nodes
            .windows(2)
            .map(|pair| FlowEdge::new(pair[0].id.clone(), pair[1].id.clone()))
            .collect();
        self.edges.extend(edges);
        self
    }

    pub fn build(self) -> FlowGraph {
        FlowGraph::new(self.nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_builder() {
        let graph = GraphBuilder::new().input("1,2").function().output().linked().build();

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.nodes[1].id, "b");
        assert_eq!(graph.edges, vec![FlowEdge::new("a", "b"), FlowEdge::new("b", "c")]);
    }
}
