//! Processing chain construction.
//!
//! A flow is processed as a single linear chain: start at the first `Input`
//! node, then repeatedly follow the first outgoing edge. The chain is a
//! borrowed view over the graph snapshot and is rebuilt on every request.
//!
//! The graph is not required to be acyclic, so the walk visits at most
//! `nodes.len()` entries.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::pipeline::graph::{FlowGraph, FlowNode};

/// Ordered sequence of nodes, starting with the input node.
#[derive(Debug, Clone, Default)]
pub struct ProcessingChain<'g> {
    nodes: Vec<&'g FlowNode>,
}

impl<'g> ProcessingChain<'g> {
    /// The empty chain (no input node).
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn nodes(&self) -> &[&'g FlowNode] {
        &self.nodes
    }

    /// The input node heading the chain.
    pub fn input(&self) -> Option<&'g FlowNode> {
        self.nodes.first().copied()
    }

    /// Entries after the input node, in processing order.
    pub fn stages(&self) -> &[&'g FlowNode] {
        self.nodes.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in chain order.
    pub fn ids(&self) -> Vec<&'g str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'g FlowNode> + '_ {
        self.nodes.iter().copied()
    }
}

/// Build the processing chain of `graph`.
///
/// Returns an empty chain when the graph has no input node. A dangling edge
/// target ends the chain; so does reaching the node-count bound, which only
/// happens when the walk has entered a cycle.
pub fn build_chain<'g>(graph: &'g FlowGraph, sink: &dyn DiagnosticSink) -> ProcessingChain<'g> {
    let Some(mut current) = graph.first_input() else {
        sink.record(Diagnostic::warn("No input node in flow graph"));
        return ProcessingChain::empty();
    };

    let bound = graph.nodes.len();
    let mut nodes = Vec::with_capacity(bound);

    loop {
        nodes.push(current);

        let out_degree = graph.out_degree(&current.id);
        if out_degree > 1 {
            sink.record(
                Diagnostic::warn("Node has several outgoing edges; following the first")
                    .for_kind(current.kind)
                    .detail("node", &current.id)
                    .detail("edges", out_degree),
            );
        }

        let Some(edge) = graph.first_outgoing(&current.id) else {
            break;
        };

        let Some(next) = graph.node(&edge.target_node_id) else {
            sink.record(
                Diagnostic::warn("Edge targets a missing node; chain truncated")
                    .detail("source", &edge.source_node_id)
                    .detail("target", &edge.target_node_id),
            );
            break;
        };

        if nodes.len() >= bound {
            sink.record(
                Diagnostic::warn("Chain truncated at node-count bound (cycle in flow graph)")
                    .detail("node", &current.id)
                    .detail("bound", bound),
            );
            break;
        }

        current = next;
    }

    tracing::debug!(
        "Processing chain built: {} of {} nodes, ends at {:?}",
        nodes.len(),
        graph.nodes.len(),
        nodes.last().map(|n| n.kind)
    );

    ProcessingChain { nodes }
}
