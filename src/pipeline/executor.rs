//! Direct chain execution.
//!
//! This is the reference path: it folds the transform engine over the chain
//! without going through emitted code. Code generation shares [`prepare`]
//! so both paths check the same preconditions in the same order:
//!
//! 1. The flow has at least one edge.
//! 2. The flow has an input node.
//! 3. The input node's literal is a valid numeric list.
//! 4. The program fits the evaluator limits: literal length, value count,
//!    each stage's configuration length, then the operation budget.
//!
//! Step 4 keeps the paths equivalent: a flow the evaluator could not run is
//! refused here on both of them.

use crate::config::EvaluatorSettings;
use crate::diagnostics::DiagnosticSink;
use crate::pipeline::chain::{build_chain, ProcessingChain};
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::graph::{FlowGraph, FlowNode};
use crate::pipeline::node_config::{ConfigValue, KEY_INPUT};
use crate::pipeline::nodes;
use crate::pipeline::validator::parse_numeric_list;
use crate::types::NumericSequence;

/// Evaluator operations charged to the lines every program has.
pub const BASE_OPERATIONS: u64 = 16;
/// Evaluator operations charged to each emitted stage.
pub const OPERATIONS_PER_STAGE: u64 = 16;

/// A chain that passed every precondition, with its parsed input.
#[derive(Debug, Clone)]
pub struct PreparedFlow<'g> {
    pub chain: ProcessingChain<'g>,
    /// Raw literal of the input node (after default substitution).
    pub literal: String,
    pub input: NumericSequence,
}

/// The literal carried by an input node.
///
/// A missing or empty `input` option means `default_input`.
pub fn input_literal(node: &FlowNode, default_input: &str) -> String {
    match node.config.get(KEY_INPUT) {
        None => default_input.to_string(),
        Some(ConfigValue::String(s)) if s.is_empty() => default_input.to_string(),
        Some(value) => value.to_string(),
    }
}

/// Check preconditions and build the chain of `graph`.
pub fn prepare<'g>(
    graph: &'g FlowGraph,
    default_input: &str,
    limits: &EvaluatorSettings,
    sink: &dyn DiagnosticSink,
) -> PipelineResult<PreparedFlow<'g>> {
    let result = check(graph, default_input, sink).and_then(|prepared| {
        check_limits(&prepared, limits)?;
        Ok(prepared)
    });
    if let Err(e) = &result {
        tracing::warn!("Flow rejected: {}", e);
    }
    result
}

fn check<'g>(
    graph: &'g FlowGraph,
    default_input: &str,
    sink: &dyn DiagnosticSink,
) -> PipelineResult<PreparedFlow<'g>> {
    if graph.edges.is_empty() {
        return Err(PipelineError::NoEdges);
    }

    let chain = build_chain(graph, sink);
    let Some(input_node) = chain.input() else {
        return Err(PipelineError::NoInputNode);
    };

    let literal = input_literal(input_node, default_input);
    let Some(input) = parse_numeric_list(&literal) else {
        return Err(PipelineError::InvalidInput { input: literal });
    };

    Ok(PreparedFlow {
        chain,
        literal,
        input,
    })
}

/// Refuse a prepared flow whose program would exceed `limits`.
///
/// A limit of `0` is never exceeded.
pub fn check_limits(prepared: &PreparedFlow<'_>, limits: &EvaluatorSettings) -> PipelineResult<()> {
    let exceeds = |value: usize, limit: usize| limit > 0 && value > limit;

    if exceeds(prepared.literal.len(), limits.max_string_size) {
        return Err(PipelineError::InputTooLarge {
            len: prepared.literal.len(),
            limit: limits.max_string_size,
        });
    }
    if exceeds(prepared.input.len(), limits.max_array_size) {
        return Err(PipelineError::TooManyValues {
            count: prepared.input.len(),
            limit: limits.max_array_size,
        });
    }

    for node in prepared.chain.stages() {
        // Serialization failures surface when the program is emitted.
        let Ok(json) = node.config.to_json() else {
            continue;
        };
        if exceeds(json.len(), limits.max_string_size) {
            return Err(PipelineError::ConfigTooLarge {
                node: node.id.clone(),
                len: json.len(),
                limit: limits.max_string_size,
            });
        }
    }

    let stages = prepared.chain.stages().len();
    let budget = BASE_OPERATIONS.saturating_add(OPERATIONS_PER_STAGE.saturating_mul(stages as u64));
    if limits.max_operations > 0 && budget > limits.max_operations {
        let max_stages = limits.max_operations.saturating_sub(BASE_OPERATIONS) / OPERATIONS_PER_STAGE;
        return Err(PipelineError::ChainTooLong {
            stages,
            limit: usize::try_from(max_stages).unwrap_or(usize::MAX),
        });
    }

    Ok(())
}

/// Fold the transform engine over the chain entries after the input node.
pub fn execute_chain(
    chain: &ProcessingChain<'_>,
    input: &[f64],
    sink: &dyn DiagnosticSink,
) -> NumericSequence {
    chain
        .stages()
        .iter()
        .fold(input.to_vec(), |data, node| {
            nodes::apply(node.kind, &data, &node.config, sink)
        })
}

/// Check preconditions and compute the result of `graph` directly.
pub fn run_direct(
    graph: &FlowGraph,
    default_input: &str,
    limits: &EvaluatorSettings,
    sink: &dyn DiagnosticSink,
) -> PipelineResult<NumericSequence> {
    let prepared = prepare(graph, default_input, limits, sink)?;
    let output = execute_chain(&prepared.chain, &prepared.input, sink);
    tracing::debug!(
        "Direct run over {} nodes: {} values in, {} out",
        prepared.chain.len(),
        prepared.input.len(),
        output.len()
    );
    Ok(output)
}
