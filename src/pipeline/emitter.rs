//! Code emitter: renders a processing chain as an evaluator program.
//!
//! The program is Rhai source. For a chain `input -> function -> output` with
//! literal `1,2,3` it reads:
//!
//! ```text
//! // flowcode: input -> function -> output
//! let data = to_numbers("1,2,3");
//!
//! // Sin Function (node_2)
//! data = apply("function", data, "{}");
//!
//! // Curve Output (node_3)
//! data = apply("output", data, "{}");
//!
//! report(data);
//! ```
//!
//! Each stage passes its configuration verbatim as a JSON string, and the
//! evaluator binds `apply` to the same transform engine used by the direct
//! executor, so evaluating the program yields what [`execute_chain`] yields.
//! The input literal is parsed natively in one call, so the operation count
//! of a program depends on its number of stages only.
//!
//! [`execute_chain`]: crate::pipeline::executor::execute_chain

use crate::config::EvaluatorSettings;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::pipeline::chain::ProcessingChain;
use crate::pipeline::executor::prepare;
use crate::pipeline::graph::FlowGraph;
use std::fmt::Write as _;

/// Name of the evaluator function applying one node.
pub const APPLY_FN: &str = "apply";
/// Name of the evaluator function parsing the input literal.
pub const TO_NUMBERS_FN: &str = "to_numbers";
/// Name of the evaluator function receiving the final sequence.
pub const REPORT_FN: &str = "report";
/// Variable threaded through the stages.
pub const DATA_VAR: &str = "data";

/// Render `chain` with `raw_input` as the input literal.
///
/// `raw_input` is embedded as-is; callers that accept user input validate it
/// first (see [`generate`]).
pub fn emit(chain: &ProcessingChain<'_>, raw_input: &str) -> Result<String> {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let route: Vec<&str> = chain.iter().map(|n| n.kind.wire_name()).collect();
    let _ = writeln!(out, "// flowcode: {}", comment_text(&route.join(" -> ")));
    let _ = writeln!(
        out,
        "let {DATA_VAR} = {TO_NUMBERS_FN}({});",
        string_literal(raw_input)
    );

    for node in chain.stages() {
        let config = node.config.to_json()?;
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "// {} ({})",
            node.kind.display_name(),
            comment_text(node.id.as_str())
        );
        let _ = writeln!(
            out,
            "{DATA_VAR} = {APPLY_FN}({}, {DATA_VAR}, {});",
            string_literal(node.kind.wire_name()),
            string_literal(&config),
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{REPORT_FN}({DATA_VAR});");
    Ok(out)
}

/// Check the preconditions on `graph` and emit its program.
///
/// Refuses with a [`PipelineError`](crate::pipeline::PipelineError) when the
/// flow has no edges, no input node, or an invalid input literal, or when
/// its program would not fit `limits`.
pub fn generate(
    graph: &FlowGraph,
    default_input: &str,
    limits: &EvaluatorSettings,
    sink: &dyn DiagnosticSink,
) -> Result<String> {
    let prepared = prepare(graph, default_input, limits, sink)?;
    let program = emit(&prepared.chain, &prepared.literal)?;
    tracing::info!(
        "Generated program for chain [{}] ({} bytes)",
        prepared.chain.ids().join(", "),
        program.len()
    );
    Ok(program)
}

/// Quote `s` as a double-quoted Rhai string literal.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Text safe to place after `//`: control characters become spaces.
fn comment_text(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticLog;
    use crate::error::FlowError;
    use crate::pipeline::chain::build_chain;
    use crate::pipeline::error::PipelineError;
    use crate::pipeline::graph::{FlowEdge, FlowNode};
    use crate::pipeline::node_config::{NodeConfig, KEY_INPUT, KEY_SCALE, KEY_TRANSFORM_TYPE};
    use crate::pipeline::node_type::{NodeKind, DEFAULT_INPUT};

    fn sine_graph(literal: &str) -> FlowGraph {
        FlowGraph::new(
            vec![
                FlowNode::new("a", NodeKind::Input)
                    .with_config(NodeConfig::new().with(KEY_INPUT, literal)),
                FlowNode::new("b", NodeKind::Function),
            ],
            vec![FlowEdge::new("a", "b")],
        )
    }

    #[test]
    fn test_program_shape() {
        let graph = sine_graph("1,2,3");
        let program = generate(
            &graph,
            DEFAULT_INPUT,
            &EvaluatorSettings::default(),
            &DiagnosticLog::new(),
        )
        .unwrap();
        let lines: Vec<&str> = program.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines[0], "// flowcode: input -> function");
        assert_eq!(
            lines[1],
            r#"let data = to_numbers("1,2,3");"#
        );
        assert_eq!(lines[2], "// Sin Function (b)");
        assert_eq!(lines[3], r#"data = apply("function", data, "{}");"#);
        assert_eq!(lines[4], "report(data);");
    }

    #[test]
    fn test_config_embedded_as_json() {
        let graph = FlowGraph::new(
            vec![
                FlowNode::new("a", NodeKind::Input),
                FlowNode::new("t", NodeKind::Transform).with_config(
                    NodeConfig::new()
                        .with(KEY_TRANSFORM_TYPE, "tan")
                        .with(KEY_SCALE, 2.5),
                ),
            ],
            vec![FlowEdge::new("a", "t")],
        );
        let chain = build_chain(&graph, &DiagnosticLog::new());
        let program = emit(&chain, "1").unwrap();
        assert!(program.contains(
            r#"data = apply("transform", data, "{\"scale\":2.5,\"transformType\":\"tan\"}");"#
        ));
    }

    #[test]
    fn test_refuses_without_edges() {
        let graph = FlowGraph::new(vec![FlowNode::new("a", NodeKind::Input)], vec![]);
        let err = generate(
            &graph,
            DEFAULT_INPUT,
            &EvaluatorSettings::default(),
            &DiagnosticLog::new(),
        )
        .unwrap_err();
        assert_eq!(err.as_pipeline(), Some(&PipelineError::NoEdges));
    }

    #[test]
    fn test_refuses_invalid_literal() {
        let err = generate(
            &sine_graph("1,,2"),
            DEFAULT_INPUT,
            &EvaluatorSettings::default(),
            &DiagnosticLog::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FlowError::Pipeline(PipelineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_literal_at_string_limit() {
        let limits = EvaluatorSettings {
            max_string_size: 9,
            ..EvaluatorSettings::default()
        };
        let log = DiagnosticLog::new();

        let program = generate(&sine_graph("1,2,3,4,5"), DEFAULT_INPUT, &limits, &log).unwrap();
        assert!(program.contains(r#"to_numbers("1,2,3,4,5")"#));

        let err = generate(&sine_graph("1,2,3,4,50"), DEFAULT_INPUT, &limits, &log).unwrap_err();
        assert_eq!(
            err.as_pipeline(),
            Some(&PipelineError::InputTooLarge { len: 10, limit: 9 })
        );
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("plain"), "\"plain\"");
        assert_eq!(string_literal("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(string_literal("x\ny\tz"), r#""x\ny\tz""#);
        assert_eq!(string_literal("\u{1}"), r#""\u0001""#);
        assert_eq!(string_literal("数据"), "\"数据\"");
    }

    #[test]
    fn test_node_id_cannot_break_comment() {
        let graph = FlowGraph::new(
            vec![
                FlowNode::new("a", NodeKind::Input),
                FlowNode::new("b\nreport([]);", NodeKind::Output),
            ],
            vec![FlowEdge::new("a", "b\nreport([]);")],
        );
        let chain = build_chain(&graph, &DiagnosticLog::new());
        let program = emit(&chain, "1").unwrap();
        assert_eq!(program.matches("report(").count(), 2);
        assert!(program.contains("// Curve Output (b report([]);)"));
        assert_eq!(program.lines().filter(|l| l.starts_with("report(")).count(), 1);
    }
}
