//! End-to-end tests: flow graph -> program text -> evaluation
//!
//! Every scenario is checked on both paths (direct execution and emitted
//! program through the evaluator), which must agree.

mod common;

use common::builders::GraphBuilder;
use common::{assert_seq_eq, EPSILON};
use flowcode_rs::config::EvaluatorSettings;
use flowcode_rs::pipeline::executor::{execute_chain, prepare};
use flowcode_rs::pipeline::DEFAULT_INPUT;
use flowcode_rs::{
    build_chain, generate, run_direct, DiagnosticLog, FlowGraph, Language, Level, NodeKind,
    PipelineError, ScriptEngine,
};
use proptest::prelude::*;
use std::sync::Arc;

/// Evaluate the emitted program of `graph`
fn evaluate(graph: &FlowGraph) -> Vec<f64> {
    evaluate_with(graph, &EvaluatorSettings::default())
}

/// Emit under `limits` and evaluate with an engine bound by the same limits
fn evaluate_with(graph: &FlowGraph, limits: &EvaluatorSettings) -> Vec<f64> {
    let program = generate(graph, DEFAULT_INPUT, limits, &DiagnosticLog::new()).unwrap();
    ScriptEngine::with_settings(limits, Arc::new(DiagnosticLog::new()))
        .run(&program)
        .unwrap()
        .values
}

/// Run `graph` both ways and check they agree exactly
fn both_paths(graph: &FlowGraph) -> Vec<f64> {
    both_paths_with(graph, &EvaluatorSettings::default())
}

fn both_paths_with(graph: &FlowGraph, limits: &EvaluatorSettings) -> Vec<f64> {
    let direct = run_direct(graph, DEFAULT_INPUT, limits, &DiagnosticLog::new()).unwrap();
    let emitted = evaluate_with(graph, limits);
    assert_eq!(direct, emitted, "direct and emitted results differ");
    direct
}

/// Both paths refuse `graph` with the same error
fn both_refuse(graph: &FlowGraph, limits: &EvaluatorSettings) -> PipelineError {
    let err = run_direct(graph, DEFAULT_INPUT, limits, &DiagnosticLog::new()).unwrap_err();
    let generated = generate(graph, DEFAULT_INPUT, limits, &DiagnosticLog::new()).unwrap_err();
    assert_eq!(generated.as_pipeline(), Some(&err));
    err
}

fn counting_literal(n: usize) -> String {
    (1..=n).map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

#[test]
fn test_scenario_sine() {
    let graph = GraphBuilder::new().input("1,2,3").function().linked().build();

    let chain = build_chain(&graph, &DiagnosticLog::new());
    assert_eq!(chain.ids(), vec!["a", "b"]);

    let result = both_paths(&graph);
    assert_seq_eq(&result, &[1f64.sin(), 2f64.sin(), 3f64.sin()]);
}

#[test]
fn test_scenario_cosine_scaled() {
    let graph = GraphBuilder::new()
        .input("2,4,8")
        .transform("cos", 2.0)
        .linked()
        .build();

    let result = both_paths(&graph);
    assert_seq_eq(&result, &[2.0 * 2f64.cos(), 2.0 * 4f64.cos(), 2.0 * 8f64.cos()]);
}

#[test]
fn test_scenario_filter_positive() {
    let graph = GraphBuilder::new()
        .input("1,5,10,-3")
        .filter(">", 0.0)
        .linked()
        .build();

    assert_eq!(both_paths(&graph), vec![1.0, 5.0, 10.0]);
}

#[test]
fn test_scenario_no_edges_refused() {
    let graph = GraphBuilder::new().input("1,2,3,4").build();

    let err = generate(
        &graph,
        DEFAULT_INPUT,
        &EvaluatorSettings::default(),
        &DiagnosticLog::new(),
    )
    .unwrap_err();
    assert_eq!(err.as_pipeline(), Some(&PipelineError::NoEdges));
    assert_eq!(err.user_message(Language::SimplifiedChinese), "请连接节点");
    assert_eq!(
        both_refuse(&graph, &EvaluatorSettings::default()),
        PipelineError::NoEdges
    );
}

#[test]
fn test_full_chain() {
    let graph = GraphBuilder::new()
        .input("0.5, 1, 1.5, 2")
        .function()
        .transform("exp", 0.5)
        .filter(">=", 1.0)
        .stats("sum")
        .output()
        .linked()
        .build();

    let expected: f64 = [0.5f64, 1.0, 1.5, 2.0]
        .iter()
        .map(|x| x.sin().exp() * 0.5)
        .filter(|&v| v >= 1.0)
        .sum();
    let result = both_paths(&graph);
    assert_eq!(result.len(), 1);
    common::assert_float_eq(result[0], expected, EPSILON);
}

#[test]
fn test_stats_of_filtered_out_sequence() {
    let graph = GraphBuilder::new()
        .input("1,2,3")
        .filter(">", 100.0)
        .stats("max")
        .linked()
        .build();

    assert!(both_paths(&graph).is_empty());
}

#[test]
fn test_fail_open_paths_agree() {
    let graph = GraphBuilder::new()
        .input("1,-2,3")
        .transform("sqrt", 2.0)
        .filter("!=", 0.0)
        .stats("median")
        .linked()
        .build();

    let log = DiagnosticLog::new();
    let direct = run_direct(&graph, DEFAULT_INPUT, &EvaluatorSettings::default(), &log).unwrap();
    assert!(direct.is_empty());
    assert_eq!(log.at_least(Level::Warn).len(), 3);
    assert_eq!(evaluate(&graph), direct);
}

#[test]
fn test_cycle_is_bounded() {
    let graph = GraphBuilder::new()
        .input("1,2")
        .function()
        .output()
        .linked()
        .edge("c", "b")
        .build();

    let chain = build_chain(&graph, &DiagnosticLog::new());
    assert!(chain.len() <= graph.nodes.len());
    both_paths(&graph);
}

#[test]
fn test_logicflow_snapshot() {
    let json = r#"{
        "nodes": [
            { "id": "n1", "type": "input-1", "x": 200, "y": 150,
              "properties": { "input": "3, 1, 2" }, "text": { "value": "数据输入" } },
            { "id": "n2", "type": "stats-1", "x": 400, "y": 150,
              "properties": { "statType": "min" } },
            { "id": "n3", "type": "output-1", "x": 600, "y": 150, "properties": {} }
        ],
        "edges": [
            { "id": "e1", "type": "polyline", "sourceNodeId": "n1", "targetNodeId": "n2" },
            { "id": "e2", "type": "polyline", "sourceNodeId": "n2", "targetNodeId": "n3" }
        ]
    }"#;

    let graph = FlowGraph::from_json(json).unwrap();
    assert_eq!(graph.nodes[1].kind, NodeKind::Stats);
    assert_eq!(both_paths(&graph), vec![1.0]);
}

#[test]
fn test_prepared_chain_matches_program() {
    let graph = GraphBuilder::new()
        .input("4,5")
        .transform("log", 1.0)
        .linked()
        .build();
    let log = DiagnosticLog::new();
    let prepared = prepare(&graph, DEFAULT_INPUT, &EvaluatorSettings::default(), &log).unwrap();
    assert_eq!(prepared.literal, "4,5");

    let direct = execute_chain(&prepared.chain, &prepared.input, &log);
    assert_seq_eq(&direct, &[4f64.ln(), 5f64.ln()]);
    assert_eq!(evaluate(&graph), direct);
}

#[test]
fn test_literal_at_string_limit() {
    let literal = "10,20,30,4";
    let limits = EvaluatorSettings {
        max_string_size: literal.len(),
        ..EvaluatorSettings::default()
    };

    let graph = GraphBuilder::new().input(literal).function().linked().build();
    assert_seq_eq(
        &both_paths_with(&graph, &limits),
        &[10f64.sin(), 20f64.sin(), 30f64.sin(), 4f64.sin()],
    );

    let graph = GraphBuilder::new().input("10,20,30,40").function().linked().build();
    assert_eq!(
        both_refuse(&graph, &limits),
        PipelineError::InputTooLarge {
            len: literal.len() + 1,
            limit: literal.len()
        }
    );
}

#[test]
fn test_large_input_under_default_limits() {
    // 10000 values fit every default limit and run on both paths.
    let graph = GraphBuilder::new()
        .input(&counting_literal(10_000))
        .function()
        .linked()
        .build();
    assert_eq!(both_paths(&graph).len(), 10_000);

    // 20000 values need more than the default string limit.
    let graph = GraphBuilder::new()
        .input(&counting_literal(20_000))
        .function()
        .linked()
        .build();
    assert!(matches!(
        both_refuse(&graph, &EvaluatorSettings::default()),
        PipelineError::InputTooLarge { limit: 100_000, .. }
    ));
}

#[test]
fn test_value_count_at_array_limit() {
    let limits = EvaluatorSettings {
        max_array_size: 4,
        ..EvaluatorSettings::default()
    };

    let graph = GraphBuilder::new().input("1,2,3,4").output().linked().build();
    assert_eq!(both_paths_with(&graph, &limits), vec![1.0, 2.0, 3.0, 4.0]);

    let graph = GraphBuilder::new().input("1,2,3,4,5").output().linked().build();
    assert_eq!(
        both_refuse(&graph, &limits),
        PipelineError::TooManyValues { count: 5, limit: 4 }
    );
}

#[test]
fn test_operation_budget_holds_on_the_evaluator() {
    use flowcode_rs::pipeline::executor::{BASE_OPERATIONS, OPERATIONS_PER_STAGE};

    let limits = EvaluatorSettings {
        max_operations: BASE_OPERATIONS + 3 * OPERATIONS_PER_STAGE,
        ..EvaluatorSettings::default()
    };

    let graph = GraphBuilder::new()
        .input("1,2,3")
        .transform("exp", 2.0)
        .filter(">", 0.0)
        .stats("sum")
        .linked()
        .build();
    assert_eq!(both_paths_with(&graph, &limits).len(), 1);

    let graph = GraphBuilder::new()
        .input("1,2,3")
        .transform("exp", 2.0)
        .filter(">", 0.0)
        .stats("sum")
        .output()
        .linked()
        .build();
    assert_eq!(
        both_refuse(&graph, &limits),
        PipelineError::ChainTooLong { stages: 4, limit: 3 }
    );
}

#[test]
fn test_nan_reaches_both_paths() {
    let graph = GraphBuilder::new()
        .input("-1,2")
        .transform("log", 1.0)
        .stats("max")
        .linked()
        .build();

    let direct = run_direct(
        &graph,
        DEFAULT_INPUT,
        &EvaluatorSettings::default(),
        &DiagnosticLog::new(),
    )
    .unwrap();
    assert_eq!(direct.len(), 1);
    assert!(direct[0].is_nan());

    let emitted = evaluate(&graph);
    assert_eq!(emitted.len(), 1);
    assert!(emitted[0].is_nan());
}

fn literal_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(-1.0e6f64..1.0e6, 1..20).prop_map(|values| {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    })
}

fn stage_strategy() -> impl Strategy<Value = (NodeKind, flowcode_rs::NodeConfig)> {
    use flowcode_rs::pipeline::node_config::*;
    prop_oneof![
        Just((NodeKind::Function, NodeConfig::new())),
        Just((NodeKind::Output, NodeConfig::new())),
        (
            prop::sample::select(vec!["cos", "tan", "exp", "log", "bogus"]),
            -10.0f64..10.0
        )
            .prop_map(|(t, s)| (
                NodeKind::Transform,
                NodeConfig::new().with(KEY_TRANSFORM_TYPE, t).with(KEY_SCALE, s)
            )),
        (
            prop::sample::select(vec![">", "<", ">=", "<=", "==", "~"]),
            -5.0f64..5.0
        )
            .prop_map(|(c, t)| (
                NodeKind::Filter,
                NodeConfig::new().with(KEY_CONDITION, c).with(KEY_THRESHOLD, t)
            )),
        prop::sample::select(vec!["mean", "sum", "max", "min", "mode"]).prop_map(|s| (
            NodeKind::Stats,
            NodeConfig::new().with(KEY_STAT_TYPE, s)
        )),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_emitted_matches_direct(
        literal in literal_strategy(),
        stages in prop::collection::vec(stage_strategy(), 1..6)
    ) {
        let mut builder = GraphBuilder::new().input(&literal);
        for (kind, config) in stages {
            builder = builder.node(kind, config);
        }
        let graph = builder.linked().build();

        let direct = run_direct(
            &graph,
            DEFAULT_INPUT,
            &EvaluatorSettings::default(),
            &DiagnosticLog::new(),
        )
        .unwrap();
        let emitted = evaluate(&graph);

        // NaN never equals itself, so compare bit patterns.
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(&direct), bits(&emitted));
    }
}
