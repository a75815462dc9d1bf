//! flowcode - Command-line demo
//!
//! Reads a canvas snapshot (or uses a built-in demo flow), prints the
//! generated program, evaluates it and prints the result table.
//!
//! ```text
//! flowcode [graph.json]
//! ```

use anyhow::Context;
use flowcode_rs::{
    config::LoggingSettings,
    pipeline::node_config::{KEY_INPUT, KEY_SCALE, KEY_TRANSFORM_TYPE},
    AppConfig, FlowEdge, FlowEditor, FlowGraph, FlowNode, MemoryCanvas, NodeConfig, NodeKind,
    TextRenderer,
};
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "flowcode.log";

fn main() -> ExitCode {
    let config = AppConfig::load_or_default();
    let _log_guard = init_logging(&config.logging);

    match run(&config) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the tracing subscriber. The returned guard flushes file logs on drop.
fn init_logging(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let (file_layer, guard) = match &settings.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn run(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let graph = match std::env::args_os().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            FlowGraph::from_json(&json)
                .with_context(|| format!("Failed to parse graph snapshot {:?}", path))?
        }
        None => {
            tracing::info!("No graph given, using the demo flow");
            demo_graph()
        }
    };

    tracing::info!(
        "Loaded flow: {} nodes, {} edges (messages in {})",
        graph.nodes.len(),
        graph.edges.len(),
        config.editor.language.display_name()
    );

    let renderer = TextRenderer::new(std::io::stdout());
    let mut editor = FlowEditor::new(MemoryCanvas::from_graph(graph), renderer, config);

    let generated = editor.generate_code().map(str::to_string);
    match generated {
        Ok(code) => println!("{}", code),
        Err(e) => {
            eprintln!("{}", editor.describe(&e));
            return Ok(ExitCode::FAILURE);
        }
    }

    let outcome = editor.run_code().map(|values| values.len());
    if let Err(e) = outcome {
        eprintln!("{}", editor.describe(&e));
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// Input -> sine -> scaled cosine -> curve output
fn demo_graph() -> FlowGraph {
    FlowGraph::new(
        vec![
            FlowNode::new("input", NodeKind::Input)
                .with_config(NodeConfig::new().with(KEY_INPUT, "0.5,1,1.5,2,2.5,3"))
                .at(100.0, 150.0),
            FlowNode::new("sine", NodeKind::Function).at(250.0, 150.0),
            FlowNode::new("transform", NodeKind::Transform)
                .with_config(
                    NodeConfig::new()
                        .with(KEY_TRANSFORM_TYPE, "cos")
                        .with(KEY_SCALE, 2.0),
                )
                .at(400.0, 150.0),
            FlowNode::new("output", NodeKind::Output).at(550.0, 150.0),
        ],
        vec![
            FlowEdge::new("input", "sine"),
            FlowEdge::new("sine", "transform"),
            FlowEdge::new("transform", "output"),
        ],
    )
}
