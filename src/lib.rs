//! # flowcode-rs: Low-Code Numeric Flow Pipeline
//!
//! A flow of nodes (data input, sine function, transform, filter, stats,
//! curve output) is reduced to a single linear processing chain. The chain is
//! rendered as a small Rhai program that the user can read, and that program
//! is evaluated in a sandboxed engine to produce a numeric sequence for
//! plotting. The same chain can also be executed directly; both paths must
//! agree.
//!
//! ## Architecture
//!
//! - **Pipeline**: Node catalog, chain builder, transform engine, code emitter,
//!   input validator and direct executor
//! - **Scripting**: Rhai evaluator with the transform engine bound as `apply`
//! - **Frontend**: `Canvas` and `Renderer` traits with headless implementations
//! - **Diagnostics**: Injectable sink for fail-open warnings, backed by `tracing`
//!
//! ## Configuration
//!
//! Settings are read from `config.toml` in the platform config directory
//! under `dev.flowcode.flowcode-rs` (see [`config`]).
//!
//! ## Example
//!
//! ```no_run
//! use flowcode_rs::{AppConfig, FlowEditor, MemoryCanvas, NodeKind, TextRenderer};
//!
//! fn main() -> flowcode_rs::Result<()> {
//!     let config = AppConfig::load_or_default();
//!     let renderer = TextRenderer::new(std::io::stdout());
//!     let mut editor = FlowEditor::new(MemoryCanvas::new(), renderer, &config);
//!
//!     let input = editor.add_node(NodeKind::Input);
//!     let sine = editor.add_node(NodeKind::Function);
//!     editor.connect(&input, &sine)?;
//!     editor.configure_input(&input, "1,2,3")?;
//!
//!     println!("{}", editor.generate_code()?);
//!     let values = editor.run_code()?;
//!     println!("{:?}", values);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod frontend;
pub mod i18n;
pub mod pipeline;
pub mod scripting;
pub mod types;

// Re-export commonly used types
pub use app::FlowEditor;
pub use config::AppConfig;
pub use diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink, Level, TracingSink};
pub use error::{FlowError, Result, ResultExt};
pub use frontend::{Canvas, MemoryCanvas, NodeClick, Renderer, TextRenderer};
pub use i18n::Language;
pub use pipeline::{
    build_chain, emit, execute_chain, generate, run_direct, FlowEdge, FlowGraph, FlowNode,
    NodeConfig, NodeId, NodeKind, PipelineError, ProcessingChain,
};
pub use scripting::{Evaluation, ScriptEngine};
pub use types::{NumericSequence, PlotSeries};
