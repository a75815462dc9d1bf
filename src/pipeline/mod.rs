//! Linear data-processing pipeline.
//!
//! A flow graph (nodes and edges from the canvas) is reduced to a single
//! processing chain, which is either executed directly or rendered as a
//! program for the evaluator.
//!
//! # Architecture
//!
//! ```text
//! FlowGraph ──► build_chain ──► ProcessingChain ──┬──► execute_chain ──► NumericSequence
//!                                                 └──► emit ──► program text ──► evaluator
//! ```
//!
//! # Design
//!
//! - **Closed node set**: `NodeKind` enum plus one exhaustive-match `apply`.
//! - **Borrowed chain**: `ProcessingChain` is a view over the graph snapshot,
//!   rebuilt on every request.
//! - **Explicit sink**: components that warn take `&dyn DiagnosticSink`.
//! - **Shared preconditions**: generation and direct execution both go
//!   through `executor::prepare`.

pub mod chain;
pub mod emitter;
pub mod error;
pub mod executor;
pub mod graph;
pub mod id;
pub mod node_config;
pub mod node_type;
pub mod nodes;
pub mod validator;

pub use chain::{build_chain, ProcessingChain};
pub use emitter::{emit, generate};
pub use error::{PipelineError, PipelineResult};
pub use executor::{execute_chain, prepare, run_direct, PreparedFlow};
pub use graph::{FlowEdge, FlowGraph, FlowNode, Position};
pub use id::NodeId;
pub use node_config::{ConfigValue, FilterCondition, NodeConfig, StatType, TransformType};
pub use node_type::{NodeKind, DEFAULT_INPUT};
pub use nodes::apply;
pub use validator::{is_valid_numeric_list, parse_numeric_list};
