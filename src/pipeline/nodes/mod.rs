//! Built-in node transforms (the transform engine).
//!
//! [`apply`] is the single entry point: an exhaustive match over
//! [`NodeKind`] that dispatches to the per-kind node. Every node resolves its
//! options from a [`NodeConfig`] first; options it cannot make sense of are
//! reported to the diagnostic sink and the node degrades instead of failing:
//!
//! | Kind      | Bad option                     | Behavior            |
//! |-----------|--------------------------------|---------------------|
//! | Transform | `transformType`, `scale`       | identity            |
//! | Filter    | `threshold`                    | identity            |
//! | Filter    | `condition`                    | keep all            |
//! | Stats     | `statType`                     | empty               |
//!
//! A missing option uses the catalog default. All transforms are pure.

pub mod filter;
pub mod function;
pub mod stats;
pub mod transform;

pub use filter::FilterNode;
pub use function::SinNode;
pub use stats::StatsNode;
pub use transform::TransformNode;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::pipeline::node_config::{ConfigValue, NodeConfig};
use crate::pipeline::node_type::NodeKind;
use crate::types::NumericSequence;
use std::str::FromStr;

/// Compute the output of a node of `kind` for `input` under `config`.
pub fn apply(
    kind: NodeKind,
    input: &[f64],
    config: &NodeConfig,
    sink: &dyn DiagnosticSink,
) -> NumericSequence {
    match kind {
        NodeKind::Input | NodeKind::Output => input.to_vec(),
        NodeKind::Function => SinNode.process(input),
        NodeKind::Transform => match TransformNode::from_config(config, sink) {
            Some(node) => node.process(input),
            None => input.to_vec(),
        },
        NodeKind::Filter => FilterNode::from_config(config, sink).process(input),
        NodeKind::Stats => match StatsNode::from_config(config, sink) {
            Some(node) => node.process(input),
            None => Vec::new(),
        },
    }
}

/// Outcome of looking up one option.
pub(crate) enum OptionValue<T> {
    /// Recognized value, or the default when the key is absent.
    Valid(T),
    /// Present but unusable; carries the rendered value for diagnostics.
    Invalid(String),
}

/// Resolve a numeric option, defaulting when absent.
pub(crate) fn number_option(config: &NodeConfig, key: &str, default: f64) -> OptionValue<f64> {
    match config.get(key) {
        None => OptionValue::Valid(default),
        Some(value) => match value.as_number() {
            Some(n) => OptionValue::Valid(n),
            None => OptionValue::Invalid(value.to_string()),
        },
    }
}

/// Resolve an enumerated option from its string form, defaulting when absent.
pub(crate) fn choice_option<T: FromStr>(config: &NodeConfig, key: &str, default: T) -> OptionValue<T> {
    match config.get(key) {
        None => OptionValue::Valid(default),
        Some(ConfigValue::String(s)) => match s.parse::<T>() {
            Ok(v) => OptionValue::Valid(v),
            Err(_) => OptionValue::Invalid(s.clone()),
        },
        Some(other) => OptionValue::Invalid(other.to_string()),
    }
}

/// Report an unusable option to the sink.
pub(crate) fn report_invalid(
    sink: &dyn DiagnosticSink,
    kind: NodeKind,
    key: &str,
    value: &str,
    fallback: &str,
) {
    sink.record(
        Diagnostic::warn(format!("Unrecognized {} option; {}", key, fallback))
            .for_kind(kind)
            .detail("option", key)
            .detail("value", value),
    );
}
