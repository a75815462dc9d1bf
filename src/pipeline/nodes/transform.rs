//! TransformNode: elementwise `f(x) * scale`.
//!
//! `f` is selected by `transformType` (`cos`, `tan`, `exp`, `log`, where
//! `log` is the natural logarithm). An unrecognized `transformType` or a
//! non-numeric `scale` makes the node an identity.

use super::{choice_option, number_option, report_invalid, OptionValue};
use crate::diagnostics::DiagnosticSink;
use crate::pipeline::node_config::{NodeConfig, TransformType, KEY_SCALE, KEY_TRANSFORM_TYPE};
use crate::pipeline::node_type::NodeKind;

/// Resolved Transform node options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformNode {
    pub transform: TransformType,
    pub scale: f64,
}

impl TransformNode {
    pub fn new(transform: TransformType, scale: f64) -> Self {
        Self { transform, scale }
    }

    /// Resolve options from `config`. `None` means "pass input through".
    pub fn from_config(config: &NodeConfig, sink: &dyn DiagnosticSink) -> Option<Self> {
        let transform = match choice_option(config, KEY_TRANSFORM_TYPE, TransformType::Cos) {
            OptionValue::Valid(t) => Some(t),
            OptionValue::Invalid(raw) => {
                report_invalid(sink, NodeKind::Transform, KEY_TRANSFORM_TYPE, &raw, "passing data through");
                None
            }
        };
        let scale = match number_option(config, KEY_SCALE, 1.0) {
            OptionValue::Valid(s) => Some(s),
            OptionValue::Invalid(raw) => {
                report_invalid(sink, NodeKind::Transform, KEY_SCALE, &raw, "passing data through");
                None
            }
        };
        Some(Self::new(transform?, scale?))
    }

    pub fn process(&self, input: &[f64]) -> Vec<f64> {
        input
            .iter()
            .map(|&x| self.transform.eval(x) * self.scale)
            .collect()
    }
}
