//! FilterNode: threshold filtering node.
//!
//! Keeps the elements `x` for which `x <condition> threshold` holds. When the
//! threshold is unusable the input passes through untouched; when the
//! condition is unrecognized every element is kept (fail-open).

use super::{choice_option, number_option, report_invalid, OptionValue};
use crate::diagnostics::DiagnosticSink;
use crate::pipeline::node_config::{FilterCondition, NodeConfig, KEY_CONDITION, KEY_THRESHOLD};
use crate::pipeline::node_type::NodeKind;

/// Filters elements by a comparison against a threshold.
///
/// `condition == None` is passthrough mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterNode {
    condition: Option<FilterCondition>,
    threshold: f64,
}

impl FilterNode {
    pub fn new(condition: FilterCondition, threshold: f64) -> Self {
        Self {
            condition: Some(condition),
            threshold,
        }
    }

    /// A filter that keeps everything.
    pub fn passthrough() -> Self {
        Self {
            condition: None,
            threshold: 0.0,
        }
    }

    pub fn from_config(config: &NodeConfig, sink: &dyn DiagnosticSink) -> Self {
        let threshold = match number_option(config, KEY_THRESHOLD, 0.0) {
            OptionValue::Valid(t) => t,
            OptionValue::Invalid(raw) => {
                report_invalid(sink, NodeKind::Filter, KEY_THRESHOLD, &raw, "passing data through");
                return Self::passthrough();
            }
        };
        match choice_option(config, KEY_CONDITION, FilterCondition::Gt) {
            OptionValue::Valid(condition) => Self::new(condition, threshold),
            OptionValue::Invalid(raw) => {
                report_invalid(sink, NodeKind::Filter, KEY_CONDITION, &raw, "keeping all elements");
                Self::passthrough()
            }
        }
    }

    pub fn process(&self, input: &[f64]) -> Vec<f64> {
        match self.condition {
            None => input.to_vec(),
            Some(condition) => input
                .iter()
                .copied()
                .filter(|&x| condition.keeps(x, self.threshold))
                .collect(),
        }
    }

    pub fn condition(&self) -> Option<FilterCondition> {
        self.condition
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Check if in passthrough mode (no filtering).
    pub fn is_passthrough(&self) -> bool {
        self.condition.is_none()
    }
}

impl Default for FilterNode {
    fn default() -> Self {
        Self::new(FilterCondition::Gt, 0.0)
    }
}
