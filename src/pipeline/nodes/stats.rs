//! StatsNode: reduces a sequence to a single value.
//!
//! Every reduction of an empty sequence yields an empty sequence, so `mean`
//! never produces NaN from a division by zero and `max`/`min` never need an
//! identity element. A NaN anywhere in the input makes every reduction NaN.

use super::{choice_option, report_invalid, OptionValue};
use crate::diagnostics::DiagnosticSink;
use crate::pipeline::node_config::{NodeConfig, StatType, KEY_STAT_TYPE};
use crate::pipeline::node_type::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsNode {
    pub stat: StatType,
}

impl StatsNode {
    pub fn new(stat: StatType) -> Self {
        Self { stat }
    }

    /// Resolve options from `config`. `None` means "emit nothing".
    pub fn from_config(config: &NodeConfig, sink: &dyn DiagnosticSink) -> Option<Self> {
        match choice_option(config, KEY_STAT_TYPE, StatType::Mean) {
            OptionValue::Valid(stat) => Some(Self::new(stat)),
            OptionValue::Invalid(raw) => {
                report_invalid(sink, NodeKind::Stats, KEY_STAT_TYPE, &raw, "emitting no data");
                None
            }
        }
    }

    pub fn process(&self, input: &[f64]) -> Vec<f64> {
        if input.is_empty() {
            return Vec::new();
        }
        let value = match self.stat {
            StatType::Sum => input.iter().sum(),
            StatType::Mean => input.iter().sum::<f64>() / input.len() as f64,
            StatType::Max => extremum(input, f64::max),
            StatType::Min => extremum(input, f64::min),
        };
        vec![value]
    }
}

/// Fold a non-empty sequence with `pick`. Any NaN makes the result NaN.
fn extremum(input: &[f64], pick: fn(f64, f64) -> f64) -> f64 {
    input[1..].iter().fold(input[0], |acc, &x| {
        if acc.is_nan() || x.is_nan() {
            f64::NAN
        } else {
            pick(acc, x)
        }
    })
}
