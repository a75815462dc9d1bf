//! Per-node configuration values.
//!
//! A node's configuration is a string-keyed map whose shape depends on the
//! node kind (see [`crate::pipeline::NodeKind::default_config`]). Keys that a
//! kind does not read are carried along and ignored, never rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Option key of the Input node's literal.
pub const KEY_INPUT: &str = "input";
/// Option key of the Transform node's function selector.
pub const KEY_TRANSFORM_TYPE: &str = "transformType";
/// Option key of the Transform node's multiplier.
pub const KEY_SCALE: &str = "scale";
/// Option key of the Filter node's comparison operator.
pub const KEY_CONDITION: &str = "condition";
/// Option key of the Filter node's comparison operand.
pub const KEY_THRESHOLD: &str = "threshold";
/// Option key of the Stats node's reduction selector.
pub const KEY_STAT_TYPE: &str = "statType";

/// A single configuration value.
///
/// Deserialization never fails on unexpected shapes: anything that is not a
/// bool, number or string lands in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    String(String),
    Other(serde_json::Value),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value: a finite number, or a string holding one.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            ConfigValue::Number(v) => *v,
            ConfigValue::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(v) => write!(f, "{}", v),
            ConfigValue::Number(v) => write!(f, "{}", v),
            ConfigValue::String(v) => f.write_str(v),
            ConfigValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Number(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Number(v as f64)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::String(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::String(v)
    }
}

/// Mapping from option name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeConfig(BTreeMap<String, ConfigValue>);

impl NodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.0.remove(key)
    }

    /// Overwrite this config's keys with those of `other`; other keys stay.
    pub fn merge(&mut self, other: NodeConfig) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact JSON rendering, used verbatim in emitted programs.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl FromIterator<(String, ConfigValue)> for NodeConfig {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An option held a value outside its recognized set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized option value: {0}")]
pub struct UnknownOption(pub String);

/// Elementwise function applied by a Transform node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformType {
    Cos,
    Tan,
    Exp,
    Log,
}

impl TransformType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformType::Cos => "cos",
            TransformType::Tan => "tan",
            TransformType::Exp => "exp",
            TransformType::Log => "log",
        }
    }

    pub fn all() -> &'static [TransformType] {
        &[
            TransformType::Cos,
            TransformType::Tan,
            TransformType::Exp,
            TransformType::Log,
        ]
    }

    /// Evaluate the function at `x`. `Log` is the natural logarithm.
    #[inline]
    pub fn eval(self, x: f64) -> f64 {
        match self {
            TransformType::Cos => x.cos(),
            TransformType::Tan => x.tan(),
            TransformType::Exp => x.exp(),
            TransformType::Log => x.ln(),
        }
    }
}

impl FromStr for TransformType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cos" => Ok(TransformType::Cos),
            "tan" => Ok(TransformType::Tan),
            "exp" => Ok(TransformType::Exp),
            "log" => Ok(TransformType::Log),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

/// Comparison used by a Filter node: keep `x` when `x <op> threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCondition {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
}

impl FilterCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCondition::Gt => ">",
            FilterCondition::Lt => "<",
            FilterCondition::Ge => ">=",
            FilterCondition::Le => "<=",
            FilterCondition::Eq => "==",
        }
    }

    pub fn all() -> &'static [FilterCondition] {
        &[
            FilterCondition::Gt,
            FilterCondition::Lt,
            FilterCondition::Ge,
            FilterCondition::Le,
            FilterCondition::Eq,
        ]
    }

    #[inline]
    pub fn keeps(self, x: f64, threshold: f64) -> bool {
        match self {
            FilterCondition::Gt => x > threshold,
            FilterCondition::Lt => x < threshold,
            FilterCondition::Ge => x >= threshold,
            FilterCondition::Le => x <= threshold,
            FilterCondition::Eq => x == threshold,
        }
    }
}

impl FromStr for FilterCondition {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" | "greater_than" => Ok(FilterCondition::Gt),
            "<" | "less_than" => Ok(FilterCondition::Lt),
            ">=" | "greater_equal" => Ok(FilterCondition::Ge),
            "<=" | "less_equal" => Ok(FilterCondition::Le),
            "==" | "equal" => Ok(FilterCondition::Eq),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

/// Reduction computed by a Stats node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    Mean,
    Sum,
    Max,
    Min,
}

impl StatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatType::Mean => "mean",
            StatType::Sum => "sum",
            StatType::Max => "max",
            StatType::Min => "min",
        }
    }

    pub fn all() -> &'static [StatType] {
        &[StatType::Mean, StatType::Sum, StatType::Max, StatType::Min]
    }
}

impl FromStr for StatType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(StatType::Mean),
            "sum" => Ok(StatType::Sum),
            "max" => Ok(StatType::Max),
            "min" => Ok(StatType::Min),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}
