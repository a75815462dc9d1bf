//! Node kind enumeration and the node catalog.
//!
//! The set of kinds is closed. Each kind has a fixed label and a default
//! configuration that new nodes are seeded with.

use crate::i18n::Language;
use crate::pipeline::error::PipelineError;
use crate::pipeline::node_config::{
    NodeConfig, KEY_CONDITION, KEY_INPUT, KEY_SCALE, KEY_STAT_TYPE, KEY_THRESHOLD,
    KEY_TRANSFORM_TYPE,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Default literal of a freshly added Input node.
pub const DEFAULT_INPUT: &str = "1,2,3,4,5,6";

/// Types of nodes that can be placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Source of the chain: parses a comma-separated literal.
    Input,
    /// Elementwise sine.
    Function,
    /// Elementwise `f(x) * scale` for a selectable `f`.
    Transform,
    /// Keeps elements passing a threshold comparison.
    Filter,
    /// Reduces the sequence to one value.
    Stats,
    /// Terminal node whose sequence is plotted.
    Output,
}

impl NodeKind {
    /// Get all node kinds, in palette order.
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Input,
            NodeKind::Function,
            NodeKind::Transform,
            NodeKind::Filter,
            NodeKind::Stats,
            NodeKind::Output,
        ]
    }

    /// Lowercase tag used in graph snapshots and emitted programs.
    pub fn wire_name(&self) -> &'static str {
        match self {
            NodeKind::Input => "input",
            NodeKind::Function => "function",
            NodeKind::Transform => "transform",
            NodeKind::Filter => "filter",
            NodeKind::Stats => "stats",
            NodeKind::Output => "output",
        }
    }

    /// Get the display label for this kind in the given language.
    pub fn label(&self, lang: Language) -> &'static str {
        match lang {
            Language::SimplifiedChinese => match self {
                NodeKind::Input => "数据输入",
                NodeKind::Function => "sin函数",
                NodeKind::Transform => "数据转换",
                NodeKind::Filter => "数据过滤",
                NodeKind::Stats => "数据统计",
                NodeKind::Output => "曲线输出",
            },
            Language::English => match self {
                NodeKind::Input => "Data Input",
                NodeKind::Function => "Sin Function",
                NodeKind::Transform => "Data Transform",
                NodeKind::Filter => "Data Filter",
                NodeKind::Stats => "Data Stats",
                NodeKind::Output => "Curve Output",
            },
        }
    }

    /// Canonical catalog label (the canvas text of the node).
    pub fn label_for(&self) -> &'static str {
        self.label(Language::SimplifiedChinese)
    }

    /// Get the English display name for this kind.
    pub fn display_name(&self) -> &'static str {
        self.label(Language::English)
    }

    /// Default configuration a new node of this kind starts with.
    pub fn default_config(&self) -> NodeConfig {
        match self {
            NodeKind::Input => NodeConfig::new().with(KEY_INPUT, DEFAULT_INPUT),
            NodeKind::Transform => NodeConfig::new()
                .with(KEY_TRANSFORM_TYPE, "cos")
                .with(KEY_SCALE, 1.0),
            NodeKind::Filter => NodeConfig::new()
                .with(KEY_CONDITION, ">")
                .with(KEY_THRESHOLD, 0.0),
            NodeKind::Stats => NodeConfig::new().with(KEY_STAT_TYPE, "mean"),
            NodeKind::Function | NodeKind::Output => NodeConfig::new(),
        }
    }

    /// Whether this kind carries any configuration options.
    pub fn is_configurable(&self) -> bool {
        !matches!(self, NodeKind::Function | NodeKind::Output)
    }

    /// Get a short description of what this node does.
    pub fn description(&self) -> &'static str {
        match self {
            NodeKind::Input =>
                "Provides the initial data.\n\
                 Accepts comma-separated numbers,\n\
                 e.g. 1,2,3,4,5,6.",

            NodeKind::Function =>
                "Applies sin(x) to every element.",

            NodeKind::Transform =>
                "Applies cos, tan, exp or log to every element\n\
                 and multiplies the result by a scale factor.",

            NodeKind::Filter =>
                "Keeps elements that satisfy a comparison\n\
                 (>, <, >=, <=, ==) against a threshold.",

            NodeKind::Stats =>
                "Reduces the data to its mean, sum,\n\
                 maximum or minimum.",

            NodeKind::Output =>
                "Plots the incoming data as a line chart.",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for NodeKind {
    type Err = PipelineError;

    /// Accepts the wire tag (`input`), the canvas instance form (`input-1`)
    /// and the legacy canvas type names (`inputData`, `sinFunction`,
    /// `curveOutput`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s.rsplit_once('-') {
            Some((head, tail)) if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) => {
                head
            }
            _ => s,
        };
        match tag {
            "input" | "inputData" => Ok(NodeKind::Input),
            "function" | "sinFunction" => Ok(NodeKind::Function),
            "transform" => Ok(NodeKind::Transform),
            "filter" => Ok(NodeKind::Filter),
            "stats" => Ok(NodeKind::Stats),
            "output" | "curveOutput" => Ok(NodeKind::Output),
            _ => Err(PipelineError::UnknownNodeKind(s.to_string())),
        }
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_name())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
