//! Pipeline precondition errors.
//!
//! These are the user-facing failures reported before any code is emitted or
//! evaluated. None of them is fatal; the user fixes the flow and retries.

use crate::i18n::Language;
use crate::pipeline::id::NodeId;
use thiserror::Error;

/// Errors that can occur when turning a flow graph into a program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Flow has no edges: connect the nodes first")]
    NoEdges,

    #[error("Flow has no data input node")]
    NoInputNode,

    #[error("Invalid input {input:?}: expected comma-separated numbers")]
    InvalidInput { input: String },

    #[error("Input literal is {len} bytes, more than the evaluator limit of {limit}")]
    InputTooLarge { len: usize, limit: usize },

    #[error("Input has {count} values, more than the evaluator limit of {limit}")]
    TooManyValues { count: usize, limit: usize },

    #[error("Configuration of node {node} is {len} bytes, more than the evaluator limit of {limit}")]
    ConfigTooLarge { node: NodeId, len: usize, limit: usize },

    #[error("Chain has {stages} processing nodes, more than the evaluator allows ({limit})")]
    ChainTooLong { stages: usize, limit: usize },

    #[error("No generated program: generate code before running it")]
    NoProgram,

    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Unknown node kind: {0}")]
    UnknownNodeKind(String),
}

impl PipelineError {
    /// Short message suitable for a toast or dialog in the given language.
    pub fn user_message(&self, lang: Language) -> String {
        match (self, lang) {
            (PipelineError::NoEdges, Language::English) => "Please connect the nodes".into(),
            (PipelineError::NoEdges, Language::SimplifiedChinese) => "请连接节点".into(),
            (PipelineError::NoInputNode, Language::English) => {
                "Please add a data input node".into()
            }
            (PipelineError::NoInputNode, Language::SimplifiedChinese) => {
                "请添加数据输入节点".into()
            }
            (PipelineError::InvalidInput { .. }, Language::English) => {
                "Input must be numbers separated by commas".into()
            }
            (PipelineError::InvalidInput { .. }, Language::SimplifiedChinese) => {
                "输入必须是数字，用逗号分隔".into()
            }
            (PipelineError::InputTooLarge { limit, .. }, Language::English) => {
                format!("Input is too long (at most {} characters)", limit)
            }
            (PipelineError::InputTooLarge { limit, .. }, Language::SimplifiedChinese) => {
                format!("输入过长（最多 {} 个字符）", limit)
            }
            (PipelineError::TooManyValues { limit, .. }, Language::English) => {
                format!("Too many input values (at most {})", limit)
            }
            (PipelineError::TooManyValues { limit, .. }, Language::SimplifiedChinese) => {
                format!("输入数据过多（最多 {} 个）", limit)
            }
            (PipelineError::ConfigTooLarge { node, .. }, Language::English) => {
                format!("Settings of node {} are too long", node)
            }
            (PipelineError::ConfigTooLarge { node, .. }, Language::SimplifiedChinese) => {
                format!("节点 {} 的配置过长", node)
            }
            (PipelineError::ChainTooLong { limit, .. }, Language::English) => {
                format!("Too many processing nodes (at most {})", limit)
            }
            (PipelineError::ChainTooLong { limit, .. }, Language::SimplifiedChinese) => {
                format!("处理节点过多（最多 {} 个）", limit)
            }
            (PipelineError::NoProgram, Language::English) => "Please generate code first".into(),
            (PipelineError::NoProgram, Language::SimplifiedChinese) => "请先生成代码".into(),
            (PipelineError::NodeNotFound(id), Language::English) => {
                format!("Node {} does not exist", id)
            }
            (PipelineError::NodeNotFound(id), Language::SimplifiedChinese) => {
                format!("节点 {} 不存在", id)
            }
            (PipelineError::UnknownNodeKind(kind), Language::English) => {
                format!("Unknown node type: {}", kind)
            }
            (PipelineError::UnknownNodeKind(kind), Language::SimplifiedChinese) => {
                format!("未知的节点类型: {}", kind)
            }
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
