//! Configuration sections.
//!
//! # Main Types
//!
//! - [`EvaluatorSettings`] - Safety limits applied to the script engine
//! - [`EditorSettings`] - Default input literal and UI language
//! - [`LoggingSettings`] - Log filter, optional log directory, diagnostic log size
//!
//! Every field carries a serde default, so a partial file fills the rest in.

use crate::diagnostics::DEFAULT_DIAGNOSTIC_CAPACITY;
use crate::i18n::Language;
use crate::pipeline::node_type::DEFAULT_INPUT;
use crate::scripting::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,flowcode_rs=debug";

/// Safety limits for evaluating emitted programs
///
/// A limit of `0` means unlimited. Code generation and direct execution
/// refuse flows whose program would exceed these limits, so both paths
/// accept the same flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorSettings {
    /// Maximum number of operations per evaluation
    pub max_operations: u64,

    /// Maximum function call nesting
    pub max_call_levels: usize,

    /// Maximum expression nesting depth
    pub max_expr_depth: usize,

    /// Maximum length of any string, in bytes
    pub max_string_size: usize,

    /// Maximum number of elements in any array
    pub max_array_size: usize,

    /// Number of compiled programs kept in the program cache
    pub cache_capacity: usize,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            max_operations: 100_000,
            max_call_levels: 32,
            max_expr_depth: 64,
            max_string_size: 100_000,
            max_array_size: 100_000,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Editor behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Literal used when an input node carries none
    pub default_input: String,

    /// Language of user-facing messages and node labels
    pub language: Language,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_input: DEFAULT_INPUT.to_string(),
            language: Language::default(),
        }
    }
}

/// Logging output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,

    /// Directory for daily-rolling log files; console only when unset
    pub directory: Option<PathBuf>,

    /// Number of entries kept by the in-memory diagnostic log
    pub diagnostic_capacity: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            directory: None,
            diagnostic_capacity: DEFAULT_DIAGNOSTIC_CAPACITY,
        }
    }
}
