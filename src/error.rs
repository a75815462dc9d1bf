//! Error handling for flowcode-rs
//!
//! This module defines the crate-wide error type and a Result alias.
//! Precondition failures raised while building or running a flow live in
//! [`crate::pipeline::PipelineError`] and are wrapped here.

use crate::i18n::Language;
use crate::pipeline::PipelineError;
use thiserror::Error;

/// Main error type for flowcode-rs operations
#[derive(Error, Debug)]
pub enum FlowError {
    /// A user-facing precondition was not met (no edges, no input node, ...)
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Errors raised while compiling or evaluating an emitted program
    #[error("Script error: {0}")]
    Script(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// A canvas snapshot could not be decoded
    #[error("Graph snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FlowError>,
    },
}

impl FlowError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FlowError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a script error from a Rhai error
    pub fn from_rhai_error(err: Box<rhai::EvalAltResult>) -> Self {
        FlowError::Script(err.to_string())
    }

    /// Message for the user in `lang`.
    ///
    /// Precondition failures get their short prompt; anything else is
    /// reported as a failed run with the error text.
    pub fn user_message(&self, lang: Language) -> String {
        if let Some(e) = self.as_pipeline() {
            return e.user_message(lang);
        }
        match lang {
            Language::English => format!("Run failed: {}", self),
            Language::SimplifiedChinese => format!("运行失败：{}", self),
        }
    }

    /// The precondition failure behind this error, looking through context wrappers.
    pub fn as_pipeline(&self) -> Option<&PipelineError> {
        match self {
            FlowError::Pipeline(e) => Some(e),
            FlowError::WithContext { source, .. } => source.as_pipeline(),
            _ => None,
        }
    }
}

/// Result type alias for flowcode-rs operations
pub type Result<T> = std::result::Result<T, FlowError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, Box<rhai::EvalAltResult>> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| FlowError::from_rhai_error(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| FlowError::from_rhai_error(e).with_context(f()))
    }
}
