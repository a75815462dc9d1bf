//! Editor session
//!
//! [`FlowEditor`] ties a [`Canvas`], the code emitter, the evaluator and a
//! [`Renderer`] together. It keeps the last generated program and the last
//! result:
//!
//! 1. `generate_code` snapshots the canvas and emits a program (or refuses
//!    with a precondition error, keeping the previous program).
//! 2. `run_code` evaluates the stored program. Success stores and renders
//!    the result; failure clears both the stored result and the renderer.

use crate::config::{AppConfig, EditorSettings, EvaluatorSettings};
use crate::diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink};
use crate::error::{FlowError, Result};
use crate::frontend::{Canvas, NodeClick, Renderer};
use crate::pipeline::emitter::generate;
use crate::pipeline::error::PipelineError;
use crate::pipeline::id::NodeId;
use crate::pipeline::node_config::{NodeConfig, KEY_INPUT};
use crate::pipeline::node_type::NodeKind;
use crate::pipeline::validator::is_valid_numeric_list;
use crate::scripting::ScriptEngine;
use crate::types::{NumericSequence, PlotSeries};
use std::sync::Arc;

/// Chart title used when the program reports without a label
pub const RESULT_TITLE: &str = "Result";

/// An editing session over a canvas
pub struct FlowEditor<C: Canvas, R: Renderer> {
    canvas: C,
    renderer: R,
    engine: ScriptEngine,
    diagnostics: Arc<DiagnosticLog>,
    settings: EditorSettings,
    limits: EvaluatorSettings,
    code: Option<String>,
    output: Option<NumericSequence>,
}

impl<C: Canvas, R: Renderer> FlowEditor<C, R> {
    pub fn new(canvas: C, renderer: R, config: &AppConfig) -> Self {
        let diagnostics = Arc::new(DiagnosticLog::with_capacity(
            config.logging.diagnostic_capacity,
        ));
        let engine = ScriptEngine::with_settings(&config.evaluator, diagnostics.clone());

        Self {
            canvas,
            renderer,
            engine,
            diagnostics,
            settings: config.editor.clone(),
            limits: config.evaluator.clone(),
            code: None,
            output: None,
        }
    }

    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        self.canvas.add_node(kind)
    }

    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> Result<()> {
        self.canvas.connect(source, target)?;
        Ok(())
    }

    /// Set an input node's literal, rejecting malformed lists
    pub fn configure_input(&mut self, id: &NodeId, literal: &str) -> Result<()> {
        if !is_valid_numeric_list(literal) {
            self.diagnostics.record(
                Diagnostic::warn("Rejected input literal")
                    .for_kind(NodeKind::Input)
                    .detail("node", id)
                    .detail("input", literal),
            );
            return Err(PipelineError::InvalidInput {
                input: literal.to_string(),
            }
            .into());
        }
        self.configure(id, NodeConfig::new().with(KEY_INPUT, literal))
    }

    /// Merge `config` into a node's configuration
    pub fn configure(&mut self, id: &NodeId, config: NodeConfig) -> Result<()> {
        self.canvas.set_properties(id, config)?;
        Ok(())
    }

    pub fn click(&mut self, id: &NodeId) -> Option<NodeClick> {
        self.canvas.click(id)
    }

    /// Emit a program for the current canvas
    pub fn generate_code(&mut self) -> Result<&str> {
        let graph = self.canvas.snapshot();
        match generate(
            &graph,
            &self.settings.default_input,
            &self.limits,
            self.diagnostics.as_ref(),
        ) {
            Ok(code) => Ok(self.code.insert(code).as_str()),
            Err(e) => {
                self.diagnostics
                    .record(Diagnostic::warn("Code generation refused").detail("error", &e));
                Err(e)
            }
        }
    }

    /// Evaluate the last generated program
    pub fn run_code(&mut self) -> Result<&[f64]> {
        let Some(code) = self.code.as_deref() else {
            return Err(PipelineError::NoProgram.into());
        };

        match self.engine.run(code) {
            Ok(evaluation) => {
                let title = evaluation.label.as_deref().unwrap_or(RESULT_TITLE);
                self.renderer
                    .render(&PlotSeries::from_sequence(title, &evaluation.values));
                Ok(self.output.insert(evaluation.values).as_slice())
            }
            Err(e) => {
                tracing::error!("Program run failed: {}", e);
                self.diagnostics
                    .record(Diagnostic::error("Program run failed").detail("error", &e));
                self.output = None;
                self.renderer.clear();
                Err(e)
            }
        }
    }

    /// The last generated program
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The last successful result
    pub fn output(&self) -> Option<&[f64]> {
        self.output.as_deref()
    }

    /// Localized message for an error returned by this editor
    pub fn describe(&self, err: &FlowError) -> String {
        err.user_message(self.settings.language)
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
