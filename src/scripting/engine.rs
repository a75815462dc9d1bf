//! Rhai Script Engine Implementation
//!
//! The engine evaluates emitted programs. The transform engine is bound as
//! `apply`, so a program built by the emitter computes exactly what the
//! direct executor computes for the same chain.
//!
//! Registered functions write into a [`ScriptContext`] shared with the
//! engine; it is reset before each evaluation and drained after it.

use crate::config::EvaluatorSettings;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{FlowError, Result, ResultExt};
use crate::pipeline::node_config::NodeConfig;
use crate::pipeline::node_type::NodeKind;
use crate::pipeline::nodes;
use crate::pipeline::validator::{parse_number, LIST_SEPARATOR};
use crate::scripting::{create_shared_cache, CompiledProgram, SharedScriptCache};
use crate::types::NumericSequence;
use rhai::module_resolvers::DummyModuleResolver;
use rhai::{Array, Dynamic, Engine, EvalAltResult, Map, Position};
use std::sync::{Arc, Mutex, RwLock};

/// Result of evaluating a program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Sequence passed to `report`
    pub values: NumericSequence,
    /// Label passed to `report(label, data)`, if any
    pub label: Option<String>,
    /// Lines written with `print`
    pub printed: Vec<String>,
}

/// State written by registered functions during one evaluation
#[derive(Debug, Clone, Default)]
pub struct ScriptContext {
    reported: Option<(Option<String>, NumericSequence)>,
    printed: Vec<String>,
}

impl ScriptContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn report(&mut self, label: Option<String>, values: NumericSequence) {
        if self.reported.is_some() {
            tracing::debug!("report called more than once; keeping the last result");
        }
        self.reported = Some((label, values));
    }

    /// Whether `report` has been called
    pub fn has_report(&self) -> bool {
        self.reported.is_some()
    }

    fn reset(&mut self) {
        self.reported = None;
        self.printed.clear();
    }
}

/// Thread-safe shared script context
pub type SharedScriptContext = Arc<RwLock<ScriptContext>>;

/// Evaluator for emitted programs
pub struct ScriptEngine {
    engine: Engine,
    cache: SharedScriptCache,
    context: SharedScriptContext,
    /// Serializes evaluations; they share `context`
    run_lock: Mutex<()>,
}

impl ScriptEngine {
    /// Create an engine with default limits, logging diagnostics through `tracing`
    pub fn new() -> Self {
        Self::with_settings(&EvaluatorSettings::default(), Arc::new(TracingSink))
    }

    /// Create an engine with explicit limits and diagnostic sink
    pub fn with_settings(settings: &EvaluatorSettings, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_cache(settings, sink, create_shared_cache(settings.cache_capacity))
    }

    /// Create an engine sharing an existing program cache
    pub fn with_cache(
        settings: &EvaluatorSettings,
        sink: Arc<dyn DiagnosticSink>,
        cache: SharedScriptCache,
    ) -> Self {
        let context = Arc::new(RwLock::new(ScriptContext::new()));
        let mut engine = Engine::new();
        Self::configure_engine(&mut engine, settings, sink, context.clone());

        Self {
            engine,
            cache,
            context,
            run_lock: Mutex::new(()),
        }
    }

    /// Configure the Rhai engine with flow functions and safety limits
    fn configure_engine(
        engine: &mut Engine,
        settings: &EvaluatorSettings,
        sink: Arc<dyn DiagnosticSink>,
        context: SharedScriptContext,
    ) {
        engine.set_max_expr_depths(settings.max_expr_depth, settings.max_expr_depth);
        engine.set_max_call_levels(settings.max_call_levels);
        engine.set_max_operations(settings.max_operations);
        engine.set_max_string_size(settings.max_string_size);
        engine.set_max_array_size(settings.max_array_size);
        engine.set_max_map_size(1_000);
        // The default resolver loads `import`ed files from disk.
        engine.set_module_resolver(DummyModuleResolver::new());

        {
            let ctx = context.clone();
            engine.on_print(move |text| {
                if let Ok(mut c) = ctx.write() {
                    c.printed.push(text.to_string());
                }
            });
        }
        engine.on_debug(|text, source, pos| {
            tracing::debug!("script debug {:?} at {}: {}", source, pos, text);
        });

        engine.register_fn("to_number", |token: &str| -> std::result::Result<f64, Box<EvalAltResult>> {
            parse_number(token).ok_or_else(|| not_a_number(token))
        });
        engine.register_fn("to_numbers", |literal: &str| -> std::result::Result<Array, Box<EvalAltResult>> {
            literal
                .split(LIST_SEPARATOR)
                .map(|token| {
                    parse_number(token)
                        .map(Dynamic::from_float)
                        .ok_or_else(|| not_a_number(token))
                })
                .collect()
        });

        {
            let sink = sink.clone();
            engine.register_fn(
                "apply",
                move |kind: &str, data: Array, config: &str| -> std::result::Result<Array, Box<EvalAltResult>> {
                    let config: NodeConfig = serde_json::from_str(config)
                        .map_err(|e| runtime_error(format!("invalid node config: {}", e)))?;
                    apply_node(sink.as_ref(), kind, &data, &config)
                },
            );
        }
        {
            let sink = sink.clone();
            engine.register_fn(
                "apply",
                move |kind: &str, data: Array, config: Map| -> std::result::Result<Array, Box<EvalAltResult>> {
                    let config: NodeConfig = rhai::serde::from_dynamic(&Dynamic::from_map(config))?;
                    apply_node(sink.as_ref(), kind, &data, &config)
                },
            );
        }

        {
            let ctx = context.clone();
            engine.register_fn(
                "report",
                move |data: Array| -> std::result::Result<(), Box<EvalAltResult>> {
                    let values = to_sequence(&data)?;
                    ctx.write()
                        .map_err(|_| runtime_error("script context poisoned"))?
                        .report(None, values);
                    Ok(())
                },
            );
        }
        {
            let ctx = context;
            engine.register_fn(
                "report",
                move |label: &str, data: Array| -> std::result::Result<(), Box<EvalAltResult>> {
                    let values = to_sequence(&data)?;
                    ctx.write()
                        .map_err(|_| runtime_error("script context poisoned"))?
                        .report(Some(label.to_string()), values);
                    Ok(())
                },
            );
        }
    }

    /// Compile a program and cache it
    pub fn compile(&self, source: &str) -> Result<CompiledProgram> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| FlowError::Script(format!("Failed to acquire cache lock: {}", e)))?;

        cache.get_or_compile(&self.engine, source)
    }

    /// Evaluate a compiled program
    ///
    /// Fails if the program raises an error, exceeds a limit, or never calls
    /// `report`.
    pub fn execute(&self, program: &CompiledProgram) -> Result<Evaluation> {
        let _guard = self
            .run_lock
            .lock()
            .map_err(|e| FlowError::Script(format!("Failed to acquire run lock: {}", e)))?;

        self.context_mut()?.reset();

        self.engine
            .run_ast(program.ast())
            .context("Evaluation failed")?;

        let mut context = self.context_mut()?;
        let printed = std::mem::take(&mut context.printed);
        let Some((label, values)) = context.reported.take() else {
            return Err(FlowError::Script(
                "Program finished without reporting a result".to_string(),
            ));
        };

        tracing::info!("Program evaluated: {} values reported", values.len());
        Ok(Evaluation {
            values,
            label,
            printed,
        })
    }

    /// Compile (or fetch from cache) and evaluate a program
    pub fn run(&self, source: &str) -> Result<Evaluation> {
        let program = self.compile(source)?;
        self.execute(&program)
    }

    /// Validate a program without executing it
    pub fn validate(&self, source: &str) -> Result<()> {
        self.engine
            .compile(source)
            .map(|_| ())
            .map_err(|e| FlowError::Script(format!("Validation error: {}", e)))
    }

    /// Clear the program cache
    pub fn clear_cache(&self) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| FlowError::Script(format!("Failed to acquire cache lock: {}", e)))?;
        cache.clear();
        Ok(())
    }

    /// Get a reference to the underlying Rhai engine
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Get a reference to the shared cache
    pub fn cache(&self) -> &SharedScriptCache {
        &self.cache
    }

    /// Get a reference to the shared context
    pub fn context(&self) -> &SharedScriptContext {
        &self.context
    }

    fn context_mut(&self) -> Result<std::sync::RwLockWriteGuard<'_, ScriptContext>> {
        self.context
            .write()
            .map_err(|e| FlowError::Script(format!("Failed to acquire context lock: {}", e)))
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEngine")
            .field("cache_size", &self.cache.read().map(|c| c.len()).ok())
            .finish()
    }
}

fn runtime_error(message: impl Into<String>) -> Box<EvalAltResult> {
    Box::new(EvalAltResult::ErrorRuntime(
        Dynamic::from(message.into()),
        Position::NONE,
    ))
}

fn not_a_number(token: &str) -> Box<EvalAltResult> {
    runtime_error(format!("not a number: {:?}", token))
}

fn to_sequence(data: &Array) -> std::result::Result<NumericSequence, Box<EvalAltResult>> {
    data.iter()
        .map(|value| {
            value
                .as_float()
                .or_else(|_| value.as_int().map(|i| i as f64))
                .map_err(|type_name| runtime_error(format!("expected a number, found {}", type_name)))
        })
        .collect()
}

fn apply_node(
    sink: &dyn DiagnosticSink,
    kind: &str,
    data: &Array,
    config: &NodeConfig,
) -> std::result::Result<Array, Box<EvalAltResult>> {
    let kind: NodeKind = kind.parse().map_err(|e| runtime_error(format!("{}", e)))?;
    let input = to_sequence(data)?;
    let output = nodes::apply(kind, &input, config, sink);
    Ok(output.into_iter().map(Dynamic::from_float).collect())
}
