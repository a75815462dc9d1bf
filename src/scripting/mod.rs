//! Rhai evaluator for emitted flow programs
//!
//! Generated programs are plain Rhai scripts. The engine is sandboxed (no
//! file, network or module access) and runs under the operation and size
//! limits from [`EvaluatorSettings`](crate::config::EvaluatorSettings).
//! `import` statements always fail: no module resolver reaches the disk.
//!
//! ## Registered Functions
//!
//! - `apply(kind, data, config_json)` - Run one node of the transform engine;
//!   `config_json` is the node configuration as a JSON object string
//! - `apply(kind, data, config_map)` - Same, with a Rhai object map
//! - `to_numbers(literal)` - Parse a comma-separated literal into an array
//!   (error on the first invalid token)
//! - `to_number(token)` - Parse one trimmed decimal token (error if invalid)
//! - `report(data)` / `report(label, data)` - Record the program result
//! - `print(...)` - Captured into [`Evaluation::printed`]
//!
//! ## Example Program
//!
//! ```rhai
//! let data = to_numbers("1,2,3");
//! data = apply("transform", data, #{ transformType: "exp", scale: 0.5 });
//! data = apply("stats", data, "{\"statType\":\"max\"}");
//! report("peak", data);
//! ```

mod engine;

pub use engine::{Evaluation, ScriptContext, ScriptEngine, SharedScriptContext};

use crate::error::{FlowError, Result};
use rhai::{Engine, AST};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

/// A compiled program that can be evaluated repeatedly
#[derive(Clone)]
pub struct CompiledProgram {
    ast: AST,
    source: String,
}

impl CompiledProgram {
    /// Get the source code of this program
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn ast(&self) -> &AST {
        &self.ast
    }
}

impl std::fmt::Debug for CompiledProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledProgram")
            .field("source", &self.source)
            .finish()
    }
}

/// Number of compiled programs kept when no capacity is given
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Cache of compiled programs keyed by source text
///
/// Holds at most `capacity` programs; the least recently compiled one is
/// evicted first.
pub struct ScriptCache {
    cache: HashMap<String, CompiledProgram>,
    /// Sources in insertion order, oldest first
    order: VecDeque<String>,
    capacity: usize,
}

impl ScriptCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` programs (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Get a cached program or compile and cache it
    pub fn get_or_compile(&mut self, engine: &Engine, source: &str) -> Result<CompiledProgram> {
        if let Some(program) = self.cache.get(source) {
            return Ok(program.clone());
        }

        let ast = engine
            .compile(source)
            .map_err(|e| FlowError::Script(format!("Compilation error: {}", e)))?;

        let program = CompiledProgram {
            ast,
            source: source.to_string(),
        };

        while self.cache.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.cache.remove(&oldest);
        }
        self.cache.insert(source.to_string(), program.clone());
        self.order.push_back(source.to_string());
        Ok(program)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.order.clear();
    }

    /// Remove a specific program from the cache
    pub fn invalidate(&mut self, source: &str) {
        if self.cache.remove(source).is_some() {
            self.order.retain(|s| s != source);
        }
    }
}

impl Default for ScriptCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe script cache wrapper
pub type SharedScriptCache = Arc<RwLock<ScriptCache>>;

/// Create a new shared script cache holding at most `capacity` programs
pub fn create_shared_cache(capacity: usize) -> SharedScriptCache {
    Arc::new(RwLock::new(ScriptCache::with_capacity(capacity)))
}
