//! The [`Evaluator`] ties compilation, caching, and execution together.
//!
//! Evaluation takes a registry read lock for the whole compile-and-run
//! pass, so the parser's arity checks and the executor's dispatch always
//! see the same set of functions. Registration takes the write lock and
//! therefore waits for in-flight evaluations to drain.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::cache::{CachePolicy, ProgramCache};
use crate::errors::{Error, FunctionError};
use crate::registry::FunctionRegistry;
use crate::rpn;
use dex_ir::{Decimal, Program};
use dex_parse::Parser;

/// Identifier values supplied per evaluation.
pub type Bindings = FxHashMap<String, Decimal>;

pub struct Evaluator {
    registry: RwLock<FunctionRegistry>,
    cache: Box<dyn ProgramCache>,
}

impl Evaluator {
    /// Build an evaluator around an explicit registry.
    pub fn new(policy: CachePolicy, registry: FunctionRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            cache: policy.build(),
        }
    }

    /// Build an evaluator preloaded with the builtin functions.
    pub fn with_builtins(policy: CachePolicy) -> Self {
        Self::new(policy, FunctionRegistry::with_builtins())
    }

    /// Evaluate `expression` with the given bindings.
    ///
    /// Compiles on a cache miss, then executes the postfix program. The
    /// expression text is the cache key, byte for byte.
    pub fn evaluate(&self, expression: &str, bindings: &Bindings) -> Result<Decimal, Error> {
        let registry = self.registry.read();
        let program = self.fetch_or_compile(expression, &registry)?;
        rpn::run(&program, bindings, &registry).map_err(|source| Error::Eval {
            expression: expression.to_string(),
            source,
        })
    }

    /// Compile `expression` and warm the cache without executing it.
    pub fn precompile(&self, expression: &str) -> Result<Arc<Program>, Error> {
        let registry = self.registry.read();
        self.fetch_or_compile(expression, &registry)
    }

    /// Register a custom function under `name`.
    ///
    /// Registered functions are variadic at parse time; the body enforces
    /// whatever argument contract it wants via [`FunctionError`].
    pub fn register_function<F>(&self, name: &str, call: F) -> Result<(), Error>
    where
        F: Fn(&[Decimal]) -> Result<Decimal, FunctionError> + Send + Sync + 'static,
    {
        self.registry.write().register(name, Arc::new(call))?;
        tracing::debug!(name, "registered function");
        Ok(())
    }

    fn fetch_or_compile(
        &self,
        expression: &str,
        registry: &FunctionRegistry,
    ) -> Result<Arc<Program>, Error> {
        if let Some(program) = self.cache.get(expression) {
            return Ok(program);
        }
        tracing::debug!(expression, "cache miss, compiling");
        let program = Parser::new(registry)
            .parse(expression)
            .map_err(|source| Error::Compile {
                expression: expression.to_string(),
                source,
            })?;
        let program = Arc::new(program);
        self.cache.put(expression, Arc::clone(&program));
        Ok(program)
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// The process-wide evaluator: builtins plus a memoizing cache.
pub fn shared() -> &'static Evaluator {
    static SHARED: OnceLock<Evaluator> = OnceLock::new();
    SHARED.get_or_init(|| Evaluator::with_builtins(CachePolicy::Memoize))
}

/// Evaluate `expression` on the shared evaluator.
pub fn evaluate(expression: &str, bindings: &Bindings) -> Result<Decimal, Error> {
    shared().evaluate(expression, bindings)
}

/// Warm the shared evaluator's cache for `expression`.
pub fn precompile(expression: &str) -> Result<Arc<Program>, Error> {
    shared().precompile(expression)
}

/// Register a custom function on the shared evaluator.
pub fn register_function<F>(name: &str, call: F) -> Result<(), Error>
where
    F: Fn(&[Decimal]) -> Result<Decimal, FunctionError> + Send + Sync + 'static,
{
    shared().register_function(name, call)
}
