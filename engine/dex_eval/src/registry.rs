//! The function registry.
//!
//! Name-keyed table of callables with their arity contracts. The registry
//! is not internally synchronized: the owning [`Evaluator`](crate::Evaluator)
//! serializes registration against concurrent lookups with its
//! reader/writer lock, and the parser reads arities through the
//! [`ArityLookup`] seam from the same locked registry the executor
//! dispatches through.

use crate::builtins;
use crate::errors::{FunctionError, RegistrationError};
use dex_ir::{Arity, Decimal};
use dex_parse::ArityLookup;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// A registered callable. Receives arguments in source order.
pub type FunctionImpl = Arc<dyn Fn(&[Decimal]) -> Result<Decimal, FunctionError> + Send + Sync>;

/// Callable plus its compile-time arity contract.
#[derive(Clone)]
pub struct FunctionEntry {
    pub call: FunctionImpl,
    pub arity: Arity,
}

impl fmt::Debug for FunctionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionEntry")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Name → function table.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    entries: FxHashMap<String, FunctionEntry>,
}

impl FunctionRegistry {
    /// Empty registry with no functions at all.
    pub fn empty() -> Self {
        FunctionRegistry::default()
    }

    /// Registry pre-loaded with the builtin function set.
    ///
    /// Variadic aggregates `max`, `min`, `sum`, `avg`; rounding `round`
    /// and `trunc` taking a value and an optional digit count; fixed
    /// single-argument `floor`, `ceil`, `abs`.
    pub fn with_builtins() -> Self {
        let mut registry = FunctionRegistry::default();
        registry.insert_builtin("max", Arity::Variadic, builtins::max);
        registry.insert_builtin("min", Arity::Variadic, builtins::min);
        registry.insert_builtin("sum", Arity::Variadic, builtins::sum);
        registry.insert_builtin("avg", Arity::Variadic, builtins::avg);
        registry.insert_builtin("round", Arity::Variadic, builtins::round);
        registry.insert_builtin("trunc", Arity::Variadic, builtins::trunc);
        registry.insert_builtin("floor", Arity::Fixed(1), builtins::floor);
        registry.insert_builtin("ceil", Arity::Fixed(1), builtins::ceil);
        registry.insert_builtin("abs", Arity::Fixed(1), builtins::abs);
        registry
    }

    fn insert_builtin(
        &mut self,
        name: &str,
        arity: Arity,
        call: fn(&[Decimal]) -> Result<Decimal, FunctionError>,
    ) {
        self.entries.insert(
            name.to_string(),
            FunctionEntry {
                call: Arc::new(call),
                arity,
            },
        );
    }

    /// Register a callable under a new name with a variadic contract.
    ///
    /// Names are taken exactly once; re-registering fails and leaves the
    /// existing entry untouched.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        call: FunctionImpl,
    ) -> Result<(), RegistrationError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(RegistrationError::AlreadyRegistered { name });
        }
        self.entries.insert(
            name,
            FunctionEntry {
                call,
                arity: Arity::Variadic,
            },
        );
        Ok(())
    }

    /// Look up a function by exact name.
    pub fn lookup(&self, name: &str) -> Option<&FunctionEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ArityLookup for FunctionRegistry {
    fn arity_of(&self, name: &str) -> Option<Arity> {
        self.entries.get(name).map(|entry| entry.arity)
    }
}
