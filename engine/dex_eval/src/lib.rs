//! Evaluation layer of the dex expression engine.
//!
//! Owns everything downstream of parsing: the function registry and its
//! builtins, the stack-based RPN executor, the compiled-program cache, and
//! the [`Evaluator`] orchestrator that ties them together under a
//! multi-reader/single-writer discipline.
//!
//! # Quick start
//!
//! ```
//! use dex_eval::{Bindings, Decimal, Evaluator, CachePolicy};
//!
//! let evaluator = Evaluator::with_builtins(CachePolicy::Memoize);
//! let mut bindings = Bindings::default();
//! bindings.insert("rate".to_string(), Decimal::new(25, 2)); // 0.25
//!
//! let total = evaluator.evaluate("100 * (1 + rate)", &bindings)?;
//! assert_eq!(total.normalize().to_string(), "125");
//! # Ok::<(), dex_eval::Error>(())
//! ```

mod builtins;
mod cache;
mod errors;
mod evaluator;
mod registry;
pub mod rpn;

pub use cache::{CachePolicy, MemoCache, NoopCache, ProgramCache};
pub use errors::{Error, EvalError, FunctionError, RegistrationError};
pub use evaluator::{evaluate, precompile, register_function, shared, Bindings, Evaluator};
pub use registry::{FunctionEntry, FunctionImpl, FunctionRegistry};

pub use dex_ir::{Decimal, Program};
