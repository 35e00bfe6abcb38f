//! Compiled-program caches keyed by the exact expression text.

use std::sync::Arc;

use dex_ir::Program;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Caching behavior chosen when an [`Evaluator`](crate::Evaluator) is built.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CachePolicy {
    /// Remember every compiled program for the lifetime of the evaluator.
    Memoize,
    /// Recompile on every evaluation.
    None,
}

impl CachePolicy {
    pub(crate) fn build(self) -> Box<dyn ProgramCache> {
        match self {
            Self::Memoize => Box::new(MemoCache::default()),
            Self::None => Box::new(NoopCache),
        }
    }
}

/// Storage for compiled programs.
///
/// `get` followed by `put` is deliberately not atomic: compilation is pure,
/// so two threads racing on the same expression produce equivalent programs
/// and the last write wins.
pub trait ProgramCache: Send + Sync {
    fn get(&self, expression: &str) -> Option<Arc<Program>>;
    fn put(&self, expression: &str, program: Arc<Program>);
}

/// Unbounded memoizing cache.
///
/// Entries are never evicted; callers with unbounded expression sets should
/// pick [`CachePolicy::None`] instead.
#[derive(Debug, Default)]
pub struct MemoCache {
    programs: RwLock<FxHashMap<String, Arc<Program>>>,
}

impl ProgramCache for MemoCache {
    fn get(&self, expression: &str) -> Option<Arc<Program>> {
        self.programs.read().get(expression).cloned()
    }

    fn put(&self, expression: &str, program: Arc<Program>) {
        self.programs
            .write()
            .insert(expression.to_string(), program);
    }
}

/// Cache that stores nothing, forcing a fresh parse each time.
#[derive(Debug, Default)]
pub struct NoopCache;

impl ProgramCache for NoopCache {
    fn get(&self, _expression: &str) -> Option<Arc<Program>> {
        None
    }

    fn put(&self, _expression: &str, _program: Arc<Program>) {}
}
