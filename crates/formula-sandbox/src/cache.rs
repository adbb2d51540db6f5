//! Process-wide compilation cache.
//!
//! Two tables live here: parsed scripts keyed by normalized source text,
//! and per-registry dispatch tables (case-folded name → function) keyed by
//! registry id so repeated calls with the same handle skip the fold.
//!
//! Reads take a read lock only; eviction serializes on the write lock in
//! a single critical section. Two concurrent misses on the same key may
//! both parse; the later insert simply replaces the earlier identical
//! entry.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use crate::functions::{CustomFn, FunctionRegistry};
use crate::parser::Expr;

/// Default bound on the script table.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1_000;

/// Fraction of entries dropped (FIFO) when the bound is exceeded.
const EVICTION_DIVISOR: usize = 5;

/// Occupancy snapshot returned by [`stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Parsed scripts currently cached.
    pub compiled_scripts: usize,
    /// Custom-registry dispatch tables currently cached.
    pub options_cache: usize,
}

struct Caches {
    scripts: RwLock<HashMap<String, Arc<Expr>>>,
    /// Insertion order of script keys, for FIFO eviction.
    order: Mutex<VecDeque<String>>,
    options: RwLock<HashMap<u64, Arc<HashMap<String, CustomFn>>>>,
    limit: AtomicUsize,
}

fn caches() -> &'static Caches {
    static CACHES: OnceLock<Caches> = OnceLock::new();
    CACHES.get_or_init(|| Caches {
        scripts: RwLock::new(HashMap::new()),
        order: Mutex::new(VecDeque::new()),
        options: RwLock::new(HashMap::new()),
        limit: AtomicUsize::new(DEFAULT_MAX_CACHE_SIZE),
    })
}

pub fn max_cache_size() -> usize {
    caches().limit.load(Ordering::Relaxed)
}

/// Set the script-table bound. A bound of zero disables caching.
pub fn set_max_cache_size(size: usize) {
    caches().limit.store(size, Ordering::Relaxed);
}

/// Empty both tables.
pub fn clear() {
    let c = caches();
    c.scripts.write().unwrap_or_else(|e| e.into_inner()).clear();
    c.order.lock().unwrap_or_else(|e| e.into_inner()).clear();
    c.options.write().unwrap_or_else(|e| e.into_inner()).clear();
}

pub fn stats() -> CacheStats {
    let c = caches();
    CacheStats {
        compiled_scripts: c.scripts.read().unwrap_or_else(|e| e.into_inner()).len(),
        options_cache: c.options.read().unwrap_or_else(|e| e.into_inner()).len(),
    }
}

pub(crate) fn lookup_script(source: &str) -> Option<Arc<Expr>> {
    caches()
        .scripts
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .get(source)
        .cloned()
}

pub(crate) fn store_script(source: &str, ast: Arc<Expr>) {
    let c = caches();
    let limit = c.limit.load(Ordering::Relaxed);
    if limit == 0 {
        return;
    }

    let mut scripts = c.scripts.write().unwrap_or_else(|e| e.into_inner());
    let mut order = c.order.lock().unwrap_or_else(|e| e.into_inner());

    if scripts.len() >= limit && !scripts.contains_key(source) {
        // Coarse eviction: drop ~20% of entries, oldest first.
        let drop_count = (limit / EVICTION_DIVISOR).max(1);
        for _ in 0..drop_count {
            let Some(oldest) = order.pop_front() else { break };
            scripts.remove(&oldest);
        }
    }

    if scripts.insert(source.to_string(), ast).is_none() {
        order.push_back(source.to_string());
    }
}

/// Case-folded dispatch table for a custom registry, built once per
/// registry id.
pub(crate) fn dispatch_for(registry: &FunctionRegistry) -> Arc<HashMap<String, CustomFn>> {
    let c = caches();
    if let Some(table) = c
        .options
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .get(&registry.id())
    {
        return Arc::clone(table);
    }

    let mut table = HashMap::with_capacity(registry.entries().len());
    for (name, f) in registry.entries() {
        table.insert(name.to_ascii_uppercase(), Arc::clone(f));
    }
    let table = Arc::new(table);
    c.options
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .insert(registry.id(), Arc::clone(&table));
    table
}
