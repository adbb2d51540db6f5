//! Built-in function library and dispatch.
//!
//! Built-ins are registered with the inventory-backed registry and live in
//! dedicated modules to keep the families separate. Arguments reach an
//! implementation unevaluated, so conditionals only evaluate the branch
//! they select; most implementations start by evaluating everything
//! through [`eval_args`] or [`flattened_args`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::coercion::deep_flatten;
use crate::parser::Expr;
use crate::value::{ErrorKind, Value};

mod builtins_information;
mod builtins_logical;
mod builtins_lookup;
mod builtins_math;
mod builtins_text;
pub(crate) mod criteria;

pub(crate) use builtins_math::power;

/// Evaluation services an implementation needs from the evaluator.
pub trait FunctionContext {
    /// Evaluate an argument expression in the caller's environment.
    fn eval_arg(&self, expr: &Expr) -> Result<Value, ErrorKind>;
}

pub type BuiltinImpl = fn(&dyn FunctionContext, &[Expr]) -> Result<Value, ErrorKind>;

/// Registered built-in. `max_args` of [`VAR_ARGS`] marks a variadic entry.
#[derive(Clone, Copy)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub implementation: BuiltinImpl,
}

inventory::collect!(FunctionSpec);

pub(crate) const VAR_ARGS: usize = 255;

fn registry() -> &'static HashMap<&'static str, &'static FunctionSpec> {
    static REGISTRY: OnceLock<HashMap<&'static str, &'static FunctionSpec>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::new();
        for spec in inventory::iter::<FunctionSpec> {
            map.insert(spec.name, spec);
        }
        map
    })
}

/// Look up a built-in by name (case-insensitive).
pub fn lookup_function(name: &str) -> Option<&'static FunctionSpec> {
    let upper = name.to_ascii_uppercase();
    registry().get(upper.as_str()).copied()
}

/// Host-injected function: receives its arguments already evaluated.
pub type CustomFn = Arc<dyn Fn(&[Value]) -> Result<Value, ErrorKind> + Send + Sync>;

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque bundle of host-provided functions.
///
/// Names are matched case-insensitively and shadow built-ins of the same
/// name. The case-folded dispatch table for a registry is built once and
/// interned in the process-wide cache (see [`crate::cache::stats`]).
#[derive(Clone)]
pub struct FunctionRegistry {
    id: u64,
    entries: Vec<(String, CustomFn)>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            entries: Vec::new(),
        }
    }

    /// Register a function under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> Result<Value, ErrorKind> + Send + Sync + 'static,
    {
        self.entries.push((name.into(), Arc::new(f)));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn entries(&self) -> &[(String, CustomFn)] {
        &self.entries
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("id", &self.id)
            .field("functions", &self.entries.len())
            .finish()
    }
}

/// Dispatch a call: custom registry first, then the built-in table.
/// Unknown name is `#NAME?`; an argument count outside the spec's arity
/// is `#VALUE!`.
pub fn call_function(
    ctx: &dyn FunctionContext,
    registry: Option<&FunctionRegistry>,
    name: &str,
    args: &[Expr],
) -> Result<Value, ErrorKind> {
    if let Some(reg) = registry {
        let table = crate::cache::dispatch_for(reg);
        if let Some(custom) = table.get(&name.to_ascii_uppercase()) {
            let values = eval_args(ctx, args)?;
            return custom(&values);
        }
    }

    let spec = lookup_function(name).ok_or(ErrorKind::Name)?;
    if args.len() < spec.min_args || args.len() > spec.max_args {
        return Err(ErrorKind::Value);
    }
    (spec.implementation)(ctx, args)
}

/// Evaluate every argument, propagating the first error unchanged.
pub(crate) fn eval_args(
    ctx: &dyn FunctionContext,
    args: &[Expr],
) -> Result<Vec<Value>, ErrorKind> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(ctx.eval_arg(arg)?);
    }
    Ok(values)
}

/// Evaluate every argument and deep-flatten the results, the entry point
/// for the variadic aggregates.
pub(crate) fn flattened_args(
    ctx: &dyn FunctionContext,
    args: &[Expr],
) -> Result<Vec<Value>, ErrorKind> {
    let values = eval_args(ctx, args)?;
    Ok(deep_flatten(&values))
}
