//! The underlying library surface: a name-to-callable registry.
//!
//! The instrumentation layer consumes the wrapped library purely as a mapping
//! from function name to [`LibFn`]; its algorithms (iteration order,
//! concurrency limiting, retry timing) stay entirely on the other side of
//! that boundary.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::error::Result;
use crate::value::Arg;

/// One underlying-library function: positional arguments in, one result out.
pub type LibFn = Arc<dyn Fn(Vec<Arg>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// A registry of underlying-library functions.
///
/// # Example
///
/// ```rust
/// use serde_json::Value;
/// use visible_async::{Arg, Library};
///
/// let mut lib = Library::new();
/// lib.register("noop", |_args: Vec<Arg>| async { Ok(Value::Null) });
/// assert!(lib.contains("noop"));
/// ```
#[derive(Clone, Default)]
pub struct Library {
    funcs: BTreeMap<String, LibFn>,
}

impl Library {
    /// An empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under `name`, adapting the closure into a [`LibFn`].
    pub fn register<F, Fut>(&mut self, name: &str, f: F)
    where
        F: Fn(Vec<Arg>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.register_fn(name, Arc::new(move |args| f(args).boxed()));
    }

    /// Register an already-boxed function under `name`.
    pub fn register_fn(&mut self, name: &str, f: LibFn) {
        self.funcs.insert(name.to_string(), f);
    }

    /// Look up a function by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LibFn> {
        self.funcs.get(name)
    }

    /// Whether a function with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// All registered names with their functions, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LibFn)> {
        self.funcs.iter().map(|(name, f)| (name.as_str(), f))
    }

    /// All registered names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.funcs.keys().map(String::as_str)
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    /// Whether the library has no functions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}
