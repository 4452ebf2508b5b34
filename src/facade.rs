//! The library facade: the sole public entry point of the shim.
//!
//! Building a [`VisibleLibrary`] composes a fresh name-to-function map from
//! the underlying [`Library`]: names the signature table covers get their
//! dispatch-composed replacement, everything else passes through by handle.
//! The underlying library itself is never mutated.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::compose::compose;
use crate::error::{Error, Result};
use crate::library::{LibFn, Library};
use crate::signature;
use crate::sink::{self, LogSink};
use crate::value::Arg;
use crate::wrap::RoleRegistry;

/// A wrapped rendition of an underlying library, with every covered function
/// instrumented and everything else passed through.
///
/// # Example
///
/// ```rust
/// use serde_json::Value;
/// use visible_async::{Arg, Library, VisibleLibrary};
///
/// # tokio_test::block_on(async {
/// let mut lib = Library::new();
/// lib.register("forever", |_args: Vec<Arg>| async { Ok(Value::Null) });
///
/// let visible = VisibleLibrary::new(&lib).unwrap();
/// let result = visible
///     .call("forever", vec![Arg::func(|_| async { Ok(Value::Null) })])
///     .await;
/// assert!(result.is_ok());
/// # });
/// ```
pub struct VisibleLibrary {
    funcs: BTreeMap<String, LibFn>,
}

impl std::fmt::Debug for VisibleLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibleLibrary")
            .field("funcs", &self.funcs.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl VisibleLibrary {
    /// Wrap `lib` with the standard wrapper set, logging to the default
    /// console-style sink.
    pub fn new(lib: &Library) -> Result<Self> {
        Self::with_parts(lib, sink::console(), RoleRegistry::standard())
    }

    /// Wrap `lib` with the standard wrapper set and an injected sink.
    pub fn with_sink(lib: &Library, sink: LogSink) -> Result<Self> {
        Self::with_parts(lib, sink, RoleRegistry::standard())
    }

    /// Wrap `lib` with a custom wrapper registry.
    ///
    /// Fails fast with [`Error::MissingRoleWrapper`] if the signature table
    /// references a role the registry does not cover — a configuration
    /// defect, caught here rather than on the first call.
    pub fn with_parts(lib: &Library, sink: LogSink, registry: RoleRegistry) -> Result<Self> {
        for name in signature::WRAPPED_NAMES {
            let Some(entries) = signature::signatures(name) else {
                continue;
            };
            for entry in entries {
                for role in entry.roles {
                    if !registry.contains(*role) {
                        return Err(Error::MissingRoleWrapper {
                            func: (*name).to_string(),
                            role: *role,
                        });
                    }
                }
            }
        }

        let registry = Arc::new(registry);
        let mut funcs = BTreeMap::new();
        for (name, f) in lib.iter() {
            let replacement = match signature::signatures(name) {
                Some(entries) => compose(
                    Arc::clone(f),
                    name,
                    entries,
                    Arc::clone(&registry),
                    Arc::clone(&sink),
                ),
                None => Arc::clone(f),
            };
            funcs.insert(name.to_string(), replacement);
        }
        Ok(Self { funcs })
    }

    /// Invoke a function by name.
    pub async fn call(&self, name: &str, args: Vec<Arg>) -> Result<Value> {
        match self.funcs.get(name) {
            Some(f) => f(args).await,
            None => Err(Error::UnknownFunction {
                func: name.to_string(),
            }),
        }
    }

    /// Look up a function handle by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LibFn> {
        self.funcs.get(name)
    }

    /// Whether the facade exposes this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// All exposed names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.funcs.keys().map(String::as_str)
    }
}
