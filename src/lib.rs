//! # visible-async
//!
//! An argument-level observability shim for callback-style async
//! control-flow libraries.
//!
//! Given an underlying library exposing ~50 collection-iteration and
//! control-flow functions (map, filter, reduce, each, auto, queue, retry,
//! waterfall, ...), this crate intercepts each call, determines which
//! positional-argument shape the caller used, wraps every argument in a
//! logging shim that reports values flowing in and out, then invokes the
//! real implementation and returns its result unchanged.
//!
//! ## Core Concepts
//!
//! - **Signature table**: per function name, an ordered list of candidate
//!   shapes pairing [`TypeTag`] patterns with [`RoleName`] assignments
//! - **Matcher**: picks the first candidate whose element-wise type
//!   predicates all succeed against the actual arguments
//! - **Role wrappers**: one instrumenting function per role, collected in a
//!   [`RoleRegistry`] validated at construction time
//! - **Dispatch composer**: builds the per-function replacement that selects,
//!   wraps, and delegates
//! - **[`VisibleLibrary`]**: the facade — covered functions wrapped,
//!   everything else passed through, the source [`Library`] untouched
//!
//! The shim never alters control flow, results, or errors; its only side
//! effect is the injected [`LogSink`].
//!
//! ## Example
//!
//! ```rust
//! use serde_json::{json, Value};
//! use visible_async::{Arg, Library, VisibleLibrary};
//! use visible_async::sink::CapturingSink;
//!
//! # tokio_test::block_on(async {
//! // An underlying callback-style library, consumed purely by name.
//! let mut lib = Library::new();
//! lib.register("each", |mut args: Vec<Arg>| async move {
//!     let iteratee = match args.remove(1) {
//!         Arg::Func(f) => f,
//!         _ => unreachable!(),
//!     };
//!     let items = match args.remove(0) {
//!         Arg::Value(Value::Array(items)) => items,
//!         _ => unreachable!(),
//!     };
//!     for item in items {
//!         iteratee(vec![item]).await?;
//!     }
//!     Ok(Value::Null)
//! });
//!
//! let capture = CapturingSink::new();
//! let visible = VisibleLibrary::with_sink(&lib, capture.sink()).unwrap();
//!
//! visible
//!     .call(
//!         "each",
//!         vec![
//!             Arg::Value(json!(["a", "b"])),
//!             Arg::func(|_args| async { Ok(Value::Null) }),
//!         ],
//!     )
//!     .await
//!     .unwrap();
//!
//! assert_eq!(
//!     capture.messages()[0],
//!     "each: Collection of type Array provided:"
//! );
//! # });
//! ```

pub mod compose;
pub mod error;
pub mod facade;
pub mod library;
pub mod matcher;
pub mod signature;
pub mod sink;
pub mod value;
pub mod wrap;

#[cfg(test)]
pub(crate) mod fixtures;

pub use compose::compose;
pub use error::{Error, Result};
pub use facade::VisibleLibrary;
pub use library::{LibFn, Library};
pub use matcher::{select, tag_matches};
pub use signature::{signatures, RoleName, SignatureEntry, TypeTag, WRAPPED_NAMES};
pub use sink::{CapturingSink, LogEntry, LogSink};
pub use value::{task, Arg, AutoTask, ErrorFilter, RetryPolicy, TaskFn};
pub use wrap::{CallContext, RoleRegistry, RoleWrapperFn};
