//! The dynamic call surface: values, callables, and argument classification.
//!
//! The wrapped library is callback-style and dynamically typed. This module
//! pins that surface down: [`Value`](serde_json::Value) is the data plane,
//! [`TaskFn`] is the single callable contract, and [`Arg`] classifies one
//! positional argument of a call so the matcher can test it against a
//! signature shape.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::error::{Error, Result};

/// A caller-supplied async function: leading arguments in, one result out.
///
/// This is the Rust rendering of a Node-style "leading arguments plus trailing
/// completion callback" function — resolving `Ok(v)` corresponds to
/// `cb(null, v)`, resolving `Err(e)` to `cb(e)`.
pub type TaskFn = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// A retry error-filter predicate: decides whether a failed attempt should be
/// retried.
pub type ErrorFilter = Arc<dyn Fn(&Error) -> bool + Send + Sync>;

/// Adapt a closure returning a future into a [`TaskFn`].
///
/// # Example
///
/// ```rust
/// use serde_json::{json, Value};
/// use visible_async::task;
///
/// let double = task(|args: Vec<Value>| async move {
///     let n = args[0].as_i64().unwrap_or(0);
///     Ok::<Value, visible_async::Error>(json!(n * 2))
/// });
/// # let _ = double;
/// ```
pub fn task<F, Fut>(f: F) -> TaskFn
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move |args| f(args).boxed())
}

/// One entry of a named task graph: a task function plus the names of the
/// tasks whose results it depends on.
///
/// This renders the `auto` surface where a task is either a bare function or
/// an array whose final element is the function and whose preceding elements
/// are dependency names. A bare function is an `AutoTask` with empty `deps`.
#[derive(Clone)]
pub struct AutoTask {
    /// Names of tasks that must complete before this one runs.
    pub deps: Vec<String>,
    /// The task function itself.
    pub task: TaskFn,
}

impl AutoTask {
    /// A task with no dependencies.
    pub fn new(task: TaskFn) -> Self {
        Self { deps: Vec::new(), task }
    }

    /// A task that runs after the named dependencies.
    pub fn with_deps(deps: Vec<String>, task: TaskFn) -> Self {
        Self { deps, task }
    }
}

impl fmt::Debug for AutoTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoTask")
            .field("deps", &self.deps)
            .field("task", &"<fn>")
            .finish()
    }
}

/// Structured retry options: attempt budget, inter-attempt delay, and an
/// optional error-filter predicate.
///
/// The dynamic surface passes these as `{times, interval, errorFilter}`; the
/// predicate cannot live inside a JSON value, hence the dedicated type.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts.
    pub times: u64,
    /// Delay between attempts, in milliseconds.
    pub interval_ms: u64,
    /// Optional predicate deciding whether a failed attempt is retried.
    pub error_filter: Option<ErrorFilter>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // The defaults the wrapped surface documents: 5 tries, no delay.
        Self {
            times: 5,
            interval_ms: 0,
            error_filter: None,
        }
    }
}

impl RetryPolicy {
    /// A policy with the given attempt budget and no delay or filter.
    pub fn new(times: u64) -> Self {
        Self {
            times,
            ..Self::default()
        }
    }

    /// Set the delay between attempts.
    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Set the error-filter predicate.
    pub fn with_error_filter(mut self, filter: ErrorFilter) -> Self {
        self.error_filter = Some(filter);
        self
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("times", &self.times)
            .field("interval_ms", &self.interval_ms)
            .field("error_filter", &self.error_filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// One positional argument of a wrapped call.
///
/// The matcher tests these against [`TypeTag`](crate::signature::TypeTag)
/// patterns; role wrappers consume and reproduce them.
#[derive(Clone)]
pub enum Arg {
    /// A data value: collection, limit, memo, retry count, anything JSON-shaped.
    Value(Value),
    /// A callable: iteratee, worker, test predicate, or final callback.
    Func(TaskFn),
    /// An ordered list of task functions (`series`, `parallel`, `waterfall`, ...).
    TaskList(Vec<TaskFn>),
    /// A named task graph with dependency lists (`auto`, `autoInject`).
    TaskGraph(BTreeMap<String, AutoTask>),
    /// Structured retry options.
    Retry(RetryPolicy),
}

impl Arg {
    /// Adapt a closure directly into a `Func` argument.
    pub fn func<F, Fut>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Arg::Func(task(f))
    }

    /// A coarse, human-readable name for this argument's runtime kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Value(Value::Null) => "Null",
            Arg::Value(Value::Bool(_)) => "Bool",
            Arg::Value(Value::Number(_)) => "Number",
            Arg::Value(Value::String(_)) => "String",
            Arg::Value(Value::Array(_)) => "Array",
            Arg::Value(Value::Object(_)) => "Object",
            Arg::Func(_) => "Function",
            Arg::TaskList(_) => "TaskList",
            Arg::TaskGraph(_) => "TaskGraph",
            Arg::Retry(_) => "RetryOptions",
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Arg::Func(_) => f.write_str("Func(<fn>)"),
            Arg::TaskList(list) => write!(f, "TaskList({} tasks)", list.len()),
            Arg::TaskGraph(graph) => f
                .debug_map()
                .entries(graph.iter().map(|(k, v)| (k, &v.deps)))
                .finish(),
            Arg::Retry(policy) => policy.fmt(f),
        }
    }
}
