//! Role wrappers: one instrumenting function per argument role.
//!
//! A wrapper takes the matched argument plus the per-call [`CallContext`] and
//! returns a replacement argument of the same external shape. Value roles
//! (collection, limit, memo, ...) log and pass through untouched; function
//! roles return an instrumented [`TaskFn`] that logs values flowing in and
//! out while forwarding results and errors unchanged. The only side effect
//! anywhere is invoking the log sink.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::signature::RoleName;
use crate::sink::{LogEntry, LogSink};
use crate::value::{Arg, AutoTask, TaskFn};

/// Per-invocation wrapping state: the wrapped function's name and the log
/// sink handle. Cloned into instrumented closures, which may outlive the
/// initiating call until the eventual completion fires.
#[derive(Clone)]
pub struct CallContext {
    func: Arc<str>,
    sink: LogSink,
}

impl CallContext {
    /// Context for one wrapped function.
    pub fn new(func: &str, sink: LogSink) -> Self {
        Self {
            func: Arc::from(func),
            sink,
        }
    }

    /// The wrapped function's name.
    pub fn func(&self) -> &str {
        &self.func
    }

    /// Emit one log entry through the injected sink.
    pub fn emit(&self, message: String, values: Vec<Value>) {
        (self.sink)(LogEntry::new(message, values));
    }
}

/// One role wrapper implementation.
pub type RoleWrapperFn = fn(&CallContext, Arg) -> Result<Arg>;

/// The fixed role-to-wrapper mapping.
///
/// The facade validates every role the signature table references against
/// this registry at construction time, so a missing wrapper fails fast
/// instead of surfacing on the first call.
#[derive(Clone)]
pub struct RoleRegistry {
    wrappers: BTreeMap<RoleName, RoleWrapperFn>,
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl RoleRegistry {
    /// The full standard wrapper set, covering every [`RoleName`].
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.insert(RoleName::Collection, wrap_collection);
        registry.insert(RoleName::Limit, wrap_limit);
        registry.insert(RoleName::Memo, wrap_memo);
        registry.insert(RoleName::TimesCount, wrap_times_count);
        registry.insert(RoleName::RetryOptions, wrap_retry_options);
        registry.insert(RoleName::Iteratee, |ctx, arg| {
            wrap_function_role(ctx, arg, "iteratee", false)
        });
        registry.insert(RoleName::IterateeOnlyCallback, |ctx, arg| {
            wrap_function_role(ctx, arg, "iteratee(Callback Only)", false)
        });
        registry.insert(RoleName::IterateeReturnsTruth, |ctx, arg| {
            wrap_function_role(ctx, arg, "iteratee(Truth Test)", false)
        });
        registry.insert(RoleName::IterateeTransformsValue, |ctx, arg| {
            wrap_function_role(ctx, arg, "iteratee(Transform)", true)
        });
        registry.insert(RoleName::IterateeNoReturn, |ctx, arg| {
            wrap_function_role(ctx, arg, "iteratee(No Return)", false)
        });
        registry.insert(RoleName::Worker, |ctx, arg| {
            wrap_function_role(ctx, arg, "iteratee(Worker)", false)
        });
        registry.insert(RoleName::Tasks, wrap_tasks);
        registry.insert(RoleName::AutoTasks, wrap_auto_tasks);
        registry.insert(RoleName::Callback, wrap_callback);
        registry
    }

    /// An empty registry, for assembling a custom wrapper set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            wrappers: BTreeMap::new(),
        }
    }

    /// Register (or replace) the wrapper for a role.
    pub fn insert(&mut self, role: RoleName, wrapper: RoleWrapperFn) {
        self.wrappers.insert(role, wrapper);
    }

    /// Whether the role has a registered wrapper.
    #[must_use]
    pub fn contains(&self, role: RoleName) -> bool {
        self.wrappers.contains_key(&role)
    }

    /// Apply the wrapper registered for `role` to one argument.
    pub fn apply(&self, role: RoleName, ctx: &CallContext, arg: Arg) -> Result<Arg> {
        match self.wrappers.get(&role) {
            Some(wrapper) => wrapper(ctx, arg),
            None => Err(Error::MissingRoleWrapper {
                func: ctx.func().to_string(),
                role,
            }),
        }
    }
}

/// Wrap a task function so its invocations, results, and errors are logged.
///
/// The replacement has the same call contract as the original: leading
/// arguments in, one result out. Leading arguments are logged strictly before
/// the original runs; the result or error is logged strictly before the
/// caller observes it, then forwarded with identical payload.
pub(crate) fn instrument_task(
    label: impl Into<Arc<str>>,
    log_transformed: bool,
    ctx: &CallContext,
    inner: TaskFn,
) -> TaskFn {
    let label: Arc<str> = label.into();
    let ctx = ctx.clone();
    Arc::new(move |args: Vec<Value>| {
        let label = Arc::clone(&label);
        let ctx = ctx.clone();
        let inner = Arc::clone(&inner);
        async move {
            ctx.emit(
                format!("{}: {} invoked with:", ctx.func(), label),
                args.clone(),
            );
            match inner(args.clone()).await {
                Ok(returned) => {
                    let mut values = args;
                    values.push(json!("->"));
                    values.push(returned.clone());
                    ctx.emit(format!("{}: {}:", ctx.func(), label), values);
                    if log_transformed {
                        ctx.emit(
                            format!("{}: {} produced:", ctx.func(), label),
                            vec![returned.clone()],
                        );
                    }
                    Ok(returned)
                }
                Err(err) => {
                    let mut values = args;
                    values.push(json!("Error:"));
                    values.push(json!(err.to_string()));
                    ctx.emit(
                        format!(
                            "{}: {} returned an error when processing:",
                            ctx.func(),
                            label
                        ),
                        values,
                    );
                    Err(err)
                }
            }
        }
        .boxed()
    })
}

fn role_mismatch(ctx: &CallContext, role: &str, arg: &Arg) -> Error {
    Error::Execution(format!(
        "'{}': {} wrapper applied to a {} argument",
        ctx.func(),
        role,
        arg.kind()
    ))
}

fn wrap_collection(ctx: &CallContext, arg: Arg) -> Result<Arg> {
    let values = match &arg {
        Arg::Value(v) => vec![v.clone()],
        _ => Vec::new(),
    };
    ctx.emit(
        format!(
            "{}: Collection of type {} provided:",
            ctx.func(),
            arg.kind()
        ),
        values,
    );
    Ok(arg)
}

fn wrap_limit(ctx: &CallContext, arg: Arg) -> Result<Arg> {
    let values = match &arg {
        Arg::Value(v) => vec![v.clone()],
        other => vec![json!(other.kind())],
    };
    ctx.emit(format!("{}: Limit provided:", ctx.func()), values);
    Ok(arg)
}

fn wrap_memo(ctx: &CallContext, arg: Arg) -> Result<Arg> {
    let values = match &arg {
        Arg::Value(v) => vec![v.clone()],
        other => vec![json!(other.kind())],
    };
    ctx.emit(format!("{}: iteration beginning with:", ctx.func()), values);
    Ok(arg)
}

fn wrap_times_count(ctx: &CallContext, arg: Arg) -> Result<Arg> {
    match &arg {
        Arg::Value(Value::Number(n)) => {
            ctx.emit(
                format!("{}: times to execute iteratee: {}", ctx.func(), n),
                Vec::new(),
            );
            Ok(arg)
        }
        other => Err(role_mismatch(ctx, "timesCount", other)),
    }
}

fn wrap_retry_options(ctx: &CallContext, arg: Arg) -> Result<Arg> {
    match arg {
        // A bare count.
        Arg::Value(Value::Number(n)) => {
            ctx.emit(
                format!("{}: max tries for iteratee: {}", ctx.func(), n),
                Vec::new(),
            );
            Ok(Arg::Value(Value::Number(n)))
        }
        // A structured options record; the embedded error filter keeps its
        // decision semantics exactly, with each invocation logged.
        Arg::Retry(mut policy) => {
            ctx.emit(
                format!(
                    "{}: max tries for iteratee: {} with interval of {}",
                    ctx.func(),
                    policy.times,
                    policy.interval_ms
                ),
                Vec::new(),
            );
            if let Some(filter) = policy.error_filter.take() {
                let filter_ctx = ctx.clone();
                policy.error_filter = Some(Arc::new(move |err| {
                    let decision = filter(err);
                    filter_ctx.emit(
                        format!("{}: error filter invoked with:", filter_ctx.func()),
                        vec![
                            json!(err.to_string()),
                            json!("returned:"),
                            json!(decision),
                        ],
                    );
                    decision
                }));
            }
            Ok(Arg::Retry(policy))
        }
        other => Err(role_mismatch(ctx, "retryOptions", &other)),
    }
}

fn wrap_function_role(
    ctx: &CallContext,
    arg: Arg,
    label: &str,
    log_transformed: bool,
) -> Result<Arg> {
    match arg {
        Arg::Func(f) => Ok(Arg::Func(instrument_task(label, log_transformed, ctx, f))),
        other => Err(role_mismatch(ctx, label, &other)),
    }
}

fn wrap_tasks(ctx: &CallContext, arg: Arg) -> Result<Arg> {
    match arg {
        Arg::TaskList(tasks) => Ok(Arg::TaskList(
            tasks
                .into_iter()
                .map(|task| instrument_task("task", false, ctx, task))
                .collect(),
        )),
        other => Err(role_mismatch(ctx, "tasks", &other)),
    }
}

fn wrap_auto_tasks(ctx: &CallContext, arg: Arg) -> Result<Arg> {
    match arg {
        Arg::TaskGraph(graph) => {
            let wrapped = graph
                .into_iter()
                .map(|(name, entry)| {
                    let label = if entry.deps.is_empty() {
                        format!("auto:{name}")
                    } else {
                        format!("({} deps) -> auto:{}", entry.deps.len(), name)
                    };
                    let task = instrument_task(label, false, ctx, entry.task);
                    (
                        name,
                        AutoTask {
                            deps: entry.deps,
                            task,
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>();
            Ok(Arg::TaskGraph(wrapped))
        }
        other => Err(role_mismatch(ctx, "autoTasks", &other)),
    }
}

fn wrap_callback(ctx: &CallContext, arg: Arg) -> Result<Arg> {
    match arg {
        Arg::Func(callback) => {
            let ctx = ctx.clone();
            Ok(Arg::Func(Arc::new(move |cbargs: Vec<Value>| {
                let callback = Arc::clone(&callback);
                let ctx = ctx.clone();
                async move {
                    ctx.emit(
                        format!("{}: Callback called. Arguments:", ctx.func()),
                        cbargs.clone(),
                    );
                    callback(cbargs).await
                }
                .boxed()
            })))
        }
        other => Err(role_mismatch(ctx, "callback", &other)),
    }
}
