//! A miniature callback-style library for exercising the shim in tests.
//!
//! Sequential renditions of the common surface (map, filter, each, reduce,
//! times, retry, auto, waterfall, series, parallel) plus one uncovered
//! function for passthrough checks. Semantics follow the Node conventions the
//! shim expects: with a final callback supplied, outcomes are delivered
//! error-first through it; without one, the call's own future carries them.

use std::time::Duration;

use futures::future::join_all;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::library::Library;
use crate::value::{Arg, RetryPolicy, TaskFn};

pub fn demo_library() -> Library {
    let mut lib = Library::new();
    lib.register("map", map_impl);
    lib.register("filter", filter_impl);
    lib.register("each", each_impl);
    lib.register("reduce", reduce_impl);
    lib.register("times", times_impl);
    lib.register("retry", retry_impl);
    lib.register("auto", auto_impl);
    lib.register("waterfall", waterfall_impl);
    lib.register("series", series_impl);
    lib.register("parallel", parallel_impl);
    // Not covered by the signature table; exercises passthrough.
    lib.register("constant", constant_impl);
    lib
}

fn expect_value(arg: Arg) -> Result<Value> {
    match arg {
        Arg::Value(v) => Ok(v),
        other => Err(Error::Execution(format!(
            "fixture expected a value, got {}",
            other.kind()
        ))),
    }
}

fn expect_func(arg: Arg) -> Result<TaskFn> {
    match arg {
        Arg::Func(f) => Ok(f),
        other => Err(Error::Execution(format!(
            "fixture expected a function, got {}",
            other.kind()
        ))),
    }
}

fn items_of(collection: &Value) -> Vec<Value> {
    match collection {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map.values().cloned().collect(),
        _ => Vec::new(),
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn error_value(err: &Error) -> Value {
    match err {
        Error::Task(v) => v.clone(),
        other => json!(other.to_string()),
    }
}

/// Deliver an outcome: error-first through the callback if one was supplied,
/// otherwise through the call's own result.
async fn finish(callback: Option<TaskFn>, outcome: Result<Value>) -> Result<Value> {
    match callback {
        Some(cb) => match outcome {
            Ok(v) => cb(vec![Value::Null, v]).await,
            Err(e) => cb(vec![error_value(&e)]).await,
        },
        None => outcome,
    }
}

async fn map_impl(mut args: Vec<Arg>) -> Result<Value> {
    let cb = if args.len() == 3 {
        Some(expect_func(args.pop().unwrap())?)
    } else {
        None
    };
    let iteratee = expect_func(args.pop().unwrap())?;
    let collection = expect_value(args.pop().unwrap())?;

    let outcome: Result<Value> = async {
        let mut out = Vec::new();
        for item in items_of(&collection) {
            out.push(iteratee(vec![item]).await?);
        }
        Ok(Value::Array(out))
    }
    .await;
    finish(cb, outcome).await
}

async fn filter_impl(mut args: Vec<Arg>) -> Result<Value> {
    let cb = if args.len() == 3 {
        Some(expect_func(args.pop().unwrap())?)
    } else {
        None
    };
    let iteratee = expect_func(args.pop().unwrap())?;
    let collection = expect_value(args.pop().unwrap())?;

    let outcome: Result<Value> = async {
        let mut out = Vec::new();
        for item in items_of(&collection) {
            if truthy(&iteratee(vec![item.clone()]).await?) {
                out.push(item);
            }
        }
        Ok(Value::Array(out))
    }
    .await;
    finish(cb, outcome).await
}

async fn each_impl(mut args: Vec<Arg>) -> Result<Value> {
    let cb = if args.len() == 3 {
        Some(expect_func(args.pop().unwrap())?)
    } else {
        None
    };
    let iteratee = expect_func(args.pop().unwrap())?;
    let collection = expect_value(args.pop().unwrap())?;

    let outcome: Result<Value> = async {
        for item in items_of(&collection) {
            iteratee(vec![item]).await?;
        }
        Ok(Value::Null)
    }
    .await;
    finish(cb, outcome).await
}

async fn reduce_impl(mut args: Vec<Arg>) -> Result<Value> {
    // (collection, memo, iteratee, cb?) or (collection, iteratee, cb?).
    let has_memo = args.len() == 4 || (args.len() == 3 && matches!(args[1], Arg::Value(_)));
    let cb = if (has_memo && args.len() == 4) || (!has_memo && args.len() == 3) {
        Some(expect_func(args.pop().unwrap())?)
    } else {
        None
    };
    let iteratee = expect_func(args.pop().unwrap())?;
    let memo = if has_memo {
        expect_value(args.pop().unwrap())?
    } else {
        Value::Null
    };
    let collection = expect_value(args.pop().unwrap())?;

    let outcome: Result<Value> = async {
        let mut acc = memo;
        for item in items_of(&collection) {
            acc = iteratee(vec![acc, item]).await?;
        }
        Ok(acc)
    }
    .await;
    finish(cb, outcome).await
}

async fn times_impl(mut args: Vec<Arg>) -> Result<Value> {
    let cb = if args.len() == 3 {
        Some(expect_func(args.pop().unwrap())?)
    } else {
        None
    };
    let iteratee = expect_func(args.pop().unwrap())?;
    let n = expect_value(args.pop().unwrap())?
        .as_u64()
        .unwrap_or(0);

    let outcome: Result<Value> = async {
        let mut out = Vec::new();
        for i in 0..n {
            out.push(iteratee(vec![json!(i)]).await?);
        }
        Ok(Value::Array(out))
    }
    .await;
    finish(cb, outcome).await
}

async fn retry_impl(mut args: Vec<Arg>) -> Result<Value> {
    // (options, task, cb), (task, cb), (options, task), or (task).
    let (policy, task, cb) = match args.len() {
        3 => {
            let cb = expect_func(args.pop().unwrap())?;
            let task = expect_func(args.pop().unwrap())?;
            (policy_of(args.pop().unwrap()), task, Some(cb))
        }
        2 => {
            let second = args.pop().unwrap();
            let first = args.pop().unwrap();
            match first {
                Arg::Func(task) => (RetryPolicy::default(), task, Some(expect_func(second)?)),
                options => (policy_of(options), expect_func(second)?, None),
            }
        }
        1 => (
            RetryPolicy::default(),
            expect_func(args.pop().unwrap())?,
            None,
        ),
        n => {
            return Err(Error::Execution(format!(
                "fixture retry got {n} arguments"
            )))
        }
    };

    let outcome: Result<Value> = async {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match task(Vec::new()).await {
                Ok(v) => return Ok(v),
                Err(err) => {
                    let retryable = policy
                        .error_filter
                        .as_ref()
                        .map_or(true, |filter| filter(&err));
                    if attempt >= policy.times || !retryable {
                        return Err(err);
                    }
                    if policy.interval_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(policy.interval_ms)).await;
                    }
                }
            }
        }
    }
    .await;
    finish(cb, outcome).await
}

fn policy_of(arg: Arg) -> RetryPolicy {
    match arg {
        Arg::Retry(policy) => policy,
        Arg::Value(Value::Number(n)) => RetryPolicy::new(n.as_u64().unwrap_or(1)),
        _ => RetryPolicy::default(),
    }
}

async fn auto_impl(mut args: Vec<Arg>) -> Result<Value> {
    let mut cb = None;
    while args.len() > 1 {
        match args.pop().unwrap() {
            Arg::Func(f) => cb = Some(f),
            // Concurrency limit; the sequential fixture ignores it.
            Arg::Value(Value::Number(_)) => {}
            other => {
                return Err(Error::Execution(format!(
                    "fixture auto got a {} argument",
                    other.kind()
                )))
            }
        }
    }
    let graph = match args.pop() {
        Some(Arg::TaskGraph(graph)) => graph,
        other => {
            return Err(Error::Execution(format!(
                "fixture auto expected a task graph, got {:?}",
                other
            )))
        }
    };

    let outcome: Result<Value> = async {
        let mut done = Map::new();
        let mut pending: Vec<_> = graph.into_iter().collect();
        while !pending.is_empty() {
            let ready = pending
                .iter()
                .position(|(_, entry)| entry.deps.iter().all(|d| done.contains_key(d)))
                .ok_or_else(|| Error::Message("dependency cycle in auto tasks".into()))?;
            let (name, entry) = pending.remove(ready);
            let result = (entry.task)(vec![Value::Object(done.clone())]).await?;
            done.insert(name, result);
        }
        Ok(Value::Object(done))
    }
    .await;
    finish(cb, outcome).await
}

async fn waterfall_impl(mut args: Vec<Arg>) -> Result<Value> {
    let cb = if args.len() == 2 {
        Some(expect_func(args.pop().unwrap())?)
    } else {
        None
    };
    let tasks = match args.pop() {
        Some(Arg::TaskList(tasks)) => tasks,
        other => {
            return Err(Error::Execution(format!(
                "fixture waterfall expected a task list, got {:?}",
                other
            )))
        }
    };

    let outcome: Result<Value> = async {
        let mut carried = Vec::new();
        for task in &tasks {
            carried = vec![task(carried).await?];
        }
        Ok(carried.pop().unwrap_or(Value::Null))
    }
    .await;
    finish(cb, outcome).await
}

async fn series_impl(mut args: Vec<Arg>) -> Result<Value> {
    let cb = if args.len() == 2 {
        Some(expect_func(args.pop().unwrap())?)
    } else {
        None
    };
    let tasks = match args.pop() {
        Some(Arg::TaskList(tasks)) => tasks,
        other => {
            return Err(Error::Execution(format!(
                "fixture series expected a task list, got {:?}",
                other
            )))
        }
    };

    let outcome: Result<Value> = async {
        let mut out = Vec::new();
        for task in &tasks {
            out.push(task(Vec::new()).await?);
        }
        Ok(Value::Array(out))
    }
    .await;
    finish(cb, outcome).await
}

async fn parallel_impl(mut args: Vec<Arg>) -> Result<Value> {
    let cb = if args.len() == 2 {
        Some(expect_func(args.pop().unwrap())?)
    } else {
        None
    };
    let tasks = match args.pop() {
        Some(Arg::TaskList(tasks)) => tasks,
        other => {
            return Err(Error::Execution(format!(
                "fixture parallel expected a task list, got {:?}",
                other
            )))
        }
    };

    let outcome: Result<Value> = join_all(tasks.iter().map(|task| task(Vec::new())))
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()
        .map(Value::Array);
    finish(cb, outcome).await
}

async fn constant_impl(mut args: Vec<Arg>) -> Result<Value> {
    match args.pop() {
        Some(Arg::Value(v)) => Ok(v),
        _ => Ok(Value::Null),
    }
}
