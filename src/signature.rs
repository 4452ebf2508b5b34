//! The declarative signature table.
//!
//! Every wrapped function name maps to an ordered list of [`SignatureEntry`]
//! candidates. Each entry pairs a `shape` (the [`TypeTag`] expected at each
//! position) with `roles` (what each position means once matched). Candidates
//! are tried first-to-last and the first full match wins, so more specific
//! entries precede more permissive ones of the same length.
//!
//! The table is `const` data: built once, read-only, threaded explicitly into
//! the composer and facade rather than reached through ambient globals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The runtime category a signature position expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    /// An ordered or keyed aggregate: array, object, task list, or task graph.
    /// Strings and numbers are not collections.
    Collection,
    /// A callable.
    Function,
    /// A numeric value.
    Number,
    /// Any non-primitive, non-callable value.
    Object,
    /// Matches everything.
    Any,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Collection => "collection",
            TypeTag::Function => "function",
            TypeTag::Number => "number",
            TypeTag::Object => "object",
            TypeTag::Any => "any",
        };
        f.write_str(name)
    }
}

/// The semantic purpose of an argument at a matched position.
///
/// Each role maps to exactly one wrapper implementation in
/// [`RoleRegistry`](crate::wrap::RoleRegistry).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RoleName {
    /// The collection being iterated; logged and passed through.
    Collection,
    /// A concurrency limit; logged and passed through.
    Limit,
    /// A reduce-style accumulator seed; logged and passed through.
    Memo,
    /// The iteration count of a `times` call; logged and passed through.
    TimesCount,
    /// A retry count or structured retry options record.
    RetryOptions,
    /// The generic per-element function.
    Iteratee,
    /// An iteratee given no leading arguments (loop bodies, `forever`).
    IterateeOnlyCallback,
    /// An iteratee whose result is a pass/fail decision.
    IterateeReturnsTruth,
    /// An iteratee that produces a transformed value.
    IterateeTransformsValue,
    /// An iteratee run purely for side effects.
    IterateeNoReturn,
    /// A queue or cargo worker function.
    Worker,
    /// An ordered list of task functions.
    Tasks,
    /// A named task graph with dependency lists.
    AutoTasks,
    /// The final completion callback.
    Callback,
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoleName::Collection => "collection",
            RoleName::Limit => "limit",
            RoleName::Memo => "memo",
            RoleName::TimesCount => "timesCount",
            RoleName::RetryOptions => "retryOptions",
            RoleName::Iteratee => "iteratee",
            RoleName::IterateeOnlyCallback => "iterateeOnlyCallback",
            RoleName::IterateeReturnsTruth => "iterateeReturnsTruth",
            RoleName::IterateeTransformsValue => "iterateeTransformsValue",
            RoleName::IterateeNoReturn => "iterateeNoReturn",
            RoleName::Worker => "worker",
            RoleName::Tasks => "tasks",
            RoleName::AutoTasks => "autoTasks",
            RoleName::Callback => "callback",
        };
        f.write_str(name)
    }
}

/// One accepted call shape: type tags to match, roles to assign.
///
/// Invariant: `shape.len() == roles.len()` — each position in a call
/// corresponds to exactly one role.
#[derive(Debug, Clone, Copy)]
pub struct SignatureEntry {
    /// The expected runtime category at each position.
    pub shape: &'static [TypeTag],
    /// The role assigned to each position once the shape matches.
    pub roles: &'static [RoleName],
}

use RoleName as R;
use TypeTag as T;

// Common argument configurations, broken down by function signature.

const ITERATE: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Collection, T::Function, T::Function],
        roles: &[R::Collection, R::Iteratee, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Function],
        roles: &[R::Collection, R::Iteratee],
    },
];

const ITERATE_LIMITED: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Collection, T::Number, T::Function, T::Function],
        roles: &[R::Collection, R::Limit, R::Iteratee, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Number, T::Function],
        roles: &[R::Collection, R::Limit, R::Iteratee],
    },
];

const TRUTHY: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Collection, T::Function, T::Function],
        roles: &[R::Collection, R::IterateeReturnsTruth, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Function],
        roles: &[R::Collection, R::IterateeReturnsTruth],
    },
];

const TRUTHY_LIMITED: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Collection, T::Number, T::Function, T::Function],
        roles: &[R::Collection, R::Limit, R::IterateeReturnsTruth, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Number, T::Function],
        roles: &[R::Collection, R::Limit, R::IterateeReturnsTruth],
    },
];

const NO_RETURN: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Collection, T::Function, T::Function],
        roles: &[R::Collection, R::IterateeNoReturn, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Function],
        roles: &[R::Collection, R::IterateeNoReturn],
    },
];

const NO_RETURN_LIMITED: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Collection, T::Number, T::Function, T::Function],
        roles: &[R::Collection, R::Limit, R::IterateeNoReturn, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Number, T::Function],
        roles: &[R::Collection, R::Limit, R::IterateeNoReturn],
    },
];

const MUTATES: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Collection, T::Function, T::Function],
        roles: &[R::Collection, R::IterateeTransformsValue, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Function],
        roles: &[R::Collection, R::IterateeTransformsValue],
    },
];

const MUTATES_LIMITED: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Collection, T::Any, T::Function, T::Function],
        roles: &[R::Collection, R::Limit, R::IterateeTransformsValue, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Any, T::Function],
        roles: &[R::Collection, R::Limit, R::IterateeTransformsValue],
    },
];

// The concrete [collection, function, function] triple comes before the
// [collection, any, function] memo form: a transform call without an
// accumulator must not have its iteratee misread as the memo.
const TRANSFORMS: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Collection, T::Any, T::Function, T::Function],
        roles: &[R::Collection, R::Memo, R::IterateeTransformsValue, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Function, T::Function],
        roles: &[R::Collection, R::IterateeTransformsValue, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Any, T::Function],
        roles: &[R::Collection, R::Memo, R::IterateeTransformsValue],
    },
    SignatureEntry {
        shape: &[T::Collection, T::Function],
        roles: &[R::Collection, R::IterateeTransformsValue],
    },
];

const TASK_LIST: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Object, T::Number, T::Function],
        roles: &[R::Tasks, R::Limit, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Object, T::Function],
        roles: &[R::Tasks, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Object],
        roles: &[R::Tasks],
    },
];

const AUTO_TASKS: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Any, T::Number, T::Function],
        roles: &[R::AutoTasks, R::Limit, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Any, T::Function],
        roles: &[R::AutoTasks, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Any, T::Number],
        roles: &[R::AutoTasks, R::Limit],
    },
    SignatureEntry {
        shape: &[T::Any],
        roles: &[R::AutoTasks],
    },
];

const WORKER: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Function, T::Number],
        roles: &[R::Worker, R::Limit],
    },
    SignatureEntry {
        shape: &[T::Function],
        roles: &[R::Worker],
    },
];

const DO_LOOP: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Function, T::Function, T::Function],
        roles: &[R::IterateeOnlyCallback, R::IterateeReturnsTruth, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Function, T::Function],
        roles: &[R::IterateeOnlyCallback, R::IterateeReturnsTruth],
    },
];

const LOOP: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Function, T::Function, T::Function],
        roles: &[R::IterateeReturnsTruth, R::IterateeOnlyCallback, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Function, T::Function],
        roles: &[R::IterateeReturnsTruth, R::IterateeOnlyCallback],
    },
];

const FOREVER: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Function, T::Function],
        roles: &[R::IterateeOnlyCallback, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Function],
        roles: &[R::IterateeOnlyCallback],
    },
];

// The bare-function entries come before the equal-length `Any` entries:
// `retry(task, cb)` must select the iteratee form, not have its task
// misread as retry options.
const RETRY: &[SignatureEntry] = &[
    SignatureEntry {
        shape: &[T::Any, T::Function, T::Function],
        roles: &[R::RetryOptions, R::Iteratee, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Function, T::Function],
        roles: &[R::Iteratee, R::Callback],
    },
    SignatureEntry {
        shape: &[T::Any, T::Function],
        roles: &[R::RetryOptions, R::Iteratee],
    },
    SignatureEntry {
        shape: &[T::Function],
        roles: &[R::Iteratee],
    },
];

const TIMES: &[SignatureEntry] = &[SignatureEntry {
    shape: &[T::Number, T::Function, T::Function],
    roles: &[R::TimesCount, R::Iteratee, R::Callback],
}];

/// Every function name the signature table covers.
pub const WRAPPED_NAMES: &[&str] = &[
    // Collections functions.
    "concat",
    "concatSeries",
    "detect",
    "detectLimit",
    "detectSeries",
    "each",
    "eachLimit",
    "eachSeries",
    "eachOf",
    "eachOfLimit",
    "eachOfSeries",
    "every",
    "everyLimit",
    "everySeries",
    "filter",
    "filterLimit",
    "filterSeries",
    "groupBy",
    "groupByLimit",
    "groupBySeries",
    "map",
    "mapLimit",
    "mapSeries",
    "mapValues",
    "mapValuesLimit",
    "mapValuesSeries",
    "reduce",
    "reduceRight",
    "reject",
    "rejectLimit",
    "rejectSeries",
    "some",
    "someLimit",
    "someSeries",
    "sortBy",
    "transform",
    // Control flow functions.
    "auto",
    "autoInject",
    "cargo",
    "doDuring",
    "doUntil",
    "doWhilst",
    "during",
    "forever",
    "parallel",
    "parallelLimit",
    "priorityQueue",
    "queue",
    "race",
    "retry",
    "retryable",
    "series",
    "times",
    "timesLimit",
    "timesSeries",
    "until",
    "waterfall",
    "whilst",
];

/// Look up the ordered signature candidates for a function name.
///
/// Returns `None` for names the table does not cover; the facade passes those
/// through unwrapped.
pub fn signatures(name: &str) -> Option<&'static [SignatureEntry]> {
    let entries = match name {
        "concat" | "concatSeries" => ITERATE,
        "detect" | "detectSeries" => TRUTHY,
        "detectLimit" => TRUTHY_LIMITED,
        "each" | "eachSeries" | "eachOf" | "eachOfSeries" => NO_RETURN,
        "eachLimit" | "eachOfLimit" => NO_RETURN_LIMITED,
        "every" | "everySeries" => TRUTHY,
        "everyLimit" => TRUTHY_LIMITED,
        "filter" | "filterSeries" => ITERATE,
        "filterLimit" => ITERATE_LIMITED,
        "groupBy" | "groupBySeries" => ITERATE,
        "groupByLimit" => ITERATE_LIMITED,
        "map" | "mapSeries" | "mapValues" | "mapValuesSeries" => MUTATES,
        "mapLimit" | "mapValuesLimit" => MUTATES_LIMITED,
        "reduce" | "reduceRight" | "transform" => TRANSFORMS,
        "reject" | "rejectSeries" => ITERATE,
        "rejectLimit" => ITERATE_LIMITED,
        "some" | "someSeries" => ITERATE,
        "someLimit" => ITERATE_LIMITED,
        "sortBy" => ITERATE,
        "auto" | "autoInject" => AUTO_TASKS,
        "cargo" | "priorityQueue" | "queue" => WORKER,
        "doDuring" | "doUntil" | "doWhilst" => DO_LOOP,
        "during" | "until" | "whilst" => LOOP,
        "forever" => FOREVER,
        "parallel" | "parallelLimit" | "race" | "series" | "waterfall" => TASK_LIST,
        "retry" | "retryable" => RETRY,
        "times" | "timesLimit" | "timesSeries" => TIMES,
        _ => return None,
    };
    Some(entries)
}
