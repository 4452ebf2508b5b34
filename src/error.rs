//! Error types for the instrumentation layer.

use thiserror::Error;

use crate::signature::RoleName;

/// The main error type for wrapped-library operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A call's argument count/types matched no declared signature shape.
    ///
    /// Raised before the underlying function is invoked. Indicates either a
    /// gap in the signature table or genuine caller misuse.
    #[error("no declared signature of '{func}' matches a call with {arity} argument(s)")]
    NoMatchingSignature {
        /// The wrapped function name.
        func: String,
        /// The number of arguments the caller supplied.
        arity: usize,
    },

    /// A signature entry names a role with no registered wrapper.
    ///
    /// This is a configuration defect and is raised when the facade is built,
    /// never deferred to the first call.
    #[error("signature table for '{func}' names role '{role}' with no registered wrapper")]
    MissingRoleWrapper {
        /// The wrapped function name whose table references the role.
        func: String,
        /// The unregistered role.
        role: RoleName,
    },

    /// A call was made through the facade for a name the library never exported.
    #[error("'{func}' is not a wrapped or passthrough function")]
    UnknownFunction {
        /// The requested function name.
        func: String,
    },

    /// The error channel of a task or iteratee, carrying the value the task
    /// reported (the error-first callback argument of the original surface).
    #[error("task failed: {0}")]
    Task(serde_json::Value),

    /// An internal wrap-time inconsistency, such as a role applied to an
    /// argument kind the matcher should have excluded.
    #[error("execution error: {0}")]
    Execution(String),

    /// A JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A generic error with a message.
    #[error("{0}")]
    Message(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Message(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Message(msg.to_string())
    }
}

/// A specialized `Result` type for wrapped-library operations.
pub type Result<T> = std::result::Result<T, Error>;
