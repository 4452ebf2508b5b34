//! Type matching and signature selection.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::signature::{SignatureEntry, TypeTag};
use crate::value::Arg;

/// Does `arg`'s runtime category satisfy `tag`?
pub fn tag_matches(tag: TypeTag, arg: &Arg) -> bool {
    match tag {
        TypeTag::Any => true,
        TypeTag::Function => matches!(arg, Arg::Func(_)),
        TypeTag::Number => matches!(arg, Arg::Value(Value::Number(_))),
        // Ordered or keyed aggregates; strings and numbers are not collections.
        TypeTag::Collection => matches!(
            arg,
            Arg::Value(Value::Array(_))
                | Arg::Value(Value::Object(_))
                | Arg::TaskList(_)
                | Arg::TaskGraph(_)
        ),
        // Any non-primitive, non-callable value.
        TypeTag::Object => matches!(
            arg,
            Arg::Value(Value::Array(_))
                | Arg::Value(Value::Object(_))
                | Arg::TaskList(_)
                | Arg::TaskGraph(_)
                | Arg::Retry(_)
        ),
    }
}

/// Select the first signature entry whose shape matches `args`, in declaration
/// order.
///
/// Entries whose length differs from the argument count are skipped; within an
/// entry, every position must satisfy its tag. The same arguments always
/// select the same entry.
pub fn select<'a>(
    func: &str,
    entries: &'a [SignatureEntry],
    args: &[Arg],
) -> Result<&'a SignatureEntry> {
    entries
        .iter()
        .find(|entry| {
            entry.shape.len() == args.len()
                && entry
                    .shape
                    .iter()
                    .zip(args)
                    .all(|(tag, arg)| tag_matches(*tag, arg))
        })
        .ok_or_else(|| Error::NoMatchingSignature {
            func: func.to_string(),
            arity: args.len(),
        })
}
