//! The dispatch composer: signature selection plus argument wrapping.

use std::sync::Arc;

use futures::future;
use futures::FutureExt;

use crate::library::LibFn;
use crate::matcher;
use crate::signature::SignatureEntry;
use crate::sink::LogSink;
use crate::wrap::{CallContext, RoleRegistry};

/// Produce a replacement for `original` that, per invocation, selects the
/// matching signature entry, wraps each argument according to its role, and
/// delegates to `original` with the wrapped arguments.
///
/// Selection and wrapping happen synchronously when the replacement is
/// called; if either fails, the returned future resolves to that error and
/// `original` is never invoked. Beyond wrapping, the composer adds no
/// behavior: results and errors from `original` flow back unchanged.
pub fn compose(
    original: LibFn,
    func: &str,
    entries: &'static [SignatureEntry],
    registry: Arc<RoleRegistry>,
    sink: LogSink,
) -> LibFn {
    let ctx = CallContext::new(func, sink);
    Arc::new(move |args| {
        let entry = match matcher::select(ctx.func(), entries, &args) {
            Ok(entry) => entry,
            Err(err) => return future::ready(Err(err)).boxed(),
        };

        // Wrap left-to-right, each position by its matched role.
        let mut wrapped = Vec::with_capacity(args.len());
        for (role, arg) in entry.roles.iter().zip(args) {
            match registry.apply(*role, &ctx, arg) {
                Ok(arg) => wrapped.push(arg),
                Err(err) => return future::ready(Err(err)).boxed(),
            }
        }

        original(wrapped)
    })
}
