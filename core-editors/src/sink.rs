//! Destination for compacted editor batches.

use bridge_traits::platform::PlatformSendSync;

/// Receives the compacted batch when an editor is applied.
///
/// The sink is invoked at most once per editor and is not awaited; delivery,
/// retry and persistence belong to whoever supplied it. Closures taking a
/// `Vec` of operations implement this trait directly.
pub trait OperationSink<Op>: PlatformSendSync {
    fn submit(&self, operations: Vec<Op>);
}

impl<Op, F> OperationSink<Op> for F
where
    F: Fn(Vec<Op>) + PlatformSendSync,
{
    fn submit(&self, operations: Vec<Op>) {
        self(operations)
    }
}
