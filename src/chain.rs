use std::sync::Arc;

use crate::State;

/// A type-erased set of promises, possibly of different value types.
pub type Promises = Vec<Arc<dyn Chain>>;

/// Operations shared by every promise regardless of its value and error types.
///
/// This lets promises of different types live in one [`Promises`] collection
/// and be waited on or pruned together.
pub trait Chain: Send + Sync {
    /// Current state. Never blocks on the task.
    fn state(&self) -> State;

    /// Blocks until this promise's own task has finished.
    fn wait(&self);

    /// Blocks until this promise and every promise chained on it, recursively,
    /// have finished.
    fn wait_all(&self);

    /// Snapshot of the promises chained on this one, in attach order.
    fn chain(&self) -> Promises;

    /// The pending frontier of this promise's descendants. Does not modify
    /// anything.
    fn prune(&self) -> Promises {
        crate::clean::frontier(self.chain())
    }

    /// Replaces this promise's children with [`prune`](Chain::prune)'s frontier.
    fn clean(&self);
}

/// Blocks until every promise in `promises` has finished its own task.
pub fn wait(promises: &[Arc<dyn Chain>]) {
    for promise in promises {
        promise.wait();
    }
}

/// Blocks until every promise in `promises`, and everything chained on them,
/// has finished.
pub fn wait_all(promises: &[Arc<dyn Chain>]) {
    for promise in promises {
        promise.wait_all();
    }
}
