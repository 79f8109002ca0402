use std::{collections::VecDeque, mem};

use tracing::trace;

use crate::chain::Promises;

/// Walks `seed` breadth-first and returns its pending frontier.
///
/// Pending nodes are kept as they are. Any other node is dropped and its
/// children take its place in the queue, so pending grandchildren of settled
/// links get promoted.
pub(crate) fn frontier(seed: Promises) -> Promises {
    let mut queue = VecDeque::from(seed);
    let mut pending = Promises::new();
    let mut removed = 0usize;

    while let Some(node) = queue.pop_front() {
        if node.state().is_pending() {
            pending.push(node);
        } else {
            removed += 1;
            queue.extend(node.chain());
        }
    }

    trace!(removed, kept = pending.len(), "pruned promise chain");
    pending
}

/// Removes every non-pending promise from `promises`, keeping their pending
/// descendants in their place.
///
/// # Example
/// ```
/// use promise_chain::{clean, resolve, Promises, Shared};
/// let root: Shared<u32> = resolve(1);
/// let mut set: Promises = Vec::new();
/// set.push(root.clone());
/// clean(&mut set);
/// assert!(set.is_empty());
/// ```
pub fn clean(promises: &mut Promises) {
    *promises = frontier(mem::take(promises));
}
