//!
//! # Promise chains for Rust
//!
//! Thread-backed promises with JavaScript-style chaining. Every promise runs its
//! task on a dedicated thread; continuations attached with
//! [`then`](Promise::then) form a tree that can be waited on as a whole and
//! pruned as its branches complete.
//!
//! ## Features
//! - Tasks report through `resolve`/`reject` callbacks, like a JS executor
//! - Chaining with [`then`](Promise::then), [`then_or`](Promise::then_or),
//!   [`then_strict`](Promise::then_strict), [`then_unit`](Promise::then_unit) and
//!   [`finally`](Promise::finally)
//! - Bulk waiting over mixed promise types through the [`Chain`] trait
//! - Pruning of settled links with [`clean`] and [`Promise::clean`]
//! - Combinators: [`all`] over tuples and vectors, [`race`]
//!
//! ## Example
//! ```
//! use promise_chain::{promise, Shared};
//! let p: Shared<u32> = promise(|resolve, _reject| resolve(2));
//! let q = p.then(|v| v * 10).then(|v| v + 5);
//! p.wait_all();
//! assert_eq!(q.value(), Some(25));
//! ```
//!
//! ## Rejections
//! A rejection only reaches the rejection handler attached directly to the
//! rejecting promise. Waiting never fails; check [`Promise::state`] instead.
//! Task bodies must not panic. If one does, its promise ends
//! [`State::Invalid`] and [`Promise::panicked`] reports it.
//!
//! ## Logging
//! The crate emits [`tracing`] events and never installs a subscriber.

#![warn(missing_docs)]

mod all;
mod cell;
mod chain;
mod clean;
mod config;
mod error;
mod promise;
mod state;
mod task;


pub use all::{all, race, Join};
pub use cell::{Reject, Resolve};
pub use chain::{wait, wait_all, Chain, Promises};
pub use clean::clean;
pub use config::Config;
pub use error::Error;
pub use promise::{Promise, Shared, Tag};
pub use state::State;

/// Spawns `task` on a new thread and returns its promise immediately.
///
/// Shorthand for [`Promise::new`].
///
/// # Panics
/// Panics if the thread cannot be spawned.
pub fn promise<T, E, F>(task: F) -> Shared<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
    F: FnOnce(Resolve<'_, T>, Reject<'_, E>) + Send + 'static,
{
    Promise::new(task)
}

/// An already resolved promise. Shorthand for [`Promise::resolve`].
pub fn resolve<T, E>(value: T) -> Shared<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    Promise::resolve(value)
}

/// An already rejected promise. Shorthand for [`Promise::reject`].
pub fn reject<T, E>(error: E) -> Shared<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    Promise::reject(error)
}
