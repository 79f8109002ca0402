use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    cell::{Reject, Resolve, ResultCell},
    chain::{Chain, Promises},
    clean::frontier,
    task::Task,
    Config, Error, State,
};

/// Default error type of a promise: a small tag.
pub type Tag = u8;

/// Shared handle to a promise. This is what constructors and chaining return.
pub type Shared<T, E = Tag> = Arc<Promise<T, E>>;

/// The eventual result of a task running on its own thread.
///
/// A promise is created from a task that receives two callbacks, [`Resolve`]
/// and [`Reject`]. The task starts immediately on a dedicated thread and the
/// promise is returned before it finishes.
///
/// Continuations attached with [`then`](Self::then) and its variants run on
/// their own threads too, and are recorded as this promise's children, so the
/// whole chain can later be waited on with [`wait_all`](Self::wait_all) or
/// trimmed with [`clean`](Self::clean).
///
/// # Rejections
/// Waiting never fails on a rejected promise. Read [`state`](Self::state) or
/// [`error`](Self::error) to find out. A rejection nobody handles is dropped
/// silently.
///
/// # Panics in tasks
/// Task bodies are expected to report failure through [`Reject`], not by
/// panicking. A panicking task leaves its promise [`State::Invalid`], and
/// [`panicked`](Self::panicked) reports it.
pub struct Promise<T, E = Tag> {
    cell: Arc<ResultCell<T, E>>,
    task: Task,
    children: Mutex<Promises>,
    config: Arc<Config>,
}

impl<T, E> Promise<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Spawns `task` on a new thread and returns its promise immediately.
    ///
    /// # Panics
    /// Panics if the operating system fails to create a thread, like
    /// [`std::thread::spawn`]. Use [`try_new`](Self::try_new) to handle that.
    ///
    /// # Example
    /// ```
    /// use promise_chain::Promise;
    /// let p = Promise::<u32>::new(|resolve, _reject| resolve(42));
    /// p.wait();
    /// assert_eq!(p.value(), Some(42));
    /// ```
    pub fn new<F>(task: F) -> Shared<T, E>
    where
        F: FnOnce(Resolve<'_, T>, Reject<'_, E>) + Send + 'static,
    {
        Self::try_new(task).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Like [`new`](Self::new), but reports a failed thread spawn.
    pub fn try_new<F>(task: F) -> Result<Shared<T, E>, Error>
    where
        F: FnOnce(Resolve<'_, T>, Reject<'_, E>) + Send + 'static,
    {
        Self::spawn(Arc::default(), task)
    }

    /// Like [`try_new`](Self::try_new), with explicit thread settings.
    ///
    /// Promises chained on the result inherit `config`.
    pub fn with_config<F>(config: Config, task: F) -> Result<Shared<T, E>, Error>
    where
        F: FnOnce(Resolve<'_, T>, Reject<'_, E>) + Send + 'static,
    {
        Self::spawn(Arc::new(config), task)
    }

    fn spawn<F>(config: Arc<Config>, task: F) -> Result<Shared<T, E>, Error>
    where
        F: FnOnce(Resolve<'_, T>, Reject<'_, E>) + Send + 'static,
    {
        let cell = Arc::new(ResultCell::empty());
        let writer = Arc::clone(&cell);
        let handle = Task::spawn(&config, move || {
            let (resolve, reject) = writer.callbacks();
            task(resolve, reject);
        })?;

        Ok(Arc::new(Promise {
            cell,
            task: handle,
            children: Mutex::new(Vec::new()),
            config,
        }))
    }

    fn settled(cell: ResultCell<T, E>) -> Shared<T, E> {
        Arc::new(Promise {
            cell: Arc::new(cell),
            task: Task::finished(),
            children: Mutex::new(Vec::new()),
            config: Arc::default(),
        })
    }

    /// A promise that is already resolved with `value`. No thread is spawned.
    ///
    /// # Example
    /// ```
    /// use promise_chain::{Promise, State};
    /// let p = Promise::<_, ()>::resolve("ready");
    /// assert_eq!(p.state(), State::Resolved);
    /// assert_eq!(p.value(), Some("ready"));
    /// ```
    pub fn resolve(value: T) -> Shared<T, E> {
        Self::settled(ResultCell::resolved(value))
    }

    /// A promise that is already rejected with `error`. No thread is spawned.
    ///
    /// # Example
    /// ```
    /// use promise_chain::{Promise, State};
    /// let p = Promise::<u32, _>::reject("fail");
    /// assert_eq!(p.state(), State::Rejected);
    /// assert_eq!(p.error(), Some("fail"));
    /// ```
    pub fn reject(error: E) -> Shared<T, E> {
        Self::settled(ResultCell::rejected(error))
    }

    /// Current state of the promise. Never blocks on the task.
    pub fn state(&self) -> State {
        // Read the task flag first: once it reads finished, the slots are final.
        let running = self.task.is_running();
        if self.cell.value().is_some() {
            State::Resolved
        } else if self.cell.error().is_some() {
            State::Rejected
        } else if running {
            State::Pending
        } else {
            State::Invalid
        }
    }

    /// Borrows the resolved value, if there is one yet.
    pub fn value_ref(&self) -> Option<&T> {
        self.cell.value()
    }

    /// Borrows the rejection error, if there is one yet.
    pub fn error_ref(&self) -> Option<&E> {
        self.cell.error()
    }

    /// Clones the resolved value out, if there is one yet.
    pub fn value(&self) -> Option<T>
    where
        T: Clone,
    {
        self.cell.value().cloned()
    }

    /// Clones the rejection error out, if there is one yet.
    pub fn error(&self) -> Option<E>
    where
        E: Clone,
    {
        self.cell.error().cloned()
    }

    /// Returns `true` if the task body panicked.
    pub fn panicked(&self) -> bool {
        self.task.panicked()
    }

    /// Blocks until this promise's task has finished. Calling it again after
    /// that returns immediately. Chained promises are not waited for.
    pub fn wait(&self) {
        self.task.join();
    }

    /// Like [`wait`](Self::wait), but fails if the task body panicked.
    ///
    /// # Example
    /// ```
    /// use promise_chain::{Error, Promise};
    /// let p = Promise::<(), ()>::new(|_, _| panic!());
    /// assert!(matches!(p.try_wait(), Err(Error::Panicked)));
    /// ```
    pub fn try_wait(&self) -> Result<(), Error> {
        self.wait();
        if self.panicked() {
            Err(Error::Panicked)
        } else {
            Ok(())
        }
    }

    /// Blocks until this promise and everything chained on it have finished,
    /// visiting children in the order they were attached.
    pub fn wait_all(&self) {
        self.wait();
        for child in self.chain() {
            child.wait_all();
        }
    }

    /// Snapshot of the promises chained on this one.
    pub fn chain(&self) -> Promises {
        self.children.lock().clone()
    }

    /// Drops settled promises from this promise's chain, promoting their
    /// pending descendants to be direct children of this one.
    ///
    /// Children attached while the chain is being walked are kept.
    pub fn clean(&self) {
        let seed = self.chain();
        let walked = seed.len();
        let pending = frontier(seed);

        let mut children = self.children.lock();
        let walked = walked.min(children.len());
        let added = children.split_off(walked);
        *children = pending;
        children.extend(added);
    }

    /// Chains `on_resolved` to run on this promise's value once it resolves.
    ///
    /// Returns the child promise immediately. The child resolves with whatever
    /// `on_resolved` returns. If this promise rejects, the child is never
    /// settled and ends [`State::Invalid`]. For side effects whose child
    /// should resolve regardless, use [`then_unit`](Self::then_unit).
    ///
    /// # Panics
    /// Panics if the child's thread cannot be spawned.
    ///
    /// # Example
    /// ```
    /// use promise_chain::Promise;
    /// let p = Promise::<u32>::new(|resolve, _| resolve(2))
    ///     .then(|v| v * 10)
    ///     .then(|v| v + 5);
    /// p.wait();
    /// assert_eq!(p.value(), Some(25));
    /// ```
    pub fn then<R, F>(self: &Arc<Self>, on_resolved: F) -> Shared<R, E>
    where
        R: Send + Sync + 'static,
        F: FnOnce(&T) -> R + Send + 'static,
    {
        self.attach(move |parent, resolve, _| {
            if let Some(value) = parent.value_ref() {
                resolve(on_resolved(value));
            }
        })
    }

    /// Like [`then`](Self::then), with a handler for rejection.
    ///
    /// When this promise rejects, `on_rejected` sees the error and the child
    /// still resolves, to `R::default()`. The child is never rejected.
    ///
    /// # Example
    /// ```
    /// use promise_chain::Promise;
    /// let p = Promise::<u32, &str>::reject("fail")
    ///     .then_or(|v| v + 1, |e| eprintln!("failed: {e}"));
    /// p.wait();
    /// assert_eq!(p.value(), Some(0));
    /// ```
    pub fn then_or<R, F, G>(self: &Arc<Self>, on_resolved: F, on_rejected: G) -> Shared<R, E>
    where
        R: Default + Send + Sync + 'static,
        F: FnOnce(&T) -> R + Send + 'static,
        G: FnOnce(&E) + Send + 'static,
    {
        self.attach(move |parent, resolve, _| {
            if let Some(value) = parent.value_ref() {
                resolve(on_resolved(value));
            } else if let Some(error) = parent.error_ref() {
                on_rejected(error);
                resolve(R::default());
            }
        })
    }

    /// Like [`then`](Self::then), but a rejection of this promise rejects the
    /// child with the same error.
    ///
    /// # Example
    /// ```
    /// use promise_chain::Promise;
    /// let p = Promise::<u32, &str>::reject("fail").then_strict(|v| v + 1);
    /// p.wait();
    /// assert_eq!(p.error(), Some("fail"));
    /// ```
    pub fn then_strict<R, F>(self: &Arc<Self>, on_resolved: F) -> Shared<R, E>
    where
        R: Send + Sync + 'static,
        E: Clone,
        F: FnOnce(&T) -> R + Send + 'static,
    {
        self.attach(move |parent, resolve, reject| {
            if let Some(value) = parent.value_ref() {
                resolve(on_resolved(value));
            } else if let Some(error) = parent.error_ref() {
                reject(error.clone());
            }
        })
    }

    /// Chains a side effect that returns nothing.
    ///
    /// Unlike a unit-returning [`then`](Self::then), the child always resolves
    /// to `()` once this promise's task has finished, whether it resolved,
    /// rejected or never settled. `on_resolved` only runs on a value.
    ///
    /// # Example
    /// ```
    /// use promise_chain::{Promise, State};
    /// let done = Promise::<u32, &str>::reject("fail").then_unit(|v| println!("{v}"));
    /// done.wait();
    /// assert_eq!(done.state(), State::Resolved);
    /// ```
    pub fn then_unit<F>(self: &Arc<Self>, on_resolved: F) -> Shared<(), E>
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.then_unit_or(on_resolved, |_| {})
    }

    /// Like [`then_unit`](Self::then_unit), with a handler for rejection.
    pub fn then_unit_or<F, G>(self: &Arc<Self>, on_resolved: F, on_rejected: G) -> Shared<(), E>
    where
        F: FnOnce(&T) + Send + 'static,
        G: FnOnce(&E) + Send + 'static,
    {
        self.attach(move |parent, resolve, _| {
            if let Some(value) = parent.value_ref() {
                on_resolved(value);
            } else if let Some(error) = parent.error_ref() {
                on_rejected(error);
            }
            resolve(());
        })
    }

    /// Runs `on_resolved` once this promise resolves, for its side effects.
    ///
    /// The resulting promise is not returned but stays in this promise's
    /// chain, so [`wait_all`](Self::wait_all) still covers it. It resolves to
    /// `()` once this promise finishes, as with [`then_unit`](Self::then_unit).
    pub fn finally<F>(self: &Arc<Self>, on_resolved: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.then_unit(on_resolved);
    }

    /// Like [`finally`](Self::finally), with a handler for rejection.
    pub fn finally_or<F, G>(self: &Arc<Self>, on_resolved: F, on_rejected: G)
    where
        F: FnOnce(&T) + Send + 'static,
        G: FnOnce(&E) + Send + 'static,
    {
        self.then_unit_or(on_resolved, on_rejected);
    }

    /// Spawns a child whose task waits for this promise, then hands it to
    /// `settle`. The child is recorded in this promise's chain.
    fn attach<R, E2, F>(self: &Arc<Self>, settle: F) -> Shared<R, E2>
    where
        R: Send + Sync + 'static,
        E2: Send + Sync + 'static,
        F: FnOnce(&Promise<T, E>, Resolve<'_, R>, Reject<'_, E2>) + Send + 'static,
    {
        let parent = Arc::clone(self);
        let child = Promise::spawn(Arc::clone(&self.config), move |resolve, reject| {
            parent.wait();
            settle(&parent, resolve, reject);
        })
        .unwrap_or_else(|err| panic!("{err}"));

        let mut children = self.children.lock();
        children.push(child.clone());
        debug!(children = children.len(), "chained promise");
        child
    }
}

impl<T, E> Chain for Promise<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn state(&self) -> State {
        Promise::state(self)
    }

    fn wait(&self) {
        Promise::wait(self);
    }

    fn wait_all(&self) {
        Promise::wait_all(self);
    }

    fn chain(&self) -> Promises {
        Promise::chain(self)
    }

    fn clean(&self) {
        Promise::clean(self);
    }
}

impl<T, E> fmt::Debug for Promise<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.state())
            .field("children", &self.children.lock().len())
            .field("config", &self.config)
            .finish()
    }
}
