use std::sync::OnceLock;

use tracing::warn;

/// Callback handed to a task for resolving its promise.
///
/// Both callbacks borrow the promise for the duration of the task body, so
/// they cannot be moved onto a detached thread or stored for later. A task
/// driving a callback-style API has to block until that API reports back,
/// for example through a channel or a scoped thread, and settle from the
/// task body itself.
pub type Resolve<'a, T> = Box<dyn FnOnce(T) + Send + 'a>;

/// Callback handed to a task for rejecting its promise.
pub type Reject<'a, E> = Box<dyn FnOnce(E) + Send + 'a>;

/// Result slots of a promise. Each slot is written at most once by the task
/// thread and read lock-free afterwards.
#[derive(Debug)]
pub(crate) struct ResultCell<T, E> {
    value: OnceLock<T>,
    error: OnceLock<E>,
}

impl<T, E> ResultCell<T, E> {
    pub(crate) fn empty() -> Self {
        ResultCell {
            value: OnceLock::new(),
            error: OnceLock::new(),
        }
    }

    pub(crate) fn resolved(value: T) -> Self {
        ResultCell {
            value: OnceLock::from(value),
            error: OnceLock::new(),
        }
    }

    pub(crate) fn rejected(error: E) -> Self {
        ResultCell {
            value: OnceLock::new(),
            error: OnceLock::from(error),
        }
    }

    pub(crate) fn resolve(&self, value: T) {
        if self.value.set(value).is_err() {
            warn!("promise resolved twice, keeping the first value");
        }
    }

    pub(crate) fn reject(&self, error: E) {
        if self.error.set(error).is_err() {
            warn!("promise rejected twice, keeping the first error");
        }
    }

    pub(crate) fn value(&self) -> Option<&T> {
        self.value.get()
    }

    pub(crate) fn error(&self) -> Option<&E> {
        self.error.get()
    }
}

impl<T: Send + Sync, E: Send + Sync> ResultCell<T, E> {
    /// Builds the two callbacks a task body receives, both borrowing this cell.
    pub(crate) fn callbacks(&self) -> (Resolve<'_, T>, Reject<'_, E>) {
        let resolve: Resolve<'_, T> = Box::new(move |value| self.resolve(value));
        let reject: Reject<'_, E> = Box::new(move |error| self.reject(error));
        (resolve, reject)
    }
}

#[cfg(test)]
mod tests {
    use super::ResultCell;

    #[test]
    fn first_write_wins() {
        let cell = ResultCell::<u32, ()>::empty();
        cell.resolve(1);
        cell.resolve(2);
        assert_eq!(cell.value(), Some(&1));
        assert_eq!(cell.error(), None);
    }

    #[test]
    fn callbacks_write_through() {
        let cell = ResultCell::<u32, &str>::empty();
        let (resolve, reject) = cell.callbacks();
        reject("nope");
        drop(resolve);
        assert_eq!(cell.value(), None);
        assert_eq!(cell.error(), Some(&"nope"));
    }
}
