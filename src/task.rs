use std::{
    fmt, io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::Config;

#[derive(Debug, Default)]
struct Status {
    finished: AtomicBool,
    panicked: AtomicBool,
}

/// Published by the task thread when its body returns or unwinds.
///
/// Everything the body wrote happens-before `finished` is observed as `true`,
/// and `finished` is stored before the joiner is woken.
struct Completion {
    status: Arc<Status>,
    signal: Option<oneshot::Sender<()>>,
}

impl Drop for Completion {
    fn drop(&mut self) {
        if thread::panicking() {
            self.status.panicked.store(true, Ordering::SeqCst);
            warn!(thread = ?thread::current().name(), "promise task panicked");
        }
        self.status.finished.store(true, Ordering::Release);
        if let Some(signal) = self.signal.take() {
            let _ = signal.send(());
        }
    }
}

/// Handle to the thread running a promise's task.
///
/// The completion signal can be received once; the first [`join`](Task::join)
/// consumes it and later joins return immediately.
pub(crate) struct Task {
    signal: Mutex<Option<oneshot::Receiver<()>>>,
    status: Arc<Status>,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("running", &self.is_running())
            .field("panicked", &self.panicked())
            .finish()
    }
}

impl Task {
    /// Runs `body` on a new thread built from `config`.
    pub(crate) fn spawn<F>(config: &Config, body: F) -> io::Result<Task>
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let status = Arc::new(Status::default());
        let completion = Completion {
            status: Arc::clone(&status),
            signal: Some(tx),
        };

        config.builder().spawn(move || {
            let _completion = completion;
            body();
        })?;
        debug!(name = ?config.thread_name(), "spawned promise task");

        Ok(Task {
            signal: Mutex::new(Some(rx)),
            status,
        })
    }

    /// A task that has already finished, for promises settled at construction.
    pub(crate) fn finished() -> Task {
        Task {
            signal: Mutex::new(None),
            status: Arc::new(Status {
                finished: AtomicBool::new(true),
                panicked: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.status.finished.load(Ordering::Acquire)
    }

    pub(crate) fn panicked(&self) -> bool {
        self.status.panicked.load(Ordering::SeqCst)
    }

    /// Blocks until the task's body has returned or unwound.
    ///
    /// Concurrent joiners queue on the lock; whoever holds it receives the
    /// signal and the rest find it consumed.
    pub(crate) fn join(&self) {
        let mut signal = self.signal.lock();
        if let Some(rx) = signal.take() {
            // A dropped sender also means the thread is done.
            let _ = rx.recv();
        }
    }
}
