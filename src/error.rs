use std::io;

use thiserror::Error;

/// Failures of the promise machinery itself.
///
/// These never carry a promise's own rejection value; rejections are read
/// through [`Promise::error`](crate::Promise::error).
#[derive(Debug, Error)]
pub enum Error {
    /// The operating system refused to spawn a thread for the task.
    #[error("failed to spawn promise thread: {0}")]
    Spawn(#[from] io::Error),

    /// The task body panicked before finishing.
    #[error("promise task panicked")]
    Panicked,
}
