use std::thread;

/// Thread settings for promise tasks.
///
/// Promises created through [`then`](crate::Promise::then) and friends inherit
/// the config of the promise they are chained on.
///
/// # Example
/// ```
/// use promise_chain::{Config, Promise, Shared};
/// let config = Config::default().name("loader").stack_size(256 * 1024);
/// let p: Shared<String> = Promise::with_config(config, |resolve, _| {
///     resolve(std::thread::current().name().unwrap_or_default().to_string())
/// })
/// .unwrap();
/// p.wait();
/// assert_eq!(p.value().as_deref(), Some("loader"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    name: Option<String>,
    stack_size: Option<usize>,
}

impl Config {
    /// Names every thread spawned with this config.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the stack size, in bytes, of every thread spawned with this config.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// The configured thread name, if any.
    pub fn thread_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn builder(&self) -> thread::Builder {
        let mut builder = thread::Builder::new();
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder
    }
}
