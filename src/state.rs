use std::fmt;

/// Observable state of a promise.
///
/// Computed on demand from the promise's result slots and its task handle.
/// Once a promise leaves [`Pending`](State::Pending) it never returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// The task is still running and has not settled the promise.
    Pending,
    /// A value was set.
    Resolved,
    /// An error was set.
    Rejected,
    /// The task is gone and neither a value nor an error was set.
    Invalid,
}

impl State {
    /// Returns `true` for [`Pending`](State::Pending).
    pub fn is_pending(self) -> bool {
        self == State::Pending
    }

    /// Returns `true` for [`Resolved`](State::Resolved) or [`Rejected`](State::Rejected).
    pub fn is_settled(self) -> bool {
        matches!(self, State::Resolved | State::Rejected)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Pending => "pending",
            State::Resolved => "resolved",
            State::Rejected => "rejected",
            State::Invalid => "invalid",
        })
    }
}
