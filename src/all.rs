use std::{sync::mpsc, thread};

use tracing::debug;

use crate::{Promise, Shared, Tag};

/// A set of promises that [`all`] can join into one.
///
/// Implemented for `Vec<Shared<T, E>>` and for tuples of up to eight shared
/// promises of any value and error types.
pub trait Join: Send + 'static {
    /// What the joined promise resolves to.
    type Output: Send + Sync + 'static;

    /// Error type of the joined promise. It is never rejected.
    type Error: Send + Sync + 'static;

    /// Waits for every member in order and collects their values, using
    /// `Default::default()` for any member that did not resolve.
    fn join(self) -> Self::Output;
}

impl<T, E> Join for Vec<Shared<T, E>>
where
    T: Clone + Default + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    type Output = Vec<T>;
    type Error = E;

    fn join(self) -> Vec<T> {
        self.iter()
            .map(|member| {
                member.wait();
                member.value().unwrap_or_default()
            })
            .collect()
    }
}

macro_rules! join_tuple {
    ($(($T:ident, $E:ident, $idx:tt)),+) => {
        impl<$($T, $E),+> Join for ($(Shared<$T, $E>,)+)
        where
            $(
                $T: Clone + Default + Send + Sync + 'static,
                $E: Send + Sync + 'static,
            )+
        {
            type Output = ($($T,)+);
            type Error = Tag;

            fn join(self) -> Self::Output {
                $(self.$idx.wait();)+
                ($(self.$idx.value().unwrap_or_default(),)+)
            }
        }
    };
}

join_tuple!((T0, E0, 0));
join_tuple!((T0, E0, 0), (T1, E1, 1));
join_tuple!((T0, E0, 0), (T1, E1, 1), (T2, E2, 2));
join_tuple!((T0, E0, 0), (T1, E1, 1), (T2, E2, 2), (T3, E3, 3));
join_tuple!((T0, E0, 0), (T1, E1, 1), (T2, E2, 2), (T3, E3, 3), (T4, E4, 4));
join_tuple!(
    (T0, E0, 0),
    (T1, E1, 1),
    (T2, E2, 2),
    (T3, E3, 3),
    (T4, E4, 4),
    (T5, E5, 5)
);
join_tuple!(
    (T0, E0, 0),
    (T1, E1, 1),
    (T2, E2, 2),
    (T3, E3, 3),
    (T4, E4, 4),
    (T5, E5, 5),
    (T6, E6, 6)
);
join_tuple!(
    (T0, E0, 0),
    (T1, E1, 1),
    (T2, E2, 2),
    (T3, E3, 3),
    (T4, E4, 4),
    (T5, E5, 5),
    (T6, E6, 6),
    (T7, E7, 7)
);

/// Returns a promise that resolves once every member has finished.
///
/// Members are waited on one at a time in order, so the join takes as long as
/// the slowest member when they run concurrently. The result keeps the input
/// order. A member that rejected, or never resolved, contributes
/// `Default::default()` instead of failing the join.
///
/// # Panics
/// Panics if the joining thread cannot be spawned.
///
/// # Examples
/// ## A tuple of different types:
/// ```
/// use promise_chain::{all, promise, Shared};
/// let a: Shared<i32> = promise(|resolve, _| resolve(1));
/// let b: Shared<f64> = promise(|resolve, _| resolve(2.0));
/// let c: Shared<String> = promise(|resolve, _| resolve("three".to_string()));
/// let joined = all((a, b, c));
/// joined.wait();
/// assert_eq!(joined.value(), Some((1, 2.0, "three".to_string())));
/// ```
///
/// ## A vector, with a rejected member:
/// ```
/// use promise_chain::{all, promise, Shared};
/// let members: Vec<Shared<u32>> = vec![
///     promise(|resolve, _| resolve(1)),
///     promise(|_, reject| reject(7)),
///     promise(|resolve, _| resolve(3)),
/// ];
/// let joined = all(members);
/// joined.wait();
/// assert_eq!(joined.value(), Some(vec![1, 0, 3]));
/// ```
pub fn all<J: Join>(members: J) -> Shared<J::Output, J::Error> {
    debug!("joining promises");
    Promise::new(move |resolve, _| resolve(members.join()))
}

/// Returns a promise that settles like the first member to settle.
///
/// Members that finish without settling are skipped; if all of them do, the
/// race ends [`Invalid`](crate::State::Invalid). Returns `None` for an empty
/// input.
///
/// Every member gets a watcher thread that lives until that member finishes.
///
/// # Example
/// ```
/// use promise_chain::{promise, race, Shared};
/// use std::{thread::sleep, time::Duration};
/// let slow: Shared<u32> = promise(|resolve, _| {
///     sleep(Duration::from_millis(200));
///     resolve(1)
/// });
/// let fast: Shared<u32> = promise(|resolve, _| resolve(2));
/// let winner = race(vec![slow, fast]).unwrap();
/// winner.wait();
/// assert_eq!(winner.value(), Some(2));
/// assert!(race::<u32, u8>(Vec::new()).is_none());
/// ```
pub fn race<T, E>(members: Vec<Shared<T, E>>) -> Option<Shared<T, E>>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    if members.is_empty() {
        return None;
    }

    Some(Promise::new(move |resolve, reject| {
        let (tx, rx) = mpsc::channel();
        for (index, member) in members.iter().enumerate() {
            let member = member.clone();
            let tx = tx.clone();
            thread::spawn(move || {
                member.wait();
                let _ = tx.send(index);
            });
        }
        drop(tx);

        for index in rx {
            let member = &members[index];
            if let Some(value) = member.value() {
                resolve(value);
                return;
            }
            if let Some(error) = member.error() {
                reject(error);
                return;
            }
        }
    }))
}
