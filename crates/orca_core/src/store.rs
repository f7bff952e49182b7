use std::fmt;

use crate::change::ChangeSet;
use crate::{StateSnapshot, StateUpdate};

/// Subscriber invoked after every [`StateStore::update`].
pub type Listener = Box<dyn Fn(&StateStore) + Send>;

/// Holds the current snapshot and the one immediately before it.
///
/// Listeners receive a shared reference to the store, so they can read
/// [`get`](Self::get), [`previous`](Self::previous) and
/// [`changes`](Self::changes) but cannot call `update` from inside a
/// notification. That keeps the single-slot history consistent.
#[derive(Default)]
pub struct StateStore {
    current: StateSnapshot,
    previous: Option<StateSnapshot>,
    listeners: Vec<Listener>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `initial` instead of the default snapshot. No notification is sent.
    pub fn with_snapshot(initial: StateSnapshot) -> Self {
        Self {
            current: initial,
            ..Self::default()
        }
    }

    /// Shallow-merges `partial` into the current snapshot, keeps the old current as
    /// previous, then notifies every listener in registration order.
    ///
    /// An empty update still rotates the history and notifies.
    pub fn update(&mut self, partial: StateUpdate) {
        let next = partial.apply(&self.current);
        self.previous = Some(std::mem::replace(&mut self.current, next));
        let store: &StateStore = self;
        for listener in &store.listeners {
            listener(store);
        }
    }

    pub fn subscribe(&mut self, listener: impl Fn(&StateStore) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn get(&self) -> &StateSnapshot {
        &self.current
    }

    /// Snapshot from immediately before the last update; `None` before the first one.
    pub fn previous(&self) -> Option<&StateSnapshot> {
        self.previous.as_ref()
    }

    /// Fields that differ between [`previous`](Self::previous) and [`get`](Self::get).
    pub fn changes(&self) -> ChangeSet {
        ChangeSet::between(self.previous.as_ref(), &self.current)
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
