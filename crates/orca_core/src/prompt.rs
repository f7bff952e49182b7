use crate::{StateStore, StateUpdate};

/// An open delete confirmation.
///
/// Opening the prompt suspends polling so a refresh cannot replace the record
/// being confirmed; whatever polling value was active beforehand is restored
/// when the prompt is cancelled or closed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an open prompt keeps polling suspended until cancelled or closed"]
pub struct PendingDelete {
    uid: String,
    restore_polling: bool,
}

impl PendingDelete {
    pub fn open(store: &mut StateStore, uid: impl Into<String>) -> Self {
        let restore_polling = store.get().is_polling_enabled;
        store.update(StateUpdate::new().polling_enabled(false));
        Self {
            uid: uid.into(),
            restore_polling,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Polling value that will be restored.
    pub fn restore_polling(&self) -> bool {
        self.restore_polling
    }

    pub(crate) fn set_restore_polling(&mut self, enabled: bool) {
        self.restore_polling = enabled;
    }

    /// Dismisses the prompt without deleting anything.
    pub fn cancel(self, store: &mut StateStore) {
        self.close(store);
    }

    /// Restores polling and hands back the uid that was being confirmed.
    pub fn close(self, store: &mut StateStore) -> String {
        store.update(StateUpdate::new().polling_enabled(self.restore_polling));
        self.uid
    }
}
