use thiserror::Error;

use crate::PendingDelete;

/// Why the last message was dropped without producing an effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("not connected to the service; search not submitted")]
    Disconnected,
    #[error("no search with uid {0}")]
    UnknownSearch(String),
    /// A submission would force a refresh underneath the open prompt.
    #[error("answer the pending delete of {0} first (yes/no)")]
    DeletePending(String),
}

/// UI-boundary state that lives outside the snapshot store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Controls {
    pending_delete: Option<PendingDelete>,
    rejection: Option<Rejection>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    /// Set by the most recent [`crate::update`] call when it ignored its message.
    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    pub fn take_rejection(&mut self) -> Option<Rejection> {
        self.rejection.take()
    }

    pub(crate) fn pending_delete_mut(&mut self) -> Option<&mut PendingDelete> {
        self.pending_delete.as_mut()
    }

    pub(crate) fn take_pending_delete(&mut self) -> Option<PendingDelete> {
        self.pending_delete.take()
    }

    pub(crate) fn set_pending_delete(&mut self, prompt: PendingDelete) {
        self.pending_delete = Some(prompt);
    }

    pub(crate) fn set_rejection(&mut self, rejection: Option<Rejection>) {
        self.rejection = rejection;
    }
}
