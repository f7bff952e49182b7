use crate::PendingDelete;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitSearch { search_str: String },
    /// Issue the delete, then close the prompt (restoring polling) and refresh.
    ConfirmDelete(PendingDelete),
}
