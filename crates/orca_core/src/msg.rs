#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User flipped the polling checkbox.
    PollingToggled(bool),
    /// User submitted the search input.
    SearchSubmitted(String),
    /// User asked to delete a search; opens the confirmation prompt.
    DeleteRequested { uid: String },
    /// User confirmed the open delete prompt.
    DeleteConfirmed,
    /// User dismissed the open delete prompt.
    DeleteCancelled,
    /// Fallback for placeholder wiring.
    NoOp,
}
