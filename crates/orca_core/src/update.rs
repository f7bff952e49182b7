use orca_logging::{orca_debug, orca_warn};

use crate::{
    validate_search_str, Controls, Effect, Msg, PendingDelete, Rejection, StateStore, StateUpdate,
};

/// Applies a UI message and returns the effects to run. Performs no IO.
///
/// Store writes made here (polling flag, validation errors) notify subscribers
/// synchronously, same as any other update.
pub fn update(mut controls: Controls, store: &mut StateStore, msg: Msg) -> (Controls, Vec<Effect>) {
    controls.set_rejection(None);
    let effects = match msg {
        Msg::PollingToggled(enabled) => {
            match controls.pending_delete_mut() {
                // Polling stays suspended while the prompt is open; the choice
                // takes effect when it closes.
                Some(prompt) => prompt.set_restore_polling(enabled),
                None => store.update(StateUpdate::new().polling_enabled(enabled)),
            }
            Vec::new()
        }
        Msg::SearchSubmitted(raw) => {
            // The submit is followed by a forced refresh, which must not run
            // while a delete is waiting for confirmation.
            if let Some(prompt) = controls.pending_delete() {
                let uid = prompt.uid().to_string();
                orca_debug!("Refusing search submission while delete of {} is pending", uid);
                controls.set_rejection(Some(Rejection::DeletePending(uid)));
                return (controls, Vec::new());
            }
            match validate_search_str(&raw) {
                Err(err) => {
                    orca_warn!("Rejected search submission: {}", err);
                    store.update(StateUpdate::new().error(Some(err.to_string())));
                    Vec::new()
                }
                Ok(_) if !store.get().is_connected => {
                    orca_debug!("Ignoring search submission while disconnected");
                    controls.set_rejection(Some(Rejection::Disconnected));
                    Vec::new()
                }
                Ok(search_str) => vec![Effect::SubmitSearch {
                    search_str: search_str.to_string(),
                }],
            }
        }
        Msg::DeleteRequested { uid } => {
            if store.get().search(&uid).is_none() {
                orca_warn!("Delete requested for unknown search uid={}", uid);
                controls.set_rejection(Some(Rejection::UnknownSearch(uid)));
                return (controls, Vec::new());
            }
            if let Some(previous) = controls.take_pending_delete() {
                previous.cancel(store);
            }
            controls.set_pending_delete(PendingDelete::open(store, uid));
            Vec::new()
        }
        Msg::DeleteConfirmed => match controls.take_pending_delete() {
            Some(prompt) => vec![Effect::ConfirmDelete(prompt)],
            None => Vec::new(),
        },
        Msg::DeleteCancelled => {
            if let Some(prompt) = controls.take_pending_delete() {
                prompt.cancel(store);
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (controls, effects)
}
