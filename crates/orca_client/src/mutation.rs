use std::sync::Arc;

use orca_core::{validate_search_str, PendingDelete, StateUpdate};
use orca_logging::{orca_info, orca_warn};

use crate::{lock_store, ApiError, OrcaApi, PollScheduler, SharedStore};

/// User-initiated create/delete calls.
///
/// On success the pending poll timer is cancelled and a poll runs immediately
/// from the minimum interval. Failures are recorded in the store's `error`
/// field and returned; nothing is retried.
#[derive(Clone)]
pub struct MutationCoordinator {
    api: Arc<dyn OrcaApi>,
    store: SharedStore,
    scheduler: PollScheduler,
}

impl MutationCoordinator {
    pub fn new(api: Arc<dyn OrcaApi>, store: SharedStore, scheduler: PollScheduler) -> Self {
        Self {
            api,
            store,
            scheduler,
        }
    }

    pub async fn submit_search(&self, search_str: &str) -> Result<(), ApiError> {
        let search_str = match validate_search_str(search_str) {
            Ok(valid) => valid,
            Err(err) => return Err(self.report(err.into())),
        };
        match self.api.create_search(search_str).await {
            Ok(()) => {
                orca_info!("Search submitted: {:?}", search_str);
                self.refresh_now().await;
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub async fn delete_search(&self, uid: &str) -> Result<(), ApiError> {
        match self.api.delete_search(uid).await {
            Ok(()) => {
                orca_info!("Search deleted: uid={}", uid);
                self.refresh_now().await;
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Deletes the prompt's search, then closes the prompt (restoring polling),
    /// then refreshes if the delete succeeded.
    pub async fn confirm_delete(&self, prompt: PendingDelete) -> Result<(), ApiError> {
        let result = self.api.delete_search(prompt.uid()).await;
        let uid = prompt.close(&mut lock_store(&self.store));
        match result {
            Ok(()) => {
                orca_info!("Search deleted: uid={}", uid);
                self.refresh_now().await;
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    async fn refresh_now(&self) {
        self.scheduler.cancel_pending();
        self.scheduler.reset_interval();
        self.scheduler.poll_now().await;
    }

    fn report(&self, err: ApiError) -> ApiError {
        orca_warn!("Mutation failed ({}): {}", err.kind, err);
        lock_store(&self.store).update(StateUpdate::new().error(Some(err.to_string())));
        err
    }
}
