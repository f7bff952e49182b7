use orca_core::Effect;
use orca_logging::{orca_info, orca_warn};

use crate::MutationCoordinator;

/// Executes effects produced by [`orca_core::update`].
pub struct EffectRunner {
    mutations: MutationCoordinator,
}

impl EffectRunner {
    pub fn new(mutations: MutationCoordinator) -> Self {
        Self { mutations }
    }

    /// Runs effects in order. Failures have already been written to the store by
    /// the coordinator; they are only logged here.
    pub async fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitSearch { search_str } => {
                    orca_info!("SubmitSearch len={}", search_str.len());
                    if let Err(err) = self.mutations.submit_search(&search_str).await {
                        orca_warn!("SubmitSearch failed: {}", err);
                    }
                }
                Effect::ConfirmDelete(prompt) => {
                    orca_info!("ConfirmDelete uid={}", prompt.uid());
                    if let Err(err) = self.mutations.confirm_delete(prompt).await {
                        orca_warn!("ConfirmDelete failed: {}", err);
                    }
                }
            }
        }
    }
}
