//! Adaptive polling of the status endpoint.
//!
//! The scheduler owns its timer explicitly: at most one pending timer task
//! exists per scheduler, and every timer carries a generation number so a
//! timer that was cancelled after it woke up cannot start a poll.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use orca_core::{Backoff, PollSettings, StateUpdate};
use orca_logging::{orca_debug, orca_warn};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::{lock_store, ApiError, OrcaApi, SharedStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// No timer pending and no fetch running.
    Idle,
    /// A timer is pending.
    Scheduled,
    /// A fetch is in progress.
    InFlight,
}

/// Result of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The data fingerprint differs from the previously stored one.
    Changed,
    Unchanged,
    Failed(ApiError),
}

/// Cloneable handle to a polling loop; all clones drive the same timer.
#[derive(Clone)]
pub struct PollScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn OrcaApi>,
    store: SharedStore,
    timer: Mutex<TimerState>,
}

struct TimerState {
    backoff: Backoff,
    phase: SchedulerPhase,
    pending: Option<JoinHandle<()>>,
    deadline: Option<Instant>,
    generation: u64,
    disposed: bool,
}

impl PollScheduler {
    pub fn new(api: Arc<dyn OrcaApi>, store: SharedStore, settings: PollSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                store,
                timer: Mutex::new(TimerState {
                    backoff: Backoff::new(settings),
                    phase: SchedulerPhase::Idle,
                    pending: None,
                    deadline: None,
                    generation: 0,
                    disposed: false,
                }),
            }),
        }
    }

    /// Polls immediately from the minimum interval; the loop continues on its own.
    pub async fn start(&self) -> PollOutcome {
        {
            let mut timer = self.lock_timer();
            timer.disposed = false;
            timer.backoff.reset();
        }
        self.poll_now().await
    }

    /// Runs one poll cycle right away, then schedules the next one.
    ///
    /// Does not cancel a pending timer by itself; see [`cancel_pending`](Self::cancel_pending).
    pub async fn poll_now(&self) -> PollOutcome {
        self.lock_timer().phase = SchedulerPhase::InFlight;
        let result = self.inner.api.fetch_status().await;

        let outcome = {
            let mut store = lock_store(&self.inner.store);
            match result {
                Ok(status) => {
                    let update = StateUpdate::from_status(status, Utc::now());
                    let changed = store.get().data_checksum != update.data_checksum.clone().flatten();
                    store.update(update.connected(true).error(None));
                    if changed {
                        PollOutcome::Changed
                    } else {
                        PollOutcome::Unchanged
                    }
                }
                Err(err) => {
                    orca_warn!("Poll failed ({}): {}", err.kind, err);
                    store.update(
                        StateUpdate::new()
                            .connected(false)
                            .error(Some(err.to_string())),
                    );
                    PollOutcome::Failed(err)
                }
            }
        };

        {
            let mut timer = self.lock_timer();
            let interval = match outcome {
                PollOutcome::Changed => timer.backoff.reset(),
                PollOutcome::Unchanged | PollOutcome::Failed(_) => timer.backoff.grow(),
            };
            orca_debug!("Poll outcome {:?}; next poll in {:?}", outcome, interval);
        }
        self.schedule_next();
        outcome
    }

    /// Cancels the pending timer, if any. A fetch already in flight is not affected.
    pub fn cancel_pending(&self) -> bool {
        let mut timer = self.lock_timer();
        timer.generation += 1;
        timer.deadline = None;
        match timer.pending.take() {
            Some(handle) => {
                handle.abort();
                if timer.phase == SchedulerPhase::Scheduled {
                    timer.phase = SchedulerPhase::Idle;
                }
                true
            }
            None => false,
        }
    }

    /// Puts the interval back to the minimum without polling.
    pub fn reset_interval(&self) {
        self.lock_timer().backoff.reset();
    }

    /// Stops the loop for good: cancels the timer and refuses to schedule again
    /// until [`start`](Self::start) is called.
    pub fn dispose(&self) {
        self.cancel_pending();
        let mut timer = self.lock_timer();
        timer.disposed = true;
        timer.phase = SchedulerPhase::Idle;
    }

    pub fn current_interval(&self) -> Duration {
        self.lock_timer().backoff.current()
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.lock_timer().phase
    }

    /// When the pending timer will fire, if one is pending.
    pub fn next_poll_at(&self) -> Option<Instant> {
        self.lock_timer().deadline
    }

    fn schedule_next(&self) {
        let mut timer = self.lock_timer();
        if let Some(stale) = timer.pending.take() {
            stale.abort();
        }
        if timer.disposed {
            timer.deadline = None;
            timer.phase = SchedulerPhase::Idle;
            return;
        }
        timer.generation += 1;
        let generation = timer.generation;
        let delay = timer.backoff.current();
        timer.deadline = Some(Instant::now() + delay);
        timer.phase = SchedulerPhase::Scheduled;

        let scheduler = self.clone();
        // Spawned while the lock is held, so the task cannot observe the state
        // before its own handle is stored.
        timer.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            scheduler.fire(generation).await;
        }));
    }

    async fn fire(&self, generation: u64) {
        {
            let mut timer = self.lock_timer();
            if timer.generation != generation || timer.disposed {
                return;
            }
            // Detach: from here on cancel_pending cannot abort this task, so an
            // in-flight fetch always completes.
            timer.pending = None;
            timer.deadline = None;
        }

        let polling_enabled = lock_store(&self.inner.store).get().is_polling_enabled;
        if !polling_enabled {
            orca_debug!("Polling disabled; skipping scheduled fetch");
            self.schedule_next();
            return;
        }
        self.poll_now().await;
    }

    fn lock_timer(&self) -> MutexGuard<'_, TimerState> {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
