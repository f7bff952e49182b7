use std::io::Write;
use std::sync::{Arc, PoisonError};

use orca_client::{
    lock_store, shared_store, EffectRunner, MutationCoordinator, OrcaApi, PollScheduler,
    SharedStore,
};
use orca_core::{update, Controls, Msg, PollSettings, StateStore};
use orca_logging::{orca_debug, orca_info, orca_warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::{parse_command, Command, HELP};
use crate::render::{self, Output};

/// Whether the command loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Wires the store, renderer, scheduler and mutation path for one terminal session.
pub struct Session {
    store: SharedStore,
    scheduler: PollScheduler,
    runner: EffectRunner,
    controls: Controls,
    out: Output,
}

impl Session {
    pub fn new(api: Arc<dyn OrcaApi>, settings: PollSettings, out: Output) -> Self {
        let mut store = StateStore::new();
        render::subscribe(&mut store, out.clone());
        let store = shared_store(store);
        let scheduler = PollScheduler::new(api.clone(), store.clone(), settings);
        let mutations = MutationCoordinator::new(api, store.clone(), scheduler.clone());
        Self {
            store,
            scheduler,
            runner: EffectRunner::new(mutations),
            controls: Controls::new(),
            out,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn scheduler(&self) -> &PollScheduler {
        &self.scheduler
    }

    /// Runs the first poll; the scheduler keeps polling in the background.
    pub async fn start(&self) {
        self.say(HELP);
        self.scheduler.start().await;
    }

    /// Applies one line of input.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match parse_command(line) {
            Ok(Some(command)) => self.handle(command).await,
            Ok(None) => Flow::Continue,
            Err(err) => {
                self.say(&err.to_string());
                Flow::Continue
            }
        }
    }

    pub async fn handle(&mut self, command: Command) -> Flow {
        orca_debug!("Command {:?}", command);
        match command {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                self.say(HELP);
                return Flow::Continue;
            }
            Command::Confirm | Command::Cancel if self.controls.pending_delete().is_none() => {
                self.say("no delete is waiting for confirmation");
                return Flow::Continue;
            }
            _ => {}
        }
        let Some(msg) = command.to_msg() else {
            return Flow::Continue;
        };

        let controls = std::mem::take(&mut self.controls);
        let (controls, effects) = update(controls, &mut lock_store(&self.store), msg);
        self.controls = controls;

        if let Some(rejection) = self.controls.take_rejection() {
            self.say(&rejection.to_string());
        }
        if let (Command::Delete(_), Some(prompt)) = (&command, self.controls.pending_delete()) {
            let question = format!("delete search {}? (yes/no)", prompt.uid());
            self.say(&question);
        }
        self.runner.run(effects).await;
        Flow::Continue
    }

    /// Stops the polling loop. An open delete prompt is cancelled, not confirmed.
    pub fn shutdown(&mut self) {
        if self.controls.pending_delete().is_some() {
            orca_info!("Cancelling open delete prompt on shutdown");
            let controls = std::mem::take(&mut self.controls);
            let (controls, _) =
                update(controls, &mut lock_store(&self.store), Msg::DeleteCancelled);
            self.controls = controls;
        }
        self.scheduler.dispose();
    }

    fn say(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

/// Reads commands from `input` until `quit` or end of input, then shuts down.
pub async fn run<R>(mut session: Session, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    session.start().await;

    let mut lines = input.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if session.handle_line(&line).await == Flow::Quit {
                    break;
                }
            }
            Ok(None) => {
                orca_info!("End of input");
                break;
            }
            Err(err) => {
                orca_warn!("Reading input failed: {}", err);
                session.shutdown();
                return Err(err.into());
            }
        }
    }

    session.shutdown();
    Ok(())
}
