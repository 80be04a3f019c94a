//! Async driver for [`SessionState`].
//!
//! One task owns the state and drains a command channel; every applied
//! command publishes a fresh [`SessionSnapshot`] on a watch channel.
//! Timing lives here as spawned tasks so the state machine itself stays
//! synchronous.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::settings::SettingsStore;
use crate::speech::Announcer;

use super::command::{Effect, SessionCommand};
use super::state::{SessionSnapshot, SessionState};

/// Cadence of the shared tick loop.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Gap between the completion alert appearing and the announcement
/// starting, so the alert sound is not talked over.
pub const SPEECH_START_DELAY: Duration = Duration::from_millis(500);

/// How long an unacknowledged completion alert stays up before the
/// session advances on its own.
pub const DISMISSAL_DWELL: Duration = Duration::from_secs(12);

/// Handles for the orchestrator's timing tasks.
#[derive(Default)]
struct SessionTasks {
    ticker: Option<JoinHandle<()>>,
    speech_delay: Option<JoinHandle<()>>,
    dismissal: Option<JoinHandle<()>>,
}

impl SessionTasks {
    /// Abort the completion-sequence tasks. The ticker is left alone.
    fn abort_pending(&mut self) {
        if let Some(task) = self.speech_delay.take() {
            task.abort();
        }
        if let Some(task) = self.dismissal.take() {
            task.abort();
        }
    }

    fn abort_all(&mut self) {
        self.abort_pending();
        if let Some(task) = self.ticker.take() {
            task.abort();
        }
    }

    fn ticker_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }
}

/// Handle to the session loop. Cheap to clone; all clones feed the same
/// state task.
#[derive(Clone)]
pub struct SessionOrchestrator {
    cmd_tx: mpsc::UnboundedSender<SessionCommand>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionOrchestrator {
    /// Load settings, spawn the session loop, and return its handle.
    pub fn start(store: SettingsStore, announcer: Arc<Announcer>) -> Self {
        let settings = store.load();
        let state = SessionState::new(settings);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot(&announcer));

        tokio::spawn(run_loop(state, store, announcer, cmd_rx, snapshot_tx, cmd_tx.clone()));

        Self { cmd_tx, snapshot_rx }
    }

    /// Queue a command. Dropped silently if the loop has shut down.
    pub fn send(&self, cmd: SessionCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::debug!("session loop gone, command dropped");
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Watch receiver for callers that want change notifications.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Ask the loop to stop. Pending timing tasks are aborted and any
    /// in-flight speech is cancelled.
    pub fn shutdown(&self) {
        self.send(SessionCommand::Shutdown);
    }
}

async fn run_loop(
    mut state: SessionState,
    store: SettingsStore,
    announcer: Arc<Announcer>,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    cmd_tx: mpsc::UnboundedSender<SessionCommand>,
) {
    let mut tasks = SessionTasks::default();

    while let Some(cmd) = cmd_rx.recv().await {
        if matches!(cmd, SessionCommand::Shutdown) {
            break;
        }

        let effects = state.apply(cmd);
        for effect in effects {
            match effect {
                Effect::PersistSettings => {
                    if let Err(e) = store.save(state.settings()) {
                        tracing::warn!(error = %e, "failed to persist settings");
                    }
                }
                Effect::SyncTicker => sync_ticker(&mut tasks, &state, &cmd_tx),
                Effect::ArmCompletion => {
                    // A completion replaces any sequence still pending.
                    tasks.abort_pending();
                    tasks.speech_delay = Some(spawn_delayed(
                        SPEECH_START_DELAY,
                        SessionCommand::AnnounceCompletion,
                        cmd_tx.clone(),
                    ));
                    tasks.dismissal = Some(spawn_delayed(
                        DISMISSAL_DWELL,
                        SessionCommand::DismissAlert,
                        cmd_tx.clone(),
                    ));
                }
                Effect::CancelPending => {
                    tasks.abort_pending();
                    announcer.stop();
                }
                Effect::Speak { text } => announcer.speak(text, state.settings()),
            }
        }

        snapshot_tx.send_replace(state.snapshot(&announcer));
    }

    tasks.abort_all();
    announcer.stop();
    tracing::debug!("session loop stopped");
}

/// Keep the ticker task's existence in line with whether any engine is
/// running.
fn sync_ticker(
    tasks: &mut SessionTasks,
    state: &SessionState,
    cmd_tx: &mpsc::UnboundedSender<SessionCommand>,
) {
    if state.any_running() {
        if !tasks.ticker_running() {
            let tx = cmd_tx.clone();
            tasks.ticker = Some(tokio::spawn(async move {
                loop {
                    tokio::time::sleep(TICK_PERIOD).await;
                    if tx.send(SessionCommand::Tick).is_err() {
                        break;
                    }
                }
            }));
        }
    } else if let Some(task) = tasks.ticker.take() {
        task.abort();
    }
}

fn spawn_delayed(
    delay: Duration,
    cmd: SessionCommand,
    tx: mpsc::UnboundedSender<SessionCommand>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(cmd);
    })
}
