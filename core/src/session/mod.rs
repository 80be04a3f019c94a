//! Session orchestration
//!
//! This module provides:
//! - **Commands**: the intent set the presentation layer emits
//! - **State**: a pure state machine owning both engines, the settings
//!   record, and the alert/completion guard; applying a command returns
//!   the side effects the runner must execute
//! - **Orchestrator**: the async runner — one apply loop, an abortable
//!   1 s ticker, and the one-shot speech/dismissal delays
//!
//! # Completion sequence
//!
//! Countdown reaches zero → alert flag raised and, exactly once per
//! completion, the speech delay and the dismissal dwell are armed.
//! Dismissal (manual or dwell expiry, whichever first) cancels anything
//! still pending, clears the alert, toggles the session kind, and starts
//! the engine for the new kind. Manual mode switching performs the same
//! advance immediately, bypassing the alert path.

mod command;
mod orchestrator;
mod state;


#[cfg(test)]
mod orchestrator_tests;

pub use command::{Effect, SessionCommand};
pub use orchestrator::{
    DISMISSAL_DWELL, SPEECH_START_DELAY, SessionOrchestrator, TICK_PERIOD,
};
pub use state::{SessionSnapshot, SessionState};
