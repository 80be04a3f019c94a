//! Speech announcements
//!
//! This module provides:
//! - **Backends**: synthesis engines behind the [`SpeechBackend`] trait
//!   (espeak-ng is the only shipped backend)
//! - **Outputs**: audio playback behind the [`AudioOutput`] trait, with a
//!   rodio implementation and a silent one for headless use
//! - **Announcer**: the facade the session orchestrator talks to —
//!   capability probe, voice enumeration, clamped speech parameters,
//!   stale-voice fallback
//!
//! Nothing in here ever propagates an error to the caller: synthesis and
//! playback failures are captured as a message on the announcer and the
//! speaking flag is cleared.

mod announcer;
mod backend;
mod espeak;
mod output;

pub use announcer::Announcer;
pub use backend::{SpeechBackend, SpeechParams, Voice};
pub use espeak::EspeakBackend;
pub use output::{AudioOutput, NullOutput, RodioOutput};
