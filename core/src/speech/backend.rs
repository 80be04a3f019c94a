//! The synthesis backend seam.

use serde::{Deserialize, Serialize};

/// Represents a text-to-speech voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Unique id, passed back to the backend to select the voice
    pub id: String,
    pub name: String,
    pub language: String,
}

/// Synthesis parameters, already clamped by the announcer:
/// rate in [0.1, 2.0], pitch in [0.0, 2.0], volume in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechParams {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Trait all speech synthesis backends implement. Allows plugging in a
/// different engine without touching the announcer.
pub trait SpeechBackend: Send + Sync {
    /// Unique backend id (e.g. "espeak-ng")
    fn id(&self) -> &'static str;

    /// One-time capability probe. A false result disables speech for the
    /// lifetime of the announcer.
    fn is_available(&self) -> bool;

    /// Synthesize `text` to WAV bytes. `voice` is a backend voice id; None
    /// means the backend default.
    fn synthesize(&self, text: &str, voice: Option<&str>, params: &SpeechParams)
    -> std::io::Result<Vec<u8>>;

    /// Enumerate the currently installed voices.
    fn list_voices(&self) -> std::io::Result<Vec<Voice>>;
}
