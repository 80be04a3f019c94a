//! The announcer facade the session orchestrator talks to.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;

use stance_types::AppSettings;

use super::backend::{SpeechBackend, SpeechParams, Voice};
use super::espeak::EspeakBackend;
use super::output::{AudioOutput, RodioOutput};

/// Voice ids tried, in order, when no voice is selected or the selected
/// one has disappeared from the platform.
const PREFERRED_VOICES: [&str; 3] = ["en-us", "en-gb", "en"];

/// Wraps a synthesis backend and a playback output behind the semantics
/// the orchestrator needs: a one-time support probe, a cached voice set,
/// silent fallback for stale voice ids, and error capture instead of
/// propagation.
pub struct Announcer {
    backend: Arc<dyn SpeechBackend>,
    output: Arc<dyn AudioOutput>,
    supported: bool,
    voices: RwLock<Vec<Voice>>,
    last_error: Arc<Mutex<Option<String>>>,
    synthesizing: Arc<AtomicBool>,
    /// Bumped by `stop()` and by every new utterance. A synthesis thread
    /// only hands its result to the output while its token is still
    /// current, so cancelled speech never starts playing late.
    generation: Arc<AtomicU64>,
}

impl Announcer {
    /// Announcer over espeak-ng and the default audio device.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(EspeakBackend::new()), Arc::new(RodioOutput::spawn()))
    }

    /// Assemble from explicit parts. The support probe and the initial
    /// voice enumeration happen here, once.
    pub fn with_parts(backend: Arc<dyn SpeechBackend>, output: Arc<dyn AudioOutput>) -> Self {
        let supported = backend.is_available();
        if !supported {
            tracing::info!(backend = backend.id(), "speech backend unavailable, speech disabled");
        }
        let announcer = Self {
            backend,
            output,
            supported,
            voices: RwLock::new(Vec::new()),
            last_error: Arc::new(Mutex::new(None)),
            synthesizing: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        };
        if supported {
            announcer.refresh_voices();
        }
        announcer
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Current snapshot of the voice set.
    pub fn voices(&self) -> Vec<Voice> {
        self.voices.read().unwrap().clone()
    }

    /// Re-read the backend's voice list and republish it. Voice
    /// installation can change between runs of the host; callers get the
    /// refreshed set from the next snapshot without polling the backend.
    pub fn refresh_voices(&self) {
        if !self.supported {
            return;
        }
        match self.backend.list_voices() {
            Ok(voices) => {
                tracing::debug!(count = voices.len(), "voice list refreshed");
                *self.voices.write().unwrap() = voices;
            }
            Err(e) => self.record_error(format!("voice enumeration failed: {}", e)),
        }
    }

    /// Pick a default voice: first match from the preference list, then
    /// the first available voice, then none.
    pub fn default_voice(&self) -> Option<String> {
        let voices = self.voices.read().unwrap();
        for preferred in PREFERRED_VOICES {
            if let Some(v) = voices.iter().find(|v| v.id == preferred) {
                return Some(v.id.clone());
            }
        }
        voices.first().map(|v| v.id.clone())
    }

    /// Resolve a selected voice id against the current set, falling back
    /// to the default when the id is stale or unset. A miss is never an
    /// error.
    pub fn resolve_voice(&self, selected: Option<&str>) -> Option<String> {
        if let Some(id) = selected {
            let known = self.voices.read().unwrap().iter().any(|v| v.id == id);
            if known {
                return Some(id.to_string());
            }
            tracing::debug!(voice = id, "selected voice not available, using default");
        }
        self.default_voice()
    }

    /// Speak `text` with the given settings. No-op when the backend is
    /// unsupported or speech is disabled. Cancels any in-flight utterance
    /// first. Synthesis runs off-thread; failures land in `last_error`.
    pub fn speak(&self, text: &str, settings: &AppSettings) {
        if !self.supported || !settings.speech_enabled {
            return;
        }

        self.stop();

        let voice = self.resolve_voice(settings.selected_voice.as_deref());
        let params = SpeechParams {
            rate: settings.speech_rate.clamp(0.1, 2.0),
            pitch: settings.speech_pitch.clamp(0.0, 2.0),
            volume: settings.speech_volume.clamp(0.0, 1.0),
        };

        let backend = Arc::clone(&self.backend);
        let output = Arc::clone(&self.output);
        let last_error = Arc::clone(&self.last_error);
        let synthesizing = Arc::clone(&self.synthesizing);
        let generation = Arc::clone(&self.generation);
        let token = generation.fetch_add(1, Ordering::SeqCst) + 1;
        let text = text.to_string();

        synthesizing.store(true, Ordering::SeqCst);
        thread::spawn(move || {
            match backend.synthesize(&text, voice.as_deref(), &params) {
                // A bumped generation means this utterance was cancelled
                // while synthesizing; its audio must never start.
                Ok(wav) => {
                    if generation.load(Ordering::SeqCst) == token {
                        output.play(wav);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "speech synthesis failed");
                    *last_error.lock().unwrap() = Some(e.to_string());
                }
            }
            synthesizing.store(false, Ordering::SeqCst);
        });
    }

    /// Cancel any in-flight utterance, synthesizing or already playing;
    /// idempotent.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.output.stop();
    }

    /// True from utterance start until playback ends or fails.
    pub fn is_speaking(&self) -> bool {
        self.synthesizing.load(Ordering::SeqCst) || self.output.is_playing()
    }

    /// Most recent synthesis or playback failure.
    pub fn last_error(&self) -> Option<String> {
        self.output
            .last_error()
            .or_else(|| self.last_error.lock().unwrap().clone())
    }

    fn record_error(&self, msg: String) {
        tracing::warn!(error = %msg, "speech error");
        *self.last_error.lock().unwrap() = Some(msg);
    }
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new()
    }
}
