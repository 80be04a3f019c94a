//! Shared configuration types for Stance
//!
//! This crate contains the serializable types shared between the core
//! session logic (stance-core) and any front end. Everything here is plain
//! data; behavior lives in stance-core.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Session Kind
// ─────────────────────────────────────────────────────────────────────────────

/// Which half of the sit/stand cycle is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Counting down a fixed sitting interval
    #[default]
    Sitting,
    /// Counting up an open-ended standing interval
    Standing,
}

impl SessionKind {
    /// The session kind that follows this one.
    pub fn toggled(self) -> Self {
        match self {
            SessionKind::Sitting => SessionKind::Standing,
            SessionKind::Standing => SessionKind::Sitting,
        }
    }

    /// Display label for status output.
    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Sitting => "Sitting",
            SessionKind::Standing => "Standing",
        }
    }

    /// Message announced when the countdown finishes and this kind is
    /// about to become active.
    pub fn completion_message(&self) -> &'static str {
        match self {
            SessionKind::Standing => "Time to stand up. Stretch your legs.",
            SessionKind::Sitting => "Standing session over. You can sit back down.",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Timer Presets
// ─────────────────────────────────────────────────────────────────────────────

/// A selectable countdown duration. The list is fixed at compile time and
/// never persisted; only the chosen duration lands in [`AppSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerPreset {
    pub label: &'static str,
    pub seconds: u32,
}

/// The fixed preset list. These are the only durations the UI offers;
/// anything else goes through the developer override.
pub const PRESETS: [TimerPreset; 4] = [
    TimerPreset { label: "15 minutes", seconds: 15 * 60 },
    TimerPreset { label: "30 minutes", seconds: 30 * 60 },
    TimerPreset { label: "45 minutes", seconds: 45 * 60 },
    TimerPreset { label: "60 minutes", seconds: 60 * 60 },
];

/// Look up a preset by its duration in seconds.
pub fn preset_for_seconds(seconds: u32) -> Option<TimerPreset> {
    PRESETS.iter().copied().find(|p| p.seconds == seconds)
}

// ─────────────────────────────────────────────────────────────────────────────
// Persisted Settings
// ─────────────────────────────────────────────────────────────────────────────

/// The whole persisted settings record. Written back as a single JSON
/// document on every mutation; never partially updated on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Configured sitting countdown duration in seconds. One of the
    /// preset values except when injected via the developer override.
    #[serde(default = "default_duration")]
    pub timer_duration_secs: u32,

    /// Master toggle for spoken announcements
    #[serde(default)]
    pub speech_enabled: bool,

    /// Id of the chosen voice. None means "platform default". The
    /// referenced voice may have disappeared; lookups must tolerate that.
    #[serde(default)]
    pub selected_voice: Option<String>,

    /// Speech rate, clamped to [0.1, 2.0]
    #[serde(default = "default_rate")]
    pub speech_rate: f32,

    /// Speech pitch, clamped to [0.0, 2.0]
    #[serde(default = "default_pitch")]
    pub speech_pitch: f32,

    /// Speech volume, clamped to [0.0, 1.0]
    #[serde(default = "default_volume")]
    pub speech_volume: f32,

    /// Session kind that was active when the record was written
    #[serde(default)]
    pub current_session: SessionKind,

    /// Completed sit/stand advances across the lifetime of the record
    #[serde(default)]
    pub session_count: u32,
}

fn default_duration() -> u32 {
    30 * 60
}

fn default_rate() -> f32 {
    1.0
}

fn default_pitch() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    1.0
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            timer_duration_secs: default_duration(),
            speech_enabled: false,
            selected_voice: None,
            speech_rate: default_rate(),
            speech_pitch: default_pitch(),
            speech_volume: default_volume(),
            current_session: SessionKind::Sitting,
            session_count: 0,
        }
    }
}

impl AppSettings {
    /// Clamp the speech parameters back into their legal ranges. Applied
    /// after loading so a hand-edited file can't push values out of range.
    pub fn clamp_speech_params(&mut self) {
        self.speech_rate = self.speech_rate.clamp(0.1, 2.0);
        self.speech_pitch = self.speech_pitch.clamp(0.0, 2.0);
        self.speech_volume = self.speech_volume.clamp(0.0, 1.0);
    }
}
