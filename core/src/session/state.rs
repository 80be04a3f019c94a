//! The session state machine.

use stance_types::{AppSettings, SessionKind, preset_for_seconds};

use crate::speech::{Announcer, Voice};
use crate::timer::{CountdownTimer, StopwatchTimer, TimerStatus, format_mm_ss};

use super::command::{Effect, SessionCommand};

/// Owns both engines, the settings record, and the alert state. All
/// mutation goes through [`apply`](Self::apply); callers act on the
/// returned effects in order.
pub struct SessionState {
    countdown: CountdownTimer,
    stopwatch: StopwatchTimer,
    settings: AppSettings,
    alert_visible: bool,
    /// At-most-once guard for the completion side effects. Set on the
    /// completing tick, cleared whenever the completed state is left by
    /// any path, which re-arms the guard for the next completion.
    completion_handled: bool,
}

impl SessionState {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            countdown: CountdownTimer::new(settings.timer_duration_secs),
            stopwatch: StopwatchTimer::new(),
            settings,
            alert_visible: false,
            completion_handled: false,
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn alert_visible(&self) -> bool {
        self.alert_visible
    }

    /// True while either engine needs the tick loop.
    pub fn any_running(&self) -> bool {
        self.countdown.status().is_running() || self.stopwatch.status().is_running()
    }

    /// The message announced for the completion currently being handled.
    pub fn completion_message(&self) -> &'static str {
        self.settings.current_session.toggled().completion_message()
    }

    pub fn apply(&mut self, cmd: SessionCommand) -> Vec<Effect> {
        match cmd {
            SessionCommand::Start => {
                match self.settings.current_session {
                    SessionKind::Sitting => self.countdown.start(),
                    SessionKind::Standing => self.stopwatch.start(),
                }
                vec![Effect::SyncTicker]
            }
            SessionCommand::Pause => {
                match self.settings.current_session {
                    SessionKind::Sitting => self.countdown.pause(),
                    SessionKind::Standing => self.stopwatch.pause(),
                }
                vec![Effect::SyncTicker]
            }
            SessionCommand::Stop | SessionCommand::Reset => self.reset_active(),
            SessionCommand::SelectPreset { seconds } => {
                if preset_for_seconds(seconds).is_none() {
                    tracing::warn!(seconds, "ignoring non-preset duration");
                    return Vec::new();
                }
                self.set_duration(seconds)
            }
            SessionCommand::SetDuration { seconds } => self.set_duration(seconds),
            SessionCommand::SetSpeechEnabled(enabled) => {
                self.settings.speech_enabled = enabled;
                vec![Effect::PersistSettings]
            }
            SessionCommand::SelectVoice(voice) => {
                self.settings.selected_voice = voice;
                vec![Effect::PersistSettings]
            }
            SessionCommand::SetSpeechParams { rate, pitch, volume } => {
                if let Some(rate) = rate {
                    self.settings.speech_rate = rate;
                }
                if let Some(pitch) = pitch {
                    self.settings.speech_pitch = pitch;
                }
                if let Some(volume) = volume {
                    self.settings.speech_volume = volume;
                }
                self.settings.clamp_speech_params();
                vec![Effect::PersistSettings]
            }
            SessionCommand::Tick => self.handle_tick(),
            SessionCommand::AnnounceCompletion => {
                // Speech settings are read at fire time, so toggling
                // speech off during the delay silences the announcement.
                if self.alert_visible && self.settings.speech_enabled {
                    vec![Effect::Speak { text: self.completion_message() }]
                } else {
                    Vec::new()
                }
            }
            SessionCommand::DismissAlert => {
                if !self.alert_visible {
                    return Vec::new();
                }
                let mut effects = vec![Effect::CancelPending];
                self.alert_visible = false;
                self.completion_handled = false;
                self.advance_session(true, &mut effects);
                effects
            }
            SessionCommand::SwitchMode => {
                let mut effects = vec![Effect::CancelPending];
                self.alert_visible = false;
                self.completion_handled = false;
                self.advance_session(false, &mut effects);
                effects
            }
            SessionCommand::Shutdown => Vec::new(),
        }
    }

    fn handle_tick(&mut self) -> Vec<Effect> {
        match self.settings.current_session {
            SessionKind::Sitting => {
                if self.countdown.tick() {
                    tracing::info!(
                        duration_secs = self.countdown.duration_secs(),
                        "countdown complete"
                    );
                    self.alert_visible = true;
                    if !self.completion_handled {
                        self.completion_handled = true;
                        return vec![Effect::ArmCompletion, Effect::SyncTicker];
                    }
                    return vec![Effect::SyncTicker];
                }
                Vec::new()
            }
            SessionKind::Standing => {
                self.stopwatch.tick();
                Vec::new()
            }
        }
    }

    fn reset_active(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        // Resetting out of a completion abandons its alert cycle.
        if self.alert_visible || self.countdown.status() == TimerStatus::Completed {
            effects.push(Effect::CancelPending);
            self.alert_visible = false;
            self.completion_handled = false;
        }
        match self.settings.current_session {
            SessionKind::Sitting => self.countdown.reset(),
            SessionKind::Standing => self.stopwatch.reset(),
        }
        effects.push(Effect::SyncTicker);
        effects
    }

    fn set_duration(&mut self, seconds: u32) -> Vec<Effect> {
        self.settings.timer_duration_secs = seconds;
        // Takes effect immediately only while idle; otherwise on the
        // next reset (engine rule).
        self.countdown.set_duration(seconds);
        vec![Effect::PersistSettings]
    }

    /// Toggle the session kind and start the engine for the new kind.
    /// Alert state must already be cleared and pending work cancelled.
    fn advance_session(&mut self, count: bool, effects: &mut Vec<Effect>) {
        let next = self.settings.current_session.toggled();
        tracing::info!(
            from = self.settings.current_session.label(),
            to = next.label(),
            "switching session"
        );
        self.settings.current_session = next;
        if count {
            self.settings.session_count += 1;
        }
        self.countdown.reset();
        self.stopwatch.reset();
        match next {
            SessionKind::Sitting => self.countdown.start(),
            SessionKind::Standing => self.stopwatch.start(),
        }
        effects.push(Effect::PersistSettings);
        effects.push(Effect::SyncTicker);
    }

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self, announcer: &Announcer) -> SessionSnapshot {
        let display_time = match self.settings.current_session {
            SessionKind::Sitting => format_mm_ss(self.countdown.remaining_secs() as u64),
            SessionKind::Standing => format_mm_ss(self.stopwatch.elapsed_secs()),
        };
        SessionSnapshot {
            session: self.settings.current_session,
            countdown_status: self.countdown.status(),
            remaining_secs: self.countdown.remaining_secs(),
            duration_secs: self.countdown.duration_secs(),
            progress: self.countdown.progress(),
            stopwatch_status: self.stopwatch.status(),
            elapsed_secs: self.stopwatch.elapsed_secs(),
            display_time,
            alert_visible: self.alert_visible,
            speech_supported: announcer.is_supported(),
            speaking: announcer.is_speaking(),
            speech_error: announcer.last_error(),
            voices: announcer.voices(),
            settings: self.settings.clone(),
        }
    }
}

/// Immutable view of the whole session, published after every applied
/// command. The presentation layer renders from this and nothing else.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session: SessionKind,
    pub countdown_status: TimerStatus,
    pub remaining_secs: u32,
    pub duration_secs: u32,
    /// Percentage of the countdown already elapsed, 0-100
    pub progress: f32,
    pub stopwatch_status: TimerStatus,
    pub elapsed_secs: u64,
    /// `MM:SS` for the active session's engine
    pub display_time: String,
    pub alert_visible: bool,
    pub speech_supported: bool,
    pub speaking: bool,
    pub speech_error: Option<String>,
    pub voices: Vec<Voice>,
    pub settings: AppSettings,
}
