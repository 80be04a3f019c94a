//! Commands into, and effects out of, the session state machine.

/// Everything that can happen to a session. Front-end controls, the tick
/// loop, and the armed delays all funnel through this one enum so the
/// state machine stays the single owner of all mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Start the active engine
    Start,
    /// Pause the active engine
    Pause,
    /// Stop the active engine (alias of reset)
    Stop,
    /// Reset the active engine
    Reset,
    /// Choose one of the fixed presets by its duration in seconds
    SelectPreset { seconds: u32 },
    /// Developer override: any duration, bypassing preset validation
    SetDuration { seconds: u32 },
    SetSpeechEnabled(bool),
    /// None selects the platform default voice
    SelectVoice(Option<String>),
    /// Update any subset of the speech parameters
    SetSpeechParams {
        rate: Option<f32>,
        pitch: Option<f32>,
        volume: Option<f32>,
    },
    /// Clear the completion alert and advance to the next session kind.
    /// Sent manually or by the dismissal dwell expiring.
    DismissAlert,
    /// Advance to the next session kind immediately, bypassing the alert
    SwitchMode,
    /// One second elapsed (from the tick loop)
    Tick,
    /// The armed speech delay fired
    AnnounceCompletion,
    /// Stop the apply loop and all scheduled work
    Shutdown,
}

/// Side effects the runner executes after a command is applied. Order
/// matters: `CancelPending` always precedes any effect that starts new
/// work, so stale speech or dismissals can never outlive a mode switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the whole settings record back to disk
    PersistSettings,
    /// Re-evaluate whether the 1 s tick loop should be running
    SyncTicker,
    /// Arm the speech-start delay and the dismissal dwell
    ArmCompletion,
    /// Abort armed delays and stop in-flight speech
    CancelPending,
    /// Speak an announcement with the current speech settings
    Speak { text: &'static str },
}
