pub mod session;
pub mod settings;
pub mod speech;
pub mod timer;

// Re-exports for convenience
pub use session::{SessionCommand, SessionOrchestrator, SessionSnapshot, SessionState};
pub use settings::SettingsStore;
pub use speech::{Announcer, AudioOutput, EspeakBackend, NullOutput, SpeechBackend, Voice};
pub use timer::{CountdownTimer, StopwatchTimer, TimerStatus, format_mm_ss};
