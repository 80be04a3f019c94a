use std::sync::Arc;

use stance_core::speech::Announcer;
use stance_core::{SessionOrchestrator, SettingsStore};

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the session loop.
#[derive(Clone)]
pub struct CliContext {
    pub orchestrator: SessionOrchestrator,
    /// Kept alongside the orchestrator so commands can refresh the voice
    /// list without a round trip through the session loop.
    pub announcer: Arc<Announcer>,
}

impl CliContext {
    pub fn new() -> Self {
        let announcer = Arc::new(Announcer::new());
        let orchestrator = SessionOrchestrator::start(SettingsStore::new(), Arc::clone(&announcer));
        Self { orchestrator, announcer }
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
