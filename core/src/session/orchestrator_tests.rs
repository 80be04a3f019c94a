use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stance_types::{AppSettings, SessionKind};
use tokio::sync::watch;

use crate::settings::SettingsStore;
use crate::speech::{Announcer, NullOutput, SpeechBackend, SpeechParams, Voice};
use crate::timer::TimerStatus;

use super::command::SessionCommand;
use super::orchestrator::{DISMISSAL_DWELL, SessionOrchestrator};
use super::state::SessionSnapshot;

/// Recording backend for end-to-end runs against a paused clock.
struct FakeBackend {
    requests: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self { requests: Mutex::new(Vec::new()) }
    }

    fn spoken(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl SpeechBackend for FakeBackend {
    fn id(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn synthesize(&self, text: &str, _: Option<&str>, _: &SpeechParams) -> io::Result<Vec<u8>> {
        self.requests.lock().unwrap().push(text.to_string());
        Ok(vec![0u8; 4])
    }

    fn list_voices(&self) -> io::Result<Vec<Voice>> {
        Ok(vec![Voice {
            id: "en-us".into(),
            name: "English (America)".into(),
            language: "en-us".into(),
        }])
    }
}

struct Harness {
    orchestrator: SessionOrchestrator,
    backend: Arc<FakeBackend>,
    store_path: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

fn harness(settings: AppSettings) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = SettingsStore::with_path(path.clone());
    store.save(&settings).unwrap();

    let backend = Arc::new(FakeBackend::new());
    let announcer = Arc::new(Announcer::with_parts(
        Arc::clone(&backend) as _,
        Arc::new(NullOutput::new()),
    ));

    Harness {
        orchestrator: SessionOrchestrator::start(store, announcer),
        backend,
        store_path: path,
        _dir: dir,
    }
}

fn short_session(speech: bool) -> AppSettings {
    AppSettings {
        timer_duration_secs: 3,
        speech_enabled: speech,
        ..Default::default()
    }
}

/// Await a snapshot satisfying `pred`; the paused clock auto-advances
/// through any pending timers along the way.
async fn wait_for<F>(rx: &mut watch::Receiver<SessionSnapshot>, pred: F) -> SessionSnapshot
where
    F: Fn(&SessionSnapshot) -> bool,
{
    tokio::time::timeout(Duration::from_secs(120), async {
        loop {
            let snap = rx.borrow_and_update().clone();
            if pred(&snap) {
                return snap;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("snapshot condition never satisfied")
}

/// Synthesis runs on a plain OS thread, so give it wall-clock time.
fn wait_spoken(backend: &FakeBackend, count: usize) -> Vec<String> {
    for _ in 0..400 {
        let spoken = backend.spoken();
        if spoken.len() >= count {
            return spoken;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("expected {count} utterances, got {:?}", backend.spoken());
}

#[tokio::test(start_paused = true)]
async fn countdown_completion_raises_alert_and_announces() {
    let h = harness(short_session(true));
    let mut rx = h.orchestrator.subscribe();

    h.orchestrator.send(SessionCommand::Start);
    let snap = wait_for(&mut rx, |s| s.alert_visible).await;
    assert_eq!(snap.remaining_secs, 0);
    assert_eq!(snap.countdown_status, TimerStatus::Completed);

    // Let the speech-start delay elapse.
    tokio::time::sleep(Duration::from_secs(1)).await;
    let spoken = wait_spoken(&h.backend, 1);
    assert_eq!(spoken, vec!["Time to stand up. Stretch your legs."]);
}

#[tokio::test(start_paused = true)]
async fn unacknowledged_alert_auto_dismisses_after_the_dwell() {
    let h = harness(short_session(false));
    let mut rx = h.orchestrator.subscribe();

    h.orchestrator.send(SessionCommand::Start);
    wait_for(&mut rx, |s| s.alert_visible).await;

    let snap = wait_for(&mut rx, |s| s.session == SessionKind::Standing).await;
    assert!(!snap.alert_visible);
    assert_eq!(snap.settings.session_count, 1);
    assert_eq!(snap.stopwatch_status, TimerStatus::Running);
}

#[tokio::test(start_paused = true)]
async fn manual_dismiss_preempts_announcement_and_dwell() {
    let h = harness(short_session(true));
    let mut rx = h.orchestrator.subscribe();

    h.orchestrator.send(SessionCommand::Start);
    wait_for(&mut rx, |s| s.alert_visible).await;

    // Dismiss before the speech delay fires.
    h.orchestrator.send(SessionCommand::DismissAlert);
    let snap = wait_for(&mut rx, |s| s.session == SessionKind::Standing).await;
    assert_eq!(snap.settings.session_count, 1);

    // Ride past where the delay and dwell would have fired; neither the
    // announcement nor a second dismissal may land.
    tokio::time::sleep(DISMISSAL_DWELL + Duration::from_secs(2)).await;
    let snap = wait_for(&mut rx, |s| s.elapsed_secs >= 2).await;
    assert_eq!(snap.settings.session_count, 1);
    assert_eq!(snap.session, SessionKind::Standing);
    assert!(h.backend.spoken().is_empty());
}

#[tokio::test(start_paused = true)]
async fn disabled_speech_still_auto_advances_silently() {
    let h = harness(short_session(false));
    let mut rx = h.orchestrator.subscribe();

    h.orchestrator.send(SessionCommand::Start);
    wait_for(&mut rx, |s| s.session == SessionKind::Standing).await;
    assert!(h.backend.spoken().is_empty());
}

#[tokio::test(start_paused = true)]
async fn standing_session_counts_up() {
    let h = harness(short_session(false));
    let mut rx = h.orchestrator.subscribe();

    h.orchestrator.send(SessionCommand::SwitchMode);
    let snap = wait_for(&mut rx, |s| s.elapsed_secs >= 3).await;
    assert_eq!(snap.session, SessionKind::Standing);
    assert_eq!(snap.display_time, format!("00:{:02}", snap.elapsed_secs));
}

#[tokio::test(start_paused = true)]
async fn stop_resets_the_countdown_and_parks_the_ticker() {
    let h = harness(AppSettings {
        timer_duration_secs: 30,
        ..Default::default()
    });
    let mut rx = h.orchestrator.subscribe();

    h.orchestrator.send(SessionCommand::Start);
    wait_for(&mut rx, |s| s.remaining_secs <= 27).await;

    h.orchestrator.send(SessionCommand::Stop);
    let snap = wait_for(&mut rx, |s| s.countdown_status == TimerStatus::Idle).await;
    assert_eq!(snap.remaining_secs, 30);

    // With nothing running the clock can coast without state changes.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.orchestrator.snapshot().remaining_secs, 30);
}

#[tokio::test(start_paused = true)]
async fn settings_changes_land_on_disk() {
    let h = harness(short_session(false));
    let mut rx = h.orchestrator.subscribe();

    h.orchestrator.send(SessionCommand::SetDuration { seconds: 2700 });
    h.orchestrator.send(SessionCommand::SelectVoice(Some("en-us".into())));
    wait_for(&mut rx, |s| {
        s.settings.timer_duration_secs == 2700 && s.settings.selected_voice.is_some()
    })
    .await;

    let on_disk = SettingsStore::with_path(h.store_path.clone()).load();
    assert_eq!(on_disk.timer_duration_secs, 2700);
    assert_eq!(on_disk.selected_voice.as_deref(), Some("en-us"));
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_loop() {
    let h = harness(short_session(false));
    h.orchestrator.send(SessionCommand::Start);
    h.orchestrator.shutdown();

    // Give the loop a chance to exit, then confirm sends are harmless.
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;
    h.orchestrator.send(SessionCommand::Tick);
    let _ = h.orchestrator.snapshot();
}
