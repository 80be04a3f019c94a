//! Audio playback seam.
//!
//! The rodio output stream must live on its own thread, so [`RodioOutput`]
//! runs one and feeds it over a channel. [`NullOutput`] swallows playback
//! for headless environments and tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink};

/// Playback sink the announcer writes synthesized WAV data to.
pub trait AudioOutput: Send + Sync {
    /// Start playing, replacing whatever is currently playing.
    fn play(&self, wav: Vec<u8>);

    /// Cancel in-flight playback; idempotent.
    fn stop(&self);

    /// True between playback start and end.
    fn is_playing(&self) -> bool;

    /// Most recent playback failure, if any.
    fn last_error(&self) -> Option<String>;
}

enum PlaybackCommand {
    Play(Vec<u8>),
    Stop,
}

/// Rodio-backed output on a dedicated audio thread.
pub struct RodioOutput {
    tx: Sender<PlaybackCommand>,
    playing: Arc<AtomicBool>,
    error: Arc<Mutex<Option<String>>>,
}

impl RodioOutput {
    pub fn spawn() -> Self {
        let (tx, rx) = channel::<PlaybackCommand>();
        let playing = Arc::new(AtomicBool::new(false));
        let error = Arc::new(Mutex::new(None));

        let thread_playing = Arc::clone(&playing);
        let thread_error = Arc::clone(&error);
        thread::spawn(move || audio_thread(rx, thread_playing, thread_error));

        Self { tx, playing, error }
    }

    fn set_error(&self, msg: String) {
        tracing::warn!(error = %msg, "audio playback error");
        *self.error.lock().unwrap() = Some(msg);
    }
}

impl AudioOutput for RodioOutput {
    fn play(&self, wav: Vec<u8>) {
        if self.tx.send(PlaybackCommand::Play(wav)).is_err() {
            self.playing.store(false, Ordering::SeqCst);
            self.set_error("audio thread is gone".to_string());
        }
    }

    fn stop(&self) {
        let _ = self.tx.send(PlaybackCommand::Stop);
        self.playing.store(false, Ordering::SeqCst);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn last_error(&self) -> Option<String> {
        self.error.lock().unwrap().clone()
    }
}

fn audio_thread(
    rx: Receiver<PlaybackCommand>,
    playing: Arc<AtomicBool>,
    error: Arc<Mutex<Option<String>>>,
) {
    // The stream handle must outlive every sink created from it.
    let stream = OutputStream::try_default();
    let (_stream, handle) = match stream {
        Ok(pair) => pair,
        Err(e) => {
            *error.lock().unwrap() = Some(format!("no audio output device: {}", e));
            // Drain commands so senders never block or observe a closed channel.
            while rx.recv().is_ok() {}
            return;
        }
    };

    let mut current: Option<Sink> = None;
    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(PlaybackCommand::Play(wav)) => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
                match Sink::try_new(&handle) {
                    Ok(sink) => match Decoder::new(Cursor::new(wav)) {
                        Ok(source) => {
                            sink.append(source);
                            playing.store(true, Ordering::SeqCst);
                            current = Some(sink);
                        }
                        Err(e) => {
                            *error.lock().unwrap() = Some(format!("failed to decode audio: {}", e));
                            playing.store(false, Ordering::SeqCst);
                        }
                    },
                    Err(e) => {
                        *error.lock().unwrap() = Some(format!("failed to open audio sink: {}", e));
                        playing.store(false, Ordering::SeqCst);
                    }
                }
            }
            Ok(PlaybackCommand::Stop) => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
                playing.store(false, Ordering::SeqCst);
            }
            Err(RecvTimeoutError::Timeout) => {
                // Utterance finished on its own
                if current.as_ref().is_some_and(|s| s.empty()) {
                    current = None;
                    playing.store(false, Ordering::SeqCst);
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Output that plays nothing. Used when no audio device is wanted and in
/// tests; records how many utterances were handed to it.
#[derive(Default)]
pub struct NullOutput {
    plays: std::sync::atomic::AtomicUsize,
}

impl NullOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play_count(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl AudioOutput for NullOutput {
    fn play(&self, _wav: Vec<u8>) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {}

    fn is_playing(&self) -> bool {
        false
    }

    fn last_error(&self) -> Option<String> {
        None
    }
}
