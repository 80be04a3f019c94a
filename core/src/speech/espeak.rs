//! espeak-ng backend: synthesis and voice enumeration via subprocess.

use std::io::{Error, ErrorKind, Read, Result};
use std::process::{Command, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;

use super::backend::{SpeechBackend, SpeechParams, Voice};

/// Hard cap on a single synthesis run. Completion messages are a sentence
/// long; anything slower means the backend is wedged.
const SYNTH_TIMEOUT: Duration = Duration::from_secs(5);

/// espeak-ng's default speaking rate in words per minute.
const BASE_WPM: f32 = 175.0;

pub struct EspeakBackend {
    binary: String,
}

impl EspeakBackend {
    pub fn new() -> Self {
        Self {
            binary: "espeak-ng".to_string(),
        }
    }

    /// Map the normalized parameters onto espeak-ng's flag ranges:
    /// rate → words/min around 175, pitch [0,2] → 0..99, volume [0,1] → 0..100.
    fn args_for(params: &SpeechParams) -> [String; 3] {
        let wpm = (BASE_WPM * params.rate).round() as u32;
        let pitch = (params.pitch / 2.0 * 99.0).round() as u32;
        let amplitude = (params.volume * 100.0).round() as u32;
        [wpm.to_string(), pitch.to_string(), amplitude.to_string()]
    }
}

impl Default for EspeakBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechBackend for EspeakBackend {
    fn id(&self) -> &'static str {
        "espeak-ng"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
        params: &SpeechParams,
    ) -> Result<Vec<u8>> {
        let [wpm, pitch, amplitude] = Self::args_for(params);

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--stdout")
            .args(["-s", &wpm, "-p", &pitch, "-a", &amplitude]);
        if let Some(voice) = voice {
            cmd.args(["-v", voice]);
        }
        let mut child = cmd
            .arg(text)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain stdout while waiting; the WAV can exceed the pipe buffer
        // and a full pipe would stall the child until the timeout.
        let mut stdout = child.stdout.take();
        let reader = std::thread::spawn(move || {
            let mut wav = Vec::new();
            if let Some(out) = stdout.as_mut() {
                out.read_to_end(&mut wav)?;
            }
            Ok::<_, Error>(wav)
        });

        match child.wait_timeout(SYNTH_TIMEOUT)? {
            Some(status) => {
                if status.success() {
                    let wav = reader
                        .join()
                        .map_err(|_| Error::new(ErrorKind::Other, "stdout reader panicked"))??;
                    Ok(wav)
                } else {
                    let mut err_msg = String::new();
                    if let Some(mut stderr) = child.stderr.take() {
                        stderr.read_to_string(&mut err_msg).ok();
                    }
                    Err(Error::new(
                        ErrorKind::Other,
                        format!("espeak-ng error: {}", err_msg.trim()),
                    ))
                }
            }
            None => {
                let _ = child.kill();
                let _ = child.wait();
                Err(Error::new(
                    ErrorKind::TimedOut,
                    "espeak-ng timed out after 5s",
                ))
            }
        }
    }

    fn list_voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.binary).arg("--voices").output()?;
        if !output.status.success() {
            return Err(Error::new(
                ErrorKind::Other,
                format!(
                    "espeak-ng --voices failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        Ok(parse_voice_listing(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `espeak-ng --voices` output. Columns are
/// `Pty Language Age/Gender VoiceName File Other Languages`; the language
/// code doubles as the `-v` selector, so it becomes the voice id.
fn parse_voice_listing(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip(1) // header row
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 4 {
                return None;
            }
            Some(Voice {
                id: cols[1].to_string(),
                name: cols[3].replace('_', " "),
                language: cols[1].to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en-us           --/M      English_(America)  gmw/en-US            (en 10)
 2  en-gb           --/M      English_(Great_Britain) gmw/en-GB       (en 2)
";

    #[test]
    fn parses_voice_rows() {
        let voices = parse_voice_listing(SAMPLE);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[1].id, "en-us");
        assert_eq!(voices[1].name, "English (America)");
        assert_eq!(voices[1].language, "en-us");
    }

    #[test]
    fn skips_malformed_rows() {
        let voices = parse_voice_listing("header\n\n 5 af\n");
        assert!(voices.is_empty());
    }

    #[test]
    fn params_map_onto_espeak_ranges() {
        let [wpm, pitch, amp] = EspeakBackend::args_for(&SpeechParams::default());
        assert_eq!(wpm, "175");
        assert_eq!(pitch, "50");
        assert_eq!(amp, "100");

        let fast = SpeechParams {
            rate: 2.0,
            pitch: 2.0,
            volume: 0.5,
        };
        let [wpm, pitch, amp] = EspeakBackend::args_for(&fast);
        assert_eq!(wpm, "350");
        assert_eq!(pitch, "99");
        assert_eq!(amp, "50");
    }
}
