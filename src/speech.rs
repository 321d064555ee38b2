//! Spoken output
//!
//! Speech is fire-and-forget: failures are logged and never reach the
//! advisory flow.

use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// Text-to-speech sink
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str);

    /// True when speaking is a no-op and no work should be queued
    fn is_silent(&self) -> bool {
        false
    }
}

/// Voice parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechSettings {
    /// Words per minute
    pub rate: u32,
    /// 0.0 (silent) to 1.0 (full volume)
    pub volume: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self { rate: 150, volume: 0.9 }
    }
}

/// Speaks through an espeak-compatible command (`-s <rate> -a <amplitude>`).
///
/// Blocks until playback finishes.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    settings: SpeechSettings,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, settings: SpeechSettings) -> Self {
        Self {
            program: program.into(),
            settings,
        }
    }

    /// Command-line arguments for one utterance
    pub fn args(&self, text: &str) -> Vec<String> {
        // espeak amplitude is 0-200 with 100 as normal volume
        let amplitude = (self.settings.volume.clamp(0.0, 2.0) * 100.0).round() as u32;
        vec![
            "-s".to_string(),
            self.settings.rate.to_string(),
            "-a".to_string(),
            amplitude.to_string(),
            text.to_string(),
        ]
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let status = Command::new(&self.program)
            .args(self.args(text))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(s) if s.success() => tracing::debug!("Spoke {} chars via {}", text.len(), self.program),
            Ok(s) => tracing::warn!("Speech command {} exited with {}", self.program, s),
            Err(e) => tracing::warn!("Failed to run speech command {}: {}", self.program, e),
        }
    }
}

/// Discards everything (speech disabled)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, _text: &str) {}

    fn is_silent(&self) -> bool {
        true
    }
}

/// Speak each line in order
pub fn narrate(speaker: &dyn Speaker, lines: &[String]) {
    for line in lines {
        speaker.speak(line);
    }
}

/// Single background worker that speaks one narration at a time.
///
/// Narrations are played in the order they were queued and never overlap.
/// The worker exits when the last queue handle is dropped.
#[derive(Debug, Clone)]
pub struct SpeechQueue {
    tx: mpsc::Sender<Vec<String>>,
}

impl SpeechQueue {
    pub fn spawn(speaker: Arc<dyn Speaker>) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Vec<String>>();
        thread::Builder::new()
            .name("speech".to_string())
            .spawn(move || {
                for lines in rx {
                    narrate(speaker.as_ref(), &lines);
                }
            })?;
        Ok(Self { tx })
    }

    /// Queue a narration without waiting for playback
    pub fn enqueue(&self, lines: Vec<String>) {
        if self.tx.send(lines).is_err() {
            tracing::warn!("Speech worker has stopped; dropping narration");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSpeaker {
        spoken: Mutex<Vec<String>>,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }
    }

    #[test]
    fn test_narrate_preserves_order() {
        let speaker = RecordingSpeaker::default();
        let lines = vec!["first".to_string(), "second".to_string()];
        narrate(&speaker, &lines);
        assert_eq!(*speaker.spoken.lock().unwrap(), lines);
    }

    #[test]
    fn test_default_voice_args() {
        let speaker = CommandSpeaker::new("espeak", SpeechSettings::default());
        assert_eq!(speaker.args("hello"), vec!["-s", "150", "-a", "90", "hello"]);
    }

    #[test]
    fn test_missing_program_does_not_panic() {
        let speaker = CommandSpeaker::new("definitely-not-a-tts-binary", SpeechSettings::default());
        speaker.speak("The recommended crop is rice");
    }

    #[test]
    fn test_silent_speaker() {
        narrate(&SilentSpeaker, &["anything".to_string()]);
        assert!(SilentSpeaker.is_silent());
        assert!(!CommandSpeaker::new("espeak", SpeechSettings::default()).is_silent());
    }

    /// Sleeps between the words of each utterance so overlap would show up
    struct SlowSpeaker(Mutex<mpsc::Sender<String>>);

    impl Speaker for SlowSpeaker {
        fn speak(&self, text: &str) {
            std::thread::sleep(std::time::Duration::from_millis(5));
            self.0.lock().unwrap().send(text.to_string()).unwrap();
        }
    }

    #[test]
    fn test_queue_plays_narrations_one_after_another() {
        let (tx, rx) = mpsc::channel();
        let queue = SpeechQueue::spawn(Arc::new(SlowSpeaker(Mutex::new(tx)))).unwrap();

        // Enqueue from several threads at once
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let queue = queue.clone();
                std::thread::spawn(move || {
                    queue.enqueue(vec![format!("{}-a", i), format!("{}-b", i), format!("{}-c", i)]);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let wait = std::time::Duration::from_secs(5);
        let spoken: Vec<String> = (0..12).map(|_| rx.recv_timeout(wait).unwrap()).collect();

        // Each narration's three lines are contiguous
        for chunk in spoken.chunks(3) {
            let prefix = chunk[0].trim_end_matches("-a");
            assert_eq!(
                chunk,
                [format!("{}-a", prefix), format!("{}-b", prefix), format!("{}-c", prefix)]
            );
        }
    }
}
