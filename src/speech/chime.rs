/// Chime announcement engine
///
/// Plays a preloaded attention tone through the audio device instead of
/// synthesized speech. Useful on kiosks without a TTS engine: patients still
/// hear a call sound while the pop-up shows who is being called.
///
/// Playback runs on a dedicated thread because audio output streams are tied
/// to the thread that opened them; requests and outcomes cross over channels.
use std::path::Path;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::error::SpeechError;

use super::voices::Voice;
use super::{SpeechCapability, SpeechOutcome, SpeechRequest};

/// Chime-based [`SpeechCapability`]
///
/// The request text and voice are ignored; every call plays the same tone.
/// Offers no voices, so the runner always proceeds without an override.
pub struct ChimeSpeech {
    play_tx: Sender<Sender<SpeechOutcome>>,
}

impl ChimeSpeech {
    /// Load the chime file and start the playback thread.
    ///
    /// The audio bytes are decoded once up front so a corrupt file fails
    /// here rather than on the first call.
    pub fn new(path: &Path) -> Result<Self, SpeechError> {
        let data = std::fs::read(path).map_err(|e| SpeechError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        let cursor = std::io::Cursor::new(data.clone());
        Decoder::new(cursor).map_err(|e| SpeechError::DecodeFailed(Box::new(e)))?;

        tracing::info!(
            path = %path.display(),
            bytes = data.len(),
            "Loaded chime audio"
        );

        let data = Arc::new(data);
        let (play_tx, play_rx) = unbounded();
        let (init_tx, init_rx) = bounded(1);

        thread::spawn(move || playback_loop(data, play_rx, init_tx));

        match init_rx.recv() {
            Ok(Ok(())) => Ok(Self { play_tx }),
            Ok(Err(e)) => Err(e),
            // Thread died before reporting; no usable audio device
            Err(_) => Err(SpeechError::Unavailable),
        }
    }
}

impl SpeechCapability for ChimeSpeech {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&self, _request: SpeechRequest) -> Result<Receiver<SpeechOutcome>, SpeechError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.play_tx
            .send(reply_tx)
            .map_err(|_| SpeechError::Unavailable)?;
        Ok(reply_rx)
    }
}

fn playback_loop(
    data: Arc<Vec<u8>>,
    play_rx: Receiver<Sender<SpeechOutcome>>,
    init_tx: Sender<Result<(), SpeechError>>,
) {
    let (stream, handle): (OutputStream, OutputStreamHandle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = init_tx.send(Err(SpeechError::StreamInitFailed(Box::new(e))));
            return;
        }
    };
    // Keep the stream alive for the lifetime of the loop
    let _stream = stream;

    let sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            let _ = init_tx.send(Err(SpeechError::StreamInitFailed(Box::new(e))));
            return;
        }
    };

    let _ = init_tx.send(Ok(()));
    tracing::debug!("Chime playback thread ready");

    // Exits when the ChimeSpeech handle is dropped and the channel closes
    while let Ok(reply) = play_rx.recv() {
        let cursor = std::io::Cursor::new((*data).clone());
        match Decoder::new(cursor) {
            Ok(source) => {
                sink.append(source);
                sink.sleep_until_end();
                let _ = reply.send(SpeechOutcome::Completed);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chime decode failed during playback");
                let _ = reply.send(SpeechOutcome::Errored);
            }
        }
    }

    tracing::debug!("Chime playback thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    // Playback tests need an audio device; only the failure paths are
    // covered here.

    #[test]
    fn test_missing_file_fails_to_load() {
        let result = ChimeSpeech::new(Path::new("/nonexistent/chime.mp3"));
        assert!(matches!(result, Err(SpeechError::LoadFailed { .. })));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let dir = std::env::temp_dir();
        let path = dir.join("tv-queue-caller-test-garbage.mp3");
        std::fs::write(&path, b"not audio at all").unwrap();

        let result = ChimeSpeech::new(&path);
        assert!(matches!(result, Err(SpeechError::DecodeFailed(_))));

        let _ = std::fs::remove_file(&path);
    }
}
