//! Sound player implementation using rodio.
//!
//! `RodioSoundPlayer` owns an output stream, which cannot move between
//! threads. The alert thread therefore creates its own player, plays to the
//! end and exits.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;

/// Volume applied to the generated tone.
const TONE_VOLUME: f32 = 0.25;

/// A sound player that uses rodio for audio playback.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays `source` and blocks until it has finished.
    ///
    /// A system sound that cannot be opened or decoded falls back to the
    /// generated tone.
    ///
    /// # Errors
    ///
    /// Returns an error if no sink can be created or the fallback fails too.
    pub fn play_to_end(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::System { path, name } => {
                debug!("Playing system sound: {}", name);
                match self.play_file(path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.should_fallback_to_tone() => {
                        warn!(
                            "Failed to play system sound '{}': {}, falling back to tone",
                            name, e
                        );
                        self.play_to_end(&SoundSource::tone())
                    }
                    Err(e) => Err(e),
                }
            }
            SoundSource::Tone {
                frequency_hz,
                duration,
            } => self.play_tone(*frequency_hz, *duration),
        }
    }

    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.sink()?;
        sink.append(decoder);
        sink.sleep_until_end();
        Ok(())
    }

    fn play_tone(&self, frequency_hz: f32, duration: Duration) -> Result<(), SoundError> {
        let tone = SineWave::new(frequency_hz)
            .take_duration(duration)
            .amplify(TONE_VOLUME);

        let sink = self.sink()?;
        sink.append(tone);
        sink.sleep_until_end();
        Ok(())
    }

    fn sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}
