//! Audio playback via `rodio`.
//!
//! Lives on the audio thread; see [`crate::audio_thread`]. One sink plays
//! one narration buffer at a time.

use std::sync::{Arc, Mutex, PoisonError};

use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::decoder::AudioBuffer;
use crate::error::VoiceError;
use crate::output::PlaybackDoneCallback;

/// Slot holding the completion callback of the active buffer.
///
/// Whoever takes the callback out first decides its fate: the watcher
/// thread fires it, `stop` drops it.
type CompletionSlot = Arc<Mutex<Option<PlaybackDoneCallback>>>;

/// Audio playback handle on the default output device.
pub struct AudioPlayback {
    /// rodio output stream (must be kept alive).
    _stream: OutputStream,

    /// Handle used to create sinks.
    stream_handle: OutputStreamHandle,

    /// Current playback sink (if any).
    sink: Option<Arc<Sink>>,

    /// Completion callback of the current sink.
    completion: Option<CompletionSlot>,
}

impl AudioPlayback {
    /// Open the default output device.
    pub fn new() -> Result<Self, VoiceError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| VoiceError::OutputStreamError(e.to_string()))?;

        tracing::info!("Audio playback initialized on default output device");

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            completion: None,
        })
    }

    /// Replace any active playback with `buffer`.
    ///
    /// `on_done` fires from a watcher thread once the sink drains, unless
    /// [`stop`](Self::stop) or another `play` comes first.
    pub fn play(
        &mut self,
        buffer: AudioBuffer,
        speed: f32,
        on_done: PlaybackDoneCallback,
    ) -> Result<(), VoiceError> {
        self.stop();

        if buffer.is_empty() {
            tracing::debug!("Empty buffer, completing immediately");
            on_done();
            return Ok(());
        }

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| VoiceError::OutputStreamError(e.to_string()))?;
        sink.set_speed(speed.max(0.1));
        sink.append(rodio::buffer::SamplesBuffer::new(
            buffer.channels,
            buffer.sample_rate,
            buffer.samples,
        ));

        let sink = Arc::new(sink);
        let slot: CompletionSlot = Arc::new(Mutex::new(Some(on_done)));
        spawn_completion_watcher(Arc::clone(&sink), Arc::clone(&slot));

        self.sink = Some(sink);
        self.completion = Some(slot);

        tracing::debug!(speed, "Audio playback started");
        Ok(())
    }

    /// Stop any active playback immediately. The callback is dropped unfired.
    pub fn stop(&mut self) {
        if let Some(slot) = self.completion.take() {
            slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        }
        if let Some(sink) = self.sink.take() {
            sink.stop();
            tracing::debug!("Audio playback stopped");
        }
    }

    /// Set playback speed multiplier (1.0 = normal).
    pub fn set_speed(&self, speed: f32) {
        if let Some(sink) = &self.sink {
            sink.set_speed(speed.max(0.1));
        }
    }
}

/// Block a helper thread until the sink drains, then fire the callback if
/// it is still attached.
fn spawn_completion_watcher(sink: Arc<Sink>, slot: CompletionSlot) {
    // `sleep_until_end()` returns early when `stop()` drops the sources.
    let spawned = std::thread::Builder::new()
        .name("narrator-playback-watch".into())
        .spawn(move || {
            sink.sleep_until_end();
            let callback = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(cb) = callback {
                tracing::debug!("Playback finished naturally");
                cb();
            }
        });

    if let Err(e) = spawned {
        tracing::error!(error = %e, "Failed to spawn playback watcher");
    }
}
