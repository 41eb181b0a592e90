//! The `AudioOutput` seam between the controller and a sound device.
//!
//! The controller owns exactly one output and drives it from a single task,
//! so methods take `&mut self`. Implementations must not block for longer
//! than it takes to hand a buffer to the device.

use crate::audio_thread::AudioThreadHandle;
use crate::decoder::AudioBuffer;
use crate::error::VoiceError;

/// Callback invoked when a buffer finishes playing on its own.
///
/// Never invoked for a buffer that was stopped or replaced.
pub type PlaybackDoneCallback = Box<dyn FnOnce() + Send + 'static>;

/// A device that plays one buffer at a time.
///
/// # Design Rules
///
/// - `play` replaces whatever is playing; the replaced buffer's callback is dropped unfired
/// - `stop` detaches the pending callback before halting audio
/// - `set_speed` retunes the active buffer in place
pub trait AudioOutput: Send {
    /// Acquire or resume the device. Calling it again is a no-op.
    fn resume(&mut self) -> Result<(), VoiceError>;

    /// Start playing `buffer` at `speed`, calling `on_done` when it drains.
    fn play(
        &mut self,
        buffer: AudioBuffer,
        speed: f32,
        on_done: PlaybackDoneCallback,
    ) -> Result<(), VoiceError>;

    /// Halt playback without firing the completion callback.
    fn stop(&mut self);

    /// Change the rate of the active buffer.
    fn set_speed(&mut self, speed: f32);
}

// ── Default device ─────────────────────────────────────────────────

/// The system's default output device, opened lazily on first `resume`.
///
/// The rodio stream lives on a dedicated thread (see
/// [`AudioThreadHandle`]); this type is the `Send` proxy the controller holds.
#[derive(Default)]
pub struct DeviceOutput {
    thread: Option<AudioThreadHandle>,
}

impl DeviceOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&AudioThreadHandle, VoiceError> {
        if self.thread.is_none() {
            self.thread = Some(AudioThreadHandle::spawn()?);
        }
        self.thread.as_ref().ok_or(VoiceError::AudioThreadDied)
    }
}

impl AudioOutput for DeviceOutput {
    fn resume(&mut self) -> Result<(), VoiceError> {
        self.handle().map(|_| ())
    }

    fn play(
        &mut self,
        buffer: AudioBuffer,
        speed: f32,
        on_done: PlaybackDoneCallback,
    ) -> Result<(), VoiceError> {
        let result = self.handle()?.play(buffer, speed, on_done);
        if matches!(result, Err(VoiceError::AudioThreadDied)) {
            // Reopen on the next attempt.
            self.thread = None;
        }
        result
    }

    fn stop(&mut self) {
        if let Some(thread) = &self.thread {
            thread.stop();
        }
    }

    fn set_speed(&mut self, speed: f32) {
        if let Some(thread) = &self.thread {
            thread.set_speed(speed);
        }
    }
}
