//! Dedicated audio thread that keeps `!Send` rodio resources off the async runtime.
//!
//! `rodio::OutputStream` is `!Send` on some platforms. Rather than using
//! `unsafe impl Send`, the stream is confined to one OS thread and every
//! operation goes through an [`AudioCommand`].

use std::sync::mpsc;
use std::thread;

use crate::decoder::AudioBuffer;
use crate::error::VoiceError;
use crate::output::PlaybackDoneCallback;
use crate::playback::AudioPlayback;

// ── Commands ───────────────────────────────────────────────────────

/// A command sent from the controller to the audio thread.
enum AudioCommand {
    /// Replace the active buffer.
    Play {
        buffer: AudioBuffer,
        speed: f32,
        on_done: PlaybackDoneCallback,
        reply: mpsc::Sender<Result<(), VoiceError>>,
    },

    /// Stop playback (fire-and-forget).
    Stop,

    /// Retune the active buffer (fire-and-forget).
    SetSpeed(f32),

    /// Shut down the audio thread, releasing the device.
    Shutdown,
}

// ── Handle (Send + Sync proxy) ─────────────────────────────────────

/// `Send + Sync` handle to the dedicated audio thread.
///
/// Request/reply methods block the caller until the audio thread responds,
/// which takes microseconds plus the rodio call itself.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread, open the output device, and return the handle.
    ///
    /// Device errors are propagated back through a one-shot init channel.
    pub fn spawn() -> Result<Self, VoiceError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), VoiceError>>();

        let thread = thread::Builder::new()
            .name("narrator-audio".into())
            .spawn(move || Self::run(cmd_rx, init_tx))
            .map_err(|e| VoiceError::OutputStreamError(format!("failed to spawn audio thread: {e}")))?;

        init_rx.recv().map_err(|_| VoiceError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Replace the active buffer with `buffer`.
    pub fn play(
        &self,
        buffer: AudioBuffer,
        speed: f32,
        on_done: PlaybackDoneCallback,
    ) -> Result<(), VoiceError> {
        let (reply, rx) = mpsc::channel();
        self.cmd_tx
            .send(AudioCommand::Play {
                buffer,
                speed,
                on_done,
                reply,
            })
            .map_err(|_| VoiceError::AudioThreadDied)?;
        rx.recv().map_err(|_| VoiceError::AudioThreadDied)?
    }

    /// Stop any active playback immediately.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Stop);
    }

    /// Change the speed of the active buffer.
    pub fn set_speed(&self, speed: f32) {
        let _ = self.cmd_tx.send(AudioCommand::SetSpeed(speed));
    }

    // ── Audio thread event loop ────────────────────────────────────

    fn run(cmd_rx: mpsc::Receiver<AudioCommand>, init_tx: mpsc::Sender<Result<(), VoiceError>>) {
        let mut playback = match AudioPlayback::new() {
            Ok(p) => p,
            Err(e) => {
                let _ = init_tx.send(Err(e));
                return;
            }
        };

        if init_tx.send(Ok(())).is_err() {
            return;
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::Play {
                    buffer,
                    speed,
                    on_done,
                    reply,
                } => {
                    let _ = reply.send(playback.play(buffer, speed, on_done));
                }
                AudioCommand::Stop => playback.stop(),
                AudioCommand::SetSpeed(speed) => playback.set_speed(speed),
                AudioCommand::Shutdown => break,
            }
        }

        playback.stop();
        tracing::debug!("Audio thread shutting down");
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        // The thread may already be gone.
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
