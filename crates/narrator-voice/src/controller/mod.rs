//! Playback controller: turns a list of narrative units into an
//! interruptible, resumable audio presentation.
//!
//! A single tokio task owns the state and the output device. The cloneable
//! [`PlaybackController`] handle sends it requests and observes snapshots
//! through a `watch` channel, so every shell sees the same session.

mod actor;
mod messages;
mod tokens;

use std::sync::Arc;
use std::time::Duration;

use narrator_core::{
    NarrativeUnit, PlaybackSnapshot, PlaybackStatus, SpeechSynthesizerPort, Voice, clamp_speed,
};
use tokio::sync::{mpsc, oneshot, watch};

use crate::output::AudioOutput;
use actor::Actor;
use messages::{Command, ControllerMsg};

/// Sample rate of the speech provider's PCM.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Pause between one unit ending and the next starting.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(600);

/// Controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Sample rate the synthesized PCM is decoded at.
    pub sample_rate: u32,
    /// Channel count of the synthesized PCM.
    pub channels: u16,
    /// Pause before auto-advancing. Zero advances immediately.
    pub advance_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            sample_rate: SPEECH_SAMPLE_RATE,
            channels: 1,
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

impl ControllerConfig {
    #[must_use]
    pub const fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }
}

/// Handle to the playback controller task.
///
/// Operations never fail: each resolves to the snapshot as it stands once
/// the request has been applied. Failures on the playback path surface as
/// `status == Error` with [`PlaybackSnapshot::error`] set.
///
/// Must be created inside a tokio runtime.
#[derive(Clone)]
pub struct PlaybackController {
    tx: mpsc::UnboundedSender<ControllerMsg>,
    state: watch::Receiver<PlaybackSnapshot>,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("status", &self.state.borrow().status)
            .finish_non_exhaustive()
    }
}

impl PlaybackController {
    /// Start a controller with an empty session.
    pub fn spawn(
        synth: Arc<dyn SpeechSynthesizerPort>,
        output: Box<dyn AudioOutput>,
        config: ControllerConfig,
    ) -> Self {
        Self::spawn_with_state(synth, output, config, PlaybackSnapshot::default())
    }

    /// Start a controller from a restored session.
    ///
    /// The restored status is always `Idle` with no error; nothing plays
    /// until the listener asks for it.
    pub fn spawn_with_state(
        synth: Arc<dyn SpeechSynthesizerPort>,
        output: Box<dyn AudioOutput>,
        config: ControllerConfig,
        restored: PlaybackSnapshot,
    ) -> Self {
        let current_index = if restored.current_index < restored.units.len() {
            restored.current_index
        } else {
            0
        };
        let initial = PlaybackSnapshot {
            current_index,
            status: PlaybackStatus::Idle,
            playback_speed: clamp_speed(restored.playback_speed),
            error: None,
            ..restored
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let (publisher, state) = watch::channel(initial.clone());
        let actor = Actor::new(initial, output, synth, config, publisher, tx.downgrade());
        tokio::spawn(actor.run(rx));

        Self { tx, state }
    }

    /// The current snapshot.
    pub fn state(&self) -> PlaybackSnapshot {
        self.state.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.state.clone()
    }

    /// Replace the units, stopping audio. Index resets to 0, status to `Idle`.
    pub async fn set_units(&self, units: Vec<NarrativeUnit>) -> PlaybackSnapshot {
        self.request(Command::SetUnits(units)).await
    }

    /// Pause when playing; otherwise (re)start the current unit.
    pub async fn toggle_playback(&self) -> PlaybackSnapshot {
        self.request(Command::Toggle).await
    }

    /// Play the following unit, if there is one.
    pub async fn next_unit(&self) -> PlaybackSnapshot {
        self.request(Command::Next).await
    }

    /// Play the preceding unit, if there is one.
    pub async fn prev_unit(&self) -> PlaybackSnapshot {
        self.request(Command::Prev).await
    }

    /// Play the unit at `index`, if it exists.
    pub async fn seek(&self, index: usize) -> PlaybackSnapshot {
        self.request(Command::Seek(index)).await
    }

    /// Change the playback rate. Active audio is retuned without restarting.
    pub async fn set_speed(&self, rate: f32) -> PlaybackSnapshot {
        self.request(Command::SetSpeed(rate)).await
    }

    /// Select a voice for every unit, or `None` to use each unit's casting.
    ///
    /// Restarts the current unit when it is playing or being prepared.
    pub async fn set_voice(&self, voice: Option<Voice>) -> PlaybackSnapshot {
        self.request(Command::SetVoice(voice)).await
    }

    /// Acquire the audio device ahead of the first playback.
    pub async fn init_audio(&self) -> PlaybackSnapshot {
        self.request(Command::InitAudio).await
    }

    /// Halt audio and cancel in-flight synthesis.
    pub async fn stop(&self) -> PlaybackSnapshot {
        self.request(Command::Stop).await
    }

    /// Stop the controller task and release the audio device.
    ///
    /// Other handles keep answering with the last published snapshot.
    pub async fn shutdown(&self) {
        let (done, rx) = oneshot::channel();
        if self.tx.send(ControllerMsg::Shutdown { done }).is_ok() {
            let _ = rx.await;
        }
    }

    async fn request(&self, command: Command) -> PlaybackSnapshot {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(ControllerMsg::Command { command, reply })
            .is_err()
        {
            tracing::debug!("Playback controller is gone");
            return self.state();
        }
        rx.await.unwrap_or_else(|_| self.state())
    }
}
