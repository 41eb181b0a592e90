//! The controller task: owns the session state and the output device.
//!
//! ```text
//!            toggle / next / prev / seek
//!   Idle ─────────────────────────────────▶ Processing ──speech ready──▶ Playing
//!    ▲                                        │  ▲                         │  │
//!    │                                  error │  └── pause elapsed ◀───────┘  │ toggle / stop
//!    └──── last unit finished ─────────── Error                               ▼
//!                                                                           Paused
//! ```
//!
//! Every attempt to play a unit runs under a fresh token. Synthesis
//! results, completion notices and scheduled advances carry their token and
//! are dropped unless it is still the latest.

use std::sync::Arc;

use narrator_core::{
    PlaybackError, PlaybackErrorKind, PlaybackSnapshot, PlaybackStatus, PlaybackToken,
    SpeechSynthesizerPort, SynthesisError, clamp_speed, effective_voice,
};
use tokio::sync::{mpsc, oneshot, watch};

use super::ControllerConfig;
use super::messages::{Command, ControllerMsg};
use super::tokens::TokenIssuer;
use crate::decoder::{AudioBuffer, decode_base64_pcm};
use crate::output::{AudioOutput, PlaybackDoneCallback};

/// Shown when synthesis or decoding fails for a reason other than quota.
const PREPARE_FAILED: &str = "Failed to prepare the narration for this segment.";

/// Shown when the speech provider's usage limit is exhausted.
const QUOTA_EXHAUSTED: &str =
    "The speech service is over its usage limit. Wait a moment or switch to another API key.";

/// Shown when the audio device cannot be opened or refuses a buffer.
const OUTPUT_FAILED: &str = "The audio device is unavailable.";

pub(super) struct Actor {
    state: PlaybackSnapshot,
    output: Box<dyn AudioOutput>,
    synth: Arc<dyn SpeechSynthesizerPort>,
    tokens: TokenIssuer,
    config: ControllerConfig,
    publisher: watch::Sender<PlaybackSnapshot>,
    inbox: mpsc::WeakUnboundedSender<ControllerMsg>,
}

impl Actor {
    pub(super) fn new(
        state: PlaybackSnapshot,
        output: Box<dyn AudioOutput>,
        synth: Arc<dyn SpeechSynthesizerPort>,
        config: ControllerConfig,
        publisher: watch::Sender<PlaybackSnapshot>,
        inbox: mpsc::WeakUnboundedSender<ControllerMsg>,
    ) -> Self {
        Self {
            state,
            output,
            synth,
            tokens: TokenIssuer::new(),
            config,
            publisher,
            inbox,
        }
    }

    pub(super) async fn run(mut self, mut rx: mpsc::UnboundedReceiver<ControllerMsg>) {
        let mut done: Option<oneshot::Sender<()>> = None;

        while let Some(msg) = rx.recv().await {
            match msg {
                ControllerMsg::Command { command, reply } => {
                    self.apply(command);
                    self.publish();
                    let _ = reply.send(self.state.clone());
                }
                ControllerMsg::SpeechReady {
                    token,
                    index,
                    result,
                } => {
                    self.on_speech_ready(token, index, result);
                    self.publish();
                }
                ControllerMsg::PlaybackFinished { token } => {
                    self.on_playback_finished(token);
                    self.publish();
                }
                ControllerMsg::AdvanceDue { token, index } => {
                    self.on_advance_due(token, index);
                    self.publish();
                }
                ControllerMsg::Shutdown { done: reply } => {
                    self.apply(Command::Stop);
                    self.publish();
                    done = Some(reply);
                    break;
                }
            }
        }

        self.halt();
        drop(self.output);
        tracing::debug!("Playback controller stopped");
        if let Some(done) = done {
            let _ = done.send(());
        }
    }

    // ── Commands ───────────────────────────────────────────────────

    fn apply(&mut self, command: Command) {
        tracing::trace!(command = command.name(), status = ?self.state.status, "Controller command");
        match command {
            Command::SetUnits(units) => {
                self.halt();
                tracing::info!(units = units.len(), "Loaded narration units");
                self.state.units = Arc::from(units);
                self.state.current_index = 0;
                self.state.status = PlaybackStatus::Idle;
                self.state.error = None;
            }
            Command::Toggle => {
                if self.state.status == PlaybackStatus::Playing {
                    self.halt();
                    self.state.status = PlaybackStatus::Paused;
                } else {
                    self.play_unit(self.state.current_index);
                }
            }
            Command::Next => {
                let next = self.state.current_index + 1;
                if next < self.state.units.len() {
                    self.play_unit(next);
                }
            }
            Command::Prev => {
                if let Some(prev) = self.state.current_index.checked_sub(1) {
                    self.play_unit(prev);
                }
            }
            Command::Seek(index) => {
                if index < self.state.units.len() {
                    self.play_unit(index);
                }
            }
            Command::SetSpeed(rate) => {
                let speed = clamp_speed(rate);
                self.state.playback_speed = speed;
                self.output.set_speed(speed);
            }
            Command::SetVoice(voice) => {
                self.state.selected_voice = voice;
                if matches!(
                    self.state.status,
                    PlaybackStatus::Playing | PlaybackStatus::Processing
                ) {
                    self.play_unit(self.state.current_index);
                }
            }
            Command::InitAudio => {
                if let Err(e) = self.output.resume() {
                    tracing::warn!(error = %e, "Failed to open audio output");
                    self.fail(PlaybackError::new(PlaybackErrorKind::Output, OUTPUT_FAILED));
                }
            }
            Command::Stop => {
                self.halt();
                if matches!(
                    self.state.status,
                    PlaybackStatus::Playing | PlaybackStatus::Processing
                ) {
                    self.state.status = PlaybackStatus::Paused;
                }
            }
        }
    }

    // ── Play-unit algorithm ────────────────────────────────────────

    /// Invalidate in-flight work and silence the output.
    fn halt(&mut self) -> PlaybackToken {
        let token = self.tokens.issue();
        self.output.stop();
        token
    }

    fn play_unit(&mut self, index: usize) {
        let token = self.halt();

        let Some(unit) = self.state.units.get(index) else {
            tracing::debug!(index, "No unit to play");
            return;
        };
        let text = unit.combined_narrative.clone();
        let voice = effective_voice(self.state.selected_voice, unit.voice_preference);

        self.state.current_index = index;
        self.state.status = PlaybackStatus::Processing;
        self.state.error = None;

        if let Err(e) = self.output.resume() {
            tracing::warn!(error = %e, "Failed to open audio output");
            self.fail(PlaybackError::new(PlaybackErrorKind::Output, OUTPUT_FAILED));
            return;
        }

        tracing::debug!(%token, index, voice = voice.name(), "Preparing unit");

        let synth = Arc::clone(&self.synth);
        let tokens = self.tokens.clone();
        let inbox = self.inbox.clone();
        let (sample_rate, channels) = (self.config.sample_rate, self.config.channels);

        tokio::spawn(async move {
            let outcome = synth.synthesize(&text, voice).await;

            if !tokens.is_current(token) {
                tracing::debug!(%token, index, "Discarding stale synthesis result");
                return;
            }

            let result = match outcome {
                Ok(payload) => decode_base64_pcm(&payload, sample_rate, channels).map_err(|e| {
                    tracing::warn!(%token, index, error = %e, "Failed to decode speech");
                    PlaybackError::new(PlaybackErrorKind::Decode, PREPARE_FAILED)
                }),
                Err(SynthesisError::QuotaExhausted { attempts, message }) => {
                    tracing::warn!(%token, index, attempts, %message, "Speech quota exhausted");
                    Err(PlaybackError::new(PlaybackErrorKind::QuotaExhausted, QUOTA_EXHAUSTED))
                }
                Err(e) => {
                    tracing::warn!(%token, index, error = %e, "Speech synthesis failed");
                    Err(PlaybackError::new(PlaybackErrorKind::Synthesis, PREPARE_FAILED))
                }
            };

            if let Some(tx) = inbox.upgrade() {
                let _ = tx.send(ControllerMsg::SpeechReady {
                    token,
                    index,
                    result,
                });
            }
        });
    }

    fn on_speech_ready(
        &mut self,
        token: PlaybackToken,
        index: usize,
        result: Result<AudioBuffer, PlaybackError>,
    ) {
        if !self.tokens.is_current(token) {
            tracing::debug!(%token, index, "Discarding stale speech");
            return;
        }

        match result {
            Ok(buffer) => {
                let duration_ms = u64::try_from(buffer.duration().as_millis()).unwrap_or(u64::MAX);
                let on_done = self.completion_callback(token);
                match self.output.play(buffer, self.state.playback_speed, on_done) {
                    Ok(()) => {
                        self.state.status = PlaybackStatus::Playing;
                        tracing::info!(%token, index, duration_ms, "Narrating unit");
                    }
                    Err(e) => {
                        tracing::warn!(%token, index, error = %e, "Audio output refused buffer");
                        self.fail(PlaybackError::new(PlaybackErrorKind::Output, OUTPUT_FAILED));
                    }
                }
            }
            Err(error) => self.fail(error),
        }
    }

    fn on_playback_finished(&mut self, token: PlaybackToken) {
        if !self.tokens.is_current(token) || self.state.status != PlaybackStatus::Playing {
            tracing::debug!(%token, status = ?self.state.status, "Ignoring stale completion");
            return;
        }

        let next = self.state.current_index + 1;
        if next >= self.state.units.len() {
            tracing::info!("Reached the last unit");
            self.state.status = PlaybackStatus::Idle;
            return;
        }

        let delay = self.config.advance_delay;
        if delay.is_zero() {
            self.play_unit(next);
            return;
        }

        let inbox = self.inbox.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = inbox.upgrade() {
                let _ = tx.send(ControllerMsg::AdvanceDue { token, index: next });
            }
        });
    }

    fn on_advance_due(&mut self, token: PlaybackToken, index: usize) {
        if !self.tokens.is_current(token) || self.state.status != PlaybackStatus::Playing {
            tracing::debug!(%token, index, "Ignoring stale advance");
            return;
        }
        self.play_unit(index);
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn completion_callback(&self, token: PlaybackToken) -> PlaybackDoneCallback {
        let inbox = self.inbox.clone();
        Box::new(move || {
            if let Some(tx) = inbox.upgrade() {
                let _ = tx.send(ControllerMsg::PlaybackFinished { token });
            }
        })
    }

    fn fail(&mut self, error: PlaybackError) {
        self.state.status = PlaybackStatus::Error;
        self.state.error = Some(error);
    }

    fn publish(&self) {
        self.publisher.send_if_modified(|published| {
            if *published == self.state {
                false
            } else {
                published.clone_from(&self.state);
                true
            }
        });
    }
}
