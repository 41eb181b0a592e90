//! Playback controller behavior against a scripted synthesizer and a fake
//! output device, on a paused clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use narrator_core::{
    NarrativeUnit, PlaybackError, PlaybackErrorKind, PlaybackSnapshot, PlaybackStatus,
    SpeechSynthesizerPort, SynthesisError, Voice,
};
use narrator_voice::{
    AudioBuffer, AudioOutput, ControllerConfig, PlaybackController, PlaybackDoneCallback,
    VoiceError,
};

// ── Scripted synthesizer ───────────────────────────────────────────

#[derive(Clone)]
enum Reply {
    /// Silence with this many samples; the count identifies the unit.
    Frames(usize),
    /// A raw payload returned as-is.
    Raw(&'static str),
    Quota,
    Fail,
}

#[derive(Clone)]
struct Script {
    delay: Duration,
    reply: Reply,
}

#[derive(Default)]
struct ScriptedSynth {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<(String, Voice)>>,
}

impl ScriptedSynth {
    fn with(mut self, text: &str, delay_ms: u64, reply: Reply) -> Self {
        self.scripts.insert(
            text.to_string(),
            Script {
                delay: Duration::from_millis(delay_ms),
                reply,
            },
        );
        self
    }

    fn calls(&self) -> Vec<(String, Voice)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizerPort for ScriptedSynth {
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<String, SynthesisError> {
        self.calls.lock().unwrap().push((text.to_string(), voice));
        let script = self.scripts.get(text).cloned().unwrap_or(Script {
            delay: Duration::ZERO,
            reply: Reply::Frames(8),
        });
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        match script.reply {
            Reply::Frames(n) => Ok(STANDARD.encode(vec![0u8; n * 2])),
            Reply::Raw(payload) => Ok(payload.to_string()),
            Reply::Quota => Err(SynthesisError::QuotaExhausted {
                attempts: 3,
                message: "RESOURCE_EXHAUSTED".into(),
            }),
            Reply::Fail => Err(SynthesisError::Failed("connection reset".into())),
        }
    }
}

// ── Fake output ────────────────────────────────────────────────────

#[derive(Default)]
struct ProbeState {
    /// Frame count and speed of every buffer handed to the device.
    plays: Vec<(usize, f32)>,
    stops: usize,
    speed: Option<f32>,
    /// Kept across `stop` so tests can deliver a late completion.
    pending: Option<PlaybackDoneCallback>,
    fail_resume: bool,
    fail_play: bool,
}

#[derive(Clone, Default)]
struct Probe(Arc<Mutex<ProbeState>>);

impl Probe {
    fn output(&self) -> Box<dyn AudioOutput> {
        Box::new(FakeOutput(self.clone()))
    }

    /// Fire the most recent completion callback, as if the audio drained.
    fn finish(&self) {
        let pending = self.0.lock().unwrap().pending.take();
        if let Some(on_done) = pending {
            on_done();
        }
    }

    fn plays(&self) -> Vec<(usize, f32)> {
        self.0.lock().unwrap().plays.clone()
    }

    fn stops(&self) -> usize {
        self.0.lock().unwrap().stops
    }

    fn speed(&self) -> Option<f32> {
        self.0.lock().unwrap().speed
    }

    fn fail_resume(&self) {
        self.0.lock().unwrap().fail_resume = true;
    }

    fn fail_play(&self) {
        self.0.lock().unwrap().fail_play = true;
    }
}

struct FakeOutput(Probe);

impl AudioOutput for FakeOutput {
    fn resume(&mut self) -> Result<(), VoiceError> {
        if self.0.0.lock().unwrap().fail_resume {
            return Err(VoiceError::OutputStreamError("no device".into()));
        }
        Ok(())
    }

    fn play(
        &mut self,
        buffer: AudioBuffer,
        speed: f32,
        on_done: PlaybackDoneCallback,
    ) -> Result<(), VoiceError> {
        let mut state = self.0.0.lock().unwrap();
        if state.fail_play {
            return Err(VoiceError::AudioThreadDied);
        }
        state.plays.push((buffer.frames(), speed));
        state.speed = Some(speed);
        state.pending = Some(on_done);
        Ok(())
    }

    fn stop(&mut self) {
        self.0.0.lock().unwrap().stops += 1;
    }

    fn set_speed(&mut self, speed: f32) {
        self.0.0.lock().unwrap().speed = Some(speed);
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn units(texts: &[&str]) -> Vec<NarrativeUnit> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| NarrativeUnit::new(format!("unit-{i}"), *text))
        .collect()
}

fn start(synth: ScriptedSynth) -> (PlaybackController, Probe, Arc<ScriptedSynth>) {
    let synth = Arc::new(synth);
    let probe = Probe::default();
    let controller = PlaybackController::spawn(
        Arc::clone(&synth) as Arc<dyn SpeechSynthesizerPort>,
        probe.output(),
        ControllerConfig::default(),
    );
    (controller, probe, synth)
}

/// Let spawned tasks run and the paused clock move forward by `ms`.
async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn error_kind(snapshot: &PlaybackSnapshot) -> Option<PlaybackErrorKind> {
    snapshot.error.as_ref().map(|e: &PlaybackError| e.kind)
}

// ── Basic transitions ──────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn toggle_prepares_then_plays_current_unit() {
    let (controller, probe, synth) = start(ScriptedSynth::default().with("A", 200, Reply::Frames(10)));
    controller.set_units(units(&["A", "B"])).await;

    let snapshot = controller.toggle_playback().await;
    assert_eq!(snapshot.status, PlaybackStatus::Processing);
    assert_eq!(snapshot.current_index, 0);

    settle(250).await;
    let snapshot = controller.state();
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(probe.plays(), vec![(10, 1.0)]);
    assert_eq!(synth.calls(), vec![("A".to_string(), Voice::Zephyr)]);
}

#[tokio::test(start_paused = true)]
async fn set_units_resets_index_and_status() {
    let (controller, _probe, _synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A", "B", "C"])).await;
    controller.seek(2).await;
    settle(10).await;
    assert_eq!(controller.state().current_index, 2);

    let snapshot = controller.set_units(units(&["X", "Y"])).await;
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert_eq!(snapshot.units.len(), 2);
    assert!(snapshot.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn navigation_past_either_end_is_a_no_op() {
    let (controller, _probe, synth) = start(ScriptedSynth::default());

    let snapshot = controller.seek(0).await;
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    let snapshot = controller.toggle_playback().await;
    assert_eq!(snapshot.status, PlaybackStatus::Idle);

    controller.set_units(units(&["A", "B"])).await;
    assert_eq!(controller.prev_unit().await.status, PlaybackStatus::Idle);
    assert_eq!(controller.seek(2).await.status, PlaybackStatus::Idle);

    controller.seek(1).await;
    settle(10).await;
    let snapshot = controller.next_unit().await;
    assert_eq!(snapshot.current_index, 1);
    assert_eq!(snapshot.status, PlaybackStatus::Playing);

    settle(10).await;
    assert_eq!(synth.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn last_unit_finishing_returns_to_idle() {
    let (controller, probe, _synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["only"])).await;
    controller.toggle_playback().await;
    settle(10).await;
    assert_eq!(controller.state().status, PlaybackStatus::Playing);

    probe.finish();
    settle(10).await;
    let snapshot = controller.state();
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert_eq!(snapshot.current_index, 0);
}

#[tokio::test(start_paused = true)]
async fn advances_after_the_gap_between_units() {
    let (controller, probe, synth) = start(
        ScriptedSynth::default()
            .with("A", 0, Reply::Frames(10))
            .with("B", 0, Reply::Frames(20)),
    );
    controller.set_units(units(&["A", "B"])).await;
    controller.toggle_playback().await;
    settle(10).await;

    probe.finish();
    settle(100).await;
    let snapshot = controller.state();
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(synth.calls().len(), 1);

    settle(600).await;
    let snapshot = controller.state();
    assert_eq!(snapshot.current_index, 1);
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(probe.plays(), vec![(10, 1.0), (20, 1.0)]);
}

#[tokio::test(start_paused = true)]
async fn zero_delay_advances_immediately() {
    let synth = Arc::new(ScriptedSynth::default());
    let probe = Probe::default();
    let controller = PlaybackController::spawn(
        synth,
        probe.output(),
        ControllerConfig::default().with_advance_delay(Duration::ZERO),
    );
    controller.set_units(units(&["A", "B"])).await;
    controller.toggle_playback().await;
    settle(1).await;

    probe.finish();
    settle(1).await;
    assert_eq!(controller.state().current_index, 1);
    assert_eq!(probe.plays().len(), 2);
}

// ── Stale results ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn slow_result_for_abandoned_unit_is_discarded() {
    let (controller, probe, synth) = start(
        ScriptedSynth::default()
            .with("A", 500, Reply::Frames(10))
            .with("B", 10, Reply::Frames(20)),
    );
    controller.set_units(units(&["A", "B"])).await;

    controller.toggle_playback().await;
    let snapshot = controller.next_unit().await;
    assert_eq!(snapshot.current_index, 1);
    assert_eq!(snapshot.status, PlaybackStatus::Processing);

    settle(50).await;
    assert_eq!(controller.state().status, PlaybackStatus::Playing);

    settle(600).await;
    let snapshot = controller.state();
    assert_eq!(snapshot.current_index, 1);
    assert_eq!(probe.plays(), vec![(20, 1.0)]);
    assert_eq!(synth.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn rapid_navigation_only_sounds_the_last_request() {
    let (controller, probe, _synth) = start(
        ScriptedSynth::default()
            .with("A", 100, Reply::Frames(10))
            .with("B", 100, Reply::Frames(20))
            .with("C", 100, Reply::Frames(30))
            .with("D", 100, Reply::Frames(40)),
    );
    controller.set_units(units(&["A", "B", "C", "D"])).await;

    controller.toggle_playback().await;
    controller.next_unit().await;
    controller.next_unit().await;
    let snapshot = controller.next_unit().await;
    assert_eq!(snapshot.current_index, 3);

    settle(200).await;
    assert_eq!(probe.plays(), vec![(40, 1.0)]);
    assert_eq!(controller.state().status, PlaybackStatus::Playing);
}

#[tokio::test(start_paused = true)]
async fn replacing_units_mid_synthesis_drops_the_result() {
    let (controller, probe, _synth) = start(ScriptedSynth::default().with("A", 300, Reply::Frames(10)));
    controller.set_units(units(&["A"])).await;
    controller.toggle_playback().await;

    controller.set_units(units(&["X", "Y"])).await;
    settle(400).await;

    let snapshot = controller.state();
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert!(probe.plays().is_empty());
}

#[tokio::test(start_paused = true)]
async fn clearing_units_while_playing_ignores_late_completion() {
    let (controller, probe, _synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A", "B"])).await;
    controller.toggle_playback().await;
    settle(10).await;
    let stops_before = probe.stops();

    let snapshot = controller.set_units(Vec::new()).await;
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert!(snapshot.units.is_empty());
    assert_eq!(snapshot.current_index, 0);
    assert!(probe.stops() > stops_before);

    probe.finish();
    settle(1_000).await;
    assert_eq!(controller.state().status, PlaybackStatus::Idle);
    assert_eq!(probe.plays().len(), 1);
}

// ── Pause, stop, resume ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn pause_ignores_late_completion_and_resume_restarts_unit() {
    let (controller, probe, synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A", "B"])).await;
    controller.toggle_playback().await;
    settle(10).await;

    let snapshot = controller.toggle_playback().await;
    assert_eq!(snapshot.status, PlaybackStatus::Paused);

    probe.finish();
    settle(1_000).await;
    let snapshot = controller.state();
    assert_eq!(snapshot.status, PlaybackStatus::Paused);
    assert_eq!(snapshot.current_index, 0);

    controller.toggle_playback().await;
    settle(10).await;
    assert_eq!(controller.state().status, PlaybackStatus::Playing);
    assert_eq!(controller.state().current_index, 0);
    assert_eq!(synth.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn pausing_during_the_gap_cancels_the_advance() {
    let (controller, probe, _synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A", "B"])).await;
    controller.toggle_playback().await;
    settle(10).await;

    probe.finish();
    settle(100).await;
    let snapshot = controller.toggle_playback().await;
    assert_eq!(snapshot.status, PlaybackStatus::Paused);

    settle(1_000).await;
    let snapshot = controller.state();
    assert_eq!(snapshot.status, PlaybackStatus::Paused);
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(probe.plays().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_while_preparing_pauses_without_sound() {
    let (controller, probe, _synth) = start(ScriptedSynth::default().with("A", 200, Reply::Frames(10)));
    controller.set_units(units(&["A"])).await;
    controller.toggle_playback().await;

    let snapshot = controller.stop().await;
    assert_eq!(snapshot.status, PlaybackStatus::Paused);

    settle(500).await;
    assert_eq!(controller.state().status, PlaybackStatus::Paused);
    assert!(probe.plays().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_when_idle_keeps_idle() {
    let (controller, probe, _synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A"])).await;
    let snapshot = controller.stop().await;
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert!(probe.stops() >= 1);
}

// ── Speed and voice ────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn speed_changes_retune_without_restarting() {
    let (controller, probe, synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A"])).await;
    controller.toggle_playback().await;
    settle(10).await;

    let snapshot = controller.set_speed(1.5).await;
    assert_eq!(snapshot.playback_speed, 1.5);
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(probe.speed(), Some(1.5));
    assert_eq!(probe.plays().len(), 1);
    assert_eq!(synth.calls().len(), 1);

    assert_eq!(controller.set_speed(9.0).await.playback_speed, 2.0);
    assert_eq!(controller.set_speed(0.1).await.playback_speed, 0.5);
    assert_eq!(probe.speed(), Some(0.5));
}

#[tokio::test(start_paused = true)]
async fn new_buffers_start_at_the_selected_speed() {
    let (controller, probe, _synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A"])).await;
    controller.set_speed(1.25).await;
    controller.toggle_playback().await;
    settle(10).await;
    assert_eq!(probe.plays(), vec![(8, 1.25)]);
}

#[tokio::test(start_paused = true)]
async fn set_voice_restarts_active_unit_with_new_voice() {
    let (controller, probe, synth) = start(ScriptedSynth::default());
    controller
        .set_units(vec![NarrativeUnit::new("u", "A").with_voice(Voice::Puck)])
        .await;
    controller.toggle_playback().await;
    settle(10).await;

    let snapshot = controller.set_voice(Some(Voice::Kore)).await;
    assert_eq!(snapshot.selected_voice, Some(Voice::Kore));
    assert_eq!(snapshot.status, PlaybackStatus::Processing);

    settle(10).await;
    assert_eq!(controller.state().status, PlaybackStatus::Playing);
    let voices: Vec<Voice> = synth.calls().into_iter().map(|(_, v)| v).collect();
    assert_eq!(voices, vec![Voice::Puck, Voice::Kore]);
    assert_eq!(probe.plays().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn set_voice_while_preparing_discards_the_first_synthesis() {
    let (controller, probe, synth) =
        start(ScriptedSynth::default().with("A", 300, Reply::Frames(8)));
    controller.set_units(units(&["A"])).await;
    controller.toggle_playback().await;
    settle(10).await;
    assert_eq!(controller.state().status, PlaybackStatus::Processing);

    let snapshot = controller.set_voice(Some(Voice::Kore)).await;
    assert_eq!(snapshot.status, PlaybackStatus::Processing);

    // The first request lands at 300ms and must not reach the device.
    settle(295).await;
    assert!(probe.plays().is_empty());
    assert_eq!(controller.state().status, PlaybackStatus::Processing);

    settle(100).await;
    assert_eq!(controller.state().status, PlaybackStatus::Playing);
    assert_eq!(probe.plays().len(), 1);
    let voices: Vec<Voice> = synth.calls().into_iter().map(|(_, v)| v).collect();
    assert_eq!(voices, vec![Voice::Zephyr, Voice::Kore]);
}

#[tokio::test(start_paused = true)]
async fn set_voice_while_paused_does_not_restart() {
    let (controller, _probe, synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A"])).await;
    controller.toggle_playback().await;
    settle(10).await;
    controller.toggle_playback().await;

    let snapshot = controller.set_voice(Some(Voice::Charon)).await;
    assert_eq!(snapshot.status, PlaybackStatus::Paused);
    settle(10).await;
    assert_eq!(synth.calls().len(), 1);

    controller.toggle_playback().await;
    settle(10).await;
    assert_eq!(synth.calls()[1].1, Voice::Charon);
}

#[tokio::test(start_paused = true)]
async fn unit_casting_is_used_without_a_global_voice() {
    let (controller, _probe, synth) = start(ScriptedSynth::default());
    controller
        .set_units(vec![
            NarrativeUnit::new("a", "A").with_voice(Voice::Fenrir),
            NarrativeUnit::new("b", "B"),
        ])
        .await;

    controller.seek(0).await;
    settle(10).await;
    controller.seek(1).await;
    settle(10).await;

    let voices: Vec<Voice> = synth.calls().into_iter().map(|(_, v)| v).collect();
    assert_eq!(voices, vec![Voice::Fenrir, Voice::Zephyr]);
}

// ── Failures ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn quota_exhaustion_is_reported_separately() {
    let (controller, probe, _synth) = start(ScriptedSynth::default().with("A", 0, Reply::Quota));
    controller.set_units(units(&["A"])).await;
    controller.toggle_playback().await;
    settle(10).await;

    let snapshot = controller.state();
    assert_eq!(snapshot.status, PlaybackStatus::Error);
    assert_eq!(error_kind(&snapshot), Some(PlaybackErrorKind::QuotaExhausted));
    assert!(snapshot.error.as_ref().is_some_and(PlaybackError::is_quota));
    assert!(probe.plays().is_empty());
}

#[tokio::test(start_paused = true)]
async fn synthesis_failure_sets_error_and_toggle_retries() {
    let (controller, _probe, synth) = start(
        ScriptedSynth::default()
            .with("A", 0, Reply::Fail)
            .with("B", 0, Reply::Frames(4)),
    );
    controller.set_units(units(&["A", "B"])).await;
    controller.toggle_playback().await;
    settle(10).await;

    let snapshot = controller.state();
    assert_eq!(snapshot.status, PlaybackStatus::Error);
    assert_eq!(error_kind(&snapshot), Some(PlaybackErrorKind::Synthesis));

    let snapshot = controller.toggle_playback().await;
    assert_eq!(snapshot.status, PlaybackStatus::Processing);
    assert!(snapshot.error.is_none());
    settle(10).await;
    assert_eq!(synth.calls().len(), 2);

    controller.next_unit().await;
    settle(10).await;
    assert_eq!(controller.state().status, PlaybackStatus::Playing);
}

#[tokio::test(start_paused = true)]
async fn undecodable_audio_is_a_decode_error() {
    let (controller, _probe, _synth) = start(
        ScriptedSynth::default()
            .with("odd", 0, Reply::Raw("AAAA"))
            .with("junk", 0, Reply::Raw("not base64!")),
    );
    controller.set_units(units(&["odd", "junk"])).await;

    controller.seek(0).await;
    settle(10).await;
    assert_eq!(error_kind(&controller.state()), Some(PlaybackErrorKind::Decode));

    controller.seek(1).await;
    settle(10).await;
    assert_eq!(error_kind(&controller.state()), Some(PlaybackErrorKind::Decode));
}

#[tokio::test(start_paused = true)]
async fn output_failures_surface_as_output_errors() {
    let (controller, probe, synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A"])).await;

    probe.fail_resume();
    let snapshot = controller.init_audio().await;
    assert_eq!(snapshot.status, PlaybackStatus::Error);
    assert_eq!(error_kind(&snapshot), Some(PlaybackErrorKind::Output));

    let snapshot = controller.toggle_playback().await;
    assert_eq!(error_kind(&snapshot), Some(PlaybackErrorKind::Output));
    settle(10).await;
    assert!(synth.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn refused_buffer_surfaces_as_output_error() {
    let (controller, probe, _synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A"])).await;
    probe.fail_play();

    controller.toggle_playback().await;
    settle(10).await;
    let snapshot = controller.state();
    assert_eq!(snapshot.status, PlaybackStatus::Error);
    assert_eq!(error_kind(&snapshot), Some(PlaybackErrorKind::Output));
}

// ── Restore, observation, shutdown ─────────────────────────────────

#[tokio::test(start_paused = true)]
async fn restored_session_starts_idle_and_silent() {
    let synth = Arc::new(ScriptedSynth::default());
    let probe = Probe::default();
    let restored = PlaybackSnapshot {
        units: Arc::from(units(&["A", "B"])),
        current_index: 5,
        status: PlaybackStatus::Playing,
        playback_speed: 3.0,
        selected_voice: Some(Voice::Charon),
        error: Some(PlaybackError::new(PlaybackErrorKind::Synthesis, "old")),
    };

    let controller = PlaybackController::spawn_with_state(
        Arc::clone(&synth) as Arc<dyn SpeechSynthesizerPort>,
        probe.output(),
        ControllerConfig::default(),
        restored,
    );
    settle(10).await;

    let snapshot = controller.state();
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(snapshot.playback_speed, 2.0);
    assert_eq!(snapshot.selected_voice, Some(Voice::Charon));
    assert!(snapshot.error.is_none());
    assert!(synth.calls().is_empty());
    assert!(probe.plays().is_empty());
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_each_transition() {
    let (controller, _probe, _synth) = start(ScriptedSynth::default().with("A", 50, Reply::Frames(10)));
    let mut rx = controller.subscribe();
    controller.set_units(units(&["A"])).await;
    let _ = rx.borrow_and_update();

    controller.toggle_playback().await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().status, PlaybackStatus::Processing);

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().status, PlaybackStatus::Playing);
}

#[tokio::test(start_paused = true)]
async fn clones_share_one_session() {
    let (controller, _probe, _synth) = start(ScriptedSynth::default());
    let other = controller.clone();
    controller.set_units(units(&["A", "B"])).await;
    other.seek(1).await;
    settle(10).await;
    assert_eq!(controller.state().current_index, 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_releases_output_and_reports_paused() {
    let (controller, probe, _synth) = start(ScriptedSynth::default());
    let mut states = controller.subscribe();
    controller.set_units(units(&["A"])).await;
    controller.toggle_playback().await;
    settle(10).await;
    assert_eq!(controller.state().status, PlaybackStatus::Playing);
    let stops_before = probe.stops();

    controller.shutdown().await;
    assert!(probe.stops() > stops_before);
    assert_eq!(controller.state().status, PlaybackStatus::Paused);
    assert_eq!(states.borrow_and_update().status, PlaybackStatus::Paused);

    // The handle outlives the task and keeps answering with the last state.
    let snapshot = controller.toggle_playback().await;
    assert_eq!(snapshot.status, PlaybackStatus::Paused);
    assert_eq!(probe.plays().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_while_idle_stays_idle() {
    let (controller, _probe, _synth) = start(ScriptedSynth::default());
    controller.set_units(units(&["A"])).await;

    controller.shutdown().await;
    assert_eq!(controller.state().status, PlaybackStatus::Idle);
}
