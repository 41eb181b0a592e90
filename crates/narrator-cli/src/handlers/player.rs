//! Interactive player: raw-mode keyboard loop over a playback controller.
//!
//! Key presses are read on a blocking thread and forwarded to the async
//! loop, which applies them to the controller and announces every status
//! or unit change as a plain line of text.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal;
use narrator_core::{PlaybackSnapshot, PlaybackStatus};
use narrator_voice::PlaybackController;
use tokio::sync::mpsc;

use crate::keys::{InputFocus, JumpInput, JumpOutcome, ShellAction, map_key};
use crate::presentation::{
    HELP_LINES, next_voice, speed_label, status_line, step_speed, unit_heading, unit_lines,
    voice_label,
};

const KEY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Player options chosen on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerOptions {
    /// Show only the narrative line for each unit.
    pub focus_mode: bool,
    /// Start playing the current unit immediately.
    pub autoplay: bool,
}

/// Run the player until the listener quits.
pub async fn run(controller: &PlaybackController, options: PlayerOptions) -> Result<()> {
    let _raw = RawMode::enable()?;
    let (mut keys, reader) = KeyReader::spawn();
    let mut view = PlayerView::new(options.focus_mode);
    let mut states = controller.subscribe();

    view.say_all(HELP_LINES)?;
    let initial = controller.init_audio().await;
    view.announce(&initial, true)?;
    if options.autoplay {
        controller.toggle_playback().await;
    } else if initial.status == PlaybackStatus::Idle {
        view.say("Press Space to play.")?;
    }

    loop {
        tokio::select! {
            key = keys.recv() => {
                let Some(key) = key else { break };
                if view.handle_key(controller, &key).await? == Flow::Quit {
                    break;
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = states.borrow_and_update().clone();
                view.announce(&snapshot, false)?;
            }
        }
    }

    controller.stop().await;
    drop(reader);
    view.say("Goodbye.")?;
    Ok(())
}

// ── View state ─────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct PlayerView {
    focus_mode: bool,
    jump: Option<JumpInput>,
    last_index: Option<usize>,
    last_status: Option<PlaybackStatus>,
    out: io::Stdout,
}

impl PlayerView {
    fn new(focus_mode: bool) -> Self {
        Self {
            focus_mode,
            jump: None,
            last_index: None,
            last_status: None,
            out: io::stdout(),
        }
    }

    const fn focus(&self) -> InputFocus {
        if self.jump.is_some() {
            InputFocus::TextInput
        } else {
            InputFocus::Player
        }
    }

    async fn handle_key(&mut self, controller: &PlaybackController, key: &KeyEvent) -> Result<Flow> {
        let action = map_key(key, self.focus());

        if action.is_none() {
            if let Some(jump) = self.jump.as_mut() {
                match jump.handle(key) {
                    JumpOutcome::Editing => {}
                    JumpOutcome::Submit(index) => {
                        self.jump = None;
                        let units = controller.state().units.len();
                        if index < units {
                            controller.seek(index).await;
                        } else {
                            self.say(&format!("There is no unit {}. This page has {units}.", index + 1))?;
                        }
                    }
                    JumpOutcome::Invalid => {
                        self.jump = None;
                        self.say("Jump cancelled: enter a unit number.")?;
                    }
                    JumpOutcome::Cancel => {
                        self.jump = None;
                        self.say("Jump cancelled.")?;
                    }
                }
            }
            return Ok(Flow::Continue);
        }

        match action {
            Some(ShellAction::TogglePlayback) => {
                controller.toggle_playback().await;
            }
            Some(ShellAction::Next) => {
                let before = controller.state();
                if !before.has_next() {
                    self.say("This is the last unit.")?;
                }
                controller.next_unit().await;
            }
            Some(ShellAction::Prev) => {
                let before = controller.state();
                if !before.has_previous() {
                    self.say("This is the first unit.")?;
                }
                controller.prev_unit().await;
            }
            Some(ShellAction::SpeedUp | ShellAction::SpeedDown) => {
                let up = action == Some(ShellAction::SpeedUp);
                let target = step_speed(controller.state().playback_speed, up);
                let snapshot = controller.set_speed(target).await;
                self.say(&format!("Speed {}", speed_label(snapshot.playback_speed)))?;
            }
            Some(ShellAction::CycleVoice) => {
                let voice = next_voice(controller.state().selected_voice);
                let snapshot = controller.set_voice(voice).await;
                self.say(&format!("Voice: {}", voice_label(snapshot.selected_voice)))?;
            }
            Some(ShellAction::ToggleFocusMode) => {
                self.focus_mode = !self.focus_mode;
                self.say(if self.focus_mode { "Focus mode on." } else { "Focus mode off." })?;
            }
            Some(ShellAction::OpenJump) => {
                self.jump = Some(JumpInput::new());
                self.say("Jump to unit: type a number, Enter to go, Esc to cancel.")?;
            }
            Some(ShellAction::Help) => self.say_all(HELP_LINES)?,
            Some(ShellAction::Quit) => return Ok(Flow::Quit),
            None => {}
        }
        Ok(Flow::Continue)
    }

    /// Announce what changed since the last snapshot.
    fn announce(&mut self, snapshot: &PlaybackSnapshot, force: bool) -> Result<()> {
        let index_changed = self.last_index != Some(snapshot.current_index);
        let status_changed = self.last_status != Some(snapshot.status);

        if (force || index_changed) && !snapshot.units.is_empty() {
            self.say(&unit_heading(snapshot))?;
            if let Some(unit) = snapshot.current_unit() {
                let lines = unit_lines(unit, self.focus_mode);
                self.say_all(lines.iter().map(String::as_str))?;
            }
        }
        if force || status_changed {
            self.say(&status_line(snapshot))?;
        }

        self.last_index = Some(snapshot.current_index);
        self.last_status = Some(snapshot.status);
        Ok(())
    }

    fn say(&mut self, line: &str) -> Result<()> {
        // Raw mode needs an explicit carriage return.
        write!(self.out, "{line}\r\n")?;
        self.out.flush()?;
        Ok(())
    }

    fn say_all<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }
}

// ── Terminal plumbing ──────────────────────────────────────────────

/// Raw mode for the lifetime of the guard.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to switch the terminal to raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "Failed to restore the terminal");
        }
    }
}

/// Blocking key reader on its own thread.
struct KeyReader {
    running: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl KeyReader {
    fn spawn() -> (mpsc::UnboundedReceiver<KeyEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let thread = thread::Builder::new()
            .name("narrator-keys".into())
            .spawn(move || {
                while flag.load(Ordering::SeqCst) {
                    match event::poll(KEY_POLL_INTERVAL) {
                        Ok(true) => match event::read() {
                            Ok(Event::Key(key)) => {
                                if tx.send(key).is_err() {
                                    break;
                                }
                            }
                            Ok(_) => {}
                            Err(e) => {
                                tracing::warn!(error = %e, "Failed to read key");
                                break;
                            }
                        },
                        Ok(false) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to poll keyboard");
                            break;
                        }
                    }
                }
            })
            .map_err(|e| tracing::warn!(error = %e, "Failed to spawn key reader"))
            .ok();

        (rx, Self { running, thread })
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
