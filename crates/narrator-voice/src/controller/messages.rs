//! Messages delivered to the controller task.

use narrator_core::{NarrativeUnit, PlaybackError, PlaybackSnapshot, PlaybackToken, Voice};
use tokio::sync::oneshot;

use crate::decoder::AudioBuffer;

/// A listener request.
pub enum Command {
    SetUnits(Vec<NarrativeUnit>),
    Toggle,
    Next,
    Prev,
    Seek(usize),
    SetSpeed(f32),
    SetVoice(Option<Voice>),
    InitAudio,
    Stop,
}

impl Command {
    /// Short name for logs; units are never logged.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetUnits(_) => "set_units",
            Self::Toggle => "toggle",
            Self::Next => "next",
            Self::Prev => "prev",
            Self::Seek(_) => "seek",
            Self::SetSpeed(_) => "set_speed",
            Self::SetVoice(_) => "set_voice",
            Self::InitAudio => "init_audio",
            Self::Stop => "stop",
        }
    }
}

/// Everything the controller task reacts to.
///
/// Asynchronous outcomes carry the token they were started under so the
/// task can ignore the ones that lost their authority in the meantime.
pub enum ControllerMsg {
    /// A listener request, answered with the settled snapshot.
    Command {
        command: Command,
        reply: oneshot::Sender<PlaybackSnapshot>,
    },

    /// Synthesis and decoding finished for the unit at `index`.
    SpeechReady {
        token: PlaybackToken,
        index: usize,
        result: Result<AudioBuffer, PlaybackError>,
    },

    /// The output drained the buffer started under `token`.
    PlaybackFinished { token: PlaybackToken },

    /// The pause between units elapsed; play `index` next.
    AdvanceDue { token: PlaybackToken, index: usize },

    /// Stop the task and release the output device.
    Shutdown { done: oneshot::Sender<()> },
}
