//! Subcommands.

use std::path::PathBuf;

use clap::Subcommand;
use narrator_core::Voice;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a page image and play its narration
    Narrate {
        /// Page image (jpg, jpeg, png, webp or gif)
        image: PathBuf,
        /// What happened on earlier pages, to keep the story coherent
        #[arg(short, long)]
        context: Option<String>,
        /// Speak every unit with this voice instead of the page's casting
        #[arg(long)]
        voice: Option<Voice>,
        /// Playback rate (0.5 to 2.0)
        #[arg(short, long)]
        speed: Option<f32>,
        /// Show only the narrative line for each unit
        #[arg(short, long)]
        focus: bool,
    },

    /// Reopen the last session where it left off
    Resume {
        /// Show only the narrative line for each unit
        #[arg(short, long)]
        focus: bool,
    },

    /// List the available voices and what they are cast for
    Voices,

    /// Inspect or discard the saved session
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
}

/// Session subcommands.
#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Print a summary of the saved session
    Show,
    /// Delete the saved session
    Clear,
}
