//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Session store over a file-backed key-value store (via narrator-core)
//! - Gemini client for analysis and speech (via narrator-gemini)
//! - Playback controller on the default audio device (via narrator-voice)
//!
//! Command handlers receive the composed [`CliContext`] and never build
//! adapters themselves.

use std::path::PathBuf;
use std::sync::Arc;

use narrator_core::{
    FileKeyValueStore, NarrationPort, PlaybackSnapshot, SessionStore, SpeechSynthesizerPort,
    data_root, spawn_autosave,
};
use narrator_gemini::{DefaultGeminiClient, GeminiClientConfig};
use narrator_voice::{ControllerConfig, DeviceOutput, PlaybackController};
use tokio::task::JoinHandle;

use crate::error::CliError;
use crate::parser::Cli;

/// Secondary variable consulted when `GEMINI_API_KEY` is unset.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding the session blob.
    pub data_dir: PathBuf,
    /// Gemini API key, if one was found.
    pub api_key: Option<String>,
    /// Playback controller settings.
    pub controller: ControllerConfig,
}

impl CliConfig {
    /// Resolve configuration from parsed flags and the environment.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => data_root()?,
        };
        let present = |key: &String| !key.trim().is_empty();
        let api_key = cli
            .api_key
            .clone()
            .filter(present)
            .or_else(|| std::env::var(FALLBACK_API_KEY_ENV).ok().filter(present));

        Ok(Self {
            data_dir,
            api_key,
            controller: ControllerConfig::default(),
        })
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub config: CliConfig,
    pub sessions: SessionStore,
}

/// Bootstrap the CLI application.
///
/// Only local resources are touched here; the Gemini client and the audio
/// device are created by the commands that need them.
pub fn bootstrap(config: CliConfig) -> CliContext {
    let store = FileKeyValueStore::new(config.data_dir.clone());
    tracing::debug!(data_dir = %config.data_dir.display(), "Session store ready");
    let sessions = SessionStore::new(Arc::new(store));
    CliContext { config, sessions }
}

/// Gemini-backed ports.
pub struct GeminiServices {
    pub narrator: Arc<dyn NarrationPort>,
    pub speech: Arc<dyn SpeechSynthesizerPort>,
}

impl CliContext {
    /// Build the Gemini client. Fails without an API key.
    pub fn gemini(&self) -> Result<GeminiServices, CliError> {
        let config = GeminiClientConfig::new().with_optional_api_key(self.config.api_key.clone());
        if !config.has_api_key() {
            return Err(CliError::MissingApiKey);
        }
        let client = Arc::new(DefaultGeminiClient::new(&config)?);
        Ok(GeminiServices {
            narrator: Arc::clone(&client) as Arc<dyn NarrationPort>,
            speech: client,
        })
    }

    /// Start a controller on the default audio device, persisting the
    /// session as it changes.
    pub fn start_player(
        &self,
        speech: Arc<dyn SpeechSynthesizerPort>,
        restored: PlaybackSnapshot,
    ) -> PlayerSession {
        let controller = PlaybackController::spawn_with_state(
            speech,
            Box::new(DeviceOutput::new()),
            self.config.controller,
            restored,
        );
        let autosave = spawn_autosave(self.sessions.clone(), controller.subscribe());
        PlayerSession {
            controller,
            autosave,
        }
    }

    /// Start a controller for a newly analyzed page.
    ///
    /// Units from the saved session are dropped; the listener's speed and
    /// voice carry over.
    pub async fn start_page_player(
        &self,
        speech: Arc<dyn SpeechSynthesizerPort>,
    ) -> PlayerSession {
        let saved = self.sessions.load().await;
        let preferences = PlaybackSnapshot {
            units: Arc::from(Vec::new()),
            current_index: 0,
            ..saved
        };
        self.start_player(speech, preferences)
    }
}

/// A running controller and its autosave task.
pub struct PlayerSession {
    pub controller: PlaybackController,
    autosave: JoinHandle<()>,
}

impl PlayerSession {
    /// Stop playback, release the device and wait for the last save.
    pub async fn close(self) {
        self.controller.shutdown().await;
        drop(self.controller);
        if let Err(e) = self.autosave.await {
            tracing::warn!(error = %e, "Autosave task failed");
        }
    }
}
