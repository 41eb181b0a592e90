//! `narrate`: analyze a page and play it.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use narrator_core::{PageImage, Voice};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::player::{self, PlayerOptions};

/// Arguments for the narrate command.
pub struct NarrateArgs<'a> {
    pub image: &'a Path,
    pub context: Option<&'a str>,
    pub voice: Option<Voice>,
    pub speed: Option<f32>,
    pub focus_mode: bool,
}

pub async fn execute(ctx: &CliContext, args: NarrateArgs<'_>) -> Result<()> {
    let image = PageImage::from_path(args.image).await.map_err(CliError::from)?;
    let services = ctx.gemini()?;

    let spinner = analysis_spinner();
    let units = match services.narrator.analyze(&image, args.context).await {
        Ok(units) => units,
        Err(e) => {
            spinner.finish_and_clear();
            tracing::warn!(error = %e, "Page analysis failed");
            return Err(CliError::from(e).into());
        }
    };
    spinner.finish_with_message(format!("Found {} units.", units.len()));
    tracing::info!(units = units.len(), image = %args.image.display(), "Page analyzed");

    let session = ctx.start_page_player(services.speech).await;
    let controller = &session.controller;
    controller.set_units(units).await;
    if let Some(speed) = args.speed {
        controller.set_speed(speed).await;
    }
    if args.voice.is_some() {
        controller.set_voice(args.voice).await;
    }

    let result = player::run(
        controller,
        PlayerOptions {
            focus_mode: args.focus_mode,
            autoplay: true,
        },
    )
    .await;
    session.close().await;
    result
}

fn analysis_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Reading the page: panels, dialogue and casting...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
