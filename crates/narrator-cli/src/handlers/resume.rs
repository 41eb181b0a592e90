//! `resume`: reopen the saved session.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::handlers::player::{self, PlayerOptions};
use crate::presentation::unit_heading;

pub async fn execute(ctx: &CliContext, focus_mode: bool) -> Result<()> {
    let restored = ctx.sessions.load().await;
    if restored.units.is_empty() {
        println!("No saved session. Start one with: manga-narrator narrate <IMAGE>");
        return Ok(());
    }

    let services = ctx.gemini()?;
    println!("Resuming at {}.", unit_heading(&restored));

    let session = ctx.start_player(services.speech, restored);
    let result = player::run(
        &session.controller,
        PlayerOptions {
            focus_mode,
            autoplay: false,
        },
    )
    .await;
    session.close().await;
    result
}
