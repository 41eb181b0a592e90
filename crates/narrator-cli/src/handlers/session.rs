//! `session show` and `session clear`.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::commands::SessionCommand;
use crate::error::CliError;
use crate::presentation::session_summary;

pub async fn execute(ctx: &CliContext, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Show => {
            let snapshot = ctx.sessions.load().await;
            for line in session_summary(&snapshot) {
                println!("{line}");
            }
        }
        SessionCommand::Clear => {
            ctx.sessions.clear().await.map_err(CliError::from)?;
            println!("Saved session deleted.");
        }
    }
    Ok(())
}
