//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that validate CLI input, call the ports or the
//!   controller, and format output for the terminal
//!
//! Handlers never construct adapters; that is the job of `bootstrap`.

pub mod narrate;
pub mod player;
pub mod resume;
pub mod session;
pub mod voices;
