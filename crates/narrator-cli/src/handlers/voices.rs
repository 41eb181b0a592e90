//! `voices`: list the cast.

use anyhow::Result;
use narrator_core::Voice;

pub fn execute() -> Result<()> {
    for voice in Voice::ALL {
        println!("{:<8} {}", voice.name(), voice.archetype());
    }
    println!();
    println!(
        "Without a selection each unit uses the voice cast for it, or {}.",
        Voice::FALLBACK
    );
    Ok(())
}
