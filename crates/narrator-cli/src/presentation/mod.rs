//! Plain-text rendering for the player and the session commands.
//!
//! Everything here returns lines of text, one idea per line, so screen
//! readers announce them cleanly. Keep this module format-only.

use narrator_core::{
    MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED, NarrativeUnit, PlaybackSnapshot, PlaybackStatus,
    SPEED_PRESETS, Voice,
};

/// Key help shown when the player opens and on `?`.
pub const HELP_LINES: [&str; 7] = [
    "Space: play or pause",
    "Right or l: next unit. Left or h: previous unit",
    "+ or -: change speed",
    "v: change voice",
    "f: focus mode (narration only)",
    "g: jump to a unit number",
    "q or Esc: quit",
];

/// "Unit 2 of 5", or a notice when nothing is loaded.
pub fn unit_heading(snapshot: &PlaybackSnapshot) -> String {
    if snapshot.units.is_empty() {
        return "No units loaded.".to_string();
    }
    format!("Unit {} of {}", snapshot.current_index + 1, snapshot.units.len())
}

/// Text lines for one unit. Focus mode keeps only the narrative line.
pub fn unit_lines(unit: &NarrativeUnit, focus_mode: bool) -> Vec<String> {
    let mut lines = vec![unit.combined_narrative.clone()];
    if focus_mode {
        return lines;
    }
    if unit.has_dialogue() {
        lines.push(format!("Dialogue: {}", unit.original_text.trim()));
    }
    if !unit.description.trim().is_empty() {
        lines.push(format!("Scene: {}", unit.description.trim()));
    }
    if let Some(voice) = unit.voice_preference {
        lines.push(format!("Cast as {voice}"));
    }
    lines
}

/// Status announcement, with the failure message when there is one.
pub fn status_line(snapshot: &PlaybackSnapshot) -> String {
    match (&snapshot.status, &snapshot.error) {
        (PlaybackStatus::Error, Some(error)) => {
            format!("{} {} Press Space to retry.", snapshot.status.announcement(), error.message)
        }
        (status, _) => status.announcement().to_string(),
    }
}

pub fn voice_label(voice: Option<Voice>) -> String {
    voice.map_or_else(|| "automatic (page casting)".to_string(), |v| v.name().to_string())
}

pub fn speed_label(speed: f32) -> String {
    SPEED_PRESETS
        .iter()
        .find(|(preset, _)| (preset - speed).abs() < f32::EPSILON)
        .map_or_else(|| format!("{speed:.2}x"), |(_, label)| format!("{speed:.2}x ({label})"))
}

/// Next entry in the voice cycle: automatic, then every voice, then back.
pub fn next_voice(current: Option<Voice>) -> Option<Voice> {
    match current {
        None => Voice::ALL.first().copied(),
        Some(voice) => Voice::ALL
            .iter()
            .position(|v| *v == voice)
            .and_then(|i| Voice::ALL.get(i + 1))
            .copied(),
    }
}

/// The neighboring speed preset, or the range limit past the last preset.
pub fn step_speed(current: f32, up: bool) -> f32 {
    if up {
        SPEED_PRESETS
            .iter()
            .map(|(preset, _)| *preset)
            .find(|preset| *preset > current + f32::EPSILON)
            .unwrap_or(MAX_PLAYBACK_SPEED)
    } else {
        SPEED_PRESETS
            .iter()
            .rev()
            .map(|(preset, _)| *preset)
            .find(|preset| *preset < current - f32::EPSILON)
            .unwrap_or(MIN_PLAYBACK_SPEED)
    }
}

/// Summary for `session show`.
pub fn session_summary(snapshot: &PlaybackSnapshot) -> Vec<String> {
    if snapshot.units.is_empty() {
        return vec!["No saved session.".to_string()];
    }
    let mut lines = vec![
        format!("Saved session: {}", unit_heading(snapshot)),
        format!("Speed: {}", speed_label(snapshot.playback_speed)),
        format!("Voice: {}", voice_label(snapshot.selected_voice)),
    ];
    if let Some(unit) = snapshot.current_unit() {
        lines.push(format!("Current: {}", unit.combined_narrative));
    }
    lines
}
