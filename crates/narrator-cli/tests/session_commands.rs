//! Session commands against a real data directory.

use std::sync::Arc;

use narrator_cli::handlers;
use narrator_cli::{CliConfig, SessionCommand, bootstrap};
use narrator_core::{NarrativeUnit, PlaybackSnapshot, Voice};
use narrator_voice::ControllerConfig;

fn config(dir: &tempfile::TempDir) -> CliConfig {
    CliConfig {
        data_dir: dir.path().to_path_buf(),
        api_key: None,
        controller: ControllerConfig::default(),
    }
}

#[tokio::test]
async fn clear_removes_the_saved_session() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = bootstrap(config(&dir));
    let snapshot = PlaybackSnapshot {
        units: Arc::from(vec![
            NarrativeUnit::new("a", "Night over the harbor."),
            NarrativeUnit::new("b", "A lantern swings."),
        ]),
        current_index: 1,
        selected_voice: Some(Voice::Kore),
        ..PlaybackSnapshot::default()
    };
    ctx.sessions.save(&snapshot).await.unwrap();

    handlers::session::execute(&ctx, SessionCommand::Show).await.unwrap();
    assert_eq!(ctx.sessions.load().await.current_index, 1);

    handlers::session::execute(&ctx, SessionCommand::Clear).await.unwrap();
    assert!(ctx.sessions.load().await.units.is_empty());
}

#[tokio::test]
async fn new_page_keeps_saved_speed_and_voice() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = bootstrap(CliConfig {
        api_key: Some("test-key".into()),
        ..config(&dir)
    });
    let previous = PlaybackSnapshot {
        units: Arc::from(vec![NarrativeUnit::new("old", "An older page.")]),
        playback_speed: 1.5,
        selected_voice: Some(Voice::Kore),
        ..PlaybackSnapshot::default()
    };
    ctx.sessions.save(&previous).await.unwrap();

    let speech = ctx.gemini().unwrap().speech;
    let session = ctx.start_page_player(speech).await;
    let initial = session.controller.state();
    assert!(initial.units.is_empty());
    assert_eq!(initial.playback_speed, 1.5);
    assert_eq!(initial.selected_voice, Some(Voice::Kore));

    session
        .controller
        .set_units(vec![
            NarrativeUnit::new("a", "Waves break on the pier."),
            NarrativeUnit::new("b", "A gull cries."),
        ])
        .await;
    session.close().await;

    let reloaded = ctx.sessions.load().await;
    assert_eq!(reloaded.units.len(), 2);
    assert_eq!(reloaded.units[0].id, "a");
    assert_eq!(reloaded.playback_speed, 1.5);
    assert_eq!(reloaded.selected_voice, Some(Voice::Kore));
}

#[tokio::test]
async fn resume_without_a_session_needs_no_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = bootstrap(config(&dir));
    handlers::resume::execute(&ctx, false).await.unwrap();
}

#[tokio::test]
async fn narrate_rejects_unsupported_files_before_calling_out() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("chapter.pdf");
    std::fs::write(&page, b"%PDF-1.7").unwrap();

    let ctx = bootstrap(config(&dir));
    let args = handlers::narrate::NarrateArgs {
        image: &page,
        context: None,
        voice: None,
        speed: None,
        focus_mode: false,
    };
    let err = handlers::narrate::execute(&ctx, args).await.unwrap_err();
    let cli_err = err.downcast_ref::<narrator_cli::CliError>().unwrap();
    assert_eq!(cli_err.exit_code(), 66);
}
