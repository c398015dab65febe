//! Delete an output window.

use recut_common::AppConfig;
use recut_timeline_core::EditorSession;

use super::{format_ms, open_project};

pub fn run(project: &str, config: &AppConfig, window: &str) -> anyhow::Result<()> {
    let mut project = open_project(project, config)?;
    let mut session = EditorSession::from_project(&project, config);
    let before = session.output_duration_ms();

    let outcome = session.remove_window(window);
    if !outcome.changed {
        anyhow::bail!("No window with id {window}");
    }

    println!("Removed window {window}.");
    println!(
        "  Output duration: {} -> {}",
        format_ms(before),
        format_ms(session.output_duration_ms())
    );
    println!("  Zoom motions: {}", session.timeline().motions.len());
    println!("  Spotlights: {}", session.timeline().spotlights.len());

    session.write_back(&mut project);
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save timeline: {e}"))?;

    Ok(())
}
