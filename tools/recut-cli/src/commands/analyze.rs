//! Regenerate the automatic zoom schedule of a project.

use recut_common::AppConfig;
use recut_timeline_core::EditorSession;

use super::{format_ms, open_project};

pub fn run(
    project: &str,
    config: &AppConfig,
    max_zoom: Option<f64>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut project = open_project(project, config)?;
    println!("Analyzing project at: {}", project.root.display());
    println!("  Loaded {} events", project.events.len());

    if project.events.is_empty() {
        println!("  No events to analyze.");
        return Ok(());
    }
    if project.project.screen.is_none() {
        anyhow::bail!("Project has no screen recording metadata");
    }

    let mut session = EditorSession::from_project(&project, config);
    if let Some(max_zoom) = max_zoom {
        if max_zoom < 1.0 {
            anyhow::bail!("--max-zoom must be at least 1.0, got {max_zoom}");
        }
        session.update_settings(|settings| settings.zoom.max_zoom = max_zoom);
    }

    let outcome = session.recalculate_schedule();
    println!("  Generated {} zoom motions", outcome.value.len());
    for motion in &outcome.value {
        println!(
            "    {:<8} {} -> {}  {}",
            motion.id,
            format_ms(motion.output_start_time_ms()),
            format_ms(motion.output_end_time_ms),
            motion.reason
        );
    }

    if dry_run {
        println!("\nDry run, nothing saved.");
        return Ok(());
    }
    if !outcome.changed && max_zoom.is_none() {
        println!("\nSchedule unchanged.");
        return Ok(());
    }

    session.write_back(&mut project);
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save timeline: {e}"))?;
    println!(
        "  Timeline saved to: {}",
        project.root.join("meta/timeline.json").display()
    );
    println!("\nAnalysis complete.");

    Ok(())
}
