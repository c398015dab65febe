//! Create a new Recut project.

use std::path::PathBuf;

use recut_project_model::{LoadedProject, ScreenSource};

pub fn run(
    name: String,
    parent: PathBuf,
    duration_ms: f64,
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    if duration_ms <= 0.0 {
        anyhow::bail!("Recording duration must be positive, got {duration_ms}ms");
    }

    let project_dir = parent.join(&name);
    println!("Creating project '{}' at {}", name, project_dir.display());

    let screen = ScreenSource {
        media_id: format!("{name}-screen"),
        width: f64::from(width),
        height: f64::from(height),
        duration_ms,
    };
    let project = LoadedProject::create(&project_dir, &name, Some(screen))
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    println!("Project created successfully:");
    println!("  Directory: {}", project.root.display());
    println!("  Resolution: {}x{}", width, height);
    println!("  Duration: {}", super::format_ms(duration_ms));
    println!();
    println!("Directory structure:");
    println!("  {}/", name);
    println!("  └── meta/        (project.json, timeline.json, events.jsonl)");

    Ok(())
}
