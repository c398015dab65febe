//! Validate a Recut project.

use recut_common::AppConfig;

use super::open_project;

pub fn run(project: &str, config: &AppConfig) -> anyhow::Result<()> {
    let project = open_project(project, config)?;
    println!("Validating project at: {}", project.root.display());

    println!("  Name: {}", project.project.name);
    println!("  Version: {}", project.project.version);
    println!("  Windows: {}", project.timeline.windows.len());
    println!("  Zoom motions: {}", project.timeline.motions.len());
    println!("  Spotlights: {}", project.timeline.spotlights.len());
    println!("  Events: {}", project.events.len());

    let errors = project.validate();
    if errors.is_empty() {
        println!("\nProject is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for error in &errors {
        println!("  - {error}");
    }
    anyhow::bail!("{} issue(s) found", errors.len())
}
