pub mod analyze;
pub mod info;
pub mod init;
pub mod list;
pub mod map;
pub mod remove_window;
pub mod split;
pub mod validate;

use std::path::Path;

use recut_common::AppConfig;
use recut_project_model::{DirectoryStore, LoadedProject, ProjectStore};

/// Load a project from a directory path, or by name from the projects
/// directory.
pub fn open_project(project: &str, config: &AppConfig) -> anyhow::Result<LoadedProject> {
    let path = Path::new(project);
    if path.join("meta").join("project.json").exists() {
        tracing::debug!(path = %path.display(), "opening project directory");
        return LoadedProject::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load project: {e}"));
    }

    tracing::debug!(
        name = project,
        root = %config.projects_dir.display(),
        "looking up project by name"
    );
    DirectoryStore::new(&config.projects_dir)
        .load_project(project)
        .map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))
}

/// Format milliseconds as `m:ss.mmm`.
pub fn format_ms(ms: f64) -> String {
    let total = ms.max(0.0).round() as u64;
    format!("{}:{:02}.{:03}", total / 60_000, (total / 1000) % 60, total % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(0.0), "0:00.000");
        assert_eq!(format_ms(61_250.0), "1:01.250");
        assert_eq!(format_ms(-5.0), "0:00.000");
    }
}
