//! List projects in the projects directory.

use recut_common::AppConfig;
use recut_project_model::DirectoryStore;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let store = DirectoryStore::new(&config.projects_dir);
    let ids = store
        .list_projects()
        .map_err(|e| anyhow::anyhow!("Failed to list projects: {e}"))?;

    if ids.is_empty() {
        println!("No projects in {}", config.projects_dir.display());
        return Ok(());
    }

    println!("Projects in {}:", config.projects_dir.display());
    for id in ids {
        println!("  {id}");
    }
    Ok(())
}
