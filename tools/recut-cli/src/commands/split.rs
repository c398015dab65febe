//! Split an output window.

use recut_common::AppConfig;
use recut_timeline_core::{EditorSession, SplitAt};

use super::{format_ms, open_project};

pub fn run(
    project: &str,
    config: &AppConfig,
    window: &str,
    source: Option<f64>,
    output: Option<f64>,
) -> anyhow::Result<()> {
    let at = match (source, output) {
        (Some(ms), None) => SplitAt::Source(ms),
        (None, Some(ms)) => SplitAt::Output(ms),
        _ => anyhow::bail!("Give exactly one of --source or --output"),
    };

    let mut project = open_project(project, config)?;
    let mut session = EditorSession::from_project(&project, config);
    if session.timeline().window(window).is_none() {
        anyhow::bail!("No window with id {window}");
    }

    let outcome = session.split_window(window, at);
    if !outcome.changed {
        println!("Split point is not inside window {window}; nothing changed.");
        return Ok(());
    }

    for w in &outcome.value {
        println!("  {}  {} - {}", w.id, format_ms(w.start_ms), format_ms(w.end_ms));
    }

    session.write_back(&mut project);
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save timeline: {e}"))?;
    println!("Split window {window}.");

    Ok(())
}
