//! Show project information.

use recut_common::AppConfig;
use recut_timeline_core::TimeMapper;

use super::{format_ms, open_project};

pub fn run(project: &str, config: &AppConfig) -> anyhow::Result<()> {
    let project = open_project(project, config)?;
    let p = &project.project;
    let timeline = &project.timeline;

    println!("Project: {}", p.name);
    println!("  ID: {}", p.id);
    println!("  Created: {}", p.created_at);
    println!("  Modified: {}", p.modified_at);
    println!();

    println!("Recording:");
    match &p.screen {
        Some(screen) => {
            println!("  Screen: {} ({}x{})", screen.media_id, screen.width, screen.height);
            println!("  Duration: {}", format_ms(screen.duration_ms));
        }
        None => println!("  Screen: none"),
    }
    if let Some(camera) = &p.camera {
        println!("  Camera: {} (offset {}ms)", camera.media_id, camera.offset_ms);
    }
    println!("  Events: {}", project.events.len());
    println!();

    let mapper = TimeMapper::from_timeline(timeline);
    println!("Timeline:");
    println!("  Output duration: {}", format_ms(mapper.output_duration_ms()));
    println!("  Leading offset: {}ms", timeline.leading_offset_ms);
    println!("  Windows: {}", timeline.windows.len());
    for (index, window) in timeline.windows.iter().enumerate() {
        let (start, end) = mapper.window_output_span(index).unwrap_or((0.0, 0.0));
        println!(
            "    {}  source {}-{}  output {}-{}  x{}",
            window.id,
            format_ms(window.start_ms),
            format_ms(window.end_ms),
            format_ms(start),
            format_ms(end),
            window.speed
        );
    }
    println!("  Zoom motions: {}", timeline.motions.len());
    println!("  Spotlights: {}", timeline.spotlights.len());
    println!();

    let zoom = &p.settings.zoom;
    println!("Settings:");
    println!("  Auto zoom: {}", if zoom.auto_zoom { "on" } else { "off" });
    println!("  Max zoom: {}x", zoom.max_zoom);
    println!(
        "  Zoom duration: {}-{}ms",
        zoom.min_zoom_duration_ms, zoom.max_zoom_duration_ms
    );
    println!(
        "  Output: {}x{}",
        p.settings.output_size.width, p.settings.output_size.height
    );

    Ok(())
}
