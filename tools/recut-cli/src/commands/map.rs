//! Map an instant between time domains and show what plays there.

use recut_common::AppConfig;
use recut_timeline_core::EditorSession;

use super::{format_ms, open_project};
use crate::TimeDomain;

pub fn run(
    project: &str,
    config: &AppConfig,
    time_ms: f64,
    from: TimeDomain,
    json: bool,
) -> anyhow::Result<()> {
    let project = open_project(project, config)?;
    let session = EditorSession::from_project(&project, config);
    let mapper = session.mapper();

    let output_ms = match from {
        TimeDomain::Output => Some(time_ms),
        TimeDomain::Timeline => Some(mapper.timeline_to_output(time_ms)),
        TimeDomain::Source => mapper.source_to_output(time_ms),
    };
    let Some(output_ms) = output_ms else {
        if json {
            println!("null");
        } else {
            println!("Source {} is trimmed out of the output.", format_ms(time_ms));
        }
        return Ok(());
    };

    let frame = session.frame_at(output_ms);
    if json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
        return Ok(());
    }

    println!("Output:   {} ({}ms)", format_ms(frame.output_ms), frame.output_ms);
    println!("Timeline: {} ({}ms)", format_ms(frame.timeline_ms), frame.timeline_ms);
    match (frame.source_ms, &frame.window_id) {
        (Some(source), Some(window)) => {
            println!("Source:   {} ({}ms) in window {}", format_ms(source), source, window);
        }
        _ => println!("Source:   not visible"),
    }
    for motion in &frame.motions {
        println!("Zoom:     {} ({})", motion.id, motion.reason);
    }
    for spotlight in &frame.spotlights {
        println!("Spotlight: {} x{}", spotlight.id, spotlight.scale);
    }
    let camera = session.camera_at(output_ms);
    println!(
        "Camera:   {:.0},{:.0} {:.0}x{:.0}",
        camera.x, camera.y, camera.width, camera.height
    );

    Ok(())
}
