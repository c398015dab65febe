use std::path::PathBuf;

use recut_project_model::{parse_events, EditorSettings, LoadedProject, OutputWindow, Rect, Size, UserEvent};
use recut_timeline_core::{AutoScheduleCalculator, EditorSession, TimeMapper};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-project")
}

fn load_fixture_events() -> Vec<UserEvent> {
    let path = fixture_root().join("meta").join("events.jsonl");
    let content = std::fs::read_to_string(path).expect("fixture events should be readable");
    parse_events(&content).expect("fixture events should parse")
}

const SCREEN: Size = Size {
    width: 1920.0,
    height: 1080.0,
};

#[test]
fn fixture_schedule_is_stable() {
    let events = load_fixture_events();
    assert_eq!(events.len(), 10);

    let mapper = TimeMapper::new(&[OutputWindow::new(0.0, 30_000.0)]);
    let motions = AutoScheduleCalculator::with_defaults().calculate(
        &events,
        &mapper,
        SCREEN,
        &EditorSettings::default(),
    );

    let summary: Vec<(&str, f64, f64, &str)> = motions
        .iter()
        .map(|m| {
            (
                m.id.as_str(),
                m.output_start_time_ms(),
                m.output_end_time_ms,
                m.reason.as_str(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("auto-0", 500.0, 2000.0, "Zoom to click"),
            ("auto-1", 7700.0, 9200.0, "Zoom out after inactivity"),
            ("auto-2", 10_500.0, 12_000.0, "Zoom to click"),
            ("auto-3", 15_500.0, 17_000.0, "Zoom out after inactivity"),
            ("auto-4", 18_500.0, 20_000.0, "Zoom to drag"),
            ("auto-5", 24_000.0, 25_500.0, "Zoom out after inactivity"),
        ]
    );

    assert_eq!(motions[0].rect, Rect::new(0.0, 0.0, 960.0, 540.0));
    assert_eq!(motions[1].rect, Rect::full(SCREEN));
    assert_eq!(motions[2].rect, Rect::new(960.0, 540.0, 960.0, 540.0));
    assert_eq!(motions[4].rect, Rect::new(445.0, 540.0, 960.0, 540.0));
}

#[test]
fn fixture_schedule_follows_trimmed_output() {
    let events = load_fixture_events();
    // Trim [6000, 10000) out of the recording.
    let mapper = TimeMapper::new(&[
        OutputWindow::new(0.0, 6000.0),
        OutputWindow::new(10_000.0, 30_000.0),
    ]);
    let motions = AutoScheduleCalculator::with_defaults().calculate(
        &events,
        &mapper,
        SCREEN,
        &EditorSettings::default(),
    );

    let ends: Vec<f64> = motions.iter().map(|m| m.output_end_time_ms).collect();
    assert_eq!(ends, vec![2000.0, 8000.0, 13_000.0, 16_000.0, 21_500.0]);
    for pair in motions.windows(2) {
        assert!(pair[0].output_end_time_ms <= pair[1].output_start_time_ms());
    }
}

#[test]
fn fixture_project_opens_in_auto_mode() {
    let project = LoadedProject::load(fixture_root()).expect("fixture project should load");
    assert!(project.validate().is_empty());
    assert_eq!(project.timeline.windows.len(), 1);

    let mut session = EditorSession::from_project(&project, &Default::default());
    assert!(session.settings().zoom.auto_zoom);

    let outcome = session.recalculate_schedule();
    assert!(outcome.changed);
    assert_eq!(outcome.value.len(), 6);

    // Regenerating an unchanged timeline is a no-op.
    assert!(!session.recalculate_schedule().changed);
}
