//! Timeline: output windows over the source recording plus the two
//! action tracks (viewport motions and spotlights).
//!
//! Windows live in source time; actions live in output time. The JSON
//! shape uses camelCase millisecond fields and opaque string ids.

use serde::{Deserialize, Serialize};

use crate::viewport::{CornerRadii, Rect};

/// Generate a fresh opaque identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_speed() -> f64 {
    1.0
}

/// A kept slice of the source recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputWindow {
    pub id: String,
    /// Source-time start (inclusive).
    pub start_ms: f64,
    /// Source-time end (exclusive).
    pub end_ms: f64,
    /// Playback speed; 2.0 plays the slice in half the time.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl OutputWindow {
    pub fn new(start_ms: f64, end_ms: f64) -> Self {
        Self::with_speed(start_ms, end_ms, 1.0)
    }

    pub fn with_speed(start_ms: f64, end_ms: f64, speed: f64) -> Self {
        Self {
            id: new_id(),
            start_ms,
            end_ms,
            speed,
        }
    }

    /// Length of the slice in source time.
    pub fn source_duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    /// Output time this slice consumes.
    pub fn output_duration_ms(&self) -> f64 {
        self.source_duration_ms() / self.speed
    }

    /// Half-open containment in source time.
    pub fn contains_source(&self, source_ms: f64) -> bool {
        source_ms >= self.start_ms && source_ms < self.end_ms
    }
}

/// Where a viewport motion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionSource {
    /// Generated by the auto-zoom schedule.
    Auto,
    /// Created or edited by the user.
    Manual,
}

/// A zoom/pan instruction on the zoom track.
///
/// Anchored by its end instant: the camera arrives at `rect` at
/// `output_end_time_ms`, having moved for `duration_ms` beforehand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportMotion {
    pub id: String,
    pub output_end_time_ms: f64,
    pub duration_ms: f64,
    /// Target framing in source-video pixels.
    pub rect: Rect,
    pub source: MotionSource,
    /// Human-readable explanation shown in the UI.
    pub reason: String,
}

impl ViewportMotion {
    pub fn manual(output_end_time_ms: f64, duration_ms: f64, rect: Rect) -> Self {
        Self {
            id: new_id(),
            output_end_time_ms,
            duration_ms,
            rect,
            source: MotionSource::Manual,
            reason: "Manual zoom".to_string(),
        }
    }

    pub fn auto(
        output_end_time_ms: f64,
        duration_ms: f64,
        rect: Rect,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            output_end_time_ms,
            duration_ms,
            rect,
            source: MotionSource::Auto,
            reason: reason.into(),
        }
    }

    pub fn output_start_time_ms(&self) -> f64 {
        self.output_end_time_ms - self.duration_ms
    }
}

/// A highlight that enlarges a region of the source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightAction {
    pub id: String,
    pub output_start_time_ms: f64,
    pub output_end_time_ms: f64,
    /// Highlighted region in source-video pixels.
    pub rect: Rect,
    /// Enlargement applied to the region.
    pub scale: f64,
    #[serde(default)]
    pub radii: CornerRadii,
}

impl SpotlightAction {
    pub fn new(output_start_time_ms: f64, output_end_time_ms: f64, rect: Rect, scale: f64) -> Self {
        Self {
            id: new_id(),
            output_start_time_ms,
            output_end_time_ms,
            rect,
            scale,
            radii: CornerRadii::default(),
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.output_end_time_ms - self.output_start_time_ms
    }
}

/// Editing timeline (`timeline.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Schema version.
    pub version: String,

    /// Constant offset between output time and the on-screen ruler.
    #[serde(default)]
    pub leading_offset_ms: f64,

    /// Kept source slices, sorted by `start_ms`, non-overlapping.
    #[serde(default)]
    pub windows: Vec<OutputWindow>,

    /// Zoom track.
    #[serde(default)]
    pub motions: Vec<ViewportMotion>,

    /// Spotlight track.
    #[serde(default)]
    pub spotlights: Vec<SpotlightAction>,
}

impl Timeline {
    /// An empty timeline with no windows.
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            leading_offset_ms: 0.0,
            windows: vec![],
            motions: vec![],
            spotlights: vec![],
        }
    }

    /// A timeline keeping the whole recording at normal speed.
    pub fn for_recording(duration_ms: f64) -> Self {
        let mut timeline = Self::new();
        if duration_ms > 0.0 {
            timeline.windows.push(OutputWindow::new(0.0, duration_ms));
        }
        timeline
    }

    pub fn window(&self, id: &str) -> Option<&OutputWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn motion(&self, id: &str) -> Option<&ViewportMotion> {
        self.motions.iter().find(|m| m.id == id)
    }

    pub fn spotlight(&self, id: &str) -> Option<&SpotlightAction> {
        self.spotlights.iter().find(|s| s.id == id)
    }

    /// Report structural problems without failing.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = vec![];

        for window in &self.windows {
            if !(window.speed > 0.0) {
                issues.push(format!("Window {} has non-positive speed", window.id));
            }
            if window.end_ms <= window.start_ms {
                issues.push(format!("Window {} is empty or inverted", window.id));
            }
        }
        for pair in self.windows.windows(2) {
            if pair[1].start_ms < pair[0].start_ms {
                issues.push(format!("Windows {} and {} are out of order", pair[0].id, pair[1].id));
            } else if pair[1].start_ms < pair[0].end_ms {
                issues.push(format!("Windows {} and {} overlap", pair[0].id, pair[1].id));
            }
        }

        let mut motion_spans: Vec<(f64, f64, &str)> = self
            .motions
            .iter()
            .map(|m| (m.output_start_time_ms(), m.output_end_time_ms, m.id.as_str()))
            .collect();
        check_track_overlap("Motions", &mut motion_spans, &mut issues);

        let mut spotlight_spans: Vec<(f64, f64, &str)> = self
            .spotlights
            .iter()
            .map(|s| (s.output_start_time_ms, s.output_end_time_ms, s.id.as_str()))
            .collect();
        check_track_overlap("Spotlights", &mut spotlight_spans, &mut issues);

        issues
    }
}

fn check_track_overlap(label: &str, spans: &mut [(f64, f64, &str)], issues: &mut Vec<String>) {
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));
    for pair in spans.windows(2) {
        if pair[1].0 < pair[0].1 {
            issues.push(format!("{label} {} and {} overlap", pair[0].2, pair[1].2));
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_output_duration_respects_speed() {
        let window = OutputWindow::with_speed(5000.0, 10000.0, 2.0);
        assert_eq!(window.source_duration_ms(), 5000.0);
        assert_eq!(window.output_duration_ms(), 2500.0);
    }

    #[test]
    fn test_window_speed_defaults_when_missing() {
        let window: OutputWindow =
            serde_json::from_str(r#"{"id":"w1","startMs":0,"endMs":1000}"#).unwrap();
        assert_eq!(window.speed, 1.0);
    }

    #[test]
    fn test_timeline_json_uses_camel_case() {
        let mut timeline = Timeline::for_recording(1000.0);
        timeline.motions.push(ViewportMotion::manual(
            800.0,
            400.0,
            Rect::new(0.0, 0.0, 100.0, 100.0),
        ));
        let json = serde_json::to_string(&timeline).unwrap();
        assert!(json.contains("\"startMs\":0.0"));
        assert!(json.contains("\"outputEndTimeMs\":800.0"));
        assert!(json.contains("\"source\":\"manual\""));

        let parsed: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, timeline);
    }

    #[test]
    fn test_for_recording_single_window() {
        let timeline = Timeline::for_recording(60_000.0);
        assert_eq!(timeline.windows.len(), 1);
        assert_eq!(timeline.windows[0].end_ms, 60_000.0);
        assert!(Timeline::for_recording(0.0).windows.is_empty());
    }

    #[test]
    fn test_motion_start_derived_from_end() {
        let motion = ViewportMotion::manual(3000.0, 1200.0, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(motion.output_start_time_ms(), 1800.0);
    }

    #[test]
    fn test_validate_reports_overlaps() {
        let mut timeline = Timeline::new();
        timeline.windows = vec![
            OutputWindow::new(0.0, 1000.0),
            OutputWindow::new(500.0, 2000.0),
        ];
        timeline.spotlights = vec![
            SpotlightAction::new(0.0, 1000.0, Rect::new(0.0, 0.0, 10.0, 10.0), 1.2),
            SpotlightAction::new(900.0, 1500.0, Rect::new(0.0, 0.0, 10.0, 10.0), 1.2),
        ];

        let issues = timeline.validate();
        assert!(issues.iter().any(|i| i.starts_with("Windows") && i.ends_with("overlap")));
        assert!(issues.iter().any(|i| i.starts_with("Spotlights")));
    }

    #[test]
    fn test_validate_clean_timeline() {
        assert!(Timeline::for_recording(5000.0).validate().is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn disjoint_windows() -> impl Strategy<Value = Vec<OutputWindow>> {
            prop::collection::vec((0.0f64..5_000.0, 1.0f64..5_000.0, 0.5f64..4.0), 0..8).prop_map(
                |parts| {
                    let mut cursor = 0.0;
                    parts
                        .into_iter()
                        .map(|(gap, len, speed)| {
                            let start = cursor + gap;
                            cursor = start + len;
                            OutputWindow::with_speed(start, cursor, speed)
                        })
                        .collect()
                },
            )
        }

        proptest! {
            #[test]
            fn prop_sorted_disjoint_windows_validate_clean(windows in disjoint_windows()) {
                let mut timeline = Timeline::new();
                timeline.windows = windows;
                prop_assert!(timeline.validate().is_empty());
            }
        }
    }
}
