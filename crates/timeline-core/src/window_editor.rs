//! Output window editing: split, resize, move, remove, speed and insert.
//!
//! Every operation takes the current list and returns the complete updated
//! list. Sort order and source-time non-overlap always hold afterwards.
//! Impossible requests are clamped or become no-ops; nothing here fails.

use tracing::debug;

use recut_project_model::timeline::OutputWindow;

use crate::outcome::EditOutcome;
use crate::time_mapper::TimeMapper;

/// Default smallest source span a window can be resized to.
pub const MIN_WINDOW_DURATION_MS: f64 = 200.0;

/// Allowed playback speed range.
pub const MIN_SPEED: f64 = 0.25;
pub const MAX_SPEED: f64 = 16.0;

/// Which edge of a window is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Where to split, in either time domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitAt {
    Source(f64),
    Output(f64),
}

/// Window operations bounded by the recording length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowEditor {
    source_duration_ms: f64,
    min_duration_ms: f64,
}

impl WindowEditor {
    pub fn new(source_duration_ms: f64) -> Self {
        Self::with_min_duration(source_duration_ms, MIN_WINDOW_DURATION_MS)
    }

    pub fn with_min_duration(source_duration_ms: f64, min_duration_ms: f64) -> Self {
        Self {
            source_duration_ms,
            min_duration_ms,
        }
    }

    pub fn min_duration_ms(&self) -> f64 {
        self.min_duration_ms
    }

    /// Replace a window with `[start, p)` and `[p, end)`.
    ///
    /// No-op unless `p` is strictly inside the window.
    pub fn split(
        &self,
        windows: &[OutputWindow],
        id: &str,
        at: SplitAt,
    ) -> EditOutcome<Vec<OutputWindow>> {
        let Some(index) = find(windows, id) else {
            return EditOutcome::unchanged(windows.to_vec());
        };
        let window = &windows[index];

        let point = match at {
            SplitAt::Source(ms) => Some(ms),
            SplitAt::Output(ms) => TimeMapper::new(windows).output_to_source(ms),
        };
        let Some(point) = point.filter(|p| *p > window.start_ms && *p < window.end_ms) else {
            return EditOutcome::unchanged(windows.to_vec());
        };

        let mut left = window.clone();
        left.end_ms = point;
        let right = OutputWindow::with_speed(point, window.end_ms, window.speed);
        debug!(window = %window.id, point, new_window = %right.id, "split window");

        let mut result = windows.to_vec();
        result.splice(index..=index, [left, right]);
        EditOutcome::changed(result)
    }

    /// Move one edge by a source-time delta, clamped against the minimum
    /// duration and then against neighbors. Neighbors win when a window is
    /// already shorter than the minimum.
    pub fn resize(
        &self,
        windows: &[OutputWindow],
        id: &str,
        edge: Edge,
        delta_ms: f64,
    ) -> EditOutcome<Vec<OutputWindow>> {
        let Some(index) = find(windows, id) else {
            return EditOutcome::unchanged(windows.to_vec());
        };
        let (min_start, max_end) = self.free_range(windows, index);

        let mut result = windows.to_vec();
        let window = &mut result[index];
        match edge {
            Edge::Left => {
                window.start_ms = (window.start_ms + delta_ms)
                    .min(window.end_ms - self.min_duration_ms)
                    .max(min_start);
            }
            Edge::Right => {
                window.end_ms = (window.end_ms + delta_ms)
                    .max(window.start_ms + self.min_duration_ms)
                    .min(max_end);
            }
        }
        debug!(window = %window.id, ?edge, delta_ms, start = window.start_ms, end = window.end_ms, "resized window");

        outcome(windows, result)
    }

    /// Shift both edges together without crossing either neighbor.
    pub fn move_window(
        &self,
        windows: &[OutputWindow],
        id: &str,
        delta_ms: f64,
    ) -> EditOutcome<Vec<OutputWindow>> {
        let Some(index) = find(windows, id) else {
            return EditOutcome::unchanged(windows.to_vec());
        };
        let (min_start, max_end) = self.free_range(windows, index);

        let mut result = windows.to_vec();
        let window = &mut result[index];
        let delta = delta_ms
            .min(max_end - window.end_ms)
            .max(min_start - window.start_ms);
        window.start_ms += delta;
        window.end_ms += delta;

        outcome(windows, result)
    }

    /// Delete a window. The others keep their source ranges.
    pub fn remove(&self, windows: &[OutputWindow], id: &str) -> EditOutcome<Vec<OutputWindow>> {
        let result: Vec<OutputWindow> = windows.iter().filter(|w| w.id != id).cloned().collect();
        let changed = result.len() != windows.len();
        if changed {
            debug!(window = id, "removed window");
        }
        EditOutcome {
            value: result,
            changed,
        }
    }

    /// Change playback speed, clamped to [`MIN_SPEED`, `MAX_SPEED`].
    pub fn set_speed(
        &self,
        windows: &[OutputWindow],
        id: &str,
        speed: f64,
    ) -> EditOutcome<Vec<OutputWindow>> {
        let Some(index) = find(windows, id) else {
            return EditOutcome::unchanged(windows.to_vec());
        };
        if !speed.is_finite() {
            return EditOutcome::unchanged(windows.to_vec());
        }

        let mut result = windows.to_vec();
        result[index].speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        outcome(windows, result)
    }

    /// Restore a source range as a new window, clipped to the trimmed gap
    /// that contains `start_ms`.
    ///
    /// No-op if `start_ms` is already kept or the clipped range is shorter
    /// than the minimum duration.
    pub fn insert(
        &self,
        windows: &[OutputWindow],
        start_ms: f64,
        end_ms: f64,
    ) -> EditOutcome<Vec<OutputWindow>> {
        if windows.iter().any(|w| w.contains_source(start_ms)) {
            return EditOutcome::unchanged(windows.to_vec());
        }

        let index = windows.partition_point(|w| w.start_ms <= start_ms);
        let gap_start = index
            .checked_sub(1)
            .map_or(0.0, |prev| windows[prev].end_ms);
        let gap_end = windows
            .get(index)
            .map_or(self.source_duration_ms, |next| next.start_ms);

        let start = start_ms.max(gap_start);
        let end = end_ms.min(gap_end);
        if end - start < self.min_duration_ms {
            return EditOutcome::unchanged(windows.to_vec());
        }

        let window = OutputWindow::new(start, end);
        debug!(window = %window.id, start, end, "inserted window");
        let mut result = windows.to_vec();
        result.insert(index, window);
        EditOutcome::changed(result)
    }

    /// Source range a window may occupy without touching its neighbors.
    fn free_range(&self, windows: &[OutputWindow], index: usize) -> (f64, f64) {
        let min_start = index
            .checked_sub(1)
            .map_or(0.0, |prev| windows[prev].end_ms);
        let max_end = windows
            .get(index + 1)
            .map_or(self.source_duration_ms, |next| next.start_ms);
        (min_start, max_end)
    }
}

fn find(windows: &[OutputWindow], id: &str) -> Option<usize> {
    windows.iter().position(|w| w.id == id)
}

fn outcome(before: &[OutputWindow], after: Vec<OutputWindow>) -> EditOutcome<Vec<OutputWindow>> {
    let changed = after.as_slice() != before;
    EditOutcome {
        value: after,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(id: &str, start: f64, end: f64) -> OutputWindow {
        OutputWindow {
            id: id.to_string(),
            start_ms: start,
            end_ms: end,
            speed: 1.0,
        }
    }

    fn three() -> Vec<OutputWindow> {
        vec![
            window("a", 0.0, 2000.0),
            window("b", 3000.0, 5000.0),
            window("c", 6000.0, 8000.0),
        ]
    }

    #[test]
    fn test_split_at_source() {
        let editor = WindowEditor::new(10_000.0);
        let mut windows = vec![window("a", 0.0, 10_000.0)];
        windows[0].speed = 1.5;

        let outcome = editor.split(&windows, "a", SplitAt::Source(4000.0));
        assert!(outcome.changed);
        let result = outcome.value;
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].start_ms, result[0].end_ms), (0.0, 4000.0));
        assert_eq!((result[1].start_ms, result[1].end_ms), (4000.0, 10_000.0));
        assert_eq!(result[0].id, "a");
        assert_ne!(result[1].id, "a");
        assert!(result.iter().all(|w| w.speed == 1.5));
    }

    #[test]
    fn test_split_at_output_respects_speed() {
        let editor = WindowEditor::new(10_000.0);
        let mut windows = three();
        windows[1].speed = 2.0;

        // Output: a = [0, 2000), b = [2000, 3000). 2500 output is 4000 source.
        let result = editor.split(&windows, "b", SplitAt::Output(2500.0)).value;
        assert_eq!(result.len(), 4);
        assert_eq!(result[1].end_ms, 4000.0);
        assert_eq!(result[2].start_ms, 4000.0);
    }

    #[test]
    fn test_split_edges_are_noops() {
        let editor = WindowEditor::new(10_000.0);
        let windows = three();
        for point in [3000.0, 5000.0, 100.0, 9000.0] {
            let outcome = editor.split(&windows, "b", SplitAt::Source(point));
            assert!(!outcome.changed);
            assert_eq!(outcome.value, windows);
        }
        assert!(!editor.split(&windows, "missing", SplitAt::Source(1000.0)).changed);
    }

    #[test]
    fn test_split_output_in_other_window_is_noop() {
        let editor = WindowEditor::new(10_000.0);
        let windows = three();
        // Output 500 belongs to window "a", not "b".
        assert!(!editor.split(&windows, "b", SplitAt::Output(500.0)).changed);
    }

    #[test]
    fn test_resize_left_clamps_to_previous_end() {
        let editor = WindowEditor::new(10_000.0);
        let result = editor.resize(&three(), "b", Edge::Left, -5000.0).value;
        assert_eq!(result[1].start_ms, 2000.0);
    }

    #[test]
    fn test_resize_left_keeps_min_duration() {
        let editor = WindowEditor::new(10_000.0);
        let result = editor.resize(&three(), "b", Edge::Left, 5000.0).value;
        assert_eq!(result[1].start_ms, 5000.0 - MIN_WINDOW_DURATION_MS);
    }

    #[test]
    fn test_resize_right_clamps_to_next_start_and_total() {
        let editor = WindowEditor::new(10_000.0);
        let result = editor.resize(&three(), "b", Edge::Right, 5000.0).value;
        assert_eq!(result[1].end_ms, 6000.0);

        let result = editor.resize(&three(), "c", Edge::Right, 5000.0).value;
        assert_eq!(result[2].end_ms, 10_000.0);

        let result = editor.resize(&three(), "c", Edge::Right, -5000.0).value;
        assert_eq!(result[2].end_ms, 6000.0 + MIN_WINDOW_DURATION_MS);
    }

    #[test]
    fn test_resize_first_window_clamps_to_zero() {
        let editor = WindowEditor::new(10_000.0);
        let mut windows = three();
        windows[0].start_ms = 500.0;
        let outcome = editor.resize(&windows, "a", Edge::Left, -1000.0);
        assert!(outcome.changed);
        assert_eq!(outcome.value[0].start_ms, 0.0);
    }

    #[test]
    fn test_resize_short_window_never_crosses_neighbor() {
        let editor = WindowEditor::new(10_000.0);
        let windows = vec![window("a", 0.0, 1000.0), window("b", 1000.0, 1050.0)];
        let outcome = editor.resize(&windows, "b", Edge::Left, 30.0);
        assert_eq!(outcome.value[1].start_ms, 1000.0);
        assert!(!outcome.changed);
    }

    #[test]
    fn test_resize_against_wall_reports_unchanged() {
        let editor = WindowEditor::new(10_000.0);
        let outcome = editor.resize(&three(), "a", Edge::Left, -100.0);
        assert!(!outcome.changed);
    }

    #[test]
    fn test_move_clamps_between_neighbors() {
        let editor = WindowEditor::new(10_000.0);
        let result = editor.move_window(&three(), "b", 5000.0).value;
        assert_eq!((result[1].start_ms, result[1].end_ms), (4000.0, 6000.0));

        let result = editor.move_window(&three(), "b", -5000.0).value;
        assert_eq!((result[1].start_ms, result[1].end_ms), (2000.0, 4000.0));

        let result = editor.move_window(&three(), "b", 250.0).value;
        assert_eq!((result[1].start_ms, result[1].end_ms), (3250.0, 5250.0));
    }

    #[test]
    fn test_remove_leaves_others_untouched() {
        let editor = WindowEditor::new(10_000.0);
        let outcome = editor.remove(&three(), "b");
        assert!(outcome.changed);
        assert_eq!(outcome.value, vec![window("a", 0.0, 2000.0), window("c", 6000.0, 8000.0)]);
        assert!(!editor.remove(&three(), "zzz").changed);
    }

    #[test]
    fn test_set_speed_clamps() {
        let editor = WindowEditor::new(10_000.0);
        assert_eq!(editor.set_speed(&three(), "a", 100.0).value[0].speed, MAX_SPEED);
        assert_eq!(editor.set_speed(&three(), "a", 0.0).value[0].speed, MIN_SPEED);
        assert!(!editor.set_speed(&three(), "a", 1.0).changed);
        assert!(!editor.set_speed(&three(), "a", f64::NAN).changed);
    }

    #[test]
    fn test_insert_clips_to_gap() {
        let editor = WindowEditor::new(10_000.0);
        let outcome = editor.insert(&three(), 2500.0, 9000.0);
        assert!(outcome.changed);
        let result = outcome.value;
        assert_eq!(result.len(), 4);
        assert_eq!((result[1].start_ms, result[1].end_ms), (2500.0, 3000.0));

        let tail = editor.insert(&three(), 8000.0, 20_000.0).value;
        assert_eq!((tail[3].start_ms, tail[3].end_ms), (8000.0, 10_000.0));
    }

    #[test]
    fn test_insert_rejects_kept_or_tiny_ranges() {
        let editor = WindowEditor::new(10_000.0);
        assert!(!editor.insert(&three(), 1000.0, 2500.0).changed);
        assert!(!editor.insert(&three(), 2950.0, 4000.0).changed);
    }
}
