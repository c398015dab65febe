//! Conversion between source, output and timeline time.
//!
//! Output windows keep slices of the source recording; concatenating their
//! (speed-scaled) lengths yields output time. Timeline time is output time
//! shifted by a constant leading offset.
//!
//! Every covered source instant maps to exactly one instant in
//! `[0, output_duration)` and back. Instants in trimmed gaps, or outside
//! the output range, are not visible and map to `None`.

use std::sync::Arc;

use recut_project_model::timeline::{OutputWindow, Timeline};

/// Numeric marker for "not visible", for collaborators that want a plain number.
pub const NOT_VISIBLE: f64 = -1.0;

/// Immutable mapping built from an ordered window list.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMapper {
    windows: Vec<OutputWindow>,
    /// Output time at which each window begins.
    output_starts: Vec<f64>,
    output_duration_ms: f64,
    leading_offset_ms: f64,
}

impl TimeMapper {
    pub fn new(windows: &[OutputWindow]) -> Self {
        Self::with_offset(windows, 0.0)
    }

    pub fn with_offset(windows: &[OutputWindow], leading_offset_ms: f64) -> Self {
        let mut output_starts = Vec::with_capacity(windows.len());
        let mut total = 0.0;
        for window in windows {
            output_starts.push(total);
            total += window.output_duration_ms();
        }

        Self {
            windows: windows.to_vec(),
            output_starts,
            output_duration_ms: total,
            leading_offset_ms,
        }
    }

    pub fn from_timeline(timeline: &Timeline) -> Self {
        Self::with_offset(&timeline.windows, timeline.leading_offset_ms)
    }

    pub fn windows(&self) -> &[OutputWindow] {
        &self.windows
    }

    pub fn leading_offset_ms(&self) -> f64 {
        self.leading_offset_ms
    }

    /// Sum of every window's output duration.
    pub fn output_duration_ms(&self) -> f64 {
        self.output_duration_ms
    }

    /// Index of the window whose source range contains `source_ms`.
    pub fn window_index_at_source(&self, source_ms: f64) -> Option<usize> {
        if !source_ms.is_finite() {
            return None;
        }
        let candidates = self.windows.partition_point(|w| w.start_ms <= source_ms);
        let index = candidates.checked_sub(1)?;
        self.windows[index]
            .contains_source(source_ms)
            .then_some(index)
    }

    /// Index of the window that owns output instant `output_ms`.
    pub fn window_index_at_output(&self, output_ms: f64) -> Option<usize> {
        if !output_ms.is_finite() || output_ms < 0.0 || output_ms >= self.output_duration_ms {
            return None;
        }
        let candidates = self.output_starts.partition_point(|&start| start <= output_ms);
        candidates.checked_sub(1)
    }

    pub fn window_at_output(&self, output_ms: f64) -> Option<&OutputWindow> {
        self.window_index_at_output(output_ms)
            .map(|index| &self.windows[index])
    }

    /// Output range `[start, end)` occupied by the window at `index`.
    pub fn window_output_span(&self, index: usize) -> Option<(f64, f64)> {
        let window = self.windows.get(index)?;
        let start = self.output_starts[index];
        Some((start, start + window.output_duration_ms()))
    }

    pub fn source_to_output(&self, source_ms: f64) -> Option<f64> {
        let index = self.window_index_at_source(source_ms)?;
        let window = &self.windows[index];
        Some(self.output_starts[index] + (source_ms - window.start_ms) / window.speed)
    }

    pub fn output_to_source(&self, output_ms: f64) -> Option<f64> {
        let index = self.window_index_at_output(output_ms)?;
        let window = &self.windows[index];
        let source = window.start_ms + (output_ms - self.output_starts[index]) * window.speed;
        // Window ends are exclusive; float error must not reach them.
        Some(source.min(below(window.end_ms)).max(window.start_ms))
    }

    pub fn output_to_timeline(&self, output_ms: f64) -> f64 {
        output_ms + self.leading_offset_ms
    }

    pub fn timeline_to_output(&self, timeline_ms: f64) -> f64 {
        timeline_ms - self.leading_offset_ms
    }

    pub fn source_to_timeline(&self, source_ms: f64) -> Option<f64> {
        self.source_to_output(source_ms)
            .map(|output| self.output_to_timeline(output))
    }

    pub fn timeline_to_source(&self, timeline_ms: f64) -> Option<f64> {
        self.output_to_source(self.timeline_to_output(timeline_ms))
    }

    /// [`Self::source_to_output`] with [`NOT_VISIBLE`] in place of `None`.
    pub fn source_to_output_or_sentinel(&self, source_ms: f64) -> f64 {
        self.source_to_output(source_ms).unwrap_or(NOT_VISIBLE)
    }

    /// [`Self::output_to_source`] with [`NOT_VISIBLE`] in place of `None`.
    pub fn output_to_source_or_sentinel(&self, output_ms: f64) -> f64 {
        self.output_to_source(output_ms).unwrap_or(NOT_VISIBLE)
    }

    /// Whether an action anchored at `output_ms` still lands inside the output.
    ///
    /// The closing instant of the output counts as valid so that an action
    /// may end exactly when the video does.
    pub fn is_valid_anchor(&self, output_ms: f64) -> bool {
        self.output_duration_ms > 0.0 && output_ms >= 0.0 && output_ms <= self.output_duration_ms
    }
}

/// Largest `f64` strictly below a positive finite `x`.
fn below(x: f64) -> f64 {
    if x > 0.0 && x.is_finite() {
        f64::from_bits(x.to_bits() - 1)
    } else {
        x
    }
}

/// Reuses a mapper until the window list (or leading offset) changes.
#[derive(Debug, Default)]
pub struct MapperCache {
    current: Option<Arc<TimeMapper>>,
    builds: usize,
}

impl MapperCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, timeline: &Timeline) -> Arc<TimeMapper> {
        if let Some(mapper) = &self.current {
            if mapper.windows == timeline.windows
                && mapper.leading_offset_ms == timeline.leading_offset_ms
            {
                return Arc::clone(mapper);
            }
        }

        let mapper = Arc::new(TimeMapper::from_timeline(timeline));
        self.current = Some(Arc::clone(&mapper));
        self.builds += 1;
        mapper
    }

    /// Number of mappers built so far.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows(ranges: &[(f64, f64, f64)]) -> Vec<OutputWindow> {
        ranges.iter()
            .map(|&(start, end, speed)| OutputWindow::with_speed(start, end, speed))
            .collect()
    }

    #[test]
    fn test_empty_windows() {
        let mapper = TimeMapper::new(&[]);
        assert_eq!(mapper.output_duration_ms(), 0.0);
        assert_eq!(mapper.source_to_output(0.0), None);
        assert_eq!(mapper.output_to_source(0.0), None);
        assert!(!mapper.is_valid_anchor(0.0));
    }

    #[test]
    fn test_single_full_window_is_identity() {
        let mapper = TimeMapper::new(&windows(&[(0.0, 10_000.0, 1.0)]));
        for t in [0.0, 1.0, 4321.0, 9999.0] {
            assert_eq!(mapper.source_to_output(t), Some(t));
            assert_eq!(mapper.output_to_source(t), Some(t));
        }
        assert_eq!(mapper.output_to_source(10_000.0), None);
    }

    #[test]
    fn test_speed_scenario() {
        let mapper = TimeMapper::new(&windows(&[(0.0, 5000.0, 1.0), (5000.0, 10_000.0, 2.0)]));
        assert_eq!(mapper.output_duration_ms(), 7500.0);
        assert_eq!(mapper.output_to_source(6000.0), Some(7000.0));
        assert_eq!(mapper.source_to_output(7000.0), Some(6000.0));
    }

    #[test]
    fn test_gaps_are_not_visible() {
        let mapper = TimeMapper::new(&windows(&[(0.0, 1000.0, 1.0), (3000.0, 4000.0, 1.0)]));
        assert_eq!(mapper.source_to_output(2000.0), None);
        assert_eq!(mapper.source_to_output_or_sentinel(2000.0), NOT_VISIBLE);
        assert_eq!(mapper.source_to_output(3000.0), Some(1000.0));
        assert_eq!(mapper.output_to_source(1500.0), Some(3500.0));
    }

    #[test]
    fn test_out_of_range_output() {
        let mapper = TimeMapper::new(&windows(&[(0.0, 1000.0, 1.0)]));
        assert_eq!(mapper.output_to_source(-1.0), None);
        assert_eq!(mapper.output_to_source(1000.0), None);
        assert_eq!(mapper.output_to_source(f64::NAN), None);
        assert_eq!(mapper.output_to_source_or_sentinel(2000.0), NOT_VISIBLE);
    }

    #[test]
    fn test_window_end_is_exclusive() {
        let mapper = TimeMapper::new(&windows(&[(0.0, 1000.0, 1.0), (2000.0, 3000.0, 1.0)]));
        assert_eq!(mapper.source_to_output(1000.0), None);
        assert_eq!(mapper.window_index_at_output(1000.0), Some(1));
    }

    #[test]
    fn test_last_output_instant_stays_in_its_window() {
        for speed in [0.3, 1.0, 3.0, 7.0] {
            let mapper = TimeMapper::new(&windows(&[(0.0, 1000.0, speed), (1000.0, 2000.0, 1.0)]));
            let (_, end) = mapper.window_output_span(0).unwrap();
            let last = below(end);

            let source = mapper.output_to_source(last).unwrap();
            assert!(source < 1000.0, "speed {speed} reached the window end");
            assert_eq!(mapper.window_index_at_source(source), Some(0));
            assert!(mapper.source_to_output(source).is_some());
        }
    }

    #[test]
    fn test_timeline_offset() {
        let mut timeline = Timeline::for_recording(5000.0);
        timeline.leading_offset_ms = 250.0;
        let mapper = TimeMapper::from_timeline(&timeline);

        assert_eq!(mapper.output_to_timeline(100.0), 350.0);
        assert_eq!(mapper.timeline_to_output(350.0), 100.0);
        assert_eq!(mapper.source_to_timeline(100.0), Some(350.0));
        assert_eq!(mapper.timeline_to_source(350.0), Some(100.0));
    }

    #[test]
    fn test_window_output_span() {
        let mapper = TimeMapper::new(&windows(&[(0.0, 2000.0, 2.0), (4000.0, 5000.0, 0.5)]));
        assert_eq!(mapper.window_output_span(0), Some((0.0, 1000.0)));
        assert_eq!(mapper.window_output_span(1), Some((1000.0, 3000.0)));
        assert_eq!(mapper.window_output_span(2), None);
    }

    #[test]
    fn test_valid_anchor_includes_end() {
        let mapper = TimeMapper::new(&windows(&[(0.0, 1000.0, 1.0)]));
        assert!(mapper.is_valid_anchor(1000.0));
        assert!(!mapper.is_valid_anchor(1000.5));
        assert!(!mapper.is_valid_anchor(-1.0));
    }

    #[test]
    fn test_cache_reuses_until_windows_change() {
        let mut cache = MapperCache::new();
        let mut timeline = Timeline::for_recording(1000.0);

        let first = cache.get(&timeline);
        let second = cache.get(&timeline);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.builds(), 1);

        timeline.windows[0].end_ms = 800.0;
        let third = cache.get(&timeline);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.output_duration_ms(), 800.0);

        timeline.leading_offset_ms = 10.0;
        cache.get(&timeline);
        assert_eq!(cache.builds(), 3);
    }
}
