//! Timeline pixel ⇄ time conversion.
//!
//! The timeline strip is drawn in output time, while window edits are
//! applied in source time. All speed scaling between the two lives here.

use recut_project_model::timeline::OutputWindow;

/// Maps horizontal timeline pixels to timeline milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePixelMapper {
    /// Horizontal zoom of the timeline strip.
    pub pixels_per_ms: f64,
    /// Timeline time shown at x = 0 (horizontal scroll).
    pub origin_ms: f64,
}

impl TimePixelMapper {
    pub fn new(pixels_per_ms: f64, origin_ms: f64) -> Self {
        Self {
            pixels_per_ms: pixels_per_ms.max(f64::EPSILON),
            origin_ms,
        }
    }

    /// Fit `duration_ms` into `width_px` with no scroll.
    pub fn fit(width_px: f64, duration_ms: f64) -> Self {
        if duration_ms <= 0.0 {
            return Self::new(1.0, 0.0);
        }
        Self::new(width_px / duration_ms, 0.0)
    }

    pub fn ms_to_px(&self, timeline_ms: f64) -> f64 {
        (timeline_ms - self.origin_ms) * self.pixels_per_ms
    }

    pub fn px_to_ms(&self, x: f64) -> f64 {
        self.origin_ms + x / self.pixels_per_ms
    }

    /// Convert a pointer movement into an output-time delta.
    pub fn px_delta_to_ms(&self, dx: f64) -> f64 {
        dx / self.pixels_per_ms
    }

    /// Convert a pointer movement over `window` into a source-time delta.
    pub fn px_delta_to_source_ms(&self, dx: f64, window: &OutputWindow) -> f64 {
        output_delta_to_source(self.px_delta_to_ms(dx), window)
    }

    /// On-screen width of a window.
    pub fn window_width_px(&self, window: &OutputWindow) -> f64 {
        window.output_duration_ms() * self.pixels_per_ms
    }
}

/// Scale an output-time delta observed over `window` into source time.
pub fn output_delta_to_source(output_delta_ms: f64, window: &OutputWindow) -> f64 {
    output_delta_ms * window.speed
}

/// Scale a source-time delta within `window` into output time.
pub fn source_delta_to_output(source_delta_ms: f64, window: &OutputWindow) -> f64 {
    source_delta_ms / window.speed
}
