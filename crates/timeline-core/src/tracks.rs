//! Zoom and spotlight tracks expressed through [`TrackAction`].

use recut_project_model::{SpotlightAction, SpotlightSettings, ViewportMotion, ZoomSettings};

use crate::action_bounds::{Anchoring, Span, TrackAction};

/// Default length of a spotlight added by hovering.
pub const SPOTLIGHT_DEFAULT_DURATION_MS: f64 = 3000.0;

/// Slack added on top of the two spotlight transitions.
const SPOTLIGHT_HOLD_MS: f64 = 100.0;

impl TrackAction for ViewportMotion {
    fn id(&self) -> &str {
        &self.id
    }

    fn span(&self) -> Span {
        Span::new(self.output_start_time_ms(), self.output_end_time_ms)
    }

    fn set_span(&mut self, span: Span) {
        self.output_end_time_ms = span.end_ms;
        self.duration_ms = span.duration_ms();
    }
}

impl TrackAction for SpotlightAction {
    fn id(&self) -> &str {
        &self.id
    }

    fn span(&self) -> Span {
        Span::new(self.output_start_time_ms, self.output_end_time_ms)
    }

    fn set_span(&mut self, span: Span) {
        self.output_start_time_ms = span.start_ms;
        self.output_end_time_ms = span.end_ms;
    }
}

/// Per-track sizing rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPolicy {
    pub min_duration_ms: f64,
    pub default_duration_ms: f64,
    pub anchoring: Anchoring,
}

impl TrackPolicy {
    pub fn zoom(settings: &ZoomSettings) -> Self {
        let min_duration_ms = settings.min_zoom_duration_ms.max(0.0);
        Self {
            min_duration_ms,
            default_duration_ms: settings.max_zoom_duration_ms.max(min_duration_ms),
            anchoring: Anchoring::End,
        }
    }

    pub fn spotlight(settings: &SpotlightSettings) -> Self {
        let min_duration_ms = 2.0 * settings.transition_duration_ms.max(0.0) + SPOTLIGHT_HOLD_MS;
        Self {
            min_duration_ms,
            default_duration_ms: SPOTLIGHT_DEFAULT_DURATION_MS.max(min_duration_ms),
            anchoring: Anchoring::Interval,
        }
    }
}
