//! Pointer drags over the timeline as scoped interaction sessions.
//!
//! A [`Gesture`] opens an interaction on the session when it starts and
//! closes it when dropped, so a whole drag lands in history as a single
//! undo step however many ticks it had. Every tick is computed from the
//! state captured at pointer-down, never from the previous tick.

use recut_project_model::OutputWindow;

use crate::action_bounds::{drag_span, resolve_bounds, Bounds, DragMode, Span, TrackAction};
use crate::editor::{Document, EditorSession};
use crate::pixel::TimePixelMapper;
use crate::window_editor::Edge;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragTarget {
    Window { id: String, mode: DragMode },
    Motion { id: String, mode: DragMode },
    Spotlight { id: String, mode: DragMode },
}

#[derive(Debug)]
enum Origin {
    Window {
        base: Document,
        window: OutputWindow,
    },
    Action {
        span: Span,
        bounds: Bounds,
        min_duration_ms: f64,
    },
}

/// A drag in progress. Dropping it ends the interaction.
#[derive(Debug)]
pub struct Gesture<'a> {
    session: &'a mut EditorSession,
    target: DragTarget,
    origin: Origin,
    pixels: TimePixelMapper,
}

impl EditorSession {
    /// Start dragging `target`. `None` if it does not exist.
    pub fn begin_gesture(
        &mut self,
        target: DragTarget,
        pixels: TimePixelMapper,
    ) -> Option<Gesture<'_>> {
        let total = self.output_duration_ms();
        let timeline = self.timeline();

        let origin = match &target {
            DragTarget::Window { id, .. } => Origin::Window {
                window: timeline.window(id)?.clone(),
                base: self.document().clone(),
            },
            DragTarget::Motion { id, .. } => Origin::Action {
                span: timeline.motion(id)?.span(),
                bounds: resolve_bounds(Some(id), &timeline.motions, total),
                min_duration_ms: self.zoom_policy().min_duration_ms,
            },
            DragTarget::Spotlight { id, .. } => Origin::Action {
                span: timeline.spotlight(id)?.span(),
                bounds: resolve_bounds(Some(id), &timeline.spotlights, total),
                min_duration_ms: self.spotlight_policy().min_duration_ms,
            },
        };

        self.begin_interaction();
        Some(Gesture {
            session: self,
            target,
            origin,
            pixels,
        })
    }
}

impl Gesture<'_> {
    /// Apply the total pointer offset since pointer-down.
    pub fn update(&mut self, dx_px: f64) -> bool {
        match (&self.target, &self.origin) {
            (DragTarget::Window { id, mode }, Origin::Window { base, window }) => {
                let delta = self.pixels.px_delta_to_source_ms(dx_px, window);
                let editor = self.session.window_editor();
                let windows = &base.timeline.windows;
                let outcome = match mode {
                    DragMode::Move => editor.move_window(windows, id, delta),
                    DragMode::ResizeStart => editor.resize(windows, id, Edge::Left, delta),
                    DragMode::ResizeEnd => editor.resize(windows, id, Edge::Right, delta),
                };
                self.session.commit_windows(base, outcome.value)
            }
            (
                DragTarget::Motion { id, mode },
                Origin::Action {
                    span,
                    bounds,
                    min_duration_ms,
                },
            ) => {
                let delta = self.pixels.px_delta_to_ms(dx_px);
                let next = drag_span(*span, *mode, delta, *bounds, *min_duration_ms);
                self.session
                    .update_motion(id, |motion| motion.set_span(next))
                    .changed
            }
            (
                DragTarget::Spotlight { id, mode },
                Origin::Action {
                    span,
                    bounds,
                    min_duration_ms,
                },
            ) => {
                let delta = self.pixels.px_delta_to_ms(dx_px);
                let next = drag_span(*span, *mode, delta, *bounds, *min_duration_ms);
                self.session
                    .update_spotlight(id, |spotlight| spotlight.set_span(next))
                    .changed
            }
            _ => false,
        }
    }

    pub fn target(&self) -> &DragTarget {
        &self.target
    }

    pub fn session(&self) -> &EditorSession {
        self.session
    }

    /// End the drag. Equivalent to dropping the gesture.
    pub fn finish(self) {}
}

impl Drop for Gesture<'_> {
    fn drop(&mut self) {
        self.session.end_interaction();
    }
}
