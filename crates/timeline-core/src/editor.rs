//! The editing context: one document, its derived mapper, selection and
//! undo history.
//!
//! Every mutation goes through [`EditorSession::commit`], which records a
//! paired (document, selection) checkpoint and refreshes the cached
//! [`TimeMapper`]. Window edits additionally reconcile the action tracks
//! with the new output range.

use std::sync::Arc;

use recut_common::AppConfig;
use recut_project_model::{
    EditorSettings, LoadedProject, MotionSource, OutputWindow, Rect, ScreenSource,
    SpotlightAction, Timeline, UserEvent, ViewportMotion,
};
use serde::Serialize;
use tracing::debug;

use crate::action_bounds::{active_at, fits, hover_placement, insert_sorted, Span, TrackAction};
use crate::auto_zoom::{focus_area, prune_spotlights, AutoScheduleCalculator};
use crate::history::{History, InteractionLatch, DEFAULT_MAX_DEPTH};
use crate::outcome::EditOutcome;
use crate::time_mapper::{MapperCache, TimeMapper};
use crate::tracks::TrackPolicy;
use crate::window_editor::{Edge, SplitAt, WindowEditor, MIN_WINDOW_DURATION_MS};

/// Everything an undo step restores besides the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub timeline: Timeline,
    pub settings: EditorSettings,
}

/// Ids of the currently selected window and actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub window: Option<String>,
    pub motion: Option<String>,
    pub spotlight: Option<String>,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    document: Document,
    selection: Selection,
}

/// What is on screen at one output instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameState {
    pub output_ms: f64,
    pub timeline_ms: f64,
    /// `None` when the instant is outside the output.
    pub source_ms: Option<f64>,
    pub window_id: Option<String>,
    pub motions: Vec<ViewportMotion>,
    pub spotlights: Vec<SpotlightAction>,
}

pub struct EditorSession {
    document: Document,
    selection: Selection,
    screen: Option<ScreenSource>,
    events: Vec<UserEvent>,
    history: History<Checkpoint>,
    latch: InteractionLatch,
    cache: MapperCache,
    mapper: Arc<TimeMapper>,
    window_editor: WindowEditor,
    calculator: AutoScheduleCalculator,
}

impl EditorSession {
    pub fn new(
        timeline: Timeline,
        settings: EditorSettings,
        screen: Option<ScreenSource>,
        events: Vec<UserEvent>,
    ) -> Self {
        Self::build(
            Document { timeline, settings },
            screen,
            events,
            DEFAULT_MAX_DEPTH,
            MIN_WINDOW_DURATION_MS,
        )
    }

    /// Open a loaded project using the application's history and editing
    /// limits.
    pub fn from_project(project: &LoadedProject, config: &AppConfig) -> Self {
        Self::build(
            Document {
                timeline: project.timeline.clone(),
                settings: project.project.settings.clone(),
            },
            project.project.screen.clone(),
            project.events.clone(),
            config.history.max_depth,
            config.editing.min_window_duration_ms,
        )
    }

    fn build(
        document: Document,
        screen: Option<ScreenSource>,
        events: Vec<UserEvent>,
        max_depth: usize,
        min_window_duration_ms: f64,
    ) -> Self {
        let source_duration_ms = screen.as_ref().map_or_else(
            || document.timeline.windows.last().map_or(0.0, |w| w.end_ms),
            |s| s.duration_ms,
        );
        let mut cache = MapperCache::new();
        let mapper = cache.get(&document.timeline);

        Self {
            document,
            selection: Selection::default(),
            screen,
            events,
            history: History::new(max_depth),
            latch: InteractionLatch::new(),
            cache,
            mapper,
            window_editor: WindowEditor::with_min_duration(
                source_duration_ms,
                min_window_duration_ms,
            ),
            calculator: AutoScheduleCalculator::with_defaults(),
        }
    }

    /// Copy the edited timeline and settings back into `project`.
    pub fn write_back(&self, project: &mut LoadedProject) {
        project.timeline = self.document.timeline.clone();
        project.project.settings = self.document.settings.clone();
        project.project.touch();
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn timeline(&self) -> &Timeline {
        &self.document.timeline
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.document.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn screen(&self) -> Option<&ScreenSource> {
        self.screen.as_ref()
    }

    pub fn events(&self) -> &[UserEvent] {
        &self.events
    }

    /// Mapper for the current window list. Cheap to clone.
    pub fn mapper(&self) -> Arc<TimeMapper> {
        Arc::clone(&self.mapper)
    }

    /// Number of mappers built since the session opened.
    pub fn mapper_builds(&self) -> usize {
        self.cache.builds()
    }

    pub fn output_duration_ms(&self) -> f64 {
        self.mapper.output_duration_ms()
    }

    pub fn window_editor(&self) -> &WindowEditor {
        &self.window_editor
    }

    pub fn zoom_policy(&self) -> TrackPolicy {
        TrackPolicy::zoom(&self.document.settings.zoom)
    }

    pub fn spotlight_policy(&self) -> TrackPolicy {
        TrackPolicy::spotlight(&self.document.settings.spotlight)
    }

    // Playback queries

    pub fn frame_at(&self, output_ms: f64) -> FrameState {
        let timeline = &self.document.timeline;
        FrameState {
            output_ms,
            timeline_ms: self.mapper.output_to_timeline(output_ms),
            source_ms: self.mapper.output_to_source(output_ms),
            window_id: self.mapper.window_at_output(output_ms).map(|w| w.id.clone()),
            motions: active_at(&timeline.motions, output_ms).cloned().collect(),
            spotlights: active_at(&timeline.spotlights, output_ms).cloned().collect(),
        }
    }

    /// Camera framing at `output_ms`.
    ///
    /// Inside a motion the camera moves linearly from the previous framing
    /// to the motion's rectangle; between motions it holds the last one.
    pub fn camera_at(&self, output_ms: f64) -> Rect {
        let overview = self.overview();
        let mut previous = overview;

        let mut motions: Vec<&ViewportMotion> = self.document.timeline.motions.iter().collect();
        motions.sort_by(|a, b| a.output_end_time_ms.total_cmp(&b.output_end_time_ms));

        for motion in motions {
            let span = motion.span();
            if output_ms < span.start_ms {
                break;
            }
            if span.contains(output_ms) {
                let progress = if span.duration_ms() > 0.0 {
                    (output_ms - span.start_ms) / span.duration_ms()
                } else {
                    1.0
                };
                return Rect::lerp(&previous, &motion.rect, progress);
            }
            previous = motion.rect;
        }
        previous
    }

    fn overview(&self) -> Rect {
        let frame = self
            .screen
            .as_ref()
            .map_or(self.document.settings.output_size, ScreenSource::size);
        focus_area(frame, &self.document.settings)
    }

    // Window edits

    pub fn split_window(&mut self, id: &str, at: SplitAt) -> EditOutcome<Vec<OutputWindow>> {
        self.apply_window_edit(|editor, windows| editor.split(windows, id, at))
    }

    pub fn resize_window(
        &mut self,
        id: &str,
        edge: Edge,
        delta_ms: f64,
    ) -> EditOutcome<Vec<OutputWindow>> {
        self.apply_window_edit(|editor, windows| editor.resize(windows, id, edge, delta_ms))
    }

    pub fn move_window(&mut self, id: &str, delta_ms: f64) -> EditOutcome<Vec<OutputWindow>> {
        self.apply_window_edit(|editor, windows| editor.move_window(windows, id, delta_ms))
    }

    pub fn remove_window(&mut self, id: &str) -> EditOutcome<Vec<OutputWindow>> {
        self.apply_window_edit(|editor, windows| editor.remove(windows, id))
    }

    pub fn set_window_speed(&mut self, id: &str, speed: f64) -> EditOutcome<Vec<OutputWindow>> {
        self.apply_window_edit(|editor, windows| editor.set_speed(windows, id, speed))
    }

    pub fn insert_window(&mut self, start_ms: f64, end_ms: f64) -> EditOutcome<Vec<OutputWindow>> {
        self.apply_window_edit(|editor, windows| editor.insert(windows, start_ms, end_ms))
    }

    fn apply_window_edit<F>(&mut self, edit: F) -> EditOutcome<Vec<OutputWindow>>
    where
        F: FnOnce(&WindowEditor, &[OutputWindow]) -> EditOutcome<Vec<OutputWindow>>,
    {
        let outcome = edit(&self.window_editor, &self.document.timeline.windows);
        if outcome.changed {
            let base = self.document.clone();
            self.commit_windows(&base, outcome.value.clone());
        }
        outcome
    }

    /// Replace the windows of `base` and reconcile both tracks with the new
    /// output range.
    pub(crate) fn commit_windows(&mut self, base: &Document, windows: Vec<OutputWindow>) -> bool {
        let mut next = base.clone();
        next.timeline.windows = windows;
        self.reconcile(&mut next);
        let selection = self.selection.clone();
        self.commit(next, selection)
    }

    /// Regenerate or prune motions and prune spotlights against `next`'s
    /// windows.
    fn reconcile(&mut self, next: &mut Document) {
        let mapper = self.cache.get(&next.timeline);
        let motions = self.calculator.refresh(
            &next.timeline.motions,
            &mapper,
            &next.settings,
            self.screen.as_ref(),
            &self.events,
        );
        next.timeline.motions = motions.value;
        next.timeline.spotlights = prune_spotlights(&next.timeline.spotlights, &mapper).value;
    }

    // Zoom track

    /// Add a motion, selecting it. Motions that overlap, leave the output
    /// or are shorter than the minimum are rejected.
    pub fn add_motion(&mut self, mut motion: ViewportMotion) -> EditOutcome<Vec<ViewportMotion>> {
        let policy = self.zoom_policy();
        let motions = &self.document.timeline.motions;
        if motion.duration_ms < policy.min_duration_ms
            || !fits(motion.span(), None, motions, self.output_duration_ms())
        {
            return EditOutcome::unchanged(motions.clone());
        }

        motion.source = MotionSource::Manual;
        let mut next = self.document.clone();
        let selection = Selection {
            motion: Some(motion.id.clone()),
            ..self.selection.clone()
        };
        insert_sorted(&mut next.timeline.motions, motion);
        self.commit_manual_motions(next, selection)
    }

    /// Edit a motion in place. The edit is dropped if it changes the id, or
    /// moves the motion somewhere that breaks the track's constraints.
    pub fn update_motion<F>(&mut self, id: &str, edit: F) -> EditOutcome<Vec<ViewportMotion>>
    where
        F: FnOnce(&mut ViewportMotion),
    {
        let policy = self.zoom_policy();
        let total = self.output_duration_ms();
        let motions = &self.document.timeline.motions;

        let Some(index) = motions.iter().position(|m| m.id == id) else {
            return EditOutcome::unchanged(motions.clone());
        };
        let mut motion = motions[index].clone();
        edit(&mut motion);

        let moved = motion.span() != motions[index].span();
        if motion == motions[index]
            || motion.id != id
            || (moved
                && (motion.duration_ms < policy.min_duration_ms
                    || !fits(motion.span(), Some(id), motions, total)))
        {
            return EditOutcome::unchanged(motions.clone());
        }

        motion.source = MotionSource::Manual;
        let mut next = self.document.clone();
        next.timeline.motions.remove(index);
        insert_sorted(&mut next.timeline.motions, motion);
        let selection = self.selection.clone();
        self.commit_manual_motions(next, selection)
    }

    pub fn remove_motion(&mut self, id: &str) -> EditOutcome<Vec<ViewportMotion>> {
        let motions = &self.document.timeline.motions;
        if !motions.iter().any(|m| m.id == id) {
            return EditOutcome::unchanged(motions.clone());
        }

        let mut next = self.document.clone();
        next.timeline.motions.retain(|m| m.id != id);
        let selection = self.selection.clone();
        self.commit_manual_motions(next, selection)
    }

    /// Any manual change to the zoom track ends auto mode.
    fn commit_manual_motions(
        &mut self,
        mut next: Document,
        selection: Selection,
    ) -> EditOutcome<Vec<ViewportMotion>> {
        if next.settings.zoom.auto_zoom {
            debug!("manual zoom edit, auto zoom disabled");
            next.settings.zoom.auto_zoom = false;
        }
        let changed = self.commit(next, selection);
        EditOutcome {
            value: self.document.timeline.motions.clone(),
            changed,
        }
    }

    /// Ghost span for a motion added at `output_ms`.
    pub fn hover_motion(&self, output_ms: f64) -> Option<Span> {
        let policy = self.zoom_policy();
        hover_placement(
            output_ms,
            &self.document.timeline.motions,
            self.output_duration_ms(),
            policy.default_duration_ms,
            policy.min_duration_ms,
            policy.anchoring,
        )
    }

    /// Add a motion where [`Self::hover_motion`] would place it.
    pub fn add_motion_at(&mut self, output_ms: f64, rect: Rect) -> EditOutcome<Vec<ViewportMotion>> {
        match self.hover_motion(output_ms) {
            Some(span) => self.add_motion(ViewportMotion::manual(
                span.end_ms,
                span.duration_ms(),
                rect,
            )),
            None => EditOutcome::unchanged(self.document.timeline.motions.clone()),
        }
    }

    // Spotlight track

    pub fn add_spotlight(&mut self, spotlight: SpotlightAction) -> EditOutcome<Vec<SpotlightAction>> {
        let policy = self.spotlight_policy();
        let spotlights = &self.document.timeline.spotlights;
        if spotlight.duration_ms() < policy.min_duration_ms
            || !fits(spotlight.span(), None, spotlights, self.output_duration_ms())
        {
            return EditOutcome::unchanged(spotlights.clone());
        }

        let mut next = self.document.clone();
        let selection = Selection {
            spotlight: Some(spotlight.id.clone()),
            ..self.selection.clone()
        };
        insert_sorted(&mut next.timeline.spotlights, spotlight);
        self.commit_spotlights(next, selection)
    }

    pub fn update_spotlight<F>(&mut self, id: &str, edit: F) -> EditOutcome<Vec<SpotlightAction>>
    where
        F: FnOnce(&mut SpotlightAction),
    {
        let policy = self.spotlight_policy();
        let total = self.output_duration_ms();
        let spotlights = &self.document.timeline.spotlights;

        let Some(index) = spotlights.iter().position(|s| s.id == id) else {
            return EditOutcome::unchanged(spotlights.clone());
        };
        let mut spotlight = spotlights[index].clone();
        edit(&mut spotlight);

        // Placement is only checked when the span moves, so a spotlight left
        // hanging past the output end by a trim stays editable.
        let moved = spotlight.span() != spotlights[index].span();
        if spotlight == spotlights[index]
            || spotlight.id != id
            || (moved
                && (spotlight.duration_ms() < policy.min_duration_ms
                    || !fits(spotlight.span(), Some(id), spotlights, total)))
        {
            return EditOutcome::unchanged(spotlights.clone());
        }

        let mut next = self.document.clone();
        next.timeline.spotlights.remove(index);
        insert_sorted(&mut next.timeline.spotlights, spotlight);
        let selection = self.selection.clone();
        self.commit_spotlights(next, selection)
    }

    pub fn remove_spotlight(&mut self, id: &str) -> EditOutcome<Vec<SpotlightAction>> {
        let mut next = self.document.clone();
        next.timeline.spotlights.retain(|s| s.id != id);
        let selection = self.selection.clone();
        self.commit_spotlights(next, selection)
    }

    fn commit_spotlights(
        &mut self,
        next: Document,
        selection: Selection,
    ) -> EditOutcome<Vec<SpotlightAction>> {
        let changed = self.commit(next, selection);
        EditOutcome {
            value: self.document.timeline.spotlights.clone(),
            changed,
        }
    }

    pub fn hover_spotlight(&self, output_ms: f64) -> Option<Span> {
        let policy = self.spotlight_policy();
        hover_placement(
            output_ms,
            &self.document.timeline.spotlights,
            self.output_duration_ms(),
            policy.default_duration_ms,
            policy.min_duration_ms,
            policy.anchoring,
        )
    }

    /// Add a spotlight where [`Self::hover_spotlight`] would place it,
    /// enlarged by the configured default scale.
    pub fn add_spotlight_at(
        &mut self,
        output_ms: f64,
        rect: Rect,
    ) -> EditOutcome<Vec<SpotlightAction>> {
        match self.hover_spotlight(output_ms) {
            Some(span) => {
                let scale = self.document.settings.spotlight.enlarge_scale;
                self.add_spotlight(SpotlightAction::new(span.start_ms, span.end_ms, rect, scale))
            }
            None => EditOutcome::unchanged(self.document.timeline.spotlights.clone()),
        }
    }

    // Settings and schedule

    /// Change settings, re-evaluating the zoom schedule when the change
    /// affects it.
    ///
    /// Auto zoom cannot be switched back on here; once manual work exists
    /// only [`Self::recalculate_schedule`] replaces it.
    pub fn update_settings<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut EditorSettings),
    {
        let mut next = self.document.clone();
        edit(&mut next.settings);
        if !self.document.settings.zoom.auto_zoom && next.settings.zoom.auto_zoom {
            debug!("auto zoom stays off until the schedule is recalculated");
            next.settings.zoom.auto_zoom = false;
        }
        if self.document.settings.affects_schedule(&next.settings) {
            self.reconcile(&mut next);
        }
        let selection = self.selection.clone();
        self.commit(next, selection)
    }

    /// Re-enable auto mode and rebuild the schedule from the events.
    pub fn recalculate_schedule(&mut self) -> EditOutcome<Vec<ViewportMotion>> {
        let mut next = self.document.clone();
        next.settings.zoom.auto_zoom = true;
        self.reconcile(&mut next);
        let selection = self.selection.clone();
        let changed = self.commit(next, selection);
        EditOutcome {
            value: self.document.timeline.motions.clone(),
            changed,
        }
    }

    // Selection and history

    /// Change the selection without touching history.
    pub fn select(&mut self, selection: Selection) {
        self.selection = self.sanitize(selection, &self.document);
    }

    pub fn begin_interaction(&mut self) {
        self.latch.start(&mut self.history);
    }

    pub fn end_interaction(&mut self) {
        self.latch.end(&mut self.history);
    }

    pub fn is_interacting(&self) -> bool {
        self.latch.is_active()
    }

    pub fn can_undo(&self) -> bool {
        !self.latch.is_active() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.latch.is_active() && self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Restore the previous checkpoint. Refused during an interaction.
    pub fn undo(&mut self) -> bool {
        if self.latch.is_active() {
            return false;
        }
        let current = self.checkpoint();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.latch.is_active() {
            return false;
        }
        let current = self.checkpoint();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            document: self.document.clone(),
            selection: self.selection.clone(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.document = checkpoint.document;
        self.selection = checkpoint.selection;
        self.mapper = self.cache.get(&self.document.timeline);
    }

    /// Install `next`, recording the previous checkpoint. Returns `false`
    /// (and only updates the selection) when the document is unchanged.
    fn commit(&mut self, next: Document, selection: Selection) -> bool {
        let selection = self.sanitize(selection, &next);
        if next == self.document {
            self.selection = selection;
            return false;
        }

        let previous = Checkpoint {
            document: std::mem::replace(&mut self.document, next),
            selection: std::mem::replace(&mut self.selection, selection),
        };
        self.latch.record(&mut self.history, previous);
        self.mapper = self.cache.get(&self.document.timeline);
        true
    }

    /// Drop selected ids that no longer exist in `document`.
    fn sanitize(&self, selection: Selection, document: &Document) -> Selection {
        let timeline = &document.timeline;
        Selection {
            window: selection.window.filter(|id| timeline.window(id).is_some()),
            motion: selection.motion.filter(|id| timeline.motion(id).is_some()),
            spotlight: selection
                .spotlight
                .filter(|id| timeline.spotlight(id).is_some()),
        }
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("document", &self.document)
            .field("selection", &self.selection)
            .field("undo_depth", &self.history.undo_depth())
            .field("interacting", &self.latch.is_active())
            .finish()
    }
}
