//! Auto-zoom scheduling: recorded interactions to viewport motions.
//!
//! # Algorithm
//!
//! 1. **Focus** points are extracted from the event stream by a
//!    [`FocusPolicy`]. The default [`ClusterPolicy`] merges interactions
//!    that are close in both time and screen space.
//! 2. **Anchor**: each focus start is mapped from source to output time.
//!    Focus points in trimmed material are dropped.
//! 3. **Motion**: the camera arrives at the focus rectangle at the anchor,
//!    having moved for at most the configured zoom duration, never
//!    overlapping the previous motion.
//! 4. **Release**: after a stretch of inactivity the camera zooms back out.
//!
//! The result depends only on its inputs, so regenerating an unchanged
//! timeline reproduces the same schedule, ids included.

use recut_project_model::{
    EditorSettings, EventKind, Rect, ScreenSource, Size, SpotlightAction, UserEvent,
    ViewportMotion,
};
use tracing::{debug, info, warn};

use crate::outcome::EditOutcome;
use crate::time_mapper::TimeMapper;
use crate::tracks::TrackPolicy;

/// A place and moment the viewer's attention should go.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusPoint {
    /// Source time of the first interaction.
    pub source_ms: f64,
    /// Source time at which the last interaction finished.
    pub last_source_ms: f64,
    /// Centroid in source-video pixels.
    pub center: (f64, f64),
    /// Maximum distance from the centroid.
    pub spread: f64,
    pub event_count: usize,
    /// Short description of what drew attention ("click", "typing", ...).
    pub label: &'static str,
}

/// Strategy that turns an event stream into focus points.
pub trait FocusPolicy {
    /// Focus points ordered by `source_ms`.
    fn focus_points(&self, events: &[UserEvent], frame: Size) -> Vec<FocusPoint>;
}

/// Groups positioned interactions by time gap and distance to the running
/// centroid.
#[derive(Debug, Clone)]
pub struct ClusterPolicy {
    /// Largest pause between two interactions of the same cluster.
    pub merge_gap_ms: f64,
    /// Cluster radius as a fraction of the larger frame side.
    pub radius_ratio: f64,
}

impl Default for ClusterPolicy {
    fn default() -> Self {
        Self {
            merge_gap_ms: 1500.0,
            radius_ratio: 0.15,
        }
    }
}

#[derive(Debug)]
struct Cluster {
    source_ms: f64,
    last_source_ms: f64,
    positions: Vec<(f64, f64)>,
    label: &'static str,
}

impl Cluster {
    fn centroid(&self) -> (f64, f64) {
        compute_centroid(&self.positions)
    }

    fn into_focus(self) -> FocusPoint {
        let center = self.centroid();
        FocusPoint {
            source_ms: self.source_ms,
            last_source_ms: self.last_source_ms,
            center,
            spread: compute_spread(&self.positions, center),
            event_count: self.positions.len(),
            label: self.label,
        }
    }
}

impl FocusPolicy for ClusterPolicy {
    fn focus_points(&self, events: &[UserEvent], frame: Size) -> Vec<FocusPoint> {
        let mut ordered: Vec<&UserEvent> = events.iter().filter(|e| e.is_interaction()).collect();
        ordered.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));

        let radius = self.radius_ratio * frame.width.max(frame.height);
        let mut focus = Vec::new();
        let mut current: Option<Cluster> = None;

        for event in ordered {
            let within_gap = current
                .as_ref()
                .is_some_and(|c| event.time_ms - c.last_source_ms <= self.merge_gap_ms);

            let Some(position) = event.position() else {
                // Keyboard input keeps the current focus alive.
                if within_gap {
                    if let Some(cluster) = current.as_mut() {
                        cluster.last_source_ms = cluster.last_source_ms.max(event.end_ms());
                    }
                }
                continue;
            };

            if let Some(cluster) = current.as_mut() {
                let (cx, cy) = cluster.centroid();
                let distance = ((position.0 - cx).powi(2) + (position.1 - cy).powi(2)).sqrt();
                if within_gap && distance <= radius {
                    cluster.positions.push(position);
                    cluster.last_source_ms = cluster.last_source_ms.max(event.end_ms());
                    continue;
                }
            }

            if let Some(done) = current.take() {
                focus.push(done.into_focus());
            }
            current = Some(Cluster {
                source_ms: event.time_ms,
                last_source_ms: event.end_ms(),
                positions: vec![position],
                label: label_for(&event.kind),
            });
        }

        if let Some(done) = current {
            focus.push(done.into_focus());
        }
        focus
    }
}

fn label_for(kind: &EventKind) -> &'static str {
    match kind {
        EventKind::Click { .. } => "click",
        EventKind::Drag { .. } => "drag",
        EventKind::Typing { .. } => "typing",
        EventKind::Scroll { .. } => "scroll",
        EventKind::Key { .. } => "keyboard",
        EventKind::Pointer { .. } | EventKind::UrlChange { .. } => "activity",
    }
}

/// Tuning for the schedule built on top of the focus points.
#[derive(Debug, Clone)]
pub struct AutoScheduleConfig {
    /// Inactivity after which the camera zooms back out.
    pub idle_zoom_out_ms: f64,
    /// Room left around a focus cluster, relative to its spread.
    pub spread_margin: f64,
}

impl Default for AutoScheduleConfig {
    fn default() -> Self {
        Self {
            idle_zoom_out_ms: 3000.0,
            spread_margin: 1.2,
        }
    }
}

/// Derives the automatic zoom schedule.
#[derive(Debug, Clone, Default)]
pub struct AutoScheduleCalculator<P = ClusterPolicy> {
    policy: P,
    config: AutoScheduleConfig,
}

impl AutoScheduleCalculator<ClusterPolicy> {
    pub fn new(config: AutoScheduleConfig) -> Self {
        Self::with_policy(ClusterPolicy::default(), config)
    }

    pub fn with_defaults() -> Self {
        Self::new(AutoScheduleConfig::default())
    }
}

impl<P: FocusPolicy> AutoScheduleCalculator<P> {
    pub fn with_policy(policy: P, config: AutoScheduleConfig) -> Self {
        Self { policy, config }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Build the schedule from scratch.
    pub fn calculate(
        &self,
        events: &[UserEvent],
        mapper: &TimeMapper,
        screen: Size,
        settings: &EditorSettings,
    ) -> Vec<ViewportMotion> {
        let total = mapper.output_duration_ms();
        if total <= 0.0 || settings.zoom.max_zoom <= 1.0 {
            return vec![];
        }

        let track = TrackPolicy::zoom(&settings.zoom);
        let area = focus_area(screen, settings);
        let overview = area;

        let anchored: Vec<(FocusPoint, f64)> = self
            .policy
            .focus_points(events, screen)
            .into_iter()
            .filter_map(|focus| {
                let anchor = mapper.source_to_output(focus.source_ms)?;
                Some((focus, anchor))
            })
            .collect();

        let mut motions: Vec<ViewportMotion> = Vec::new();
        let mut prev_end = 0.0_f64;

        for (index, (focus, anchor)) in anchored.iter().enumerate() {
            let end = *anchor;
            let start = (end - track.default_duration_ms).max(prev_end);
            if end - start < track.min_duration_ms {
                debug!(anchor = end, label = focus.label, "no room for auto motion");
                continue;
            }

            let Some(rect) = self.focus_rect(focus, area, settings) else {
                continue;
            };
            motions.push(ViewportMotion::auto(
                end,
                end - start,
                rect,
                format!("Zoom to {}", focus.label),
            ));
            prev_end = end;

            // Zoom back out when nothing happens for a while.
            let release = mapper
                .source_to_output(focus.last_source_ms)
                .unwrap_or(end)
                .max(end);
            let out_start = release + self.config.idle_zoom_out_ms;
            let out_end = out_start + track.default_duration_ms;
            let next_anchor = anchored.get(index + 1).map_or(total, |(_, next)| *next);
            let room_after = if index + 1 < anchored.len() {
                track.min_duration_ms
            } else {
                0.0
            };
            if out_end + room_after <= next_anchor && out_end <= total {
                motions.push(ViewportMotion::auto(
                    out_end,
                    track.default_duration_ms,
                    overview,
                    "Zoom out after inactivity",
                ));
                prev_end = out_end;
            }
        }

        for (n, motion) in motions.iter_mut().enumerate() {
            motion.id = format!("auto-{n}");
        }
        info!(motions = motions.len(), "generated auto-zoom schedule");
        motions
    }

    /// Bring `current` up to date after a timeline or settings change.
    ///
    /// In auto mode the schedule is regenerated; missing screen metadata
    /// or events keep the existing schedule. Outside auto mode motions
    /// whose anchor left the output are dropped and the rest are kept.
    pub fn refresh(
        &self,
        current: &[ViewportMotion],
        mapper: &TimeMapper,
        settings: &EditorSettings,
        screen: Option<&ScreenSource>,
        events: &[UserEvent],
    ) -> EditOutcome<Vec<ViewportMotion>> {
        if !settings.zoom.auto_zoom {
            return prune_motions(current, mapper);
        }

        let Some(screen) = screen else {
            warn!("no screen metadata, keeping existing zoom schedule");
            return EditOutcome::unchanged(current.to_vec());
        };
        if events.is_empty() {
            warn!("no recorded events, keeping existing zoom schedule");
            return EditOutcome::unchanged(current.to_vec());
        }

        let motions = self.calculate(events, mapper, screen.size(), settings);
        let changed = motions.as_slice() != current;
        EditOutcome {
            value: motions,
            changed,
        }
    }

    fn focus_rect(&self, focus: &FocusPoint, area: Rect, settings: &EditorSettings) -> Option<Rect> {
        let output = settings.output_size;
        if area.width <= 0.0 || area.height <= 0.0 || output.width <= 0.0 || output.height <= 0.0 {
            return None;
        }
        // Largest rectangle with the output's aspect ratio that fits the area.
        let (base_width, base_height) = if area.width * output.height > area.height * output.width {
            (area.height * output.width / output.height, area.height)
        } else {
            (area.width, area.width * output.height / output.width)
        };

        let needed = 2.0 * focus.spread * self.config.spread_margin;
        let scale = (1.0 / settings.zoom.max_zoom)
            .max(needed / base_width)
            .max(needed / base_height)
            .min(1.0);
        if scale > 0.99 {
            return None;
        }

        let local = Rect::centered_in(
            focus.center.0 - area.x,
            focus.center.1 - area.y,
            base_width * scale,
            base_height * scale,
            Size::new(area.width, area.height),
        );
        Some(Rect::new(
            local.x + area.x,
            local.y + area.y,
            local.width,
            local.height,
        ))
    }
}

/// Region of the recording the camera may show: the crop if set, else the
/// whole screen.
pub(crate) fn focus_area(screen: Size, settings: &EditorSettings) -> Rect {
    let full = Rect::full(screen);
    settings
        .screen
        .crop
        .and_then(|crop| crop.intersect(&full))
        .unwrap_or(full)
}

/// Keep motions whose end still lands inside the output.
pub fn prune_motions(
    motions: &[ViewportMotion],
    mapper: &TimeMapper,
) -> EditOutcome<Vec<ViewportMotion>> {
    let kept: Vec<ViewportMotion> = motions
        .iter()
        .filter(|m| mapper.is_valid_anchor(m.output_end_time_ms))
        .cloned()
        .collect();
    let pruned = motions.len() - kept.len();
    if pruned > 0 {
        debug!(pruned, "dropped motions outside the output");
    }
    EditOutcome {
        changed: pruned > 0,
        value: kept,
    }
}

/// Keep spotlights whose start still lies inside the output.
pub fn prune_spotlights(
    spotlights: &[SpotlightAction],
    mapper: &TimeMapper,
) -> EditOutcome<Vec<SpotlightAction>> {
    let total = mapper.output_duration_ms();
    let kept: Vec<SpotlightAction> = spotlights
        .iter()
        .filter(|s| s.output_start_time_ms >= 0.0 && s.output_start_time_ms < total)
        .cloned()
        .collect();
    let pruned = spotlights.len() - kept.len();
    if pruned > 0 {
        debug!(pruned, "dropped spotlights outside the output");
    }
    EditOutcome {
        changed: pruned > 0,
        value: kept,
    }
}

/// Compute the centroid (average position) of a set of points.
fn compute_centroid(positions: &[(f64, f64)]) -> (f64, f64) {
    if positions.is_empty() {
        return (0.0, 0.0);
    }
    let n = positions.len() as f64;
    let sum_x: f64 = positions.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = positions.iter().map(|(_, y)| y).sum();
    (sum_x / n, sum_y / n)
}

/// Compute the maximum spread (distance from centroid).
fn compute_spread(positions: &[(f64, f64)], centroid: (f64, f64)) -> f64 {
    positions
        .iter()
        .map(|(x, y)| ((x - centroid.0).powi(2) + (y - centroid.1).powi(2)).sqrt())
        .fold(0.0_f64, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recut_project_model::{MouseButton, OutputWindow, ScreenSettings};

    const SCREEN: Size = Size {
        width: 1920.0,
        height: 1080.0,
    };

    fn click(t: f64, x: f64, y: f64) -> UserEvent {
        UserEvent::click(t, MouseButton::Left, x, y)
    }

    fn mapper(windows: &[(f64, f64)]) -> TimeMapper {
        let windows: Vec<OutputWindow> = windows
            .iter()
            .map(|&(start, end)| OutputWindow::new(start, end))
            .collect();
        TimeMapper::new(&windows)
    }

    #[test]
    fn test_empty_events() {
        let calculator = AutoScheduleCalculator::with_defaults();
        let motions = calculator.calculate(
            &[],
            &mapper(&[(0.0, 10_000.0)]),
            SCREEN,
            &EditorSettings::default(),
        );
        assert!(motions.is_empty());
    }

    #[test]
    fn test_nearby_clicks_merge() {
        let events = vec![click(5000.0, 400.0, 300.0), click(5500.0, 420.0, 310.0)];
        let focus = ClusterPolicy::default().focus_points(&events, SCREEN);
        assert_eq!(focus.len(), 1);
        assert_eq!(focus[0].event_count, 2);
        assert!((focus[0].center.0 - 410.0).abs() < 1e-9);
        assert_eq!(focus[0].label, "click");
    }

    #[test]
    fn test_distant_or_late_clicks_split() {
        let events = vec![
            click(5000.0, 400.0, 300.0),
            click(6000.0, 1500.0, 800.0),
            click(9000.0, 1500.0, 800.0),
        ];
        let focus = ClusterPolicy::default().focus_points(&events, SCREEN);
        assert_eq!(focus.len(), 3);
    }

    #[test]
    fn test_pointer_moves_are_ignored() {
        let events = vec![
            UserEvent::pointer(1000.0, 10.0, 10.0),
            UserEvent::url_change(1500.0, "https://example.com"),
        ];
        assert!(ClusterPolicy::default().focus_points(&events, SCREEN).is_empty());
    }

    #[test]
    fn test_keys_extend_cluster() {
        let events = vec![
            click(1000.0, 400.0, 300.0),
            UserEvent::key(2000.0, "KeyA"),
            UserEvent::key(3200.0, "KeyB"),
            click(4500.0, 410.0, 300.0),
        ];
        let focus = ClusterPolicy::default().focus_points(&events, SCREEN);
        assert_eq!(focus.len(), 1);
        assert_eq!(focus[0].last_source_ms, 4500.0);
    }

    #[test]
    fn test_single_click_schedule() {
        let calculator = AutoScheduleCalculator::with_defaults();
        let motions = calculator.calculate(
            &[click(5000.0, 400.0, 300.0)],
            &mapper(&[(0.0, 20_000.0)]),
            SCREEN,
            &EditorSettings::default(),
        );

        assert_eq!(motions.len(), 2);
        assert_eq!(motions[0].id, "auto-0");
        assert_eq!(motions[0].output_end_time_ms, 5000.0);
        assert_eq!(motions[0].duration_ms, 1500.0);
        assert_eq!(motions[0].rect, Rect::new(0.0, 30.0, 960.0, 540.0));
        assert_eq!(motions[0].reason, "Zoom to click");

        assert_eq!(motions[1].id, "auto-1");
        assert_eq!(motions[1].output_start_time_ms(), 8000.0);
        assert_eq!(motions[1].rect, Rect::full(SCREEN));
    }

    #[test]
    fn test_consecutive_focus_never_overlaps() {
        let calculator = AutoScheduleCalculator::with_defaults();
        let motions = calculator.calculate(
            &[click(5000.0, 400.0, 300.0), click(6000.0, 1500.0, 800.0)],
            &mapper(&[(0.0, 20_000.0)]),
            SCREEN,
            &EditorSettings::default(),
        );

        assert_eq!(motions.len(), 3);
        assert_eq!(motions[1].output_start_time_ms(), 5000.0);
        assert_eq!(motions[1].output_end_time_ms, 6000.0);
        for pair in motions.windows(2) {
            assert!(pair[0].output_end_time_ms <= pair[1].output_start_time_ms());
        }
    }

    #[test]
    fn test_trimmed_focus_is_dropped() {
        let calculator = AutoScheduleCalculator::with_defaults();
        // The click at 5000 falls in the trimmed gap [4000, 8000).
        let motions = calculator.calculate(
            &[click(5000.0, 400.0, 300.0)],
            &mapper(&[(0.0, 4000.0), (8000.0, 20_000.0)]),
            SCREEN,
            &EditorSettings::default(),
        );
        assert!(motions.is_empty());
    }

    #[test]
    fn test_too_early_focus_is_skipped() {
        let calculator = AutoScheduleCalculator::with_defaults();
        let motions = calculator.calculate(
            &[click(200.0, 400.0, 300.0)],
            &mapper(&[(0.0, 2000.0)]),
            SCREEN,
            &EditorSettings::default(),
        );
        assert!(motions.is_empty());
    }

    #[test]
    fn test_rect_respects_crop_and_max_zoom() {
        let mut settings = EditorSettings::default();
        settings.zoom.max_zoom = 4.0;
        settings.screen = ScreenSettings {
            padding: 0.0,
            crop: Some(Rect::new(960.0, 0.0, 960.0, 540.0)),
        };

        let calculator = AutoScheduleCalculator::with_defaults();
        let motions = calculator.calculate(
            &[click(5000.0, 100.0, 100.0)],
            &mapper(&[(0.0, 6000.0)]),
            SCREEN,
            &settings,
        );

        let rect = motions[0].rect;
        assert_eq!(rect.width, 240.0);
        assert_eq!(rect.height, 135.0);
        assert_eq!(rect.x, 960.0);
        assert_eq!(rect.y, 32.5);
    }

    #[test]
    fn test_schedule_is_idempotent() {
        let calculator = AutoScheduleCalculator::with_defaults();
        let events = vec![click(5000.0, 400.0, 300.0), click(12_000.0, 1500.0, 800.0)];
        let mapper = mapper(&[(0.0, 20_000.0)]);
        let settings = EditorSettings::default();

        let first = calculator.calculate(&events, &mapper, SCREEN, &settings);
        let outcome = calculator.refresh(
            &first,
            &mapper,
            &settings,
            Some(&ScreenSource {
                media_id: "screen".into(),
                width: 1920.0,
                height: 1080.0,
                duration_ms: 20_000.0,
            }),
            &events,
        );
        assert!(!outcome.changed);
        assert_eq!(outcome.value, first);
    }

    #[test]
    fn test_refresh_without_screen_keeps_schedule() {
        let calculator = AutoScheduleCalculator::with_defaults();
        let existing = vec![ViewportMotion::manual(
            3000.0,
            1000.0,
            Rect::new(0.0, 0.0, 960.0, 540.0),
        )];
        let outcome = calculator.refresh(
            &existing,
            &mapper(&[(0.0, 1000.0)]),
            &EditorSettings::default(),
            None,
            &[click(500.0, 1.0, 1.0)],
        );
        assert!(!outcome.changed);
        assert_eq!(outcome.value, existing);
    }

    #[test]
    fn test_refresh_manual_mode_prunes() {
        let mut settings = EditorSettings::default();
        settings.zoom.auto_zoom = false;
        let rect = Rect::new(0.0, 0.0, 960.0, 540.0);
        let existing = vec![
            ViewportMotion::manual(2000.0, 1000.0, rect),
            ViewportMotion::manual(6000.0, 1000.0, rect),
        ];

        let outcome = AutoScheduleCalculator::with_defaults().refresh(
            &existing,
            &mapper(&[(0.0, 4000.0)]),
            &settings,
            None,
            &[],
        );
        assert!(outcome.changed);
        assert_eq!(outcome.value, vec![existing[0].clone()]);
    }

    #[test]
    fn test_prune_spotlights_by_start() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let spotlights = vec![
            SpotlightAction::new(1000.0, 5000.0, rect, 1.25),
            SpotlightAction::new(4000.0, 4500.0, rect, 1.25),
        ];
        let outcome = prune_spotlights(&spotlights, &mapper(&[(0.0, 4000.0)]));
        assert!(outcome.changed);
        assert_eq!(outcome.value.len(), 1);
        assert_eq!(outcome.value[0].output_end_time_ms, 5000.0);
    }

    #[test]
    fn test_centroid_calculation() {
        let centroid = compute_centroid(&[(0.0, 0.0), (10.0, 20.0)]);
        assert_eq!(centroid, (5.0, 10.0));
        assert_eq!(compute_spread(&[(0.0, 0.0)], (3.0, 4.0)), 5.0);
    }
}
