//! Free-interval resolution, drag clamping and hover placement shared by
//! every action track.
//!
//! A track only has to say how an action's output-time interval is read
//! and written ([`TrackAction`]); everything else is common. Intervals are
//! half-open and members of one track never overlap.

/// Half-open output-time interval `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start_ms: f64,
    pub end_ms: f64,
}

impl Span {
    pub fn new(start_ms: f64, end_ms: f64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Zero-length span at `t`.
    pub fn point(t: f64) -> Self {
        Self::new(t, t)
    }

    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_ms && t < self.end_ms
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }
}

/// How an action exposes its interval to the shared algorithms.
pub trait TrackAction {
    fn id(&self) -> &str;

    fn span(&self) -> Span;

    /// Store a new interval, keeping the action's own anchoring scheme.
    fn set_span(&mut self, span: Span);
}

/// The free interval around an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Latest end among neighbors before the reference (0 if none).
    pub prev_end: f64,
    /// Earliest start among neighbors after the reference (track end if none).
    pub next_start: f64,
}

impl Bounds {
    pub fn gap_ms(&self) -> f64 {
        self.next_start - self.prev_end
    }
}

/// What part of an action a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
}

/// Free interval around `target_id` within `actions`.
///
/// Without a target (or with an unknown id) the reference is a zero-length
/// span at 0.
pub fn resolve_bounds<A: TrackAction>(
    target_id: Option<&str>,
    actions: &[A],
    track_end: f64,
) -> Bounds {
    let reference = target_id
        .and_then(|id| actions.iter().find(|a| a.id() == id))
        .map_or(Span::point(0.0), |a| a.span());
    bounds_around(reference, target_id, actions, track_end)
}

/// Free interval around an arbitrary reference span, ignoring `exclude`.
pub fn bounds_around<A: TrackAction>(
    reference: Span,
    exclude: Option<&str>,
    actions: &[A],
    track_end: f64,
) -> Bounds {
    let mut bounds = Bounds {
        prev_end: 0.0,
        next_start: track_end,
    };

    for action in actions {
        if Some(action.id()) == exclude {
            continue;
        }
        let span = action.span();
        if span.end_ms <= reference.start_ms {
            bounds.prev_end = bounds.prev_end.max(span.end_ms);
        }
        if span.start_ms >= reference.end_ms {
            bounds.next_start = bounds.next_start.min(span.start_ms);
        }
    }

    bounds
}

/// Apply a pointer delta to `original`, clamped to `bounds` and the
/// minimum duration.
///
/// Always computed from the span at drag start so repeated ticks never
/// accumulate rounding.
pub fn drag_span(
    original: Span,
    mode: DragMode,
    delta_ms: f64,
    bounds: Bounds,
    min_duration_ms: f64,
) -> Span {
    match mode {
        DragMode::Move => {
            let duration = original.duration_ms();
            let mut start = original.start_ms + delta_ms;
            if start < bounds.prev_end {
                start = bounds.prev_end;
            }
            let mut end = start + duration;
            if end > bounds.next_start {
                end = bounds.next_start;
                start = end - duration;
            }
            Span::new(start, end)
        }
        DragMode::ResizeStart => {
            let start = (original.start_ms + delta_ms)
                .min(original.end_ms - min_duration_ms)
                .max(bounds.prev_end);
            Span::new(start, original.end_ms)
        }
        DragMode::ResizeEnd => {
            let end = (original.end_ms + delta_ms)
                .max(original.start_ms + min_duration_ms)
                .min(bounds.next_start);
            Span::new(original.start_ms, end)
        }
    }
}

/// How a new action is laid out around the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchoring {
    /// The action ends at the pointer (zoom motions).
    End,
    /// The action starts at the pointer (spotlights).
    Interval,
}

/// Ghost span for adding an action at pointer time `pointer_ms`.
///
/// `None` means there is no room: the pointer is over an existing action,
/// outside the track, or the gap is shorter than `min_duration_ms`.
pub fn hover_placement<A: TrackAction>(
    pointer_ms: f64,
    actions: &[A],
    track_end: f64,
    default_duration_ms: f64,
    min_duration_ms: f64,
    anchoring: Anchoring,
) -> Option<Span> {
    if !(0.0..=track_end).contains(&pointer_ms) {
        return None;
    }
    if actions.iter().any(|a| a.span().contains(pointer_ms)) {
        return None;
    }

    let bounds = bounds_around(Span::point(pointer_ms), None, actions, track_end);
    if bounds.gap_ms() < min_duration_ms {
        return None;
    }

    let span = match anchoring {
        Anchoring::End => {
            let end = pointer_ms;
            let start = (end - default_duration_ms).max(bounds.prev_end);
            if end - start >= min_duration_ms {
                Span::new(start, end)
            } else {
                Span::new(bounds.prev_end, bounds.prev_end + min_duration_ms)
            }
        }
        Anchoring::Interval => {
            let start = pointer_ms;
            let end = (start + default_duration_ms).min(bounds.next_start);
            if end - start >= min_duration_ms {
                Span::new(start, end)
            } else {
                let duration = default_duration_ms.min(bounds.gap_ms());
                let start = bounds.prev_end + (bounds.gap_ms() - duration) / 2.0;
                Span::new(start, start + duration)
            }
        }
    };

    Some(span)
}

/// Whether `span` fits on the track without touching any other action.
pub fn fits<A: TrackAction>(span: Span, exclude: Option<&str>, actions: &[A], track_end: f64) -> bool {
    span.start_ms >= 0.0
        && span.end_ms <= track_end
        && span.start_ms < span.end_ms
        && actions
            .iter()
            .filter(|a| Some(a.id()) != exclude)
            .all(|a| !a.span().overlaps(&span))
}

/// Actions whose interval contains `t`.
pub fn active_at<A: TrackAction>(actions: &[A], t: f64) -> impl Iterator<Item = &A> {
    actions.iter().filter(move |a| a.span().contains(t))
}

/// Insert keeping the track ordered by start time.
pub fn insert_sorted<A: TrackAction>(actions: &mut Vec<A>, action: A) {
    let start = action.span().start_ms;
    let index = actions.partition_point(|a| a.span().start_ms <= start);
    actions.insert(index, action);
}
