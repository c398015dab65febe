//! Recut Timeline Core
//!
//! The time-mapping and scheduling layer of the editor:
//! - **TimeMapper:** source ⇄ output ⇄ timeline time conversion over output windows
//! - **WindowEditor:** split, resize, move, remove and re-speed output windows
//! - **Action bounds:** shared free-interval, drag and hover-placement logic
//!   for the zoom and spotlight tracks
//! - **Auto-zoom:** viewport motion schedule derived from recorded events
//! - **History:** snapshot undo stack with a latch that coalesces gestures
//! - **EditorSession:** the editing context tying it all together
//!
//! This crate does no I/O: inputs and outputs are plain data.

pub mod action_bounds;
pub mod auto_zoom;
pub mod drag;
pub mod editor;
pub mod history;
pub mod outcome;
pub mod pixel;
pub mod time_mapper;
pub mod tracks;
pub mod window_editor;

pub use action_bounds::{Anchoring, Bounds, DragMode, Span, TrackAction};
pub use auto_zoom::{AutoScheduleCalculator, AutoScheduleConfig, ClusterPolicy, FocusPoint, FocusPolicy};
pub use drag::{DragTarget, Gesture};
pub use editor::{Document, EditorSession, FrameState, Selection};
pub use history::{History, InteractionLatch};
pub use outcome::EditOutcome;
pub use pixel::TimePixelMapper;
pub use time_mapper::{MapperCache, TimeMapper, NOT_VISIBLE};
pub use tracks::TrackPolicy;
pub use window_editor::{Edge, SplitAt, WindowEditor};
