//! Recorded user events.
//!
//! Events are captured alongside the screen recording and stored as
//! append-only JSONL. Timestamps are source-time milliseconds; positions
//! are in source-video pixel coordinates. The editor only ever reads them.

use serde::{Deserialize, Serialize};

/// Source-time timestamp in milliseconds since the recording started.
pub type SourceMs = f64;

/// A single recorded user event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEvent {
    /// Source-time milliseconds.
    #[serde(rename = "t")]
    pub time_ms: SourceMs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer position sample.
    Pointer { x: f64, y: f64 },

    /// Mouse button press.
    Click { button: MouseButton, x: f64, y: f64 },

    /// Press-move-release gesture.
    #[serde(rename_all = "camelCase")]
    Drag {
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        duration_ms: f64,
    },

    /// Single key press (shortcuts, navigation keys).
    Key { code: String },

    /// A burst of text entry, located at the caret or pointer.
    #[serde(rename_all = "camelCase")]
    Typing {
        x: f64,
        y: f64,
        characters: u32,
        duration_ms: f64,
    },

    /// Scroll wheel movement.
    Scroll { dx: f64, dy: f64, x: f64, y: f64 },

    /// Browser navigation.
    UrlChange { url: String },
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl UserEvent {
    pub fn pointer(time_ms: SourceMs, x: f64, y: f64) -> Self {
        Self {
            time_ms,
            kind: EventKind::Pointer { x, y },
        }
    }

    pub fn click(time_ms: SourceMs, button: MouseButton, x: f64, y: f64) -> Self {
        Self {
            time_ms,
            kind: EventKind::Click { button, x, y },
        }
    }

    pub fn drag(time_ms: SourceMs, from: (f64, f64), to: (f64, f64), duration_ms: f64) -> Self {
        Self {
            time_ms,
            kind: EventKind::Drag {
                start_x: from.0,
                start_y: from.1,
                end_x: to.0,
                end_y: to.1,
                duration_ms,
            },
        }
    }

    pub fn key(time_ms: SourceMs, code: impl Into<String>) -> Self {
        Self {
            time_ms,
            kind: EventKind::Key { code: code.into() },
        }
    }

    pub fn typing(time_ms: SourceMs, x: f64, y: f64, characters: u32, duration_ms: f64) -> Self {
        Self {
            time_ms,
            kind: EventKind::Typing {
                x,
                y,
                characters,
                duration_ms,
            },
        }
    }

    pub fn scroll(time_ms: SourceMs, dx: f64, dy: f64, x: f64, y: f64) -> Self {
        Self {
            time_ms,
            kind: EventKind::Scroll { dx, dy, x, y },
        }
    }

    pub fn url_change(time_ms: SourceMs, url: impl Into<String>) -> Self {
        Self {
            time_ms,
            kind: EventKind::UrlChange { url: url.into() },
        }
    }

    /// Position the user was interacting with, if the event has one.
    ///
    /// Drags report where they ended.
    pub fn position(&self) -> Option<(f64, f64)> {
        match &self.kind {
            EventKind::Pointer { x, y }
            | EventKind::Click { x, y, .. }
            | EventKind::Typing { x, y, .. }
            | EventKind::Scroll { x, y, .. } => Some((*x, *y)),
            EventKind::Drag { end_x, end_y, .. } => Some((*end_x, *end_y)),
            EventKind::Key { .. } | EventKind::UrlChange { .. } => None,
        }
    }

    /// Whether the event marks deliberate interaction rather than passive motion.
    pub fn is_interaction(&self) -> bool {
        !matches!(
            self.kind,
            EventKind::Pointer { .. } | EventKind::UrlChange { .. }
        )
    }

    /// Source time at which the interaction is over.
    pub fn end_ms(&self) -> SourceMs {
        match &self.kind {
            EventKind::Drag { duration_ms, .. } | EventKind::Typing { duration_ms, .. } => {
                self.time_ms + duration_ms.max(0.0)
            }
            _ => self.time_ms,
        }
    }
}

/// Parse events from JSONL content (one JSON object per line).
///
/// Blank lines and `#` header lines are skipped.
pub fn parse_events(jsonl: &str) -> Result<Vec<UserEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[UserEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_json_shape() {
        let event = UserEvent::click(1250.0, MouseButton::Left, 640.0, 360.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"t\":1250.0"));
        assert!(json.contains("\"type\":\"click\""));
        assert!(json.contains("\"button\":\"left\""));
    }

    #[test]
    fn test_multiword_fields_are_camel_case() {
        let json = serde_json::to_string(&UserEvent::drag(0.0, (1.0, 2.0), (3.0, 4.0), 250.0)).unwrap();
        assert!(json.contains("\"startX\":1.0"));
        assert!(json.contains("\"durationMs\":250.0"));

        let typing: UserEvent = serde_json::from_str(
            r#"{"t":10,"type":"typing","x":1,"y":2,"characters":3,"durationMs":400}"#,
        )
        .unwrap();
        assert_eq!(typing, UserEvent::typing(10.0, 1.0, 2.0, 3, 400.0));
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let events = vec![
            UserEvent::pointer(0.0, 10.0, 10.0),
            UserEvent::click(100.0, MouseButton::Left, 50.0, 60.0),
            UserEvent::url_change(150.0, "https://example.com"),
            UserEvent::typing(200.0, 300.0, 400.0, 12, 900.0),
        ];
        let jsonl = serialize_events(&events).unwrap();
        assert_eq!(parse_events(&jsonl).unwrap(), events);
    }

    #[test]
    fn test_parse_events_skips_header_comment() {
        let jsonl = "# {\"schema_version\":\"1.0\"}\n\n{\"t\":5,\"type\":\"key\",\"code\":\"Enter\"}\n";
        let parsed = parse_events(jsonl).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0], UserEvent::key(5.0, "Enter"));
    }

    #[test]
    fn test_position_extraction() {
        let drag = UserEvent::drag(0.0, (1.0, 2.0), (30.0, 40.0), 250.0);
        assert_eq!(drag.position(), Some((30.0, 40.0)));
        assert_eq!(UserEvent::key(0.0, "KeyA").position(), None);
        assert_eq!(UserEvent::url_change(0.0, "about:blank").position(), None);
    }

    #[test]
    fn test_interaction_classification() {
        assert!(!UserEvent::pointer(0.0, 1.0, 1.0).is_interaction());
        assert!(UserEvent::scroll(0.0, 0.0, 3.0, 1.0, 1.0).is_interaction());
        assert!(UserEvent::key(0.0, "Tab").is_interaction());
    }

    #[test]
    fn test_end_ms_includes_duration() {
        assert_eq!(UserEvent::typing(1000.0, 0.0, 0.0, 4, 600.0).end_ms(), 1600.0);
        assert_eq!(
            UserEvent::click(1000.0, MouseButton::Right, 0.0, 0.0).end_ms(),
            1000.0
        );
    }
}
