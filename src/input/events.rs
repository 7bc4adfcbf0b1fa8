//! Pointer event types delivered by the input collaborator.

use crate::draw::Point2D;
use serde::{Deserialize, Serialize};

/// Pointer phase, mirroring touch down / move / up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerAction {
    Down,
    Move,
    Up,
}

/// A view-space position and the time it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub point: Point2D,
    pub timestamp_ms: i64,
}

impl TouchSample {
    pub fn new(x: f64, y: f64, timestamp_ms: i64) -> Self {
        Self {
            point: Point2D::new(x, y),
            timestamp_ms,
        }
    }
}

/// Raw pointer event as forwarded by the host.
///
/// Serialized form (used by scripted replays):
/// ```json
/// { "action": "move", "x": 12.0, "y": 40.5, "timestamp_ms": 1032, "contacts": 1 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: i64,
    /// Number of fingers/pointers currently in contact
    #[serde(default = "default_contacts")]
    pub contacts: u32,
}

fn default_contacts() -> u32 {
    1
}

impl PointerEvent {
    pub fn new(action: PointerAction, x: f64, y: f64, timestamp_ms: i64) -> Self {
        Self {
            action,
            x,
            y,
            timestamp_ms,
            contacts: 1,
        }
    }

    pub fn down(x: f64, y: f64, timestamp_ms: i64) -> Self {
        Self::new(PointerAction::Down, x, y, timestamp_ms)
    }

    pub fn moved(x: f64, y: f64, timestamp_ms: i64) -> Self {
        Self::new(PointerAction::Move, x, y, timestamp_ms)
    }

    pub fn up(x: f64, y: f64, timestamp_ms: i64) -> Self {
        Self::new(PointerAction::Up, x, y, timestamp_ms)
    }

    /// Same event reported with a different number of active contacts.
    pub fn with_contacts(self, contacts: u32) -> Self {
        Self { contacts, ..self }
    }

    /// Multi-touch gestures (pinch, pan) belong to the host, not the painter.
    pub fn is_multi_touch(&self) -> bool {
        self.contacts >= 2
    }

    pub fn sample(&self) -> TouchSample {
        TouchSample::new(self.x, self.y, self.timestamp_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_script_entries_with_default_contacts() {
        let events: Vec<PointerEvent> = serde_json::from_str(
            r#"[
                {"action": "down", "x": 1.0, "y": 2.0, "timestamp_ms": 0},
                {"action": "move", "x": 3.0, "y": 4.0, "timestamp_ms": 16, "contacts": 2}
            ]"#,
        )
        .unwrap();

        assert_eq!(events[0], PointerEvent::down(1.0, 2.0, 0));
        assert_eq!(events[1].action, PointerAction::Move);
        assert!(events[1].is_multi_touch());
        assert!(!events[0].is_multi_touch());
    }
}
