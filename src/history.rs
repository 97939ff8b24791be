//! Recorded trace events

use crate::frame::FrameDescriptor;
use crate::hook::EventKind;
use serde::{Deserialize, Serialize};

/// One retained call or return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Session-wide raw event index
    pub step: u64,
    /// Nesting level of the invocation starting or ending
    pub depth: i64,
    pub kind: EventKind,
    pub caller: Option<FrameDescriptor>,
    pub callee: FrameDescriptor,
    pub is_parent_call: bool,
}

/// Ordered sequence of retained events for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    events: Vec<TraceEvent>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: TraceEvent) {
        debug_assert!(
            self.events.last().map_or(true, |last| last.step < event.step),
            "steps must be strictly increasing"
        );
        self.events.push(event);
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of places where consecutive retained steps are not adjacent
    pub fn gap_count(&self) -> usize {
        self.events
            .windows(2)
            .filter(|pair| pair[1].step != pair[0].step + 1)
            .count()
    }

    /// Deepest recorded depth, if any event was recorded
    pub fn max_depth(&self) -> Option<i64> {
        self.events.iter().map(|event| event.depth).max()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a TraceEvent;
    type IntoIter = std::slice::Iter<'a, TraceEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<TraceEvent> for History {
    fn from_iter<I: IntoIterator<Item = TraceEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(step: u64, depth: i64, kind: EventKind) -> TraceEvent {
        TraceEvent {
            step,
            depth,
            kind,
            caller: None,
            callee: FrameDescriptor {
                source_path: "/a.rs".into(),
                line: 1,
                qualified_name: "f".into(),
                local_bindings: Vec::new(),
            },
            is_parent_call: false,
        }
    }

    #[test]
    fn test_gap_count() {
        let history: History = [
            event(0, 0, EventKind::Call),
            event(1, 1, EventKind::Call),
            event(4, 1, EventKind::Return),
            event(5, 0, EventKind::Return),
            event(9, 0, EventKind::Call),
        ]
        .into_iter()
        .collect();
        assert_eq!(history.gap_count(), 2);
        assert_eq!(history.max_depth(), Some(1));
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn test_empty_history() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.gap_count(), 0);
        assert_eq!(history.max_depth(), None);
    }

    #[test]
    fn test_serializes_as_array() {
        let history: History = [event(0, 0, EventKind::Call)].into_iter().collect();
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["kind"], "call");
        assert_eq!(json[0]["callee"]["qualified_name"], "f");
    }
}
