//! JSON output format for recorded traces
//!
//! `--format json` writes the configuration in effect together with the
//! retained events, so a trace can be post-processed by other tools.

use crate::config::TracerConfig;
use crate::history::History;
use serde::Serialize;

/// Complete JSON document for one session
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub version: &'static str,
    pub config: &'a TracerConfig,
    /// Number of retained events
    pub event_count: usize,
    /// Number of discontinuities between retained steps
    pub gap_count: usize,
    pub events: &'a History,
}

impl<'a> JsonOutput<'a> {
    pub fn new(history: &'a History, config: &'a TracerConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            config,
            event_count: history.len(),
            gap_count: history.gap_count(),
            events: history,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameDescriptor;
    use crate::history::TraceEvent;
    use crate::hook::EventKind;

    fn history() -> History {
        let callee = FrameDescriptor {
            source_path: "/proj/src/lib.rs".into(),
            line: 4,
            qualified_name: "work".into(),
            local_bindings: Vec::new(),
        };
        [
            TraceEvent {
                step: 0,
                depth: 0,
                kind: EventKind::Call,
                caller: None,
                callee: callee.clone(),
                is_parent_call: false,
            },
            TraceEvent {
                step: 3,
                depth: 0,
                kind: EventKind::Return,
                caller: None,
                callee,
                is_parent_call: false,
            },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_json_document_shape() {
        let history = history();
        let config = TracerConfig::default();
        let json = JsonOutput::new(&history, &config).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["event_count"], 2);
        assert_eq!(value["gap_count"], 1);
        assert_eq!(value["config"]["max_depth"], 4);
        assert_eq!(value["events"][1]["kind"], "return");
        assert!(value["events"][0]["caller"].is_null());
    }

    #[test]
    fn test_empty_history() {
        let history = History::new();
        let config = TracerConfig::default();
        let json = JsonOutput::new(&history, &config).to_json().unwrap();
        assert!(json.contains("\"event_count\": 0"));
        assert!(json.contains("\"events\": []"));
    }
}
