//! Recorded event scripts
//!
//! A script describes a program's boundary crossings so they can be
//! replayed through a [`Runtime`] without running the program:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "Base", "members": ["area"] },
//!     { "name": "Square", "bases": ["Base"], "members": ["area"] }
//!   ],
//!   "events": [
//!     { "call": { "function": "main", "path": "/app/main.py", "line": 1 } },
//!     { "line": 3 },
//!     { "call": { "function": "area", "path": "/app/shapes.py", "line": 9,
//!                 "locals": [ { "name": "self", "value": { "instance": { "type_name": "Square" } } } ] } },
//!     "return",
//!     "return"
//!   ]
//! }
//! ```

use crate::error::{Result, TraceError};
use crate::frame::Frame;
use crate::runtime::Runtime;
use crate::type_registry::{TypeInfo, TypeRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One step of a script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptEvent {
    Call(Frame),
    Return,
    Line(u32),
}

/// Type declarations plus an ordered event list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub types: Vec<TypeInfo>,
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Parse and validate a JSON script
    pub fn from_json(content: &str) -> Result<Self> {
        let script: Script =
            serde_json::from_str(content).map_err(|e| TraceError::Script(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Every `return` and `line` must have an open call to act on
    pub fn validate(&self) -> Result<()> {
        let mut open = 0usize;
        for (index, event) in self.events.iter().enumerate() {
            match event {
                ScriptEvent::Call(_) => open += 1,
                ScriptEvent::Return if open == 0 => {
                    return Err(TraceError::Script(format!(
                        "event {}: return without an open call",
                        index
                    )));
                }
                ScriptEvent::Return => open -= 1,
                ScriptEvent::Line(_) if open == 0 => {
                    return Err(TraceError::Script(format!(
                        "event {}: line outside of any call",
                        index
                    )));
                }
                ScriptEvent::Line(_) => {}
            }
        }
        Ok(())
    }

    /// Registry built from the declared types
    pub fn registry(&self) -> TypeRegistry {
        self.types.iter().cloned().collect()
    }

    /// Feed every event to `rt`, then unwind calls left open
    pub fn replay(&self, rt: &mut Runtime) {
        let base = rt.stack_depth();
        for event in &self.events {
            match event {
                ScriptEvent::Call(frame) => rt.call(frame.clone()),
                ScriptEvent::Return => {
                    rt.ret();
                }
                ScriptEvent::Line(line) => rt.line(*line),
            }
        }
        while rt.stack_depth() > base {
            rt.ret();
        }
    }
}
