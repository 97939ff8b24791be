//! Instrumentation hook boundary
//!
//! A listener receives one notification per call/return boundary (plus any
//! other event kinds the runtime delivers) and answers with a
//! [`Continuation`] for the call's subtree.

use crate::frame::FrameContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of boundary crossed by the traced program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Call,
    Return,
    Line,
    Exception,
}

impl EventKind {
    /// Upper-cased label used in rendered output
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Call => "CALL",
            EventKind::Return => "RETURN",
            EventKind::Line => "LINE",
            EventKind::Exception => "EXCEPTION",
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, EventKind::Call | EventKind::Return)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Listener's answer to a Call: keep delivering events for the subtree or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Continue,
    Suppress,
}

/// Receives boundary notifications from a runtime
pub trait TraceListener {
    fn on_event(&mut self, kind: EventKind, ctx: FrameContext<'_>) -> Continuation;
}

impl<F> TraceListener for F
where
    F: FnMut(EventKind, FrameContext<'_>) -> Continuation,
{
    fn on_event(&mut self, kind: EventKind, ctx: FrameContext<'_>) -> Continuation {
        self(kind, ctx)
    }
}
