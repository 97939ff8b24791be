//! Per-event filtering decisions
//!
//! Three independent rules decide what reaches the history:
//! - path filters reject an event (and suppress a call's subtree) when the
//!   logical caller's or the callee's path contains a configured substring
//! - the session-termination sentinel is never recorded
//! - the depth ceiling hides events deeper than `max_depth`
//!
//! Only path rejection skips depth bookkeeping. The other two rules hide an
//! event from the history while the tracker still counts it.

use crate::config::TracerConfig;
use crate::frame::Frame;
use crate::hook::{Continuation, EventKind};

/// Qualified name of the session-termination operation
pub const SESSION_END_NAME: &str = "Tracer.end";

/// Outcome of the path filter for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    /// Signal returned to the hook for this event
    ///
    /// Rejected calls suppress their subtree; returns and other kinds
    /// always continue.
    pub fn continuation(self, kind: EventKind) -> Continuation {
        match (self, kind) {
            (Verdict::Reject, EventKind::Call) => Continuation::Suppress,
            _ => Continuation::Continue,
        }
    }
}

/// Apply the path filters to a callee and its caller
pub fn check_paths(config: &TracerConfig, callee: &Frame, caller: Option<&Frame>) -> Verdict {
    let caller_path = caller.map(|frame| frame.path.as_str());
    if config.is_path_filtered(caller_path, &callee.path) {
        Verdict::Reject
    } else {
        Verdict::Accept
    }
}

/// Is this callee the tracer's own session-termination operation?
pub fn is_self_exclusion(qualified_name: &str) -> bool {
    qualified_name == SESSION_END_NAME
}

/// Is `depth` within the configured ceiling?
pub fn within_depth(config: &TracerConfig, depth: i64) -> bool {
    depth <= config.max_depth
}

/// Should an event that passed the path filters be written to the history?
pub fn should_record(config: &TracerConfig, callee_name: &str, depth: i64) -> bool {
    !is_self_exclusion(callee_name) && within_depth(config, depth)
}

/// Parse a comma-separated list such as `vendor, target ,build`
///
/// Blank entries are dropped.
pub fn parse_list(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
