//! Depth/step tracker and history recorder
//!
//! The recorder consumes boundary events in arrival order and keeps three
//! pieces of session state: the raw step counter, the current nesting depth
//! and the history of retained events.
//!
//! Per call/return:
//! 1. path-filtered events only advance the step counter
//! 2. a Return decrements depth before it is recorded
//! 3. the event is recorded unless it is the session-end sentinel or deeper
//!    than `max_depth`
//! 4. a Call increments depth after it is recorded
//! 5. the step counter always advances
//!
//! Depth is never clamped. A Return with no matching Call drives it
//! negative; this is logged, not corrected.

use crate::config::TracerConfig;
use crate::filter::{self, Verdict};
use crate::frame::{extract, FrameContext};
use crate::history::{History, TraceEvent};
use crate::hook::{Continuation, EventKind};
use crate::type_registry::TypeRegistry;
use tracing::{trace, warn};

/// Resolve the caller to record for the frame in `ctx`
///
/// `wrapper` is the stack index of the frame pushed by
/// [`crate::Tracer::traced`]. When the immediate caller sits at that index
/// it is skipped and its own caller is used instead (absent if the wrapper
/// is outermost). Frames are matched by position only, never by name.
pub fn resolve_logical_caller<'a>(
    ctx: &FrameContext<'a>,
    wrapper: Option<usize>,
) -> Option<FrameContext<'a>> {
    let caller = ctx.back()?;
    if Some(caller.index()) == wrapper {
        caller.back()
    } else {
        Some(caller)
    }
}

/// Session state machine
#[derive(Debug, Default)]
pub struct Recorder {
    step: u64,
    depth: i64,
    history: History,
    registry: TypeRegistry,
    /// Stack index of the session wrapper frame, if any
    wrapper: Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Clear history and counters for a new session
    pub fn reset(&mut self) {
        self.step = 0;
        self.depth = 0;
        self.history.clear();
        self.wrapper = None;
    }

    /// Mark the frame at stack index `index` as the session wrapper
    pub fn set_wrapper(&mut self, index: Option<usize>) {
        self.wrapper = index;
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn depth(&self) -> i64 {
        self.depth
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn into_history(self) -> History {
        self.history
    }

    /// Process one event delivered by the hook
    pub fn observe(
        &mut self,
        kind: EventKind,
        ctx: FrameContext<'_>,
        config: &TracerConfig,
    ) -> Continuation {
        if !kind.is_boundary() {
            return Continuation::Continue;
        }

        let callee = ctx.frame();
        let caller = resolve_logical_caller(&ctx, self.wrapper).map(|c| c.frame());
        let verdict = filter::check_paths(config, callee, caller);
        if verdict == Verdict::Reject {
            trace!(
                step = self.step,
                function = %callee.function,
                path = %callee.path,
                "path filtered"
            );
            self.step += 1;
            return verdict.continuation(kind);
        }

        if kind == EventKind::Return {
            self.depth -= 1;
            if self.depth < 0 {
                warn!(
                    step = self.step,
                    depth = self.depth,
                    function = %callee.function,
                    "return without matching call"
                );
            }
        }

        let callee_name = callee.qualified_name();
        if filter::should_record(config, &callee_name, self.depth) {
            let capture_locals = config.show_args && kind == EventKind::Call;
            self.history.push(TraceEvent {
                step: self.step,
                depth: self.depth,
                kind,
                caller: caller.map(|frame| extract(frame, false)),
                callee: extract(callee, capture_locals),
                is_parent_call: self.registry.is_parent_call(&ctx),
            });
        } else {
            trace!(step = self.step, depth = self.depth, name = %callee_name, "not recorded");
        }

        if kind == EventKind::Call {
            self.depth += 1;
        }
        self.step += 1;
        Continuation::Continue
    }
}
