//! Shadow-stack runtime acting as the instrumentation hook
//!
//! Instrumented code reports its own boundaries: [`Runtime::call`] on entry,
//! [`Runtime::ret`] on exit, or [`Runtime::scope`] around a closure. The
//! runtime keeps the stack of active frames and forwards each boundary to
//! the registered listener, if any.
//!
//! ```
//! use calltrace::{frame, Runtime};
//!
//! fn square(rt: &mut Runtime, x: i64) -> i64 {
//!     rt.scope(frame!("square", x => x), |_| x * x)
//! }
//!
//! let mut rt = Runtime::new();
//! assert_eq!(square(&mut rt, 4), 16);
//! assert_eq!(rt.stack_depth(), 0);
//! ```

use crate::error::{Result, TraceError};
use crate::frame::{Frame, FrameContext};
use crate::hook::{Continuation, EventKind, TraceListener};
use tracing::debug;

/// Call stack plus at most one listener
#[derive(Default)]
pub struct Runtime {
    /// Active frames, outermost first
    frames: Vec<Frame>,
    /// Per frame: whether its Call was delivered to a listener
    traced: Vec<bool>,
    listener: Option<Box<dyn TraceListener>>,
    /// Stack length at which a suppressed call sits
    suppressed_at: Option<usize>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("frames", &self.frames)
            .field("listening", &self.listener.is_some())
            .field("suppressed_at", &self.suppressed_at)
            .finish()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the listener; fails if one is already registered
    pub fn register(&mut self, listener: Box<dyn TraceListener>) -> Result<()> {
        if self.listener.is_some() {
            return Err(TraceError::ListenerBusy);
        }
        self.listener = Some(listener);
        self.suppressed_at = None;
        Ok(())
    }

    /// Remove the listener; events from now on are not delivered
    pub fn deregister(&mut self) -> Option<Box<dyn TraceListener>> {
        self.suppressed_at = None;
        self.listener.take()
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Number of active frames
    pub fn stack_depth(&self) -> usize {
        self.frames.len()
    }

    /// Innermost active frame
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    fn deliver(&mut self, kind: EventKind) -> Continuation {
        let Some(listener) = self.listener.as_mut() else {
            return Continuation::Continue;
        };
        match FrameContext::innermost(&self.frames) {
            Some(ctx) => listener.on_event(kind, ctx),
            None => Continuation::Continue,
        }
    }

    /// Enter `frame`
    pub fn call(&mut self, frame: Frame) {
        let traced = self.listener.is_some() && self.suppressed_at.is_none();
        self.frames.push(frame);
        self.traced.push(traced);
        if traced && self.deliver(EventKind::Call) == Continuation::Suppress {
            debug!(depth = self.frames.len(), "subtree suppressed");
            self.suppressed_at = Some(self.frames.len());
        }
    }

    /// Leave the innermost frame
    ///
    /// The Return is delivered only if the Call was, the listener is still
    /// registered and no enclosing call suppressed the subtree.
    pub fn ret(&mut self) -> Option<Frame> {
        let traced = *self.traced.last()?;
        if traced && self.listener.is_some() && self.suppressed_at.is_none() {
            self.deliver(EventKind::Return);
        }
        if self.suppressed_at == Some(self.frames.len()) {
            self.suppressed_at = None;
        }
        self.traced.pop();
        self.frames.pop()
    }

    /// Move the innermost frame to `line` and report it
    pub fn line(&mut self, line: u32) {
        if let Some(frame) = self.frames.last_mut() {
            frame.line = line;
        }
        if self.suppressed_at.is_none() && self.traced.last().copied().unwrap_or(false) {
            self.deliver(EventKind::Line);
        }
    }

    /// Run `f` inside `frame`
    pub fn scope<R>(&mut self, frame: Frame, f: impl FnOnce(&mut Runtime) -> R) -> R {
        self.call(frame);
        let result = f(self);
        self.ret();
        result
    }
}
