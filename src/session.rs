//! Trace sessions
//!
//! A [`Tracer`] owns one [`Recorder`] and attaches it to a [`Runtime`] for
//! the duration of a session. Only one session may be active per process:
//! the recorder state is not reentrant, so a second `start` fails with
//! [`TraceError::SessionActive`] instead of interleaving two call trees.
//!
//! The recorder is shared with the runtime through `Rc<RefCell<_>>`, which
//! also keeps a tracer on the thread that created it.

use crate::config;
use crate::error::{Result, TraceError};
use crate::frame::{Frame, FrameContext};
use crate::history::History;
use crate::hook::{Continuation, EventKind, TraceListener};
use crate::recorder::Recorder;
use crate::render::{self, RenderOptions};
use crate::runtime::Runtime;
use crate::type_registry::TypeRegistry;
use std::cell::{Ref, RefCell};
use std::io::Write;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

fn claim_session() -> Result<()> {
    SESSION_ACTIVE
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .map(|_| ())
        .map_err(|_| TraceError::SessionActive)
}

fn release_session() {
    SESSION_ACTIVE.store(false, Ordering::Release);
}

/// Is a session active anywhere in this process?
pub fn session_active() -> bool {
    SESSION_ACTIVE.load(Ordering::Acquire)
}

/// Listener registered with the runtime for one session
struct SessionListener {
    recorder: Rc<RefCell<Recorder>>,
}

impl TraceListener for SessionListener {
    fn on_event(&mut self, kind: EventKind, ctx: FrameContext<'_>) -> Continuation {
        match self.recorder.try_borrow_mut() {
            Ok(mut recorder) => config::with(|cfg| recorder.observe(kind, ctx, cfg)),
            Err(_) => {
                warn!(?kind, "recorder busy, event dropped");
                Continuation::Continue
            }
        }
    }
}

/// Session controller
#[derive(Debug)]
pub struct Tracer {
    recorder: Rc<RefCell<Recorder>>,
    active: bool,
    options: RenderOptions,
    /// Print the rendered trace to stdout when the session ends
    echo: bool,
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracer {
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::new())
    }

    /// Tracer whose parent-call detection consults `registry`
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            recorder: Rc::new(RefCell::new(Recorder::with_registry(registry))),
            active: false,
            options: RenderOptions::default(),
            echo: true,
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Do not print the trace when the session ends
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// History of the current or most recent session
    pub fn history(&self) -> Ref<'_, History> {
        Ref::map(self.recorder.borrow(), Recorder::history)
    }

    /// Current nesting depth of the recorder
    pub fn depth(&self) -> i64 {
        self.recorder.borrow().depth()
    }

    /// Raw events counted so far in the session
    pub fn step(&self) -> u64 {
        self.recorder.borrow().step()
    }

    /// Begin a session: clear the history and attach to `rt`
    pub fn start(&mut self, rt: &mut Runtime) -> Result<()> {
        self.begin(rt, None)
    }

    /// End the session, print the trace and return the history
    ///
    /// The call into this method is itself visible to the runtime; the
    /// recorder recognises it and leaves it out of the history.
    pub fn end(&mut self, rt: &mut Runtime) -> Result<History> {
        self.end_to(rt, &mut std::io::stdout())
    }

    /// Like [`Tracer::end`], echoing the trace to `out` instead of stdout
    ///
    /// A failed write is logged; the session still ends normally.
    pub fn end_to<W: Write>(&mut self, rt: &mut Runtime, out: &mut W) -> Result<History> {
        if !self.active {
            return Err(TraceError::NoActiveSession);
        }
        rt.call(Frame::new("end", file!(), line!()).with_self("Tracer"));
        let history = self.detach(rt);
        rt.ret();
        self.emit(out, &history);
        Ok(history)
    }

    /// Run `f` under an implicit start/end pair
    ///
    /// `f` runs inside a wrapper frame that is entered before tracing
    /// starts; the recorder skips it when resolving callers.
    pub fn traced<R>(
        &mut self,
        rt: &mut Runtime,
        f: impl FnOnce(&mut Runtime) -> R,
    ) -> Result<(R, History)> {
        self.traced_to(rt, &mut std::io::stdout(), f)
    }

    /// Like [`Tracer::traced`], echoing the trace to `out` instead of stdout
    ///
    /// Once `f` has run its result is always returned; a failed write is
    /// only logged.
    pub fn traced_to<R, W: Write>(
        &mut self,
        rt: &mut Runtime,
        out: &mut W,
        f: impl FnOnce(&mut Runtime) -> R,
    ) -> Result<(R, History)> {
        rt.call(Frame::new("traced", file!(), line!()).with_self("Tracer"));
        let wrapper = rt.stack_depth() - 1;
        if let Err(e) = self.begin(rt, Some(wrapper)) {
            rt.ret();
            return Err(e);
        }
        let value = f(rt);
        let history = self.detach(rt);
        rt.ret();
        self.emit(out, &history);
        Ok((value, history))
    }

    fn begin(&mut self, rt: &mut Runtime, wrapper: Option<usize>) -> Result<()> {
        if self.active {
            return Err(TraceError::SessionActive);
        }
        claim_session()?;
        {
            let mut recorder = self.recorder.borrow_mut();
            recorder.reset();
            recorder.set_wrapper(wrapper);
        }
        let listener = SessionListener {
            recorder: Rc::clone(&self.recorder),
        };
        if let Err(e) = rt.register(Box::new(listener)) {
            release_session();
            return Err(e);
        }
        self.active = true;
        debug!(?wrapper, "trace session started");
        Ok(())
    }

    /// Rows for the current history under the process-wide configuration
    pub fn render(&self) -> Vec<String> {
        let history = self.history();
        config::with(|cfg| render::render(&history, cfg, self.options))
    }

    fn detach(&mut self, rt: &mut Runtime) -> History {
        rt.deregister();
        release_session();
        self.active = false;
        let recorder = self.recorder.borrow();
        debug!(
            steps = recorder.step(),
            events = recorder.history().len(),
            depth = recorder.depth(),
            "trace session ended"
        );
        recorder.history().clone()
    }

    fn emit<W: Write>(&self, out: &mut W, history: &History) {
        if !self.echo {
            return;
        }
        let written = config::with(|cfg| render::write_to(&mut *out, history, cfg, self.options))
            .and_then(|()| out.flush());
        if let Err(e) = written {
            warn!(error = %e, "failed to write trace");
        }
    }
}

impl Drop for Tracer {
    fn drop(&mut self) {
        if self.active {
            warn!("tracer dropped with an active session");
            release_session();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn leaf(rt: &mut Runtime) {
        rt.scope(Frame::new("leaf", "/proj/src/lib.rs", 20), |_| ());
    }

    #[test]
    #[serial]
    fn test_start_end_records_calls() {
        let mut rt = Runtime::new();
        let mut tracer = Tracer::new().quiet();
        tracer.start(&mut rt).unwrap();
        assert!(session_active());
        leaf(&mut rt);
        let history = tracer.end(&mut rt).unwrap();

        assert!(!session_active());
        assert_eq!(history.len(), 2);
        assert!(history
            .iter()
            .all(|e| e.callee.qualified_name == "leaf"));
        assert_eq!(rt.stack_depth(), 0);
    }

    #[test]
    #[serial]
    fn test_second_session_rejected() {
        let mut rt = Runtime::new();
        let mut other_rt = Runtime::new();
        let mut first = Tracer::new().quiet();
        let mut second = Tracer::new().quiet();
        first.start(&mut rt).unwrap();

        assert!(matches!(first.start(&mut rt), Err(TraceError::SessionActive)));
        assert!(matches!(
            second.start(&mut other_rt),
            Err(TraceError::SessionActive)
        ));

        first.end(&mut rt).unwrap();
        second.start(&mut other_rt).unwrap();
        second.end(&mut other_rt).unwrap();
    }

    #[test]
    #[serial]
    fn test_end_without_start() {
        let mut rt = Runtime::new();
        let mut tracer = Tracer::new().quiet();
        assert!(matches!(
            tracer.end(&mut rt),
            Err(TraceError::NoActiveSession)
        ));
    }

    #[test]
    #[serial]
    fn test_busy_runtime_releases_slot() {
        let mut rt = Runtime::new();
        rt.register(Box::new(|_: EventKind, _: FrameContext<'_>| Continuation::Continue))
            .unwrap();
        let mut tracer = Tracer::new().quiet();
        assert!(matches!(tracer.start(&mut rt), Err(TraceError::ListenerBusy)));
        assert!(!session_active());
    }

    #[test]
    #[serial]
    fn test_traced_hides_wrapper_frame() {
        let mut rt = Runtime::new();
        let mut tracer = Tracer::new().quiet();
        let (value, history) = rt
            .scope(Frame::new("main", "/proj/src/main.rs", 1), |rt| {
                tracer.traced(rt, |rt| {
                    rt.scope(Frame::new("work", "/proj/src/lib.rs", 5), |rt| {
                        leaf(rt);
                        42
                    })
                })
            })
            .unwrap();

        assert_eq!(value, 42);
        let first = &history.events()[0];
        assert_eq!(first.callee.qualified_name, "work");
        assert_eq!(first.caller.as_ref().unwrap().qualified_name, "main");
        assert!(history
            .iter()
            .all(|e| e.callee.qualified_name != "Tracer.traced"));
        assert_eq!(rt.stack_depth(), 0);
        assert!(!tracer.is_active());
    }

    #[test]
    #[serial]
    fn test_restart_clears_history() {
        let mut rt = Runtime::new();
        let mut tracer = Tracer::new().quiet();
        tracer.start(&mut rt).unwrap();
        leaf(&mut rt);
        leaf(&mut rt);
        tracer.end(&mut rt).unwrap();
        assert_eq!(tracer.history().len(), 4);

        tracer.start(&mut rt).unwrap();
        assert!(tracer.history().is_empty());
        assert_eq!(tracer.step(), 0);
        leaf(&mut rt);
        tracer.end(&mut rt).unwrap();
        assert_eq!(tracer.history().len(), 2);
    }

    #[test]
    #[serial]
    fn test_drop_releases_slot() {
        let mut rt = Runtime::new();
        {
            let mut tracer = Tracer::new().quiet();
            tracer.start(&mut rt).unwrap();
        }
        assert!(!session_active());
        rt.deregister();
    }
}
