//! Calltrace - function call tracer with indentation-structured output
//!
//! This library records the call/return boundaries of instrumented code and
//! renders them as an execution trace, with a depth ceiling, path-based
//! filtering, parent-call annotations and optional argument dumps.
//!
//! ```
//! use calltrace::{frame, Runtime, Tracer};
//!
//! fn fib(rt: &mut Runtime, n: i64) -> i64 {
//!     rt.scope(frame!("fib", n => n), |rt| {
//!         if n < 2 { n } else { fib(rt, n - 1) + fib(rt, n - 2) }
//!     })
//! }
//!
//! let mut rt = Runtime::new();
//! let mut tracer = Tracer::new().quiet();
//! let (value, history) = tracer.traced(&mut rt, |rt| fib(rt, 3)).unwrap();
//! assert_eq!(value, 2);
//! assert_eq!(history.len(), 10);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod frame;
pub mod history;
pub mod hook;
pub mod json_output;
pub mod path;
pub mod recorder;
pub mod render;
pub mod runtime;
pub mod script;
pub mod session;
pub mod type_registry;
pub mod value;

pub use config::TracerConfig;
pub use error::{Result, TraceError};
pub use frame::{Frame, FrameContext, FrameDescriptor};
pub use history::{History, TraceEvent};
pub use hook::{Continuation, EventKind, TraceListener};
pub use runtime::Runtime;
pub use session::Tracer;
pub use type_registry::{TypeInfo, TypeRegistry};
pub use value::{Binding, Value};
