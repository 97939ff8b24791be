//! Execution frames and the frame info extractor
//!
//! A [`Frame`] is the runtime's view of one active invocation. Listeners see
//! frames through a [`FrameContext`], which can walk back to the calling
//! frames the same way an interpreter frame's back pointer does.
//! [`extract`] turns a context into a [`FrameDescriptor`] for the history.

use crate::value::{Binding, Value, CLS_BINDING, SELF_BINDING};
use serde::{Deserialize, Serialize};

/// Separator between owner type name and function name
pub const QUALIFIED_SEPARATOR: &str = ".";

/// One active function invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Declared (bare) function name
    pub function: String,
    /// Source path of the function's code
    pub path: String,
    /// Current line within the source file
    pub line: u32,
    /// Local bindings in declaration order
    #[serde(default)]
    pub locals: Vec<Binding>,
}

impl Frame {
    pub fn new(function: impl Into<String>, path: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            path: path.into(),
            line,
            locals: Vec::new(),
        }
    }

    /// Add a local binding
    pub fn with_local(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.push(Binding::new(name, value));
        self
    }

    /// Bind `self` to an instance of `type_name`
    pub fn with_self(self, type_name: impl Into<String>) -> Self {
        self.with_local(SELF_BINDING, Value::instance(type_name))
    }

    /// Bind `cls` to the type object `type_name`
    pub fn with_cls(self, type_name: impl Into<String>) -> Self {
        self.with_local(CLS_BINDING, Value::type_object(type_name))
    }

    /// Look up a local binding by name
    pub fn local(&self, name: &str) -> Option<&Value> {
        self.locals
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| &binding.value)
    }

    /// Type name of the bound instance, if `self` is bound and not None
    pub fn bound_instance_type(&self) -> Option<&str> {
        match self.local(SELF_BINDING)? {
            Value::Instance { type_name } => Some(type_name),
            _ => None,
        }
    }

    /// Name of the bound type, if `cls` is bound and not None
    pub fn bound_type(&self) -> Option<&str> {
        match self.local(CLS_BINDING)? {
            Value::Type { name } => Some(name),
            _ => None,
        }
    }

    /// Function name, prefixed with the owning type when one is bound
    pub fn qualified_name(&self) -> String {
        match self.bound_instance_type().or_else(|| self.bound_type()) {
            Some(owner) => format!("{}{}{}", owner, QUALIFIED_SEPARATOR, self.function),
            None => self.function.clone(),
        }
    }
}

/// Build a [`Frame`] for the enclosing source location
///
/// ```
/// use calltrace::frame;
///
/// let f = frame!("parse", input => "abc", strict => true);
/// assert_eq!(f.function, "parse");
/// assert_eq!(f.locals.len(), 2);
/// ```
#[macro_export]
macro_rules! frame {
    ($name:expr) => {
        $crate::frame::Frame::new($name, file!(), line!())
    };
    ($name:expr, $($key:ident => $value:expr),+ $(,)?) => {
        $crate::frame::Frame::new($name, file!(), line!())
            $(.with_local(stringify!($key), $value))+
    };
}

/// A frame positioned on the call stack
///
/// `stack` holds the active frames outermost first; `index` points at the
/// frame this context describes.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    stack: &'a [Frame],
    index: usize,
}

impl<'a> FrameContext<'a> {
    /// Context for the innermost frame of `stack`, if any
    pub fn innermost(stack: &'a [Frame]) -> Option<Self> {
        stack.len().checked_sub(1).map(|index| Self { stack, index })
    }

    pub fn frame(&self) -> &'a Frame {
        &self.stack[self.index]
    }

    /// Position of this frame on the stack, 0 being outermost
    pub fn index(&self) -> usize {
        self.index
    }

    /// The calling frame, or None at the top of the stack
    pub fn back(&self) -> Option<FrameContext<'a>> {
        self.index.checked_sub(1).map(|index| FrameContext {
            stack: self.stack,
            index,
        })
    }
}

/// Normalized description of a frame as recorded in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    pub source_path: String,
    pub line: u32,
    pub qualified_name: String,
    /// Only captured when argument dumps are enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_bindings: Vec<Binding>,
}

/// Describe a frame; locals are copied only when `capture_locals` is set
pub fn extract(frame: &Frame, capture_locals: bool) -> FrameDescriptor {
    FrameDescriptor {
        source_path: frame.path.clone(),
        line: frame.line,
        qualified_name: frame.qualified_name(),
        local_bindings: if capture_locals {
            frame.locals.clone()
        } else {
            Vec::new()
        },
    }
}
