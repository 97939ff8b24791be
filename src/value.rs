//! Values held by local bindings of a traced frame

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binding name of a bound-instance reference
pub const SELF_BINDING: &str = "self";

/// Binding name of a bound-type reference
pub const CLS_BINDING: &str = "cls";

/// A snapshot of a local binding's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// An instance of a (possibly registered) type
    Instance { type_name: String },
    /// A type object
    Type { name: String },
    /// Anything else, already rendered
    Opaque(String),
}

impl Value {
    pub fn instance(type_name: impl Into<String>) -> Self {
        Value::Instance {
            type_name: type_name.into(),
        }
    }

    pub fn type_object(name: impl Into<String>) -> Self {
        Value::Type { name: name.into() }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Value::Type { .. })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Instance { type_name } => write!(f, "<{} instance>", type_name),
            Value::Type { name } => write!(f, "<type {}>", name),
            Value::Opaque(repr) => write!(f, "{}", repr),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

/// A named local binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// True for the bound-instance/bound-type references
    pub fn is_self_reference(&self) -> bool {
        self.name == SELF_BINDING || self.name == CLS_BINDING
    }
}
