//! Type registry and the parent-call detector
//!
//! The detector is a heuristic: it only asks whether a *direct* supertype
//! declares a member with the executing function's name. Deeper ancestors
//! are not consulted and no override resolution is attempted.

use crate::frame::FrameContext;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Declaration of one type: its direct bases and its own members
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub members: HashSet<String>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.members.insert(member.into());
        self
    }
}

/// Known types, keyed by name
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeInfo>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a type declaration
    pub fn declare(&mut self, info: TypeInfo) {
        self.types.insert(info.name.clone(), info);
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Does any direct supertype of `type_name` declare `member`?
    ///
    /// Only the members each direct base declares itself are consulted.
    /// A member a base merely inherits from its own bases does not count,
    /// so a grandparent's method never marks a call as a parent call.
    pub fn direct_supertype_declares(&self, type_name: &str, member: &str) -> bool {
        let Some(info) = self.types.get(type_name) else {
            return false;
        };
        info.bases.iter().any(|base| {
            self.types
                .get(base)
                .is_some_and(|base_info| base_info.members.contains(member))
        })
    }

    /// Parent-call annotation for the frame in `ctx`
    ///
    /// False when no instance is bound: type-bound calls are not checked.
    pub fn is_parent_call(&self, ctx: &FrameContext<'_>) -> bool {
        let frame = ctx.frame();
        match frame.bound_instance_type() {
            Some(type_name) => self.direct_supertype_declares(type_name, &frame.function),
            None => false,
        }
    }
}

impl FromIterator<TypeInfo> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = TypeInfo>>(iter: I) -> Self {
        let mut registry = Self::new();
        for info in iter {
            registry.declare(info);
        }
        registry
    }
}
