//! Normalized service model produced by the declaration extractor.
//!
//! Pure data with equality and hash semantics; nothing in here talks to the
//! bus or renders code. The extractor owns all validation, the planner and
//! generator consume the model read-only.

use std::fmt;

/// Visibility of the generated handler accessors.
///
/// Only the handler-side request streams are affected; topic constants,
/// parameter containers and the caller stub are always exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    Public,
    /// Crate-private accessors, the default.
    #[default]
    Internal,
}

/// A concrete type path, emitted verbatim into generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
}

/// One operation of a service.
///
/// `result` is `None` for one-way operations. `async_capable` records whether
/// the caller may suspend waiting for a reply; extraction guarantees it is
/// `true` whenever `result` is `Some`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub result: Option<TypeRef>,
    pub async_capable: bool,
}

/// A validated service: unique operations in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Service {
    pub namespace: String,
    pub name: String,
    pub operations: Vec<Operation>,
    pub property_visibility: Visibility,
}

impl Service {
    /// Fully-qualified name, e.g. `co.selim.sample.Division`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}
