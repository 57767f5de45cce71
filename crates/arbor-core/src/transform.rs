//! Field transforms.
//!
//! A transform is a pure value-to-value function applied to a raw column
//! value before it is written into the output record. Transforms are resolved
//! by name at compile time against a closed registry: the built-in set plus
//! any host functions the caller registers. The spec language has no inline
//! code; a spec naming an unregistered transform fails to compile.

use crate::stmt::Value;
use crate::{Error, Result};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type TransformFn = dyn Fn(Value) -> Result<Value> + Send + Sync;

/// A named transform, resolved and ready to apply.
///
/// Stored on the field spec it was declared on. Applying it to `Null` input
/// is allowed; a transform returning `Null` causes the field to be omitted
/// from the record.
#[derive(Clone)]
pub struct Transform {
    name: String,
    f: Arc<TransformFn>,
}

impl Transform {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, value: Value) -> Result<Value> {
        (self.f)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transform({})", self.name)
    }
}

// Transforms are registry entries; the name identifies the function.
impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Transform {}

/// The transform registry: name to host function.
pub struct Transforms {
    map: HashMap<String, Arc<TransformFn>>,
}

impl Transforms {
    /// The built-in registry.
    pub fn builtin() -> Self {
        let mut registry = Self {
            map: HashMap::new(),
        };
        registry.insert("binary-string", binary_string);
        registry
    }

    /// Returns this registry extended with a host function under `name`.
    /// Re-registering a name replaces the earlier entry.
    pub fn with(
        mut self,
        name: impl Into<String>,
        f: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.map.insert(name.into(), Arc::new(f));
        self
    }

    fn insert(&mut self, name: &str, f: impl Fn(Value) -> Result<Value> + Send + Sync + 'static) {
        self.map.insert(name.to_string(), Arc::new(f));
    }

    /// Resolves a name to a [`Transform`], failing compilation when unknown.
    pub fn resolve(&self, name: &str) -> Result<Transform> {
        match self.map.get(name) {
            Some(f) => Ok(Transform {
                name: name.to_string(),
                f: f.clone(),
            }),
            None => Err(Error::invalid_spec(format!("unknown transform `{name}`"))),
        }
    }
}

impl Default for Transforms {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Transforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transforms")
            .field("names", &self.map.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// `binary-string`: bytes to UTF-8 string. Null passes through; a string is
/// already decoded and passes through as well.
fn binary_string(value: Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(s)),
        Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(s) => Ok(Value::String(s)),
            Err(_) => Err(Error::type_conversion("Bytes", "String")),
        },
        other => Err(Error::type_conversion(other.type_name(), "String")),
    }
}
