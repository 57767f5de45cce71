//! The declarative extraction spec.
//!
//! A spec names a root table, its columns, and its relationships to other
//! tables. Parsing produces a [`TableSpec`] tree mirroring the user's
//! nesting; analysis rewrites each table into its query-group form. Both are
//! retained on [`Spec`]: the parsed tree preserves the original nesting, the
//! grouped tree drives per-group SQL.

mod field;
pub use field::FieldSpec;

mod rel;
pub use rel::{QualifiedColumn, RelKind, RelSource, RelSpec};

mod table;
pub use table::{Relationships, TableSpec};

use crate::transform::Transforms;
use crate::{analyze, dsl, Result};

/// A compiled extraction spec.
///
/// Compiled once per public API call, immutable thereafter, and safe to share
/// across concurrent extractions. Holds no I/O resources.
#[derive(Debug, Clone, PartialEq)]
pub struct Spec {
    /// The parsed tree, nesting preserved as written.
    pub parsed: TableSpec,

    /// The analyzed tree: relationships classified, single-valued subtrees
    /// promoted into query groups, output paths computed.
    pub grouped: TableSpec,
}

impl Spec {
    /// Compiles a spec source against the built-in transform registry.
    pub fn compile(src: &str) -> Result<Spec> {
        Self::compile_with(src, &Transforms::default())
    }

    /// Compiles a spec source, resolving transform names against `transforms`.
    pub fn compile_with(src: &str, transforms: &Transforms) -> Result<Spec> {
        let parsed = dsl::parse(src, transforms)?;
        let grouped = analyze::analyze(&parsed)?;
        Ok(Spec { parsed, grouped })
    }
}
