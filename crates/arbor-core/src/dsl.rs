//! The spec language.
//!
//! Specs are written as nested literals:
//!
//! ```text
//! (Table album :id "album_id"
//!   :fields "title"
//!           ["release_year" :as "meta.year"]
//!           ["cover" binary-string]
//!           {["artist_id" :flatten] (Table artist :fields "name")}
//!           {["_album_id" :as "tracks"] (Table tracks :fields "name")})
//! ```
//!
//! Each `:fields` element is one of: a string (simple field), a vector
//! (field with options and an optional transform name), or a single-entry
//! map from a join spec to a nested table form. An underscore prefix on a
//! join column marks a reverse reference: the column lives in the target
//! table, pointing back.

mod lexer;
use lexer::{Lexer, Token};

mod node;
pub use node::SpecNode;

mod parser;
use parser::Parser;

use crate::spec::TableSpec;
use crate::transform::Transforms;
use crate::Result;

/// Parses a spec source into a [`TableSpec`] tree, resolving transform names
/// against `transforms`.
pub fn parse(src: &str, transforms: &Transforms) -> Result<TableSpec> {
    Parser::new(src, transforms)?.parse()
}
