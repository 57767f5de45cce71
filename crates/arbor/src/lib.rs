//! Arbor extracts tree-shaped entities from a relational database.
//!
//! A declarative spec names a root table, its columns, and its relationships
//! to other tables. Compiling the spec classifies every relationship as
//! single- or many-valued and promotes transitive single-valued
//! relationships into query groups, each covered by one SELECT with
//! dependency-ordered LEFT JOINs. At extraction time the flat result rows
//! are stitched back into nested records matching the spec's shape,
//! recursing across many-valued relationships with batched IN-clause
//! queries.
//!
//! ```no_run
//! # async fn example(driver: impl arbor::driver::Driver) -> arbor::Result<()> {
//! let spec = arbor::compile(
//!     r#"(Table album :fields "title"
//!          {["artist_id" :flatten] (Table artist :fields "name")}
//!          {["_album_id" :as "tracks"] (Table tracks :fields "name")})"#,
//! )?;
//!
//! let db = arbor::Db::new(driver);
//! let mut records = db.entities(&spec, arbor::Options::new()).await?;
//! while let Some(extracted) = records.next().await {
//!     let extracted = extracted?;
//!     println!("{:?}: {:?}", extracted.id, extracted.record);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cursor;
pub use cursor::{Extracted, Extraction};

pub mod db;
pub use db::Db;

mod engine;

mod options;
pub use options::{Age, Batch, Delta, Expiry, Options, UpdateTable};

pub use arbor_core::spec::{QualifiedColumn, Spec};
pub use arbor_core::stmt::{Record, Value};
pub use arbor_core::{async_trait, Error, Result, Transforms};

pub mod driver {
    pub use arbor_core::driver::*;
    pub use arbor_core::stmt::RowStream;
}

/// Compiles a spec source against the built-in transform registry.
///
/// Compilation is pure; the result is immutable and freely shareable.
pub fn compile(src: &str) -> Result<Spec> {
    Spec::compile(src)
}

/// Compiles a spec source, resolving transform names against `transforms`.
pub fn compile_with(src: &str, transforms: &Transforms) -> Result<Spec> {
    Spec::compile_with(src, transforms)
}
