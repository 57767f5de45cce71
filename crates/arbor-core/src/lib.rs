mod error;
pub use error::Error;

pub mod driver;
pub use driver::Connection;

pub mod analyze;

pub mod dsl;

pub mod spec;
pub use spec::Spec;

pub mod stmt;

pub mod transform;
pub use transform::Transforms;

/// A Result type alias that uses Arbor's [`Error`] type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

pub use async_trait::async_trait;
