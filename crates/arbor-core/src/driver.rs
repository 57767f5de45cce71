//! The database contract.
//!
//! Arbor plans parameterized SQL; a [`Driver`] hands out [`Connection`]s
//! that execute it and deliver rows as flat alias-keyed [`Record`]s wrapped
//! in a [`RowStream`]. Connections are owned by the extraction that acquired
//! them and are released when it is dropped.

use crate::{
    async_trait,
    stmt::{RowStream, Value},
};

use std::fmt::Debug;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Creates a new connection to the database.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Executes a parameterized SQL query.
    ///
    /// `params` bind to `?` placeholders in order. Each delivered row must be
    /// keyed by the literal column alias strings from the statement's SELECT
    /// list.
    async fn query(&mut self, sql: &str, params: &[Value]) -> crate::Result<RowStream>;
}
