use crate::cursor::Extraction;
use crate::engine::{exec, plan};
use crate::options::{Options, Selection};

use arbor_core::driver::{Connection, Driver};
use arbor_core::stmt::{Record, Value};
use arbor_core::{Result, Spec};

use std::sync::Arc;

/// A database handle.
///
/// Wraps a [`Driver`]; each extraction acquires its own connection and
/// releases it when the extraction is dropped. Cloning is cheap and shares
/// the driver.
#[derive(Debug, Clone)]
pub struct Db {
    driver: Arc<dyn Driver>,
}

impl Db {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            driver: Arc::new(driver),
        }
    }

    /// Extracts the single entity with the given root ID. `None` when the
    /// root row is absent; no transform runs on a missing row.
    pub async fn entity(&self, spec: &Spec, id: impl Into<Value>) -> Result<Option<Record>> {
        let options = Options::new().ids(vec![id.into()]);
        let mut extraction = self.entities(spec, options).await?;
        match extraction.next().await {
            Some(Ok(extracted)) => Ok(Some(extracted.record)),
            Some(Err(err)) => Err(err),
            None => Ok(None),
        }
    }

    /// Eagerly resolves the root IDs the given options select. An empty
    /// selection returns all IDs.
    pub async fn entity_ids(&self, spec: &Spec, options: &Options) -> Result<Vec<Value>> {
        let mut conn = self.driver.connect().await?;
        resolve_ids(conn.as_mut(), spec, options).await
    }

    /// Extracts all entities the given options select, as a lazy stream.
    pub async fn entities(&self, spec: &Spec, options: Options) -> Result<Extraction> {
        let mut conn = self.driver.connect().await?;
        let ids = resolve_ids(conn.as_mut(), spec, &options).await?;
        let batches = options.batch.partition(ids);
        Ok(Extraction::new(conn, spec.grouped.clone(), batches))
    }
}

async fn resolve_ids(
    conn: &mut dyn Connection,
    spec: &Spec,
    options: &Options,
) -> Result<Vec<Value>> {
    if let Selection::Ids(ids) = options.selection() {
        return Ok(ids.to_vec());
    }

    let now = chrono::Utc::now().naive_utc();
    let (select, id_alias) = plan::id_select(&spec.grouped, &options.selection(), now)?;
    let rows = exec::run_select(conn, &select).await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| row.get(&id_alias).cloned())
        .filter(|id| !id.is_null())
        .collect())
}
