use crate::engine::{assemble, exec};

use arbor_core::driver::Connection;
use arbor_core::spec::TableSpec;
use arbor_core::stmt::{Record, Value};
use arbor_core::Result;
use arbor_sql::alias_column;

use std::collections::{HashMap, VecDeque};
use std::fmt;

/// An assembled record together with its originating root ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub id: Value,
    pub record: Record,
}

/// A lazy stream of extracted records.
///
/// Owns its database connection and a window of assembled records for the
/// current batch; the next batch's queries run only once the window drains.
/// Dropping the `Extraction` drops the connection and any buffered records.
///
/// Records come out in ID-resolution order. A duplicate ID within a batch
/// yields its record once per occurrence. After an error, the stream ends.
pub struct Extraction {
    conn: Box<dyn Connection>,
    root: TableSpec,
    batches: VecDeque<Vec<Value>>,
    buffer: VecDeque<Extracted>,
}

impl Extraction {
    pub(crate) fn new(
        conn: Box<dyn Connection>,
        root: TableSpec,
        batches: VecDeque<Vec<Value>>,
    ) -> Self {
        Self {
            conn,
            root,
            batches,
            buffer: VecDeque::new(),
        }
    }

    /// Returns the next extracted record.
    pub async fn next(&mut self) -> Option<Result<Extracted>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            let batch = self.batches.pop_front()?;
            if let Err(err) = self.load_batch(batch).await {
                self.batches.clear();
                return Some(Err(err));
            }
        }
    }

    /// Collects all remaining records.
    pub async fn collect(mut self) -> Result<Vec<Extracted>> {
        let mut ret = Vec::new();
        while let Some(res) = self.next().await {
            ret.push(res?);
        }
        Ok(ret)
    }

    async fn load_batch(&mut self, ids: Vec<Value>) -> Result<()> {
        let rows = exec::load_group(self.conn.as_mut(), &self.root, &ids).await?;

        let id_alias = alias_column(&self.root.name, &self.root.id);
        let mut by_id: HashMap<Value, Vec<Record>> = HashMap::new();
        for row in &rows {
            let id = row.columns.get(&id_alias).cloned().unwrap_or(Value::Null);
            if id.is_null() {
                continue;
            }
            by_id
                .entry(id)
                .or_default()
                .push(assemble::group_record(&self.root, row)?);
        }

        // Emit in the order IDs were resolved, skipping absent roots.
        for id in ids {
            if let Some(records) = by_id.get(&id) {
                for record in records {
                    self.buffer.push_back(Extracted {
                        id: id.clone(),
                        record: record.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extraction")
            .field("root", &self.root.name)
            .field("pending_batches", &self.batches.len())
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
