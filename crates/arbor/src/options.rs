use arbor_core::spec::QualifiedColumn;
use arbor_core::stmt::Value;

use chrono::NaiveDateTime;
use std::collections::VecDeque;

/// Extraction options: how to select the root IDs, and how to batch them.
///
/// When several selections are supplied, the highest-precedence one applies:
/// `ids` over `update_table` over `delta` over `expiry`. With none, every
/// row of the root table is selected.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub(crate) ids: Option<Vec<Value>>,
    pub(crate) update_table: Option<UpdateTable>,
    pub(crate) delta: Option<Delta>,
    pub(crate) expiry: Option<Expiry>,
    pub(crate) batch: Batch,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract exactly these root IDs, in this order.
    pub fn ids(mut self, ids: Vec<Value>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn update_table(mut self, update_table: UpdateTable) -> Self {
        self.update_table = Some(update_table);
        self
    }

    pub fn delta(mut self, delta: Delta) -> Self {
        self.delta = Some(delta);
        self
    }

    pub fn expiry(mut self, expiry: Expiry) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn batch(mut self, batch: Batch) -> Self {
        self.batch = batch;
        self
    }

    pub(crate) fn selection(&self) -> Selection<'_> {
        if let Some(ids) = &self.ids {
            Selection::Ids(ids)
        } else if let Some(update_table) = &self.update_table {
            Selection::UpdateTable(update_table)
        } else if let Some(delta) = &self.delta {
            Selection::Delta(delta)
        } else if let Some(expiry) = &self.expiry {
            Selection::Expiry(expiry)
        } else {
            Selection::All
        }
    }
}

/// The selection that won precedence resolution.
#[derive(Debug)]
pub(crate) enum Selection<'a> {
    All,
    Ids(&'a [Value]),
    UpdateTable(&'a UpdateTable),
    Delta(&'a Delta),
    Expiry(&'a Expiry),
}

/// Select IDs from a dedicated update-tracking table: rows whose `updated`
/// column is newer than `date`. Without a `date`, all rows. A `date` without
/// an `updated` column is rejected.
#[derive(Debug, Clone)]
pub struct UpdateTable {
    pub table: String,
    pub id: String,
    pub updated: Option<String>,
    pub date: Option<NaiveDateTime>,
}

/// Select roots where any of the listed datetime columns is newer than
/// `date`. Columns are `table/column` qualified and may live on the root, a
/// promoted single-valued table, or a direct many-valued target.
#[derive(Debug, Clone)]
pub struct Delta {
    pub fields: Vec<QualifiedColumn>,
    pub date: NaiveDateTime,
}

/// Select roots where `field` is newer than the age cutoff.
#[derive(Debug, Clone)]
pub struct Expiry {
    pub field: QualifiedColumn,
    pub age: Age,
}

/// An expiry cutoff: either an age in days back from now, or an absolute
/// datetime.
#[derive(Debug, Clone, Copy)]
pub enum Age {
    Days(i64),
    Since(NaiveDateTime),
}

/// ID batching. Each batch runs its own group and many-relationship queries;
/// no state crosses batch boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Batch {
    Size(usize),
    Disabled,
}

impl Default for Batch {
    fn default() -> Self {
        Batch::Size(10_000)
    }
}

impl Batch {
    pub(crate) fn partition(&self, ids: Vec<Value>) -> VecDeque<Vec<Value>> {
        if ids.is_empty() {
            return VecDeque::new();
        }
        match self {
            Batch::Disabled => VecDeque::from([ids]),
            Batch::Size(size) => {
                let size = (*size).max(1);
                let mut batches = VecDeque::new();
                let mut ids = ids;
                while ids.len() > size {
                    let rest = ids.split_off(size);
                    batches.push_back(ids);
                    ids = rest;
                }
                batches.push_back(ids);
                batches
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: i64) -> Vec<Value> {
        (0..n).map(Value::I64).collect()
    }

    #[test]
    fn batches_partition_in_order() {
        let batches = Batch::Size(2).partition(ids(5));
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, [2, 2, 1]);
        assert_eq!(batches[0], [Value::I64(0), Value::I64(1)]);
        assert_eq!(batches[2], [Value::I64(4)]);
    }

    #[test]
    fn disabled_batching_is_one_batch() {
        let batches = Batch::Disabled.partition(ids(5));
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 5);
    }

    #[test]
    fn empty_ids_produce_no_batches() {
        assert!(Batch::default().partition(Vec::new()).is_empty());
    }

    #[test]
    fn selection_precedence() {
        let options = Options::new()
            .expiry(Expiry {
                field: QualifiedColumn::new("a", "seen"),
                age: Age::Days(7),
            })
            .delta(Delta {
                fields: vec![],
                date: chrono::NaiveDateTime::default(),
            })
            .ids(vec![Value::I64(1)]);

        assert!(matches!(options.selection(), Selection::Ids(_)));

        let options = Options::new()
            .expiry(Expiry {
                field: QualifiedColumn::new("a", "seen"),
                age: Age::Days(7),
            })
            .delta(Delta {
                fields: vec![],
                date: chrono::NaiveDateTime::default(),
            });

        assert!(matches!(options.selection(), Selection::Delta(_)));
    }
}
