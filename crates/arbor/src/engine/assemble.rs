//! Row assembly: a flat aliased row becomes a nested record.

use super::exec::Row;

use arbor_core::spec::TableSpec;
use arbor_core::stmt::{Record, Value};
use arbor_core::{Error, Result};
use arbor_sql::alias_column;

/// Builds the nested record for one group row.
///
/// Single-valued relationships read from the same flat row and merge at
/// their path; many-valued relationships map their attached child rows
/// through the target's own group procedure.
pub(crate) fn group_record(table: &TableSpec, row: &Row) -> Result<Record> {
    let mut record = table_record(table, row)?;

    for rel in &table.relationships.one {
        let sub = table_record(&rel.target, row)?;
        if !sub.is_empty() {
            record.merge_at(&rel.path, sub);
        }
    }

    for rel in &table.relationships.many {
        let mut items = Vec::new();
        if let Some(children) = row.many.get(&rel.slot()) {
            for child in children {
                items.push(Value::Record(group_record(&rel.target, child)?));
            }
        }
        record.insert_at(&rel.path, Value::List(items));
    }

    Ok(record)
}

/// Builds the leaf-field record for one table out of the flat row. A field
/// whose (transformed) value is null is omitted entirely.
fn table_record(table: &TableSpec, row: &Row) -> Result<Record> {
    let mut record = Record::new();

    for field in &table.fields {
        let alias = alias_column(&table.name, &field.column);
        let raw = row.columns.get(&alias).cloned().unwrap_or(Value::Null);

        let value = match &field.transform {
            Some(transform) => transform
                .apply(raw)
                .map_err(|err| err.context(Error::transform_failed(&field.column)))?,
            None => raw,
        };

        if !value.is_null() {
            record.insert_at(&field.path(), value);
        }
    }

    Ok(record)
}
