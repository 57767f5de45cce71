//! Batched query execution.
//!
//! A batch of root IDs runs one group query, then one query per many-valued
//! relationship, recursing into each many-valued target's own group. Child
//! rows are grouped by foreign-key value and attached to their parent row
//! under the relationship's slot before assembly.

use super::plan;

use arbor_core::driver::Connection;
use arbor_core::spec::TableSpec;
use arbor_core::stmt::{Record, Value};
use arbor_core::Result;
use arbor_sql::{alias_column, Column, Expr, Select, Serializer};

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A flat result row plus the child rows attached for each many-valued
/// relationship, keyed by the relationship's slot.
#[derive(Debug, Clone, Default)]
pub(crate) struct Row {
    pub(crate) columns: Record,
    pub(crate) many: HashMap<String, Vec<Row>>,
}

impl Row {
    pub(crate) fn new(columns: Record) -> Self {
        Self {
            columns,
            many: HashMap::new(),
        }
    }
}

/// Serializes and runs a statement, collecting the result rows.
pub(crate) async fn run_select(
    conn: &mut dyn Connection,
    select: &Select,
) -> Result<Vec<Record>> {
    let mut params = Vec::new();
    let sql = Serializer::mysql().serialize(select, &mut params);
    conn.query(&sql, &params).await?.collect().await
}

/// Loads one batch of the group rooted at `table`: the group query filtered
/// by `ids`, with all many-valued children fetched and attached.
pub(crate) async fn load_group(
    conn: &mut dyn Connection,
    table: &TableSpec,
    ids: &[Value],
) -> Result<Vec<Row>> {
    let filter = Expr::in_list(Column::new(&table.name, &table.id), ids.to_vec());
    let (select, _) = plan::group_select(table, Some(filter))?;

    let records = run_select(conn, &select).await?;
    let mut rows: Vec<Row> = records.into_iter().map(Row::new).collect();
    attach_many(conn, table, &mut rows).await?;
    Ok(rows)
}

/// Fetches and attaches child rows for every many-valued relationship of
/// `table`, recursing into each target's own many-valued relationships.
///
/// Boxed because the recursion depth follows the spec's nesting.
fn attach_many<'a>(
    conn: &'a mut dyn Connection,
    table: &'a TableSpec,
    rows: &'a mut [Row],
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        for rel in &table.relationships.many {
            let parent_alias = alias_column(&rel.source.table, &rel.source.id);
            let parent_ids: Vec<Value> = rows
                .iter()
                .filter_map(|row| row.columns.get(&parent_alias))
                .filter(|id| !id.is_null())
                .cloned()
                .collect();

            let Some((select, _)) = plan::many_select(rel, &parent_ids)? else {
                continue;
            };
            let records = run_select(conn, &select).await?;
            let mut children: Vec<Row> = records.into_iter().map(Row::new).collect();
            attach_many(conn, &rel.target, &mut children).await?;

            let fk_alias = alias_column(&rel.target.name, &rel.column.column);
            let mut by_fk: HashMap<Value, Vec<Row>> = HashMap::new();
            for child in children {
                let fk = child.columns.get(&fk_alias).cloned().unwrap_or(Value::Null);
                by_fk.entry(fk).or_default().push(child);
            }

            let slot = rel.slot();
            for row in rows.iter_mut() {
                let children = match row.columns.get(&parent_alias) {
                    Some(id) if !id.is_null() => by_fk.get(id).cloned().unwrap_or_default(),
                    _ => Vec::new(),
                };
                row.many.insert(slot.clone(), children);
            }
        }
        Ok(())
    })
}
