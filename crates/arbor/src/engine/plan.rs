//! SQL planning over a compiled spec.
//!
//! One SELECT covers a query group: the root table plus every promoted
//! single-valued relationship, LEFT JOINed in dependency order. Many-valued
//! relationships get their own driver queries, filtered by the parent IDs of
//! the batch at hand.

use crate::options::{Selection, UpdateTable};

use arbor_core::spec::{FieldSpec, QualifiedColumn, RelSpec, TableSpec};
use arbor_core::stmt::Value;
use arbor_core::{Error, Result};
use arbor_sql::{alias_column, format_datetime, Column, Expr, Join, Select};

use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet, VecDeque};

/// Maps each generated column alias back to its `(table, column)` pair.
pub(crate) type AliasMap = HashMap<String, (String, String)>;

/// Plans the SELECT for a query group.
///
/// Selects the union of fields and primary key for the root table and every
/// single-valued relationship target, each under its deterministic alias.
pub(crate) fn group_select(table: &TableSpec, filter: Option<Expr>) -> Result<(Select, AliasMap)> {
    let ordered = order_joins(&table.name, &table.relationships.one)?;

    let mut select = Select::new(&table.name);
    let mut aliases = AliasMap::new();
    push_columns(table, &mut select, &mut aliases);

    for rel in ordered {
        push_columns(&rel.target, &mut select, &mut aliases);
        select.joins.push(Join {
            target: rel.target.name.clone(),
            left: Column::new(&rel.source.table, &rel.column.column),
            right: Column::new(&rel.target.name, &rel.target.id),
        });
    }

    select.filter = filter;
    Ok((select, aliases))
}

/// Plans the child query for a many-valued relationship: the target's group
/// select, with the join column added to the selected set and an IN filter
/// over the collected parent IDs. No parents, no query.
pub(crate) fn many_select(
    rel: &RelSpec,
    parent_ids: &[Value],
) -> Result<Option<(Select, AliasMap)>> {
    if parent_ids.is_empty() {
        return Ok(None);
    }

    let mut target = rel.target.clone();
    if !target.fields.iter().any(|f| f.column == rel.column.column) {
        target.fields.push(FieldSpec::new(rel.column.column.clone()));
    }

    let filter = Expr::in_list(
        Column::new(&rel.target.name, &rel.column.column),
        parent_ids.to_vec(),
    );
    group_select(&target, Some(filter)).map(Some)
}

/// Plans the ID-resolution query for a selection. Returns the statement and
/// the alias the IDs come back under.
///
/// `Selection::Ids` never reaches here; the caller already has the list.
pub(crate) fn id_select(
    root: &TableSpec,
    selection: &Selection<'_>,
    now: NaiveDateTime,
) -> Result<(Select, String)> {
    match selection {
        Selection::All => {
            let mut select = Select::new(&root.name);
            select.columns.push(Column::new(&root.name, &root.id));
            Ok((select, alias_column(&root.name, &root.id)))
        }
        Selection::Ids(_) => Err(Error::invalid_selection(
            "an explicit ID list needs no ID query",
        )),
        Selection::UpdateTable(update) => update_table_select(update),
        Selection::Delta(delta) => {
            newer_than(root, &delta.fields, &delta.date)
        }
        Selection::Expiry(expiry) => {
            let cutoff = match expiry.age {
                crate::options::Age::Days(days) => now - chrono::Duration::days(days),
                crate::options::Age::Since(date) => date,
            };
            newer_than(root, std::slice::from_ref(&expiry.field), &cutoff)
        }
    }
}

fn update_table_select(update: &UpdateTable) -> Result<(Select, String)> {
    let mut select = Select::new(&update.table);
    select.columns.push(Column::new(&update.table, &update.id));

    match (&update.updated, &update.date) {
        (Some(updated), Some(date)) => {
            select.filter = Some(Expr::gt(
                Column::new(&update.table, updated),
                Value::String(format_datetime(date)),
            ));
        }
        (None, Some(_)) => {
            return Err(Error::invalid_selection(
                "update_table has a date but no updated column to compare it against",
            ))
        }
        _ => {}
    }

    Ok((select, alias_column(&update.table, &update.id)))
}

/// Plans `SELECT root.id … WHERE any field > date`, joining whatever tables
/// the fields live in: the root group's single-valued joins are always
/// present, and a direct many-valued target is joined on demand.
fn newer_than(
    root: &TableSpec,
    fields: &[QualifiedColumn],
    date: &NaiveDateTime,
) -> Result<(Select, String)> {
    if fields.is_empty() {
        return Err(Error::invalid_selection("no columns to compare against"));
    }

    let mut select = Select::new(&root.name);
    select.columns.push(Column::new(&root.name, &root.id));

    let mut tables: HashSet<&str> = HashSet::from([root.name.as_str()]);
    for rel in order_joins(&root.name, &root.relationships.one)? {
        tables.insert(rel.target.name.as_str());
        select.joins.push(Join {
            target: rel.target.name.clone(),
            left: Column::new(&rel.source.table, &rel.column.column),
            right: Column::new(&rel.target.name, &rel.target.id),
        });
    }

    for field in fields {
        if tables.contains(field.table.as_str()) {
            continue;
        }
        let rel = root
            .relationships
            .many
            .iter()
            .find(|rel| rel.target.name == field.table)
            .ok_or_else(|| {
                Error::invalid_selection(format!(
                    "table `{}` is not reachable from `{}`",
                    field.table, root.name
                ))
            })?;
        tables.insert(rel.target.name.as_str());
        select.joins.push(Join {
            target: rel.target.name.clone(),
            left: Column::new(&rel.source.table, &rel.source.id),
            right: Column::new(&rel.target.name, &rel.column.column),
        });
    }

    let date = Value::String(format_datetime(date));
    select.filter = Some(Expr::or(
        fields
            .iter()
            .map(|field| Expr::gt(Column::new(&field.table, &field.column), date.clone()))
            .collect(),
    ));

    Ok((select, alias_column(&root.name, &root.id)))
}

fn push_columns(table: &TableSpec, select: &mut Select, aliases: &mut AliasMap) {
    for column in table.columns() {
        select.columns.push(Column::new(&table.name, column));
        aliases.insert(
            alias_column(&table.name, column),
            (table.name.clone(), column.to_string()),
        );
    }
}

/// Orders single-valued joins so every join's left-side table is already
/// present in the FROM clause.
///
/// Fixed-point queue scan: pull the head; if its source table is available,
/// place it and mark its target available, otherwise rotate it to the tail.
/// A full rotation without progress means the join graph is cyclic or
/// disconnected from the root.
fn order_joins<'a>(root: &str, rels: &'a [RelSpec]) -> Result<Vec<&'a RelSpec>> {
    let mut queue: VecDeque<&RelSpec> = rels.iter().collect();
    let mut available: HashSet<&str> = HashSet::from([root]);
    let mut ordered = Vec::with_capacity(rels.len());
    let mut stalled = 0;

    while let Some(rel) = queue.pop_front() {
        if available.contains(rel.source.table.as_str()) {
            available.insert(rel.target.name.as_str());
            ordered.push(rel);
            stalled = 0;
        } else {
            queue.push_back(rel);
            stalled += 1;
            if stalled >= queue.len() {
                let remaining = queue.iter().map(|rel| rel.describe()).collect();
                return Err(Error::unorderable_joins(remaining));
            }
        }
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Age, Delta, Expiry};
    use arbor_core::spec::{RelSource, Spec};
    use arbor_sql::Serializer;
    use chrono::NaiveDate;

    fn compile(src: &str) -> Spec {
        Spec::compile(src).unwrap()
    }

    fn render(select: &Select) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let sql = Serializer::mysql().serialize(select, &mut params);
        (sql, params)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn group_select_joins_promoted_relationships_in_order() {
        // a -> b -> c promotes into one group with two dependency-ordered
        // joins.
        let spec = compile(
            r#"(Table a :fields "f"
                 {["b_id"] (Table b :fields
                   {["c_id"] (Table c :fields "x")})})"#,
        );

        let (select, aliases) = group_select(&spec.grouped, None).unwrap();
        let (sql, params) = render(&select);

        assert_eq!(
            sql,
            "SELECT `a`.`f` AS `a_sqlfield_f`, `a`.`a_id` AS `a_sqlfield_a_id`, \
             `b`.`b_id` AS `b_sqlfield_b_id`, \
             `c`.`x` AS `c_sqlfield_x`, `c`.`c_id` AS `c_sqlfield_c_id` \
             FROM `a` \
             LEFT JOIN `b` ON `a`.`b_id` = `b`.`b_id` \
             LEFT JOIN `c` ON `b`.`c_id` = `c`.`c_id`;"
        );
        assert!(params.is_empty());
        assert_eq!(
            aliases.get("c_sqlfield_x"),
            Some(&("c".to_string(), "x".to_string()))
        );
    }

    #[test]
    fn join_order_is_a_fixed_point_over_dependencies() {
        // Present the joins backwards; ordering must still place a->b first.
        let c_rel = {
            let mut rel = RelSpec::new(
                RelSource {
                    table: "b".to_string(),
                    id: "b_id".to_string(),
                },
                QualifiedColumn::new("b", "c_id"),
                TableSpec::new("c", None),
            );
            rel.kind = Some(arbor_core::spec::RelKind::One);
            rel
        };
        let b_rel = {
            let mut rel = RelSpec::new(
                RelSource {
                    table: "a".to_string(),
                    id: "a_id".to_string(),
                },
                QualifiedColumn::new("a", "b_id"),
                TableSpec::new("b", None),
            );
            rel.kind = Some(arbor_core::spec::RelKind::One);
            rel
        };

        let rels = vec![c_rel, b_rel];
        let ordered = order_joins("a", &rels).unwrap();
        let targets: Vec<&str> = ordered.iter().map(|r| r.target.name.as_str()).collect();
        assert_eq!(targets, ["b", "c"]);
    }

    #[test]
    fn disconnected_joins_are_unorderable() {
        let rel = {
            let mut rel = RelSpec::new(
                RelSource {
                    table: "elsewhere".to_string(),
                    id: "elsewhere_id".to_string(),
                },
                QualifiedColumn::new("elsewhere", "b_id"),
                TableSpec::new("b", None),
            );
            rel.kind = Some(arbor_core::spec::RelKind::One);
            rel
        };

        let rels = vec![rel];
        let err = order_joins("a", &rels).unwrap_err();
        assert!(err.is_unorderable_joins());
        assert!(err.to_string().contains("elsewhere -> b"));
    }

    #[test]
    fn many_select_filters_by_parent_ids() {
        let spec = compile(
            r#"(Table album :fields "title"
                 {["_album_id"] (Table tracks :fields "name")})"#,
        );
        let rel = &spec.grouped.relationships.many[0];

        let (select, _) = many_select(rel, &[Value::I64(1), Value::I64(2)])
            .unwrap()
            .unwrap();
        let (sql, params) = render(&select);

        assert_eq!(
            sql,
            "SELECT `tracks`.`name` AS `tracks_sqlfield_name`, \
             `tracks`.`album_id` AS `tracks_sqlfield_album_id`, \
             `tracks`.`tracks_id` AS `tracks_sqlfield_tracks_id` \
             FROM `tracks` \
             WHERE `tracks`.`album_id` IN (?, ?);"
        );
        assert_eq!(params, vec![Value::I64(1), Value::I64(2)]);
    }

    #[test]
    fn many_select_without_parents_is_no_query() {
        let spec = compile(
            r#"(Table album :fields "title"
                 {["_album_id"] (Table tracks :fields "name")})"#,
        );
        let rel = &spec.grouped.relationships.many[0];

        assert!(many_select(rel, &[]).unwrap().is_none());
    }

    #[test]
    fn all_selection_selects_every_id() {
        let spec = compile(r#"(Table users :fields "name")"#);
        let (select, id_alias) =
            id_select(&spec.grouped, &Selection::All, date(2024, 1, 1)).unwrap();
        let (sql, _) = render(&select);

        assert_eq!(sql, "SELECT `users`.`users_id` AS `users_sqlfield_users_id` FROM `users`;");
        assert_eq!(id_alias, "users_sqlfield_users_id");
    }

    #[test]
    fn update_table_compares_updated_column() {
        let update = UpdateTable {
            table: "changes".to_string(),
            id: "users_id".to_string(),
            updated: Some("updated_at".to_string()),
            date: Some(date(2024, 3, 1)),
        };

        let spec = compile(r#"(Table users :fields "name")"#);
        let (select, _) = id_select(
            &spec.grouped,
            &Selection::UpdateTable(&update),
            date(2024, 3, 9),
        )
        .unwrap();
        let (sql, params) = render(&select);

        assert_eq!(
            sql,
            "SELECT `changes`.`users_id` AS `changes_sqlfield_users_id` \
             FROM `changes` WHERE `changes`.`updated_at` > ?;"
        );
        assert_eq!(params, vec![Value::from("2024-03-01 00:00:00")]);
    }

    #[test]
    fn update_table_date_without_updated_column_is_rejected() {
        let update = UpdateTable {
            table: "changes".to_string(),
            id: "users_id".to_string(),
            updated: None,
            date: Some(date(2024, 3, 1)),
        };

        let spec = compile(r#"(Table users :fields "name")"#);
        let err = id_select(
            &spec.grouped,
            &Selection::UpdateTable(&update),
            date(2024, 3, 9),
        )
        .unwrap_err();

        assert!(err.is_invalid_selection());
    }

    #[test]
    fn delta_joins_referenced_many_targets() {
        let spec = compile(
            r#"(Table album :fields "title"
                 {["_album_id"] (Table tracks :fields "name")})"#,
        );
        let delta = Delta {
            fields: vec![
                QualifiedColumn::new("album", "released"),
                QualifiedColumn::new("tracks", "added"),
            ],
            date: date(2024, 1, 1),
        };

        let (select, _) = id_select(
            &spec.grouped,
            &Selection::Delta(&delta),
            date(2024, 3, 9),
        )
        .unwrap();
        let (sql, params) = render(&select);

        assert_eq!(
            sql,
            "SELECT `album`.`album_id` AS `album_sqlfield_album_id` FROM `album` \
             LEFT JOIN `tracks` ON `album`.`album_id` = `tracks`.`album_id` \
             WHERE (`album`.`released` > ? OR `tracks`.`added` > ?);"
        );
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], Value::from("2024-01-01 00:00:00"));
    }

    #[test]
    fn delta_rejects_unreachable_tables() {
        let spec = compile(r#"(Table album :fields "title")"#);
        let delta = Delta {
            fields: vec![QualifiedColumn::new("nowhere", "x")],
            date: date(2024, 1, 1),
        };

        let err = id_select(
            &spec.grouped,
            &Selection::Delta(&delta),
            date(2024, 3, 9),
        )
        .unwrap_err();
        assert!(err.is_invalid_selection());
    }

    #[test]
    fn expiry_in_days_counts_back_from_now() {
        let spec = compile(r#"(Table users :fields "name")"#);
        let expiry = Expiry {
            field: QualifiedColumn::new("users", "last_seen"),
            age: Age::Days(7),
        };

        let (select, _) = id_select(
            &spec.grouped,
            &Selection::Expiry(&expiry),
            date(2024, 3, 9),
        )
        .unwrap();
        let (sql, params) = render(&select);

        assert!(sql.ends_with("WHERE `users`.`last_seen` > ?;"));
        assert_eq!(params, vec![Value::from("2024-03-02 00:00:00")]);
    }
}
