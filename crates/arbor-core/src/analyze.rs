//! Spec analysis.
//!
//! Operates bottom-up on the parsed tree. For each table: classify each
//! relationship child as single- or many-valued, compute its output path,
//! then promote transitive single-valued relationships into this table's
//! query group so one SELECT can cover them all. Many-valued relationships
//! found inside promoted single-valued targets are lifted alongside, since
//! recursion only crosses many-valued edges.
//!
//! Analysis is idempotent: re-analyzing an analyzed tree is a no-op.

use crate::spec::{RelKind, RelSpec, TableSpec};
use crate::stmt::Path;
use crate::{Error, Result};

use std::collections::HashSet;

pub fn analyze(table: &TableSpec) -> Result<TableSpec> {
    let mut out = table.clone();

    let mut children = std::mem::take(&mut out.rels);
    children.extend(std::mem::take(&mut out.relationships.one));
    children.extend(std::mem::take(&mut out.relationships.many));

    let mut ones = Vec::new();
    let mut manys = Vec::new();
    for mut rel in children {
        rel.target = analyze(&rel.target)?;
        classify(&mut rel)?;
        if rel.is_one() {
            ones.push(rel);
        } else {
            manys.push(rel);
        }
    }

    // Promotion: splice each single-valued target's own single-valued
    // relationships in as siblings, stripping them from the target. Their
    // paths, and the paths of many-valued relationships lifted out of the
    // same targets, become relative to this table by prepending the parent
    // relationship's path.
    let mut one = Vec::new();
    let mut lifted = Vec::new();
    for mut rel in ones {
        let parent_path = rel.path.clone();
        let promoted = std::mem::take(&mut rel.target.relationships.one);
        let target_manys = std::mem::take(&mut rel.target.relationships.many);

        one.push(rel);
        for mut promoted in promoted {
            promoted.path = promoted.path.prepend(&parent_path);
            one.push(promoted);
        }
        for mut lifted_rel in target_manys {
            lifted_rel.path = lifted_rel.path.prepend(&parent_path);
            lifted.push(lifted_rel);
        }
    }

    // Two joins against the same table would make column aliases ambiguous.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut repeated: Vec<String> = Vec::new();
    for rel in &one {
        if !seen.insert(rel.target.name.as_str()) && !repeated.contains(&rel.target.name) {
            repeated.push(rel.target.name.clone());
        }
    }
    if !repeated.is_empty() {
        return Err(Error::repeated_join_table(repeated, out.name.clone()));
    }

    out.relationships.one = one;
    out.relationships.many = lifted.into_iter().chain(manys).collect();
    Ok(out)
}

/// Assigns kind and output path to a freshly parsed relationship. An already
/// classified relationship is left alone: its path may have been rewritten by
/// promotion, and recomputing it would discard the prefix.
fn classify(rel: &mut RelSpec) -> Result<()> {
    if rel.kind.is_some() {
        return Ok(());
    }

    let kind = if rel.column.table == rel.source.table {
        RelKind::One
    } else if rel.column.table == rel.target.name {
        RelKind::Many
    } else {
        return Err(Error::invalid_spec(format!(
            "relationship column `{}` is namespaced to neither `{}` nor `{}`",
            rel.column, rel.source.table, rel.target.name
        )));
    };

    rel.kind = Some(kind);
    rel.path = if rel.flatten && kind == RelKind::One {
        Path::root()
    } else if let Some(alias) = &rel.alias {
        Path::key(alias)
    } else if kind == RelKind::Many {
        Path::key(format!("_{}", rel.column.column))
    } else {
        Path::key(&rel.column.column)
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{QualifiedColumn, RelSource};
    use crate::transform::Transforms;

    fn parse(src: &str) -> TableSpec {
        crate::dsl::parse(src, &Transforms::default()).unwrap()
    }

    #[test]
    fn classifies_by_column_namespace() {
        let parsed = parse(
            r#"(Table album :fields "title"
                 {["artist_id"] (Table artist :fields "name")}
                 {["_album_id"] (Table tracks :fields "name")})"#,
        );
        let grouped = analyze(&parsed).unwrap();

        assert!(grouped.rels.is_empty());
        assert_eq!(grouped.relationships.one.len(), 1);
        assert_eq!(grouped.relationships.many.len(), 1);

        let one = &grouped.relationships.one[0];
        assert_eq!(one.kind, Some(RelKind::One));
        assert_eq!(one.path.keys(), ["artist_id"]);

        let many = &grouped.relationships.many[0];
        assert_eq!(many.kind, Some(RelKind::Many));
        assert_eq!(many.path.keys(), ["_album_id"]);
    }

    #[test]
    fn flatten_yields_root_path() {
        let grouped = analyze(&parse(
            r#"(Table album :fields "title"
                 {["artist_id" :flatten] (Table artist :fields "name")})"#,
        ))
        .unwrap();

        assert!(grouped.relationships.one[0].path.is_root());
    }

    #[test]
    fn alias_yields_single_key_path() {
        let grouped = analyze(&parse(
            r#"(Table album :fields "title"
                 {["_album_id" :as "tracks"] (Table tracks :fields "name")})"#,
        ))
        .unwrap();

        assert_eq!(grouped.relationships.many[0].path.keys(), ["tracks"]);
    }

    #[test]
    fn promotes_transitive_single_valued_relationships() {
        // a -> b -> c, all single-valued.
        let grouped = analyze(&parse(
            r#"(Table a :fields
                 {["b_id"] (Table b :fields
                   {["c_id"] (Table c :fields "x")})})"#,
        ))
        .unwrap();

        let one = &grouped.relationships.one;
        assert_eq!(one.len(), 2);
        assert_eq!(one[0].target.name, "b");
        assert_eq!(one[0].path.keys(), ["b_id"]);
        assert_eq!(one[1].target.name, "c");
        assert_eq!(one[1].path.keys(), ["b_id", "c_id"]);
        assert_eq!(one[1].source.table, "b");

        // Promotion completeness: nothing reachable through :one keeps a
        // non-empty :one list.
        assert!(one.iter().all(|rel| rel.target.relationships.one.is_empty()));
    }

    #[test]
    fn lifts_many_relationships_out_of_promoted_targets() {
        let grouped = analyze(&parse(
            r#"(Table album :fields "title"
                 {["artist_id"] (Table artist :fields "name"
                   {["_artist_id"] (Table awards :fields "title")})})"#,
        ))
        .unwrap();

        assert_eq!(grouped.relationships.one.len(), 1);
        assert!(grouped.relationships.one[0]
            .target
            .relationships
            .many
            .is_empty());

        let many = &grouped.relationships.many;
        assert_eq!(many.len(), 1);
        assert_eq!(many[0].target.name, "awards");
        assert_eq!(many[0].source.table, "artist");
        assert_eq!(many[0].path.keys(), ["artist_id", "_artist_id"]);
    }

    #[test]
    fn analysis_is_idempotent() {
        let parsed = parse(
            r#"(Table a :fields "f"
                 {["b_id"] (Table b :fields
                   {["c_id"] (Table c :fields "x")}
                   {["_b_id"] (Table d :fields "y")})}
                 {["_a_id"] (Table e :fields "z"
                   {["f_id"] (Table f :fields "w")})})"#,
        );

        let once = analyze(&parsed).unwrap();
        let twice = analyze(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn repeated_join_table_is_rejected() {
        // Two single-valued joins against the same target table.
        let err = analyze(&parse(
            r#"(Table a :fields
                 {["b1_id"] (Table b :fields "x")}
                 {["b2_id"] (Table b :fields "y")})"#,
        ))
        .unwrap_err();

        assert!(err.is_repeated_join_table());
        assert!(err.to_string().contains("`b`"));
        assert!(err.to_string().contains("`a`"));
    }

    #[test]
    fn repeated_table_via_promotion_is_rejected() {
        let err = analyze(&parse(
            r#"(Table a :fields
                 {["b_id"] (Table b :fields
                   {["c_id"] (Table c :fields "x")})}
                 {["d_id"] (Table c :fields "y")})"#,
        ))
        .unwrap_err();

        assert!(err.is_repeated_join_table());
    }

    #[test]
    fn mismatched_namespace_is_rejected() {
        let mut table = TableSpec::new("a", None);
        let rel = RelSpec::new(
            RelSource {
                table: "a".to_string(),
                id: "a_id".to_string(),
            },
            QualifiedColumn::new("elsewhere", "b_id"),
            TableSpec::new("b", None),
        );
        table.rels.push(rel);

        assert!(analyze(&table).unwrap_err().is_invalid_spec());
    }
}
