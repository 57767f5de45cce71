use super::TableSpec;
use crate::stmt::Path;
use crate::{Error, Result};

use std::fmt;

/// Whether the source or the target table holds the foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelKind {
    /// The source table holds a foreign key to the target: at most one
    /// target row per source row.
    One,

    /// The join column lives in the target table pointing back at the
    /// source: any number of target rows per source row.
    Many,
}

/// The source side of a relationship: the table the relationship is declared
/// on, and its primary-key column.
///
/// Kept by name rather than by reference so promoted relationships stay
/// self-describing after they are lifted out of their original nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelSource {
    pub table: String,
    pub id: String,
}

/// A column qualified by the table it lives in, written `table/column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedColumn {
    pub table: String,
    pub column: String,
}

impl QualifiedColumn {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Parses a `table/column` string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((table, column)) if !table.is_empty() && !column.is_empty() => {
                Ok(Self::new(table, column))
            }
            _ => Err(Error::invalid_spec(format!(
                "expected a `table/column` qualified column, got `{s}`"
            ))),
        }
    }
}

impl fmt::Display for QualifiedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.table, self.column)
    }
}

/// A relationship to another table.
///
/// Before analysis `kind` is unset and `path` empty; analysis classifies the
/// relationship, computes its output path, and may lift it into an enclosing
/// query group.
#[derive(Debug, Clone, PartialEq)]
pub struct RelSpec {
    /// The table this relationship is declared on.
    pub source: RelSource,

    /// The join column. For single-valued relationships its namespace is the
    /// source table; for many-valued ones it is the target table, which holds
    /// the foreign key pointing back.
    pub column: QualifiedColumn,

    /// The related table's spec.
    pub target: TableSpec,

    /// Output key override.
    pub alias: Option<String>,

    /// Merge the target's fields directly into the parent record.
    pub flatten: bool,

    /// Assigned by analysis.
    pub kind: Option<RelKind>,

    /// Output location relative to the query group's root. Empty means merge
    /// into the parent (flatten).
    pub path: Path,
}

impl RelSpec {
    pub fn new(source: RelSource, column: QualifiedColumn, target: TableSpec) -> Self {
        Self {
            source,
            column,
            target,
            alias: None,
            flatten: false,
            kind: None,
            path: Path::root(),
        }
    }

    pub fn is_one(&self) -> bool {
        self.kind == Some(RelKind::One)
    }

    pub fn is_many(&self) -> bool {
        self.kind == Some(RelKind::Many)
    }

    /// The conventional slot a many-valued relationship's child rows are
    /// attached under, unique within a query group.
    pub fn slot(&self) -> String {
        self.column.to_string()
    }

    /// A short description for diagnostics.
    pub fn describe(&self) -> String {
        format!("{} -> {} via {}", self.source.table, self.target.name, self.column)
    }
}
