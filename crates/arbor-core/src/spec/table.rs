use super::{FieldSpec, RelSpec};

/// A table in the extraction spec.
///
/// Before analysis, relationship children ride in `rels` alongside the leaf
/// `fields`. Analysis drains `rels` and populates `relationships` with the
/// classified, promoted form.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    /// Database table name.
    pub name: String,

    /// Primary-key column name.
    pub id: String,

    /// True when no `:id` was given and `id` was defaulted to `<name>_id`.
    pub id_generated: bool,

    /// Leaf fields.
    pub fields: Vec<FieldSpec>,

    /// Relationship children, as parsed. Empty after analysis.
    pub rels: Vec<RelSpec>,

    /// Classified relationships. Populated by analysis.
    pub relationships: Relationships,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relationships {
    pub one: Vec<RelSpec>,
    pub many: Vec<RelSpec>,
}

impl TableSpec {
    /// Creates a table spec, defaulting the primary key to `<name>_id` when
    /// no `:id` is given.
    pub fn new(name: impl Into<String>, id: Option<String>) -> Self {
        let name = name.into();
        let (id, id_generated) = match id {
            Some(id) => (id, false),
            None => (format!("{name}_id"), true),
        };

        Self {
            name,
            id,
            id_generated,
            fields: Vec::new(),
            rels: Vec::new(),
            relationships: Relationships::default(),
        }
    }

    /// The columns this table contributes to a SELECT: the union of its
    /// fields and its primary key.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.fields.iter().map(|f| f.column.as_str()).collect();
        if !columns.contains(&self.id.as_str()) {
            columns.push(&self.id);
        }
        columns
    }
}
