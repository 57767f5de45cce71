use crate::stmt::Path;
use crate::transform::Transform;

/// A leaf field: one source column and where its value lands in the output
/// record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Source column name.
    pub column: String,

    /// Output key override. A dot in the alias means a nested output path
    /// (`"a.b"` writes under `{a: {b: …}}`).
    pub alias: Option<String>,

    /// Transform applied to the raw column value before output. A transform
    /// returning null omits the key entirely.
    pub transform: Option<Transform>,

    /// Unrecognized boolean options, preserved verbatim.
    pub flags: Vec<String>,

    /// Unrecognized valued options, preserved verbatim.
    pub options: Vec<(String, String)>,
}

impl FieldSpec {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            alias: None,
            transform: None,
            flags: Vec::new(),
            options: Vec::new(),
        }
    }

    /// The output location: the dotted alias split into steps, or the bare
    /// column name.
    pub fn path(&self) -> Path {
        match &self.alias {
            Some(alias) => Path::dotted(alias),
            None => Path::key(&self.column),
        }
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f == name)
    }
}
