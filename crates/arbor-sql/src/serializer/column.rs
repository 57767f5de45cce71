use super::{Formatter, Ident, Params, ToSql};
use crate::stmt::Column;

/// Demarcates the table/column boundary in generated aliases. Chosen to be
/// extremely unlikely to appear in user column names.
const SEPARATOR: &str = "_sqlfield_";

/// The deterministic alias under which `table.column` is selected.
pub fn alias_column(table: &str, column: &str) -> String {
    format!("{table}{SEPARATOR}{column}")
}

/// Splits an alias back into its `(table, column)` pair.
pub fn parse_alias(alias: &str) -> Option<(&str, &str)> {
    alias.split_once(SEPARATOR)
}

/// Renders a SELECT-list item: the qualified column plus its alias.
pub(super) struct ColumnAlias<'a>(pub(super) &'a Column);

impl ToSql for ColumnAlias<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let Column { table, column } = self.0;
        fmt!(f, self.0, " AS ", Ident(alias_column(table, column)));
    }
}
