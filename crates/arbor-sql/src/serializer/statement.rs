use super::{ColumnAlias, Comma, Formatter, Ident, Params, ToSql};
use crate::stmt::{Join, Select};

impl ToSql for &Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(
            f,
            "SELECT ",
            Comma(self.columns.iter().map(ColumnAlias)),
            " FROM ",
            Ident(&self.from),
        );

        for join in &self.joins {
            fmt!(f, join);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }
    }
}

impl ToSql for &Join {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(
            f,
            " LEFT JOIN ",
            Ident(&self.target),
            " ON ",
            &self.left,
            " = ",
            &self.right,
        );
    }
}
