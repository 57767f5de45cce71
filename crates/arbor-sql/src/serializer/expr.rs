use super::{Formatter, Ident, Params, ToSql};
use crate::stmt::{Column, Expr};

impl ToSql for &Column {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.table), ".", Ident(&self.column));
    }
}

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Expr::InList { column, values } => {
                if values.is_empty() {
                    // An empty IN list matches nothing.
                    fmt!(f, "1 = 0");
                    return;
                }

                fmt!(f, column, " IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        fmt!(f, ", ");
                    }
                    let placeholder = f.params.push(value);
                    fmt!(f, placeholder);
                }
                fmt!(f, ")");
            }
            Expr::Gt { column, value } => {
                fmt!(f, column, " > ");
                let placeholder = f.params.push(value);
                fmt!(f, placeholder);
            }
            Expr::Or(operands) => {
                fmt!(f, "(");
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        fmt!(f, " OR ");
                    }
                    fmt!(f, operand);
                }
                fmt!(f, ")");
            }
        }
    }
}
