use super::Column;

use arbor_core::stmt::Value;

/// A WHERE-clause expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `column IN (?, ?, …)`
    InList { column: Column, values: Vec<Value> },

    /// `column > ?`
    Gt { column: Column, value: Value },

    /// `(a OR b OR …)`
    Or(Vec<Expr>),
}

impl Expr {
    pub fn in_list(column: Column, values: Vec<Value>) -> Expr {
        Expr::InList { column, values }
    }

    pub fn gt(column: Column, value: impl Into<Value>) -> Expr {
        Expr::Gt {
            column,
            value: value.into(),
        }
    }

    /// A disjunction, collapsing the single-operand case.
    pub fn or(mut operands: Vec<Expr>) -> Expr {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::Or(operands)
        }
    }
}
