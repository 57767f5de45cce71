#[macro_use]
mod fmt;
use fmt::ToSql;

mod column;
pub use column::{alias_column, parse_alias};
use column::ColumnAlias;

mod delim;
use delim::Comma;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

mod value;
pub use value::format_datetime;

// Fragment serializers
mod expr;
mod statement;

use crate::stmt::Select;

/// Serializes a statement to a SQL string.
///
/// Targets MySQL: backtick-quoted identifiers and `?` placeholders. Every
/// value rides in `params`; nothing is inlined into the statement text.
#[derive(Debug)]
pub struct Serializer {
    _private: (),
}

struct Formatter<'a, T> {
    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    pub fn mysql() -> Self {
        Self { _private: () }
    }

    pub fn serialize(&self, stmt: &Select, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }
}
