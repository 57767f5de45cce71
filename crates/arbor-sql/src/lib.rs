pub mod stmt;
pub use stmt::{Column, Expr, Join, Select};

mod serializer;
pub use serializer::{
    alias_column, format_datetime, parse_alias, Params, Placeholder, Serializer,
};
