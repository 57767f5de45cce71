//! The SQL statement model.
//!
//! The planner builds these values; the serializer renders them to MySQL
//! text with `?` placeholders. Only the shapes this system emits are modeled:
//! SELECT with LEFT JOINs and a WHERE filter of IN-lists, comparisons, and
//! disjunctions.

mod column;
pub use column::Column;

mod expr;
pub use expr::Expr;

mod join;
pub use join::Join;

mod select;
pub use select::Select;
