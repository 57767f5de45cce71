//! Values, records, and output paths.
//!
//! A [`Value`] is a raw column value as delivered by the driver or produced
//! by a transform. A [`Record`] is a nested, insertion-ordered map of output
//! keys to values; extraction results are records. A [`Path`] locates where
//! inside a record a field or relationship writes its data.

mod path;
pub use path::Path;

mod record;
pub use record::Record;

mod row_stream;
pub use row_stream::RowStream;

mod value;
pub use value::Value;
