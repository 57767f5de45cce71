use super::{Formatter, Params, ToSql};

/// Comma-delimits the items of an iterator.
pub(super) struct Comma<I>(pub(super) I);

impl<I> ToSql for Comma<I>
where
    I: IntoIterator,
    I::Item: ToSql,
{
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let mut first = true;
        for item in self.0 {
            if !first {
                f.dst.push_str(", ");
            }
            item.to_sql(f);
            first = false;
        }
    }
}
