use super::Error;

/// Error when the join-ordering fixed point fails to make progress.
///
/// The planner emits LEFT JOINs in an order where every join's left-side
/// table is already present in the FROM clause. If the queue rotates fully
/// without placing a join, the single-valued graph is cyclic or disconnected
/// from the root. Analysis normally prevents this; hitting it indicates a
/// hand-built spec that bypassed analysis.
#[derive(Debug)]
pub(super) struct UnorderableJoins {
    remaining: Vec<String>,
}

impl std::error::Error for UnorderableJoins {}

impl core::fmt::Display for UnorderableJoins {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unorderable joins: ")?;
        for (i, rel) in self.remaining.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(rel)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates an unorderable joins error.
    ///
    /// `remaining` describes the relationships that could not be placed.
    pub fn unorderable_joins(remaining: Vec<String>) -> Error {
        Error::from(super::ErrorKind::UnorderableJoins(UnorderableJoins {
            remaining,
        }))
    }

    /// Returns `true` if this error is an unorderable joins error.
    pub fn is_unorderable_joins(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnorderableJoins(_))
    }
}
