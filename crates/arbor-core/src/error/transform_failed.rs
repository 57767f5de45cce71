use super::Error;

/// Error when a field transform raises during row assembly.
///
/// Carries the source column the transform was applied to. The underlying
/// failure rides along as the error's cause.
#[derive(Debug)]
pub(super) struct TransformFailed {
    column: Box<str>,
}

impl std::error::Error for TransformFailed {}

impl core::fmt::Display for TransformFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "transform failed: column `{}`", self.column)
    }
}

impl Error {
    /// Creates a transform failed error for the given source column.
    pub fn transform_failed(column: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TransformFailed(TransformFailed {
            column: column.into().into(),
        }))
    }

    /// Returns `true` if this error is a transform failure.
    pub fn is_transform_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TransformFailed(_))
    }
}
