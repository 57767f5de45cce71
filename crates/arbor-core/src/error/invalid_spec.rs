use super::Error;

/// Error when a declarative spec is structurally invalid.
///
/// This occurs when:
/// - A table form does not start with the `Table` tag and a table name
/// - A relationship map has more than one non-option entry
/// - A relationship value is not a nested `(Table …)` form
/// - An element does not match any of the admissible field/relationship shapes
/// - A transform name does not resolve against the registry
///
/// These errors are caught at compile time, before any SQL is planned.
#[derive(Debug)]
pub(super) struct InvalidSpec {
    message: Box<str>,
}

impl std::error::Error for InvalidSpec {}

impl core::fmt::Display for InvalidSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid spec: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid spec error.
    pub fn invalid_spec(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSpec(InvalidSpec {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid spec error.
    pub fn is_invalid_spec(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidSpec(_))
    }
}
