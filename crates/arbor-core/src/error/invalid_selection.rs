use super::Error;

/// Error when extraction selection options are contradictory.
///
/// For example, an `update_table` selection carrying a `date` but no
/// `updated` column: there is no column to compare the date against, so the
/// combination is rejected rather than guessed at.
#[derive(Debug)]
pub(super) struct InvalidSelection {
    message: Box<str>,
}

impl std::error::Error for InvalidSelection {}

impl core::fmt::Display for InvalidSelection {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid selection: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid selection error.
    pub fn invalid_selection(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSelection(InvalidSelection {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid selection error.
    pub fn is_invalid_selection(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidSelection(_))
    }
}
