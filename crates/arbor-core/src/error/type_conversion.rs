use super::Error;

/// Error when a value cannot be converted to the requested type.
#[derive(Debug)]
pub(super) struct TypeConversion {
    from: Box<str>,
    to: Box<str>,
}

impl std::error::Error for TypeConversion {}

impl core::fmt::Display for TypeConversion {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot convert {} to {}", self.from, self.to)
    }
}

impl Error {
    /// Creates a type conversion error.
    pub fn type_conversion(from: impl Into<String>, to: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TypeConversion(TypeConversion {
            from: from.into().into(),
            to: to.into().into(),
        }))
    }

    /// Returns `true` if this error is a type conversion error.
    pub fn is_type_conversion(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeConversion(_))
    }
}
