mod driver_operation_failed;
mod invalid_selection;
mod invalid_spec;
mod repeated_join_table;
mod transform_failed;
mod type_conversion;
mod unorderable_joins;

use driver_operation_failed::DriverOperationFailed;
use invalid_selection::InvalidSelection;
use invalid_spec::InvalidSpec;
use repeated_join_table::RepeatedJoinTable;
use std::sync::Arc;
use transform_failed::TransformFailed;
use type_conversion::TypeConversion;
use unorderable_joins::UnorderableJoins;

/// An error that can occur in Arbor.
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

#[derive(Debug)]
enum ErrorKind {
    DriverOperationFailed(DriverOperationFailed),
    InvalidSelection(InvalidSelection),
    InvalidSpec(InvalidSpec),
    RepeatedJoinTable(RepeatedJoinTable),
    TransformFailed(TransformFailed),
    TypeConversion(TypeConversion),
    UnorderableJoins(UnorderableJoins),
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root
    /// cause.
    pub fn context(self, consequent: Error) -> Error {
        let mut err = consequent;
        let inner = Arc::get_mut(&mut err.inner).unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        inner.cause = Some(self);
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::DriverOperationFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            DriverOperationFailed(err) => core::fmt::Display::fmt(err, f),
            InvalidSelection(err) => core::fmt::Display::fmt(err, f),
            InvalidSpec(err) => core::fmt::Display::fmt(err, f),
            RepeatedJoinTable(err) => core::fmt::Display::fmt(err, f),
            TransformFailed(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            UnorderableJoins(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(ErrorInner { kind, cause: None }),
        }
    }
}
