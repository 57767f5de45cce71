use super::Error;

/// Error when a database driver operation fails.
///
/// Wraps the connection layer's native error. Arbor never retries; the error
/// surfaces at the point the record stream is consumed.
pub(super) struct DriverOperationFailed {
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl std::error::Error for DriverOperationFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl core::fmt::Debug for DriverOperationFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("DriverOperationFailed")
            .field("source", &self.source)
            .finish()
    }
}

impl core::fmt::Display for DriverOperationFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "driver operation failed: {}", self.source)
    }
}

impl Error {
    /// Creates a driver operation failed error from the driver's native
    /// error.
    pub fn driver_operation_failed(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::from(super::ErrorKind::DriverOperationFailed(
            DriverOperationFailed {
                source: Box::new(source),
            },
        ))
    }

    /// Returns `true` if this error is a driver operation failure.
    pub fn is_driver_operation_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DriverOperationFailed(_))
    }
}
