//! Error types for cue analysis.

use thiserror::Error;

/// Errors surfaced by the analysis engine.
///
/// Both variants fail fast: parameters are checked before any frame is
/// processed, and shapes are checked before any element is compared.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A configuration value or input buffer is outside its valid domain.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Reference and test inputs cannot be compared element-wise.
    #[error("incompatible {what}: reference has {reference}, test has {test}")]
    IncompatibleShape {
        /// The dimension that differs (e.g. "frame count").
        what: &'static str,
        /// Reference-side value, formatted.
        reference: String,
        /// Test-side value, formatted.
        test: String,
    },
}

impl Error {
    /// Create an invalid parameter error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Create an incompatible shape error.
    pub fn incompatible(
        what: &'static str,
        reference: impl ToString,
        test: impl ToString,
    ) -> Self {
        Error::IncompatibleShape {
            what,
            reference: reference.to_string(),
            test: test.to_string(),
        }
    }
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::IncompatibleShape`] unless `reference == test`.
pub(crate) fn ensure_same<T>(what: &'static str, reference: T, test: T) -> Result<()>
where
    T: PartialEq + ToString,
{
    if reference == test {
        Ok(())
    } else {
        Err(Error::incompatible(what, reference, test))
    }
}
