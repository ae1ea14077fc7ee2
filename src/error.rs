use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure that is reported back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The data directory or `config.json` is missing or invalid.
    Config,
    /// A store could not be read or written.
    Store,
    /// The request was rejected before anything was written.
    Validation,
    /// An invoice or chart could not be rendered.
    Render,
}

serde_plain::derive_display_from_serialize!(ErrorType);

/// An error that has been categorized for the user. The underlying error chain is folded into
/// the message.
pub struct PubError {
    error_type: ErrorType,
    source: Error,
}

impl PubError {
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for PubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PubError({:?}, {:?})", self.error_type, self.source)
    }
}

impl Display for PubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.source)
    }
}

impl std::error::Error for PubError {}

/// Tags the error of a `Result` with an `ErrorType` on its way out of a command handler.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            Error::new(PubError {
                error_type,
                source: e.into(),
            })
        })
    }
}

/// A validation error carrying `message`, for requests rejected before anything is written.
pub(crate) fn invalid(message: impl Into<String>) -> Error {
    Error::new(PubError {
        error_type: ErrorType::Validation,
        source: anyhow::anyhow!(message.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pub_result_keeps_the_chain() {
        let result: Result<()> = Err(anyhow::anyhow!("disk full")).context("Unable to save");
        let err = result.pub_result(ErrorType::Store).unwrap_err();
        assert_eq!(err.to_string(), "store error: Unable to save: disk full");
        let pub_error = err.downcast_ref::<PubError>().unwrap();
        assert_eq!(pub_error.error_type(), ErrorType::Store);
    }

    #[test]
    fn test_invalid() {
        let err = invalid("No vehicle with plate 'XYZ'");
        assert_eq!(
            err.to_string(),
            "validation error: No vehicle with plate 'XYZ'"
        );
        assert_eq!(
            err.downcast_ref::<PubError>().unwrap().error_type(),
            ErrorType::Validation
        );
    }
}
