use std::error::Error as StdError;
use std::fmt;

/// Boxed cause carried by wrapped transport and parse failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that terminate a federation attempt.
#[derive(Debug, thiserror::Error)]
pub enum FederationError {
    /// The token endpoint response did not carry the configured token parameter.
    #[error("No access token available in OAuth server response (missing `{parameter}`)")]
    MissingToken {
        /// Name of the parameter that was looked up.
        parameter: String,
    },
    /// The user profile could not be fetched or its envelope was malformed.
    #[error("Could not obtain user profile from {provider}: {message}")]
    ProfileFetchFailed {
        /// Provider the profile was requested from.
        provider: String,
        /// Human readable description of what went wrong.
        message: String,
        /// Underlying transport or parse error, if any.
        #[source]
        source: Option<BoxError>,
    },
    /// The profile was fetched but lacks mandatory data.
    #[error("Invalid profile from {provider}: {message}")]
    InvalidProfile {
        /// Provider that returned the profile.
        provider: String,
        /// What is missing or wrong.
        message: String,
    },
    /// No federation flow is registered under the given alias.
    #[error("Unknown identity provider: {0}")]
    UnknownProvider(String),
}

/// Category of a [`FederationError`] or of a non-fatal [`EncodingFixupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FederationErrorKind {
    /// See [`FederationError::MissingToken`].
    MissingToken,
    /// See [`FederationError::ProfileFetchFailed`].
    ProfileFetchFailed,
    /// See [`FederationError::InvalidProfile`].
    InvalidProfile,
    /// See [`FederationError::UnknownProvider`].
    UnknownProvider,
    /// See [`EncodingFixupError`]. Never returned from a federation attempt.
    EncodingFixupFailed,
}

impl FederationError {
    /// Shorthand for a [`FederationError::ProfileFetchFailed`] without an underlying cause.
    pub fn profile_fetch(provider: impl Into<String>, message: impl Into<String>) -> Self {
        FederationError::ProfileFetchFailed {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a transport or parse error as [`FederationError::ProfileFetchFailed`].
    pub fn profile_fetch_caused_by<E>(
        provider: impl Into<String>,
        message: impl Into<String>,
        source: E,
    ) -> Self
    where
        E: Into<BoxError>,
    {
        FederationError::ProfileFetchFailed {
            provider: provider.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Shorthand for a [`FederationError::InvalidProfile`].
    pub fn invalid_profile(provider: impl Into<String>, message: impl Into<String>) -> Self {
        FederationError::InvalidProfile {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> FederationErrorKind {
        match self {
            FederationError::MissingToken { .. } => FederationErrorKind::MissingToken,
            FederationError::ProfileFetchFailed { .. } => FederationErrorKind::ProfileFetchFailed,
            FederationError::InvalidProfile { .. } => FederationErrorKind::InvalidProfile,
            FederationError::UnknownProvider(_) => FederationErrorKind::UnknownProvider,
        }
    }
}

/// A string could not be re-decoded as UTF-8.
///
/// Only ever logged; the caller keeps the original value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingFixupError {
    /// The value that could not be repaired.
    pub value: String,
    /// Byte offset up to which the re-interpreted bytes were valid UTF-8.
    pub valid_up_to: usize,
}

impl EncodingFixupError {
    /// Always [`FederationErrorKind::EncodingFixupFailed`].
    pub fn kind(&self) -> FederationErrorKind {
        FederationErrorKind::EncodingFixupFailed
    }
}

impl fmt::Display for EncodingFixupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to decode {:?} as UTF-8 (valid up to byte {})",
            self.value, self.valid_up_to
        )
    }
}

impl StdError for EncodingFixupError {}
