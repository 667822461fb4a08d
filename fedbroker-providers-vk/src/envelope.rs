use fedbroker_core::RawProfile;
use serde::Deserialize;

/// Body of a `users.get` answer.
///
/// Successful calls wrap the requested users in `response`; failed ones
/// carry an `error` object instead.
#[derive(Debug, Deserialize)]
pub(crate) struct UsersGetEnvelope {
    #[serde(default)]
    response: Option<Vec<RawProfile>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_msg: Option<String>,
}

impl UsersGetEnvelope {
    /// The first profile of the envelope, or a description of why there is none.
    pub(crate) fn into_first_profile(self) -> Result<RawProfile, String> {
        match (self.response, self.error) {
            (Some(profiles), error) => profiles.into_iter().next().ok_or_else(|| match error {
                Some(error) => error.to_string(),
                None => "`response` is empty".to_string(),
            }),
            (None, Some(error)) => Err(error.to_string()),
            (None, None) => Err("envelope has no `response`".to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = self.error_msg.as_deref().unwrap_or("unknown error");
        match self.error_code {
            Some(code) => write!(f, "API error {}: {}", code, message),
            None => write!(f, "API error: {}", message),
        }
    }
}
