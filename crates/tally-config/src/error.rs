use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tally config: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// A backend URL without a token would silently fall back to the local file.
    #[error("backend url '{url}' is set but backend.auth_token is empty")]
    MissingAuthToken { url: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Figment(Box::new(error))
    }
}
