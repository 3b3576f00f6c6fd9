/// Failures of a model call. An empty but well-formed reply is not an error.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Model API returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Request blocked by content policy ({reason})")]
    Blocked { reason: String },
    #[error("Model returned no candidates")]
    NoCandidate,
    #[error("Invalid response from model API: {0}")]
    InvalidResponse(String),
    #[error("API key not found; set {env_var} or GOOGLE_API_KEY")]
    MissingApiKey { env_var: String },
}

impl AdapterError {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Http { .. } => "http",
            Self::Blocked { .. } => "blocked",
            Self::NoCandidate => "no_candidate",
            Self::InvalidResponse(_) => "invalid_response",
            Self::MissingApiKey { .. } => "missing_api_key",
        }
    }
}
