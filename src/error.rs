#[derive(Debug, thiserror::Error)]
pub enum CardinalityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Non-success response from the server, rendered as `"type\r\nmessage"`.
    #[error("{error_type}\r\n{message}")]
    Api { error_type: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CardinalityError {
    /// Short kind name used as the prefix of surfaced error strings.
    pub fn name(&self) -> &'static str {
        match self {
            CardinalityError::Http(_) => "HttpError",
            CardinalityError::Json(_) => "SyntaxError",
            CardinalityError::Url(_) => "UrlError",
            CardinalityError::Api { .. } => "Error",
            CardinalityError::InvalidArgument(_) => "InvalidArgument",
        }
    }

    /// The `"Name: message"` form published to the caller's error state.
    pub fn surface(&self) -> String {
        format!("{}: {}", self.name(), self)
    }
}

pub type Result<T> = std::result::Result<T, CardinalityError>;
