#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API request failed (status {status})")]
    Api { status: reqwest::StatusCode },

    #[error("Gemini API key is not configured")]
    MissingCredential,

    #[error("slide generation was blocked by the model's safety filters; adjust the topic or document")]
    SafetyBlocked,

    #[error("the model returned an empty response; try rephrasing the topic or using a different file")]
    EmptyResponse,

    #[error("the model returned data in an invalid format; try again: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("the model response does not contain a slides list")]
    UnexpectedStructure,
}

pub type Result<T> = std::result::Result<T, GenAiError>;
