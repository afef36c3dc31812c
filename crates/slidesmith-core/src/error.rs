use slidesmith_genai::GenAiError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("provide a topic or a document before generating")]
    EmptyInput,

    #[error("the uploaded document could not be processed: {0}")]
    Document(String),

    #[error(transparent)]
    GenAi(#[from] GenAiError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
