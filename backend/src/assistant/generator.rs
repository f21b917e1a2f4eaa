use async_trait::async_trait;

/// Failure to obtain an answer from the text generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Answer generation is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Generator returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Generator returned an empty answer")]
    EmptyAnswer,

    #[error("Malformed generator response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::NotConfigured => "ASSISTANT_NOT_CONFIGURED",
            GenerationError::Network(_) => "ASSISTANT_UNREACHABLE",
            GenerationError::Upstream { .. } => "ASSISTANT_UPSTREAM_ERROR",
            GenerationError::EmptyAnswer => "ASSISTANT_EMPTY_ANSWER",
            GenerationError::MalformedResponse(_) => "ASSISTANT_MALFORMED_RESPONSE",
        }
    }
}

/// Turns a prompt into a natural-language answer.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn answer(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Used when no API key is configured; every call fails with `NotConfigured`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl AnswerGenerator for DisabledGenerator {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn answer(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}
