/// Why a model response could not become a delta (or a look).
///
/// Never surfaced to the end user as a hard error: callers recover with an
/// empty delta, the keyword fallback, or the fallback look.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("model call timed out")]
    Timeout,
    #[error("model call failed: {0}")]
    Transport(String),
    #[error("model returned empty content")]
    EmptyContent,
    #[error("model response is not valid JSON: {0}")]
    NotJson(String),
    #[error("model response is not a single JSON object")]
    NotObject,
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ParseFailure {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParseFailure::Timeout => "timeout",
            ParseFailure::Transport(_) => "transport",
            ParseFailure::EmptyContent => "empty_content",
            ParseFailure::NotJson(_) => "not_json",
            ParseFailure::NotObject => "not_object",
            ParseFailure::UnknownField(_) => "unknown_field",
            ParseFailure::InvalidValue { .. } => "invalid_value",
        }
    }

    /// Transport-level failures may succeed on another attempt; content failures
    /// are retried only where the caller opts in.
    pub fn is_transport(&self) -> bool {
        matches!(self, ParseFailure::Timeout | ParseFailure::Transport(_))
    }
}
