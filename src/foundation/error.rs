/// Convenience result type used across storyreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Narration duration or story identity cannot be determined from the event.
    #[error("missing required input: {0}")]
    MissingRequiredInput(String),

    /// Structural timing contract violated (content interval is empty or negative).
    #[error("invalid timeline: {0}")]
    InvalidTimeline(String),

    /// Internal consistency check failed while translating a timeline into a render job.
    #[error("render job build error: {0}")]
    RenderJobBuild(String),

    /// An external collaborator (converter, renderer, object store) failed.
    #[error("upstream collaborator error: {0}")]
    UpstreamCollaborator(String),

    /// Invalid engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::MissingRequiredInput`] value.
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingRequiredInput(msg.into())
    }

    /// Build a [`ReelError::InvalidTimeline`] value.
    pub fn invalid_timeline(msg: impl Into<String>) -> Self {
        Self::InvalidTimeline(msg.into())
    }

    /// Build a [`ReelError::RenderJobBuild`] value.
    pub fn render_job(msg: impl Into<String>) -> Self {
        Self::RenderJobBuild(msg.into())
    }

    /// Build a [`ReelError::UpstreamCollaborator`] value.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamCollaborator(msg.into())
    }

    /// Build a [`ReelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the pipeline may degrade gracefully instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UpstreamCollaborator(_))
    }
}

impl From<serde_json::Error> for ReelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
