use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that abort a single polling cycle.
///
/// Neither variant is fatal to the process; the next cycle starts fresh.
/// Failed posts are not errors at this level, see `Dispatcher`.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A collaborator (feed, schedule, linescore) could not be reached.
    #[error("fetch failed during {stage}: {source}")]
    Fetch {
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Response did not parse, or matched neither feed shape.
    #[error("malformed feed response: {0}")]
    Malformed(String),
}

impl TrackerError {
    pub fn fetch(stage: &'static str, source: anyhow::Error) -> Self {
        TrackerError::Fetch { stage, source }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Malformed(err.to_string())
    }
}
