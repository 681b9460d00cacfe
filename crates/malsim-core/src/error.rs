use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),

    #[error("unknown propagation state: {0}")]
    UnknownState(String),

    #[error("malformed event line: {0}")]
    MalformedEvent(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
