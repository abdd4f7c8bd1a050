use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("project not found at index {0}")]
    ProjectNotFound(usize),

    #[error("image {image} not found on project {project}")]
    ImageNotFound { project: usize, image: usize },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field} '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot {action} while {pane}")]
    InvalidTransition { action: &'static str, pane: String },

    #[error("image decode failed: {0}")]
    ImageDecode(String),

    #[error("unsupported image '{path}': {reason}")]
    UnsupportedImage { path: String, reason: String },

    #[error("user data directory not found: set TRACKER_DATA_DIR or pass --data-dir")]
    DataDirNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Image(#[from] ::image::ImageError),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
