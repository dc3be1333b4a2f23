#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{file} is not an image (declared type '{media_type}')")]
    InvalidMediaType { file: String, media_type: String },

    #[error("{file} is too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { file: String, size: u64, limit: u64 },

    #[error("Unknown measurement point: {0}")]
    UnknownMeasurementPoint(String),

    #[error("No generated model available for download")]
    NoArtifact,

    #[error("Invalid model payload: {0}")]
    InvalidArtifact(String),
}

impl CoreError {
    /// Short user-facing reason for a rejected upload.
    pub fn rejection_reason(&self) -> &'static str {
        match self {
            CoreError::InvalidMediaType { .. } => "Please choose an image file.",
            CoreError::FileTooLarge { .. } => "Image is larger than 10 MB.",
            _ => "Upload rejected.",
        }
    }
}
