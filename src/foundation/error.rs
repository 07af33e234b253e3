/// Result alias used across the crate.
pub type HaloResult<T> = Result<T, HaloError>;

#[derive(thiserror::Error, Debug)]
pub enum HaloError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("upload rejected: {0}")]
    Upload(#[from] UploadError),

    #[error("crop failed: {0}")]
    Crop(String),

    #[error("face detection error: {0}")]
    FaceDetection(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HaloError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn crop(msg: impl Into<String>) -> Self {
        Self::Crop(msg.into())
    }

    pub fn face_detection(msg: impl Into<String>) -> Self {
        Self::FaceDetection(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Rejection reasons for a user-supplied file, reported before any decoding happens.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("unsupported file type '{mime}' (expected PNG, JPEG or WEBP)")]
    UnsupportedType { mime: String },

    #[error("file is {size_bytes} bytes, larger than the {max_mb} MB limit")]
    TooLarge { size_bytes: u64, max_mb: u64 },
}

impl UploadError {
    /// Machine-readable reason, stable for message lookup by the caller.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "unsupported-type",
            Self::TooLarge { .. } => "too-large",
        }
    }

    /// Size ceiling to interpolate into a "too large" message.
    pub fn max_size_mb(&self) -> Option<u64> {
        match self {
            Self::TooLarge { max_mb, .. } => Some(*max_mb),
            Self::UnsupportedType { .. } => None,
        }
    }
}
