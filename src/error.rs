use thiserror::Error;

/// Rejections raised when a box is explicitly validated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("Negative box origin: ({x1}, {y1})")]
    NegativeOrigin { x1: f32, y1: f32 },

    #[error("Box has no extent: width={width}, height={height}")]
    EmptyExtent { width: f32, height: f32 },
}

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Fingerprint length mismatch: {left} vs {right} bits")]
    LengthMismatch { left: usize, right: usize },

    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("Cannot hash an empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Resize failed: {0}")]
    Resize(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum BvrError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
