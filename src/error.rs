pub type OutfitterResult<T> = Result<T, OutfitterError>;

#[derive(thiserror::Error, Debug)]
pub enum OutfitterError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("payload error: {0}")]
    Payload(String),

    #[error("paint error: {0}")]
    Paint(String),

    #[error("export error: {0}")]
    Export(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OutfitterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    pub fn paint(msg: impl Into<String>) -> Self {
        Self::Paint(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}
