/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by layout, pagination and drawing.
///
/// Running out of content is not an error: it is reported through boolean
/// returns and [`crate::Step::is_end`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Unknown placement name or a theme without a required capability.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The content produced no page at construction time.
    #[error("no pages drawn")]
    NoPages,

    #[error("wrap error: {0}")]
    Wrap(String),

    #[error("decorator error: {0}")]
    Decorator(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn wrap(msg: impl Into<String>) -> Self {
        Self::Wrap(msg.into())
    }

    pub fn decorator(msg: impl Into<String>) -> Self {
        Self::Decorator(msg.into())
    }

    /// Returns `true` for errors that stem from configuration rather than content.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
