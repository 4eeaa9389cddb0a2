use thiserror::Error;

/// Errors surfaced by the gallery.
///
/// Load errors travel inside messages, so the type is `Clone` and carries
/// rendered strings rather than source errors.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Reading a file from the gallery folder failed.
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    /// A file was read but could not be decoded as an image.
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    /// The visual configuration is unusable (programming error, fail fast).
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn io(path: &std::path::Path, source: &std::io::Error) -> Self {
        Error::Io {
            path: path.display().to_string(),
            reason: source.to_string(),
        }
    }

    pub fn decode(path: &std::path::Path, source: &image::ImageError) -> Self {
        Error::Decode {
            path: path.display().to_string(),
            reason: source.to_string(),
        }
    }
}
