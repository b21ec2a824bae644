use alloc::boxed::Box;
use alloc::string::String;

use crate::sink::SinkError;

/// Errors from scanline EXR encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExrError {
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("pixel buffer too small: need {needed} samples, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("sink: {0}")]
    Sink(#[from] SinkError),

    #[error("codec: {0}")]
    Codec(#[source] Box<dyn core::error::Error + Send + Sync>),
}

impl ExrError {
    /// Wrap a compression backend error.
    pub fn codec<E>(err: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Codec(Box::new(err))
    }
}
