use crate::{PixelFormat, ResourceId};

pub type Result<T, E = ResourceError> = std::result::Result<T, E>;

/// Everything that can go wrong between asking for an id and holding a decoded resource.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("read of {requested} bytes at offset {offset} overruns buffer ({remaining} remaining)")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        remaining: usize,
    },

    #[error("{remaining} trailing bytes after end of record")]
    TrailingData { remaining: usize },

    #[error("texture payload is {actual} bytes, header dimensions need {expected}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("pixel format mismatch: destination is {dst:?}, source is {src:?}")]
    FormatMismatch { dst: PixelFormat, src: PixelFormat },

    #[error("{width}x{height} window at ({x}, {y}) exceeds {dst_width}x{dst_height} destination")]
    OutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        dst_width: u32,
        dst_height: u32,
    },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0} decoding not yet implemented")]
    NotImplemented(&'static str),

    #[error("assertion on `{field}` failed at offset {offset}: {detail}")]
    AssertionViolation {
        field: &'static str,
        offset: usize,
        detail: String,
    },

    #[error("resource {0} not found in any blob store")]
    NotFound(ResourceId),

    #[error("blob store {store} failed to read {id}: {source}")]
    Io {
        store: String,
        id: ResourceId,
        #[source]
        source: std::io::Error,
    },
}

impl ResourceError {
    pub(crate) fn assertion(
        field: &'static str,
        offset: usize,
        detail: impl Into<String>,
    ) -> Self {
        ResourceError::AssertionViolation {
            field,
            offset,
            detail: detail.into(),
        }
    }
}
