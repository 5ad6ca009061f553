//! Error types for the fusion pipeline.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a frame pair a keypoint index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSide {
    Prev,
    Curr,
}

impl std::fmt::Display for FrameSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameSide::Prev => write!(f, "previous"),
            FrameSide::Curr => write!(f, "current"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A match references a keypoint that does not exist in its frame.
    #[error("keypoint index {index} out of range for {side} frame with {len} keypoints")]
    KeypointIndexOutOfRange {
        side: FrameSide,
        index: usize,
        len: usize,
    },

    /// A box correspondence names an id missing from the frame.
    #[error("bounding box {box_id} not found in {side} frame")]
    UnknownBoxId { side: FrameSide, box_id: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
