//! Errors of the native-messaging transport.

/// Framing failures on the stdio channel.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Reading or writing the channel failed.
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),

    /// A frame exceeded its size limit.
    #[error("FRAME_TOO_LARGE: {len} bytes exceeds the {limit} byte limit")]
    TooLarge { len: usize, limit: usize },

    /// The stream ended in the middle of a frame body.
    #[error("TRUNCATED_FRAME: expected {expected} bytes")]
    Truncated { expected: usize },

    /// A message could not be encoded.
    #[error("ENCODE_FAILED: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FrameError::TooLarge { len: 2_000_000, limit: 1_048_576 };
        assert!(err.to_string().contains("FRAME_TOO_LARGE"));
        assert!(err.to_string().contains("1048576"));
    }
}
