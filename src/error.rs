//! Error types for the SNAC token codec.
//!
//! All codec failures are per-item: a malformed hierarchy or token stream
//! fails that item only. Nothing here is transient, so nothing is retried.

/// Structural problems with a residual code hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// Only 3-level and 4-level hierarchies exist
    #[error("unsupported level count: expected 3 or 4 levels, got {found}")]
    UnsupportedLevelCount { found: usize },

    /// `len(level[i]) != F * 2^i`
    #[error("level {level} has {found} codes, expected {expected}")]
    LevelLengthMismatch {
        level: usize,
        expected: usize,
        found: usize,
    },

    /// Delayed-stream input with the wrong number of streams
    #[error("expected {expected} delayed streams, got {found}")]
    StreamCount { expected: usize, found: usize },

    /// A delayed stream ran out before the last stream did
    #[error("delayed stream {stream} has {found} entries after trimming, expected at least {expected}")]
    StreamTooShort {
        stream: usize,
        expected: usize,
        found: usize,
    },
}

/// Problems with the `#`-delimited token grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("token stream does not contain a '#' frame delimiter")]
    MissingDelimiter,

    /// Only 7 (3 levels) and 15 (4 levels) values per frame are valid
    #[error("unsupported frame width {width}: expected 7 or 15 values per frame")]
    UnsupportedFrameWidth { width: usize },

    #[error("frame {frame}: expected '#' at token {position}, found {found:?}")]
    DelimiterExpected {
        frame: usize,
        position: usize,
        found: String,
    },

    #[error("frame {frame}: token {position} is not an integer code: {token:?}")]
    InvalidValue {
        frame: usize,
        position: usize,
        token: String,
    },

    /// A delimiter showed up where a value belongs, i.e. the frame is short
    #[error("frame {frame}: unexpected '#' at token {position}, frame width does not match")]
    FrameWidthMismatch { frame: usize, position: usize },
}

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Shape,
    Format,
    Truncation,
}

/// Error returned by the flattener and the reconstructor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// The stream ends mid-frame. Partial frames are never padded.
    #[error("truncated stream: frame {frame} has {found} of {expected} tokens")]
    Truncation {
        frame: usize,
        expected: usize,
        found: usize,
    },
}

impl CodecError {
    /// Coarse category for matching without inspecting fields.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Shape(_) => ErrorKind::Shape,
            Self::Format(_) => ErrorKind::Format,
            Self::Truncation { .. } => ErrorKind::Truncation,
        }
    }

    pub(crate) fn truncation(frame: usize, expected: usize, found: usize) -> Self {
        Self::Truncation {
            frame,
            expected,
            found,
        }
    }
}

/// A codec failure tagged with the dataset record it came from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record {record_id}: {source}")]
pub struct RecordError {
    pub record_id: String,
    #[source]
    pub source: CodecError,
}

impl RecordError {
    pub fn new(record_id: impl Into<String>, source: CodecError) -> Self {
        Self {
            record_id: record_id.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        let shape: CodecError = ShapeError::UnsupportedLevelCount { found: 2 }.into();
        assert_eq!(shape.kind(), ErrorKind::Shape);

        let format: CodecError = FormatError::MissingDelimiter.into();
        assert_eq!(format.kind(), ErrorKind::Format);

        assert_eq!(CodecError::truncation(3, 16, 9).kind(), ErrorKind::Truncation);
    }

    #[test]
    fn test_record_error_message_names_record() {
        let err = RecordError::new(
            "identity/42",
            FormatError::UnsupportedFrameWidth { width: 6 }.into(),
        );
        let msg = err.to_string();
        assert!(msg.contains("identity/42"));
        assert!(msg.contains("frame width 6"));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_level_mismatch_message() {
        let err = ShapeError::LevelLengthMismatch {
            level: 2,
            expected: 20,
            found: 19,
        };
        assert_eq!(err.to_string(), "level 2 has 19 codes, expected 20");
    }
}
