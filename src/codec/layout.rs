//! Frame grammar and the interleave table shared by both directions.

use crate::error::{FormatError, ShapeError};

/// Token that starts every frame.
pub const FRAME_DELIMITER: &str = "#";

/// Separator used when a token stream is serialized to one string.
pub const TOKEN_SEPARATOR: char = ' ';

/// One frame-local output position: `level[cursor(level) + offset]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub level: usize,
    pub offset: usize,
}

const fn slot(level: usize, offset: usize) -> Slot {
    Slot { level, offset }
}

/// Interleave order for three levels (1 + 2 + 4 values per frame).
const PATTERN_3: [Slot; 7] = [
    slot(0, 0),
    slot(1, 0),
    slot(2, 0),
    slot(2, 1),
    slot(1, 1),
    slot(2, 2),
    slot(2, 3),
];

/// Interleave order for four levels (1 + 2 + 4 + 8 values per frame).
const PATTERN_4: [Slot; 15] = [
    slot(0, 0),
    slot(1, 0),
    slot(2, 0),
    slot(3, 0),
    slot(3, 1),
    slot(2, 1),
    slot(3, 2),
    slot(3, 3),
    slot(1, 1),
    slot(2, 2),
    slot(3, 4),
    slot(3, 5),
    slot(2, 3),
    slot(3, 6),
    slot(3, 7),
];

/// Supported hierarchy shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Levels {
    /// 3 levels, 7 values per frame (24 kHz model)
    Three,
    /// 4 levels, 15 values per frame (32/44 kHz models)
    Four,
}

impl Levels {
    /// Shape for a hierarchy with `count` levels.
    pub fn from_level_count(count: usize) -> Result<Self, ShapeError> {
        match count {
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            found => Err(ShapeError::UnsupportedLevelCount { found }),
        }
    }

    /// Shape whose frames carry `width` values.
    pub fn from_frame_width(width: usize) -> Result<Self, FormatError> {
        match width {
            7 => Ok(Self::Three),
            15 => Ok(Self::Four),
            width => Err(FormatError::UnsupportedFrameWidth { width }),
        }
    }

    /// Number of levels, `L`.
    pub fn count(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Values per frame, `2^L - 1`.
    pub fn frame_width(self) -> usize {
        (1 << self.count()) - 1
    }

    /// Delimiter plus values.
    pub fn block_len(self) -> usize {
        self.frame_width() + 1
    }

    /// Codes contributed by `level` to each frame, `2^level`.
    pub fn per_frame(self, level: usize) -> usize {
        1 << level
    }

    /// Frame-local interleave order shared by flatten and reconstruct.
    pub fn pattern(self) -> &'static [Slot] {
        match self {
            Self::Three => &PATTERN_3,
            Self::Four => &PATTERN_4,
        }
    }
}
