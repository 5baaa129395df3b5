//! Encode direction: hierarchy -> `#`-delimited token stream.

use super::hierarchy::CodeHierarchy;
use super::layout::{FRAME_DELIMITER, TOKEN_SEPARATOR};
use crate::error::CodecError;

/// Flatten a hierarchy into tokens: per frame, `#` then `2^L - 1` values.
pub fn flatten(hierarchy: &CodeHierarchy) -> Vec<String> {
    let shape = hierarchy.shape();
    let levels = hierarchy.levels();
    let num_frames = hierarchy.num_frames();

    let mut tokens = Vec::with_capacity(num_frames * shape.block_len());
    for frame in 0..num_frames {
        tokens.push(FRAME_DELIMITER.to_string());
        for slot in shape.pattern() {
            let cursor = frame * shape.per_frame(slot.level);
            tokens.push(levels[slot.level][cursor + slot.offset].to_string());
        }
    }
    tokens
}

/// Flatten and join with single spaces (the stored dataset format).
pub fn flatten_to_string(hierarchy: &CodeHierarchy) -> String {
    let tokens = flatten(hierarchy);
    let mut out = String::with_capacity(tokens.iter().map(|t| t.len() + 1).sum());
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(TOKEN_SEPARATOR);
        }
        out.push_str(token);
    }
    out
}

/// Validate raw per-level codes and flatten them to a token string.
///
/// Shape errors are reported before anything is emitted.
pub fn make_snac_tokens(levels: Vec<Vec<i64>>) -> Result<String, CodecError> {
    let hierarchy = CodeHierarchy::new(levels)?;
    Ok(flatten_to_string(&hierarchy))
}
