//! Decode direction: `#`-delimited token stream -> hierarchy.
//!
//! The stream is walked in blocks of `1 + (2^L - 1)` tokens. Every block must
//! open with `#`, and its values are scattered back to their levels through
//! the same interleave table the flattener uses. Partial or misaligned frames
//! are errors; nothing is padded or dropped.

use anyhow::Result;
use candle_core::{Device, Tensor};

use super::hierarchy::CodeHierarchy;
use super::layout::{Levels, FRAME_DELIMITER, TOKEN_SEPARATOR};
use crate::error::{CodecError, FormatError};

/// Split a stored token string on single spaces.
///
/// One trailing `\n` or `\r\n` is dropped first, so rows read line by line
/// parse the same as the stored field.
pub fn parse_snac_tokens(input: &str) -> Vec<&str> {
    let input = input
        .strip_suffix('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .unwrap_or(input);
    input.split(TOKEN_SEPARATOR).collect()
}

/// Parse a value token in the exact form the flattener writes it.
///
/// Rejects `+5`, `007` and `-0`, which `str::parse` would accept but which
/// would not survive a flatten round trip.
fn parse_code(token: &str) -> Option<i64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == token.len(),
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    };
    if canonical {
        token.parse().ok()
    } else {
        None
    }
}

fn is_delimiter<S: AsRef<str>>(token: &S) -> bool {
    token.as_ref() == FRAME_DELIMITER
}

/// Infer the hierarchy shape from the tokens between the first two `#`.
///
/// `stream` must start at the first delimiter. A single-frame stream has no
/// second delimiter, so its width is everything after the first one.
fn detect_shape<S: AsRef<str>>(stream: &[S]) -> Result<Levels, FormatError> {
    let values = &stream[1..];
    let width = values
        .iter()
        .position(is_delimiter)
        .unwrap_or(values.len());
    Levels::from_frame_width(width)
}

/// Rebuild the per-level codes from a token stream.
///
/// Tokens before the first `#` are ignored.
pub fn reconstruct<S: AsRef<str>>(tokens: &[S]) -> Result<CodeHierarchy, CodecError> {
    let start = tokens
        .iter()
        .position(is_delimiter)
        .ok_or(FormatError::MissingDelimiter)?;
    let stream = &tokens[start..];

    let shape = detect_shape(stream)?;
    let block_len = shape.block_len();
    let num_frames = stream.len().div_ceil(block_len);

    let mut levels: Vec<Vec<i64>> = (0..shape.count())
        .map(|level| vec![0; num_frames * shape.per_frame(level)])
        .collect();

    for (frame, block) in stream.chunks(block_len).enumerate() {
        let base = start + frame * block_len;

        let head = block[0].as_ref();
        if head != FRAME_DELIMITER {
            return Err(FormatError::DelimiterExpected {
                frame,
                position: base,
                found: head.to_string(),
            }
            .into());
        }

        for (i, (slot, token)) in shape.pattern().iter().zip(&block[1..]).enumerate() {
            let position = base + 1 + i;
            let token = token.as_ref();
            if token == FRAME_DELIMITER {
                return Err(FormatError::FrameWidthMismatch { frame, position }.into());
            }
            let value = parse_code(token).ok_or_else(|| FormatError::InvalidValue {
                frame,
                position,
                token: token.to_string(),
            })?;
            let cursor = frame * shape.per_frame(slot.level);
            levels[slot.level][cursor + slot.offset] = value;
        }

        if block.len() < block_len {
            return Err(CodecError::truncation(frame, block_len, block.len()));
        }
    }

    tracing::debug!(
        levels = shape.count(),
        frames = num_frames,
        skipped = start,
        "reconstructed SNAC codes"
    );

    Ok(CodeHierarchy::from_parts(levels, shape))
}

/// Parse a stored token string and rebuild the hierarchy.
pub fn reconstruct_str(input: &str) -> Result<CodeHierarchy, CodecError> {
    reconstruct(&parse_snac_tokens(input))
}

/// Rebuild the hierarchy and materialize it as `[1, n]` tensors on `device`.
pub fn reconstruct_tensors<S: AsRef<str>>(tokens: &[S], device: &Device) -> Result<Vec<Tensor>> {
    let hierarchy = reconstruct(tokens)?;
    hierarchy.to_tensors(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const FOUR_LEVEL_FRAME: &str = "# 10 1 3 7 8 4 9 10 2 5 11 12 6 13 14";

    #[test]
    fn test_parse_snac_tokens() {
        assert_eq!(parse_snac_tokens("# 1 2"), vec!["#", "1", "2"]);
        assert_eq!(parse_snac_tokens(""), vec![""]);
    }

    #[test]
    fn test_parse_snac_tokens_drops_line_terminator() {
        assert_eq!(parse_snac_tokens("# 1 2\n"), vec!["#", "1", "2"]);
        assert_eq!(parse_snac_tokens("# 1 2\r\n"), vec!["#", "1", "2"]);
        // Only one terminator is stripped
        assert_eq!(parse_snac_tokens("# 1\n\n"), vec!["#", "1\n"]);

        let h = reconstruct_str("# 1 2 3 4 5 6 7\n").unwrap();
        assert_eq!(h.level(2).unwrap(), &[3, 4, 6, 7]);
    }

    #[test]
    fn test_parse_code_canonical_only() {
        assert_eq!(parse_code("0"), Some(0));
        assert_eq!(parse_code("4095"), Some(4095));
        assert_eq!(parse_code("-12"), Some(-12));
        for token in ["+5", "007", "00", "-0", "-007", "-", "", " 1", "1e3"] {
            assert_eq!(parse_code(token), None, "{token:?}");
        }
        assert_eq!(parse_code("99999999999999999999"), None);
    }

    #[test]
    fn test_non_canonical_values_rejected() {
        let err = reconstruct_str("# +5 007 1 2 3 4 5").unwrap_err();
        assert_eq!(
            err,
            CodecError::Format(FormatError::InvalidValue {
                frame: 0,
                position: 1,
                token: "+5".to_string(),
            })
        );
        let err = reconstruct_str("# 5 007 1 2 3 4 5").unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::InvalidValue { position: 2, .. })
        ));
    }

    #[test]
    fn test_reconstruct_four_level_frame() {
        let h = reconstruct_str(FOUR_LEVEL_FRAME).unwrap();
        assert_eq!(h.shape(), Levels::Four);
        assert_eq!(h.level(0).unwrap(), &[10]);
        assert_eq!(h.level(1).unwrap(), &[1, 2]);
        assert_eq!(h.level(2).unwrap(), &[3, 4, 5, 6]);
        assert_eq!(h.level(3).unwrap(), &[7, 8, 9, 10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_reconstruct_three_level_two_frames() {
        let h = reconstruct_str("# 100 1 10 11 2 12 13 # 200 3 14 15 4 16 17").unwrap();
        assert_eq!(h.shape(), Levels::Three);
        assert_eq!(h.num_frames(), 2);
        assert_eq!(h.level(0).unwrap(), &[100, 200]);
        assert_eq!(h.level(1).unwrap(), &[1, 2, 3, 4]);
        assert_eq!(h.level(2).unwrap(), &[10, 11, 12, 13, 14, 15, 16, 17]);
    }

    #[test]
    fn test_reconstruct_accepts_token_slices() {
        let owned: Vec<String> = FOUR_LEVEL_FRAME.split(' ').map(String::from).collect();
        let from_owned = reconstruct(&owned).unwrap();
        assert_eq!(from_owned, reconstruct_str(FOUR_LEVEL_FRAME).unwrap());
    }

    #[test]
    fn test_leading_garbage_is_skipped() {
        let clean = reconstruct_str(FOUR_LEVEL_FRAME).unwrap();
        let noisy = reconstruct_str(&format!("<audio> 5 junk {FOUR_LEVEL_FRAME}")).unwrap();
        assert_eq!(clean, noisy);
    }

    #[test]
    fn test_negative_codes() {
        let h = reconstruct_str("# -1 -2 -3 -4 -5 -6 -7").unwrap();
        assert_eq!(h.level(0).unwrap(), &[-1]);
        assert_eq!(h.level(2).unwrap(), &[-3, -4, -6, -7]);
    }

    #[test]
    fn test_missing_delimiter() {
        let err = reconstruct_str("1 2 3 4 5 6 7").unwrap_err();
        assert_eq!(err, CodecError::Format(FormatError::MissingDelimiter));
        assert_eq!(reconstruct_str("").unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_unsupported_width() {
        let err = reconstruct_str("# 1 2 3 4 5 # 1 2 3 4 5").unwrap_err();
        assert_eq!(
            err,
            CodecError::Format(FormatError::UnsupportedFrameWidth { width: 5 })
        );
        assert!(reconstruct_str("#").is_err());
    }

    #[test]
    fn test_short_later_frame_is_width_mismatch() {
        // Second frame lost a value; its block now swallows the third '#'
        let err =
            reconstruct_str("# 1 2 3 4 5 6 7 # 1 2 3 4 5 6 # 1 2 3 4 5 6 7").unwrap_err();
        assert_eq!(
            err,
            CodecError::Format(FormatError::FrameWidthMismatch {
                frame: 1,
                position: 15,
            })
        );
    }

    #[test]
    fn test_long_frame_is_delimiter_expected() {
        let err = reconstruct_str("# 1 2 3 4 5 6 7 # 1 2 3 4 5 6 7 8 # 1 2 3 4 5 6 7")
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::Format(FormatError::DelimiterExpected {
                frame: 2,
                position: 16,
                found: "8".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_value_reports_position() {
        let err = reconstruct_str("x # 1 2 3 4.5 5 6 7").unwrap_err();
        assert_eq!(
            err,
            CodecError::Format(FormatError::InvalidValue {
                frame: 0,
                position: 5,
                token: "4.5".to_string(),
            })
        );
    }

    #[test]
    fn test_truncated_final_frame() {
        let err = reconstruct_str("# 1 2 3 4 5 6 7 # 1 2 3").unwrap_err();
        assert_eq!(err, CodecError::truncation(1, 8, 4));
    }

    #[test]
    fn test_trailing_space_is_rejected() {
        let err = reconstruct_str("# 1 2 3 4 5 6 7 # 1 2 3 4 5 6 7 ").unwrap_err();
        assert!(matches!(
            err,
            CodecError::Format(FormatError::DelimiterExpected { frame: 2, .. })
        ));
    }

    #[test]
    fn test_reconstruct_tensors_shapes() {
        let tokens = parse_snac_tokens(FOUR_LEVEL_FRAME);
        let tensors = reconstruct_tensors(&tokens, &Device::Cpu).unwrap();
        let dims: Vec<Vec<usize>> = tensors.iter().map(|t| t.dims().to_vec()).collect();
        assert_eq!(dims, vec![vec![1, 1], vec![1, 2], vec![1, 4], vec![1, 8]]);
        let level3: Vec<Vec<i64>> = tensors[3].to_vec2().unwrap();
        assert_eq!(level3, vec![vec![7, 8, 9, 10, 11, 12, 13, 14]]);
    }
}
