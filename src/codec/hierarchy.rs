//! Residual code hierarchy: one code sequence per SNAC level, coarsest first.

use anyhow::{bail, Result};
use candle_core::{DType, Device, Tensor};

use super::layout::Levels;
use crate::error::{CodecError, ShapeError};

/// Validated per-level residual codes.
///
/// Level `i` holds exactly `F * 2^i` codes, where `F` is the length of
/// level 0 (the number of frames).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeHierarchy {
    levels: Vec<Vec<i64>>,
    shape: Levels,
}

impl CodeHierarchy {
    /// Validate level count and per-level lengths.
    pub fn new(levels: Vec<Vec<i64>>) -> Result<Self, CodecError> {
        let shape = Levels::from_level_count(levels.len())?;
        let num_frames = levels[0].len();

        for (level, codes) in levels.iter().enumerate() {
            let expected = num_frames * shape.per_frame(level);
            if codes.len() != expected {
                return Err(ShapeError::LevelLengthMismatch {
                    level,
                    expected,
                    found: codes.len(),
                }
                .into());
            }
        }

        Ok(Self { levels, shape })
    }

    /// Build from codec output tensors shaped `[1, n]` or `[n]`.
    pub fn from_tensors(codes: &[Tensor]) -> Result<Self> {
        let mut levels = Vec::with_capacity(codes.len());
        for (level, tensor) in codes.iter().enumerate() {
            let dims = tensor.dims();
            match dims {
                [_] => {}
                [1, _] => {}
                _ => bail!("level {level}: expected codes shaped [1, n] or [n], got {dims:?}"),
            }
            let values: Vec<i64> = tensor.flatten_all()?.to_dtype(DType::I64)?.to_vec1()?;
            levels.push(values);
        }
        Ok(Self::new(levels)?)
    }

    /// Materialize every level as an `I64` tensor `[1, F * 2^i]` on `device`.
    pub fn to_tensors(&self, device: &Device) -> Result<Vec<Tensor>> {
        self.levels
            .iter()
            .map(|codes| Ok(Tensor::from_slice(codes.as_slice(), (1, codes.len()), device)?))
            .collect()
    }

    /// All levels, coarsest first.
    pub fn levels(&self) -> &[Vec<i64>] {
        &self.levels
    }

    /// Codes of one level, or `None` past the last level.
    pub fn level(&self, index: usize) -> Option<&[i64]> {
        self.levels.get(index).map(Vec::as_slice)
    }

    /// Number of levels (3 or 4).
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Supported shape this hierarchy was validated against.
    pub fn shape(&self) -> Levels {
        self.shape
    }

    /// Number of frames, i.e. the length of level 0.
    pub fn num_frames(&self) -> usize {
        self.levels[0].len()
    }

    /// Take the per-level buffers back.
    pub fn into_levels(self) -> Vec<Vec<i64>> {
        self.levels
    }

    /// Construct from buffers the reconstructor already sized correctly.
    pub(crate) fn from_parts(levels: Vec<Vec<i64>>, shape: Levels) -> Self {
        debug_assert_eq!(levels.len(), shape.count());
        Self { levels, shape }
    }
}
