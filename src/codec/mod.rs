//! SNAC residual code interleaving.
//!
//! SNAC encodes audio into 3 or 4 code sequences at increasing time
//! resolution: level `i` carries `2^i` codes per frame. This module flattens
//! such a hierarchy into the text format stored in speech datasets:
//!
//! ```text
//! # c0 c1 c2 ... c6 # c0 c1 ...          (3 levels, 7 values per frame)
//! # c0 c1 c2 ... c14 # c0 c1 ...         (4 levels, 15 values per frame)
//! ```
//!
//! and rebuilds the per-level codes from that text. Both directions read the
//! same interleave table ([`Levels::pattern`]), so `reconstruct(flatten(h))`
//! always returns `h`.
//!
//! Everything here is pure and synchronous. The only external state touched
//! is a borrowed [`candle_core::Device`] when materializing tensors.

mod flatten;
mod hierarchy;
mod layout;
mod reconstruct;
pub mod streams;

pub use flatten::{flatten, flatten_to_string, make_snac_tokens};
pub use hierarchy::CodeHierarchy;
pub use layout::{Levels, Slot, FRAME_DELIMITER, TOKEN_SEPARATOR};
pub use reconstruct::{parse_snac_tokens, reconstruct, reconstruct_str, reconstruct_tensors};
pub use streams::{frames_from_delayed_streams, layershift, SnacVocab};
