//! Error types for the persistence-facing boundary of this crate.
//!
//! The three core operations (`commit`, `add_commitment`, `decrypt`) never
//! fail: membership rejection, out-of-range thresholds, and interpolation
//! or decryption failure are all handled in-band (sentinel values, `None`,
//! an empty result list). `CodecError` exists only for the layer that
//! round-trips field elements and points through the decimal/hex strings
//! an external document store would hold them as.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("'{0}' is not a valid field element literal")]
    InvalidDecimal(String),

    #[error("'{0}' is out of range for modulus 2^127 - 1")]
    OutOfRange(String),

    #[error("expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}
