//! Helpers for the persistence contract described in spec §6: an outer
//! document store holds field elements as decimal strings (its storage
//! cannot be relied on for raw 127-bit integers) and ciphertexts hex-encoded.
//! The sentinel `(0, 0)` round-trips as the literal strings `"0", "0"`.
//!
//! This module only encodes/decodes; it never decides whether a record is
//! well-formed beyond "did these bytes parse" — that judgment belongs to
//! `decrypter`, which rejects bad candidates in-band rather than erroring.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::field::FieldElement;

/// The wire/document form of one commitment record (spec §6 persistence
/// contract): a hex ciphertext plus `N` decimal-string point pairs, with the
/// sentinel stored as the literal strings `"0", "0"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitmentRecord {
    pub ciphertext: String,
    pub points: Vec<(String, String)>,
}

impl CommitmentRecord {
    pub fn encode(ciphertext: String, points: &[(FieldElement, FieldElement)]) -> Self {
        CommitmentRecord {
            ciphertext,
            points: points.iter().map(|&p| encode_point(p)).collect(),
        }
    }

    pub fn decode(
        &self,
        expected_n: usize,
    ) -> Result<(String, Vec<(FieldElement, FieldElement)>), CodecError> {
        let points = decode_points(&self.points, expected_n)?;
        Ok((self.ciphertext.clone(), points))
    }
}

pub fn encode_point(point: (FieldElement, FieldElement)) -> (String, String) {
    (point.0.to_decimal_string(), point.1.to_decimal_string())
}

pub fn decode_point(x: &str, y: &str) -> Result<(FieldElement, FieldElement), CodecError> {
    Ok((
        FieldElement::from_decimal_string(x)?,
        FieldElement::from_decimal_string(y)?,
    ))
}

pub fn decode_points(
    pairs: &[(String, String)],
    expected_n: usize,
) -> Result<Vec<(FieldElement, FieldElement)>, CodecError> {
    if pairs.len() != expected_n {
        return Err(CodecError::WrongLength {
            expected: expected_n,
            actual: pairs.len(),
        });
    }
    pairs
        .iter()
        .map(|(x, y)| decode_point(x, y))
        .collect::<Result<Vec<_>, _>>()
}

pub fn decode_ciphertext_hex(s: &str) -> Result<Vec<u8>, CodecError> {
    Ok(hex::decode(s)?)
}

/// Flatten a commitment log's points into the distinct x-coordinates an
/// `Encrypter` must be rehydrated with via `set_used_xs` (spec §5, Restart
/// recovery).
pub fn used_xs_from_points<'a>(
    all_points: impl IntoIterator<Item = &'a Vec<(FieldElement, FieldElement)>>,
) -> Vec<FieldElement> {
    all_points
        .into_iter()
        .flatten()
        .filter(|(x, _)| !x.is_zero())
        .map(|(x, _)| *x)
        .collect()
}
