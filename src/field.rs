//! Arithmetic in `𝔽_p` for the Mersenne prime `p = 2^127 - 1`.
//!
//! Values are stored canonically in `[0, p)` as a `u128`. Addition and
//! subtraction stay on native `u128` (two canonical operands never overflow
//! it); multiplication and inversion lift to `num_bigint::BigUint` for the
//! modular reduction, the same technique the rest of this crate's ancestry
//! uses for RSA-scale modular exponentiation.

use num_bigint::BigUint;
use rand::RngCore;
use std::fmt;

use crate::error::CodecError;

/// `p = 2^127 - 1`, the 12th Mersenne prime.
pub const MOD: u128 = (1u128 << 127) - 1;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(u128);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement(0);
    pub const ONE: FieldElement = FieldElement(1);

    pub fn new(value: u128) -> Self {
        FieldElement(value % MOD)
    }

    pub fn to_u128(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Uniform sample in `[0, p)` via rejection sampling on 127 random bits.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        loop {
            let mut buf = [0u8; 16];
            rng.fill_bytes(&mut buf);
            let candidate = u128::from_le_bytes(buf) & MOD;
            if candidate != MOD {
                return FieldElement(candidate);
            }
        }
    }

    /// Uniform sample in `[1, p-1]`, used for fresh x-coordinates.
    pub fn random_nonzero<R: RngCore>(rng: &mut R) -> Self {
        loop {
            let candidate = Self::random(rng);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }

    pub fn add(self, other: Self) -> Self {
        let sum = self.0 + other.0;
        FieldElement(if sum >= MOD { sum - MOD } else { sum })
    }

    pub fn sub(self, other: Self) -> Self {
        if self.0 >= other.0 {
            FieldElement(self.0 - other.0)
        } else {
            FieldElement(MOD - (other.0 - self.0))
        }
    }

    pub fn neg(self) -> Self {
        if self.0 == 0 {
            self
        } else {
            FieldElement(MOD - self.0)
        }
    }

    pub fn mul(self, other: Self) -> Self {
        let product = BigUint::from(self.0) * BigUint::from(other.0);
        Self::from_biguint(product % modulus())
    }

    /// `self^exponent mod p` via `BigUint::modpow` (square-and-multiply).
    pub fn pow(self, exponent: u128) -> Self {
        let result = BigUint::from(self.0).modpow(&BigUint::from(exponent), &modulus());
        Self::from_biguint(result)
    }

    /// Fermat's little theorem: `self^(p-2)` is the multiplicative inverse.
    pub fn inverse(self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(self.pow(MOD - 2))
    }

    pub fn to_decimal_string(self) -> String {
        self.0.to_string()
    }

    pub fn from_decimal_string(s: &str) -> Result<Self, CodecError> {
        let value: u128 = s
            .parse()
            .map_err(|_| CodecError::InvalidDecimal(s.to_string()))?;
        if value >= MOD {
            return Err(CodecError::OutOfRange(s.to_string()));
        }
        Ok(FieldElement(value))
    }

    pub fn to_hex(self) -> String {
        format!("{:032x}", self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let value = u128::from_str_radix(trimmed, 16)
            .map_err(|_| CodecError::InvalidDecimal(s.to_string()))?;
        if value >= MOD {
            return Err(CodecError::OutOfRange(s.to_string()));
        }
        Ok(FieldElement(value))
    }

    fn from_biguint(v: BigUint) -> Self {
        let bytes = v.to_bytes_le();
        let mut buf = [0u8; 16];
        let n = bytes.len().min(16);
        buf[..n].copy_from_slice(&bytes[..n]);
        FieldElement(u128::from_le_bytes(buf))
    }
}

fn modulus() -> BigUint {
    BigUint::from(MOD)
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.0)
    }
}
