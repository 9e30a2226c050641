#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![doc = include_str!("../README.md")]

mod arithmetic;
mod pairing;

pub use crate::arithmetic::curve::{CurvePoint, CurvePointTable};
pub use crate::arithmetic::field::FieldElement;
pub use crate::arithmetic::fp12::Fp12;
pub use crate::arithmetic::fp2::Fp2;
pub use crate::arithmetic::fp6::Fp6;
pub use crate::arithmetic::twist::TwistPoint;
pub use crate::pairing::{pairing, Gt};
pub use subtle;

use core::fmt;

/// The group G1: points on the base curve.
pub type G1 = CurvePoint;

/// The group G2: points on the sextic twist.
pub type G2 = TwistPoint;

/// Order of the G1/G2/Gt groups, as big-endian bytes.
pub const ORDER: [u8; 32] = [
    0xb6, 0x40, 0x00, 0x00, 0x02, 0xa3, 0xa6, 0xf1, 0xd6, 0x03, 0xab, 0x4f, 0xf5, 0x8e, 0xc7,
    0x44, 0x49, 0xf2, 0x93, 0x4b, 0x18, 0xea, 0x8b, 0xee, 0xe5, 0x6e, 0xe1, 0x9c, 0xd6, 0x9e,
    0xcf, 0x25,
];

/// Errors produced when decoding byte inputs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A buffer of the wrong length, an out-of-field coordinate, a point
    /// that is not on the curve, or an unrecognized compressed tag byte.
    MalformedInput,

    /// A scalar encoding that is empty or wider than the scalar size.
    InvalidScalar,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedInput => write!(f, "malformed input"),
            Error::InvalidScalar => write!(f, "invalid scalar"),
        }
    }
}

/// Result type with the crate error.
pub type Result<T> = core::result::Result<T, Error>;

/// Left-pads a big-endian scalar encoding to the fixed scalar width.
pub(crate) fn normalize_scalar(bytes: &[u8]) -> Result<[u8; 32]> {
    if bytes.is_empty() || bytes.len() > 32 {
        return Err(Error::InvalidScalar);
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

impl CurvePoint {
    /// Returns `[k] self` for a big-endian scalar of at most 32 bytes.
    ///
    /// Empty and oversized encodings are rejected; see [`CurvePoint::mul`]
    /// for the fixed-width entry point.
    pub fn mul_bytes(&self, scalar: &[u8]) -> Result<Self> {
        Ok(self.mul(&normalize_scalar(scalar)?))
    }
}

impl TwistPoint {
    /// Returns `[k] self` for a big-endian scalar of at most 32 bytes.
    ///
    /// Empty and oversized encodings are rejected; see [`TwistPoint::mul`]
    /// for the fixed-width entry point.
    pub fn mul_bytes(&self, scalar: &[u8]) -> Result<Self> {
        Ok(self.mul(&normalize_scalar(scalar)?))
    }
}

#[cfg(test)]
mod tests {
    use super::{CurvePoint, Error};

    #[test]
    fn scalar_normalization() {
        let g = CurvePoint::GENERATOR;
        assert_eq!(g.mul_bytes(&[3]).unwrap(), g.double().add(&g));
        assert_eq!(g.mul_bytes(&[]), Err(Error::InvalidScalar));
        assert_eq!(g.mul_bytes(&[0u8; 33]), Err(Error::InvalidScalar));
    }
}
