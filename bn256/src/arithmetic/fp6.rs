//! Cubic extension GF(p⁶) = GF(p²)[v]/(v³ − ξ), ξ = u.
//!
//! An element is `x·v² + y·v + z` with coefficients in GF(p²).

use super::field::FieldElement;
use super::fp2::Fp2;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// ξ^((2p-2)/3), a GF(p) scalar for this curve.
const XI_2P_MINUS_2_OVER_3: FieldElement = FieldElement::from_montgomery([
    0x8105_4fcd_94e9_c1c4,
    0x4c0e_91cb_8ce2_df3e,
    0x4877_b452_e8ae_dfb4,
    0x88f5_3e74_8b49_1776,
]);

/// ξ^((p-1)/3), a GF(p) scalar for this curve.
pub(crate) const XI_P_MINUS_1_OVER_3: FieldElement = FieldElement::from_montgomery([
    0xb626_197d_ce47_36ca,
    0x0829_6b35_57ed_0186,
    0x9c70_5db2_fd91_512a,
    0x1c75_3e74_8601_c992,
]);

/// ξ^((2p²-2)/3), a GF(p) scalar.
pub(crate) const XI_2P2_MINUS_2_OVER_3: FieldElement = FieldElement::from_montgomery([
    0x2f49_81aa_150a_0eb3,
    0x19c9_2815_c28d_ed55,
    0x3993_4d9c_f7fd_761b,
    0x99ca_c18b_7ca1_dd5f,
]);

/// ξ^((p²-1)/3), a GF(p) scalar.
const XI_P2_MINUS_1_OVER_3: FieldElement = FieldElement::from_montgomery([
    0x8105_4fcd_94e9_c1c4,
    0x4c0e_91cb_8ce2_df3e,
    0x4877_b452_e8ae_dfb4,
    0x88f5_3e74_8b49_1776,
]);

/// An element of GF(p⁶), represented as `x·v² + y·v + z`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Fp6 {
    pub(crate) x: Fp2,
    pub(crate) y: Fp2,
    pub(crate) z: Fp2,
}

impl Fp6 {
    /// The additive identity.
    pub const ZERO: Self = Self {
        x: Fp2::ZERO,
        y: Fp2::ZERO,
        z: Fp2::ZERO,
    };

    /// The multiplicative identity.
    pub const ONE: Self = Self {
        x: Fp2::ZERO,
        y: Fp2::ZERO,
        z: Fp2::ONE,
    };

    pub(crate) const fn new(x: Fp2, y: Fp2, z: Fp2) -> Self {
        Self { x, y, z }
    }

    /// Determine if this element is zero.
    pub fn is_zero(&self) -> Choice {
        self.x.is_zero() & self.y.is_zero() & self.z.is_zero()
    }

    /// Returns `self + rhs`.
    pub fn add(&self, rhs: &Self) -> Self {
        Self {
            x: self.x.add(&rhs.x),
            y: self.y.add(&rhs.y),
            z: self.z.add(&rhs.z),
        }
    }

    /// Returns `self - rhs`.
    pub fn sub(&self, rhs: &Self) -> Self {
        Self {
            x: self.x.sub(&rhs.x),
            y: self.y.sub(&rhs.y),
            z: self.z.sub(&rhs.z),
        }
    }

    /// Returns `-self`.
    pub fn neg(&self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y.neg(),
            z: self.z.neg(),
        }
    }

    /// Returns `self * rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        // Schoolbook product folded with v³ = ξ, v⁴ = ξ·v.
        let (x1, y1, z1) = (&self.x, &self.y, &self.z);
        let (x2, y2, z2) = (&rhs.x, &rhs.y, &rhs.z);

        let x = x1
            .mul(z2)
            .add(&y1.mul(y2))
            .add(&z1.mul(x2));
        let y = y1
            .mul(z2)
            .add(&z1.mul(y2))
            .add(&x1.mul(x2).mul_xi());
        let z = z1
            .mul(z2)
            .add(&x1.mul(y2).mul_xi())
            .add(&y1.mul(x2).mul_xi());
        Self { x, y, z }
    }

    /// Returns `self * k` for k in GF(p²).
    pub fn mul_scalar(&self, k: &Fp2) -> Self {
        Self {
            x: self.x.mul(k),
            y: self.y.mul(k),
            z: self.z.mul(k),
        }
    }

    /// Returns `self * k` for a base field scalar k.
    pub fn mul_gfp(&self, k: &FieldElement) -> Self {
        Self {
            x: self.x.mul_scalar(k),
            y: self.y.mul_scalar(k),
            z: self.z.mul_scalar(k),
        }
    }

    /// Returns `self * v`.
    pub fn mul_tau(&self) -> Self {
        // (x·v² + y·v + z)·v = y·v² + z·v + x·ξ
        Self {
            x: self.y,
            y: self.z,
            z: self.x.mul_xi(),
        }
    }

    /// Returns `self²`.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Returns the multiplicative inverse, or zero for zero input.
    pub fn invert(&self) -> Self {
        // Algorithm 17 of Devegili et al., "Implementing cryptographic
        // pairings over Barreto-Naehrig curves".
        let a = self.z.square().sub(&self.x.mul(&self.y).mul_xi());
        let b = self.x.square().mul_xi().sub(&self.y.mul(&self.z));
        let c = self.y.square().sub(&self.x.mul(&self.z));
        let f = c
            .mul(&self.y)
            .mul_xi()
            .add(&a.mul(&self.z))
            .add(&b.mul(&self.x).mul_xi())
            .invert();
        Self {
            x: c.mul(&f),
            y: b.mul(&f),
            z: a.mul(&f),
        }
    }

    /// The p-power Frobenius.
    pub fn frobenius(&self) -> Self {
        Self {
            x: self.x.conjugate().mul_scalar(&XI_2P_MINUS_2_OVER_3),
            y: self.y.conjugate().mul_scalar(&XI_P_MINUS_1_OVER_3),
            z: self.z.conjugate(),
        }
    }

    /// The p²-power Frobenius.
    pub fn frobenius_p2(&self) -> Self {
        Self {
            x: self.x.mul_scalar(&XI_2P2_MINUS_2_OVER_3),
            y: self.y.mul_scalar(&XI_P2_MINUS_1_OVER_3),
            z: self.z,
        }
    }
}

impl ConditionallySelectable for Fp6 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp2::conditional_select(&a.x, &b.x, choice),
            y: Fp2::conditional_select(&a.y, &b.y, choice),
            z: Fp2::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for Fp6 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y) & self.z.ct_eq(&other.z)
    }
}
