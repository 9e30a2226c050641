//! Quadratic extension GF(p²) = GF(p)[u]/(u² + 2).
//!
//! −2 is a quadratic non-residue for this prime (−1 is not), so the
//! extension is generated by u with u² = −2. An element is `x·u + y`.
//! ξ = u is the cubic non-residue used by the higher tower levels.

use super::field::FieldElement;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// An element of GF(p²), represented as `x·u + y`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Fp2 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
}

impl Fp2 {
    /// The additive identity.
    pub const ZERO: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
    };

    /// The multiplicative identity.
    pub const ONE: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
    };

    pub(crate) const fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }

    /// Determine if this element is zero.
    pub fn is_zero(&self) -> Choice {
        self.x.is_zero() & self.y.is_zero()
    }

    /// Returns `self + rhs`.
    pub fn add(&self, rhs: &Self) -> Self {
        Self {
            x: self.x.add(&rhs.x),
            y: self.y.add(&rhs.y),
        }
    }

    /// Returns `2 * self`.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `self - rhs`.
    pub fn sub(&self, rhs: &Self) -> Self {
        Self {
            x: self.x.subtract(&rhs.x),
            y: self.y.subtract(&rhs.y),
        }
    }

    /// Returns `-self`.
    pub fn neg(&self) -> Self {
        Self {
            x: self.x.negate(),
            y: self.y.negate(),
        }
    }

    /// Returns the conjugate `-x·u + y`, which is also the p-power Frobenius.
    pub fn conjugate(&self) -> Self {
        Self {
            x: self.x.negate(),
            y: self.y,
        }
    }

    /// Returns `self * rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        // (a·u + b)(c·u + d) = (ad + bc)·u + (bd - 2ac)
        let ac = self.x.mul(&rhs.x);
        let bd = self.y.mul(&rhs.y);
        let ad_bc = self
            .x
            .add(&self.y)
            .mul(&rhs.x.add(&rhs.y))
            .subtract(&ac)
            .subtract(&bd);
        Self {
            x: ad_bc,
            y: bd.subtract(&ac.double()),
        }
    }

    /// Returns `self * k` for a base field scalar k.
    pub fn mul_scalar(&self, k: &FieldElement) -> Self {
        Self {
            x: self.x.mul(k),
            y: self.y.mul(k),
        }
    }

    /// Returns `self * ξ` where ξ = u.
    pub fn mul_xi(&self) -> Self {
        // (a·u + b)·u = b·u - 2a
        Self {
            x: self.y,
            y: self.x.double().negate(),
        }
    }

    /// Returns `self²`.
    pub fn square(&self) -> Self {
        // (a·u + b)² = 2ab·u + (b² - 2a²); the second coordinate is
        // computed as (a + b)(b - 2a) + ab.
        let t = self.x.mul(&self.y);
        let y = self
            .x
            .add(&self.y)
            .mul(&self.y.subtract(&self.x.double()))
            .add(&t);
        Self { x: t.double(), y }
    }

    /// Returns the multiplicative inverse, or zero for zero input.
    pub fn invert(&self) -> Self {
        // 1/(a·u + b) = (-a·u + b) / (b² + 2a²)
        let t = self
            .y
            .square()
            .add(&self.x.square().double())
            .invert()
            .unwrap_or(FieldElement::ZERO);
        Self {
            x: self.x.negate().mul(&t),
            y: self.y.mul(&t),
        }
    }
}

impl ConditionallySelectable for Fp2 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl ConstantTimeEq for Fp2 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldElement, Fp2};
    use hex_literal::hex;

    fn sample() -> (Fp2, Fp2) {
        let a = Fp2::new(
            FieldElement::from_bytes(&hex!(
                "0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF"
            ))
            .unwrap(),
            FieldElement::from_bytes(&hex!(
                "1111111122222222333333334444444455555555666666667777777788888888"
            ))
            .unwrap(),
        );
        let b = Fp2::new(
            FieldElement::from_bytes(&hex!(
                "9876543210FEDCBA9876543210FEDCBA9876543210FEDCBA9876543210FEDCBA"
            ))
            .unwrap(),
            FieldElement::from_bytes(&hex!(
                "0000000000000000000000000000000000000000000000000000000000000003"
            ))
            .unwrap(),
        );
        (a, b)
    }

    #[test]
    fn square_matches_mul() {
        let (a, b) = sample();
        assert_eq!(a.square(), a.mul(&a));
        assert_eq!(b.square(), b.mul(&b));
    }

    #[test]
    fn invert_cancels() {
        let (a, b) = sample();
        assert_eq!(a.mul(&a.invert()), Fp2::ONE);
        assert_eq!(b.mul(&b.invert()), Fp2::ONE);
        assert_eq!(Fp2::ZERO.invert(), Fp2::ZERO);
    }

    #[test]
    fn mul_commutes_and_distributes() {
        let (a, b) = sample();
        assert_eq!(a.mul(&b), b.mul(&a));
        let c = a.add(&b);
        assert_eq!(a.mul(&c), a.mul(&a).add(&a.mul(&b)));
    }

    #[test]
    fn xi_is_u() {
        // ξ = u, so multiplying ONE by ξ moves the constant into the u slot.
        let xi = Fp2::ONE.mul_xi();
        assert_eq!(xi.x, FieldElement::ONE);
        assert!(bool::from(xi.y.is_zero()));
        // u² = -2
        assert_eq!(
            xi.square(),
            Fp2::new(FieldElement::ZERO, FieldElement::ONE.double().negate())
        );
    }

    #[test]
    fn conjugate_norm_lands_in_base_field() {
        let (a, _) = sample();
        // conj(a)·a is the field norm, an element of GF(p).
        let norm = a.conjugate().mul(&a);
        assert!(bool::from(norm.x.is_zero()));
    }
}
