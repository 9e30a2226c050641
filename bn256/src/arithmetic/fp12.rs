//! Quadratic extension GF(p¹²) = GF(p⁶)[w]/(w² − v).
//!
//! An element is `x·w + y` with coefficients in GF(p⁶). The pairing output
//! lives here; elements of the cyclotomic subgroup additionally support a
//! cheaper squaring and the fixed exponentiation by the curve parameter u.

use super::field::FieldElement;
use super::fp2::Fp2;
use super::fp6::Fp6;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// ξ^((p-1)/6), a GF(p) scalar for this curve.
const XI_P_MINUS_1_OVER_6: FieldElement = FieldElement::from_montgomery([
    0x1a98_dfbd_4575_299f,
    0x9ec8_547b_245c_54fd,
    0xf51f_5eac_13df_846c,
    0x9ef7_4015_d5a1_6393,
]);

/// ξ^((p²-1)/6), a GF(p) scalar.
const XI_P2_MINUS_1_OVER_6: FieldElement = FieldElement::from_montgomery([
    0xb626_197d_ce47_36ca,
    0x0829_6b35_57ed_0186,
    0x9c70_5db2_fd91_512a,
    0x1c75_3e74_8601_c992,
]);

/// An element of GF(p¹²), represented as `x·w + y`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Fp12 {
    pub(crate) x: Fp6,
    pub(crate) y: Fp6,
}

impl Fp12 {
    /// The multiplicative identity.
    pub const ONE: Self = Self {
        x: Fp6::ZERO,
        y: Fp6::ONE,
    };

    pub(crate) const fn new(x: Fp6, y: Fp6) -> Self {
        Self { x, y }
    }

    /// Determine if this element is the identity.
    pub fn is_one(&self) -> Choice {
        self.ct_eq(&Self::ONE)
    }

    /// Returns `self * rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        // (x1·w + y1)(x2·w + y2) = (x1y2 + x2y1)·w + (y1y2 + x1x2·v)
        let xx = self.x.mul(&rhs.x);
        let yy = self.y.mul(&rhs.y);
        let x = self
            .x
            .add(&self.y)
            .mul(&rhs.x.add(&rhs.y))
            .sub(&xx)
            .sub(&yy);
        Self {
            x,
            y: yy.add(&xx.mul_tau()),
        }
    }

    /// Returns `self²`.
    pub fn square(&self) -> Self {
        let xy = self.x.mul(&self.y);
        Self {
            x: xy.add(&xy),
            y: self.y.square().add(&self.x.square().mul_tau()),
        }
    }

    /// Returns the conjugate `-x·w + y`, which is the p⁶-power Frobenius.
    pub fn conjugate(&self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y,
        }
    }

    /// Returns the multiplicative inverse, or zero for zero input.
    pub fn invert(&self) -> Self {
        // (x·w + y)⁻¹ = (y - x·w) / (y² - x²·v)
        let t = self.y.square().sub(&self.x.square().mul_tau()).invert();
        Self {
            x: self.x.neg().mul(&t),
            y: self.y.mul(&t),
        }
    }

    /// The p-power Frobenius.
    pub fn frobenius(&self) -> Self {
        Self {
            x: self.x.frobenius().mul_gfp(&XI_P_MINUS_1_OVER_6),
            y: self.y.frobenius(),
        }
    }

    /// The p²-power Frobenius.
    pub fn frobenius_p2(&self) -> Self {
        Self {
            x: self.x.frobenius_p2().mul_gfp(&XI_P2_MINUS_1_OVER_6),
            y: self.y.frobenius_p2(),
        }
    }

    /// Squaring in the cyclotomic subgroup (Granger–Scott).
    ///
    /// Only valid for elements of order dividing p⁴ - p² + 1, i.e. values
    /// produced by the easy part of the final exponentiation.
    pub fn special_square(&self) -> Self {
        let z0 = self.y.z;
        let z4 = self.y.y;
        let z3 = self.y.x;
        let z2 = self.x.z;
        let z1 = self.x.y;
        let z5 = self.x.x;

        let (t0, t1) = fp4_square(&z1, &z0);
        let z0 = t0.sub(&z0).double().add(&t0);
        let z1 = t1.add(&z1).double().add(&t1);

        let (t0, t1) = fp4_square(&z3, &z2);
        let (t2, t3) = fp4_square(&z5, &z4);

        let z4 = t0.sub(&z4).double().add(&t0);
        let z5 = t1.add(&z5).double().add(&t1);

        let t0 = t3.mul_xi();
        let z2 = t0.add(&z2).double().add(&t0);
        let z3 = t2.sub(&z3).double().add(&t2);

        Self {
            x: Fp6::new(z5, z1, z2),
            y: Fp6::new(z3, z4, z0),
        }
    }

    /// `n` cyclotomic squarings.
    pub fn special_squares(&self, n: usize) -> Self {
        let mut x = *self;
        for _ in 0..n {
            x = x.special_square();
        }
        x
    }

    /// Exponentiation by the curve parameter u = 0x600000000058F98A.
    ///
    /// Fixed sequence of 10 multiplications and 61 cyclotomic squarings,
    /// derived from an addition chain for u:
    ///
    /// ```text
    /// _10    = 2*1
    /// _100   = 2*_10
    /// _101   = 1 + _100
    /// _1001  = _100 + _101
    /// _1011  = _10 + _1001
    /// _1100  = 1 + _1011
    /// i56    = (_1100 << 40 + _1011) << 7 + _1011 + _100
    /// i69    = (2*(i56 << 4 + _1001) + 1) << 6
    /// return   2*(_101 + i69)
    /// ```
    ///
    /// Only valid on cyclotomic-subgroup inputs, like `special_square`.
    pub fn exp_u(&self) -> Self {
        let t2 = self.special_square();
        let t1 = t2.special_square();
        let z = self.mul(&t1);
        let t0 = t1.mul(&z);
        let t2 = t2.mul(&t0);
        let t3 = self.mul(&t2);
        let t3 = t3.special_squares(40);
        let t3 = t2.mul(&t3);
        let t3 = t3.special_squares(7);
        let t2 = t2.mul(&t3);
        let t1 = t1.mul(&t2);
        let t1 = t1.special_squares(4);
        let t0 = t0.mul(&t1);
        let t0 = t0.special_square();
        let t0 = self.mul(&t0);
        let t0 = t0.special_squares(6);
        let z = z.mul(&t0);
        z.special_square()
    }

    /// Returns `self^by`, where `by` is a little-endian integer exponent.
    ///
    /// **This operation is variable time with respect to the exponent.**
    pub fn pow_vartime(&self, by: &[u64; 4]) -> Self {
        let mut res = Self::ONE;
        for e in by.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if ((*e >> i) & 1) == 1 {
                    res = res.mul(self);
                }
            }
        }
        res
    }
}

/// Squaring in GF(p⁴) = GF(p²)[w']/(w'² − ξ) of `a·w' + b`.
fn fp4_square(a: &Fp2, b: &Fp2) -> (Fp2, Fp2) {
    let t0 = a.square();
    let t1 = b.square();
    let c0 = t0.mul_xi().add(&t1);
    let c1 = a.add(b).square().sub(&t0).sub(&t1);
    (c0, c1)
}

impl ConditionallySelectable for Fp12 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp6::conditional_select(&a.x, &b.x, choice),
            y: Fp6::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl ConstantTimeEq for Fp12 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::{Fp12, Fp2, Fp6};
    use crate::arithmetic::field::{FieldElement, MODULUS};
    use hex_literal::hex;

    fn fe(bytes: &[u8; 32]) -> FieldElement {
        FieldElement::from_bytes(bytes).unwrap()
    }

    fn sample() -> Fp12 {
        let a = Fp2::new(
            fe(&hex!(
                "0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF"
            )),
            fe(&hex!(
                "1111111122222222333333334444444455555555666666667777777788888888"
            )),
        );
        let b = Fp2::new(
            fe(&hex!(
                "9876543210FEDCBA9876543210FEDCBA9876543210FEDCBA9876543210FEDCBA"
            )),
            fe(&hex!(
                "0000000000000000000000000000000000000000000000000000000000000005"
            )),
        );
        Fp12::new(
            Fp6::new(a, b, a.mul_xi()),
            Fp6::new(b.mul_xi(), a.add(&b), Fp2::ONE),
        )
    }

    /// Maps an arbitrary element into the cyclotomic subgroup the way the
    /// easy part of the final exponentiation does.
    fn cyclotomic() -> Fp12 {
        let a = sample();
        let t = a.conjugate().mul(&a.invert());
        t.mul(&t.frobenius_p2())
    }

    #[test]
    fn invert_cancels() {
        let a = sample();
        assert_eq!(a.mul(&a.invert()), Fp12::ONE);
    }

    #[test]
    fn square_matches_mul() {
        let a = sample();
        assert_eq!(a.square(), a.mul(&a));
    }

    #[test]
    fn frobenius_matches_pow() {
        let a = sample();
        assert_eq!(a.frobenius(), a.pow_vartime(&MODULUS));
        assert_eq!(a.frobenius().frobenius(), a.frobenius_p2());
    }

    #[test]
    fn special_square_on_cyclotomic() {
        let c = cyclotomic();
        assert_eq!(c.special_square(), c.square());
        assert_eq!(c.special_squares(3), c.square().square().square());
    }

    #[test]
    fn exp_u_matches_pow() {
        let c = cyclotomic();
        assert_eq!(c.exp_u(), c.pow_vartime(&[0x600000000058F98A, 0, 0, 0]));
    }
}
