//! Base field arithmetic modulo
//! p = 0xB640000002A3A6F1D603AB4FF58EC74521F2934B1A7AEEDBE56F9B27E351457D.
//!
//! Elements are held in Montgomery form as four little-endian `u64` limbs
//! and strongly reduced (`< p`) after every public operation.

use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// Computes `a + b + carry`, returning the result along with the new carry.
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a - (b + borrow)`, returning the result along with the new borrow.
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let (a, b) = (a as u128, b as u128);
    let t = (borrow >> 63) as u128;
    let ret = a.wrapping_sub(b + t);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a + (b * c) + carry`, returning the result along with the new carry.
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let (a, b, c) = (a as u128, b as u128, c as u128);
    let ret = a + b * c + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// The field modulus p as little-endian 64-bit limbs.
pub(crate) const MODULUS: [u64; 4] = [
    0xe56f_9b27_e351_457d,
    0x21f2_934b_1a7a_eedb,
    0xd603_ab4f_f58e_c745,
    0xb640_0000_02a3_a6f1,
];

/// p - 2, the Fermat inversion exponent.
const MODULUS_M2: [u64; 4] = [
    0xe56f_9b27_e351_457b,
    0x21f2_934b_1a7a_eedb,
    0xd603_ab4f_f58e_c745,
    0xb640_0000_02a3_a6f1,
];

/// (p - 5) / 8, the exponent of the Atkin square root (p ≡ 5 mod 8).
const SQRT_EXP: [u64; 4] = [
    0x7cad_f364_fc6a_28af,
    0xa43e_5269_634f_5ddb,
    0x3ac0_7569_feb1_d8e8,
    0x16c8_0000_0054_74de,
];

/// -p⁻¹ mod 2⁶⁴, the Montgomery reduction factor.
const NP0: u64 = 0x892b_c42c_2f2e_e42b;

/// R² mod p, used to enter the Montgomery domain.
const RR: FieldElement = FieldElement([
    0x27de_a312_b417_e2d2,
    0x88f8_105f_ae1a_5d3f,
    0xe479_b522_d670_6e7b,
    0x2ea7_95a6_56f6_2fbd,
]);

/// An element of the BN base field GF(p).
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldElement(pub(crate) [u64; 4]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self([0, 0, 0, 0]);

    /// The multiplicative identity (R mod p).
    pub const ONE: Self = Self([
        0x1a90_64d8_1cae_ba83,
        0xde0d_6cb4_e585_1124,
        0x29fc_54b0_0a71_38ba,
        0x49bf_ffff_fd5c_590e,
    ]);

    /// Constructs an element directly from limbs already in Montgomery form.
    ///
    /// The caller is responsible for supplying a reduced value.
    pub(crate) const fn from_montgomery(limbs: [u64; 4]) -> Self {
        Self(limbs)
    }

    /// Attempts to parse a big-endian 32-byte encoding of a canonical field
    /// element.
    ///
    /// Returns `None` if the bytes do not encode an integer in `[0, p)`.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let mut words = [0u64; 4];
        for (w, chunk) in words.iter_mut().zip(bytes.chunks_exact(8).rev()) {
            *w = u64::from_be_bytes(chunk.try_into().expect("8-byte chunk"));
        }

        let mut borrow = 0;
        for (&w, &wm) in words.iter().zip(MODULUS.iter()) {
            borrow = sbb(w, wm, borrow).1;
        }
        let is_some = (borrow as u8) & 1;

        // w * R² * R⁻¹ = wR mod p
        CtOption::new(Self(words).mul(&RR), Choice::from(is_some))
    }

    /// Returns the big-endian 32-byte encoding of the canonical
    /// (non-Montgomery) value.
    pub fn to_bytes(self) -> [u8; 32] {
        let t = self.from_mont();
        let mut out = [0u8; 32];
        for (chunk, w) in out.chunks_exact_mut(8).zip(t.0.iter().rev()) {
            chunk.copy_from_slice(&w.to_be_bytes());
        }
        out
    }

    /// Determine if this element is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Determine if the canonical value of this element is odd.
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.from_mont().0[0] as u8) & 1)
    }

    /// Returns `self + rhs mod p`.
    pub fn add(&self, rhs: &Self) -> Self {
        // The sum of two reduced values needs five words before reduction.
        let mut t = [0u64; 5];
        let mut carry = 0;
        for i in 0..4 {
            let v = adc(self.0[i], rhs.0[i], carry);
            t[i] = v.0;
            carry = v.1;
        }
        t[4] = carry;
        Self::sub_inner(t, &MODULUS)
    }

    /// Returns `2 * self`.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `self - rhs mod p`.
    pub fn subtract(&self, rhs: &Self) -> Self {
        let mut t = [0u64; 5];
        t[..4].copy_from_slice(&self.0);
        Self::sub_inner(t, &rhs.0)
    }

    /// Returns `-self mod p`.
    pub fn negate(&self) -> Self {
        Self::ZERO.subtract(self)
    }

    /// Computes `a - b`, adding p back on underflow.
    fn sub_inner(a: [u64; 5], b: &[u64; 4]) -> Self {
        let mut out = [0u64; 4];
        let mut borrow = 0;
        for i in 0..4 {
            let t = sbb(a[i], b[i], borrow);
            out[i] = t.0;
            borrow = t.1;
        }
        let (_, borrow) = sbb(a[4], 0, borrow);

        // On underflow `borrow` is all-ones and selects the modulus.
        let mut carry = 0;
        for i in 0..4 {
            let t = adc(out[i], MODULUS[i] & borrow, carry);
            out[i] = t.0;
            carry = t.1;
        }
        Self(out)
    }

    /// Montgomery reduction of a double-width product.
    fn montgomery_reduce(v: &[u64; 8]) -> Self {
        let mut r = [0u64; 5];
        r[..4].copy_from_slice(&v[..4]);
        for i in 0..4 {
            let u = r[0].wrapping_mul(NP0);
            let (_, mut carry) = mac(r[0], u, MODULUS[0], 0);
            for j in 1..4 {
                let t = mac(r[j], u, MODULUS[j], carry);
                r[j - 1] = t.0;
                carry = t.1;
            }
            let t = adc(v[i + 4], r[4], carry);
            r[3] = t.0;
            r[4] = t.1;
        }
        Self::sub_inner(r, &MODULUS)
    }

    /// Returns `self * rhs mod p` (Montgomery product).
    pub fn mul(&self, rhs: &Self) -> Self {
        let mut w = [0u64; 8];

        // Schoolbook multiplication.
        for i in 0..4 {
            let mut carry = 0;
            for j in 0..4 {
                let t = mac(w[i + j], self.0[i], rhs.0[j], carry);
                w[i + j] = t.0;
                carry = t.1;
            }
            w[i + 4] = carry;
        }

        Self::montgomery_reduce(&w)
    }

    /// Returns `self² mod p`.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Returns `self^(2^n) mod p`, n ≥ 1 repeated squarings.
    pub fn sqn(&self, n: usize) -> Self {
        let mut x = *self;
        for _ in 0..n {
            x = x.square();
        }
        x
    }

    /// Leaves the Montgomery domain: returns `self * R⁻¹ mod p`.
    pub fn from_mont(&self) -> Self {
        let mut w = [0u64; 8];
        w[..4].copy_from_slice(&self.0);
        Self::montgomery_reduce(&w)
    }

    /// Enters the Montgomery domain: interprets the limbs as a canonical
    /// residue and returns that value times R mod p.
    pub fn to_mont(&self) -> Self {
        self.mul(&RR)
    }

    /// Returns `self^by mod p`, where `by` is a little-endian integer
    /// exponent.
    ///
    /// **This operation is variable time with respect to the exponent.**
    /// If the exponent is fixed, this operation is effectively constant time.
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

    /// Returns the multiplicative inverse of self, if self is non-zero.
    ///
    /// Inversion is a single exponentiation by Fermat's little theorem:
    /// a^(p-2) * a ≡ 1 mod p.
    pub fn invert(&self) -> CtOption<Self> {
        let inverse = self.pow_vartime(&MODULUS_M2);
        CtOption::new(inverse, !self.is_zero())
    }

    /// Returns the square root of self mod p, or `None` if no square root
    /// exists.
    pub fn sqrt(&self) -> CtOption<Self> {
        // Atkin's algorithm for p ≡ 5 mod 8:
        //   t = (2a)^((p-5)/8), i = 2a·t², r = a·t·(i - 1)
        let a2 = self.double();
        let t = a2.pow_vartime(&SQRT_EXP);
        let i = a2.mul(&t).mul(&t);
        let r = self.mul(&t).mul(&i.subtract(&Self::ONE));
        CtOption::new(r, r.square().ct_eq(self))
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut res = Self::ZERO;
        let pairs = a.0.iter().zip(b.0.iter());
        for (vr, (va, vb)) in res.0.iter_mut().zip(pairs) {
            *vr = u64::conditional_select(va, vb, choice);
        }
        res
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut res = 1u8.into();
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            res &= a.ct_eq(b);
        }
        res
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl fmt::UpperHex for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.from_mont().0.iter().rev() {
            write!(f, "{:016X}", word)?;
        }
        Ok(())
    }
}

impl Add<FieldElement> for FieldElement {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        FieldElement::add(&self, &other)
    }
}

impl Add<&FieldElement> for FieldElement {
    type Output = Self;

    #[inline]
    fn add(self, other: &Self) -> Self {
        FieldElement::add(&self, other)
    }
}

impl AddAssign<FieldElement> for FieldElement {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = FieldElement::add(self, &other);
    }
}

impl Sub<FieldElement> for FieldElement {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        FieldElement::subtract(&self, &other)
    }
}

impl Sub<&FieldElement> for FieldElement {
    type Output = Self;

    #[inline]
    fn sub(self, other: &Self) -> Self {
        FieldElement::subtract(&self, other)
    }
}

impl SubAssign<FieldElement> for FieldElement {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = FieldElement::subtract(self, &other);
    }
}

impl Mul<FieldElement> for FieldElement {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        FieldElement::mul(&self, &other)
    }
}

impl Mul<&FieldElement> for FieldElement {
    type Output = Self;

    #[inline]
    fn mul(self, other: &Self) -> Self {
        FieldElement::mul(&self, other)
    }
}

impl MulAssign<FieldElement> for FieldElement {
    #[inline]
    fn mul_assign(&mut self, other: Self) {
        *self = FieldElement::mul(self, &other);
    }
}

impl Neg for FieldElement {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

#[cfg(feature = "zeroize")]
impl zeroize::Zeroize for FieldElement {
    fn zeroize(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.0);
    }
}
