//! G2 group operations: Jacobian points on the sextic twist
//! y² = x³ + 5ξ over GF(p²).

use super::field::FieldElement;
use super::fp2::Fp2;
use crate::Error;
use subtle::{Choice, ConditionallySelectable};

/// The twist coefficient b' = 5ξ.
pub(crate) const TWIST_B: Fp2 = Fp2::new(
    FieldElement::from_montgomery([
        0xb9f2_c1e8_c8c7_1995,
        0x125d_f8f2_46a3_77fc,
        0x25e6_50d0_4918_8d1c,
        0x043f_ffff_ed86_6f63,
    ]),
    FieldElement::ZERO,
);

/// A point on the twist, in Jacobian coordinates over GF(p²).
///
/// The group G2 is the subgroup of order-n points; the generator below
/// generates it.
#[derive(Clone, Copy, Debug)]
pub struct TwistPoint {
    pub(crate) x: Fp2,
    pub(crate) y: Fp2,
    pub(crate) z: Fp2,
}

impl TwistPoint {
    /// The point at infinity.
    pub const IDENTITY: Self = Self {
        x: Fp2::ZERO,
        y: Fp2::ONE,
        z: Fp2::ZERO,
    };

    /// The generator of G2.
    pub const GENERATOR: Self = Self {
        x: Fp2::new(
            FieldElement::from_montgomery([
                0xdb6d_b482_2750_a8a6,
                0x84c6_135a_5121_f134,
                0x1874_032f_8879_1d41,
                0x9051_12f2_b85f_3a37,
            ]),
            FieldElement::from_montgomery([
                0x2602_26a6_8ce2_da8f,
                0x7ee5_645e_dbf6_c06b,
                0xf8f5_7c82_b149_5444,
                0x61fc_f018_bc47_c4d1,
            ]),
        ),
        y: Fp2::new(
            FieldElement::from_montgomery([
                0xf7b8_2dac_4c89_bfbb,
                0x3706_f3f6_a49d_c12f,
                0x1e29_de93_d3ee_f769,
                0x81e4_48c3_c76a_5d53,
            ]),
            FieldElement::from_montgomery([
                0xc03f_138f_9171_c24a,
                0x92fb_ab45_a15a_3ca7,
                0x2445_561e_2ff7_7cdb,
                0x1084_95e0_c0f6_2ece,
            ]),
        ),
        z: Fp2::ONE,
    };

    /// Returns true if this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero().into()
    }

    /// Returns `-self`.
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
        }
    }

    /// Returns `self + b`; the same formula family as the base curve,
    /// lifted to GF(p²).
    pub fn add(&self, b: &Self) -> Self {
        if self.is_infinity() {
            return *b;
        }
        if b.is_infinity() {
            return *self;
        }

        let z12 = self.z.square();
        let z22 = b.z.square();

        let u1 = self.x.mul(&z22);
        let u2 = b.x.mul(&z12);

        let t = b.z.mul(&z22);
        let s1 = self.y.mul(&t);

        let t = self.z.mul(&z12);
        let s2 = b.y.mul(&t);

        let h = u2.sub(&u1);
        let x_equal = bool::from(h.is_zero());

        let t = h.double();
        let i = t.square();
        let j = h.mul(&i);

        let t = s2.sub(&s1);
        let y_equal = bool::from(t.is_zero());
        if x_equal && y_equal {
            return self.double();
        }
        if x_equal {
            return Self::IDENTITY;
        }
        let r = t.double();

        let v = u1.mul(&i);

        let t4 = r.square();
        let t = v.double();
        let t6 = t4.sub(&j);
        let x3 = t6.sub(&t);

        let t = v.sub(&x3);
        let t4 = s1.mul(&j);
        let t6 = t4.double();
        let t4 = r.mul(&t);
        let y3 = t4.sub(&t6);

        let t = self.z.add(&b.z);
        let t4 = t.square();
        let t = t4.sub(&z12);
        let t4 = t.sub(&z22);
        let z3 = t4.mul(&h);

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Returns `2 * self`.
    pub fn double(&self) -> Self {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();

        let t = self.x.add(&b);
        let t2 = t.square();
        let t = t2.sub(&a);
        let t2 = t.sub(&c);

        let d = t2.double();
        let e = a.double().add(&a);
        let f = e.square();

        let t = d.double();
        let x3 = f.sub(&t);

        let z3 = self.y.mul(&self.z).double();

        let t = c.double().double().double();
        let t2 = e.mul(&d.sub(&x3));
        let y3 = t2.sub(&t);

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Returns `[k] self` for a 256-bit big-endian scalar.
    ///
    /// Fixed 256-iteration double-and-add; the add result is folded in by
    /// masked selection rather than a branch on the scalar bit.
    pub fn mul(&self, scalar: &[u8; 32]) -> Self {
        let mut sum = Self::IDENTITY;
        for byte in scalar.iter() {
            for i in (0..8).rev() {
                sum = sum.double();
                let t = sum.add(self);
                sum.conditional_assign(&t, Choice::from((byte >> i) & 1));
            }
        }
        sum
    }

    /// Normalizes to affine form, canonicalizing the point at infinity.
    pub fn make_affine(&mut self) {
        if bool::from(self.z.sub(&Fp2::ONE).is_zero()) {
            return;
        }
        if self.is_infinity() {
            *self = Self::IDENTITY;
            return;
        }

        let z_inv = self.z.invert();
        let t = self.y.mul(&z_inv);
        let z_inv2 = z_inv.square();
        self.x = self.x.mul(&z_inv2);
        self.y = t.mul(&z_inv2);
        self.z = Fp2::ONE;
    }

    /// Returns true if this point satisfies the twist equation.
    pub fn is_on_curve(&self) -> bool {
        let mut p = *self;
        p.make_affine();
        if p.is_infinity() {
            return true;
        }
        let y2 = p.y.square();
        let x3 = p.x.square().mul(&p.x).add(&TWIST_B);
        y2 == x3
    }

    /// Uncompressed 128-byte encoding: affine X.u ‖ X.1 ‖ Y.u ‖ Y.1,
    /// each coefficient big-endian. Infinity encodes as all zeroes.
    pub fn marshal(&self) -> [u8; 128] {
        let mut p = *self;
        p.make_affine();
        let mut out = [0u8; 128];
        if p.is_infinity() {
            return out;
        }
        out[..32].copy_from_slice(&p.x.x.to_bytes());
        out[32..64].copy_from_slice(&p.x.y.to_bytes());
        out[64..96].copy_from_slice(&p.y.x.to_bytes());
        out[96..].copy_from_slice(&p.y.y.to_bytes());
        out
    }

    /// Parses an uncompressed 128-byte encoding, validating field
    /// membership and the twist equation.
    pub fn unmarshal(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; 128] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::IDENTITY);
        }

        let mut coords = [FieldElement::ZERO; 4];
        for (c, chunk) in coords.iter_mut().zip(bytes.chunks_exact(32)) {
            let chunk: [u8; 32] = chunk.try_into().expect("32-byte chunk");
            *c = Option::from(FieldElement::from_bytes(&chunk)).ok_or(Error::MalformedInput)?;
        }

        let p = Self {
            x: Fp2::new(coords[0], coords[1]),
            y: Fp2::new(coords[2], coords[3]),
            z: Fp2::ONE,
        };
        if !p.is_on_curve() {
            return Err(Error::MalformedInput);
        }
        Ok(p)
    }
}

impl ConditionallySelectable for TwistPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp2::conditional_select(&a.x, &b.x, choice),
            y: Fp2::conditional_select(&a.y, &b.y, choice),
            z: Fp2::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl PartialEq for TwistPoint {
    fn eq(&self, other: &Self) -> bool {
        self.marshal() == other.marshal()
    }
}

impl Eq for TwistPoint {}
