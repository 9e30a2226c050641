//! G1 group operations: Jacobian points on y² = x³ + 5 over GF(p).

use super::field::FieldElement;
use crate::Error;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// The curve coefficient b = 5.
pub(crate) const CURVE_B: FieldElement = FieldElement::from_montgomery([
    0xb9f2_c1e8_c8c7_1995,
    0x125d_f8f2_46a3_77fc,
    0x25e6_50d0_4918_8d1c,
    0x043f_ffff_ed86_6f63,
]);

/// A point on the curve, in Jacobian coordinates.
///
/// (X, Y, Z) represents the affine point (X/Z², Y/Z³); the point at
/// infinity is encoded as Z = 0 with X = 0, Y = 1 by convention.
#[derive(Clone, Copy, Debug)]
pub struct CurvePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl CurvePoint {
    /// The point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// The generator of G1.
    ///
    /// ```text
    /// Gₓ = 0x93DE051D 62BF718F F5ED0704 487D01D6 E1E40869 09DC3280 E8C4E481 7C66DDDD
    /// Gᵧ = 0x21FE8DDA 4F21E607 63106512 5C395BBC 1C1C00CB FA602435 0C464CD7 0A3EA616
    /// ```
    pub const GENERATOR: Self = Self {
        x: FieldElement::from_montgomery([
            0x22e9_35e2_9860_501b,
            0xa946_fd5e_0073_282c,
            0xefd0_cec8_17a6_49be,
            0x5129_787c_8691_40b5,
        ]),
        y: FieldElement::from_montgomery([
            0xee77_9649_eb87_f7c7,
            0x1556_3cbd_ec30_a576,
            0x3263_5391_2824_efbf,
            0x7215_7177_63c3_9828,
        ]),
        z: FieldElement::ONE,
    };

    /// Returns true if this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero().into()
    }

    /// Returns `-self`.
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.negate(),
            z: self.z,
        }
    }

    /// Returns `self + b`.
    ///
    /// Handles the infinity and equal-x cases by inspection; the generic
    /// path is the add-2007-bl formula and runs without branching on field
    /// values.
    pub fn add(&self, b: &Self) -> Self {
        if self.is_infinity() {
            return *b;
        }
        if b.is_infinity() {
            return *self;
        }

        // Normalize the points by replacing a = [x1:y1:z1] and b = [x2:y2:z2]
        // by [u1:s1:z1·z2] and [u2:s2:z1·z2]
        // where u1 = x1·z2², s1 = y1·z2³ and u2 = x2·z1², s2 = y2·z1³
        let z12 = self.z.square();
        let z22 = b.z.square();

        let u1 = self.x.mul(&z22);
        let u2 = b.x.mul(&z12);

        let t = b.z.mul(&z22);
        let s1 = self.y.mul(&t);

        let t = self.z.mul(&z12);
        let s2 = b.y.mul(&t);

        // Compute x = (2h)²(s²-u1-u2)
        // where s = (s2-s1)/(u2-u1) is the slope of the line through
        // (u1,s1) and (u2,s2). The extra factor 2h = 2(u2-u1) comes from the
        // value of z below.
        let h = u2.subtract(&u1);
        let x_equal = bool::from(h.is_zero());

        let t = h.double();
        // i = 4h²
        let i = t.square();
        // j = 4h³
        let j = h.mul(&i);

        let t = s2.subtract(&s1);
        let y_equal = bool::from(t.is_zero());
        if x_equal && y_equal {
            return self.double();
        }
        if x_equal {
            // a + (-a)
            return Self::IDENTITY;
        }
        let r = t.double();

        let v = u1.mul(&i);

        // t4 = 4(s2-s1)²
        let t4 = r.square();
        let t = v.double();
        let t6 = t4.subtract(&j);
        let x3 = t6.subtract(&t);

        // Set y = -(2h)³(s1 + s*(x/4h²-u1))
        // This is also
        // y = - 2·s1·j - (s2-s1)(2x - 2i·u1) = r(v-x) - 2·s1·j
        let t = v.subtract(&x3);
        let t4 = s1.mul(&j);
        let t6 = t4.double();
        let t4 = r.mul(&t);
        let y3 = t4.subtract(&t6);

        // Set z = 2(u2-u1)·z1·z2 = 2h·z1·z2
        let t = self.z.add(&b.z);
        let t4 = t.square();
        let t = t4.subtract(&z12);
        let t4 = t.subtract(&z22);
        let z3 = t4.mul(&h);

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Returns `2 * self` via the dbl-2009-l formula.
    pub fn double(&self) -> Self {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();

        let t = self.x.add(&b);
        let t2 = t.square();
        let t = t2.subtract(&a);
        let t2 = t.subtract(&c);

        let d = t2.double();
        let e = a.double().add(&a);
        let f = e.square();

        let t = d.double();
        let x3 = f.subtract(&t);

        let z3 = self.y.mul(&self.z).double();

        // 8c
        let t = c.double().double().double();
        let t2 = e.mul(&d.subtract(&x3));
        let y3 = t2.subtract(&t);

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Returns `[k] self` for a 256-bit big-endian scalar.
    ///
    /// Fixed-window evaluation: 64 radix-16 digits, each resolved with a
    /// masked scan of the precomputed table, independent of the digit value.
    pub fn mul(&self, scalar: &[u8; 32]) -> Self {
        let table = CurvePointTable::new(self);
        let mut q = Self::IDENTITY;
        for byte in scalar.iter() {
            for nibble in [byte >> 4, byte & 0xf] {
                q = q.double().double().double().double();
                q = q.add(&table.select(nibble));
            }
        }
        q
    }

    /// Normalizes to affine form: (X/Z², Y/Z³, 1), or the canonical
    /// (0, 1, 0) for the point at infinity.
    pub fn make_affine(&mut self) {
        if bool::from(self.z.ct_eq(&FieldElement::ONE)) {
            return;
        }
        if self.is_infinity() {
            *self = Self::IDENTITY;
            return;
        }

        let z_inv = self.z.invert().unwrap_or(FieldElement::ZERO);
        let t = self.y.mul(&z_inv);
        let z_inv2 = z_inv.square();
        self.x = self.x.mul(&z_inv2);
        self.y = t.mul(&z_inv2);
        self.z = FieldElement::ONE;
    }

    /// Returns true if this point satisfies the curve equation.
    /// The point at infinity is on the curve.
    pub fn is_on_curve(&self) -> bool {
        let mut p = *self;
        p.make_affine();
        if p.is_infinity() {
            return true;
        }
        let y2 = p.y.square();
        let x3 = p.x.square().mul(&p.x).add(&CURVE_B);
        y2 == x3
    }

    /// Uncompressed 64-byte encoding: affine X ‖ Y, big-endian.
    /// The point at infinity encodes as all zeroes.
    pub fn marshal(&self) -> [u8; 64] {
        let mut p = *self;
        p.make_affine();
        let mut out = [0u8; 64];
        if p.is_infinity() {
            return out;
        }
        out[..32].copy_from_slice(&p.x.to_bytes());
        out[32..].copy_from_slice(&p.y.to_bytes());
        out
    }

    /// Parses an uncompressed 64-byte encoding, validating field membership
    /// and the curve equation.
    pub fn unmarshal(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; 64] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::IDENTITY);
        }

        let x_bytes: [u8; 32] = bytes[..32].try_into().expect("32-byte slice");
        let y_bytes: [u8; 32] = bytes[32..].try_into().expect("32-byte slice");
        let x: FieldElement = Option::from(FieldElement::from_bytes(&x_bytes)).ok_or(Error::MalformedInput)?;
        let y = Option::from(FieldElement::from_bytes(&y_bytes)).ok_or(Error::MalformedInput)?;

        let p = Self {
            x,
            y,
            z: FieldElement::ONE,
        };
        if !p.is_on_curve() {
            return Err(Error::MalformedInput);
        }
        Ok(p)
    }

    /// Compressed 33-byte encoding: sign-of-Y tag (0x02 even, 0x03 odd)
    /// followed by affine X. The point at infinity encodes as all zeroes.
    pub fn marshal_compressed(&self) -> [u8; 33] {
        let mut p = *self;
        p.make_affine();
        let mut out = [0u8; 33];
        if p.is_infinity() {
            return out;
        }
        out[0] = 2 + u8::from(bool::from(p.y.is_odd()));
        out[1..].copy_from_slice(&p.x.to_bytes());
        out
    }

    /// Parses a compressed 33-byte encoding, recovering Y from the curve
    /// equation.
    pub fn unmarshal_compressed(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; 33] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::IDENTITY);
        }
        let tag = bytes[0];
        if tag != 2 && tag != 3 {
            return Err(Error::MalformedInput);
        }

        let x_bytes: [u8; 32] = bytes[1..].try_into().expect("32-byte slice");
        let x: FieldElement = Option::from(FieldElement::from_bytes(&x_bytes)).ok_or(Error::MalformedInput)?;
        let y2 = x.square().mul(&x).add(&CURVE_B);
        let mut y: FieldElement = Option::from(y2.sqrt()).ok_or(Error::MalformedInput)?;
        if bool::from(y.is_odd()) != (tag == 3) {
            y = y.negate();
        }

        Ok(Self {
            x,
            y,
            z: FieldElement::ONE,
        })
    }
}

impl ConditionallySelectable for CurvePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl PartialEq for CurvePoint {
    fn eq(&self, other: &Self) -> bool {
        // Jacobian coordinates are not unique; compare affine encodings.
        self.marshal() == other.marshal()
    }
}

impl Eq for CurvePoint {}

/// Precomputed multiples [1]P through [15]P of a base point.
///
/// Index 0 holds [1]P; the zero multiple is implicit.
pub struct CurvePointTable([CurvePoint; 15]);

impl CurvePointTable {
    /// Builds the table of the first 15 multiples of `p`.
    pub fn new(p: &CurvePoint) -> Self {
        let mut t = [*p; 15];
        for i in (1..15).step_by(2) {
            t[i] = t[i / 2].double();
            t[i + 1] = t[i].add(p);
        }
        Self(t)
    }

    /// Selects the `n`-th multiple, n ∈ [0, 15], scanning every entry.
    /// n = 0 yields the point at infinity.
    ///
    /// # Panics
    ///
    /// If `n` is 16 or larger. An out-of-range index here is a programming
    /// bug that must not produce a silently wrong point.
    pub fn select(&self, n: u8) -> CurvePoint {
        assert!(n < 16, "curve point table index out of range");
        let mut acc = CurvePoint::IDENTITY;
        for (i, entry) in self.0.iter().enumerate() {
            acc.conditional_assign(entry, (i as u8 + 1).ct_eq(&n));
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::{CurvePoint, CurvePointTable};
    use crate::ORDER;
    use hex_literal::hex;

    fn scalar(k: u64) -> [u8; 32] {
        let mut s = [0u8; 32];
        s[24..].copy_from_slice(&k.to_be_bytes());
        s
    }

    #[test]
    fn generator_is_on_curve() {
        assert!(CurvePoint::GENERATOR.is_on_curve());
        assert!(CurvePoint::IDENTITY.is_on_curve());
    }

    #[test]
    fn mul_by_one_and_order() {
        let g = CurvePoint::GENERATOR;
        let mut one_g = g.mul(&scalar(1));
        one_g.make_affine();
        assert_eq!(one_g.marshal(), g.marshal());

        assert!(g.mul(&ORDER).is_infinity());
    }

    #[test]
    fn mul_known_answers() {
        let g = CurvePoint::GENERATOR;
        assert_eq!(
            g.mul(&scalar(3)).marshal(),
            hex!(
                "6ac1f0dd2548250f9ca4a3926e98b10e294b3dca9f52a9be66f106a105602554"
                "71bbfd12e9a21877b25af9f5ab96b9178bc072871e7cf2491291c84942a70aee"
            )
        );
        assert_eq!(
            g.mul(&scalar(0x0123_4567_89ab_cdef)).marshal(),
            hex!(
                "a6309a8bc7a95d8070982df9542f4ea3ad6e8fa01da0f2337c385198c257ac66"
                "73dac4704bcb00a2e19e098c6c22706ba5935d49c15acad9e27d123af082496c"
            )
        );
    }

    #[test]
    fn order_minus_one_is_negation() {
        let mut k = ORDER;
        k[31] -= 1; // order is odd
        assert_eq!(CurvePoint::GENERATOR.mul(&k), CurvePoint::GENERATOR.neg());
        assert_eq!(
            CurvePoint::GENERATOR.mul(&k).marshal(),
            hex!(
                "93de051d62bf718ff5ed0704487d01d6e1e4086909dc3280e8c4e4817c66dddd"
                "94417225b381c0ea72f3463d99556b8905d6927f201acaa6d9294e50d9129f67"
            )
        );
    }

    #[test]
    fn add_agrees_with_double() {
        let g = CurvePoint::GENERATOR;
        assert_eq!(g.add(&g), g.double());
        let g3 = g.double().add(&g);
        assert_eq!(g3, g.mul(&scalar(3)));
    }

    #[test]
    fn identity_laws() {
        let g = CurvePoint::GENERATOR;
        assert_eq!(g.add(&CurvePoint::IDENTITY), g);
        assert_eq!(CurvePoint::IDENTITY.add(&g), g);
        assert!(g.add(&g.neg()).is_infinity());
        assert!(CurvePoint::IDENTITY.double().is_infinity());
    }

    #[test]
    fn associativity() {
        let g = CurvePoint::GENERATOR;
        let a = g.double();
        let b = g.double().double();
        let c = g.double().add(&g);
        assert_eq!(a.add(&b).add(&c), a.add(&b.add(&c)));
    }

    #[test]
    fn on_curve_preserved() {
        let g = CurvePoint::GENERATOR;
        assert!(g.double().is_on_curve());
        assert!(g.add(&g.double()).is_on_curve());
        assert!(g.mul(&scalar(0xdead_beef)).is_on_curve());
    }

    #[test]
    fn marshal_round_trip() {
        let p = CurvePoint::GENERATOR.mul(&scalar(7));
        assert_eq!(CurvePoint::unmarshal(&p.marshal()).unwrap(), p);

        assert_eq!(
            CurvePoint::unmarshal(&CurvePoint::IDENTITY.marshal()).unwrap(),
            CurvePoint::IDENTITY
        );
    }

    #[test]
    fn compressed_round_trip() {
        let p = CurvePoint::GENERATOR.mul(&scalar(7));
        assert_eq!(CurvePoint::unmarshal_compressed(&p.marshal_compressed()).unwrap(), p);

        // The generator's y is even.
        assert_eq!(CurvePoint::GENERATOR.marshal_compressed()[0], 0x02);

        let neg = CurvePoint::GENERATOR.neg();
        assert_eq!(neg.marshal_compressed()[0], 0x03);
        assert_eq!(CurvePoint::unmarshal_compressed(&neg.marshal_compressed()).unwrap(), neg);
    }

    #[test]
    fn unmarshal_rejects_bad_input() {
        assert!(CurvePoint::unmarshal(&[0u8; 63]).is_err());

        // x not in the field
        let mut bad = CurvePoint::GENERATOR.marshal();
        bad[..32].copy_from_slice(&[0xff; 32]);
        assert!(CurvePoint::unmarshal(&bad).is_err());

        // not on the curve
        let mut off = CurvePoint::GENERATOR.marshal();
        off[63] ^= 1;
        assert!(CurvePoint::unmarshal(&off).is_err());

        // unknown compressed tag
        let mut comp = CurvePoint::GENERATOR.marshal_compressed();
        comp[0] = 0x04;
        assert!(CurvePoint::unmarshal_compressed(&comp).is_err());
    }

    #[test]
    fn table_select_matches_multiples() {
        let g = CurvePoint::GENERATOR;
        let table = CurvePointTable::new(&g);
        assert!(table.select(0).is_infinity());
        for n in 1..16u8 {
            assert_eq!(table.select(n), g.mul(&scalar(n as u64)));
        }
    }

    #[test]
    #[should_panic(expected = "table index out of range")]
    fn table_select_rejects_out_of_range() {
        let table = CurvePointTable::new(&CurvePoint::GENERATOR);
        let _ = table.select(16);
    }
}
