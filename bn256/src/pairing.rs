//! The optimal ate pairing e: G1 × G2 → Gt.
//!
//! The Miller loop runs over the NAF of 6u+2 with line functions in
//! Jacobian coordinates, after "Faster Computation of the Tate Pairing"
//! (Costello–Lange–Naehrig). The final exponentiation splits into the easy
//! part (p⁶−1)(p²+1) and the Devegili et al. hard part, with every
//! exponentiation by u running the fixed cyclotomic-squaring chain.

use crate::arithmetic::curve::CurvePoint;
use crate::arithmetic::field::FieldElement;
use crate::arithmetic::fp2::Fp2;
use crate::arithmetic::fp6::{Fp6, XI_2P2_MINUS_2_OVER_3};
use crate::arithmetic::fp12::Fp12;
use crate::arithmetic::twist::TwistPoint;
use crate::Error;

/// NAF digits of 6u+2 = 0x2400000000215D93E, least significant first.
const SIX_U_PLUS_2_NAF: [i8; 66] = [
    0, -1, 0, 0, 0, 0, 1, 0, 1, 0, 0, -1, 0, -1, 0, 0, 0, -1, 0, -1, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 1, 0, 0, 1,
];

/// ξ^(-(p-1)/3), a GF(p) scalar.
const XI_NEG_P_MINUS_1_OVER_3: FieldElement = FieldElement::from_montgomery([
    0x646a_4b5a_4e67_83b9,
    0xd5e4_017f_8d98_0f9d,
    0x8d8b_f6fd_0cdf_e790,
    0x2d4a_c18b_775a_8f7b,
]);

/// ξ^(-(p-1)/2), a GF(p) scalar.
const XI_NEG_P_MINUS_1_OVER_2: FieldElement = FieldElement::from_montgomery([
    0xabba_ac18_a46a_2054,
    0x46ee_5756_1222_c759,
    0x1dae_609f_a0e2_3561,
    0x1df7_113d_ae0a_dc3c,
]);

/// Miller loop working point: Jacobian twist coordinates plus a cached z².
/// The cache is load-bearing here; both line functions consume and refresh
/// it.
#[derive(Clone, Copy)]
struct AtePoint {
    x: Fp2,
    y: Fp2,
    z: Fp2,
    t: Fp2,
}

impl AtePoint {
    fn from_affine(x: Fp2, y: Fp2) -> Self {
        Self {
            x,
            y,
            z: Fp2::ONE,
            t: Fp2::ONE,
        }
    }
}

/// Doubling step: doubles `r` and evaluates the tangent line at `q`.
/// `q` must be affine.
fn line_function_double(r: &AtePoint, q: &CurvePoint) -> (Fp2, Fp2, Fp2, AtePoint) {
    let a = r.x.square();
    let b = r.y.square();
    let c = b.square();

    let mut d = r.x.add(&b).square().sub(&a).sub(&c);
    d = d.double();

    let e = a.double().add(&a);
    let g = e.square();

    let rx = g.sub(&d.double());
    let rz = r.y.add(&r.z).square().sub(&b).sub(&r.t);
    let mut ry = d.sub(&rx).mul(&e);
    let t = c.double().double().double();
    ry = ry.sub(&t);
    let rt = rz.square();

    let t = e.mul(&r.t).double();
    let b_coeff = t.neg().mul_scalar(&q.x);

    let mut a_coeff = r.x.add(&e).square().sub(&a).sub(&g);
    let t = b.double().double();
    a_coeff = a_coeff.sub(&t);

    let c_coeff = rz.mul(&r.t).double().mul_scalar(&q.y);

    (
        a_coeff,
        b_coeff,
        c_coeff,
        AtePoint {
            x: rx,
            y: ry,
            z: rz,
            t: rt,
        },
    )
}

/// Mixed addition step: adds the affine point `p` to `r` and evaluates the
/// chord line at `q`. `r2` caches p.y².
fn line_function_add(r: &AtePoint, p: &AtePoint, q: &CurvePoint, r2: &Fp2) -> (Fp2, Fp2, Fp2, AtePoint) {
    let b = p.x.mul(&r.t);
    let d = p.y.add(&r.z).square().sub(r2).sub(&r.t).mul(&r.t);

    let h = b.sub(&r.x);
    let i = h.square();

    let e = i.double().double();
    let j = h.mul(&e);
    let l1 = d.sub(&r.y).sub(&r.y);
    let v = r.x.mul(&e);

    let rx = l1.square().sub(&j).sub(&v).sub(&v);
    let rz = r.z.add(&h).square().sub(&r.t).sub(&i);

    let t = v.sub(&rx).mul(&l1);
    let t2 = r.y.mul(&j).double();
    let ry = t.sub(&t2);
    let rt = rz.square();

    let t = p.y.add(&rz).square().sub(r2).sub(&rt);
    let t2 = l1.mul(&p.x).double();
    let a_coeff = t2.sub(&t);

    let c_coeff = rz.mul_scalar(&q.y).double();
    let b_coeff = l1.neg().mul_scalar(&q.x).double();

    (
        a_coeff,
        b_coeff,
        c_coeff,
        AtePoint {
            x: rx,
            y: ry,
            z: rz,
            t: rt,
        },
    )
}

/// Folds a line evaluation into the accumulator.
///
/// On this twist the line embeds into GF(p¹²) as (c·v)·w + (b·v + a), so
/// the product needs two sparse GF(p⁶) multiplications.
fn mul_line(ret: &Fp12, a: &Fp2, b: &Fp2, c: &Fp2) -> Fp12 {
    let a6 = Fp6::new(Fp2::ZERO, *b, *a);
    let c6 = Fp6::new(Fp2::ZERO, *c, Fp2::ZERO);

    Fp12::new(
        ret.x.mul(&a6).add(&ret.y.mul(&c6)),
        ret.y.mul(&a6).add(&ret.x.mul(&c6).mul_tau()),
    )
}

/// The Miller loop; both inputs must be non-infinite.
fn miller(q: &TwistPoint, p: &CurvePoint) -> Fp12 {
    let mut ret = Fp12::ONE;

    let mut q_aff = *q;
    q_aff.make_affine();
    let mut p_aff = *p;
    p_aff.make_affine();

    let a_affine = AtePoint::from_affine(q_aff.x, q_aff.y);
    let minus_a = AtePoint::from_affine(q_aff.x, q_aff.y.neg());

    let mut r = a_affine;
    let r2 = q_aff.y.square();

    for i in (1..SIX_U_PLUS_2_NAF.len()).rev() {
        let (a, b, c, new_r) = line_function_double(&r, &p_aff);
        if i != SIX_U_PLUS_2_NAF.len() - 1 {
            ret = ret.square();
        }
        ret = mul_line(&ret, &a, &b, &c);
        r = new_r;

        let (a, b, c, new_r) = match SIX_U_PLUS_2_NAF[i - 1] {
            1 => line_function_add(&r, &a_affine, &p_aff, &r2),
            -1 => line_function_add(&r, &minus_a, &p_aff, &r2),
            _ => continue,
        };
        ret = mul_line(&ret, &a, &b, &c);
        r = new_r;
    }

    // The two Frobenius-twisted correction points π(Q) and -π²(Q).
    let q1 = AtePoint::from_affine(
        q_aff.x.conjugate().mul_scalar(&XI_NEG_P_MINUS_1_OVER_3),
        q_aff.y.conjugate().mul_scalar(&XI_NEG_P_MINUS_1_OVER_2),
    );
    let minus_q2 = AtePoint::from_affine(q_aff.x.mul_scalar(&XI_2P2_MINUS_2_OVER_3), q_aff.y);

    let r2 = q1.y.square();
    let (a, b, c, new_r) = line_function_add(&r, &q1, &p_aff, &r2);
    ret = mul_line(&ret, &a, &b, &c);
    r = new_r;

    let r2 = minus_q2.y.square();
    let (a, b, c, _) = line_function_add(&r, &minus_q2, &p_aff, &r2);
    mul_line(&ret, &a, &b, &c)
}

/// Maps a Miller loop output to the unique coset representative of order
/// dividing n: raises to (p¹² − 1)/n.
fn final_exponentiation(input: &Fp12) -> Fp12 {
    // Easy part: (p⁶ - 1)(p² + 1).
    let mut t1 = input.conjugate().mul(&input.invert());
    t1 = t1.mul(&t1.frobenius_p2());

    // Hard part, Devegili et al. with exponentiations by u done by the
    // fixed cyclotomic chain.
    let fp = t1.frobenius();
    let fp2 = t1.frobenius_p2();
    let fp3 = fp2.frobenius();

    let fu = t1.exp_u();
    let fu2 = fu.exp_u();
    let fu3 = fu2.exp_u();

    let fu2p = fu2.frobenius();
    let fu3p = fu3.frobenius();
    let y2 = fu2.frobenius_p2();

    let y0 = fp.mul(&fp2).mul(&fp3);
    let y1 = t1.conjugate();
    let y5 = fu2.conjugate();
    let y3 = fu.frobenius().conjugate();
    let y4 = fu.mul(&fu2p).conjugate();
    let y6 = fu3.mul(&fu3p).conjugate();

    let mut t0 = y6.special_square().mul(&y4).mul(&y5);
    let mut t1 = y3.mul(&y5).mul(&t0);
    t0 = t0.mul(&y2);
    t1 = t1.special_square().mul(&t0).special_square();
    t0 = t1.mul(&y1);
    t1 = t1.mul(&y0);
    t0.special_square().mul(&t1)
}

/// An element of the pairing target group Gt ⊂ GF(p¹²)*.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Gt(pub(crate) Fp12);

impl Gt {
    /// The group identity.
    pub const ONE: Self = Self(Fp12::ONE);

    /// Group operation (multiplication in GF(p¹²)).
    pub fn mul(&self, rhs: &Self) -> Self {
        Self(self.0.mul(&rhs.0))
    }

    /// The group inverse, which for unitary pairing values is conjugation.
    pub fn invert(&self) -> Self {
        Self(self.0.conjugate())
    }

    /// Returns `self^k` for a 256-bit big-endian exponent.
    ///
    /// **This operation is variable time with respect to the exponent.**
    pub fn pow_vartime(&self, k: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (w, chunk) in limbs.iter_mut().zip(k.chunks_exact(8).rev()) {
            *w = u64::from_be_bytes(chunk.try_into().expect("8-byte chunk"));
        }
        Self(self.0.pow_vartime(&limbs))
    }

    /// 384-byte encoding: the twelve GF(p) coefficients, big-endian, in the
    /// order x.x.u, x.x.1, x.y.u, x.y.1, x.z.u, x.z.1, then the same for y.
    pub fn marshal(&self) -> [u8; 384] {
        let coeffs = [
            self.0.x.x.x,
            self.0.x.x.y,
            self.0.x.y.x,
            self.0.x.y.y,
            self.0.x.z.x,
            self.0.x.z.y,
            self.0.y.x.x,
            self.0.y.x.y,
            self.0.y.y.x,
            self.0.y.y.y,
            self.0.y.z.x,
            self.0.y.z.y,
        ];
        let mut out = [0u8; 384];
        for (chunk, c) in out.chunks_exact_mut(32).zip(coeffs.iter()) {
            chunk.copy_from_slice(&c.to_bytes());
        }
        out
    }

    /// Parses a 384-byte encoding, rejecting out-of-field coefficients.
    pub fn unmarshal(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; 384] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        let mut coeffs = [FieldElement::ZERO; 12];
        for (c, chunk) in coeffs.iter_mut().zip(bytes.chunks_exact(32)) {
            let chunk: [u8; 32] = chunk.try_into().expect("32-byte chunk");
            *c = Option::from(FieldElement::from_bytes(&chunk)).ok_or(Error::MalformedInput)?;
        }
        Ok(Self(Fp12::new(
            Fp6::new(
                Fp2::new(coeffs[0], coeffs[1]),
                Fp2::new(coeffs[2], coeffs[3]),
                Fp2::new(coeffs[4], coeffs[5]),
            ),
            Fp6::new(
                Fp2::new(coeffs[6], coeffs[7]),
                Fp2::new(coeffs[8], coeffs[9]),
                Fp2::new(coeffs[10], coeffs[11]),
            ),
        )))
    }
}

/// Computes the optimal ate pairing e(p, q).
///
/// Either input at infinity yields the identity of Gt.
pub fn pairing(p: &CurvePoint, q: &TwistPoint) -> Gt {
    if p.is_infinity() || q.is_infinity() {
        return Gt::ONE;
    }
    Gt(final_exponentiation(&miller(q, p)))
}

#[cfg(test)]
mod tests {
    use super::{pairing, Gt};
    use crate::arithmetic::curve::CurvePoint;
    use crate::arithmetic::twist::TwistPoint;

    fn scalar(k: u64) -> [u8; 32] {
        let mut s = [0u8; 32];
        s[24..].copy_from_slice(&k.to_be_bytes());
        s
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(pairing(&CurvePoint::IDENTITY, &TwistPoint::GENERATOR), Gt::ONE);
        assert_eq!(pairing(&CurvePoint::GENERATOR, &TwistPoint::IDENTITY), Gt::ONE);
    }

    #[test]
    fn non_degenerate() {
        let e = pairing(&CurvePoint::GENERATOR, &TwistPoint::GENERATOR);
        assert_ne!(e, Gt::ONE);
    }

    #[test]
    fn inverse_cancels() {
        let e = pairing(&CurvePoint::GENERATOR, &TwistPoint::GENERATOR);
        assert_eq!(e.mul(&e.invert()), Gt::ONE);
    }

    #[test]
    fn bilinear_in_g1() {
        let e = pairing(&CurvePoint::GENERATOR, &TwistPoint::GENERATOR);
        let e2 = pairing(
            &CurvePoint::GENERATOR.mul(&scalar(2)),
            &TwistPoint::GENERATOR,
        );
        assert_eq!(e2, e.mul(&e));
    }
}
