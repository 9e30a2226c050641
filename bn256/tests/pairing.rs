//! Pairing engine tests: known-answer vector, bilinearity, and the Gt
//! byte interface.

use bn256::{pairing, CurvePoint, Gt, TwistPoint, ORDER};
use hex_literal::hex;

/// e(G1, G2) for the two group generators, twelve GF(p) coefficients
/// big-endian.
const PAIRING_KAT: [u8; 384] = hex!(
    "256943fbdb2bf87ab91ae7fbeaff14e146cf7e2279b9d155d13461e09b22f523"
    "0167b0280051495c6af1ec23ba2cd2ff1cdcdeca461a5ab0b5449e9091308310"
    "8ffe1c0e9de45fd0fed790ac26be91f6b3f0a49c084fe29a3fb6ed288ad7994d"
    "1664a1366beb3196f0443e15f5f9042a947354a5678430d45ba031cff06db927"
    "7fc6eb2aa771d99c9234fddd31752edfd60723e05a4ebfdeb5c33fbd47e0cf06"
    "6fa6b6fa6dd6b6d3b19a959a110e748154eef796dc0fc2dd766ea414de786968"
    "082cde173022da8cd09b28a2d80a8cee53894436a52007f978dc37f36116d39b"
    "3fa7ed741eaed99a58f53e3df82df7ccd3407bcc7b1d44a9441920ced5fb824f"
    "5e7addaddf7fbfe16291b4e89af50b8217ddc47ba3cba833c6e77c3fb027685e"
    "79d0c8337072c93fef482bb055f44d6247ccac8e8e12525854b3566236337ebe"
    "7f7c6d52b475e6aaa827fdc5b4175ac6929320f782d998f86b6b57cda42a0426"
    "36a699de7c136f78eee2dbac4ca9727bff0cee02ee920f5822e65ea170aa9669"
);

fn scalar(k: u64) -> [u8; 32] {
    let mut s = [0u8; 32];
    s[24..].copy_from_slice(&k.to_be_bytes());
    s
}

#[test]
fn generator_pairing_known_answer() {
    let e = pairing(&CurvePoint::GENERATOR, &TwistPoint::GENERATOR);
    assert_eq!(e.marshal(), PAIRING_KAT);
}

#[test]
fn gt_round_trip() {
    let e = pairing(&CurvePoint::GENERATOR, &TwistPoint::GENERATOR);
    assert_eq!(Gt::unmarshal(&e.marshal()).unwrap(), e);

    assert!(Gt::unmarshal(&[0u8; 383]).is_err());
    let mut bad = PAIRING_KAT;
    bad[..32].copy_from_slice(&[0xff; 32]);
    assert!(Gt::unmarshal(&bad).is_err());
}

#[test]
fn bilinearity() {
    let p = CurvePoint::GENERATOR;
    let q = TwistPoint::GENERATOR;
    let e = pairing(&p, &q);

    let a = 123_456_789u64;
    let b = 987_654_321u64;

    let lhs = pairing(&p.mul(&scalar(a)), &q.mul(&scalar(b)));
    let rhs = e.pow_vartime(&scalar(a * b));
    assert_eq!(lhs, rhs);

    // Moving the scalar between arguments changes nothing.
    assert_eq!(
        pairing(&p.mul(&scalar(a)), &q),
        pairing(&p, &q.mul(&scalar(a)))
    );
}

#[test]
fn pairing_has_group_order() {
    let e = pairing(&CurvePoint::GENERATOR, &TwistPoint::GENERATOR);
    assert_ne!(e, Gt::ONE);
    assert_eq!(e.pow_vartime(&ORDER), Gt::ONE);
}

#[test]
fn pairing_of_negated_point_is_inverse() {
    let e = pairing(&CurvePoint::GENERATOR, &TwistPoint::GENERATOR);
    let e_neg = pairing(&CurvePoint::GENERATOR.neg(), &TwistPoint::GENERATOR);
    assert_eq!(e.mul(&e_neg), Gt::ONE);
}
