//! The SM4 S-box, evaluated without table lookups.
//!
//! S(x) = A(inv(A(x))) where A is the affine map with circulant matrix
//! rows rotr^i(0xD3) plus the constant 0xD3, and inv is inversion in
//! GF(2⁸)/(x⁸+x⁷+x⁶+x⁵+x⁴+x²+1), with inv(0) = 0.

/// Low byte of the reduction polynomial x⁸+x⁷+x⁶+x⁵+x⁴+x²+1.
const POLY: u8 = 0xf5;

/// First matrix row and affine constant of the S-box decomposition.
const AFFINE_ROW: u8 = 0xd3;
const AFFINE_CONST: u8 = 0xd3;

/// Branch-free carryless multiplication in the S-box field.
fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut r = 0u8;
    for _ in 0..8 {
        r ^= a & 0u8.wrapping_sub(b & 1);
        b >>= 1;
        let reduce = 0u8.wrapping_sub(a >> 7);
        a <<= 1;
        a ^= reduce & POLY;
    }
    r
}

/// Inversion by Fermat: x²⁵⁴ with a fixed square-and-multiply chain.
/// Maps zero to zero.
fn gf_inv(x: u8) -> u8 {
    let x2 = gf_mul(x, x);
    let x3 = gf_mul(x2, x);
    let x6 = gf_mul(x3, x3);
    let x7 = gf_mul(x6, x);
    let x14 = gf_mul(x7, x7);
    let x15 = gf_mul(x14, x);
    let x30 = gf_mul(x15, x15);
    let x31 = gf_mul(x30, x);
    let x62 = gf_mul(x31, x31);
    let x63 = gf_mul(x62, x);
    let x126 = gf_mul(x63, x63);
    let x127 = gf_mul(x126, x);
    gf_mul(x127, x127)
}

/// The matrix half of the affine map; bit 7 of the output comes from the
/// first row.
fn affine(x: u8) -> u8 {
    let mut out = 0u8;
    let mut row = AFFINE_ROW;
    for i in 0..8 {
        let parity = ((row & x).count_ones() & 1) as u8;
        out |= parity << (7 - i);
        row = row.rotate_right(1);
    }
    out
}

/// The SM4 S-box.
pub(crate) fn sbox(x: u8) -> u8 {
    affine(gf_inv(affine(x) ^ AFFINE_CONST)) ^ AFFINE_CONST
}

#[cfg(test)]
mod tests {
    use super::{gf_inv, gf_mul, sbox};

    #[test]
    fn known_entries() {
        // Spot checks against the published S-box table.
        assert_eq!(sbox(0x00), 0xd6);
        assert_eq!(sbox(0x01), 0x90);
        assert_eq!(sbox(0x0f), 0x05);
        assert_eq!(sbox(0x10), 0x2b);
        assert_eq!(sbox(0x80), 0xea);
        assert_eq!(sbox(0xab), 0xab);
        assert_eq!(sbox(0xff), 0x48);
    }

    #[test]
    fn sbox_is_a_permutation() {
        let mut seen = [false; 256];
        for x in 0..=255u8 {
            let s = sbox(x) as usize;
            assert!(!seen[s]);
            seen[s] = true;
        }
    }

    #[test]
    fn field_inversion() {
        for x in 1..=255u8 {
            assert_eq!(gf_mul(x, gf_inv(x)), 1);
        }
        assert_eq!(gf_inv(0), 0);
    }
}
