//! SM3 known-answer and streaming tests.

use hex_literal::hex;
use sm3::{Digest, Sm3};

const ABC_DIGEST: [u8; 32] =
    hex!("66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0");

/// "abcd" repeated 16 times, the second GB/T 32905 vector.
const ABCD16_DIGEST: [u8; 32] =
    hex!("debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732");

#[test]
fn sm3_abc() {
    assert_eq!(Sm3::digest(b"abc")[..], ABC_DIGEST[..]);
}

#[test]
fn sm3_abcd_times_16() {
    let mut msg = Vec::new();
    for _ in 0..16 {
        msg.extend_from_slice(b"abcd");
    }
    assert_eq!(Sm3::digest(&msg)[..], ABCD16_DIGEST[..]);
}

#[test]
fn sm3_abc_times_64() {
    // Three full blocks of input.
    let mut msg = Vec::new();
    for _ in 0..64 {
        msg.extend_from_slice(b"abc");
    }
    assert_eq!(
        Sm3::digest(&msg)[..],
        hex!("b8109d54b9e5848db6230419ea2958c63f7afd474f9f5239dfa69c3f632696b7")[..]
    );
}

#[test]
fn sm3_empty() {
    // Digest of the empty message, cross-checked against other
    // implementations.
    assert_eq!(
        Sm3::digest(b"")[..],
        hex!("1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b")[..]
    );
}

#[test]
fn chunk_boundaries_do_not_matter() {
    let msg = b"The quick brown fox jumps over the lazy dog, repeatedly and at length";
    let whole = Sm3::digest(msg);

    for split in [1, 7, 63, 64, 65, msg.len() - 1] {
        let mut hasher = Sm3::new();
        hasher.update(&msg[..split]);
        hasher.update(&msg[split..]);
        assert_eq!(hasher.finalize(), whole);
    }

    let mut bytewise = Sm3::new();
    for b in msg {
        bytewise.update([*b]);
    }
    assert_eq!(bytewise.finalize(), whole);
}

#[test]
fn multi_block_boundary() {
    // Exactly one block of input forces the length padding into a second
    // block.
    let block = [0x61u8; 64];
    let mut hasher = Sm3::new();
    hasher.update(block);
    let split = hasher.finalize();
    assert_eq!(split, Sm3::digest(block));
}
