#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![doc = include_str!("../README.md")]

pub use cipher;

use cipher::{
    consts::{U16, U8},
    inout::InOut,
    AlgorithmName, Block, BlockBackend, BlockCipher, BlockClosure, BlockDecrypt, BlockEncrypt,
    BlockSizeUser, Key, KeyInit, KeySizeUser, ParBlocks, ParBlocksSizeUser,
};
use core::fmt;

#[cfg(feature = "zeroize")]
use cipher::zeroize::{Zeroize, ZeroizeOnDrop};

mod sbox;

use sbox::sbox;

/// System parameter FK.
const FK: [u32; 4] = [0xa3b1_bac6, 0x56aa_3350, 0x677d_9197, 0xb270_22dc];

/// Fixed key-schedule constants CK; CK[i] byte j is (4i+j)·7 mod 256.
const CK: [u32; 32] = [
    0x0007_0e15, 0x1c23_2a31, 0x383f_464d, 0x545b_6269, 0x7077_7e85, 0x8c93_9aa1, 0xa8af_b6bd,
    0xc4cb_d2d9, 0xe0e7_eef5, 0xfc03_0a11, 0x181f_262d, 0x343b_4249, 0x5057_5e65, 0x6c73_7a81,
    0x888f_969d, 0xa4ab_b2b9, 0xc0c7_ced5, 0xdce3_eaf1, 0xf8ff_060d, 0x141b_2229, 0x3037_3e45,
    0x4c53_5a61, 0x686f_767d, 0x848b_9299, 0xa0a7_aeb5, 0xbcc3_cad1, 0xd8df_e6ed, 0xf4fb_0209,
    0x1e25_2c33, 0x3a41_484f, 0x565d_646b, 0x7279_8087,
];

/// Nonlinear word substitution: the S-box applied to each byte.
#[inline(always)]
fn tau(x: u32) -> u32 {
    let b = x.to_be_bytes();
    u32::from_be_bytes([sbox(b[0]), sbox(b[1]), sbox(b[2]), sbox(b[3])])
}

/// The round transform T: S-box then the linear map L.
#[inline(always)]
fn t_round(x: u32) -> u32 {
    let b = tau(x);
    b ^ b.rotate_left(2) ^ b.rotate_left(10) ^ b.rotate_left(18) ^ b.rotate_left(24)
}

/// The key-schedule transform T': S-box then the linear map L'.
#[inline(always)]
fn t_key(x: u32) -> u32 {
    let b = tau(x);
    b ^ b.rotate_left(13) ^ b.rotate_left(23)
}

/// Derives the 32 encryption round keys from a 128-bit key.
fn expand_key(key: &[u8; 16]) -> [u32; 32] {
    let mut k = [0u32; 4];
    for (ki, (chunk, fk)) in k
        .iter_mut()
        .zip(key.chunks_exact(4).zip(FK.iter()))
    {
        *ki = u32::from_be_bytes(chunk.try_into().expect("4-byte chunk")) ^ fk;
    }

    let mut rk = [0u32; 32];
    for i in 0..32 {
        let next = k[0] ^ t_key(k[1] ^ k[2] ^ k[3] ^ CK[i]);
        rk[i] = next;
        k = [k[1], k[2], k[3], next];
    }
    rk
}

/// Runs the 32-round cipher over one block with the given round keys.
/// Decryption is the same function with the schedule reversed.
fn cipher_block(rk: &[u32; 32], block: &[u8; 16]) -> [u8; 16] {
    let mut x = [0u32; 4];
    for (xi, chunk) in x.iter_mut().zip(block.chunks_exact(4)) {
        *xi = u32::from_be_bytes(chunk.try_into().expect("4-byte chunk"));
    }

    for key in rk {
        let next = x[0] ^ t_round(x[1] ^ x[2] ^ x[3] ^ key);
        x = [x[1], x[2], x[3], next];
    }

    let mut out = [0u8; 16];
    for (chunk, xi) in out.chunks_exact_mut(4).zip(x.iter().rev()) {
        chunk.copy_from_slice(&xi.to_be_bytes());
    }
    out
}

/// Runs the 32 rounds over `N` blocks in lockstep. Word position j of every
/// block lives in lane array `x[j]`, so each round touches all blocks
/// before moving on; the output is bit-identical to the per-block path.
fn cipher_blocks<const N: usize>(rk: &[u32; 32], blocks: &[[u8; 16]; N]) -> [[u8; 16]; N] {
    let mut x = [[0u32; N]; 4];
    for (j, block) in blocks.iter().enumerate() {
        for (i, chunk) in block.chunks_exact(4).enumerate() {
            x[i][j] = u32::from_be_bytes(chunk.try_into().expect("4-byte chunk"));
        }
    }

    for key in rk {
        for j in 0..N {
            let next = x[0][j] ^ t_round(x[1][j] ^ x[2][j] ^ x[3][j] ^ key);
            x[0][j] = x[1][j];
            x[1][j] = x[2][j];
            x[2][j] = x[3][j];
            x[3][j] = next;
        }
    }

    let mut out = [[0u8; 16]; N];
    for (j, block) in out.iter_mut().enumerate() {
        for (i, chunk) in block.chunks_exact_mut(4).enumerate() {
            chunk.copy_from_slice(&x[3 - i][j].to_be_bytes());
        }
    }
    out
}

/// The SM4 block cipher.
#[derive(Clone)]
pub struct Sm4 {
    rk_enc: [u32; 32],
    rk_dec: [u32; 32],
}

impl KeySizeUser for Sm4 {
    type KeySize = U16;
}

impl KeyInit for Sm4 {
    fn new(key: &Key<Self>) -> Self {
        let rk_enc = expand_key(key.as_slice().try_into().expect("16-byte key"));
        let mut rk_dec = rk_enc;
        rk_dec.reverse();
        Self { rk_enc, rk_dec }
    }
}

impl BlockSizeUser for Sm4 {
    type BlockSize = U16;
}

impl BlockCipher for Sm4 {}

impl BlockEncrypt for Sm4 {
    fn encrypt_with_backend(&self, f: impl BlockClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut Sm4Backend(&self.rk_enc))
    }
}

impl BlockDecrypt for Sm4 {
    fn decrypt_with_backend(&self, f: impl BlockClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut Sm4Backend(&self.rk_dec))
    }
}

impl AlgorithmName for Sm4 {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sm4")
    }
}

impl fmt::Debug for Sm4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sm4 { ... }")
    }
}

#[cfg(feature = "zeroize")]
impl Drop for Sm4 {
    fn drop(&mut self) {
        self.rk_enc.zeroize();
        self.rk_dec.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for Sm4 {}

/// Backend running one direction of the cipher; eight blocks per parallel
/// call.
struct Sm4Backend<'a>(&'a [u32; 32]);

impl BlockSizeUser for Sm4Backend<'_> {
    type BlockSize = U16;
}

impl ParBlocksSizeUser for Sm4Backend<'_> {
    type ParBlocksSize = U8;
}

impl BlockBackend for Sm4Backend<'_> {
    #[inline(always)]
    fn proc_block(&mut self, mut block: InOut<'_, '_, Block<Self>>) {
        let input: [u8; 16] = block.get_in().as_slice().try_into().expect("16-byte block");
        let out = cipher_block(self.0, &input);
        block.get_out().copy_from_slice(&out);
    }

    #[inline(always)]
    fn proc_par_blocks(&mut self, mut blocks: InOut<'_, '_, ParBlocks<Self>>) {
        let mut input = [[0u8; 16]; 8];
        for (lane, block) in input.iter_mut().zip(blocks.get_in().iter()) {
            lane.copy_from_slice(block.as_slice());
        }
        let out = cipher_blocks(self.0, &input);
        for (block, lane) in blocks.get_out().iter_mut().zip(out.iter()) {
            block.copy_from_slice(lane);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{cipher_block, cipher_blocks, expand_key};
    use hex_literal::hex;

    const KEY: [u8; 16] = hex!("0123456789ABCDEFFEDCBA9876543210");
    const PLAINTEXT: [u8; 16] = hex!("0123456789ABCDEFFEDCBA9876543210");
    const CIPHERTEXT: [u8; 16] = hex!("681EDF34D206965E86B3E94F536E4246");

    #[test]
    fn round_keys() {
        // First and last round keys from the GB/T 32907 worked example.
        let rk = expand_key(&KEY);
        assert_eq!(rk[0], 0xf121_86f9);
        assert_eq!(rk[31], 0x9124_a012);
    }

    #[test]
    fn standard_vector() {
        let rk = expand_key(&KEY);
        assert_eq!(cipher_block(&rk, &PLAINTEXT), CIPHERTEXT);
    }

    #[test]
    fn decrypt_inverts_encrypt() {
        let rk = expand_key(&KEY);
        let mut rk_dec = rk;
        rk_dec.reverse();
        assert_eq!(cipher_block(&rk_dec, &CIPHERTEXT), PLAINTEXT);
    }

    #[test]
    fn parallel_matches_scalar() {
        let rk = expand_key(&KEY);
        let mut blocks = [[0u8; 16]; 8];
        for (i, b) in blocks.iter_mut().enumerate() {
            b.copy_from_slice(&PLAINTEXT);
            b[0] ^= i as u8;
        }
        let par = cipher_blocks(&rk, &blocks);
        for (b, p) in blocks.iter().zip(par.iter()) {
            assert_eq!(cipher_block(&rk, b), *p);
        }

        let blocks4: [[u8; 16]; 4] = blocks[..4].try_into().unwrap();
        let par4 = cipher_blocks(&rk, &blocks4);
        assert_eq!(&par[..4], &par4[..]);
    }

    #[test]
    #[ignore = "1,000,000-iteration vector; slow with the algebraic S-box"]
    fn million_iterations() {
        let rk = expand_key(&KEY);
        let mut x = PLAINTEXT;
        for _ in 0..1_000_000 {
            x = cipher_block(&rk, &x);
        }
        assert_eq!(x, hex!("595298C7C6FD271F0402F804C33D3F66"));
    }
}
