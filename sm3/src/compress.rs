//! The SM3 compression function.

/// Round constant, rotated by the round index during compression.
#[inline(always)]
fn t(j: usize) -> u32 {
    if j < 16 {
        0x79cc_4519
    } else {
        0x7a87_9d8a
    }
}

#[inline(always)]
fn ff(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (x & z) | (y & z)
    }
}

#[inline(always)]
fn gg(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (!x & z)
    }
}

/// Permutation P0 applied to the state word TT2.
#[inline(always)]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

/// Permutation P1 used by the message schedule.
#[inline(always)]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

/// Compresses one 64-byte block into the state.
pub(crate) fn compress(h: &mut [u32; 8], block: &[u8; 64]) {
    // Message expansion: W[0..68]; W'[j] = W[j] ^ W[j+4] is formed on the
    // fly in the round loop.
    let mut w = [0u32; 68];
    for (wi, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
        *wi = u32::from_be_bytes(chunk.try_into().expect("4-byte chunk"));
    }
    for j in 16..68 {
        w[j] = p1(w[j - 16] ^ w[j - 9] ^ w[j - 3].rotate_left(15))
            ^ w[j - 13].rotate_left(7)
            ^ w[j - 6];
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut hh] = *h;

    for j in 0..64 {
        let a12 = a.rotate_left(12);
        let ss1 = a12
            .wrapping_add(e)
            .wrapping_add(t(j).rotate_left(j as u32))
            .rotate_left(7);
        let ss2 = ss1 ^ a12;
        let wp = w[j] ^ w[j + 4];
        let tt1 = ff(j, a, b, c)
            .wrapping_add(d)
            .wrapping_add(ss2)
            .wrapping_add(wp);
        let tt2 = gg(j, e, f, g)
            .wrapping_add(hh)
            .wrapping_add(ss1)
            .wrapping_add(w[j]);
        d = c;
        c = b.rotate_left(9);
        b = a;
        a = tt1;
        hh = g;
        g = f.rotate_left(19);
        f = e;
        e = p0(tt2);
    }

    h[0] ^= a;
    h[1] ^= b;
    h[2] ^= c;
    h[3] ^= d;
    h[4] ^= e;
    h[5] ^= f;
    h[6] ^= g;
    h[7] ^= hh;
}
