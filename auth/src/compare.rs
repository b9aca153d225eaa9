use std::hint::black_box;

/// Compare two byte slices without short-circuiting on the first mismatch.
///
/// Running time depends only on the input lengths, never on the position of
/// the first differing byte. Slices of different length compare unequal
/// immediately; lengths are not treated as secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut difference = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        difference |= x ^ y;
    }

    black_box(difference) == 0
}
