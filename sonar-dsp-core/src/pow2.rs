//! Power-of-two sizing helpers.
//!
//! Zero is never treated as a power of two.

/// `true` if `n` is a non-zero power of two.
#[inline]
pub const fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// `log2(n)` when `n` is a power of two.
#[inline]
pub const fn ilog2_exact(n: usize) -> Option<u32> {
    if is_power_of_two(n) {
        Some(n.trailing_zeros())
    } else {
        None
    }
}

/// Smallest power of two that holds `n0 + n1` samples.
///
/// This is the transform length at which a circular convolution of signals
/// of lengths `n0` and `n1` carries no wraparound.
pub const fn min_pow2_for(n0: usize, n1: usize) -> usize {
    let mut i = 1usize;
    while i < n0 + n1 {
        i <<= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_powers_of_two() {
        assert!(!is_power_of_two(0));
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(2));
        assert!(is_power_of_two(4096));
        assert!(!is_power_of_two(3));
        assert!(!is_power_of_two(6000));
    }

    #[test]
    fn exact_log() {
        assert_eq!(ilog2_exact(1), Some(0));
        assert_eq!(ilog2_exact(8), Some(3));
        assert_eq!(ilog2_exact(12), None);
        assert_eq!(ilog2_exact(0), None);
    }

    #[test]
    fn smallest_cover() {
        assert_eq!(min_pow2_for(0, 1), 1);
        assert_eq!(min_pow2_for(3, 5), 8);
        assert_eq!(min_pow2_for(4, 5), 16);
        assert_eq!(min_pow2_for(1000, 1024), 4096);
    }
}
