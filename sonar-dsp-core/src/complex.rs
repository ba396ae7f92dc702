//! Single-precision complex samples.
//!
//! Arithmetic (`+ - * /`, complex/complex and complex/scalar) comes from
//! [`num_complex::Complex32`]. Division by a zero-magnitude value is not
//! guarded and yields non-finite components; callers must check first.
//!
//! The zero test is exact: [`Zero::is_zero`] compares both components against
//! `0.0`, so a value that should be zero but carries rounding noise from an
//! earlier transform is *not* zero.

pub use num_complex::Complex32;
pub use num_traits::Zero;

/// A complex sample in time or frequency domain.
pub type Sample = Complex32;

/// The exact zero sample, `(0, 0)`.
pub const ZERO: Sample = Complex32::new(0.0, 0.0);

/// Lift a real value onto the real axis.
#[inline]
pub fn real(x: f32) -> Sample {
    Sample::new(x, 0.0)
}

/// Scalar metrics and rotations for [`Sample`].
pub trait SampleExt: Copy {
    /// Euclidean norm, `sqrt(re^2 + im^2)`.
    fn magnitude(self) -> f32;

    /// Four-quadrant angle `atan2(im, re)` in radians.
    fn phase(self) -> f32;

    /// Unit-magnitude value pointing the same way.
    ///
    /// A zero-magnitude input returns [`ZERO`] instead of dividing by zero.
    fn normalize(self) -> Self;

    /// Rotate by -90 degrees: `(re, im) -> (im, -re)`.
    fn rotate_cw(self) -> Self;

    /// Rotate by +90 degrees: `(re, im) -> (-im, re)`.
    fn rotate_ccw(self) -> Self;
}

impl SampleExt for Sample {
    #[inline]
    fn magnitude(self) -> f32 {
        self.re.hypot(self.im)
    }

    #[inline]
    fn phase(self) -> f32 {
        self.im.atan2(self.re)
    }

    #[inline]
    fn normalize(self) -> Self {
        let l = self.magnitude();
        if l == 0.0 {
            ZERO
        } else {
            Sample::new(self.re / l, self.im / l)
        }
    }

    #[inline]
    fn rotate_cw(self) -> Self {
        Sample::new(self.im, -self.re)
    }

    #[inline]
    fn rotate_ccw(self) -> Self {
        Sample::new(-self.im, self.re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn arithmetic_follows_complex_rules() {
        let a = Sample::new(1.0, 2.0);
        let b = Sample::new(3.0, -1.0);
        assert_eq!(a + b, Sample::new(4.0, 1.0));
        assert_eq!(a - b, Sample::new(-2.0, 3.0));
        assert_eq!(a * b, Sample::new(5.0, 5.0));
        let q = a / b;
        assert_abs_diff_eq!(q.re, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(q.im, 0.7, epsilon = 1e-6);
        assert_eq!(a * 2.0, Sample::new(2.0, 4.0));
        assert_eq!(a / 2.0, Sample::new(0.5, 1.0));
    }

    #[test]
    fn magnitude_and_phase() {
        let z = Sample::new(3.0, 4.0);
        assert_abs_diff_eq!(z.magnitude(), 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Sample::new(0.0, 1.0).phase(), FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(Sample::new(-1.0, 0.0).phase(), PI, epsilon = 1e-6);
        assert_abs_diff_eq!(Sample::new(0.0, -2.0).phase(), -FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn normalize_keeps_direction() {
        let u = Sample::new(-3.0, 4.0).normalize();
        assert_abs_diff_eq!(u.magnitude(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(u.re, -0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(u.im, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn normalize_zero_is_zero() {
        let u = ZERO.normalize();
        assert!(u.is_zero());
        assert!(!u.re.is_nan());
    }

    #[test]
    fn zero_test_is_exact() {
        assert!(ZERO.is_zero());
        assert!(!Sample::new(1e-30, 0.0).is_zero());
        assert!(!Sample::new(0.0, -1e-30).is_zero());
    }

    #[test]
    fn quarter_turns() {
        let z = Sample::new(1.0, 2.0);
        assert_eq!(z.rotate_cw(), z * Sample::new(0.0, -1.0));
        assert_eq!(z.rotate_ccw(), z * Sample::new(0.0, 1.0));
        assert_eq!(z.rotate_cw().rotate_ccw(), z);
    }
}
