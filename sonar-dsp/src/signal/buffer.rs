//! Small whole-buffer utilities for real sample vectors.

use num_traits::Float;
use sonar_dsp_core::{Error, Result};

/// Copy `len` samples of `x` starting at `begin`; `None` copies to the end.
///
/// ```
/// use sonar_dsp::signal::buffer::slice;
///
/// let x = [1.0f32, 2.0, 3.0, 4.0];
/// assert_eq!(slice(&x, 1, Some(2)).unwrap(), vec![2.0, 3.0]);
/// assert_eq!(slice(&x, 3, None).unwrap(), vec![4.0]);
/// assert!(slice(&x, 3, Some(2)).is_err());
/// ```
pub fn slice<T: Clone>(x: &[T], begin: usize, len: Option<usize>) -> Result<Vec<T>> {
    if begin > x.len() {
        return Err(Error::OutOfRange {
            arg: "begin".into(),
            index: begin,
            len: x.len(),
        });
    }
    let end = match len {
        None => x.len(),
        Some(len) => begin
            .checked_add(len)
            .filter(|&end| end <= x.len())
            .ok_or_else(|| Error::OutOfRange {
                arg: "len".into(),
                index: begin.saturating_add(len),
                len: x.len(),
            })?,
    };
    Ok(x[begin..end].to_vec())
}

/// Scale `x` so its largest absolute value becomes `target`.
///
/// An all-zero (or empty) buffer is left unchanged.
pub fn normalize_peak<F: Float>(x: &mut [F], target: F) {
    let peak = x.iter().fold(F::zero(), |m, v| m.max(v.abs()));
    if peak == F::zero() {
        return;
    }
    let gain = target / peak;
    for v in x.iter_mut() {
        *v = *v * gain;
    }
}

/// Mean power, `Σx² / L`. Zero for an empty buffer.
pub fn energy<F: Float>(x: &[F]) -> F {
    match F::from(x.len()) {
        Some(n) if !x.is_empty() => x.iter().fold(F::zero(), |acc, &v| acc + v * v) / n,
        _ => F::zero(),
    }
}

/// Subtract the arithmetic mean from every sample.
pub fn remove_mean<F: Float>(x: &mut [F]) {
    let Some(n) = F::from(x.len()) else {
        return;
    };
    if x.is_empty() {
        return;
    }
    let mean = x.iter().fold(F::zero(), |acc, &v| acc + v) / n;
    for v in x.iter_mut() {
        *v = *v - mean;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn slice_reports_out_of_range() {
        let x = [0u8, 1, 2];
        assert_eq!(slice(&x, 0, None).expect("whole"), vec![0, 1, 2]);
        assert_eq!(slice(&x, 3, None).expect("empty tail"), Vec::<u8>::new());
        assert_eq!(
            slice(&x, 4, None),
            Err(Error::OutOfRange {
                arg: "begin".into(),
                index: 4,
                len: 3
            })
        );
        assert_eq!(
            slice(&x, 1, Some(usize::MAX)),
            Err(Error::OutOfRange {
                arg: "len".into(),
                index: usize::MAX,
                len: 3
            })
        );
    }

    #[test]
    fn normalize_hits_target_peak() {
        let mut x = vec![0.5f32, -2.0, 1.0];
        normalize_peak(&mut x, 1024.0);
        assert_abs_diff_eq!(x[1], -1024.0, epsilon = 1e-3);
        assert_abs_diff_eq!(x[0], 256.0, epsilon = 1e-3);

        let mut zeros = vec![0.0f32; 4];
        normalize_peak(&mut zeros, 1.0);
        assert!(zeros.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn energy_and_mean_removal() {
        let mut x = vec![1.0f32, 3.0, 5.0, 7.0];
        assert_abs_diff_eq!(energy(&x), 21.0, epsilon = 1e-6);
        remove_mean(&mut x);
        assert_eq!(x, vec![-3.0, -1.0, 1.0, 3.0]);
        assert_abs_diff_eq!(energy(&x), 5.0, epsilon = 1e-6);
        assert_eq!(energy::<f32>(&[]), 0.0);
    }
}
