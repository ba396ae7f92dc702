//! Peak picking on correlograms and spectra.

use core::cmp::Ordering;
use itertools::Itertools;
use num_traits::Float;

/// Options for [`find_peaks`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FindPeaksOptions<F>
where
    F: PartialOrd + Copy,
{
    /// Minimum peak height.
    pub height: Option<F>,
    /// Minimum index distance between retained peaks.
    pub distance: Option<usize>,
}

impl<F> Default for FindPeaksOptions<F>
where
    F: PartialOrd + Copy,
{
    fn default() -> Self {
        Self {
            height: None,
            distance: None,
        }
    }
}

/// Index of the largest absolute value; the first one wins on ties.
///
/// Returns `None` for an empty slice. NaN entries never win.
pub fn argmax_abs<F>(x: &[F]) -> Option<usize>
where
    F: Float,
{
    // position_min_by keeps the first of equal elements, so order descending
    let idx = x.iter().position_min_by(|a, b| cmp_abs(**b, **a))?;
    if x[idx].is_nan() {
        None
    } else {
        Some(idx)
    }
}

// Orders by magnitude with NaN below everything.
fn cmp_abs<F: Float>(a: F, b: F) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.abs().partial_cmp(&b.abs()).unwrap_or(Ordering::Equal),
    }
}

/// Indices `i` with `x[i] > x[i ± k]` for every `k` in `1..=order`.
pub fn argrelmax<F>(x: &[F], order: usize) -> Vec<usize>
where
    F: PartialOrd + Copy,
{
    if order == 0 || x.len() < 2 * order + 1 {
        return Vec::new();
    }
    (order..x.len() - order)
        .filter(|&i| (1..=order).all(|k| x[i] > x[i - k] && x[i] > x[i + k]))
        .collect()
}

/// Local maxima filtered by height, then thinned by distance.
///
/// Distance thinning keeps the tallest peaks first and drops any candidate
/// closer than `distance` samples to one already kept. The result is sorted
/// by index.
pub fn find_peaks<F>(x: &[F], options: FindPeaksOptions<F>) -> Vec<usize>
where
    F: PartialOrd + Copy,
{
    let mut peaks = argrelmax(x, 1);

    if let Some(height) = options.height {
        peaks.retain(|&idx| x[idx] >= height);
    }

    match options.distance {
        Some(distance) if distance > 1 && peaks.len() > 1 => {
            let mut kept: Vec<usize> = Vec::with_capacity(peaks.len());
            for cand in peaks
                .iter()
                .copied()
                .sorted_by(|&a, &b| x[b].partial_cmp(&x[a]).unwrap_or(Ordering::Equal))
            {
                if kept.iter().all(|&k| k.abs_diff(cand) >= distance) {
                    kept.push(cand);
                }
            }
            kept.sort_unstable();
            kept
        }
        _ => peaks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_abs_prefers_magnitude_and_first_tie() {
        assert_eq!(argmax_abs(&[0.5f32, -2.0, 1.0, 2.0]), Some(1));
        assert_eq!(argmax_abs(&[3.0f32]), Some(0));
        assert_eq!(argmax_abs::<f32>(&[]), None);
        assert_eq!(argmax_abs(&[f32::NAN, 1.0, -0.5]), Some(1));
        assert_eq!(argmax_abs(&[f32::NAN, f32::NAN]), None);
    }

    #[test]
    fn argrelmax_finds_strict_maxima() {
        let x = [0.0f32, 1.0, 0.0, -1.0, 0.0, 2.0, 1.0];
        assert_eq!(argrelmax(&x, 1), vec![1, 5]);
        // plateaus are not strict maxima
        assert!(argrelmax(&[0.0f32, 1.0, 1.0, 0.0], 1).is_empty());
        assert_eq!(argrelmax(&[0.0f32, 1.0, 2.0, 1.0, 0.0], 2), vec![2]);
        assert!(argrelmax(&x, 0).is_empty());
        assert!(argrelmax(&x[..2], 1).is_empty());
    }

    #[test]
    fn find_peaks_applies_height_and_distance() {
        let x = [0.0f32, 1.0, 0.1, 0.9, 0.0, 2.0, 0.0];
        let peaks = find_peaks(
            &x,
            FindPeaksOptions {
                height: Some(0.5),
                distance: Some(3),
            },
        );
        assert_eq!(peaks, vec![1, 5]);
        assert_eq!(find_peaks(&x, FindPeaksOptions::default()), vec![1, 3, 5]);
    }

    #[test]
    fn find_peaks_reads_two_arrivals() {
        let mut x = vec![0.0f32; 64];
        x[10] = 1.0;
        x[11] = 0.6;
        x[40] = 0.8;
        x[41] = 0.9;
        let peaks = find_peaks(
            &x,
            FindPeaksOptions {
                height: Some(0.5),
                distance: Some(5),
            },
        );
        assert_eq!(peaks, vec![10, 41]);
    }
}
