//! Walsh/Hadamard sign tables.
//!
//! The order-`n` table has dimension `2^(n-1)`. Order 1 is the single entry
//! `+1`; every higher order is built from the previous one by the Sylvester
//! step
//!
//! ```text
//! H(n) = | H(n-1)   H(n-1) |
//!        | H(n-1)  -H(n-1) |
//! ```
//!
//! so cell `(i, j)` takes the half-size cell `(i mod h, j mod h)` and is
//! negated when both `i` and `j` lie in the upper half. Rows are mutually
//! orthogonal and each row dotted with itself gives the dimension.
//!
//! Tables are filled completely at construction and never mutated after,
//! so a single table can be shared read-only across threads (`&`, `Arc` or
//! a `OnceLock` owned by the caller).

use crate::kernel::{ConfigError, KernelLifecycle};

/// Largest supported order; its table holds `4096 * 4096` cells.
pub const MAX_ORDER: u32 = 13;

/// Constructor config for [`WalshTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalshConfig {
    /// Table order `n >= 1`; the table is `2^(n-1)` square.
    pub order: u32,
}

/// Fully populated `±1` table of one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalshTable {
    order: u32,
    dim: usize,
    cells: Vec<i8>,
}

impl KernelLifecycle for WalshTable {
    type Config = WalshConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.order == 0 || config.order > MAX_ORDER {
            return Err(ConfigError::InvalidArgument {
                arg: "order",
                reason: "order must be in 1..=13",
            });
        }
        let (dim, cells) = fill(config.order);
        log::debug!("walsh table: order={} dim={dim}", config.order);
        Ok(Self {
            order: config.order,
            dim,
            cells,
        })
    }
}

// Bottom-up over orders; each pass reads only the previous order's table.
fn fill(order: u32) -> (usize, Vec<i8>) {
    let mut dim = 1usize;
    let mut cells = vec![1i8];
    for _ in 1..order {
        let half = dim;
        dim *= 2;
        let mut next = vec![0i8; dim * dim];
        for (i, row) in next.chunks_exact_mut(dim).enumerate() {
            let base = &cells[(i % half) * half..][..half];
            for (j, cell) in row.iter_mut().enumerate() {
                let v = base[j % half];
                *cell = if i >= half && j >= half { -v } else { v };
            }
        }
        cells = next;
    }
    (dim, cells)
}

impl WalshTable {
    /// Table order.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Side length, `2^(order-1)`.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<i8> {
        if i < self.dim && j < self.dim {
            Some(self.cells[i * self.dim + j])
        } else {
            None
        }
    }

    /// Row `i` as a code word.
    pub fn row(&self, i: usize) -> Option<&[i8]> {
        (i < self.dim).then(|| &self.cells[i * self.dim..(i + 1) * self.dim])
    }

    /// All rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[i8]> + '_ {
        self.cells.chunks_exact(self.dim)
    }

    /// Row `i` as `±amplitude` chips, ready to modulate a carrier.
    pub fn chips(&self, i: usize, amplitude: f32) -> Option<Vec<f32>> {
        self.row(i)
            .map(|row| row.iter().map(|&c| f32::from(c) * amplitude).collect())
    }
}

/// Build the order-`order` table.
pub fn walsh(order: u32) -> Result<WalshTable, ConfigError> {
    WalshTable::try_new(WalshConfig { order })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, OnceLock};

    fn dot(a: &[i8], b: &[i8]) -> i64 {
        a.iter().zip(b).map(|(&x, &y)| i64::from(x) * i64::from(y)).sum()
    }

    #[test]
    fn small_orders_match_sylvester_layout() {
        assert_eq!(walsh(1).expect("order 1").rows().collect::<Vec<_>>(), vec![&[1i8][..]]);
        let t = walsh(3).expect("order 3");
        let expected: [[i8; 4]; 4] = [[1, 1, 1, 1], [1, -1, 1, -1], [1, 1, -1, -1], [1, -1, -1, 1]];
        for (row, want) in t.rows().zip(expected.iter()) {
            assert_eq!(row, &want[..]);
        }
    }

    #[test]
    fn rows_are_orthogonal() {
        for order in 1..=7 {
            let t = walsh(order).expect("table");
            let dim = t.dim();
            assert_eq!(dim, 1 << (order - 1));
            for a in 0..dim {
                for b in 0..dim {
                    let d = dot(t.row(a).expect("row a"), t.row(b).expect("row b"));
                    let want = if a == b { dim as i64 } else { 0 };
                    assert_eq!(d, want, "order {order} rows {a},{b}");
                }
            }
        }
    }

    #[test]
    fn cell_follows_half_size_table() {
        let small = walsh(5).expect("order 5");
        let big = walsh(6).expect("order 6");
        let half = small.dim();
        for i in 0..big.dim() {
            for j in 0..big.dim() {
                let v = small.get(i % half, j % half).expect("in range");
                let sign = if i >= half && j >= half { -1 } else { 1 };
                assert_eq!(big.get(i, j), Some(sign * v));
            }
        }
        assert_eq!(big.get(big.dim(), 0), None);
        assert!(big.row(big.dim()).is_none());
    }

    #[test]
    fn chips_scale_signs() {
        let t = walsh(2).expect("order 2");
        assert_eq!(t.chips(1, 0.5), Some(vec![0.5, -0.5]));
        assert_eq!(t.chips(2, 1.0), None);
    }

    #[test]
    fn rejects_out_of_range_orders() {
        assert!(walsh(0).is_err());
        assert!(walsh(MAX_ORDER + 1).is_err());
    }

    #[test]
    fn shared_table_reads_identically_across_threads() {
        static TABLE: OnceLock<Arc<WalshTable>> = OnceLock::new();
        let handles = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    let t = TABLE.get_or_init(|| Arc::new(walsh(6).expect("order 6")));
                    t.rows().map(|r| r.iter().map(|&c| i64::from(c)).sum::<i64>()).collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();
        let sums = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect::<Vec<_>>();
        assert!(sums.windows(2).all(|w| w[0] == w[1]));
        // only the all-ones row has a non-zero sum
        assert_eq!(sums[0][0], 32);
        assert!(sums[0][1..].iter().all(|&s| s == 0));
    }
}
