//! Dense square matrices for adjacency, distance and per-step contact data.

use crate::error::{SimError, SimResult};

/// Row-major `n × n` matrix of `f64`.
///
/// Adjacency matrices hold `0.0`/`1.0`, distance matrices hold hop counts with
/// `f64::INFINITY` for unreachable pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    pub fn zeros(n: usize) -> Self {
        Self::filled(n, 0.0)
    }

    pub fn filled(n: usize, value: f64) -> Self {
        Self {
            n,
            data: vec![value; n * n],
        }
    }

    /// Builds a matrix from row-major data.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> SimResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(SimError::SizeMismatch {
                    what: "matrix row",
                    expected: n,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Zeroes row `agent` and column `agent`.
    pub fn isolate(&mut self, agent: usize) {
        let n = self.n;
        self.data[agent * n..(agent + 1) * n].fill(0.0);
        for i in 0..n {
            self.data[i * n + agent] = 0.0;
        }
    }

    /// `bool(self · other)`: every nonzero entry of the product clamped to `1`.
    ///
    /// Only the reachability pattern matters, so rows of `other` are OR-ed
    /// together instead of summing products.
    pub fn boolean_product(&self, other: &SquareMatrix) -> SquareMatrix {
        debug_assert_eq!(self.n, other.n, "boolean_product requires equal sizes");
        let n = self.n;
        let mut out = SquareMatrix::zeros(n);
        for i in 0..n {
            for k in 0..n {
                if self.get(i, k) == 0.0 {
                    continue;
                }
                let src = other.row(k);
                let dst = &mut out.data[i * n..(i + 1) * n];
                for (d, &s) in dst.iter_mut().zip(src) {
                    if s != 0.0 {
                        *d = 1.0;
                    }
                }
            }
        }
        out
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Number of nonzero entries.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|v| **v != 0.0).count()
    }
}
