use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};

/// Dense row-major matrix of `f64`.
///
/// Serializes as an array of row arrays. Deserialization goes through
/// `from_data`, so ragged input is rejected instead of producing a matrix
/// whose `cols` lies about some row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Fills a `rows x cols` matrix with values drawn uniformly from `[-1, 1]`.
    ///
    /// The caller owns the random source; pass a seeded `StdRng` for
    /// reproducible initialization.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let between = Uniform::new_inclusive(-1.0, 1.0);
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = between.sample(rng);
            }
        }

        res
    }

    /// Builds a matrix from nested rows. Every row must have the width of the first.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map(|row| row.len()).unwrap_or(0);

        if let Some((row, found)) = data
            .iter()
            .map(|r| r.len())
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(NnError::NotRectangular { row, expected: cols, found });
        }

        Ok(Matrix { rows, cols, data })
    }

    /// Column matrix with `v[i]` at `(i, 0)`.
    pub fn from_vector(v: &[f64]) -> Matrix {
        Matrix {
            rows: v.len(),
            cols: 1,
            data: v.iter().map(|&x| vec![x]).collect(),
        }
    }

    /// Row-major flatten. Works for any shape, though callers mostly hand it columns.
    pub fn to_vector(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn into_data(self) -> Vec<Vec<f64>> {
        self.data
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Standard matrix product. Requires `self.cols == rhs.rows`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(self.mismatch("multiply", rhs));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    pub fn subtract(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("subtract", rhs, |a, b| a - b)
    }

    /// Element-wise product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch(op, rhs));
        }

        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(&a, &b)| f(a, b)).collect())
            .collect();

        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    fn mismatch(&self, op: &'static str, rhs: &Matrix) -> NnError {
        NnError::DimensionMismatch {
            op,
            left: self.shape(),
            right: rhs.shape(),
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = NnError;

    fn try_from(data: Vec<Vec<f64>>) -> Result<Matrix> {
        Matrix::from_data(data)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        m.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn m(data: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_data(data).unwrap()
    }

    fn arb_matrix(rows: usize, cols: usize) -> impl Strategy<Value = Matrix> {
        prop::collection::vec(prop::collection::vec(-1e3..1e3f64, cols), rows)
            .prop_map(|data| Matrix::from_data(data).unwrap())
    }

    fn arb_shaped_pair() -> impl Strategy<Value = (Matrix, Matrix)> {
        (1usize..6, 1usize..6).prop_flat_map(|(r, c)| (arb_matrix(r, c), arb_matrix(r, c)))
    }

    #[test]
    fn multiply_known_product() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let b = m(vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]]);

        let c = a.multiply(&b).unwrap();

        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.data(), &[vec![58.0, 64.0], vec![139.0, 154.0]]);
    }

    #[test]
    fn elementwise_ops() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = m(vec![vec![5.0, 6.0], vec![7.0, 8.0]]);

        assert_eq!(a.add(&b).unwrap().data(), &[vec![6.0, 8.0], vec![10.0, 12.0]]);
        assert_eq!(b.subtract(&a).unwrap().data(), &[vec![4.0, 4.0], vec![4.0, 4.0]]);
        assert_eq!(a.hadamard(&b).unwrap().data(), &[vec![5.0, 12.0], vec![21.0, 32.0]]);
    }

    #[test]
    fn mismatched_shapes_fail() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 2);

        for res in [a.add(&b), a.subtract(&b), a.hadamard(&b), a.multiply(&b)] {
            match res {
                Err(NnError::DimensionMismatch { left, right, .. }) => {
                    assert_eq!(left, (2, 3));
                    assert_eq!(right, (2, 2));
                }
                other => panic!("expected DimensionMismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn multiply_names_the_operation() {
        let err = Matrix::zeros(1, 2).multiply(&Matrix::zeros(3, 1)).unwrap_err();
        assert!(matches!(err, NnError::DimensionMismatch { op: "multiply", .. }));
    }

    #[test]
    fn vector_conversions() {
        let col = Matrix::from_vector(&[1.0, 2.0, 3.0]);
        assert_eq!(col.shape(), (3, 1));
        assert_eq!(col.get(2, 0), Some(3.0));
        assert_eq!(col.to_vector(), vec![1.0, 2.0, 3.0]);

        let wide = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(wide.to_vector(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, NnError::NotRectangular { row: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn random_is_bounded_and_seedable() {
        let a = Matrix::random(8, 5, &mut StdRng::seed_from_u64(7));
        let b = Matrix::random(8, 5, &mut StdRng::seed_from_u64(7));

        assert_eq!(a, b);
        assert!(a.to_vector().iter().all(|x| (-1.0..=1.0).contains(x)));
    }

    #[test]
    fn serde_uses_nested_rows() {
        let a = m(vec![vec![0.5, -0.25], vec![1.0, 2.0]]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "[[0.5,-0.25],[1.0,2.0]]");

        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
        assert!(serde_json::from_str::<Matrix>("[[1.0],[2.0,3.0]]").is_err());
    }

    proptest! {
        #[test]
        fn transpose_is_an_involution(a in (1usize..6, 1usize..6).prop_flat_map(|(r, c)| arb_matrix(r, c))) {
            prop_assert_eq!(a.transpose().transpose(), a);
        }

        #[test]
        fn add_commutes((a, b) in arb_shaped_pair()) {
            prop_assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
        }

        #[test]
        fn identity_is_neutral(a in (1usize..6, 1usize..6).prop_flat_map(|(r, c)| arb_matrix(r, c))) {
            let id = Matrix::identity(a.cols());
            prop_assert_eq!(a.multiply(&id).unwrap(), a);
        }
    }
}
