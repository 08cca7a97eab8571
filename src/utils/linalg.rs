//! Dense vector and matrix primitives used by the forward and backward passes
//!
//! Matrices are stored row-major in a flat `Vec<f64>`. Every operation checks
//! shapes up front and reports disagreement as
//! [`NetworkError::InvalidShape`]; nothing is padded or truncated.

use crate::error::{NetworkError, Result};

/// Row-major dense matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a `rows × cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap row-major data. `data.len()` must equal `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(NetworkError::InvalidShape {
                op: "Matrix::from_vec",
                expected: (rows * cols, 1),
                actual: (data.len(), 1),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(NetworkError::InvalidShape {
                    op: "Matrix::from_rows",
                    expected: (rows.len(), cols),
                    actual: (rows.len(), row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
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

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Set every entry to zero, keeping the shape.
    pub fn fill_zero(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Elementwise `self += other`.
    pub fn add_assign(&mut self, other: &Matrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(NetworkError::InvalidShape {
                op: "Matrix::add_assign",
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        self.data
            .iter_mut()
            .zip(&other.data)
            .for_each(|(a, b)| *a += *b);
        Ok(())
    }
}

/// Elementwise product `c[i] = a[i] * b[i]`.
pub fn hadamard(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    if a.len() != b.len() {
        return Err(NetworkError::vec_shape("hadamard", a.len(), b.len()));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).collect())
}

/// Outer product `M[i][j] = a[i] * b[j]`, shape `len(a) × len(b)`.
pub fn outer(a: &[f64], b: &[f64]) -> Matrix {
    let mut data = Vec::with_capacity(a.len() * b.len());
    for &x in a {
        data.extend(b.iter().map(|&y| x * y));
    }
    Matrix {
        rows: a.len(),
        cols: b.len(),
        data,
    }
}

/// Matrix-vector product; `v.len()` must equal `m.cols()`.
pub fn mat_vec(m: &Matrix, v: &[f64]) -> Result<Vec<f64>> {
    if m.cols != v.len() {
        return Err(NetworkError::InvalidShape {
            op: "mat_vec",
            expected: (m.cols, 1),
            actual: (v.len(), 1),
        });
    }
    Ok((0..m.rows)
        .map(|i| m.row(i).iter().zip(v).map(|(w, x)| w * x).sum())
        .collect())
}

pub fn transpose(m: &Matrix) -> Matrix {
    let mut result = Matrix::zeros(m.cols, m.rows);
    for i in 0..m.rows {
        for j in 0..m.cols {
            result.data[j * m.rows + i] = m.data[i * m.cols + j];
        }
    }
    result
}

/// Elementwise vector sum. `a` is consumed, overwritten and returned.
pub fn add(mut a: Vec<f64>, b: &[f64]) -> Result<Vec<f64>> {
    if a.len() != b.len() {
        return Err(NetworkError::vec_shape("add", a.len(), b.len()));
    }
    a.iter_mut().zip(b).for_each(|(x, y)| *x += *y);
    Ok(a)
}

/// Output error `activations[i] - onehot[i]`.
pub fn subtract(activations: &[f64], onehot: &[u8]) -> Result<Vec<f64>> {
    if activations.len() != onehot.len() {
        return Err(NetworkError::vec_shape(
            "subtract",
            activations.len(),
            onehot.len(),
        ));
    }
    Ok(activations
        .iter()
        .zip(onehot)
        .map(|(&a, &t)| a - f64::from(t))
        .collect())
}
