//! Support for dense, row-major matrices.

use std::collections::TryReserveError;
use std::iter::Sum;
use std::ops::{AddAssign, Index, IndexMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}
impl<T: Default + Clone> Matrix<T> {
    pub fn allocate(rows: usize, cols: usize) -> Self {
        let (len, overflow) = rows.overflowing_mul(cols);
        assert!(!overflow, "allocation of a {rows}x{cols} matrix failed due to overflow");
        let data = vec![T::default(); len];
        Self { data, rows, cols }
    }

    /// A fallible variant of [Matrix::allocate] that reports, rather than panics on, an overflowing
    /// size or a failed reservation.
    pub fn try_allocate(rows: usize, cols: usize) -> Result<Self, AllocationError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(AllocationError::Overflow { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, T::default());
        Ok(Self { data, rows, cols })
    }
}

impl<T> Matrix<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        debug_assert!(self.validate_row_index(row));
        let row_start = row * self.cols;
        &self.data[row_start..(row_start + self.cols)]
    }

    pub fn row_slice_mut(&mut self, row: usize) -> &mut [T] {
        debug_assert!(self.validate_row_index(row));
        let row_start = row * self.cols;
        &mut self.data[row_start..(row_start + self.cols)]
    }

    /// The underlying row-major storage.
    pub fn flatten(&self) -> &[T] {
        &self.data
    }

    pub fn flatten_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    fn validate_row_index(&self, row: usize) -> bool {
        assert!(row < self.rows, "invalid row index {row} for a {}x{} matrix", self.rows, self.cols);
        true
    }

    fn validate_col_index(&self, col: usize) -> bool {
        assert!(col < self.cols, "invalid column index {col} for a {}x{} matrix", self.rows, self.cols);
        true
    }
}

impl<T: Copy + Sum + AddAssign + Default> Matrix<T> {
    pub fn row_sums(&self) -> Vec<T> {
        (0..self.rows)
            .map(|row| self.row_slice(row).iter().copied().sum())
            .collect()
    }

    pub fn col_sums(&self) -> Vec<T> {
        let mut sums = vec![T::default(); self.cols];
        for row in 0..self.rows {
            for (sum, &value) in sums.iter_mut().zip(self.row_slice(row)) {
                *sum += value;
            }
        }
        sums
    }

    /// Adds `other` to this matrix, elementwise.
    pub fn add_assign(&mut self, other: &Matrix<T>) {
        assert!(
            self.rows == other.rows && self.cols == other.cols,
            "cannot add a {}x{} matrix to a {}x{} matrix",
            other.rows,
            other.cols,
            self.rows,
            self.cols
        );
        for (value, &addend) in self.data.iter_mut().zip(&other.data) {
            *value += addend;
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (row, col) = index;
        debug_assert!(self.validate_row_index(row));
        debug_assert!(self.validate_col_index(col));
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (row, col) = index;
        debug_assert!(self.validate_row_index(row));
        debug_assert!(self.validate_col_index(col));
        &mut self.data[row * self.cols + col]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("a {rows}x{cols} matrix overflows the address space")]
    Overflow { rows: usize, cols: usize },

    #[error("{0}")]
    Reserve(#[from] TryReserveError),
}
