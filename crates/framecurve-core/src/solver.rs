//! Gaussian elimination for the small dense systems behind polynomial fits.
//!
//! Pivoting only kicks in when a pivot is exactly zero, and then swaps with
//! the last row that has not been tried yet. This reproduces reference
//! curves exactly; it is not a general purpose solver.

/// A dense `size x (size + 1)` augmented matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedMatrix {
    size: usize,
    data: Vec<f64>,
}

impl AugmentedMatrix {
    /// Create a zero-filled system of `size` equations.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * (size + 1)],
        }
    }

    /// Build a system from rows of `size` coefficients followed by the constant.
    ///
    /// Rows of the wrong width are truncated or zero-padded.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let mut matrix = Self::new(rows.len());
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().take(matrix.width()).enumerate() {
                matrix.set(i, j, value);
            }
        }
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn width(&self) -> usize {
        self.size + 1
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.width() + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let width = self.width();
        self.data[row * width + col] = value;
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        let width = self.width();
        for col in 0..width {
            self.data.swap(a * width + col, b * width + col);
        }
    }

    /// Solve the system, consuming the matrix.
    ///
    /// A singular system yields non-finite or meaningless values, never a panic.
    pub fn solve(mut self) -> Vec<f64> {
        let size = self.size;
        let width = self.width();

        // Forward pass: reduce to upper triangular form with a unit diagonal.
        for row in 0..size {
            let col = row;
            let mut last_to_swap = size.saturating_sub(1);
            while self.get(row, col) == 0.0 && last_to_swap > row {
                self.swap_rows(row, last_to_swap);
                last_to_swap -= 1;
            }

            let pivot = self.get(row, col);
            for j in 0..width {
                let v = self.get(row, j) / pivot;
                self.set(row, j, v);
            }

            // Only rows that were never swapped into place get eliminated.
            if last_to_swap > row {
                for i in row + 1..size {
                    let factor = -self.get(i, col);
                    for j in col..width {
                        let v = self.get(i, j) + self.get(row, j) * factor;
                        self.set(i, j, v);
                    }
                }
            }
        }

        // Back substitution.
        let mut solution = vec![0.0; size];
        for i in (0..size).rev() {
            let mut value = self.get(i, size);
            for j in (i + 1..size).rev() {
                value -= solution[j] * self.get(i, j);
            }
            solution[i] = value;
        }
        solution
    }
}
