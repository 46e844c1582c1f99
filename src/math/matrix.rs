use std::ops::{Index, IndexMut};

/// Row-major 2D container.
///
/// Rows are samples, columns are features everywhere in this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct Array2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2<T> {
    /// Build from a flat row-major buffer with the given `(rows, cols)` shape.
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self, ShapeError> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(ShapeError {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build from per-sample rows. All rows must have equal length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, ShapeError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(ShapeError {
                    rows: nrows,
                    cols: ncols,
                    len: data.len() + row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            data,
            rows: nrows,
            cols: ncols,
        })
    }

    /// A `rows x cols` matrix filled with copies of `value`.
    pub fn from_elem(rows: usize, cols: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Borrow one row as a slice.
    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |row| self.row_slice(row))
    }

    /// Copy one column out as a `Vec`.
    pub fn column(&self, col: usize) -> Vec<T>
    where
        T: Clone,
    {
        assert!(col < self.cols, "column index out of bounds");
        (0..self.rows)
            .map(|row| self[(row, col)].clone())
            .collect()
    }

    /// Element-wise map into a new array of the same shape.
    pub fn mapv<U, F>(&self, mut f: F) -> Array2<U>
    where
        F: FnMut(&T) -> U,
    {
        Array2 {
            data: self.data.iter().map(|v| f(v)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

/// Buffer length does not match the requested shape.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid shape ({rows}, {cols}) for buffer of length {len}")]
pub struct ShapeError {
    rows: usize,
    cols: usize,
    len: usize,
}
