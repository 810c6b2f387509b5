use crate::error::{Error, Result};

/// Square N x N temperature field, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    n: usize,
    data: Vec<f64>,
}

impl Field {
    /// Allocates an N x N field with every cell at 0.0.
    pub fn zeros(n: usize) -> Field {
        Field {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Builds a field from row-major values. `data.len()` must be a perfect square.
    pub fn from_vec(data: Vec<f64>) -> Result<Field> {
        let n = (data.len() as f64).sqrt().round() as usize;
        if n * n != data.len() {
            return Err(Error::NotSquare { len: data.len() });
        }
        Ok(Field { n, data })
    }

    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Field> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Field { n, data })
    }

    // ---- Accessors ----

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics; an empty field has no rows anyway.
        self.data.chunks(self.n.max(1))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Overwrites every cell with `other`'s. Both fields must be N x N.
    pub fn copy_from(&mut self, other: &Field) -> Result<()> {
        self.check_same_size(other)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    pub(crate) fn check_same_size(&self, other: &Field) -> Result<()> {
        if self.n != other.n {
            return Err(Error::DimensionMismatch {
                expected: self.n,
                found: other.n,
            });
        }
        Ok(())
    }

    // ---- Diagnostics ----

    /// `(min, max)` over all cells, `None` for an empty field.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let first = *self.data.first()?;
        Some(
            self.data
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    /// Max minus min; 0.0 for an empty field.
    pub fn spread(&self) -> f64 {
        self.min_max().map_or(0.0, |(lo, hi)| hi - lo)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    pub fn is_boundary(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 == self.n || j + 1 == self.n
    }
}
