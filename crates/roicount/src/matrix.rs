//! Marker-by-region membership table.

use indexmap::IndexMap;
use thiserror::Error;

/// Errors raised when building a [`MembershipMatrix`] from raw columns
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column `{0}` appears more than once")]
    DuplicateColumn(String),
}

/// An N x M boolean table recording which markers lie in which regions.
///
/// Rows are markers, indexed by their position in the section. Columns are
/// regions, identified by name; their order carries no meaning, and two
/// matrices compare equal when they hold the same named columns.
///
/// # Examples
///
/// ```
/// use roicount::MembershipMatrix;
///
/// let matrix = MembershipMatrix::from_columns(
///     3,
///     [("CTX", vec![true, true, true]), ("ACB", vec![false, true, false])],
/// )
/// .unwrap();
///
/// assert_eq!(matrix.row_sum(1), 2);
/// assert_eq!(matrix.row_regions(1), ["CTX", "ACB"]);
/// assert_eq!(matrix.column_sum("ACB"), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipMatrix {
    n_rows: usize,
    columns: IndexMap<String, Vec<bool>>,
}

impl MembershipMatrix {
    /// Creates a matrix with `n_rows` markers and no regions
    pub fn new(n_rows: usize) -> Self {
        Self {
            n_rows,
            columns: IndexMap::new(),
        }
    }

    /// Creates a matrix from named columns.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError`] if a column does not have `n_rows` entries or
    /// a name is repeated.
    pub fn from_columns<S, I>(n_rows: usize, columns: I) -> Result<Self, MatrixError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<bool>)>,
    {
        let mut matrix = Self::new(n_rows);
        for (name, values) in columns {
            let name = name.into();
            if values.len() != n_rows {
                return Err(MatrixError::LengthMismatch {
                    column: name,
                    expected: n_rows,
                    actual: values.len(),
                });
            }
            if matrix.columns.contains_key(&name) {
                return Err(MatrixError::DuplicateColumn(name));
            }
            matrix.columns.insert(name, values);
        }
        Ok(matrix)
    }

    /// Adds a column, or ORs `values` into an existing column of that name.
    pub(crate) fn union_column(&mut self, name: &str, values: Vec<bool>) {
        debug_assert_eq!(values.len(), self.n_rows);
        match self.columns.get_mut(name) {
            Some(existing) => existing
                .iter_mut()
                .zip(values)
                .for_each(|(cell, value)| *cell |= value),
            None => {
                self.columns.insert(name.to_string(), values);
            }
        }
    }

    /// Returns the number of markers
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of regions
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the region names
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Returns the membership of marker `row` in region `name`, or `None` if
    /// either does not exist
    pub fn get(&self, row: usize, name: &str) -> Option<bool> {
        self.columns.get(name)?.get(row).copied()
    }

    /// Returns the number of regions marker `row` lies in
    pub fn row_sum(&self, row: usize) -> usize {
        self.columns
            .values()
            .filter(|values| values.get(row).copied().unwrap_or(false))
            .count()
    }

    /// Returns the names of the regions marker `row` lies in
    pub fn row_regions(&self, row: usize) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, values)| values.get(row).copied().unwrap_or(false))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Returns the only region of marker `row`, or `None` if the marker lies
    /// in zero or several regions
    pub fn assigned_region(&self, row: usize) -> Option<&str> {
        match self.row_regions(row).as_slice() {
            [name] => Some(*name),
            _ => None,
        }
    }

    /// Returns the number of markers in region `name`
    pub fn column_sum(&self, name: &str) -> Option<usize> {
        self.columns
            .get(name)
            .map(|values| values.iter().filter(|&&v| v).count())
    }

    /// Drops every region that holds no marker
    pub(crate) fn prune_empty_columns(&mut self) {
        self.columns.retain(|_, values| values.iter().any(|&v| v));
    }

    /// Removes marker `row` from region `name`
    pub(crate) fn clear(&mut self, row: usize, name: &str) {
        if let Some(cell) = self
            .columns
            .get_mut(name)
            .and_then(|values| values.get_mut(row))
        {
            *cell = false;
        }
    }
}
