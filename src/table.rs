use serde::{Deserialize, Serialize};

use crate::TableError;

/// A read-only collection of named numeric columns aligned by row index.
/// Data is stored column major, one value per row and column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    nrows: usize,
    ncols: usize,
    colnames: Vec<String>,
    data: Vec<f64>,
}

impl Table {
    pub fn new(
        nrows: usize,
        ncols: usize,
        data: Vec<f64>,
        colnames: Vec<String>,
    ) -> Result<Self, TableError> {
        if data.len() != nrows * ncols {
            return Err(TableError::DimensionsMismatch);
        }
        if colnames.len() != ncols {
            return Err(TableError::ColumnNamesMismatch);
        }
        Ok(Self {
            nrows,
            ncols,
            colnames,
            data,
        })
    }

    pub fn from_columns(
        colnames: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        if colnames.len() != columns.len() {
            return Err(TableError::ColumnNamesMismatch);
        }
        let nrows = columns.first().map(Vec::len).unwrap_or(0);
        if columns.iter().any(|c| c.len() != nrows) {
            return Err(TableError::UnequalColumnLengths);
        }
        let ncols = columns.len();
        let mut data = Vec::with_capacity(nrows * ncols);
        for column in &columns {
            data.extend_from_slice(column);
        }
        Ok(Self {
            nrows,
            ncols,
            colnames,
            data,
        })
    }

    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline(always)]
    pub fn colnames(&self) -> &[String] {
        &self.colnames
    }

    pub fn column(&self, name: &str) -> Result<&[f64], TableError> {
        let i = self
            .colnames
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::ColumnNameNotFound(name.to_string()))?;
        Ok(&self.data[i * self.nrows..(i + 1) * self.nrows])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_new() {
        let table = Table::new(
            3,
            2,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            names(&["a", "b"]),
        )
        .unwrap();
        assert_eq!(table.nrows(), 3);
        assert_eq!(table.ncols(), 2);
        assert_eq!(table.colnames(), ["a", "b"]);
        assert_eq!(table.column("a").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(table.column("b").unwrap(), [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_new_dimensions_mismatch() {
        assert!(matches!(
            Table::new(3, 2, vec![1.0, 2.0], names(&["a", "b"])),
            Err(TableError::DimensionsMismatch)
        ));
    }

    #[test]
    fn test_new_colnames_mismatch() {
        assert!(matches!(
            Table::new(2, 2, vec![1.0, 2.0, 3.0, 4.0], names(&["a"])),
            Err(TableError::ColumnNamesMismatch)
        ));
    }

    #[test]
    fn test_from_columns() {
        let table = Table::from_columns(
            names(&["a", "b"]),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap();
        assert_eq!(
            table,
            Table::new(
                3,
                2,
                vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
                names(&["a", "b"])
            )
            .unwrap()
        );
    }

    #[test]
    fn test_from_columns_unequal_lengths() {
        assert!(matches!(
            Table::from_columns(names(&["a", "b"]), vec![vec![1.0, 2.0], vec![3.0]]),
            Err(TableError::UnequalColumnLengths)
        ));
    }

    #[test]
    fn test_column_not_found() {
        let table = Table::from_columns(names(&["a"]), vec![vec![1.0]]).unwrap();
        assert!(matches!(
            table.column("b"),
            Err(TableError::ColumnNameNotFound(name)) if name == "b"
        ));
    }
}
