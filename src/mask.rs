use std::collections::HashSet;

use crate::parse::{parse, CellValue};
use crate::table::Table;

/// Row indices of a table whose value in some column passed a numeric check.
///
/// Indices are kept sorted ascending and free of duplicates, so iterating a
/// mask (or an intersection of masks) walks rows in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidityMask {
    rows: Vec<usize>,
}

impl ValidityMask {
    /// Rows whose cell at `col` parses as `T` and is strictly positive.
    pub fn valid_indices<T: CellValue>(table: &Table, col: usize) -> Self {
        let rows = (0..table.row_count())
            .filter(|&i| {
                parse::<T>(table.cell(i, col))
                    .map(|v| v.is_strictly_positive())
                    .unwrap_or(false)
            })
            .collect();
        Self { rows }
    }

    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut rows: Vec<usize> = indices.into_iter().collect();
        rows.sort_unstable();
        rows.dedup();
        Self { rows }
    }

    /// Rows present in both masks.
    ///
    /// Hashes the smaller mask and walks the larger one against it; that one is
    /// already sorted, so the result comes out sorted without a second pass.
    pub fn intersect(&self, other: &ValidityMask) -> ValidityMask {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let lookup: HashSet<usize> = small.rows.iter().copied().collect();
        let rows = large
            .rows
            .iter()
            .copied()
            .filter(|i| lookup.contains(i))
            .collect();
        ValidityMask { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.binary_search(&row).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }
}
