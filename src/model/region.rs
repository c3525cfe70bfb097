//! Rectangular cell regions

use crate::error::{MejaError, MejaResult};
use crate::model::refs::{cell_ref, CellAddress};
use std::fmt;
use std::str::FromStr;

/// An inclusive rectangular block of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RectangularRegion {
    first_row: usize,
    last_row: usize,
    first_column: usize,
    last_column: usize,
}

impl RectangularRegion {
    pub fn new(
        first_row: usize,
        last_row: usize,
        first_column: usize,
        last_column: usize,
    ) -> MejaResult<Self> {
        if first_row > last_row || first_column > last_column {
            return Err(MejaError::Argument(format!(
                "invalid region: rows {}..={}, columns {}..={}",
                first_row, last_row, first_column, last_column
            )));
        }
        Ok(Self {
            first_row,
            last_row,
            first_column,
            last_column,
        })
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn last_row(&self) -> usize {
        self.last_row
    }

    pub fn first_column(&self) -> usize {
        self.first_column
    }

    pub fn last_column(&self) -> usize {
        self.last_column
    }

    pub fn row_count(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    pub fn column_count(&self) -> usize {
        self.last_column - self.first_column + 1
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.first_row <= i && i <= self.last_row && self.first_column <= j && j <= self.last_column
    }

    pub fn intersects(&self, other: &RectangularRegion) -> bool {
        self.first_row <= other.last_row
            && other.first_row <= self.last_row
            && self.first_column <= other.last_column
            && other.first_column <= self.last_column
    }

    /// Iterate all (row, column) pairs, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.first_row..=self.last_row)
            .flat_map(move |i| (self.first_column..=self.last_column).map(move |j| (i, j)))
    }
}

impl fmt::Display for RectangularRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            cell_ref("", self.first_row, self.first_column, &[]),
            cell_ref("", self.last_row, self.last_column, &[])
        )
    }
}

impl FromStr for RectangularRegion {
    type Err = MejaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| MejaError::Argument(format!("invalid region: '{}'", s)))?;
        let from = CellAddress::parse(from)?;
        let to = CellAddress::parse(to)?;
        RectangularRegion::new(
            from.row.min(to.row),
            from.row.max(to.row),
            from.column.min(to.column),
            from.column.max(to.column),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let r = RectangularRegion::new(1, 3, 2, 4).unwrap();
        assert!(r.contains(1, 2));
        assert!(r.contains(3, 4));
        assert!(!r.contains(0, 2));
        assert!(!r.contains(2, 5));
        assert_eq!(r.row_count(), 3);
        assert_eq!(r.column_count(), 3);
    }

    #[test]
    fn test_intersects() {
        let a = RectangularRegion::new(0, 2, 0, 2).unwrap();
        let b = RectangularRegion::new(2, 3, 2, 3).unwrap();
        let c = RectangularRegion::new(3, 4, 0, 1).unwrap();
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!b.intersects(&c));
    }

    #[test]
    fn test_invalid_region() {
        assert!(RectangularRegion::new(2, 1, 0, 0).is_err());
        assert!(RectangularRegion::new(0, 0, 3, 1).is_err());
    }

    #[test]
    fn test_display_and_parse() {
        let r = RectangularRegion::new(0, 2, 0, 27).unwrap();
        assert_eq!(r.to_string(), "A1:AB3");
        let parsed: RectangularRegion = "A1:AB3".parse().unwrap();
        assert_eq!(parsed, r);
        let swapped: RectangularRegion = "AB3:A1".parse().unwrap();
        assert_eq!(swapped, r);
    }

    #[test]
    fn test_cells_row_major() {
        let r = RectangularRegion::new(0, 1, 0, 1).unwrap();
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
