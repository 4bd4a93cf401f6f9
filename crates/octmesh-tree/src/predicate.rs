//! The refinement callback.

use crate::cell::Cell;

/// Decides how deep the tree should go around a cell.
///
/// A cell is subdivided while its level is below the value returned here
/// (and below the configured maximum). Closures `Fn(&Cell) -> u32` implement
/// this trait.
pub trait RefinementPredicate {
    /// Desired refinement level for `cell`.
    fn desired_level(&self, cell: &Cell) -> u32;
}

impl<F> RefinementPredicate for F
where
    F: Fn(&Cell) -> u32,
{
    fn desired_level(&self, cell: &Cell) -> u32 {
        self(cell)
    }
}
