//! Point and neighbor queries.

use crate::tree::Tree;
use octmesh_core::{CellId, Dimension, Direction, MeshError};

impl Tree {
    /// The leaf containing `(x, y, z)`.
    ///
    /// Descends from the root by comparing each coordinate with the cell
    /// center. A coordinate equal to the center goes to the lower child, on
    /// every axis. The domain is closed, so points on its boundary are
    /// inside. In 2-D `z` is ignored.
    pub fn containing_cell(&self, x: f64, y: f64, z: f64) -> Result<CellId, MeshError> {
        let dim = self.config.dimension;
        let point = [x, y, z];
        let inside = dim.axes().iter().all(|a| {
            let v = point[a.index()];
            v.is_finite() && v >= 0.0 && v <= self.extent[a.index()] as f64
        });
        if !inside {
            return Err(MeshError::OutOfDomain {
                point,
                extent: self.extent,
            });
        }

        let mut id = CellId::ROOT;
        loop {
            let cell = &self.cells[id.index()];
            if cell.is_leaf() {
                return Ok(id);
            }
            id = cell.children[cell.octant_of(point, dim)];
        }
    }

    /// Settled neighbor of `cell` across the face in `direction`: the
    /// adjacent leaf if it is coarser, otherwise the adjacent cell at
    /// `cell`'s level. `None` on the domain boundary.
    pub fn neighbor(
        &self,
        cell: CellId,
        direction: Direction,
    ) -> Result<Option<CellId>, MeshError> {
        self.cell(cell)?;
        if direction.index() >= self.config.dimension.direction_count() {
            return Ok(None);
        }
        Ok(self.settle(cell, direction))
    }

    /// Whether `(x, y)` lies strictly inside the triangle spanned by the
    /// center of `cell` and the centers of the two children of its neighbor
    /// in `direction` that touch the shared face.
    ///
    /// The neighbor must exist and be subdivided. The test is independent
    /// of the triangle's orientation. Only defined for 2-D trees.
    pub fn inside_triangle(
        &self,
        cell: CellId,
        x: f64,
        y: f64,
        direction: Direction,
    ) -> Result<bool, MeshError> {
        if self.config.dimension != Dimension::Two {
            return Err(MeshError::PlanarOnly {
                operation: "inside_triangle",
            });
        }
        let n = self
            .neighbor(cell, direction)?
            .ok_or(MeshError::MissingNeighbor { cell, direction })?;
        let nb = &self.cells[n.index()];
        if nb.is_leaf() {
            return Err(MeshError::NeighborNotRefined { cell, direction });
        }

        // Children on the face toward `cell`, in ascending octant order.
        let axis_bit = 1 << direction.axis().index();
        let facing = if direction.is_positive() { 0 } else { axis_bit };
        let mut touching = (0..4)
            .filter(|i| i & axis_bit == facing)
            .map(|i| nb.children[i]);
        let (Some(c1), Some(c2)) = (touching.next(), touching.next()) else {
            return Err(MeshError::TopologyViolation {
                reason: format!("cell {n} has fewer than two children facing {cell}"),
            });
        };

        let center = |id: CellId| {
            let c = self.cells[id.index()].center;
            (c[0] as f64, c[1] as f64)
        };
        Ok(strictly_inside(center(cell), center(c1), center(c2), (x, y)))
    }
}

/// Barycentric point-in-triangle test with strict inequalities.
fn strictly_inside(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p: (f64, f64)) -> bool {
    let (x, y) = p;
    let area2 = -p1.1 * p2.0 + p0.1 * (p2.0 - p1.0) + p0.0 * (p1.1 - p2.1) + p1.0 * p2.1;
    let sign = if area2 < 0.0 { -1.0 } else { 1.0 };
    let s = (p0.1 * p2.0 - p0.0 * p2.1 + (p2.1 - p0.1) * x + (p0.0 - p2.0) * y) * sign;
    let t = (p0.0 * p1.1 - p0.1 * p1.0 + (p0.1 - p1.1) * x + (p1.0 - p0.0) * y) * sign;
    s > 0.0 && t > 0.0 && s + t < area2 * sign
}
