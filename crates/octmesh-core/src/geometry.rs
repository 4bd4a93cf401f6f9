//! Integer geometry primitives: locations, axes, face directions, and the
//! mesh dimension.

use crate::error::ConfigError;
use std::fmt;

/// An integer lattice point. Two-dimensional meshes keep `z == 0`.
pub type Location = [i64; 3];

/// Midpoint of two lattice points.
pub fn midpoint(a: Location, b: Location) -> Location {
    [(a[0] + b[0]) / 2, (a[1] + b[1]) / 2, (a[2] + b[2]) / 2]
}

/// Centroid of four lattice points (a face's corners).
pub fn centroid4(p: [Location; 4]) -> Location {
    let mut out = [0i64; 3];
    for (axis, slot) in out.iter_mut().enumerate() {
        *slot = p.iter().map(|q| q[axis]).sum::<i64>() / 4;
    }
    out
}

/// A coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// All three axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis within a [`Location`].
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// The two other axes in ascending order.
    ///
    /// For a face with this normal these are its in-plane `(u, v)` axes.
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Self::X => (Self::Y, Self::Z),
            Self::Y => (Self::X, Self::Z),
            Self::Z => (Self::X, Self::Y),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

/// One of the six face directions of a cell.
///
/// The discriminant is the neighbor slot: −x, +x, −y, +y, −z, +z. Opposite
/// directions differ only in the lowest bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Toward decreasing x.
    NegX = 0,
    /// Toward increasing x.
    PosX = 1,
    /// Toward decreasing y.
    NegY = 2,
    /// Toward increasing y.
    PosY = 3,
    /// Toward decreasing z.
    NegZ = 4,
    /// Toward increasing z.
    PosZ = 5,
}

impl Direction {
    /// All six directions in slot order.
    pub const ALL: [Direction; 6] = [
        Direction::NegX,
        Direction::PosX,
        Direction::NegY,
        Direction::PosY,
        Direction::NegZ,
        Direction::PosZ,
    ];

    /// Neighbor slot of this direction.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The axis this direction moves along.
    pub fn axis(self) -> Axis {
        Axis::ALL[self.index() / 2]
    }

    /// Whether this direction points toward increasing coordinates.
    pub fn is_positive(self) -> bool {
        self.index() & 1 == 1
    }

    /// The reverse direction.
    pub fn opposite(self) -> Self {
        Self::ALL[self.index() ^ 1]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_positive() { '+' } else { '-' };
        write!(f, "{sign}{}", self.axis())
    }
}

/// Spatial dimension of a mesh: quadtree (2-D) or octree (3-D).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Quadtree over a square.
    Two,
    /// Octree over a cube.
    Three,
}

impl Dimension {
    /// Number of spatial dimensions.
    pub fn ndim(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Corners per cell, which is also children per subdivision.
    pub fn corner_count(self) -> usize {
        1 << self.ndim()
    }

    /// Face directions per cell.
    pub fn direction_count(self) -> usize {
        2 * self.ndim()
    }

    /// The face directions used by this dimension, in slot order.
    pub fn directions(self) -> &'static [Direction] {
        &Direction::ALL[..self.direction_count()]
    }

    /// The axes spanned by this dimension.
    pub fn axes(self) -> &'static [Axis] {
        &Axis::ALL[..self.ndim()]
    }
}

impl TryFrom<usize> for Dimension {
    type Error = ConfigError;

    fn try_from(ndim: usize) -> Result<Self, Self::Error> {
        match ndim {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(ConfigError::UnsupportedDimension { ndim }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flips_low_bit() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().index(), d.index() ^ 1);
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(d.opposite().axis(), d.axis());
        }
    }

    #[test]
    fn direction_slots_match_axis_order() {
        assert_eq!(Direction::NegX.axis(), Axis::X);
        assert_eq!(Direction::PosY.axis(), Axis::Y);
        assert_eq!(Direction::PosZ.axis(), Axis::Z);
        assert!(Direction::PosZ.is_positive());
        assert!(!Direction::NegY.is_positive());
        assert_eq!(Direction::PosX.to_string(), "+x");
    }

    #[test]
    fn dimension_counts() {
        assert_eq!(Dimension::Two.corner_count(), 4);
        assert_eq!(Dimension::Three.corner_count(), 8);
        assert_eq!(Dimension::Two.directions().len(), 4);
        assert_eq!(Dimension::Three.directions().len(), 6);
        assert_eq!(Dimension::Two.axes(), &[Axis::X, Axis::Y]);
    }

    #[test]
    fn dimension_from_usize() {
        assert_eq!(Dimension::try_from(2), Ok(Dimension::Two));
        assert_eq!(Dimension::try_from(3), Ok(Dimension::Three));
        assert_eq!(
            Dimension::try_from(4),
            Err(ConfigError::UnsupportedDimension { ndim: 4 })
        );
    }

    #[test]
    fn centroid_and_midpoint_are_exact_on_even_lattice() {
        assert_eq!(midpoint([0, 0, 0], [4, 0, 0]), [2, 0, 0]);
        assert_eq!(
            centroid4([[0, 0, 2], [4, 0, 2], [0, 4, 2], [4, 4, 2]]),
            [2, 2, 2]
        );
    }

    #[test]
    fn face_plane_axes() {
        assert_eq!(Axis::X.others(), (Axis::Y, Axis::Z));
        assert_eq!(Axis::Y.others(), (Axis::X, Axis::Z));
        assert_eq!(Axis::Z.others(), (Axis::X, Axis::Y));
    }
}
