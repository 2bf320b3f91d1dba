//! Board geometry: grid shape, coordinates, and adjacency.
//!
//! A [`Board`] owns no stones. It answers shape questions (is a point on the
//! grid, which points touch it) and maps points to flat row-major indices so
//! that flood fills can keep their visited flags in a plain `Vec<bool>`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GoError;

/// A point on the board as `(x, y)`, with `x` the column and `y` the row.
pub type Point = (usize, usize);

/// Orthogonal offsets, in the order +x, +y, -x, -y.
const DELTA4: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// The 3x3 block around a point minus the point itself, column by column.
const DELTA8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Immutable grid shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Result<Self, GoError> {
        let (width, height) = Self::check_size(&[width as i64, height as i64])?;
        Ok(Self { width, height })
    }

    /// Validate a user-supplied size.
    ///
    /// A size is valid when it has exactly two components and both are positive.
    pub fn check_size(dims: &[i64]) -> Result<(usize, usize), GoError> {
        if dims.len() != 2 {
            return Err(GoError::InvalidSize("Wrong number of parameters".into()));
        }
        if dims.iter().any(|&d| d <= 0) {
            return Err(GoError::InvalidSize("Parameter should be positive".into()));
        }
        Ok((dims[0] as usize, dims[1] as usize))
    }

    /// Parse a size written as `WxH` (e.g. `9x9`).
    pub fn parse_size(s: &str) -> Result<Self, GoError> {
        let dims = s
            .split(['x', 'X'])
            .map(|part| part.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GoError::InvalidSize(format!("{s:?}: {e}")))?;
        let (width, height) = Self::check_size(&dims)?;
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of points on the board.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, (x, y): Point) -> bool {
        x < self.width && y < self.height
    }

    /// Like [`Board::contains`] for raw input: the point must have exactly two
    /// components, each within `[0, extent)`.
    pub fn contains_coords(&self, coords: &[i64]) -> bool {
        coords.len() == 2
            && (0..self.width as i64).contains(&coords[0])
            && (0..self.height as i64).contains(&coords[1])
    }

    /// Convert raw input into a [`Point`] on this board.
    pub fn point_from_coords(&self, coords: &[i64]) -> Result<Point, GoError> {
        if coords.len() != 2 {
            return Err(GoError::InvalidCoordinate(format!(
                "expected 2 components, got {}",
                coords.len()
            )));
        }
        if coords.iter().any(|&c| c < 0) {
            return Err(GoError::InvalidCoordinate(format!("{coords:?} is negative")));
        }
        let pt = (coords[0] as usize, coords[1] as usize);
        if !self.contains(pt) {
            return Err(GoError::OutOfBounds(pt));
        }
        Ok(pt)
    }

    /// Parse a point written as `x y` or `x,y`.
    pub fn parse_point(&self, s: &str) -> Result<Point, GoError> {
        let coords = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::parse::<i64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GoError::InvalidCoordinate(format!("{s:?}: {e}")))?;
        self.point_from_coords(&coords)
    }

    /// Flat row-major index of an on-board point.
    #[inline]
    pub fn index(&self, (x, y): Point) -> usize {
        debug_assert!(self.contains((x, y)));
        y * self.width + x
    }

    /// Inverse of [`Board::index`].
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        (idx % self.width, idx / self.width)
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let board = *self;
        (0..board.area()).map(move |i| board.point(i))
    }

    /// The up-to-4 orthogonal neighbors of `pt`, in the order +x, +y, -x, -y.
    pub fn neighbors4(&self, pt: Point) -> impl Iterator<Item = Point> + use<> {
        let board = *self;
        DELTA4.into_iter().filter_map(move |d| board.offset(pt, d))
    }

    /// The up-to-8 points of the 3x3 block around `pt`, excluding `pt`.
    pub fn neighbors8(&self, pt: Point) -> impl Iterator<Item = Point> + use<> {
        let board = *self;
        DELTA8.into_iter().filter_map(move |d| board.offset(pt, d))
    }

    fn offset(&self, (x, y): Point, (dx, dy): (isize, isize)) -> Option<Point> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.contains((nx, ny)).then_some((nx, ny))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
