//! Block cursors and neighbour predictors.
//!
//! A [`Block`] is a non-owning cursor into a plane's S×S block grid; it
//! never borrows the raster. Pixel operations take the target [`Plane`]
//! explicitly, and the neighbour sample bundle ([`Predictors`]) is
//! gathered from the live plane immediately before each prediction so
//! that neighbours reconstructed earlier in the same macroblock are
//! seen at their current values.

use crate::plane::{Plane, PlaneViewMut};

/// Neighbour availability for a block, derived from its grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    /// The block directly above has been reconstructed.
    pub above: bool,
    /// The block directly to the left has been reconstructed.
    pub left: bool,
    /// The block diagonally above-left has been reconstructed.
    pub above_left: bool,
    /// The block diagonally above-right exists in the grid.
    pub above_right: bool,
}

/// A cursor addressing one S×S block of a plane (S in {4, 8, 16}).
#[derive(Clone, Copy, Debug)]
pub struct Block<const S: usize> {
    column: usize,
    row: usize,
    context: Context,
    above_right_fixup: Option<AboveRight<S>>,
}

impl<const S: usize> Block<S> {
    pub(crate) fn new(column: usize, row: usize, grid_width: usize) -> Self {
        debug_assert!(column < grid_width);
        Block {
            column,
            row,
            context: Context {
                above: row > 0,
                left: column > 0,
                above_left: column > 0 && row > 0,
                above_right: row > 0 && column + 1 < grid_width,
            },
            above_right_fixup: None,
        }
    }

    /// Block-grid column.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Block-grid row.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Neighbour availability.
    pub fn context(&self) -> Context {
        self.context
    }

    #[inline]
    pub(crate) fn x0(&self) -> usize {
        self.column * S
    }

    #[inline]
    pub(crate) fn y0(&self) -> usize {
        self.row * S
    }

    /// Exclusive view of this block's S×S pixels in `plane`.
    pub fn view_mut<'a>(&self, plane: &'a mut Plane) -> PlaneViewMut<'a> {
        plane.view_mut(self.x0(), self.y0(), S, S)
    }

    /// Gathers the neighbour sample bundle for this block from `plane`.
    pub fn predictors(&self, plane: &Plane) -> Predictors<S> {
        Predictors::gather(
            self.context,
            plane,
            self.x0(),
            self.y0(),
            self.above_right_fixup.as_ref(),
        )
    }

    pub(crate) fn above_right_region(&self, plane: &Plane) -> AboveRight<S> {
        match self.above_right_fixup {
            Some(region) => region,
            None => AboveRight::gather(self.context, plane, self.x0(), self.y0()),
        }
    }

    pub(crate) fn set_above_right_fixup(&mut self, region: AboveRight<S>) {
        self.above_right_fixup = Some(region);
    }
}

/// The above-right neighbour region of a block.
///
/// When the above-right neighbour exists, `row` holds its top-adjacent
/// row and `use_row` is set; otherwise every above-right sample resolves
/// to `bottom_right`, the above neighbour's bottom-right pixel (127 with
/// no above neighbour either).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AboveRight<const S: usize> {
    /// Row-above pixels of the above-right neighbour (127s if absent).
    pub row: [u8; S],
    /// Substitute pixel used when the above-right neighbour is absent.
    pub bottom_right: u8,
    /// Selects between `row` and `bottom_right`.
    pub use_row: bool,
}

impl<const S: usize> AboveRight<S> {
    fn gather(context: Context, plane: &Plane, x0: usize, y0: usize) -> Self {
        AboveRight {
            row: if context.above_right {
                core::array::from_fn(|i| plane.at(x0 + S + i, y0 - 1))
            } else {
                [127; S]
            },
            bottom_right: if context.above {
                plane.at(x0 + S - 1, y0 - 1)
            } else {
                127
            },
            use_row: context.above_right,
        }
    }

    #[inline]
    fn sample(&self, column: usize) -> u8 {
        if self.use_row {
            self.row[column]
        } else {
            self.bottom_right
        }
    }
}

/// Neighbour samples for one block, with synthetic borders filled in.
///
/// Missing neighbours take the VP8 defaults: a constant-127 row above,
/// a constant-129 column to the left, and a corner that tracks
/// whichever synthetic edge applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Predictors<const S: usize> {
    /// The row immediately above this block.
    pub above_row: [u8; S],
    /// The column immediately left of this block.
    pub left_column: [u8; S],
    /// The sample diagonally above-left.
    pub above_left: u8,
    /// The above-right region used by the diagonal 4x4 modes.
    pub above_right: AboveRight<S>,
}

impl<const S: usize> Predictors<S> {
    fn gather(
        context: Context,
        plane: &Plane,
        x0: usize,
        y0: usize,
        fixup: Option<&AboveRight<S>>,
    ) -> Self {
        Predictors {
            above_row: if context.above {
                core::array::from_fn(|i| plane.at(x0 + i, y0 - 1))
            } else {
                [127; S]
            },
            left_column: if context.left {
                core::array::from_fn(|i| plane.at(x0 - 1, y0 + i))
            } else {
                [129; S]
            },
            above_left: if context.above_left {
                plane.at(x0 - 1, y0 - 1)
            } else if context.above {
                129
            } else {
                127
            },
            above_right: match fixup {
                Some(region) => *region,
                None => AboveRight::gather(context, plane, x0, y0),
            },
        }
    }

    /// Sample at `column` of the extended above row.
    ///
    /// `-1` is the above-left corner, `0..S` the above row, and
    /// `S..2S` the above-right region.
    #[inline]
    pub fn above(&self, column: isize) -> u8 {
        debug_assert!(column >= -1 && column < 2 * S as isize);
        if column == -1 {
            self.above_left
        } else if column < S as isize {
            self.above_row[column as usize]
        } else {
            self.above_right.sample(column as usize - S)
        }
    }

    /// Sample at `row` of the left column; `-1` is the above-left corner.
    #[inline]
    pub fn left(&self, row: isize) -> u8 {
        debug_assert!(row >= -1 && row < S as isize);
        if row == -1 {
            self.above_left
        } else {
            self.left_column[row as usize]
        }
    }

    /// The L-shaped neighbour sequence used by the diagonal modes,
    /// linearised: `east(n)` walks up the left column from its bottom,
    /// through the corner, then right along the above row.
    #[inline]
    pub fn east(&self, num: isize) -> u8 {
        debug_assert!((0..=2 * S as isize).contains(&num));
        if num <= 4 {
            self.left(3 - num)
        } else {
            self.above(num - 5)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_at<const S: usize>(column: usize, row: usize) -> Block<S> {
        Block::new(column, row, 4)
    }

    #[test]
    fn test_synthetic_borders_at_origin() {
        let plane = Plane::with_value(16, 16, 200);
        let block = block_at::<4>(0, 0);
        let p = block.predictors(&plane);
        assert_eq!(p.above_row, [127; 4]);
        assert_eq!(p.left_column, [129; 4]);
        assert_eq!(p.above_left, 127);
        assert!(!p.above_right.use_row);
        assert_eq!(p.above_right.bottom_right, 127);
    }

    #[test]
    fn test_corner_tracks_synthetic_edge() {
        let plane = Plane::with_value(16, 16, 200);
        // top row: above absent, corner defaults to 127
        assert_eq!(block_at::<4>(1, 0).predictors(&plane).above_left, 127);
        // left column: above present, corner defaults to 129
        assert_eq!(block_at::<4>(0, 1).predictors(&plane).above_left, 129);
        // interior: corner read from the plane
        assert_eq!(block_at::<4>(1, 1).predictors(&plane).above_left, 200);
    }

    #[test]
    fn test_gathered_neighbours() {
        let mut plane = Plane::new(16, 16);
        // borders of the block anchored at (4, 4)
        for i in 0..4 {
            plane.put(4 + i, 3, 10 + i as u8); // above
            plane.put(3, 4 + i, 50 + i as u8); // left
            plane.put(8 + i, 3, 90 + i as u8); // above-right
        }
        plane.put(3, 3, 42);
        let p = block_at::<4>(1, 1).predictors(&plane);
        assert_eq!(p.above_row, [10, 11, 12, 13]);
        assert_eq!(p.left_column, [50, 51, 52, 53]);
        assert_eq!(p.above_left, 42);
        assert!(p.above_right.use_row);
        assert_eq!(p.above_right.row, [90, 91, 92, 93]);
        assert_eq!(p.above_right.bottom_right, 13);
    }

    #[test]
    fn test_missing_above_right_substitutes_bottom_right() {
        let mut plane = Plane::new(16, 16);
        plane.put(15, 3, 77); // above block's bottom-right pixel
        let p = block_at::<4>(3, 1).predictors(&plane);
        assert!(!p.above_right.use_row);
        assert_eq!(p.above(4), 77);
        assert_eq!(p.above(7), 77);
    }

    #[test]
    fn test_east_linearisation() {
        let mut plane = Plane::new(16, 16);
        for i in 0..4 {
            plane.put(4 + i, 3, 60 + i as u8);
            plane.put(3, 4 + i, 20 + i as u8);
        }
        plane.put(3, 3, 40);
        let p = block_at::<4>(1, 1).predictors(&plane);
        // bottom of the left column up through the corner...
        assert_eq!(p.east(0), 23);
        assert_eq!(p.east(1), 22);
        assert_eq!(p.east(2), 21);
        assert_eq!(p.east(3), 20);
        assert_eq!(p.east(4), 40);
        // ...then along the above row
        assert_eq!(p.east(5), 60);
        assert_eq!(p.east(8), 63);
    }
}
