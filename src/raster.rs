//! Frame storage: Y/U/V planes with macroblock-aligned backing.

use thiserror::Error;

use crate::block::Block;
use crate::plane::Plane;

/// Errors surfaced by this crate.
///
/// Per-block prediction has no recoverable errors; only raster
/// construction can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PredictionError {
    /// The input violates a structural invariant.
    #[error("unsupported input: {0}")]
    Unsupported(&'static str),
}

/// One frame's sample storage: a full-resolution Y plane and
/// half-resolution U and V planes.
///
/// Backing storage is rounded up to whole macroblocks (16-pixel
/// multiples for Y, 8 for U/V) while the display dimensions are kept
/// verbatim. Blocks handed out by the accessors below are transient
/// cursors; they carry no borrow of the raster.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    display_width: usize,
    display_height: usize,
    macroblocks_wide: usize,
    macroblocks_high: usize,
    y: Plane,
    u: Plane,
    v: Plane,
}

impl Raster {
    /// Creates a raster for the given display dimensions.
    ///
    /// # Errors
    ///
    /// Fails with [`PredictionError::Unsupported`] when either
    /// dimension is odd (chroma is subsampled by two on each axis).
    pub fn new(display_width: usize, display_height: usize) -> Result<Self, PredictionError> {
        if display_width % 2 != 0 || display_height % 2 != 0 {
            return Err(PredictionError::Unsupported(
                "display dimensions must be even",
            ));
        }
        let macroblocks_wide = display_width.div_ceil(16);
        let macroblocks_high = display_height.div_ceil(16);
        Ok(Raster {
            display_width,
            display_height,
            macroblocks_wide,
            macroblocks_high,
            y: Plane::new(macroblocks_wide * 16, macroblocks_high * 16),
            u: Plane::new(macroblocks_wide * 8, macroblocks_high * 8),
            v: Plane::new(macroblocks_wide * 8, macroblocks_high * 8),
        })
    }

    /// Display width as given at construction.
    pub fn display_width(&self) -> usize {
        self.display_width
    }

    /// Display height as given at construction.
    pub fn display_height(&self) -> usize {
        self.display_height
    }

    /// Width of the frame in macroblocks.
    pub fn macroblocks_wide(&self) -> usize {
        self.macroblocks_wide
    }

    /// Height of the frame in macroblocks.
    pub fn macroblocks_high(&self) -> usize {
        self.macroblocks_high
    }

    /// The luma plane.
    pub fn y(&self) -> &Plane {
        &self.y
    }

    /// The luma plane, mutably.
    pub fn y_mut(&mut self) -> &mut Plane {
        &mut self.y
    }

    /// The U chroma plane.
    pub fn u(&self) -> &Plane {
        &self.u
    }

    /// The U chroma plane, mutably.
    pub fn u_mut(&mut self) -> &mut Plane {
        &mut self.u
    }

    /// The V chroma plane.
    pub fn v(&self) -> &Plane {
        &self.v
    }

    /// The V chroma plane, mutably.
    pub fn v_mut(&mut self) -> &mut Plane {
        &mut self.v
    }

    /// The 16x16 luma block of macroblock `(column, row)`.
    pub fn y_macroblock(&self, column: usize, row: usize) -> Block<16> {
        debug_assert!(row < self.macroblocks_high);
        Block::new(column, row, self.macroblocks_wide)
    }

    /// A 4x4 luma sub-block on the frame-wide sub-block grid.
    pub fn y_subblock(&self, column: usize, row: usize) -> Block<4> {
        debug_assert!(row < self.macroblocks_high * 4);
        Block::new(column, row, self.macroblocks_wide * 4)
    }

    /// The 8x8 U block of macroblock `(column, row)`.
    pub fn u_block(&self, column: usize, row: usize) -> Block<8> {
        debug_assert!(row < self.macroblocks_high);
        Block::new(column, row, self.macroblocks_wide)
    }

    /// The 8x8 V block of macroblock `(column, row)`.
    pub fn v_block(&self, column: usize, row: usize) -> Block<8> {
        debug_assert!(row < self.macroblocks_high);
        Block::new(column, row, self.macroblocks_wide)
    }

    /// A 4x4 U sub-block on the frame-wide chroma sub-block grid.
    pub fn u_subblock(&self, column: usize, row: usize) -> Block<4> {
        debug_assert!(row < self.macroblocks_high * 2);
        Block::new(column, row, self.macroblocks_wide * 2)
    }

    /// A 4x4 V sub-block on the frame-wide chroma sub-block grid.
    pub fn v_subblock(&self, column: usize, row: usize) -> Block<4> {
        debug_assert!(row < self.macroblocks_high * 2);
        Block::new(column, row, self.macroblocks_wide * 2)
    }
}
