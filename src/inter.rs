//! Inter prediction: six-tap eighth-pel motion compensation.
//!
//! The filter is separable and runs horizontally first over an
//! intermediate strip of S+5 rows, then vertically. Phase 0 is the
//! identity tap `[0, 0, 128, 0, 0, 0]`, so single-axis motion collapses
//! to one pass and pure integer motion to a row copy. When the filter
//! window leaves the reference, samples are acquired through an
//! edge-extended patch (reads clamp to the nearest edge sample); both
//! acquisition paths feed the same resampling arithmetic.

use crate::block::Block;
use crate::plane::Plane;
use crate::types::{clamp255, MotionVector};

/// Six-tap interpolation filters indexed by the 3-bit sub-pel phase.
const SIXTAP_FILTERS: [[i32; 6]; 8] = [
    [0, 0, 128, 0, 0, 0],
    [0, -6, 123, 12, -1, 0],
    [2, -11, 108, 36, -8, 1],
    [0, -9, 93, 50, -6, 0],
    [3, -16, 77, 77, -16, 3],
    [0, -6, 50, 93, -9, 0],
    [1, -8, 36, 108, -11, 2],
    [0, -1, 12, 123, -6, 0],
];

/// Taps reaching left/up of the source position.
const EDGE_PRE: usize = 2;
/// Taps reaching right/down of the source position.
const EDGE_POST: usize = 3;

/// Stride of the stack scratch used for edge-extended acquisition.
/// Must hold 16 + 5 samples per row.
const PATCH_STRIDE: usize = 32;
/// Stride of the intermediate strip between the two filter passes.
const TMP_STRIDE: usize = 16;

#[inline]
fn sixtap(src: &[u8], pos: usize, step: usize, filter: &[i32; 6]) -> u8 {
    let mut val = 64;
    for (i, tap) in filter.iter().enumerate() {
        val += i32::from(src[pos + i * step]) * tap;
    }
    clamp255(val >> 7)
}

/// Resamples one `size`×`size` block. `src` starts `EDGE_PRE` samples
/// up and left of the integer source position.
#[allow(clippy::too_many_arguments)]
fn predict_block(
    dst: &mut [u8],
    mut doff: usize,
    dstride: usize,
    src: &[u8],
    sstride: usize,
    size: usize,
    mx: usize,
    my: usize,
) {
    if mx == 0 && my == 0 {
        let src = &src[EDGE_PRE + EDGE_PRE * sstride..];
        for (out, src_row) in dst[doff..]
            .chunks_mut(dstride)
            .take(size)
            .zip(src.chunks(sstride))
        {
            out[..size].copy_from_slice(&src_row[..size]);
        }
    } else if my == 0 {
        let filter = &SIXTAP_FILTERS[mx];
        let src = &src[EDGE_PRE * sstride..];
        for src_row in src.chunks(sstride).take(size) {
            for x in 0..size {
                dst[doff + x] = sixtap(src_row, x, 1, filter);
            }
            doff += dstride;
        }
    } else if mx == 0 {
        let filter = &SIXTAP_FILTERS[my];
        let src = &src[EDGE_PRE..];
        for y in 0..size {
            for x in 0..size {
                dst[doff + x] = sixtap(src, x + y * sstride, sstride, filter);
            }
            doff += dstride;
        }
    } else {
        let horizontal_filter = &SIXTAP_FILTERS[mx];
        let vertical_filter = &SIXTAP_FILTERS[my];
        let mut tmp = [0u8; TMP_STRIDE * (16 + EDGE_PRE + EDGE_POST)];
        for (y, row) in tmp
            .chunks_mut(TMP_STRIDE)
            .take(size + EDGE_PRE + EDGE_POST)
            .enumerate()
        {
            for x in 0..size {
                row[x] = sixtap(src, x + y * sstride, 1, horizontal_filter);
            }
        }
        for y in 0..size {
            for x in 0..size {
                dst[doff + x] = sixtap(&tmp, x + y * TMP_STRIDE, TMP_STRIDE, vertical_filter);
            }
            doff += dstride;
        }
    }
}

/// Reference reads with coordinates clamped to the nearest edge sample.
struct EdgeExtended<'a> {
    plane: &'a Plane,
}

impl EdgeExtended<'_> {
    #[inline]
    fn at(&self, column: isize, row: isize) -> u8 {
        let column = column.clamp(0, self.plane.width() as isize - 1) as usize;
        let row = row.clamp(0, self.plane.height() as isize - 1) as usize;
        self.plane.at(column, row)
    }
}

impl<const S: usize> Block<S> {
    /// Predicts this block from `reference` at motion vector `mv`,
    /// writing into `plane`.
    ///
    /// Reads that would fall outside the reference clamp to its edges;
    /// this is a normal case near frame borders, not an error.
    pub fn safe_inter_predict(&self, plane: &mut Plane, mv: MotionVector, reference: &Plane) {
        let source_column = self.x0() as isize + (mv.x >> 3) as isize;
        let source_row = self.y0() as isize + (mv.y >> 3) as isize;
        let mx = (mv.x & 7) as usize;
        let my = (mv.y & 7) as usize;

        let doff = plane.index_of(self.x0(), self.y0());
        let dstride = plane.stride();

        let window = (S + EDGE_PRE + EDGE_POST) as isize;
        if source_column - (EDGE_PRE as isize) < 0
            || source_column + window - (EDGE_PRE as isize) > reference.width() as isize
            || source_row - (EDGE_PRE as isize) < 0
            || source_row + window - (EDGE_PRE as isize) > reference.height() as isize
        {
            let extended = EdgeExtended { plane: reference };
            let mut patch = [0u8; PATCH_STRIDE * (16 + EDGE_PRE + EDGE_POST)];
            for (j, row) in patch
                .chunks_mut(PATCH_STRIDE)
                .take(S + EDGE_PRE + EDGE_POST)
                .enumerate()
            {
                for (i, sample) in row.iter_mut().take(S + EDGE_PRE + EDGE_POST).enumerate() {
                    *sample = extended.at(
                        source_column - EDGE_PRE as isize + i as isize,
                        source_row - EDGE_PRE as isize + j as isize,
                    );
                }
            }
            predict_block(
                plane.data_mut(),
                doff,
                dstride,
                &patch,
                PATCH_STRIDE,
                S,
                mx,
                my,
            );
        } else {
            let sstride = reference.stride();
            let soff = (source_row as usize - EDGE_PRE) * sstride
                + (source_column as usize - EDGE_PRE);
            predict_block(
                plane.data_mut(),
                doff,
                dstride,
                &reference.data()[soff..],
                sstride,
                S,
                mx,
                my,
            );
        }
    }
}
