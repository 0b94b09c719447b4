//! Intra prediction.
//!
//! Whole-block modes (DC/V/H/TM) are size-generic and serve 16x16 luma
//! and 8x8 chroma; the ten 4x4 sub-block modes additionally smooth and
//! extrapolate along the diagonals. All arithmetic is bit-exact per
//! RFC 6386: `avg3` / `avg2` rounding, `log2`-based DC shifts, and
//! saturation of the TM sums.

use crate::block::Block;
use crate::plane::Plane;
use crate::types::{clamp255, IntraMode, MbMode};

fn avg3(left: u8, this: u8, right: u8) -> u8 {
    let avg = (u16::from(left) + 2 * u16::from(this) + u16::from(right) + 2) >> 2;
    avg as u8
}

fn avg2(this: u8, right: u8) -> u8 {
    let avg = (u16::from(this) + u16::from(right) + 1) >> 1;
    avg as u8
}

impl Block<16> {
    /// Intra-predicts the macroblock's 16x16 luma pixels.
    pub fn intra_predict(&self, plane: &mut Plane, mode: MbMode) {
        match mode {
            MbMode::DC => self.dc_predict(plane),
            MbMode::V => self.vertical_predict(plane),
            MbMode::H => self.horizontal_predict(plane),
            MbMode::TM => self.true_motion_predict(plane),
        }
    }
}

impl Block<8> {
    /// Intra-predicts an 8x8 chroma block.
    pub fn intra_predict(&self, plane: &mut Plane, mode: MbMode) {
        match mode {
            MbMode::DC => self.dc_predict(plane),
            MbMode::V => self.vertical_predict(plane),
            MbMode::H => self.horizontal_predict(plane),
            MbMode::TM => self.true_motion_predict(plane),
        }
    }
}

impl Block<4> {
    /// Intra-predicts a 4x4 luma sub-block.
    pub fn intra_predict(&self, plane: &mut Plane, mode: IntraMode) {
        match mode {
            IntraMode::DC => self.dc_predict_simple(plane),
            IntraMode::TM => self.true_motion_predict(plane),
            IntraMode::VE => self.vertical_smoothed_predict(plane),
            IntraMode::HE => self.horizontal_smoothed_predict(plane),
            IntraMode::LD => self.left_down_predict(plane),
            IntraMode::RD => self.right_down_predict(plane),
            IntraMode::VR => self.vertical_right_predict(plane),
            IntraMode::VL => self.vertical_left_predict(plane),
            IntraMode::HD => self.horizontal_down_predict(plane),
            IntraMode::HU => self.horizontal_up_predict(plane),
        }
    }
}

impl<const S: usize> Block<S> {
    fn vertical_predict(&self, plane: &mut Plane) {
        let above = self.predictors(plane).above_row;
        let mut block = self.view_mut(plane);
        for row in 0..S {
            block.row_mut(row).copy_from_slice(&above);
        }
    }

    fn horizontal_predict(&self, plane: &mut Plane) {
        let left = self.predictors(plane).left_column;
        let mut block = self.view_mut(plane);
        for (row, &value) in left.iter().enumerate() {
            block.row_mut(row).fill(value);
        }
    }

    fn true_motion_predict(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        let corner = i32::from(p.above_left);
        self.view_mut(plane).forall_ij(|sample, column, row| {
            *sample = clamp255(
                i32::from(p.left_column[row]) + i32::from(p.above_row[column]) - corner,
            );
        });
    }

    /// DC prediction assuming both neighbours, over whatever the
    /// gathered rows hold (synthetic borders included). This is the
    /// 4x4 `DC` mode and the both-present arm of [`Self::dc_predict`].
    fn dc_predict_simple(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        let log2size = S.trailing_zeros();
        let above: i32 = p.above_row.iter().map(|&v| i32::from(v)).sum();
        let left: i32 = p.left_column.iter().map(|&v| i32::from(v)).sum();
        let value = ((above + left + (1 << log2size)) >> (log2size + 1)) as u8;
        self.view_mut(plane).fill(value);
    }

    fn dc_predict(&self, plane: &mut Plane) {
        let context = self.context();
        if context.above && context.left {
            return self.dc_predict_simple(plane);
        }

        let log2size = S.trailing_zeros();
        let mut value = 128;
        if context.above {
            let sum: i32 = self.predictors(plane).above_row.iter().map(|&v| i32::from(v)).sum();
            value = ((sum + (1 << (log2size - 1))) >> log2size) as u8;
        } else if context.left {
            let sum: i32 = self.predictors(plane).left_column.iter().map(|&v| i32::from(v)).sum();
            value = ((sum + (1 << (log2size - 1))) >> log2size) as u8;
        }
        self.view_mut(plane).fill(value);
    }
}

impl Block<4> {
    fn vertical_smoothed_predict(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        let avgs = [
            avg3(p.above(-1), p.above(0), p.above(1)),
            avg3(p.above(0), p.above(1), p.above(2)),
            avg3(p.above(1), p.above(2), p.above(3)),
            avg3(p.above(2), p.above(3), p.above(4)),
        ];
        let mut block = self.view_mut(plane);
        for row in 0..4 {
            block.row_mut(row).copy_from_slice(&avgs);
        }
    }

    fn horizontal_smoothed_predict(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        // the bottom row cannot reach left(4); left(3) is repeated
        let avgs = [
            avg3(p.left(-1), p.left(0), p.left(1)),
            avg3(p.left(0), p.left(1), p.left(2)),
            avg3(p.left(1), p.left(2), p.left(3)),
            avg3(p.left(2), p.left(3), p.left(3)),
        ];
        let mut block = self.view_mut(plane);
        for (row, &avg) in avgs.iter().enumerate() {
            block.row_mut(row).fill(avg);
        }
    }

    fn left_down_predict(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        let a: [u8; 8] = core::array::from_fn(|i| p.above(i as isize));
        // the last entry repeats above(7) instead of reaching above(8)
        let avgs = [
            avg3(a[0], a[1], a[2]),
            avg3(a[1], a[2], a[3]),
            avg3(a[2], a[3], a[4]),
            avg3(a[3], a[4], a[5]),
            avg3(a[4], a[5], a[6]),
            avg3(a[5], a[6], a[7]),
            avg3(a[6], a[7], a[7]),
        ];
        let mut block = self.view_mut(plane);
        for row in 0..4 {
            block.row_mut(row).copy_from_slice(&avgs[row..row + 4]);
        }
    }

    fn right_down_predict(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        let e: [u8; 9] = core::array::from_fn(|i| p.east(i as isize));
        let avgs = [
            avg3(e[0], e[1], e[2]),
            avg3(e[1], e[2], e[3]),
            avg3(e[2], e[3], e[4]),
            avg3(e[3], e[4], e[5]),
            avg3(e[4], e[5], e[6]),
            avg3(e[5], e[6], e[7]),
            avg3(e[6], e[7], e[8]),
        ];
        let mut block = self.view_mut(plane);
        for row in 0..4 {
            block.row_mut(row).copy_from_slice(&avgs[3 - row..7 - row]);
        }
    }

    fn vertical_right_predict(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        let e: [u8; 9] = core::array::from_fn(|i| p.east(i as isize));
        let mut block = self.view_mut(plane);
        block.put(0, 3, avg3(e[1], e[2], e[3]));
        block.put(0, 2, avg3(e[2], e[3], e[4]));
        block.put(1, 3, avg3(e[3], e[4], e[5]));
        block.put(0, 1, avg3(e[3], e[4], e[5]));
        block.put(1, 2, avg2(e[4], e[5]));
        block.put(0, 0, avg2(e[4], e[5]));
        block.put(2, 3, avg3(e[4], e[5], e[6]));
        block.put(1, 1, avg3(e[4], e[5], e[6]));
        block.put(2, 2, avg2(e[5], e[6]));
        block.put(1, 0, avg2(e[5], e[6]));
        block.put(3, 3, avg3(e[5], e[6], e[7]));
        block.put(2, 1, avg3(e[5], e[6], e[7]));
        block.put(3, 2, avg2(e[6], e[7]));
        block.put(2, 0, avg2(e[6], e[7]));
        block.put(3, 1, avg3(e[6], e[7], e[8]));
        block.put(3, 0, avg2(e[7], e[8]));
    }

    fn vertical_left_predict(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        let a: [u8; 8] = core::array::from_fn(|i| p.above(i as isize));
        let mut block = self.view_mut(plane);
        block.put(0, 0, avg2(a[0], a[1]));
        block.put(0, 1, avg3(a[0], a[1], a[2]));
        block.put(0, 2, avg2(a[1], a[2]));
        block.put(1, 0, avg2(a[1], a[2]));
        block.put(1, 1, avg3(a[1], a[2], a[3]));
        block.put(0, 3, avg3(a[1], a[2], a[3]));
        block.put(1, 2, avg2(a[2], a[3]));
        block.put(2, 0, avg2(a[2], a[3]));
        block.put(1, 3, avg3(a[2], a[3], a[4]));
        block.put(2, 1, avg3(a[2], a[3], a[4]));
        block.put(2, 2, avg2(a[3], a[4]));
        block.put(3, 0, avg2(a[3], a[4]));
        block.put(2, 3, avg3(a[3], a[4], a[5]));
        block.put(3, 1, avg3(a[3], a[4], a[5]));
        block.put(3, 2, avg3(a[4], a[5], a[6]));
        block.put(3, 3, avg3(a[5], a[6], a[7]));
    }

    fn horizontal_down_predict(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        let e: [u8; 9] = core::array::from_fn(|i| p.east(i as isize));
        let mut block = self.view_mut(plane);
        block.put(0, 3, avg2(e[0], e[1]));
        block.put(1, 3, avg3(e[0], e[1], e[2]));
        block.put(0, 2, avg2(e[1], e[2]));
        block.put(2, 3, avg2(e[1], e[2]));
        block.put(1, 2, avg3(e[1], e[2], e[3]));
        block.put(3, 3, avg3(e[1], e[2], e[3]));
        block.put(2, 2, avg2(e[2], e[3]));
        block.put(0, 1, avg2(e[2], e[3]));
        block.put(3, 2, avg3(e[2], e[3], e[4]));
        block.put(1, 1, avg3(e[2], e[3], e[4]));
        block.put(2, 1, avg2(e[3], e[4]));
        block.put(0, 0, avg2(e[3], e[4]));
        block.put(3, 1, avg3(e[3], e[4], e[5]));
        block.put(1, 0, avg3(e[3], e[4], e[5]));
        block.put(2, 0, avg3(e[4], e[5], e[6]));
        block.put(3, 0, avg3(e[5], e[6], e[7]));
    }

    fn horizontal_up_predict(&self, plane: &mut Plane) {
        let p = self.predictors(plane);
        let l: [u8; 4] = core::array::from_fn(|i| p.left(i as isize));
        let mut block = self.view_mut(plane);
        block.put(0, 0, avg2(l[0], l[1]));
        block.put(1, 0, avg3(l[0], l[1], l[2]));
        block.put(2, 0, avg2(l[1], l[2]));
        block.put(0, 1, avg2(l[1], l[2]));
        block.put(3, 0, avg3(l[1], l[2], l[3]));
        block.put(1, 1, avg3(l[1], l[2], l[3]));
        block.put(2, 1, avg2(l[2], l[3]));
        block.put(0, 2, avg2(l[2], l[3]));
        block.put(3, 1, avg3(l[2], l[3], l[3]));
        block.put(1, 2, avg3(l[2], l[3], l[3]));
        block.put(2, 2, l[3]);
        block.put(3, 2, l[3]);
        block.put(0, 3, l[3]);
        block.put(1, 3, l[3]);
        block.put(2, 3, l[3]);
        block.put(3, 3, l[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;

    fn block_at<const S: usize>(column: usize, row: usize) -> Block<S> {
        Block::new(column, row, 8)
    }

    #[test]
    fn test_avg2() {
        for i in 0u8..=255 {
            for j in 0u8..=255 {
                let ceil_avg = (f32::from(i) + f32::from(j)) / 2.0;
                let ceil_avg = ceil_avg.ceil() as u8;
                assert_eq!(
                    ceil_avg,
                    avg2(i, j),
                    "avg2({}, {}), expected {}, got {}.",
                    i,
                    j,
                    ceil_avg,
                    avg2(i, j)
                );
            }
        }
    }

    #[test]
    fn test_avg3() {
        for i in 0u8..=255 {
            for j in 0u8..=255 {
                for k in 0u8..=255 {
                    let floor_avg =
                        (2.0f32.mul_add(f32::from(j), f32::from(i)) + { f32::from(k) } + 2.0) / 4.0;
                    let floor_avg = floor_avg.floor() as u8;
                    assert_eq!(
                        floor_avg,
                        avg3(i, j, k),
                        "avg3({}, {}, {}), expected {}, got {}.",
                        i,
                        j,
                        k,
                        floor_avg,
                        avg3(i, j, k)
                    );
                }
            }
        }
    }

    #[test]
    fn test_vertical_propagates_above_row() {
        let mut plane = Plane::new(32, 32);
        // above present, left absent: synthetic 129 column does not
        // participate in V
        let block = block_at::<4>(0, 1);
        for (i, v) in [10, 20, 30, 40].into_iter().enumerate() {
            plane.put(i, 3, v);
        }
        block.vertical_predict(&mut plane);
        for row in 4..8 {
            assert_eq!(plane.row(row)[..4], [10, 20, 30, 40]);
        }
    }

    #[test]
    fn test_horizontal_propagates_left_column() {
        let mut plane = Plane::new(32, 32);
        let block = block_at::<4>(1, 0);
        for (i, v) in [50, 60, 70, 80].into_iter().enumerate() {
            plane.put(3, i, v);
        }
        block.horizontal_predict(&mut plane);
        for (row, v) in [50, 60, 70, 80].into_iter().enumerate() {
            assert_eq!(plane.row(row)[4..8], [v; 4]);
        }
    }

    #[test]
    fn test_true_motion_clamps() {
        let mut plane = Plane::new(32, 32);
        let block = block_at::<4>(1, 1);
        plane.put(3, 3, 200); // corner
        for i in 0..4 {
            plane.put(4 + i, 3, 250); // above
            plane.put(3, 4 + i, if i == 0 { 0 } else { 255 }); // left
        }
        block.true_motion_predict(&mut plane);
        // 0 + 250 - 200 = 50; 255 + 250 - 200 = 305 saturates
        assert_eq!(plane.at(4, 4), 50);
        assert_eq!(plane.at(4, 5), 255);
    }

    #[test]
    fn test_dc_neighbour_fallbacks() {
        let mut plane = Plane::new(32, 32);
        // no neighbours at the grid origin: constant 128
        block_at::<4>(0, 0).dc_predict(&mut plane);
        assert_eq!(plane.at(0, 0), 128);
        assert_eq!(plane.at(3, 3), 128);

        // left only
        let block = block_at::<4>(1, 0);
        for (i, v) in [1, 2, 3, 4].into_iter().enumerate() {
            plane.put(3, i, v);
        }
        block.dc_predict(&mut plane);
        // (1 + 2 + 3 + 4 + 2) >> 2 = 3
        assert_eq!(plane.at(4, 0), 3);

        // above only
        let block = block_at::<4>(0, 1);
        for (i, v) in [5, 6, 7, 8].into_iter().enumerate() {
            plane.put(i, 3, v);
        }
        block.dc_predict(&mut plane);
        // (5 + 6 + 7 + 8 + 2) >> 2 = 7
        assert_eq!(plane.at(0, 4), 7);
    }

    #[test]
    fn test_smoothed_horizontal_repeats_last_sample() {
        let mut plane = Plane::new(32, 32);
        let block = block_at::<4>(1, 1);
        plane.put(3, 3, 5);
        for (i, v) in [4, 3, 2, 1].into_iter().enumerate() {
            plane.put(3, 4 + i, v);
        }
        block.horizontal_smoothed_predict(&mut plane);
        assert_eq!(plane.row(4)[4..8], [4; 4]);
        assert_eq!(plane.row(5)[4..8], [3; 4]);
        assert_eq!(plane.row(6)[4..8], [2; 4]);
        // avg3(2, 1, 1) = 1, not avg3(2, 1, left(4))
        assert_eq!(plane.row(7)[4..8], [1; 4]);
    }

    #[test]
    fn test_right_down_propagates_diagonal() {
        let mut plane = Plane::new(32, 32);
        let block = block_at::<4>(1, 1);
        // a clean diagonal ramp around the corner reproduces itself
        plane.put(3, 3, 5);
        for i in 0..4 {
            plane.put(4 + i, 3, 6 + i as u8); // above: 6 7 8 9
            plane.put(3, 4 + i, 4 - i as u8); // left: 4 3 2 1
        }
        block.right_down_predict(&mut plane);
        #[rustfmt::skip]
        let expected = [
            5, 6, 7, 8,
            4, 5, 6, 7,
            3, 4, 5, 6,
            2, 3, 4, 5,
        ];
        for row in 0..4 {
            assert_eq!(plane.row(4 + row)[4..8], expected[row * 4..row * 4 + 4]);
        }
    }

    #[test]
    fn test_horizontal_up_floods_bottom_with_last_left() {
        let mut plane = Plane::new(32, 32);
        let block = block_at::<4>(1, 1);
        for (i, v) in [8, 6, 4, 2].into_iter().enumerate() {
            plane.put(3, 4 + i, v);
        }
        block.horizontal_up_predict(&mut plane);
        assert_eq!(plane.at(4, 4), avg2(8, 6));
        assert_eq!(plane.at(5, 4), avg3(8, 6, 4));
        assert_eq!(plane.row(7)[4..8], [2; 4]);
        assert_eq!(plane.at(6, 6), 2);
        assert_eq!(plane.at(7, 6), 2);
    }
}
