//! VP8 pixel prediction core
//!
//! Copyright (C) 2025 Imazen LLC
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU Affero General Public License as published
//! by the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! For commercial licensing inquiries: support@imazen.io
//!
//! This crate implements the intra- and inter-frame pixel prediction of
//! a VP8-compatible video decoder: given a partially reconstructed
//! frame, it fills a block's pixels by extrapolating from reconstructed
//! neighbours, or by resampling a reference frame at an eighth-pel
//! motion vector through the VP8 six-tap filter. The output is the
//! *predicted* block; residuals decoded elsewhere are added on top.
//!
//! Prediction is bit-exact: rounding, saturation, the synthetic 127/129
//! frame borders, and the above-right special cases all follow RFC 6386
//! to the sample. Entropy decoding, dequantization, the inverse
//! transform, and the loop filter are deliberately out of scope — mode
//! enums and motion vectors arrive from the caller, predicted samples
//! go back out through the raster.
//!
//! # Layout
//!
//! A [`Raster`] owns the Y/U/V [`Plane`]s of one frame, rounded up to
//! whole macroblocks. [`Block`] handles are transient cursors onto a
//! plane's block grid; [`Raster::macroblock`] assembles the composite
//! of blocks decoded together, including the right-edge neighbour
//! fix-ups. Neighbour samples ([`Predictors`]) are gathered fresh for
//! every prediction so that blocks inside a macroblock see their
//! just-reconstructed neighbours.
//!
//! ```rust
//! use zenvp8::{IntraMode, MbMode, MotionVector, Raster};
//!
//! let mut raster = Raster::new(64, 48)?;
//! let mb = raster.macroblock(0, 0);
//!
//! // whole-macroblock luma, then one 4x4 sub-block
//! mb.y.intra_predict(raster.y_mut(), MbMode::DC);
//! assert_eq!(raster.y().at(0, 0), 128);
//! mb.y_sub[0][1].intra_predict(raster.y_mut(), IntraMode::HU);
//!
//! // motion compensation from a reference frame
//! let reference = raster.clone();
//! mb.u.safe_inter_predict(raster.u_mut(), MotionVector::new(-3, 9), reference.u());
//! # Ok::<(), zenvp8::PredictionError>(())
//! ```
//!
//! # no_std Support
//!
//! The crate works without `std` (requires `alloc`):
//! ```toml
//! [dependencies]
//! zenvp8 = { version = "...", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

mod block;
mod inter;
mod intra;
mod macroblock;
mod plane;
mod raster;
mod types;

pub use block::{AboveRight, Block, Context, Predictors};
pub use macroblock::Macroblock;
pub use plane::{Plane, PlaneView, PlaneViewMut};
pub use raster::{PredictionError, Raster};
pub use types::{IntraMode, MbMode, MotionVector};
