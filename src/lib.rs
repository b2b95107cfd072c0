#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Iterated function system fractals
//!
//! Three ways of growing a fractal out of a single point and a pair of
//! dice.  The chaos game walks a point towards randomly chosen corners
//! of a regular polygon; the Barnsley fern feeds a point through
//! randomly chosen affine maps; and the fractal-flame variations bend
//! whatever point cloud either of them produced through non-linear
//! warps of the plane.
//!
//! The generators produce arrays: points, in the order they were
//! generated, and the corner or map chosen at each step, from which
//! colors are derived.  Randomness is always borrowed from the caller
//! as a `RandomSource`, so a fixed seed (or a fixed script) always
//! produces the same fractal.  Drawing the arrays onto an image lives
//! in `render`.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;

/// A point on the real plane, x in the real part and y in the
/// imaginary part.
pub type Point = num::Complex<f64>;

pub mod chaos;
pub mod color;
pub mod error;
pub mod fern;
pub mod params;
pub mod planes;
pub mod polygon;
pub mod random;
pub mod render;
pub mod variations;

pub use chaos::{ChaosGame, ChaosRun, DEFAULT_DISCARD};
pub use color::{ColorScheme, Colors};
pub use error::InvalidParameter;
pub use fern::{AffineIfs, AffineMap, IfsRun};
pub use polygon::Polygon;
pub use random::{RandomSource, RngSource, Scripted};
pub use render::{Colormap, Renderer};
pub use variations::{Variation, Variations};
