// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Iterated function systems of affine maps, the Barnsley fern being
//! the one everybody wants.
//!
//! Each step picks one map at random, weighted by its probability,
//! and applies it to the previous point.  Unlike the chaos game there
//! is no burn-in: the fern's attractor is reached almost at once, so
//! every point is kept, the origin included.

use tracing::debug;

use crate::color::{ColorScheme, Colors};
use crate::error::InvalidParameter;
use crate::params;
use crate::random::RandomSource;
use crate::Point;

const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// (x, y) ↦ (a·x + b·y + e, c·x + d·y + f), chosen with probability
/// `p`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AffineMap {
    /// Top-left of the linear part.
    pub a: f64,
    /// Top-right of the linear part.
    pub b: f64,
    /// Bottom-left of the linear part.
    pub c: f64,
    /// Bottom-right of the linear part.
    pub d: f64,
    /// Horizontal translation.
    pub e: f64,
    /// Vertical translation.
    pub f: f64,
    /// Selection probability.
    pub p: f64,
}

impl AffineMap {
    /// Builds a map from its six coefficients and its probability.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, p: f64) -> Self {
        AffineMap { a, b, c, d, e, f, p }
    }

    /// Applies the map to a point.
    #[inline]
    pub fn apply(&self, z: Point) -> Point {
        Point::new(
            self.a * z.re + self.b * z.im + self.e,
            self.c * z.re + self.d * z.im + self.f,
        )
    }
}

/// The four maps of the Barnsley fern: stem, successively smaller
/// leaflets, largest left-hand leaflet, largest right-hand leaflet.
pub const BARNSLEY: [AffineMap; 4] = [
    AffineMap::new(0.0, 0.0, 0.0, 0.16, 0.0, 0.0, 0.01),
    AffineMap::new(0.85, 0.04, -0.04, 0.85, 0.0, 1.60, 0.85),
    AffineMap::new(0.20, -0.26, 0.23, 0.22, 0.0, 1.60, 0.07),
    AffineMap::new(-0.15, 0.28, 0.26, 0.24, 0.0, 0.44, 0.07),
];

/// A weighted set of affine maps, with the probabilities folded into
/// a cumulative table once at construction.
#[derive(Clone, Debug)]
pub struct AffineIfs {
    maps: Vec<AffineMap>,
    cumulative: Vec<f64>,
}

/// The outcome of one `iterate` call: every point, and the index of
/// the map that produced it.  The origin was produced by no map and is
/// recorded as map 0.
#[derive(Clone, Debug, PartialEq)]
pub struct IfsRun {
    /// Generated points, starting at the origin.
    pub points: Vec<Point>,
    /// The map chosen at each step.
    pub maps: Vec<usize>,
    map_count: usize,
}

impl IfsRun {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// A run always has at least one point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The number of maps the run chose from.
    pub fn map_count(&self) -> usize {
        self.map_count
    }

    /// Colors for the run's points under the given scheme.
    pub fn colors(&self, scheme: ColorScheme) -> Colors {
        scheme.apply(&self.maps, self.map_count)
    }
}

impl AffineIfs {
    /// Accepts any non-empty map set whose probabilities are finite,
    /// non-negative, and sum to 1.
    pub fn new(maps: Vec<AffineMap>) -> Result<Self, InvalidParameter> {
        if let Some(bad) = maps.iter().find(|m| !m.p.is_finite() || m.p < 0.0) {
            return Err(InvalidParameter::BadWeight(bad.p));
        }
        let cumulative: Vec<f64> = maps
            .iter()
            .scan(0.0, |total, m| {
                *total += m.p;
                Some(*total)
            })
            .collect();
        let total = cumulative.last().cloned().unwrap_or(0.0);
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(InvalidParameter::ProbabilitySum(total));
        }
        Ok(AffineIfs { maps, cumulative })
    }

    /// The Barnsley fern.
    pub fn barnsley() -> Self {
        let cumulative = BARNSLEY
            .iter()
            .scan(0.0, |total, m| {
                *total += m.p;
                Some(*total)
            })
            .collect();
        AffineIfs {
            maps: BARNSLEY.to_vec(),
            cumulative,
        }
    }

    /// The cumulative selection probabilities.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Draws one float and returns the index of the first map whose
    /// cumulative probability exceeds it.  A draw landing exactly on a
    /// boundary belongs to the later map.  Rounding can leave the last
    /// cumulative value a hair under 1, so the last map also catches
    /// anything that falls off the end.
    pub fn choose_map<R: RandomSource>(&self, rng: &mut R) -> usize {
        let u = rng.uniform01();
        self.cumulative
            .iter()
            .position(|&p| u < p)
            .unwrap_or(self.maps.len() - 1)
    }

    /// Generates `n` points starting at the origin.
    pub fn iterate<R: RandomSource>(&self, n: usize, rng: &mut R) -> Result<IfsRun, InvalidParameter> {
        if n == 0 {
            return Err(InvalidParameter::NoSteps);
        }
        params::check_step_count(n)?;
        debug!(maps = self.maps.len(), steps = n, "iterating affine maps");

        let mut points = Vec::with_capacity(n);
        let mut maps = Vec::with_capacity(n);
        let mut point = Point::new(0.0, 0.0);
        points.push(point);
        maps.push(0);

        for _ in 1..n {
            let index = self.choose_map(rng);
            point = self.maps[index].apply(point);
            points.push(point);
            maps.push(index);
        }
        Ok(IfsRun {
            points,
            maps,
            map_count: self.maps.len(),
        })
    }
}

impl Default for AffineIfs {
    fn default() -> Self {
        AffineIfs::barnsley()
    }
}
