// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The regular n-gon the chaos game is played on.  Its corners sit on
//! the unit circle, the first one straight up at (0, 1), and the rest
//! follow clockwise at even angular steps.

use crate::error::InvalidParameter;
use crate::params;
use crate::Point;
use std::f64::consts::PI;

/// The fixed corners of a regular polygon inscribed in the unit
/// circle.  Computed once; never touched again.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    corners: Vec<Point>,
}

impl Polygon {
    /// Builds the n corners at angles 2πi/n, as (sin θ, cos θ).
    pub fn new(n: usize) -> Result<Polygon, InvalidParameter> {
        let n = params::check_sides(n as i64)?;
        let step = 2.0 * PI / (n as f64);
        let corners = (0..n)
            .map(|i| {
                let theta = step * (i as f64);
                Point::new(theta.sin(), theta.cos())
            })
            .collect();
        Ok(Polygon { corners })
    }

    /// The number of corners.
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// Describes that the polygon has no corners, which never happens.
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// The corners, in angular order.
    pub fn corners(&self) -> &[Point] {
        &self.corners
    }

    /// A single corner.
    pub fn corner(&self, index: usize) -> Point {
        self.corners[index]
    }

    /// The convex combination of the corners under the given weights.
    /// The weights are normalized here; if they sum to nothing at all
    /// every corner gets an equal share and we land on the centre.
    pub fn combine(&self, weights: &[f64]) -> Point {
        debug_assert_eq!(weights.len(), self.corners.len());
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            let share = 1.0 / (self.corners.len() as f64);
            return self.corners.iter().fold(Point::new(0.0, 0.0), |acc, c| acc + *c * share);
        }
        self.corners
            .iter()
            .zip(weights)
            .fold(Point::new(0.0, 0.0), |acc, (c, w)| acc + *c * (w / total))
    }
}

/// The contraction ratio, in this crate's convention of "fraction of
/// the current point kept", at which the n scaled copies of the
/// polygon just touch.  Based on Abdulaziz & Said, "On the contraction
/// ratio of iterated function systems whose attractors are Sierpinski
/// n-gons", Chaos, Solitons & Fractals 150 (2021).
pub fn optimal_ratio(n: usize) -> Result<f64, InvalidParameter> {
    let n = params::check_sides(n as i64)?;
    let nf = n as f64;
    let alpha = match n % 4 {
        0 => (PI / nf).tan(),
        2 => (PI / nf).sin(),
        _ => 2.0 * (PI / (2.0 * nf)).sin(),
    };
    // The paper's ratio is the jump toward the corner; we keep the rest.
    Ok(1.0 - 1.0 / (1.0 + alpha))
}
