// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fractal-flame variations
//!
//! A variation is a non-linear warp of the plane.  Given a point set
//! (a chaos game run, a fern, a plain grid) we can bend it through one
//! variation, or through a weighted blend of several, and see what the
//! attractor looks like afterwards.  The polar quantities every
//! variation leans on are computed once, when the point set is handed
//! over, and reused for every blend asked of it.

use itertools::{izip, Itertools, MinMaxResult};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::InvalidParameter;
use crate::Point;

/// The variations we know how to apply.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variation {
    /// The identity.
    Linear,
    /// Rotation by an angle growing with the square of the radius.
    Swirl,
    /// r·(sin(θ + r), cos(θ − r)).
    Handkerchief,
    /// (θ/π)·(sin(πr), cos(πr)).
    Disc,
}

impl Variation {
    /// Every variation, in a stable order.
    pub const ALL: [Variation; 4] = [
        Variation::Linear,
        Variation::Swirl,
        Variation::Handkerchief,
        Variation::Disc,
    ];

    /// The name a variation is selected by.
    pub fn name(self) -> &'static str {
        match self {
            Variation::Linear => "linear",
            Variation::Swirl => "swirl",
            Variation::Handkerchief => "handkerchief",
            Variation::Disc => "disc",
        }
    }

    /// Applies the variation to one point, given its cartesian and
    /// polar coordinates.  θ is measured from the y axis, as atan2(x, y).
    #[inline]
    pub fn apply(self, x: f64, y: f64, r: f64, theta: f64) -> (f64, f64) {
        match self {
            Variation::Linear => (x, y),
            Variation::Swirl => {
                let (s, c) = (r * r).sin_cos();
                (x * s - y * c, x * c + y * s)
            }
            Variation::Handkerchief => (r * (theta + r).sin(), r * (theta - r).cos()),
            Variation::Disc => {
                let (s, c) = (PI * r).sin_cos();
                let scale = theta / PI;
                (scale * s, scale * c)
            }
        }
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variation {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variation::ALL
            .iter()
            .cloned()
            .find(|v| v.name() == s)
            .ok_or_else(|| InvalidParameter::UnknownVariation(s.to_string()))
    }
}

/// A point set prepared for warping: the coordinates plus their radii
/// and both polar angles.  None of it changes after construction.
#[derive(Clone, Debug)]
pub struct Variations {
    x: Vec<f64>,
    y: Vec<f64>,
    r: Vec<f64>,
    theta: Vec<f64>,
    phi: Vec<f64>,
}

impl Variations {
    /// Takes a point set and precomputes r = |z|, θ = atan2(x, y) and
    /// φ = atan2(y, x) for every point.
    pub fn new(points: &[Point]) -> Self {
        let x: Vec<f64> = points.iter().map(|p| p.re).collect();
        let y: Vec<f64> = points.iter().map(|p| p.im).collect();
        let r = points.iter().map(|p| p.norm()).collect();
        let theta = points.iter().map(|p| p.re.atan2(p.im)).collect();
        let phi = points.iter().map(|p| p.im.atan2(p.re)).collect();
        Variations { x, y, r, theta, phi }
    }

    /// The number of points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether there are no points at all.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Distance of each point from the origin.
    pub fn r(&self) -> &[f64] {
        &self.r
    }

    /// Angle of each point measured from the y axis.
    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// Conventional polar angle of each point, measured from the x axis.
    pub fn phi(&self) -> &[f64] {
        &self.phi
    }

    /// Warps every point through a single variation.
    pub fn apply(&self, variation: Variation) -> Vec<Point> {
        izip!(&self.x, &self.y, &self.r, &self.theta)
            .map(|(&x, &y, &r, &theta)| {
                let (u, v) = variation.apply(x, y, r, theta);
                Point::new(u, v)
            })
            .collect()
    }

    /// Warps every point through a weighted blend of variations.  The
    /// raw weights are normalized to sum to 1 first.
    pub fn blend(&self, weighted: &[(Variation, f64)]) -> Result<Vec<Point>, InvalidParameter> {
        let weights = normalize(weighted.iter().map(|(_, w)| *w))?;
        let names = weighted.iter().map(|(v, _)| v.name()).join(",");
        debug!(points = self.len(), variations = %names, "blending variations");

        let mut out = vec![Point::new(0.0, 0.0); self.len()];
        for ((variation, _), weight) in weighted.iter().zip(weights) {
            if weight == 0.0 {
                continue;
            }
            for (acc, (&x, &y, &r, &theta)) in out
                .iter_mut()
                .zip(izip!(&self.x, &self.y, &self.r, &self.theta))
            {
                let (u, v) = variation.apply(x, y, r, theta);
                acc.re += weight * u;
                acc.im += weight * v;
            }
        }
        Ok(out)
    }

    /// The string-keyed form of `blend`: parallel lists of variation
    /// names and raw weights.
    pub fn combine(&self, names: &[&str], weights: &[f64]) -> Result<Vec<Point>, InvalidParameter> {
        if names.len() != weights.len() {
            return Err(InvalidParameter::WeightCountMismatch {
                variations: names.len(),
                weights: weights.len(),
            });
        }
        let weighted = names
            .iter()
            .zip(weights)
            .map(|(name, weight)| Ok((name.parse::<Variation>()?, *weight)))
            .collect::<Result<Vec<_>, InvalidParameter>>()?;
        self.blend(&weighted)
    }
}

fn normalize<I: Iterator<Item = f64>>(weights: I) -> Result<Vec<f64>, InvalidParameter> {
    let weights: Vec<f64> = weights.collect();
    if let Some(&bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(InvalidParameter::BadWeight(bad));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(InvalidParameter::ZeroWeights);
    }
    Ok(weights.into_iter().map(|w| w / total).collect())
}

fn rescale(values: &[f64]) -> Vec<f64> {
    match values.iter().minmax() {
        MinMaxResult::MinMax(&lo, &hi) if hi > lo => values
            .iter()
            .map(|v| 2.0 * (v - lo) / (hi - lo) - 1.0)
            .collect(),
        _ => vec![0.0; values.len()],
    }
}

/// Stretches each axis of a point set linearly onto [-1, 1], so that a
/// fern several units tall gets the same treatment from the variations
/// as a polygon inscribed in the unit circle.  An axis with no spread
/// collapses to 0.
pub fn fit_unit_square(points: &[Point]) -> Vec<Point> {
    let x: Vec<f64> = points.iter().map(|p| p.re).collect();
    let y: Vec<f64> = points.iter().map(|p| p.im).collect();
    rescale(&x)
        .into_iter()
        .zip(rescale(&y))
        .map(|(x, y)| Point::new(x, y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(n: usize) -> Vec<Point> {
        let step = 2.0 / ((n - 1) as f64);
        (0..n)
            .flat_map(|i| {
                (0..n).map(move |j| {
                    Point::new(-1.0 + step * (i as f64), -1.0 + step * (j as f64))
                })
            })
            .collect()
    }

    fn assert_points_eq(a: &[Point], b: &[Point]) {
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(b) {
            assert_relative_eq!(p.re, q.re, epsilon = 1e-12);
            assert_relative_eq!(p.im, q.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn names_round_trip_and_unknowns_fail() {
        for v in Variation::ALL.iter() {
            assert_eq!(v.name().parse::<Variation>(), Ok(*v));
        }
        assert_eq!(
            "spherical".parse::<Variation>(),
            Err(InvalidParameter::UnknownVariation("spherical".to_string()))
        );
    }

    #[test]
    fn polar_quantities_are_precomputed() {
        let vars = Variations::new(&[Point::new(3.0, 4.0), Point::new(0.0, -2.0)]);
        assert_eq!(vars.r(), &[5.0, 2.0]);
        assert_relative_eq!(vars.theta()[0], (3.0f64).atan2(4.0));
        assert_relative_eq!(vars.theta()[1], PI);
        assert_relative_eq!(vars.phi()[0], (4.0f64).atan2(3.0));
        assert_relative_eq!(vars.phi()[1], -PI / 2.0);
    }

    #[test]
    fn linear_is_the_identity() {
        let points = grid(11);
        let vars = Variations::new(&points);
        assert_eq!(vars.apply(Variation::Linear), points);
    }

    #[test]
    fn zero_weights_contribute_nothing() {
        let points = grid(9);
        let vars = Variations::new(&points);
        for other in &[Variation::Swirl, Variation::Handkerchief, Variation::Disc] {
            let blended = vars.blend(&[(Variation::Linear, 1.0), (*other, 0.0)]).unwrap();
            assert_points_eq(&blended, &points);
        }
        let blended = vars.combine(&["linear", "disc"], &[1.0, 0.0]).unwrap();
        assert_points_eq(&blended, &points);
    }

    #[test]
    fn weights_are_normalized() {
        let points = grid(7);
        let vars = Variations::new(&points);
        let swirl = vars.apply(Variation::Swirl);
        assert_points_eq(&vars.blend(&[(Variation::Swirl, 42.0)]).unwrap(), &swirl);

        let disc = vars.apply(Variation::Disc);
        let half = vars.combine(&["swirl", "disc"], &[3.0, 3.0]).unwrap();
        let expected: Vec<Point> = swirl.iter().zip(&disc).map(|(s, d)| (s + d) * 0.5).collect();
        assert_points_eq(&half, &expected);
    }

    #[test]
    fn known_values() {
        let vars = Variations::new(&[Point::new(1.0, 0.0)]);
        // r = 1, θ = π/2
        let swirl = vars.apply(Variation::Swirl)[0];
        assert_relative_eq!(swirl.re, (1.0f64).sin());
        assert_relative_eq!(swirl.im, (1.0f64).cos());
        let hk = vars.apply(Variation::Handkerchief)[0];
        assert_relative_eq!(hk.re, (PI / 2.0 + 1.0).sin());
        assert_relative_eq!(hk.im, (PI / 2.0 - 1.0).cos());
        let disc = vars.apply(Variation::Disc)[0];
        assert_relative_eq!(disc.re, 0.5 * PI.sin(), epsilon = 1e-12);
        assert_relative_eq!(disc.im, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn the_same_set_serves_many_blends() {
        let points = grid(5);
        let vars = Variations::new(&points);
        let first = vars.combine(&["handkerchief", "disc"], &[0.3, 0.7]).unwrap();
        let _ = vars.combine(&["swirl", "linear"], &[0.9, 0.1]).unwrap();
        let again = vars.combine(&["handkerchief", "disc"], &[0.3, 0.7]).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn bad_blends_are_rejected() {
        let vars = Variations::new(&grid(3));
        assert_eq!(
            vars.combine(&["linear"], &[0.5, 0.5]).unwrap_err(),
            InvalidParameter::WeightCountMismatch {
                variations: 1,
                weights: 2
            }
        );
        assert_eq!(
            vars.combine(&["linear", "swirl"], &[0.0, 0.0]).unwrap_err(),
            InvalidParameter::ZeroWeights
        );
        assert_eq!(
            vars.combine(&["linear"], &[-1.0]).unwrap_err(),
            InvalidParameter::BadWeight(-1.0)
        );
        assert!(vars.combine(&["twirl"], &[1.0]).is_err());
        assert_eq!(vars.blend(&[]).unwrap_err(), InvalidParameter::ZeroWeights);
    }

    #[test]
    fn fit_unit_square_stretches_each_axis() {
        let fitted = fit_unit_square(&[Point::new(-2.0, 0.0), Point::new(2.0, 10.0), Point::new(0.0, 5.0)]);
        assert_points_eq(
            &fitted,
            &[Point::new(-1.0, -1.0), Point::new(1.0, 1.0), Point::new(0.0, 0.0)],
        );
        let flat = fit_unit_square(&[Point::new(1.0, 3.0), Point::new(2.0, 3.0)]);
        assert_points_eq(&flat, &[Point::new(-1.0, 0.0), Point::new(1.0, 0.0)]);
        assert!(fit_unit_square(&[]).is_empty());
    }
}
