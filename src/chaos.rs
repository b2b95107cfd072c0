// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The chaos game
//!
//! Take a regular polygon and a point somewhere inside it.  Pick a
//! corner at random and move the point part of the way towards it.
//! Do it again.  And again.  After a few steps the point stops
//! wandering and settles onto the attractor of the system, a
//! Sierpinski-like n-gon whose shape depends only on the number of
//! corners and on how much of the old point survives each jump.
//!
//! Every step depends on the one before it, so there is nothing to
//! parallelize here: one point, one draw, one step.

use tracing::debug;

use crate::color::{ColorScheme, Colors};
use crate::error::InvalidParameter;
use crate::params;
use crate::polygon::Polygon;
use crate::random::RandomSource;
use crate::Point;

/// How many of the earliest points a run throws away unless told
/// otherwise.
pub const DEFAULT_DISCARD: usize = 5;

/// The parameters of one chaos game.  Once set, they don't change.
#[derive(Clone, Debug)]
pub struct ChaosGame {
    polygon: Polygon,
    ratio: f64,
}

/// The outcome of one `iterate` call: the surviving points and, index
/// for index, the corner each of them jumped towards.
#[derive(Clone, Debug, PartialEq)]
pub struct ChaosRun {
    /// Generated points, oldest first.
    pub points: Vec<Point>,
    /// The corner chosen at each surviving step.
    pub corners: Vec<usize>,
    sides: usize,
}

impl ChaosRun {
    /// Number of points that survived the burn-in.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// A run always has at least one point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The number of corners the run was played on.
    pub fn sides(&self) -> usize {
        self.sides
    }

    /// Colors for the run's points under the given scheme.
    pub fn colors(&self, scheme: ColorScheme) -> Colors {
        scheme.apply(&self.corners, self.sides)
    }
}

impl ChaosGame {
    /// Requires the number of corners, at least three, and the share
    /// of the current point kept on each jump, strictly between 0 and 1.
    pub fn new(sides: usize, ratio: f64) -> Result<Self, InvalidParameter> {
        let polygon = Polygon::new(sides)?;
        let ratio = params::check_ratio(ratio)?;
        Ok(ChaosGame { polygon, ratio })
    }

    /// The polygon being played on.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// The contraction ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// A random point inside the polygon: one uniform weight per
    /// corner, normalized, then the weighted average of the corners.
    pub fn starting_point<R: RandomSource>(&self, rng: &mut R) -> Point {
        let weights: Vec<f64> = (0..self.polygon.len()).map(|_| rng.uniform01()).collect();
        self.polygon.combine(&weights)
    }

    #[inline]
    fn jump(&self, from: Point, corner: usize) -> Point {
        from * self.ratio + self.polygon.corner(corner) * (1.0 - self.ratio)
    }

    /// Plays `steps` rounds of the game and keeps all but the first
    /// `discard` of them.  The first corner is drawn before the
    /// starting point, and every later round makes exactly one integer
    /// draw, so a given sequence of draws always yields the same run.
    pub fn iterate<R: RandomSource>(
        &self,
        steps: usize,
        discard: usize,
        rng: &mut R,
    ) -> Result<ChaosRun, InvalidParameter> {
        params::check_steps(steps, discard)?;
        debug!(
            sides = self.polygon.len(),
            ratio = self.ratio,
            steps,
            discard,
            "playing the chaos game"
        );

        let sides = self.polygon.len();
        let mut points = Vec::with_capacity(steps);
        let mut corners = Vec::with_capacity(steps);

        let first = rng.uniform_int(sides);
        let start = self.starting_point(rng);
        let mut point = self.jump(start, first);
        points.push(point);
        corners.push(first);

        for _ in 1..steps {
            let corner = rng.uniform_int(sides);
            point = self.jump(point, corner);
            points.push(point);
            corners.push(corner);
        }

        // The burn-in hasn't reached the attractor yet.
        points.drain(..discard);
        corners.drain(..discard);

        Ok(ChaosRun {
            points,
            corners,
            sides,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, Scripted};
    use approx::assert_relative_eq;

    /// True when `p` lies inside (or on) the convex, clockwise polygon.
    fn inside(polygon: &Polygon, p: Point) -> bool {
        let corners = polygon.corners();
        (0..corners.len()).all(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % corners.len()];
            let cross = (b.re - a.re) * (p.im - a.im) - (b.im - a.im) * (p.re - a.re);
            cross <= 1e-9
        })
    }

    #[test]
    fn chaos_game_rejects_bad_parameters() {
        assert_eq!(
            ChaosGame::new(2, 0.5).unwrap_err(),
            InvalidParameter::TooFewSides(2)
        );
        for r in &[0.0, 1.0, 5.0, -6.0] {
            assert_eq!(
                ChaosGame::new(5, *r).unwrap_err(),
                InvalidParameter::RatioOutOfRange(*r)
            );
        }
        assert!(ChaosGame::new(3, std::f64::NAN).is_err());
    }

    #[test]
    fn starting_point_is_inside_the_polygon() {
        let mut rng = RngSource::seeded(7);
        for n in 3..9 {
            let game = ChaosGame::new(n, 0.5).unwrap();
            for _ in 0..200 {
                assert!(inside(game.polygon(), game.starting_point(&mut rng)));
            }
        }
    }

    #[test]
    fn iterate_keeps_steps_minus_discard() {
        let game = ChaosGame::new(3, 0.5).unwrap();
        let mut rng = RngSource::seeded(1);
        let run = game.iterate(1000, 5, &mut rng).unwrap();
        assert_eq!(run.len(), 995);
        assert_eq!(run.corners.len(), 995);
        let run = game.iterate(10, 0, &mut rng).unwrap();
        assert_eq!(run.len(), 10);
        let run = game.iterate(6, 5, &mut rng).unwrap();
        assert_eq!(run.len(), 1);
    }

    #[test]
    fn iterate_rejects_discard_at_or_above_steps() {
        let game = ChaosGame::new(3, 0.5).unwrap();
        let mut rng = RngSource::seeded(1);
        assert_eq!(
            game.iterate(5, 5, &mut rng).unwrap_err(),
            InvalidParameter::DiscardTooLarge { steps: 5, discard: 5 }
        );
        assert!(game.iterate(0, 0, &mut rng).is_err());
    }

    #[test]
    fn iterate_refuses_runs_too_long_to_hold() {
        let game = ChaosGame::new(3, 0.5).unwrap();
        let mut rng = RngSource::seeded(1);
        assert_eq!(
            game.iterate(usize::max_value(), DEFAULT_DISCARD, &mut rng)
                .unwrap_err(),
            InvalidParameter::TooManySteps {
                steps: usize::max_value(),
                max: params::MAX_STEPS
            }
        );
    }

    #[test]
    fn every_point_stays_inside_the_polygon() {
        let mut rng = RngSource::seeded(99);
        for n in 3..9 {
            for r in &[0.1, 1.0 / 3.0, 0.5, 0.9] {
                let game = ChaosGame::new(n, *r).unwrap();
                let run = game.iterate(2000, 0, &mut rng).unwrap();
                assert!(run.points.iter().all(|p| inside(game.polygon(), *p)));
                assert!(run.corners.iter().all(|c| *c < n));
            }
        }
    }

    #[test]
    fn scripted_runs_are_bit_identical() {
        let game = ChaosGame::new(5, 0.4).unwrap();
        let floats = vec![0.1, 0.9, 0.3, 0.5, 0.7];
        let ints = vec![3, 1, 4, 1, 5, 9, 2, 6];
        let a = game
            .iterate(500, 5, &mut Scripted::new(floats.clone(), ints.clone()))
            .unwrap();
        let b = game
            .iterate(500, 5, &mut Scripted::new(floats, ints))
            .unwrap();
        assert_eq!(a.corners, b.corners);
        for (p, q) in a.points.iter().zip(&b.points) {
            assert_eq!(p.re.to_bits(), q.re.to_bits());
            assert_eq!(p.im.to_bits(), q.im.to_bits());
        }
    }

    #[test]
    fn recurrence_follows_the_drawn_corners() {
        // Corner 0 first, then weights picking corner 1 alone as the start.
        let game = ChaosGame::new(3, 0.5).unwrap();
        let mut rng = Scripted::new(vec![0.0, 1.0, 0.0], vec![0, 2, 1]);
        let run = game.iterate(3, 0, &mut rng).unwrap();
        let c = game.polygon().corners();
        let p0 = (c[1] + c[0]) * 0.5;
        let p1 = (p0 + c[2]) * 0.5;
        let p2 = (p1 + c[1]) * 0.5;
        assert_eq!(run.corners, vec![0, 2, 1]);
        for (got, want) in run.points.iter().zip(&[p0, p1, p2]) {
            assert_relative_eq!(got.re, want.re, epsilon = 1e-12);
            assert_relative_eq!(got.im, want.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn discard_drops_the_oldest_points() {
        let game = ChaosGame::new(4, 0.5).unwrap();
        let floats = vec![0.2, 0.4, 0.6, 0.8];
        let ints = vec![0, 1, 2, 3, 3, 2, 1];
        let all = game
            .iterate(20, 0, &mut Scripted::new(floats.clone(), ints.clone()))
            .unwrap();
        let kept = game
            .iterate(20, 7, &mut Scripted::new(floats, ints))
            .unwrap();
        assert_eq!(&all.points[7..], &kept.points[..]);
        assert_eq!(&all.corners[7..], &kept.corners[..]);
    }
}
