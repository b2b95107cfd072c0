//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the top left, and a rectangle on the real plane with an arbitrary
//! pair of corners defining its leftlower and rightupper corners.
//! The real plane's y axis points up; the integral plane's rows count
//! down, so the mapping flips it.

use itertools::{Itertools, MinMaxResult};

use crate::error::InvalidParameter;
use crate::Point;

/// Describes the width and height of an integral plane that is assumed
/// to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the real
/// plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RealPlane(pub Point, pub Point);

/// Describes the column, row of a pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes and maps points from one to
/// the other.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The size of the integral plane.
    pub integral_plane: IntegralPlane,
    /// The two corners of the real plane, left-lower and right-upper.
    pub real_plane: RealPlane,
    // Pixels per unit, horizontally and vertically.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// Takes the size of the integral plane and the two corners of the
    /// real plane.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Point,
        rightupper: Point,
    ) -> Result<PlaneMapper, InvalidParameter> {
        if width == 0 || height == 0 {
            return Err(InvalidParameter::EmptyImage(width, height));
        }
        if !(rightupper.re > leftlower.re && rightupper.im > leftlower.im) {
            return Err(InvalidParameter::InvertedPlane);
        }

        let grid_factors = (
            (width as f64) / (rightupper.re - leftlower.re),
            (height as f64) / (rightupper.im - leftlower.im),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            real_plane: RealPlane(leftlower, rightupper),
            grid_factors,
        })
    }

    /// Builds a mapper whose real plane holds every point, with a
    /// margin (a fraction of the larger extent) on all sides, and
    /// whose units are square: the shorter axis is widened about its
    /// centre until one unit covers as many pixels horizontally as
    /// vertically.
    pub fn fit(
        width: usize,
        height: usize,
        points: &[Point],
        margin: f64,
    ) -> Result<PlaneMapper, InvalidParameter> {
        if width == 0 || height == 0 {
            return Err(InvalidParameter::EmptyImage(width, height));
        }
        let (x0, x1) = extent(points.iter().map(|p| p.re));
        let (y0, y1) = extent(points.iter().map(|p| p.im));
        let span = (x1 - x0).max(y1 - y0);
        let pad = span * margin.max(0.0);
        let (mut w, mut h) = (x1 - x0 + 2.0 * pad, y1 - y0 + 2.0 * pad);
        if !(w > 0.0 || h > 0.0) {
            w = 1.0;
            h = 1.0;
        }

        let aspect = (width as f64) / (height as f64);
        if w / h < aspect {
            w = h * aspect;
        } else {
            h = w / aspect;
        }
        let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        PlaneMapper::new(
            width,
            height,
            Point::new(cx - w / 2.0, cy - h / 2.0),
            Point::new(cx + w / 2.0, cy + h / 2.0),
        )
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Maps a real point to the pixel containing it, if any.
    pub fn point_to_pixel(&self, point: &Point) -> Option<Pixel> {
        let left = (point.re - self.real_plane.0.re) * self.grid_factors.0;
        let top = (self.real_plane.1.im - point.im) * self.grid_factors.1;
        let (width, height) = (self.integral_plane.0 as f64, self.integral_plane.1 as f64);
        if !(left >= 0.0 && left <= width && top >= 0.0 && top <= height) {
            return None;
        }
        // The right and bottom edges belong to the last column and row.
        Some(Pixel(
            (left as usize).min(self.integral_plane.0 - 1),
            (top as usize).min(self.integral_plane.1 - 1),
        ))
    }

    /// Maps a real point to its linear offset in a row-major pixel
    /// buffer.
    pub fn point_to_offset(&self, point: &Point) -> Option<usize> {
        self.point_to_pixel(point)
            .map(|Pixel(column, row)| row * self.integral_plane.0 + column)
    }
}

fn extent<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    match values.filter(|v| v.is_finite()).minmax() {
        MinMaxResult::NoElements => (0.0, 0.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn planemapper_fails_on_bad_shape() {
        let pm = PlaneMapper::new(4, 4, Point::new(-1.0, 1.0), Point::new(1.0, -1.0));
        assert_eq!(pm.unwrap_err(), InvalidParameter::InvertedPlane);
        let pm = PlaneMapper::new(0, 4, Point::new(-1.0, -1.0), Point::new(1.0, 1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 4, Point::new(-1.0, -1.0), Point::new(1.0, 1.0));
        assert!(pm.is_ok());
    }

    #[test]
    fn point_to_pixel_flips_the_y_axis() {
        let pm = PlaneMapper::new(5, 5, Point::new(0.0, 0.0), Point::new(5.0, 5.0)).unwrap();
        assert_eq!(pm.point_to_pixel(&Point::new(0.5, 4.5)), Some(Pixel(0, 0)));
        assert_eq!(pm.point_to_pixel(&Point::new(2.5, 2.5)), Some(Pixel(2, 2)));
        assert_eq!(pm.point_to_pixel(&Point::new(4.5, 0.5)), Some(Pixel(4, 4)));
    }

    #[test]
    fn edges_belong_to_the_plane() {
        let pm = PlaneMapper::new(4, 4, Point::new(-2.0, -2.0), Point::new(2.0, 2.0)).unwrap();
        assert_eq!(pm.point_to_pixel(&Point::new(-2.0, 2.0)), Some(Pixel(0, 0)));
        assert_eq!(pm.point_to_pixel(&Point::new(2.0, -2.0)), Some(Pixel(3, 3)));
        assert_eq!(pm.point_to_pixel(&Point::new(0.0, 0.0)), Some(Pixel(2, 2)));
        assert_eq!(pm.point_to_pixel(&Point::new(2.1, 0.0)), None);
        assert_eq!(pm.point_to_pixel(&Point::new(0.0, -2.1)), None);
        assert_eq!(pm.point_to_pixel(&Point::new(std::f64::NAN, 0.0)), None);
    }

    #[test]
    fn point_to_offset_is_row_major() {
        let pm = PlaneMapper::new(640, 480, Point::new(0.0, 0.0), Point::new(640.0, 480.0)).unwrap();
        assert_eq!(pm.point_to_offset(&Point::new(10.5, 479.5)), Some(10));
        assert_eq!(pm.point_to_offset(&Point::new(0.5, 478.5)), Some(640));
        assert_eq!(pm.point_to_offset(&Point::new(-1.0, 10.0)), None);
    }

    #[test]
    fn fit_keeps_units_square_and_points_inside() {
        let points = vec![Point::new(-1.0, 0.0), Point::new(1.0, 10.0), Point::new(0.3, 4.0)];
        let pm = PlaneMapper::fit(800, 600, &points, 0.05).unwrap();
        assert_relative_eq!(pm.grid_factors.0, pm.grid_factors.1, epsilon = 1e-9);
        for p in &points {
            assert!(pm.point_to_pixel(p).is_some());
        }
    }

    #[test]
    fn fit_survives_degenerate_input() {
        assert!(PlaneMapper::fit(10, 10, &[Point::new(1.0, 1.0)], 0.0).is_ok());
        assert!(PlaneMapper::fit(10, 10, &[], 0.1).is_ok());
    }
}
