//! Coloring a run by the corners (or maps) it chose.
//!
//! None of this looks at the points themselves.  A color is derived
//! from the choice history alone, so every scheme produces an array
//! parallel to the choices it was given, recomputed from scratch on
//! every call.

use crate::error::InvalidParameter;
use std::str::FromStr;

/// The primaries handed out to corners 0, 1 and 2, followed by the
/// secondaries for polygons with up to six corners.
pub const PALETTE: [[f64; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
];

/// The RGB vector for choice `index` out of `categories`.  Up to six
/// categories take the fixed palette; past that the hues are spread
/// evenly around the color wheel, one per category.
pub fn category(index: usize, categories: usize) -> [f64; 3] {
    if categories <= PALETTE.len() {
        PALETTE[index % PALETTE.len()]
    } else {
        hue(index as f64 / categories as f64)
    }
}

// A fully saturated, full value color; 0 is red, 1/3 green, 2/3 blue.
fn hue(h: f64) -> [f64; 3] {
    let h = h.fract() * 6.0;
    let sector = h.floor();
    let f = h - sector;
    match sector as u8 {
        0 => [1.0, f, 0.0],
        1 => [1.0 - f, 1.0, 0.0],
        2 => [0.0, 1.0, f],
        3 => [0.0, 1.0 - f, 1.0],
        4 => [f, 0.0, 1.0],
        _ => [1.0, 0.0, 1.0 - f],
    }
}

/// How to turn a choice history into colors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorScheme {
    /// Every point the same color.
    Uniform,
    /// Each point labelled with the raw index of its choice.
    Categorical,
    /// A running average of the chosen indices, for colormap lookup.
    Gradient,
    /// The same running average, over the palette's RGB vectors.
    GradientRgb,
}

/// A color per point, or the sentinel for "all the same".
#[derive(Clone, Debug, PartialEq)]
pub enum Colors {
    /// No per-point colors; the renderer picks one.
    Uniform,
    /// A category label per point, out of `categories` in all.
    Categorical {
        /// One label per point.
        labels: Vec<usize>,
        /// How many distinct labels there can be.
        categories: usize,
    },
    /// A scalar per point, to be looked up in a colormap.
    Scalar(Vec<f64>),
    /// An RGB triple per point, each channel in [0, 1].
    Rgb(Vec<[f64; 3]>),
}

impl Colors {
    /// The number of per-point colors, or `None` for the uniform
    /// sentinel.
    pub fn len(&self) -> Option<usize> {
        match self {
            Colors::Uniform => None,
            Colors::Categorical { labels, .. } => Some(labels.len()),
            Colors::Scalar(values) => Some(values.len()),
            Colors::Rgb(values) => Some(values.len()),
        }
    }

    /// Checks that these colors can ride along with `points` points.
    pub fn check_len(&self, points: usize) -> Result<(), InvalidParameter> {
        match self.len() {
            Some(colors) if colors != points => {
                Err(InvalidParameter::ColorCountMismatch { points, colors })
            }
            _ => Ok(()),
        }
    }
}

impl ColorScheme {
    /// Computes the colors for a history of choices made among
    /// `categories` corners or maps.
    pub fn apply(self, choices: &[usize], categories: usize) -> Colors {
        match self {
            ColorScheme::Uniform => Colors::Uniform,
            ColorScheme::Categorical => Colors::Categorical {
                labels: choices.to_vec(),
                categories,
            },
            ColorScheme::Gradient => Colors::Scalar(gradient(choices)),
            ColorScheme::GradientRgb => Colors::Rgb(gradient_rgb(choices, categories)),
        }
    }
}

impl FromStr for ColorScheme {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(ColorScheme::Uniform),
            "categorical" => Ok(ColorScheme::Categorical),
            "gradient" => Ok(ColorScheme::Gradient),
            "rgb" => Ok(ColorScheme::GradientRgb),
            _ => Err(InvalidParameter::UnknownColorScheme(s.to_string())),
        }
    }
}

/// color[0] = choice[0]; color[i] = (color[i-1] + choice[i]) / 2.
///
/// The first color is seeded from the first choice alone.  It is never
/// averaged against the last element of the array.
pub fn gradient(choices: &[usize]) -> Vec<f64> {
    let mut colors = Vec::with_capacity(choices.len());
    let mut iter = choices.iter();
    if let Some(&first) = iter.next() {
        let mut color = first as f64;
        colors.push(color);
        for &choice in iter {
            color = (color + choice as f64) / 2.0;
            colors.push(color);
        }
    }
    colors
}

/// The RGB version of `gradient`: each choice contributes its
/// category color instead of its index.
pub fn gradient_rgb(choices: &[usize], categories: usize) -> Vec<[f64; 3]> {
    let mut colors = Vec::with_capacity(choices.len());
    let mut iter = choices.iter();
    if let Some(&first) = iter.next() {
        let mut color = category(first, categories);
        colors.push(color);
        for &choice in iter {
            let next = category(choice, categories);
            for (channel, value) in color.iter_mut().zip(&next) {
                *channel = (*channel + value) / 2.0;
            }
            colors.push(color);
        }
    }
    colors
}

/// Groups point indices by category label: `buckets[k]` holds, in
/// order, the index of every point labelled `k`.  Labels at or above
/// `categories` are ignored.
pub fn buckets(labels: &[usize], categories: usize) -> Vec<Vec<usize>> {
    let mut buckets = vec![Vec::new(); categories];
    for (index, &label) in labels.iter().enumerate() {
        if let Some(bucket) = buckets.get_mut(label) {
            bucket.push(index);
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gradient_runs_an_average_of_choices() {
        assert_eq!(gradient(&[2, 0, 1]), vec![2.0, 1.0, 1.0]);
        assert_eq!(gradient(&[0, 2, 2, 0]), vec![0.0, 1.0, 1.5, 0.75]);
        assert!(gradient(&[]).is_empty());
    }

    #[test]
    fn gradient_is_seeded_without_wrapping_around() {
        // Seeding from the last element instead would give 0.5 here.
        let colors = gradient(&[0, 1, 1, 1]);
        assert_eq!(colors[0], 0.0);
        let colors = gradient_rgb(&[1, 0, 0], 3);
        assert_eq!(colors[0], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn gradient_rgb_averages_palette_vectors() {
        let colors = gradient_rgb(&[0, 1, 2], 3);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], [1.0, 0.0, 0.0]);
        assert_eq!(colors[1], [0.5, 0.5, 0.0]);
        assert_relative_eq!(colors[2][0], 0.25);
        assert_relative_eq!(colors[2][1], 0.25);
        assert_relative_eq!(colors[2][2], 0.5);
    }

    #[test]
    fn schemes_produce_parallel_arrays() {
        let choices = [3, 1, 4, 1, 5];
        for scheme in &[
            ColorScheme::Categorical,
            ColorScheme::Gradient,
            ColorScheme::GradientRgb,
        ] {
            assert_eq!(scheme.apply(&choices, 6).len(), Some(choices.len()));
        }
        assert_eq!(ColorScheme::Uniform.apply(&choices, 6), Colors::Uniform);
        assert_eq!(
            ColorScheme::Categorical.apply(&choices, 6),
            Colors::Categorical {
                labels: choices.to_vec(),
                categories: 6
            }
        );
    }

    #[test]
    fn small_polygons_use_the_fixed_palette() {
        for (i, rgb) in PALETTE.iter().enumerate() {
            assert_eq!(category(i, 6), *rgb);
        }
        assert_eq!(category(2, 3), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn every_corner_of_a_large_polygon_gets_its_own_color() {
        for &n in &[7, 8, 12] {
            let colors: Vec<[f64; 3]> = (0..n).map(|i| category(i, n)).collect();
            for i in 0..n {
                for j in i + 1..n {
                    assert_ne!(colors[i], colors[j], "corners {} and {} of {}", i, j, n);
                }
            }
        }
        assert_eq!(category(0, 7), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn buckets_group_indices_by_label() {
        let groups = buckets(&[0, 2, 0, 1, 2, 7], 3);
        assert_eq!(groups, vec![vec![0, 2], vec![3], vec![1, 4]]);
    }

    #[test]
    fn check_len_catches_mismatches() {
        assert!(Colors::Uniform.check_len(10).is_ok());
        assert!(Colors::Scalar(vec![0.0; 10]).check_len(10).is_ok());
        assert_eq!(
            Colors::Scalar(vec![0.0; 9]).check_len(10),
            Err(InvalidParameter::ColorCountMismatch {
                points: 10,
                colors: 9
            })
        );
    }

    #[test]
    fn scheme_names() {
        assert_eq!("rgb".parse::<ColorScheme>(), Ok(ColorScheme::GradientRgb));
        assert!("plaid".parse::<ColorScheme>().is_err());
    }
}
