// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The one error the generators know about: somebody handed us a
//! parameter we refuse to work with.  Every variant is raised at the
//! boundary, before any iteration starts; once an engine exists its
//! loops cannot fail.

use failure::Fail;

/// A rejected construction or call parameter.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum InvalidParameter {
    /// A polygon needs at least three corners.
    #[fail(display = "n must be larger or equal to 3, got {}", _0)]
    TooFewSides(i64),

    /// The contraction ratio must lie strictly between 0 and 1.
    #[fail(display = "r must be between 0 and 1 (exclusive), got {}", _0)]
    RatioOutOfRange(f64),

    /// A value that should have been a number wasn't one.
    #[fail(display = "{} must be a number, got '{}'", name, value)]
    NotANumber {
        /// Which parameter was being parsed.
        name: &'static str,
        /// The offending text.
        value: String,
    },

    /// The burn-in would swallow every generated point.
    #[fail(display = "discard ({}) must be smaller than steps ({})", discard, steps)]
    DiscardTooLarge {
        /// Requested iteration count.
        steps: usize,
        /// Requested burn-in.
        discard: usize,
    },

    /// Asked to iterate zero times.
    #[fail(display = "steps must be at least 1")]
    NoSteps,

    /// More steps than a run is allowed to hold in memory.
    #[fail(display = "steps ({}) must be at most {}", steps, max)]
    TooManySteps {
        /// Requested iteration count.
        steps: usize,
        /// The ceiling.
        max: usize,
    },

    /// Output files are always PNG.
    #[fail(display = "output file must be a .png, got extension '{}'", _0)]
    NotPng(String),

    /// Not one of linear, swirl, handkerchief or disc.
    #[fail(display = "unknown variation '{}'", _0)]
    UnknownVariation(String),

    /// Variation names and weights must pair up.
    #[fail(display = "got {} variations but {} weights", variations, weights)]
    WeightCountMismatch {
        /// Number of variation names.
        variations: usize,
        /// Number of weights.
        weights: usize,
    },

    /// Weights are raw, but never negative.
    #[fail(display = "weights must be finite and non-negative, got {}", _0)]
    BadWeight(f64),

    /// Nothing to normalize against.
    #[fail(display = "weights must not all be zero")]
    ZeroWeights,

    /// An affine map set whose selection probabilities don't add up.
    #[fail(display = "map probabilities must sum to 1, got {}", _0)]
    ProbabilitySum(f64),

    /// A color array that isn't parallel to its point array.
    #[fail(display = "expected {} colors, got {}", points, colors)]
    ColorCountMismatch {
        /// Length of the point array.
        points: usize,
        /// Length of the color array.
        colors: usize,
    },

    /// Zero-sized images are useless.
    #[fail(display = "image size must be non-zero, got {}x{}", _0, _1)]
    EmptyImage(usize, usize),

    /// Sides are limited to 65535 pixels and the whole image to a
    /// fixed pixel count.
    #[fail(display = "image size {}x{} is too large", _0, _1)]
    ImageTooLarge(usize, usize),

    /// The corners of a real plane given in the wrong order.
    #[fail(display = "the left lower corner is not left of and below the right upper corner")]
    InvertedPlane,

    /// Unknown colormap name.
    #[fail(display = "unknown colormap '{}'", _0)]
    UnknownColormap(String),

    /// Unknown color scheme name.
    #[fail(display = "unknown color scheme '{}'", _0)]
    UnknownColorScheme(String),
}
