// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning point clouds into pictures.
//!
//! The generators stop at arrays of points and colors; this module
//! scatters them onto a pixel grid with square units and writes the
//! grid out as a PNG.  The point list is cut into one contiguous slice
//! per thread, each thread accumulates its slice into a private plane,
//! and the planes are summed at the end.  All the sums are integer
//! sums, so the picture doesn't depend on how many threads drew it.

use failure::{err_msg, Error};
use image::{ImageBuffer, Rgb, RgbImage};
use itertools::{Itertools, MinMaxResult};
use num::clamp;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::color::{self, Colors};
use crate::error::InvalidParameter;
use crate::params;
use crate::planes::PlaneMapper;
use crate::Point;

// Red, green, blue and hit count per pixel.
const CHANNELS: usize = 4;

const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Named colormaps for scalar colors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Colormap {
    /// Blue through cyan, yellow and red.
    Jet,
    /// Black to white.
    Gray,
    /// Black through red and yellow to white.
    Hot,
}

impl Colormap {
    /// Looks up t, clamped to [0, 1].
    pub fn lookup(self, t: f64) -> [f64; 3] {
        let t = clamp(t, 0.0, 1.0);
        let unit = |v: f64| clamp(v, 0.0, 1.0);
        match self {
            Colormap::Jet => [
                unit(1.5 - (4.0 * t - 3.0).abs()),
                unit(1.5 - (4.0 * t - 2.0).abs()),
                unit(1.5 - (4.0 * t - 1.0).abs()),
            ],
            Colormap::Gray => [t, t, t],
            Colormap::Hot => [unit(3.0 * t), unit(3.0 * t - 1.0), unit(3.0 * t - 2.0)],
        }
    }
}

impl FromStr for Colormap {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jet" => Ok(Colormap::Jet),
            "gray" | "grey" => Ok(Colormap::Gray),
            "hot" => Ok(Colormap::Hot),
            _ => Err(InvalidParameter::UnknownColormap(s.to_string())),
        }
    }
}

/// Normalizes an output path: no extension gets ".png" appended,
/// ".png" passes, anything else is refused.
pub fn png_path(name: &str) -> Result<PathBuf, InvalidParameter> {
    let path = Path::new(name);
    match path.extension().and_then(|ext| ext.to_str()) {
        None | Some("") => Ok(path.with_extension("png")),
        Some(ext) if ext.eq_ignore_ascii_case("png") => Ok(path.to_path_buf()),
        Some(ext) => Err(InvalidParameter::NotPng(ext.to_string())),
    }
}

fn to_byte(v: f64) -> u8 {
    clamp((v * 255.0).round(), 0.0, 255.0) as u8
}

/// Scatters points onto an image.
#[derive(Clone, Debug)]
pub struct Renderer {
    width: u16,
    height: u16,
    threads: usize,
    margin: f64,
    colormap: Colormap,
    foreground: [u8; 3],
}

impl Renderer {
    /// A single-threaded renderer drawing black jet-mapped points on
    /// white, with a small margin.
    pub fn new(width: u16, height: u16) -> Result<Self, InvalidParameter> {
        let (width, height) = params::check_size(usize::from(width), usize::from(height))?;
        Ok(Renderer {
            width,
            height,
            threads: 1,
            margin: 0.02,
            colormap: Colormap::Jet,
            foreground: [0, 0, 0],
        })
    }

    /// Sets the number of drawing threads; at least one is used.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Sets the colormap used for scalar colors.
    pub fn colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    /// Sets the color used when points carry no colors of their own.
    pub fn foreground(mut self, rgb: [u8; 3]) -> Self {
        self.foreground = rgb;
        self
    }

    /// Sets the margin, as a fraction of the larger extent of the points.
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// One RGB byte triple per point.
    fn resolve(&self, points: usize, colors: &Colors) -> Vec<[u8; 3]> {
        let bytes = |rgb: [f64; 3]| [to_byte(rgb[0]), to_byte(rgb[1]), to_byte(rgb[2])];
        match colors {
            Colors::Uniform => vec![self.foreground; points],
            Colors::Categorical { labels, categories } => {
                // Labels outside the categories keep the foreground.
                let mut resolved = vec![self.foreground; points];
                for (label, bucket) in color::buckets(labels, *categories).iter().enumerate() {
                    let rgb = bytes(color::category(label, *categories));
                    for &index in bucket {
                        resolved[index] = rgb;
                    }
                }
                resolved
            }
            Colors::Rgb(values) => values.iter().map(|&v| bytes(v)).collect(),
            Colors::Scalar(values) => {
                let (lo, hi) = match values.iter().filter(|v| v.is_finite()).minmax() {
                    MinMaxResult::MinMax(&lo, &hi) => (lo, hi),
                    MinMaxResult::OneElement(&v) => (v, v),
                    MinMaxResult::NoElements => (0.0, 0.0),
                };
                let range = if hi > lo { hi - lo } else { 1.0 };
                values
                    .iter()
                    .map(|v| bytes(self.colormap.lookup((v - lo) / range)))
                    .collect()
            }
        }
    }

    /// Accumulates a slice of points into a private plane.
    fn plot(plane: &PlaneMapper, points: &[Point], colors: &[[u8; 3]], buffer: &mut [u64]) {
        for (point, rgb) in points.iter().zip(colors) {
            if let Some(offset) = plane.point_to_offset(point) {
                let cell = &mut buffer[offset * CHANNELS..(offset + 1) * CHANNELS];
                cell[0] += u64::from(rgb[0]);
                cell[1] += u64::from(rgb[1]);
                cell[2] += u64::from(rgb[2]);
                cell[3] += 1;
            }
        }
    }

    /// Given a collection of planes in a contiguous block, merge them
    /// all into a single plane.
    fn render_merge(&self, size: usize, regions: &[u64]) -> Vec<u64> {
        let mut ret = vec![0 as u64; size];
        for region in regions.chunks(size) {
            for (total, value) in ret.iter_mut().zip(region) {
                *total += value;
            }
        }
        ret
    }

    /// Scatters points onto a fresh image, each pixel taking the
    /// average color of the points that landed on it.  Units are
    /// square, and the picture is fitted to the points.
    pub fn rasterize(&self, points: &[Point], colors: &Colors) -> Result<RgbImage, Error> {
        colors.check_len(points.len())?;
        let (width, height) = (usize::from(self.width), usize::from(self.height));
        let plane = PlaneMapper::fit(width, height, points, self.margin)?;
        let rgb = self.resolve(points.len(), colors);
        let size = plane.len() * CHANNELS;
        let chunk = ((points.len() + self.threads - 1) / self.threads).max(1);
        debug!(
            points = points.len(),
            threads = self.threads,
            width = self.width,
            height = self.height,
            "rasterizing"
        );

        let mut allocation = vec![0 as u64; size * self.threads];
        crossbeam::scope(|spawner| {
            let regions = allocation.chunks_mut(size);
            let work = points.chunks(chunk).zip(rgb.chunks(chunk));
            for (region, (slice, palette)) in regions.zip(work) {
                let plane = &plane;
                spawner.spawn(move |_| Renderer::plot(plane, slice, palette, region));
            }
        })
        .map_err(|_| err_msg("a rasterizer thread panicked"))?;

        let merged = self.render_merge(size, &allocation);
        let image = ImageBuffer::from_fn(u32::from(self.width), u32::from(self.height), |x, y| {
            let offset = (y as usize * width + x as usize) * CHANNELS;
            let cell = &merged[offset..offset + CHANNELS];
            if cell[3] == 0 {
                Rgb(BACKGROUND)
            } else {
                let average = |sum: u64| ((sum + cell[3] / 2) / cell[3]) as u8;
                Rgb([average(cell[0]), average(cell[1]), average(cell[2])])
            }
        });
        Ok(image)
    }

    /// Rasterizes and writes a PNG.  Returns the path actually written,
    /// which has ".png" appended if `path` had no extension.
    pub fn save(&self, points: &[Point], colors: &Colors, path: &str) -> Result<PathBuf, Error> {
        let path = png_path(path)?;
        let image = self.rasterize(points, colors)?;
        image.save(&path)?;
        info!(path = %path.display(), points = points.len(), "image written");
        Ok(path)
    }
}
