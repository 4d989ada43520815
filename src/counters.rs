// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Shifted counter masks
//!
//! A glyph's edge counter (see [`Raster::edge_counters`]) is translated to
//! its place in a pair, binarised, limited to the reference band and then
//! "diagonized": a row's counter edge may not step inward toward the ink by
//! more than one pixel relative to its neighbour. Without this a diagonal
//! stem, shifted row by row, opens single-row spikes into the glyph which
//! would be counted as extra open space.

use crate::config::BandLimit;
use crate::conv::to_i64;
use crate::raster::{EdgeCounters, Mask, Raster, COUNTER_THRESHOLD};

/// Smoothed ink must exceed this (on a `0..=255` scale) to survive
const SERIF_THRESHOLD: f64 = 250.0;

/// Which side of a glyph a counter lies on
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Space left of the ink, facing a glyph set before this one
    Left,
    /// Space right of the ink, facing a glyph set after this one
    Right,
}

/// Vertical band of rows `top..bottom` which may hold counter-space
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Band {
    pub top: i64,
    pub bottom: i64,
}

/// Build one side's counter mask for a glyph set at `shift`
pub fn shifted_counter(
    counters: &EdgeCounters,
    side: Side,
    shift: i64,
    band: Band,
    order: BandLimit,
) -> Mask {
    let source = match side {
        Side::Left => &counters.left,
        Side::Right => &counters.right,
    };
    let mut mask = source.shifted_mask(shift, COUNTER_THRESHOLD);
    if order == BandLimit::BeforeDiagonize {
        mask.clear_outside_rows(band.top, band.bottom);
    }
    match side {
        Side::Left => diagonize_left(&mut mask),
        Side::Right => diagonize_right(&mut mask),
    }
    if order == BandLimit::AfterDiagonize {
        mask.clear_outside_rows(band.top, band.bottom);
    }
    mask
}

/// Clip a counter lying right of the ink
///
/// The edge of each row is its first open column (`-1` for an empty row).
/// A smaller edge reaches further into the glyph.
fn diagonize_right(mask: &mut Mask) {
    let height = mask.height();
    if height < 3 {
        return;
    }
    let mut edge: Vec<i64> = (0..height)
        .map(|r| mask.first_set(r).map(to_i64).unwrap_or(-1))
        .collect();
    let clip = |mask: &mut Mask, edge: &mut [i64], i: usize, neighbour: usize| {
        if edge[i] < edge[neighbour] {
            let old = edge[i];
            edge[i] = edge[neighbour] - 1;
            if old >= 0 {
                mask.clear_span(i, old, edge[i]);
            }
        }
    };
    for i in 1..height - 1 {
        clip(mask, &mut edge, i, i - 1);
    }
    for i in (1..height - 1).rev() {
        clip(mask, &mut edge, i, i + 1);
    }
}

/// Clip a counter lying left of the ink
///
/// The edge of each row is one past its last open column (`width + 1` for
/// an empty row). A larger edge reaches further into the glyph.
fn diagonize_left(mask: &mut Mask) {
    let height = mask.height();
    if height < 3 {
        return;
    }
    let empty = to_i64(mask.width()) + 1;
    let mut edge: Vec<i64> = (0..height)
        .map(|r| mask.last_set(r).map(|c| to_i64(c) + 1).unwrap_or(empty))
        .collect();
    let clip = |mask: &mut Mask, edge: &mut [i64], i: usize, neighbour: usize| {
        if edge[i] > edge[neighbour] && edge[neighbour] > 0 {
            let old = edge[i];
            edge[i] = edge[neighbour] + 1;
            mask.clear_span(i, edge[i], old);
        }
    };
    for i in 1..height - 1 {
        clip(mask, &mut edge, i, i - 1);
    }
    for i in (1..height - 1).rev() {
        clip(mask, &mut edge, i, i + 1);
    }
}

/// Directional smoothing kernel fusing serif fragments
///
/// The horizontal profile is the positive lobe of `-sin(exp(-a·x))`, which
/// reaches leftward over `ln(π)/a..ln(2π)/a` pixels; vertically it is a
/// Gaussian with sigma equal to the smoothing radius. The reach grows with
/// the italic angle. Convolving a glyph with it and re-thresholding joins
/// serifs to their stems.
#[derive(Clone, Debug, PartialEq)]
pub struct SerifKernel {
    // (row offset, column offset, weight): out[r][c] += w · in[r - dr][c - dc]
    taps: Vec<(i64, i64, f64)>,
}

impl SerifKernel {
    /// Construct for a session box
    ///
    /// `theta` is the italic angle in radians. Returns `None` when
    /// `smoothing == 0`.
    pub fn new(smoothing: u32, theta: f64, box_width: usize, box_height: usize) -> Option<Self> {
        if smoothing == 0 {
            return None;
        }
        let s = f64::from(smoothing);
        let a = (1.5 * std::f64::consts::PI).ln() / (s * (1.0 + theta.abs()));
        let lim = ((2.0 * std::f64::consts::PI).ln() / a).max(1.0);
        let (w, h) = (box_width as f64, box_height as f64);
        // "same"-mode convolution aligns kernel index (p, q) with this offset
        let (cy, cx) = (to_i64((box_height.max(1) - 1) / 2), to_i64((box_width.max(1) - 1) / 2));

        let mut taps = Vec::new();
        for p in 0..box_height {
            let fy = -h / 2.0 + p as f64 + 1.0;
            let vertical = (-(fy / s).powi(2) / 2.0).exp();
            for q in 0..box_width {
                let fx = -w / 2.0 + q as f64 + 1.0;
                if fx <= -lim {
                    continue;
                }
                let value = -(-a * fx).exp().sin() * a * a * vertical;
                if value > 0.0 {
                    taps.push((to_i64(p) - cy, to_i64(q) - cx, value));
                }
            }
        }
        Some(SerifKernel { taps })
    }

    /// Number of non-zero taps
    pub fn tap_count(&self) -> usize {
        self.taps.len()
    }

    /// Convolve and re-threshold a glyph raster
    ///
    /// The result has the input's dimensions and holds only `0` and `1`.
    pub fn apply(&self, raster: &Raster) -> Raster {
        let (width, height) = (raster.width(), raster.height());
        let mut out = Raster::new(width, height);
        for r in 0..height {
            for c in 0..width {
                let mut sum = 0.0;
                for &(dr, dc, w) in &self.taps {
                    let (sr, sc) = (to_i64(r) - dr, to_i64(c) - dc);
                    if sr < 0 || sc < 0 || sr >= to_i64(height) || sc >= to_i64(width) {
                        continue;
                    }
                    sum += w * f64::from(raster.get(sr as usize, sc as usize));
                }
                if sum * 255.0 > SERIF_THRESHOLD {
                    out.set(r, c, 1.0);
                }
            }
        }
        out
    }
}
