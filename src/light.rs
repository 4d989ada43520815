// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Illumination model
//!
//! Perceived counter-space is approximated by shining three lights into the
//! open area between two glyphs: one from the top edge of the box, one from
//! the bottom edge and one at the centre of mass of the open area. Each light
//! is an anisotropic Gaussian rotated by the italic angle; for slanted
//! designs the top and bottom lights are also sheared along the slant so
//! that light travels parallel to the stems.
//!
//! The score is the sum over open pixels of the weighted light intensities.

use crate::config::{LightBlend, PairConfig};
use crate::conv::trunc;
use crate::raster::Mask;

/// Light sources for one session box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Illumination {
    width: f64,
    height: f64,
    /// Italic angle, radians
    theta: f64,
    /// Complement of the italic angle, radians
    alpha: f64,
}

impl Illumination {
    /// Construct for a box of the given size and an italic angle in degrees
    pub fn new(width: usize, height: usize, italic_angle: f64) -> Self {
        Illumination {
            width: width as f64,
            height: height as f64,
            theta: italic_angle.to_radians(),
            alpha: (90.0 - italic_angle).to_radians(),
        }
    }

    /// Italic angle in radians
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Columns of the top and bottom lights for an open area centred at
    /// `(row, col)`
    pub fn source_columns(&self, row: f64, col: f64) -> (f64, f64) {
        let tan = self.alpha.tan();
        let top = trunc(col + row / tan);
        let bottom = trunc(col - (self.height - row) / tan);
        (top as f64, bottom as f64)
    }

    /// A Gaussian light centred at `(x, y)` = `(col, row)`
    pub fn light(&self, center: (f64, f64), sigma: (f64, f64)) -> Light {
        let (cos, sin) = (self.theta.cos(), self.theta.sin());
        let cx = self.width / 2.0 - center.0;
        let cy = self.height / 2.0 - (self.height - center.1);
        let cx = cx * cos - cy * sin;
        // y is rotated from the already-rotated x
        let cy = cx * sin + cy * cos;
        Light {
            cx,
            cy,
            wx: sigma.0,
            wy: sigma.1,
            cos,
            sin,
            half_width: self.width / 2.0,
            half_height: self.height / 2.0,
        }
    }

    /// Score an open-area mask
    ///
    /// An empty mask has no centre; its score is its pixel count, zero.
    pub fn score(&self, open: &Mask, config: &PairConfig, blend: LightBlend) -> f64 {
        let Some((row, col)) = open.center_of_mass() else {
            return open.count() as f64;
        };
        let (top_x, bottom_x) = self.source_columns(row, col);
        let top = self.light((top_x, 0.0), (config.w_top, config.h_top));
        let bottom = self.light((bottom_x, self.height), (config.w_bottom, config.h_bottom));
        let center = self.light((col, row), (config.w_center, config.h_center));
        let base = match blend {
            LightBlend::Additive => 0.0,
            LightBlend::OnePlus => 1.0,
        };

        open.iter_set()
            .map(|(r, c)| {
                base + config.center_strength * center.at(r, c)
                    + config.bottom_strength * bottom.at(r, c)
                    + config.top_strength * top.at(r, c)
            })
            .sum()
    }
}

/// One light field, evaluated lazily per pixel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    cx: f64,
    cy: f64,
    wx: f64,
    wy: f64,
    cos: f64,
    sin: f64,
    half_width: f64,
    half_height: f64,
}

impl Light {
    /// Intensity at a pixel, in `(0, 1]`
    pub fn at(&self, row: usize, col: usize) -> f64 {
        // grid coordinates, mirrored horizontally
        let fx = self.half_width - col as f64;
        let fy = -self.half_height + row as f64 + 1.0;
        let xp = fx * self.cos - fy * self.sin;
        let yp = fx * self.sin + fy * self.cos;
        let dx = (self.cx - xp) / self.wx;
        let dy = (self.cy - yp) / self.wy;
        (-(dx * dx + dy * dy) / 2.0).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(width: usize, height: usize, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> Mask {
        let mut m = Mask::new(width, height);
        for r in rows {
            for c in cols.clone() {
                m.set(r, c, true);
            }
        }
        m
    }

    #[test]
    fn upright_light_is_centred() {
        let light = Illumination::new(20, 10, 0.0).light((5.0, 4.0), (3.0, 3.0));
        assert_eq!(light.at(3, 5), 1.0);
        assert!(light.at(3, 6) < 1.0);
        assert_eq!(light.at(3, 4), light.at(3, 6));
        assert!(light.at(2, 5) < 1.0);
    }

    #[test]
    fn empty_mask_scores_zero() {
        let illum = Illumination::new(20, 10, 0.0);
        let score = illum.score(&Mask::new(20, 10), &PairConfig::initial_guess(), LightBlend::Additive);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn one_plus_adds_pixel_count() {
        let illum = Illumination::new(30, 20, 0.0);
        let open = rect(30, 20, 4..16, 12..18);
        let config = PairConfig::initial_guess();
        let additive = illum.score(&open, &config, LightBlend::Additive);
        let one_plus = illum.score(&open, &config, LightBlend::OnePlus);
        assert!(additive > 0.0);
        assert!((one_plus - additive - open.count() as f64).abs() < 1e-9);
    }

    #[test]
    fn wider_gap_scores_higher() {
        let illum = Illumination::new(40, 20, 0.0);
        let config = PairConfig::initial_guess();
        let narrow = illum.score(&rect(40, 20, 4..16, 18..22), &config, LightBlend::Additive);
        let wide = illum.score(&rect(40, 20, 4..16, 16..24), &config, LightBlend::Additive);
        assert!(wide > narrow);
    }

    #[test]
    fn italic_lights_follow_the_slant() {
        let upright = Illumination::new(40, 20, 0.0);
        assert_eq!(upright.source_columns(10.0, 20.0), (20.0, 20.0));

        let italic = Illumination::new(40, 20, 12.0);
        let (top, bottom) = italic.source_columns(10.0, 20.0);
        assert!(top > 20.0);
        assert!(bottom < 20.0);
    }
}
