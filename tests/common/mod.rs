// Synthetic glyphs drawn from simple shapes
//
// One font unit is one pixel. Caps are 50px tall (rows 10..60), lower-case
// letters 20px (rows 40..60); the baseline is row 60 of a 70 row box.
#![allow(dead_code)]

use counterspace::conv::Scale;
use counterspace::{
    Error, FontMetrics, Glyph, GlyphProvider, PairConfig, Raster, SpacingConfig,
};

const ASCENDER: i64 = 60;
const DESCENDER: i64 = -10;
const HEIGHT: usize = (ASCENDER - DESCENDER) as usize;

#[derive(Clone, Copy)]
enum Shape {
    /// Stems of the given width at both sides, joined by a bar
    H { stem: usize },
    /// Elliptical ring
    O,
    /// Left stem with three bars
    E,
    /// Diagonal strokes meeting at the top
    A,
    /// Diagonal strokes meeting at the bottom
    V,
    /// Solid rectangle
    Slab,
    /// Rectangle with a rectangular bowl
    Ring,
}

struct Spec {
    name: &'static str,
    shape: Shape,
    width: usize,
    top: usize,
    lsb: f64,
    rsb: f64,
}

const GLYPHS: &[Spec] = &[
    Spec { name: "H", shape: Shape::H { stem: 5 }, width: 20, top: 10, lsb: 8.0, rsb: 8.0 },
    Spec { name: "O", shape: Shape::O, width: 24, top: 10, lsb: 5.0, rsb: 5.0 },
    Spec { name: "E", shape: Shape::E, width: 18, top: 10, lsb: 8.0, rsb: 4.0 },
    Spec { name: "A", shape: Shape::A, width: 30, top: 10, lsb: 1.0, rsb: 1.0 },
    Spec { name: "V", shape: Shape::V, width: 30, top: 10, lsb: 1.0, rsb: 1.0 },
    Spec { name: "n", shape: Shape::H { stem: 4 }, width: 16, top: 40, lsb: 6.0, rsb: 6.0 },
    Spec { name: "o", shape: Shape::O, width: 18, top: 40, lsb: 4.0, rsb: 4.0 },
];

// Flat-sided glyphs of equal width: every pair at the same distance has the
// same open area. The reference pairs are set one unit tighter than the rest.
const SLABS: &[Spec] = &[
    Spec { name: "H", shape: Shape::Slab, width: 20, top: 10, lsb: 8.0, rsb: 8.0 },
    Spec { name: "O", shape: Shape::Ring, width: 20, top: 10, lsb: 8.0, rsb: 8.0 },
    Spec { name: "A", shape: Shape::Slab, width: 20, top: 10, lsb: 8.0, rsb: 8.0 },
    Spec { name: "V", shape: Shape::Slab, width: 20, top: 10, lsb: 8.0, rsb: 8.0 },
    Spec { name: "n", shape: Shape::Slab, width: 20, top: 40, lsb: 8.0, rsb: 8.0 },
    Spec { name: "o", shape: Shape::Ring, width: 20, top: 40, lsb: 8.0, rsb: 8.0 },
];

/// A provider over the shapes above
pub struct Blocks {
    glyphs: &'static [Spec],
    pub kerning: Vec<(&'static str, &'static str, f64)>,
}

impl Blocks {
    pub fn new() -> Self {
        Blocks {
            glyphs: GLYPHS,
            kerning: vec![("A", "V", -4.0)],
        }
    }

    /// Flat-sided glyphs whose spacing the illumination model can reproduce
    pub fn slabs() -> Self {
        Blocks {
            glyphs: SLABS,
            kerning: vec![("H", "H", -1.0), ("n", "n", -1.0)],
        }
    }

    fn spec(&self, name: &str) -> Result<&'static Spec, Error> {
        self.glyphs
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::MissingGlyph(name.to_string()))
    }
}

fn fill(r: &mut Raster, row: usize, cols: std::ops::Range<usize>) {
    for c in cols {
        if c < r.width() {
            r.set(row, c, 1.0);
        }
    }
}

fn draw(spec: &Spec) -> Raster {
    let (w, top, bottom) = (spec.width, spec.top, ASCENDER as usize);
    let h = bottom - top;
    let mut r = Raster::new(w, HEIGHT);
    for row in top..bottom {
        let y = row - top;
        match spec.shape {
            Shape::H { stem } => {
                fill(&mut r, row, 0..stem);
                fill(&mut r, row, w - stem..w);
                if y == 0 || (h / 2 - 2..h / 2 + 2).contains(&y) {
                    fill(&mut r, row, stem..w - stem);
                }
            }
            Shape::O => {
                let t = (y as f64 + 0.5) / h as f64 * 2.0 - 1.0;
                let half = w as f64 / 2.0;
                let outer = (half * (1.0 - t * t).sqrt()).round() as usize;
                let inner_t = t * 1.25;
                let inner = if inner_t.abs() < 1.0 {
                    ((half - 5.0) * (1.0 - inner_t * inner_t).sqrt()).round() as usize
                } else {
                    0
                };
                let c = w / 2;
                fill(&mut r, row, c - outer..c - inner);
                fill(&mut r, row, c + inner..c + outer);
            }
            Shape::E => {
                fill(&mut r, row, 0..5);
                if y < 5 || (h / 2 - 2..h / 2 + 2).contains(&y) || y >= h - 5 {
                    fill(&mut r, row, 5..w);
                }
            }
            Shape::A | Shape::V => {
                let from_point = match spec.shape {
                    Shape::A => y,
                    _ => h - 1 - y,
                };
                let reach = (from_point * (w / 2)) / h;
                let (l, rr) = (w / 2 - reach.min(w / 2), w / 2 + reach);
                fill(&mut r, row, l.saturating_sub(3)..l + 3);
                fill(&mut r, row, rr.saturating_sub(3)..rr + 3);
            }
            Shape::Slab => fill(&mut r, row, 0..w),
            Shape::Ring => {
                if y < 5 || y >= h - 5 {
                    fill(&mut r, row, 0..w);
                } else {
                    fill(&mut r, row, 0..5);
                    fill(&mut r, row, w - 5..w);
                }
            }
        }
    }
    r
}

impl GlyphProvider for Blocks {
    fn font_metrics(&self) -> FontMetrics {
        FontMetrics {
            units_per_em: 100.0,
            scale: Scale(1.0),
            x_height_px: 20.0,
            ascender_px: ASCENDER,
            descender_px: DESCENDER,
            italic_angle: 0.0,
        }
    }

    fn glyph(&self, name: &str) -> Result<Glyph, Error> {
        let spec = self.spec(name)?;
        let ink_width = spec.width as f64;
        Ok(Glyph {
            name: name.to_string(),
            ink_width,
            ink_height: (ASCENDER as usize - spec.top) as f64,
            advance_width: spec.lsb + ink_width + spec.rsb,
            lsb: spec.lsb,
            rsb: spec.rsb,
            tsb: spec.top as f64,
            scale: Scale(1.0),
        })
    }

    fn rasterize(&self, name: &str) -> Result<Raster, Error> {
        Ok(draw(self.spec(name)?))
    }

    fn kerning(&self, left: &str, right: &str) -> Result<f64, Error> {
        Ok(self
            .kerning
            .iter()
            .find(|(l, r, _)| *l == left && *r == right)
            .map(|(_, _, k)| *k)
            .unwrap_or(0.0))
    }
}

/// A configuration with a short search range and no serif smoothing
pub fn config() -> SpacingConfig {
    SpacingConfig {
        bare_minimum: 2.0,
        absolute_maximum: 60.0,
        serif_smoothing: 0,
        ..SpacingConfig::default()
    }
    .with_key_pairs(&["HH", "OO", "HO", "OH", "EE"])
    .unwrap()
}

/// Weights which give every key pair a non-zero area
pub fn pair_config() -> PairConfig {
    PairConfig::uniform(15.0, 1.0)
}
