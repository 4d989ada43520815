// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font-backed glyph provider
//!
//! This module is only available if `ab_glyph`, `fontdue` or both features are
//! enabled.
//!
//! [`FontFace`] reads metrics with `ttf-parser` and rasters glyphs with one of
//! the enabled backends.
//!
//! ### Units
//!
//! Font files define lengths in *font units*; an Em is
//! `units_per_em` font units, typically 1000 or 2048. A spacing session works
//! at a fixed pixel scale chosen so that the font's x-height is
//! `x_height_px` pixels:
//!
//! -   [`crate::conv::Scale`]: pixels per font unit,
//!     `x_height_px / x_height`
//!
//! Larger scales give finer spacing at a quadratic cost in work per pair.
//! [`DEFAULT_X_HEIGHT_PX`] is a reasonable choice for text faces.
//!
//! # Example
//!
//! ```no_run
//! use counterspace::fonts::{FontFace, DEFAULT_X_HEIGHT_PX};
//! use counterspace::{CounterSpace, SpacingConfig};
//!
//! # fn main() -> Result<(), counterspace::Error> {
//! let data = std::fs::read("MyFont-Regular.ttf").expect("font file");
//! let face = FontFace::new(&data, 0, DEFAULT_X_HEIGHT_PX)?;
//! let mut session = CounterSpace::new(face, SpacingConfig::default());
//! session.determine_parameters()?;
//! let (lsb, rsb) = session.derive_sidebearings("O", None)?;
//! println!("O: {lsb} {rsb}");
//! # Ok(())
//! # }
//! ```

mod face;
mod raster;

pub use face::FontFace;
pub use raster::Backend;

/// Default x-height of the spacing scale, in pixels
pub const DEFAULT_X_HEIGHT_PX: f64 = 90.0;
