// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Automatic letter-spacing and kerning
//!
//! Glyphs are spaced by *perceived counter-space*: the open area between two
//! glyphs, weighted by three simulated light sources. A set of key pairs the
//! designer has already spaced well is used to calibrate the lights; every
//! other pair is then set at the distance where its perceived area matches
//! that of its reference pair.
//!
//! The entry point is [`CounterSpace`], a session over one
//! [`GlyphProvider`]. With the `ab_glyph` or `fontdue` feature,
//! [`fonts::FontFace`] provides glyphs from an OpenType font.
//!
//! ```
//! # use counterspace::*;
//! # fn spacing<P: GlyphProvider>(provider: P) -> Result<(), Error> {
//! let mut session = CounterSpace::new(provider, SpacingConfig::default());
//! session.determine_parameters()?;
//! let distance = session.space("A", "V")?;
//! let plan = session.plan(["H", "O", "A", "V"], &[GlyphPair::new("A", "V")])?;
//! # let _ = (distance, plan);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(doc_cfg, feature(doc_cfg))]

pub mod conv;

mod error;
pub use error::{Error, FontError};

mod config;
pub use config::*;

pub mod raster;
pub use raster::{EdgeCounters, Mask, Raster};

mod provider;
pub use provider::{maximum_ink_distance, minimum_ink_distance, shift_offsets};
pub use provider::{FontMetrics, Glyph, GlyphProvider};

mod counters;
pub use counters::{Band, SerifKernel, Side};

mod light;
pub use light::{Illumination, Light};

mod session;
pub use session::{BoxSize, CounterSpace};

mod search;
pub use search::Found;

mod calibrate;
pub use calibrate::Calibration;

mod spacing;
pub use spacing::{PairComparison, SpacingPlan};

#[cfg(any(feature = "ab_glyph", feature = "fontdue"))]
#[cfg_attr(doc_cfg, doc(cfg(any(feature = "ab_glyph", feature = "fontdue"))))]
pub mod fonts;
