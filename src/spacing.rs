// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Spacing and kerning output
//!
//! These are the values an autospacing tool writes back to a font. This
//! crate does not modify fonts itself.

use crate::config::GlyphPair;
use crate::conv::trunc;
use crate::provider::GlyphProvider;
use crate::{CounterSpace, Error};
use std::collections::BTreeMap;

/// Side bearings and kerning for a set of glyphs, in font units
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpacingPlan {
    /// `(lsb, rsb)` per glyph name
    pub sidebearings: BTreeMap<String, (i64, i64)>,
    /// Kerning per pair, only where its magnitude exceeds the threshold
    #[cfg_attr(feature = "serde", serde(with = "pair_map"))]
    pub kerning: BTreeMap<GlyphPair, i64>,
}

impl SpacingPlan {
    /// Side bearings of `glyph`, if planned
    pub fn sidebearings(&self, glyph: &str) -> Option<(i64, i64)> {
        self.sidebearings.get(glyph).copied()
    }

    /// Kerning of a pair (zero if none was emitted)
    pub fn kerning(&self, left: &str, right: &str) -> i64 {
        self.kerning
            .get(&GlyphPair::new(left, right))
            .copied()
            .unwrap_or(0)
    }
}

// JSON maps need string keys; store kerning as a list of entries
#[cfg(feature = "serde")]
mod pair_map {
    use crate::config::GlyphPair;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize)]
    struct Entry {
        left: String,
        right: String,
        value: i64,
    }

    pub fn serialize<S: Serializer>(map: &BTreeMap<GlyphPair, i64>, ser: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<Entry> = map
            .iter()
            .map(|(pair, value)| Entry {
                left: pair.left.clone(),
                right: pair.right.clone(),
                value: *value,
            })
            .collect();
        entries.serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<BTreeMap<GlyphPair, i64>, D::Error> {
        let entries = Vec::<Entry>::deserialize(de)?;
        Ok(entries
            .into_iter()
            .map(|e| (GlyphPair::new(e.left, e.right), e.value))
            .collect())
    }
}

/// Found and natural distance of one pair, in font units
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairComparison {
    pub pair: GlyphPair,
    /// Distance found by [`CounterSpace::space`]
    pub found: i64,
    /// The font's current distance, truncated
    pub natural: i64,
}

impl PairComparison {
    /// `found − natural`
    pub fn difference(&self) -> i64 {
        self.found - self.natural
    }
}

impl<P: GlyphProvider> CounterSpace<P> {
    /// Plan side bearings for `glyphs` and kerning for `kern_pairs`
    ///
    /// A glyph of a kerning pair which is not listed in `glyphs` has its side
    /// bearings derived as well, and they are included in the plan.
    /// Kerning is the found distance less the planned side bearings; values
    /// no larger in magnitude than [`crate::SpacingConfig::kerning_threshold`]
    /// are dropped.
    pub fn plan<'a>(
        &mut self,
        glyphs: impl IntoIterator<Item = &'a str>,
        kern_pairs: &[GlyphPair],
    ) -> Result<SpacingPlan, Error> {
        let mut plan = SpacingPlan::default();
        for glyph in glyphs {
            self.plan_sidebearings(&mut plan, glyph)?;
        }

        let threshold = self.config.kerning_threshold;
        for pair in kern_pairs {
            let (_, rsb) = self.plan_sidebearings(&mut plan, &pair.left)?;
            let (lsb, _) = self.plan_sidebearings(&mut plan, &pair.right)?;
            let kern = self.space(&pair.left, &pair.right)? - (rsb + lsb);
            if kern.abs() > threshold {
                log::info!("plan: kern {}{} by {kern}", pair.left, pair.right);
                plan.kerning.insert(pair.clone(), kern);
            }
        }
        Ok(plan)
    }

    fn plan_sidebearings(&mut self, plan: &mut SpacingPlan, glyph: &str) -> Result<(i64, i64), Error> {
        if let Some(bearings) = plan.sidebearings(glyph) {
            return Ok(bearings);
        }
        let bearings = self.derive_sidebearings(glyph, None)?;
        plan.sidebearings.insert(glyph.to_string(), bearings);
        Ok(bearings)
    }

    /// Compare found and natural distances for each adjacent pair of `text`
    ///
    /// Each character is taken as a glyph name.
    pub fn compare_string(&mut self, text: &str) -> Result<Vec<PairComparison>, Error> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = Vec::with_capacity(chars.len().saturating_sub(1));
        for w in chars.windows(2) {
            let (left, right) = (w[0].to_string(), w[1].to_string());
            let found = self.space(&left, &right)?;
            let natural = trunc(self.natural_distance(&left, &right)?);
            log::debug!("compare_string: {left}{right}: found {found}, natural {natural}");
            out.push(PairComparison {
                pair: GlyphPair::new(left, right),
                found,
                natural,
            });
        }
        Ok(out)
    }

    /// Sum of squared differences over [`Self::compare_string`]
    pub fn squared_error(&mut self, text: &str) -> Result<i64, Error> {
        Ok(self
            .compare_string(text)?
            .iter()
            .map(|c| c.difference().pow(2))
            .sum())
    }
}
