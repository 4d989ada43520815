// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Illumination calibration
//!
//! The key pairs of a session are assumed to be well spaced already. The
//! [`PairConfig`] is fitted so that all of them, set at their natural
//! distance, score the same perceived area as the first.
//!
//! Fitting uses a bounded Nelder–Mead simplex search over the nine
//! parameters, each normalised so that its [`Param::bounds`] map to `[0, 1]`.

use crate::config::{CalibrationOptions, PairConfig, Param};
use crate::provider::GlyphProvider;
use crate::{CounterSpace, Error};

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;
/// Edge length of the initial simplex, in normalised units
const INITIAL_STEP: f64 = 0.1;

/// Result of [`CounterSpace::determine_parameters`]
#[derive(Clone, Debug, PartialEq)]
pub struct Calibration {
    /// The fitted configuration, now active on the session
    pub config: PairConfig,
    /// Calibration error of `config`
    pub error: f64,
    /// Simplex iterations taken
    pub iterations: usize,
}

/// A minimum found by [`minimize`]
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
}

fn project(x: &mut [f64]) {
    for v in x {
        *v = v.clamp(0.0, 1.0);
    }
}

/// Linear combination `a + t·(b − a)`, projected onto the unit box
fn towards(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    let mut x: Vec<f64> = a.iter().zip(b).map(|(a, b)| a + t * (b - a)).collect();
    project(&mut x);
    x
}

/// Minimise `f` over the unit box `[0, 1]ⁿ`, starting from `x0`
///
/// NaN values of `f` are treated as `+∞`. `progress` receives the iteration
/// number and the best value so far at the start of each iteration; the
/// best value never increases.
pub(crate) fn minimize<F, E>(
    mut f: F,
    x0: &[f64],
    options: &CalibrationOptions,
    mut progress: impl FnMut(usize, f64),
) -> Result<Minimum, E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    let n = x0.len();
    let mut eval = |x: &[f64]| -> Result<f64, E> {
        let v = f(x)?;
        Ok(if v.is_nan() { f64::INFINITY } else { v })
    };
    if n == 0 {
        let value = eval(x0)?;
        progress(0, value);
        return Ok(Minimum {
            x: Vec::new(),
            value,
            iterations: 0,
        });
    }

    let mut start = x0.to_vec();
    project(&mut start);
    let mut simplex = vec![start.clone()];
    for i in 0..n {
        let mut x = start.clone();
        x[i] = if x[i] + INITIAL_STEP <= 1.0 {
            x[i] + INITIAL_STEP
        } else {
            x[i] - INITIAL_STEP
        };
        simplex.push(x);
    }
    let mut values = Vec::with_capacity(n + 1);
    for x in &simplex {
        values.push(eval(x)?);
    }

    let mut iterations = 0;
    while iterations < options.max_iterations {
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|a, b| values[*a].total_cmp(&values[*b]));
        simplex = order.iter().map(|i| simplex[*i].clone()).collect();
        values = order.iter().map(|i| values[*i]).collect();
        progress(iterations, values[0]);

        let diameter = simplex[1..]
            .iter()
            .flat_map(|x| x.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        let spread = values[1..]
            .iter()
            .map(|v| (v - values[0]).abs())
            .fold(0.0, f64::max);
        if diameter <= options.xtol && spread <= options.ftol {
            break;
        }
        iterations += 1;

        let mut centroid = vec![0.0; n];
        for x in &simplex[..n] {
            for (c, v) in centroid.iter_mut().zip(x) {
                *c += v / n as f64;
            }
        }
        let worst = simplex[n].clone();
        let (best_value, second_worst, worst_value) = (values[0], values[n - 1], values[n]);

        let reflected = towards(&centroid, &worst, -REFLECT);
        let fr = eval(&reflected)?;
        if fr < best_value {
            let expanded = towards(&centroid, &reflected, EXPAND);
            let fe = eval(&expanded)?;
            (simplex[n], values[n]) = if fe < fr { (expanded, fe) } else { (reflected, fr) };
            continue;
        }
        if fr < second_worst {
            (simplex[n], values[n]) = (reflected, fr);
            continue;
        }

        let accepted = if fr < worst_value {
            let outside = towards(&centroid, &reflected, CONTRACT);
            let fc = eval(&outside)?;
            (fc <= fr).then_some((outside, fc))
        } else {
            let inside = towards(&centroid, &worst, CONTRACT);
            let fc = eval(&inside)?;
            (fc < worst_value).then_some((inside, fc))
        };
        if let Some((x, v)) = accepted {
            (simplex[n], values[n]) = (x, v);
            continue;
        }

        for i in 1..=n {
            simplex[i] = towards(&simplex[0], &simplex[i], SHRINK);
            values[i] = eval(&simplex[i])?;
        }
    }

    let best = (0..=n)
        .min_by(|a, b| values[*a].total_cmp(&values[*b]))
        .unwrap_or(0);
    Ok(Minimum {
        x: simplex.swap_remove(best),
        value: values[best],
        iterations,
    })
}

fn normalise(config: &PairConfig) -> Vec<f64> {
    let config = config.clamped();
    Param::ALL
        .iter()
        .map(|p| {
            let (lo, hi) = p.bounds();
            (config.get(*p) - lo) / (hi - lo)
        })
        .collect()
}

fn denormalise(x: &[f64]) -> PairConfig {
    let mut config = PairConfig::initial_guess();
    for (p, v) in Param::ALL.iter().zip(x) {
        let (lo, hi) = p.bounds();
        config.set(*p, lo + v * (hi - lo));
    }
    config
}

impl<P: GlyphProvider> CounterSpace<P> {
    /// Consistency error of the key pairs under `config`
    ///
    /// Each key pair is scored at its natural distance. The error is the sum
    /// of squared deviations of the other pairs' scores relative to the
    /// first's. A zero score for the first pair gives `+∞`.
    pub fn calibration_error(&mut self, config: &PairConfig) -> Result<f64, Error> {
        let key_pairs = self.config.key_pairs.clone();
        let (first, others) = key_pairs.split_first().ok_or(Error::NoKeyPairs)?;

        let score = |this: &mut Self, left: &str, right: &str| -> Result<f64, Error> {
            let distance = this.natural_distance_px(left, right)?;
            let reference = this.reference_pair(left, right);
            this.area_with(config, left, right, distance, &reference)
        };

        let target = score(self, &first.left, &first.right)?;
        if target == 0.0 {
            log::warn!(
                "calibration_error: key pair {}{} has no open area",
                first.left,
                first.right
            );
            return Ok(f64::INFINITY);
        }
        let mut error = 0.0;
        for pair in others {
            let area = score(self, &pair.left, &pair.right)?;
            error += ((area - target) / target).powi(2);
        }
        Ok(error)
    }

    /// Fit the illumination weights to the key pairs
    ///
    /// On success the fitted configuration becomes active.
    pub fn determine_parameters(&mut self) -> Result<Calibration, Error> {
        self.determine_parameters_with(|_| ())
    }

    /// As [`Self::determine_parameters`], reporting the best error found so
    /// far at each iteration
    pub fn determine_parameters_with(
        &mut self,
        mut progress: impl FnMut(f64),
    ) -> Result<Calibration, Error> {
        if self.config.key_pairs.is_empty() {
            return Err(Error::NoKeyPairs);
        }
        let options = self.config.calibration.clone();
        let x0 = normalise(&PairConfig::initial_guess());

        let found = minimize(
            |x| self.calibration_error(&denormalise(x)),
            &x0,
            &options,
            |iteration, error| {
                log::debug!("determine_parameters: iteration {iteration}: error {error}");
                progress(error);
            },
        )?;

        let config = denormalise(&found.x);
        log::info!(
            "determine_parameters: error {} after {} iterations: {config:?}",
            found.value,
            found.iterations
        );
        self.set_pair_config(config.clone());
        Ok(Calibration {
            config,
            error: found.value,
            iterations: found.iterations,
        })
    }
}
