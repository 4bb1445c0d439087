// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Noise Generator
//!
//! This module perturbs clean interferogram samples so that simulated scans
//! look like real detector output. Two noise policies are supported:
//!
//! * **Uniform**: the legacy additive model, `U(0, 1) · level` added to each sample
//! * **SNR**: heteroscedastic Gaussian model, each sample is drawn from
//!   `N(clean, |clean| / snr)`
//!
//! The random source is injectable: the generator wraps any [`rand::Rng`], and
//! [`NoiseGenerator::new`] seeds a [`StdRng`] so that scans are reproducible.
//!
//! ## Examples
//!
//! ```rust
//! use rust_michelson::utility::noise_generator::{NoiseGenerator, NoiseSpec};
//!
//! let mut generator = NoiseGenerator::new(12345);
//! let noisy = generator
//!     .apply(&NoiseSpec::Snr { snr: 256.0 }, &[1.0, 2.0, 0.5])
//!     .unwrap();
//! assert_eq!(noisy.len(), 3);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{MichelsonError, Result};

/// Noise applied on top of a clean signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum NoiseSpec {
    /// Clean signal
    None,
    /// Additive uniform noise of amplitude `level`
    Uniform { level: f64 },
    /// Gaussian noise with standard deviation `|signal| / snr`
    Snr { snr: f64 },
}

impl NoiseSpec {
    /// Reject parameters that cannot describe a noise distribution
    pub fn validate(&self) -> Result<()> {
        match *self {
            NoiseSpec::None => Ok(()),
            NoiseSpec::Uniform { level } => {
                if !level.is_finite() || level < 0.0 {
                    return Err(MichelsonError::noise(format!(
                        "uniform noise level must be finite and non-negative, got {}",
                        level
                    )));
                }
                Ok(())
            }
            NoiseSpec::Snr { snr } => {
                // An infinite SNR is accepted and yields the clean signal
                if snr.is_nan() || snr <= 0.0 {
                    return Err(MichelsonError::noise(format!(
                        "signal-to-noise ratio must be positive, got {}",
                        snr
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Seedable source of detector noise.
///
/// # Examples
///
/// ```
/// use rust_michelson::utility::noise_generator::NoiseGenerator;
///
/// let mut a = NoiseGenerator::new(7);
/// let mut b = NoiseGenerator::new(7);
/// assert_eq!(a.random_uniform(), b.random_uniform());
/// ```
pub struct NoiseGenerator<R = StdRng> {
    rng: R,
}

impl NoiseGenerator<StdRng> {
    /// Creates a generator whose sequence is fully determined by `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl<R: Rng> NoiseGenerator<R> {
    /// Wraps an existing random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform value in `[0, 1)`
    pub fn random_uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Draw from `N(mean, std_dev)`; a zero deviation returns `mean` unchanged
    pub fn random_gaussian(&mut self, mean: f64, std_dev: f64) -> Result<f64> {
        if std_dev == 0.0 {
            return Ok(mean);
        }
        let normal = Normal::new(mean, std_dev).map_err(|e| {
            MichelsonError::noise(format!(
                "cannot build normal distribution (mean={}, std={}): {}",
                mean, std_dev, e
            ))
        })?;
        Ok(normal.sample(&mut self.rng))
    }

    /// Perturb a single clean sample
    pub fn perturb(&mut self, spec: &NoiseSpec, clean: f64) -> Result<f64> {
        match *spec {
            NoiseSpec::None => Ok(clean),
            NoiseSpec::Uniform { level } => Ok(clean + self.random_uniform() * level),
            NoiseSpec::Snr { snr } => self.random_gaussian(clean, clean.abs() / snr),
        }
    }

    /// Perturb every sample of `clean` according to `spec`
    pub fn apply(&mut self, spec: &NoiseSpec, clean: &[f64]) -> Result<Vec<f64>> {
        spec.validate()?;
        clean
            .iter()
            .map(|&value| self.perturb(spec, value))
            .collect()
    }
}
