// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! FFT implementation for spectral analysis of interferograms

use log::debug;
use rustfft::{num_complex::Complex64, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::{MichelsonError, Result};
use crate::interferogram::Interferogram;

/// Default relative tolerance on the deviation of each step from the first one
pub const DEFAULT_SPACING_TOLERANCE: f64 = 1e-6;

/// Spectrum of an interferogram, in the native FFT bin order.
///
/// Index 0 is the DC bin, followed by ascending positive frequencies up to
/// Nyquist, then the negative frequencies increasing toward 0. The three
/// vectors are index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// `1 / frequency` in µm; `+∞` at the DC bin
    pub wavelengths: Vec<f64>,
    /// Spatial frequency of each bin in µm⁻¹
    pub frequencies: Vec<f64>,
    /// Unnormalized DFT coefficients
    pub coefficients: Vec<Complex64>,
}

/// Strongest spectral component of a scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralPeak {
    pub index: usize,
    /// µm⁻¹
    pub frequency: f64,
    /// µm
    pub wavelength: f64,
    pub magnitude: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Modulus of every coefficient
    pub fn magnitude(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.norm()).collect()
    }

    /// Bin spacing `1 / (N·dx)` in µm⁻¹
    pub fn resolution(&self) -> Option<f64> {
        self.frequencies.get(1).copied()
    }

    /// Largest frequency magnitude in the spectrum (Nyquist for even lengths)
    pub fn nyquist(&self) -> Option<f64> {
        self.frequencies.iter().map(|f| f.abs()).reduce(f64::max)
    }

    /// Strongest bin among the positive frequencies, DC excluded
    pub fn dominant_peak(&self) -> Option<SpectralPeak> {
        let mut best: Option<SpectralPeak> = None;
        for (index, (&frequency, coefficient)) in self
            .frequencies
            .iter()
            .zip(self.coefficients.iter())
            .enumerate()
        {
            if frequency <= 0.0 {
                continue;
            }
            let magnitude = coefficient.norm();
            if best.map_or(true, |peak| magnitude > peak.magnitude) {
                best = Some(SpectralPeak {
                    index,
                    frequency,
                    wavelength: self.wavelengths[index],
                    magnitude,
                });
            }
        }
        best
    }
}

/// Sample frequencies of an `n`-point DFT with sample spacing `dx`.
///
/// Reproduces the usual layout: `[0, 1, ..., ⌈n/2⌉-1, -⌊n/2⌋, ..., -1] / (n·dx)`.
pub fn fft_frequencies(n: usize, dx: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let scale = 1.0 / (n as f64 * dx);
    let positive = (n - 1) / 2 + 1;
    (0..n)
        .map(|i| {
            let bin = if i < positive {
                i as f64
            } else {
                i as f64 - n as f64
            };
            bin * scale
        })
        .collect()
}

/// Converts interferograms into spectra with a plain (unwindowed) DFT
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    spacing_tolerance: f64,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyzer {
    /// Create an analyzer enforcing the default spacing tolerance
    pub fn new() -> Self {
        Self {
            spacing_tolerance: DEFAULT_SPACING_TOLERANCE,
        }
    }

    /// Create an analyzer with a custom relative tolerance on sample spacing
    pub fn with_spacing_tolerance(spacing_tolerance: f64) -> Self {
        Self { spacing_tolerance }
    }

    /// Transform an interferogram
    pub fn transform_interferogram(&self, interferogram: &Interferogram) -> Result<Spectrum> {
        self.transform(&interferogram.positions, &interferogram.voltages)
    }

    /// Transform equidistant `(positions, voltages)` samples.
    ///
    /// The step `dx` is taken from the first two positions; every other step
    /// must match it within the spacing tolerance.
    pub fn transform(&self, positions: &[f64], voltages: &[f64]) -> Result<Spectrum> {
        let dx = self.check_samples(positions, voltages)?;
        let n = voltages.len();

        let coefficients = compute_fft(voltages);
        let frequencies = fft_frequencies(n, dx);
        let wavelengths = frequencies.iter().map(|f| 1.0 / f).collect();

        debug!(
            "Transformed {} samples, dx = {} µm, resolution = {} µm⁻¹",
            n,
            dx,
            1.0 / (n as f64 * dx)
        );

        Ok(Spectrum {
            wavelengths,
            frequencies,
            coefficients,
        })
    }

    /// Validate the sample arrays and return the spacing
    fn check_samples(&self, positions: &[f64], voltages: &[f64]) -> Result<f64> {
        if positions.is_empty() || voltages.is_empty() {
            return Err(MichelsonError::signal("no samples to transform"));
        }
        if positions.len() != voltages.len() {
            return Err(MichelsonError::signal(format!(
                "{} positions for {} voltages",
                positions.len(),
                voltages.len()
            )));
        }
        if positions.len() < 2 {
            return Err(MichelsonError::signal(
                "at least two samples are needed to derive the spacing",
            ));
        }

        let dx = positions[1] - positions[0];
        if !dx.is_finite() || dx <= 0.0 {
            return Err(MichelsonError::signal(format!(
                "sample spacing must be positive, got {}",
                dx
            )));
        }

        let tolerance = self.spacing_tolerance * dx;
        if let Some(i) = positions.windows(2).position(|w| {
            let deviation = ((w[1] - w[0]) - dx).abs();
            deviation.is_nan() || deviation > tolerance
        }) {
            return Err(MichelsonError::signal(format!(
                "samples are not equidistant: step {} at index {} differs from {}",
                positions[i + 1] - positions[i],
                i,
                dx
            )));
        }

        Ok(dx)
    }
}

/// Compute the forward FFT of a real signal
fn compute_fft(signal: &[f64]) -> Vec<Complex64> {
    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);

    buffer
}
