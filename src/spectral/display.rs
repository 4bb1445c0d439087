// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Plot-ready views of a spectrum
//!
//! The analyzer keeps the raw FFT layout; this module derives what a plot
//! needs: the x axis in nanometres or in µm⁻¹, the magnitude, and axis
//! extents that ignore the non-finite DC wavelength.

use serde::{Deserialize, Serialize};

use super::fft::Spectrum;

/// Factor applied to the maximum intensity so the peak does not touch the frame
pub const INTENSITY_HEADROOM: f64 = 1.05;

/// Quantity shown on the spectrum x axis
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    /// Wavelength in nm
    #[default]
    Wavelengths,
    /// Spatial frequency in µm⁻¹
    Frequencies,
}

impl AxisKind {
    /// The other axis
    pub fn toggle(self) -> Self {
        match self {
            AxisKind::Wavelengths => AxisKind::Frequencies,
            AxisKind::Frequencies => AxisKind::Wavelengths,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AxisKind::Wavelengths => "Wavelength [nm]",
            AxisKind::Frequencies => "Frequency [µm⁻¹]",
        }
    }
}

/// Extents of a spectrum plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotLimits {
    /// Largest finite x value
    pub max_x: f64,
    /// Largest finite intensity at a finite x, times [`INTENSITY_HEADROOM`]
    pub max_intensity: f64,
}

/// x / intensity pairs of a spectrum, in the analyzer's bin order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumView {
    pub axis: AxisKind,
    pub x: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl SpectrumView {
    pub fn from_spectrum(spectrum: &Spectrum, axis: AxisKind) -> Self {
        let x = match axis {
            AxisKind::Wavelengths => spectrum.wavelengths.iter().map(|w| w * 1000.0).collect(),
            AxisKind::Frequencies => spectrum.frequencies.clone(),
        };
        Self {
            axis,
            x,
            intensity: spectrum.magnitude(),
        }
    }

    /// Axis extents, or `None` when no bin has a finite x and intensity
    pub fn limits(&self) -> Option<PlotLimits> {
        let finite: Vec<(f64, f64)> = self
            .x
            .iter()
            .zip(self.intensity.iter())
            .filter(|(x, _)| x.is_finite())
            .map(|(&x, &y)| (x, y))
            .collect();

        let max_x = finite
            .iter()
            .map(|&(x, _)| x)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_intensity = finite
            .iter()
            .map(|&(_, y)| y)
            .filter(|y| y.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);

        if !max_x.is_finite() || !max_intensity.is_finite() {
            return None;
        }

        Some(PlotLimits {
            max_x,
            max_intensity: max_intensity * INTENSITY_HEADROOM,
        })
    }
}
