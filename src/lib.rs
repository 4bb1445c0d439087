// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rust Michelson library
//!
//! This library simulates a Michelson interferometer: it synthesizes the
//! interferogram recorded for a HeNe laser or a white-light source, recovers
//! the spectrum with an FFT, and drives a (simulated) motorized acquisition.
//!
//! ```
//! use rust_michelson::interferogram::{AcquisitionGeometry, SignalGenerator, SourceModel};
//! use rust_michelson::spectral::SpectrumAnalyzer;
//! use rust_michelson::utility::NoiseSpec;
//!
//! let geometry = AcquisitionGeometry::with_step(0.0, 50.0, 0.1);
//! let scan = SignalGenerator::seeded(1)
//!     .generate(SourceModel::HeNeLaser, &geometry, &NoiseSpec::Snr { snr: 256.0 })
//!     .unwrap();
//! let spectrum = SpectrumAnalyzer::new().transform_interferogram(&scan).unwrap();
//! let peak = spectrum.dominant_peak().unwrap();
//! assert!((peak.wavelength - 0.6328).abs() < 0.01);
//! ```

pub mod acquisition;
pub mod config;
pub mod error;
pub mod interferogram;
pub mod spectral;
pub mod utility;

use serde::{Deserialize, Serialize};

pub use error::{MichelsonError, Result};

use interferogram::SourceModel;
use spectral::{AxisKind, PlotLimits, SpectralPeak};
use utility::NoiseSpec;

/// Summary of one generate-and-analyze run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub source: SourceModel,
    pub noise: NoiseSpec,
    pub samples: usize,
    /// Bin spacing in µm⁻¹
    pub resolution: Option<f64>,
    /// Largest frequency of the spectrum in µm⁻¹
    pub nyquist: Option<f64>,
    pub peak: Option<SpectralPeak>,
    pub axis: AxisKind,
    pub limits: Option<PlotLimits>,
    /// Timestamp of the analysis
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
