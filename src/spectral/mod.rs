// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! Spectral analysis module
//!
//! This module handles spectral analysis of interferograms,
//! particularly Fast Fourier Transform (FFT) processing and the
//! derivation of wavelength and frequency axes.

pub mod display;
mod fft;


pub use display::{AxisKind, PlotLimits, SpectrumView, INTENSITY_HEADROOM};
pub use fft::{
    fft_frequencies, SpectralPeak, Spectrum, SpectrumAnalyzer, DEFAULT_SPACING_TOLERANCE,
};
