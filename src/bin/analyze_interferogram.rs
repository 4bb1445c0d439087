// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Interferogram Analyzer
//!
//! A command-line tool that loads a saved acquisition, computes its spectrum
//! and reports the dominant wavelength.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rust_michelson::acquisition::AcquiredData;
use rust_michelson::spectral::{
    AxisKind, SpectrumAnalyzer, SpectrumView, DEFAULT_SPACING_TOLERANCE,
};

#[derive(Parser)]
#[command(name = "analyze_interferogram")]
#[command(about = "Analyze the spectrum of a saved interferogram")]
struct Args {
    /// Acquisition data file (JSON)
    #[arg(value_name = "INPUT_FILE")]
    input: PathBuf,

    /// Relative tolerance on the sample spacing
    #[arg(long, default_value_t = DEFAULT_SPACING_TOLERANCE)]
    tolerance: f64,

    /// Scale voltages so that their maximum is 1 before the transform
    #[arg(long)]
    normalize: bool,

    /// Number of strongest components to list
    #[arg(short, long, default_value_t = 5)]
    top: usize,

    /// X-axis used for the plot limits
    #[arg(long, value_enum, default_value_t = AxisKind::Wavelengths)]
    axis: AxisKind,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = Args::parse();

    let data = AcquiredData::from_file(&args.input)?;
    info!(
        "Loaded {} points from {} (calibration {})",
        data.len(),
        args.input.display(),
        data.calibration
    );

    let mut interferogram = data
        .interferogram()
        .with_context(|| format!("{} does not hold a valid scan", args.input.display()))?;
    if args.normalize {
        interferogram = interferogram.normalized();
    }

    let spectrum = SpectrumAnalyzer::with_spacing_tolerance(args.tolerance)
        .transform_interferogram(&interferogram)?;

    println!("Samples: {}", spectrum.len());
    if let Some(resolution) = spectrum.resolution() {
        println!("Resolution: {:.5} µm⁻¹", resolution);
    }
    if let Some(nyquist) = spectrum.nyquist() {
        println!("Nyquist frequency: {:.5} µm⁻¹", nyquist);
    }

    let peak = spectrum
        .dominant_peak()
        .context("The spectrum has no positive frequency bin")?;
    println!(
        "Dominant wavelength: {:.2} nm ({:.5} µm⁻¹)",
        peak.wavelength * 1000.0,
        peak.frequency
    );

    // Strongest positive-frequency components
    let magnitude = spectrum.magnitude();
    let mut bins: Vec<usize> = (1..spectrum.len())
        .filter(|&i| spectrum.frequencies[i] > 0.0)
        .collect();
    bins.sort_by(|&a, &b| magnitude[b].total_cmp(&magnitude[a]));
    println!("\nStrongest components:");
    for &i in bins.iter().take(args.top) {
        println!(
            "  {:>10.2} nm  {:>9.5} µm⁻¹  {:>12.4}",
            spectrum.wavelengths[i] * 1000.0,
            spectrum.frequencies[i],
            magnitude[i]
        );
    }

    if let Some(limits) = SpectrumView::from_spectrum(&spectrum, args.axis).limits() {
        println!(
            "\nPlot limits ({}): x up to {:.3}, intensity up to {:.3}",
            args.axis.label(),
            limits.max_x,
            limits.max_intensity
        );
    }

    Ok(())
}
