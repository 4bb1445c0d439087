// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! End-to-end generation and analysis scenarios

use anyhow::Result;
use rust_michelson::acquisition::AcquiredData;
use rust_michelson::interferogram::source::HENE_WAVELENGTH_UM;
use rust_michelson::interferogram::{AcquisitionGeometry, SignalGenerator, SourceModel};
use rust_michelson::spectral::{fft_frequencies, AxisKind, SpectrumAnalyzer, SpectrumView};
use rust_michelson::utility::NoiseSpec;
use std::fs;
use tempfile::tempdir;

const SNR: NoiseSpec = NoiseSpec::Snr { snr: 256.0 };

#[test]
fn test_hene_coarse_scan_peaks_at_aliased_fringe() -> Result<()> {
    let geometry = AcquisitionGeometry::with_step(0.0, 250.0, 1.0);
    let scan = SignalGenerator::seeded(2024).generate(SourceModel::HeNeLaser, &geometry, &SNR)?;
    assert_eq!(scan.len(), 250);

    let spectrum = SpectrumAnalyzer::new().transform_interferogram(&scan)?;
    let resolution = spectrum.resolution().unwrap_or_default();
    assert!((resolution - 1.0 / 250.0).abs() < 1e-15);
    let nyquist = spectrum.nyquist().unwrap_or_default();
    assert!((nyquist - 0.5).abs() < 1e-12);

    // The fringe lies above Nyquist and folds back into the first zone
    let dx = 1.0;
    let fringe = 1.0 / HENE_WAVELENGTH_UM;
    let folded = (fringe - (fringe * dx).round() / dx).abs();
    let peak = spectrum.dominant_peak().expect("peak");
    assert!(
        (peak.frequency - folded).abs() <= resolution,
        "peak at {} µm⁻¹, expected {}",
        peak.frequency,
        folded
    );
    Ok(())
}

#[test]
fn test_hene_fine_scan_recovers_wavelength() -> Result<()> {
    let geometry = AcquisitionGeometry::with_step(0.0, 250.0, 0.1);
    let scan = SignalGenerator::seeded(5).generate(SourceModel::HeNeLaser, &geometry, &SNR)?;
    assert_eq!(scan.len(), 2500);

    let spectrum = SpectrumAnalyzer::new().transform_interferogram(&scan)?;
    let resolution = spectrum.resolution().unwrap_or_default();
    let peak = spectrum.dominant_peak().expect("peak");

    assert!((peak.frequency - 1.0 / HENE_WAVELENGTH_UM).abs() <= resolution);
    assert!((peak.wavelength - HENE_WAVELENGTH_UM).abs() < 2e-3);

    // Wavelength view reports the line in nanometres
    let view = SpectrumView::from_spectrum(&spectrum, AxisKind::Wavelengths);
    assert!((view.x[peak.index] - 632.8).abs() < 2.0);
    Ok(())
}

#[test]
fn test_white_light_scan_is_finite_everywhere() -> Result<()> {
    let geometry = AcquisitionGeometry::with_step(-30.0, 30.0, 1.0);
    let scan = SignalGenerator::seeded(9).generate(SourceModel::WhiteLight, &geometry, &SNR)?;
    assert_eq!(scan.len(), 60);
    assert!(scan.positions.contains(&0.0));
    assert!(scan.voltages.iter().all(|v| v.is_finite()));

    let spectrum = SpectrumAnalyzer::new().transform_interferogram(&scan)?;
    assert!(spectrum.magnitude().iter().all(|m| m.is_finite()));
    assert!(spectrum.wavelengths[0].is_infinite());
    assert!(spectrum.wavelengths[1..].iter().all(|w| w.is_finite()));
    Ok(())
}

#[test]
fn test_white_light_spectrum_spans_visible_band() -> Result<()> {
    let geometry = AcquisitionGeometry::with_step(-30.0, 30.0, 0.05);
    let scan = SignalGenerator::seeded(3).generate(SourceModel::WhiteLight, &geometry, &SNR)?;
    let spectrum = SpectrumAnalyzer::new().transform_interferogram(&scan)?;
    let peak = spectrum.dominant_peak().expect("peak");

    // Band between 1/0.8 and 1/0.4 µm⁻¹, widened by the coherence envelope
    assert!(
        peak.frequency > 1.0 && peak.frequency < 2.75,
        "peak at {} µm⁻¹",
        peak.frequency
    );
    Ok(())
}

#[test]
fn test_analysis_is_idempotent() -> Result<()> {
    let geometry = AcquisitionGeometry::with_count(0.0, 40.0, 401);
    let scan = SignalGenerator::seeded(12).generate(SourceModel::HeNeLaser, &geometry, &SNR)?;
    let analyzer = SpectrumAnalyzer::new();

    let first = analyzer.transform_interferogram(&scan)?;
    let second = analyzer.transform_interferogram(&scan)?;
    assert_eq!(first.coefficients, second.coefficients);
    assert_eq!(first.frequencies, second.frequencies);
    assert_eq!(first.frequencies, fft_frequencies(401, 0.1));
    Ok(())
}

#[test]
fn test_saved_scan_analyzes_like_the_original() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("scan.json");

    let geometry = AcquisitionGeometry::with_step(0.0, 100.0, 0.1);
    let scan = SignalGenerator::seeded(31).generate(SourceModel::HeNeLaser, &geometry, &SNR)?;

    let mut data = AcquiredData::new(1.0);
    for (x, v) in scan.positions.iter().zip(&scan.voltages) {
        data.push(*x, *x, *v);
    }
    data.save_to_file(&path)?;

    let loaded = AcquiredData::from_file(&path)?;
    assert_eq!(loaded, data);

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    for key in ["absolute positions", "relative positions", "voltages", "calibration"] {
        assert!(raw.get(key).is_some(), "missing key {}", key);
    }

    let analyzer = SpectrumAnalyzer::new();
    let original = analyzer.transform_interferogram(&scan)?;
    let reloaded = analyzer.transform_interferogram(&loaded.interferogram()?)?;
    assert_eq!(
        original.dominant_peak().map(|p| p.index),
        reloaded.dominant_peak().map(|p| p.index)
    );
    Ok(())
}

#[test]
fn test_legacy_positions_key_is_accepted() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("legacy.json");
    fs::write(
        &path,
        r#"{"positions": [0.0, 2.0, 4.0, 6.0], "voltages": [1.0, 2.0, 1.0, 0.0], "calibration": 2.0}"#,
    )?;

    let data = AcquiredData::from_file(&path)?;
    assert!(data.absolute_positions.is_empty());
    assert_eq!(data.relative_positions, vec![0.0, 2.0, 4.0, 6.0]);

    let scan = data.interferogram()?;
    assert_eq!(scan.positions, vec![0.0, 1.0, 2.0, 3.0]);

    fs::write(&path, r#"{"positions": [0.0, 1.0], "voltages": [1.0]}"#)?;
    assert!(AcquiredData::from_file(&path).is_err());

    fs::write(
        &path,
        r#"{"absolute positions": [5.0], "relative positions": [0.0, 1.0], "voltages": [1.0, 2.0]}"#,
    )?;
    assert!(AcquiredData::from_file(&path).is_err());
    Ok(())
}
