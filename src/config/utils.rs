// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::debug;

use super::{Config, NoisePolicy, ParameterSpec, PlotRange, SourceParameters};
use crate::interferogram::SourceModel;

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line.
///
/// # Example
///
/// ```bash
/// ./rust_michelson --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema_str = include_str!("../../resources/config.schema.json");

    let schema: serde_json::Value =
        serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

fn validate_parameter(context: &str, spec: &ParameterSpec) -> Result<()> {
    if spec.minimum > spec.maximum {
        anyhow::bail!(
            "{}: minimum {} is above maximum {}",
            context,
            spec.minimum,
            spec.maximum
        );
    }
    if spec.initial < spec.minimum || spec.initial > spec.maximum {
        anyhow::bail!(
            "{}: initial position {} outside [{}, {}]",
            context,
            spec.initial,
            spec.minimum,
            spec.maximum
        );
    }
    if spec.step <= 0 {
        anyhow::bail!("{}: step must be positive, got {}", context, spec.step);
    }
    if !(spec.scale.is_finite() && spec.scale > 0.0) {
        anyhow::bail!("{}: scale must be positive, got {}", context, spec.scale);
    }
    if let Some(base) = spec.base {
        if !(base.is_finite() && base > 1.0) {
            anyhow::bail!("{}: logarithmic base must exceed 1, got {}", context, base);
        }
    }
    Ok(())
}

fn validate_range(context: &str, range: &PlotRange) -> Result<()> {
    if !(range.min.is_finite() && range.max.is_finite() && range.min < range.max) {
        anyhow::bail!(
            "{}: plot range [{}, {}] is empty or not finite",
            context,
            range.min,
            range.max
        );
    }
    Ok(())
}

fn validate_source(
    source: SourceModel,
    params: &SourceParameters,
    noise: NoisePolicy,
) -> Result<()> {
    let name = source.name();
    validate_parameter(&format!("{} step", name), &params.step)?;
    validate_parameter(&format!("{} range", name), &params.range)?;
    validate_parameter(&format!("{} noise", name), &params.noise)?;

    // The smallest reachable values must still describe a valid scan
    if params.step.value_at(params.step.minimum) <= 0.0 {
        anyhow::bail!("{} step resolves to a non-positive value at its minimum", name);
    }
    if params.range.value_at(params.range.minimum) <= 0.0 {
        anyhow::bail!("{} range resolves to a non-positive value at its minimum", name);
    }
    let lowest_noise = params.noise.value_at(params.noise.minimum);
    match noise {
        NoisePolicy::Snr if lowest_noise <= 0.0 => {
            anyhow::bail!("{} SNR resolves to {} at its minimum", name, lowest_noise)
        }
        NoisePolicy::Uniform if lowest_noise < 0.0 => {
            anyhow::bail!("{} noise level resolves to {} at its minimum", name, lowest_noise)
        }
        _ => {}
    }

    validate_range(&format!("{} interferogram", name), &params.interferogram_limits)?;
    validate_range(
        &format!("{} zoomed interferogram", name),
        &params.zoomed_interferogram_limits,
    )?;
    let spectra = [
        ("spectrum", &params.fft_limits),
        ("zoomed spectrum", &params.zoomed_fft_limits),
    ];
    for (label, ranges) in spectra {
        validate_range(&format!("{} {} wavelengths", name, label), &ranges.wavelengths)?;
        validate_range(&format!("{} {} frequencies", name, label), &ranges.frequencies)?;
    }
    Ok(())
}

/// Validates the configuration against rules the JSON schema cannot express.
///
/// # Validation Rules
///
/// - **Parameters**: `minimum <= initial <= maximum`, positive step and scale,
///   logarithmic base above 1
/// - **Resolved values**: step and range stay positive over the whole control
///   range, and so does the SNR when the noise policy is `snr`
/// - **Plot ranges**: finite and non-empty
/// - **Acquisition**: positive stage step, calibration factor and move timeout
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    for source in SourceModel::ALL {
        validate_source(
            source,
            config.interferometer.for_source(source),
            config.generator.noise,
        )?;
    }

    let acquisition = &config.acquisition;
    if !(acquisition.step_size_um.is_finite() && acquisition.step_size_um > 0.0) {
        anyhow::bail!(
            "Stage step must be positive, got {}",
            acquisition.step_size_um
        );
    }
    if !(acquisition.calibration_factor.is_finite() && acquisition.calibration_factor > 0.0) {
        anyhow::bail!(
            "Calibration factor must be positive, got {}",
            acquisition.calibration_factor
        );
    }
    if acquisition.move_timeout_ms == 0 {
        anyhow::bail!("Move timeout must be positive");
    }
    if acquisition.max_points == Some(0) {
        anyhow::bail!("Maximum number of points must be positive when set");
    }
    if let Some(snr) = acquisition.simulation.snr {
        if snr.is_nan() || snr <= 0.0 {
            anyhow::bail!("Simulated detector SNR must be positive, got {}", snr);
        }
    }
    if !acquisition.simulation.zero_path_difference_um.is_finite() {
        anyhow::bail!("Zero path difference must be finite");
    }

    Ok(())
}
