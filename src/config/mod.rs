// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the interferometer simulator
//!
//! The configuration is backed by a YAML file and validated against an
//! embedded JSON schema before being deserialized.
//!
//! ## Configuration Structure
//!
//! - `interferometer`: adjustable scan parameters and plot extents per source
//! - `generator`: noise policy, RNG seed and output options of the generator
//! - `acquisition`: stage and voltmeter settings of a motorized scan
//!
//! ## Usage
//!
//! ```no_run
//! use rust_michelson::config::Config;
//! use rust_michelson::interferogram::SourceModel;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some(SourceModel::WhiteLight), // Source
//!     Some(42),                      // Seed
//!     None,                          // Noise policy
//!     None,                          // Spectrum axis
//!     Some(0.25),                    // Stage step
//!     Some(4),                       // Readings per point
//!     None,                          // Direction
//!     Some(500),                     // Maximum points
//! );
//!
//! let scan = config.interferometer.for_source(config.generator.source).initial();
//! println!("Step: {} µm", scan.step);
//! ```

pub mod acquisition;
pub mod generator;
pub mod interferometer;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::interferogram::SourceModel;
use crate::spectral::AxisKind;

pub use acquisition::{AcquisitionConfig, HardwareKind, SimulationConfig};
pub use generator::{GeneratorConfig, NoisePolicy};
pub use interferometer::{
    InterferometerConfig, ParameterSpec, PlotRange, ScanParameters, SourceParameters,
    SpectrumPlotRanges,
};
pub use utils::output_config_schema;

/// Root configuration structure.
///
/// Every section falls back to its defaults when missing from the file, so
/// an empty document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scan parameter definitions of each light source
    #[serde(default)]
    pub interferometer: InterferometerConfig,

    /// Synthetic generation settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Motorized acquisition settings
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Creating sample configuration file at {:?}", sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with the default values. An invalid file
    /// leaves a `*.sample.yaml` next to it and returns the validation error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        // An empty document parses as null; treat it as an empty mapping
        let json_value = match serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })? {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            value => value,
        };

        let schema_str = include_str!("../../resources/config.schema.json");
        let schema: serde_json::Value =
            serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        let config: Config = match serde_json::from_value(json_value) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = utils::validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only the provided values override the loaded configuration.
    ///
    /// # Parameters
    ///
    /// * `source` - Light source used by the generator and the simulated detector
    /// * `seed` - RNG seed shared by the generator and the simulated detector
    /// * `noise` - Interpretation of the noise parameter
    /// * `axis` - X-axis of the spectrum output
    /// * `step_size` - Stage jog in µm
    /// * `measure_number` - Readings averaged per point, 0 for monitoring
    /// * `forward` - Jog direction
    /// * `max_points` - Number of points after which an acquisition stops
    #[allow(clippy::too_many_arguments)]
    pub fn apply_args(
        &mut self,
        source: Option<SourceModel>,
        seed: Option<u64>,
        noise: Option<NoisePolicy>,
        axis: Option<AxisKind>,
        step_size: Option<f64>,
        measure_number: Option<u32>,
        forward: Option<bool>,
        max_points: Option<usize>,
    ) {
        if let Some(source) = source {
            debug!("Overriding source from command line: {}", source);
            self.generator.source = source;
            self.acquisition.simulation.source = source;
        }
        if let Some(seed) = seed {
            debug!("Overriding seed from command line: {}", seed);
            self.generator.seed = Some(seed);
            self.acquisition.simulation.seed = Some(seed);
        }
        if let Some(noise) = noise {
            debug!("Overriding noise policy from command line: {:?}", noise);
            self.generator.noise = noise;
        }
        if let Some(axis) = axis {
            debug!("Overriding spectrum axis from command line: {:?}", axis);
            self.generator.axis = axis;
        }
        if let Some(step) = step_size {
            debug!("Overriding stage step from command line: {}", step);
            self.acquisition.step_size_um = step;
        }
        if let Some(count) = measure_number {
            debug!("Overriding measure number from command line: {}", count);
            self.acquisition.measure_number = count;
        }
        if let Some(forward) = forward {
            debug!("Overriding direction from command line: forward = {}", forward);
            self.acquisition.forward = forward;
        }
        if let Some(points) = max_points {
            debug!("Overriding maximum points from command line: {}", points);
            self.acquisition.max_points = Some(points);
        }
    }
}
