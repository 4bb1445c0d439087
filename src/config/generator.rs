// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Settings of the synthetic interferogram generator

use serde::{Deserialize, Serialize};

use crate::interferogram::SourceModel;
use crate::spectral::AxisKind;
use crate::utility::NoiseSpec;

/// How the resolved noise parameter is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoisePolicy {
    /// The parameter is a signal-to-noise ratio
    #[default]
    Snr,
    /// The parameter is a uniform noise level in percent of full scale
    Uniform,
    /// Noise is disabled and the parameter ignored
    None,
}

impl NoisePolicy {
    /// Build the noise model for a resolved parameter value
    pub fn spec(&self, value: f64) -> NoiseSpec {
        match self {
            NoisePolicy::Snr => NoiseSpec::Snr { snr: value },
            NoisePolicy::Uniform => NoiseSpec::Uniform {
                level: value / 100.0,
            },
            NoisePolicy::None => NoiseSpec::None,
        }
    }
}

/// Generator section of the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Fixed RNG seed; drawn from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub noise: NoisePolicy,
    #[serde(default = "default_source")]
    pub source: SourceModel,
    /// X-axis of the spectrum output
    #[serde(default)]
    pub axis: AxisKind,
    /// Scale interferogram voltages so that their maximum is 1
    #[serde(default)]
    pub normalize: bool,
}

fn default_source() -> SourceModel {
    SourceModel::HeNeLaser
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            noise: NoisePolicy::default(),
            source: default_source(),
            axis: AxisKind::default(),
            normalize: false,
        }
    }
}
