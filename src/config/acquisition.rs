// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Settings of the motorized acquisition

use serde::{Deserialize, Serialize};

use crate::interferogram::SourceModel;

/// Hardware backends available for the stage and the voltmeter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareKind {
    /// In-process stage and voltmeter driven by a source model
    #[default]
    Simulated,
}

/// Parameters of the simulated hardware
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Source seen by the simulated detector
    pub source: SourceModel,
    /// Mirror displacement of the zero path difference in µm
    pub zero_path_difference_um: f64,
    /// Time taken by every jog
    pub move_duration_ms: u64,
    /// SNR of the simulated detector; noiseless when absent
    #[serde(default)]
    pub snr: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            source: SourceModel::WhiteLight,
            zero_path_difference_um: 25.0,
            move_duration_ms: 1,
            snr: Some(256.0),
            seed: None,
        }
    }
}

/// Acquisition section of the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    #[serde(default)]
    pub hardware: HardwareKind,
    /// Stage jog in µm of screw travel
    pub step_size_um: f64,
    /// Pause after every voltmeter reading
    pub delay_ms: u64,
    /// Voltmeter readings averaged per point; 0 reports single readings
    /// without storing them while the stage keeps jogging
    pub measure_number: u32,
    /// Jog direction
    pub forward: bool,
    /// Screw travel per µm of mirror displacement
    pub calibration_factor: f64,
    /// Bound on the wait for a single move
    pub move_timeout_ms: u64,
    /// Stop after this many points; runs until stopped when absent
    #[serde(default)]
    pub max_points: Option<usize>,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            hardware: HardwareKind::default(),
            step_size_um: 0.5,
            delay_ms: 10,
            measure_number: 1,
            forward: true,
            calibration_factor: 10.0,
            move_timeout_ms: 2000,
            max_points: Some(1000),
            simulation: SimulationConfig::default(),
        }
    }
}
