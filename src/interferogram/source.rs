// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Light source models
//!
//! Each source is a pure function of the optical path difference (in µm)
//! returning the clean detector intensity, before any noise is applied.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::MichelsonError;

/// Wavelength of the helium-neon laser line in µm
pub const HENE_WAVELENGTH_UM: f64 = 0.6328;

/// Short edge of the simulated white-light band in µm
pub const WHITE_LIGHT_SHORT_UM: f64 = 0.4;

/// Long edge of the simulated white-light band in µm
pub const WHITE_LIGHT_LONG_UM: f64 = 0.8;

/// Below this magnitude a recentered position is treated as the zero path difference
const ZERO_CROSSING_EPSILON: f64 = 1e-12;

/// Light source illuminating the interferometer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceModel {
    /// Monochromatic 632.8 nm laser
    #[serde(rename = "HeNe", alias = "hene")]
    HeNeLaser,
    /// Broadband source spanning 0.4 to 0.8 µm
    #[serde(rename = "WhiteLight", alias = "whitelight", alias = "white")]
    WhiteLight,
}

impl SourceModel {
    /// All supported sources, in display order
    pub const ALL: [SourceModel; 2] = [SourceModel::HeNeLaser, SourceModel::WhiteLight];

    /// Name used in configuration files and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            SourceModel::HeNeLaser => "HeNe",
            SourceModel::WhiteLight => "WhiteLight",
        }
    }

    /// Whether sample positions are recentered on the scan midpoint before evaluation
    pub fn is_centered(&self) -> bool {
        matches!(self, SourceModel::WhiteLight)
    }

    /// Clean intensity at optical path difference `x` (µm).
    ///
    /// HeNe: `1 + cos(2πx / 0.6328)`.
    ///
    /// WhiteLight: `1 + exp(-x²/4) · sin(π(k1+k2)x)/x · sin(π(k1-k2)x)` with
    /// `k1 = 1/0.4` and `k2 = 1/0.8`. The product has a removable singularity
    /// at `x = 0` whose limit is 0, so the intensity there is exactly 1.
    pub fn intensity(&self, x: f64) -> f64 {
        match self {
            SourceModel::HeNeLaser => 1.0 + (2.0 * PI * x / HENE_WAVELENGTH_UM).cos(),
            SourceModel::WhiteLight => {
                if x.abs() < ZERO_CROSSING_EPSILON {
                    return 1.0;
                }
                let k1 = 1.0 / WHITE_LIGHT_SHORT_UM;
                let k2 = 1.0 / WHITE_LIGHT_LONG_UM;
                let envelope = (-x * x / 4.0).exp();
                let carrier = (2.0 * PI * (k1 + k2) * x / 2.0).sin() / x;
                let beat = (2.0 * PI * (k1 - k2) * x / 2.0).sin();
                1.0 + envelope * carrier * beat
            }
        }
    }
}

impl fmt::Display for SourceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceModel {
    type Err = MichelsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "HeNe" | "hene" | "HeNeLaser" | "laser" => Ok(SourceModel::HeNeLaser),
            "WhiteLight" | "whitelight" | "white" | "white-light" => Ok(SourceModel::WhiteLight),
            other => Err(MichelsonError::UnknownSourceKind {
                kind: other.to_string(),
            }),
        }
    }
}
