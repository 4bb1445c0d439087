// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Interferogram synthesis
//!
//! This module produces the voltage-versus-mirror-position signal that a
//! Michelson interferometer would record for a given light source, scan
//! geometry and detector noise.

mod generator;
pub mod geometry;
pub mod source;

#[cfg(test)]
mod generator_test;

pub use generator::{clean_interferogram, SignalGenerator};
pub use geometry::{AcquisitionGeometry, Sampling};
pub use source::SourceModel;

use serde::{Deserialize, Serialize};

use crate::error::{MichelsonError, Result};

/// Voltage recorded at each mirror position of a scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interferogram {
    /// Mirror positions in µm, strictly increasing
    pub positions: Vec<f64>,
    /// Detector voltage at each position
    pub voltages: Vec<f64>,
}

impl Interferogram {
    /// Build an interferogram, checking that both sequences line up and that
    /// positions are strictly increasing
    pub fn new(positions: Vec<f64>, voltages: Vec<f64>) -> Result<Self> {
        if positions.len() != voltages.len() {
            return Err(MichelsonError::signal(format!(
                "{} positions for {} voltages",
                positions.len(),
                voltages.len()
            )));
        }
        if let Some(i) = positions.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(MichelsonError::signal(format!(
                "positions are not strictly increasing at index {} ({} then {})",
                i + 1,
                positions[i],
                positions[i + 1]
            )));
        }
        Ok(Self {
            positions,
            voltages,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Copy of the interferogram with voltages divided by their maximum.
    ///
    /// Returns the data unchanged when the maximum is zero or not finite.
    pub fn normalized(&self) -> Interferogram {
        let max = self
            .voltages
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() || max == 0.0 {
            return self.clone();
        }
        Interferogram {
            positions: self.positions.clone(),
            voltages: self.voltages.iter().map(|v| v / max).collect(),
        }
    }
}
