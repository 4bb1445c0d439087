// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Sampling geometry of a mirror scan

use serde::{Deserialize, Serialize};

use crate::error::{MichelsonError, Result};

/// Upper bound on the number of generated samples
pub const MAX_SAMPLES: usize = 1 << 24;

/// How the scan range is divided into samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Equidistant samples separated by the given step (µm)
    Step(f64),
    /// Given number of linearly spaced samples, both ends included
    Count(usize),
}

/// Scan range and sampling of an acquisition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionGeometry {
    /// First mirror position (µm)
    pub start: f64,
    /// End of the scan range (µm)
    pub end: f64,
    pub sampling: Sampling,
}

impl AcquisitionGeometry {
    /// Geometry sampled with an explicit step size
    pub fn with_step(start: f64, end: f64, step: f64) -> Self {
        Self {
            start,
            end,
            sampling: Sampling::Step(step),
        }
    }

    /// Geometry sampled with a fixed number of points
    pub fn with_count(start: f64, end: f64, count: usize) -> Self {
        Self {
            start,
            end,
            sampling: Sampling::Count(count),
        }
    }

    /// Midpoint of the scan range
    pub fn midpoint(&self) -> f64 {
        self.start + (self.end - self.start) / 2.0
    }

    /// Check the geometry and return the number of samples it produces
    pub fn validate(&self) -> Result<usize> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(MichelsonError::geometry(format!(
                "range bounds must be finite (start={}, end={})",
                self.start, self.end
            )));
        }
        if self.end <= self.start {
            return Err(MichelsonError::geometry(format!(
                "end ({}) must be greater than start ({})",
                self.end, self.start
            )));
        }

        let count = match self.sampling {
            Sampling::Step(step) => {
                if !step.is_finite() || step <= 0.0 {
                    return Err(MichelsonError::geometry(format!(
                        "step must be positive, got {}",
                        step
                    )));
                }
                let span = (self.end - self.start) / step;
                // Absorb rounding so that an exact multiple does not gain a sample
                let count = (span - span * 1e-12).ceil();
                if count > MAX_SAMPLES as f64 {
                    return Err(MichelsonError::geometry(format!(
                        "{} samples exceed the limit of {}",
                        count, MAX_SAMPLES
                    )));
                }
                count as usize
            }
            Sampling::Count(count) => {
                if count > MAX_SAMPLES {
                    return Err(MichelsonError::geometry(format!(
                        "{} samples exceed the limit of {}",
                        count, MAX_SAMPLES
                    )));
                }
                count
            }
        };

        if count < 2 {
            return Err(MichelsonError::geometry(format!(
                "scan produces {} sample(s), at least 2 are required",
                count
            )));
        }

        Ok(count)
    }

    /// Sample positions of the scan, strictly increasing
    pub fn positions(&self) -> Result<Vec<f64>> {
        let count = self.validate()?;
        let positions = match self.sampling {
            Sampling::Step(step) => (0..count)
                .map(|i| self.start + i as f64 * step)
                .collect(),
            Sampling::Count(_) => {
                let spacing = (self.end - self.start) / (count - 1) as f64;
                let mut positions: Vec<f64> = (0..count)
                    .map(|i| self.start + i as f64 * spacing)
                    .collect();
                positions[count - 1] = self.end;
                positions
            }
        };
        if let Some(i) = positions.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(MichelsonError::geometry(format!(
                "sampling collapses at index {}: {} is not above {}",
                i + 1,
                positions[i + 1],
                positions[i]
            )));
        }
        Ok(positions)
    }
}
