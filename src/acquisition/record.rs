// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::MichelsonError;
use crate::interferogram::Interferogram;

fn default_calibration() -> f64 {
    1.0
}

/// Points collected by an acquisition, in acquisition order
///
/// The JSON layout uses the keys `"absolute positions"`, `"relative positions"`,
/// `"voltages"` and `"calibration"`. Files holding a bare `"positions"` key
/// are read as relative positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquiredData {
    #[serde(rename = "absolute positions", default)]
    pub absolute_positions: Vec<f64>,
    #[serde(rename = "relative positions", alias = "positions")]
    pub relative_positions: Vec<f64>,
    pub voltages: Vec<f64>,
    /// Screw travel per µm of mirror displacement
    #[serde(default = "default_calibration")]
    pub calibration: f64,
}

impl Default for AcquiredData {
    fn default() -> Self {
        Self::new(default_calibration())
    }
}

impl AcquiredData {
    pub fn new(calibration: f64) -> Self {
        Self {
            absolute_positions: Vec::new(),
            relative_positions: Vec::new(),
            voltages: Vec::new(),
            calibration,
        }
    }

    /// Record holding a single reading
    pub fn single(absolute: f64, relative: f64, voltage: f64, calibration: f64) -> Self {
        let mut data = Self::new(calibration);
        data.push(absolute, relative, voltage);
        data
    }

    pub fn push(&mut self, absolute: f64, relative: f64, voltage: f64) {
        self.absolute_positions.push(absolute);
        self.relative_positions.push(relative);
        self.voltages.push(voltage);
    }

    pub fn len(&self) -> usize {
        self.voltages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltages.is_empty()
    }

    /// Convert to an interferogram over mirror displacement.
    ///
    /// Relative positions are divided by the calibration factor. A backward
    /// scan is reversed so that positions increase.
    pub fn interferogram(&self) -> crate::error::Result<Interferogram> {
        if !(self.calibration.is_finite() && self.calibration > 0.0) {
            return Err(MichelsonError::signal(format!(
                "calibration factor must be positive, got {}",
                self.calibration
            )));
        }
        let mut positions: Vec<f64> = self
            .relative_positions
            .iter()
            .map(|p| p / self.calibration)
            .collect();
        let mut voltages = self.voltages.clone();

        if positions.len() >= 2 && positions[positions.len() - 1] < positions[0] {
            positions.reverse();
            voltages.reverse();
        }
        Interferogram::new(positions, voltages)
    }

    /// Write the record as JSON, atomically replacing `path`
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !directory.exists() {
            fs::create_dir_all(directory)
                .with_context(|| format!("Failed to create directory {:?}", directory))?;
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize acquired data to JSON")?;

        let mut file = NamedTempFile::new_in(directory)
            .with_context(|| format!("Failed to create temporary file in {:?}", directory))?;
        file.write_all(json.as_bytes())
            .context("Failed to write acquired data")?;
        file.persist(path)
            .with_context(|| format!("Failed to move acquired data to {:?}", path))?;

        debug!("Saved {} points to {:?}", self.len(), path);
        Ok(())
    }

    /// Load a record written by [`AcquiredData::save_to_file`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read acquired data at {:?}", path))?;
        let data: AcquiredData = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse acquired data from {:?}", path))?;

        if data.relative_positions.len() != data.voltages.len() {
            anyhow::bail!(
                "{:?} holds {} positions for {} voltages",
                path,
                data.relative_positions.len(),
                data.voltages.len()
            );
        }
        // Legacy files carry no absolute positions
        if !data.absolute_positions.is_empty()
            && data.absolute_positions.len() != data.voltages.len()
        {
            anyhow::bail!(
                "{:?} holds {} absolute positions for {} voltages",
                path,
                data.absolute_positions.len(),
                data.voltages.len()
            );
        }
        Ok(data)
    }
}
