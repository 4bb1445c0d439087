// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Per-source parameter definitions
//!
//! Each adjustable scan parameter is described declaratively: an integer
//! control position bounded by `minimum`/`maximum` and moved by `step`, and
//! a transform mapping that position to a physical value. The transform is
//! linear (`position / scale`) unless a logarithmic `base` is given, in which
//! case the value is `floor(base^(position / scale))`.

use serde::{Deserialize, Serialize};

use crate::interferogram::{AcquisitionGeometry, SourceModel};
use crate::spectral::AxisKind;

/// Definition of one adjustable parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Display unit of the resolved value
    pub unit: String,
    /// Control position at start-up
    pub initial: i32,
    pub minimum: i32,
    pub maximum: i32,
    /// Increment between two control positions
    pub step: i32,
    /// Divisor applied to the control position
    pub scale: f64,
    /// Logarithmic base; linear transform when absent
    #[serde(default)]
    pub base: Option<f64>,
}

impl ParameterSpec {
    /// Linear parameter
    pub fn linear(unit: &str, initial: i32, minimum: i32, maximum: i32, step: i32, scale: f64) -> Self {
        Self {
            unit: unit.to_string(),
            initial,
            minimum,
            maximum,
            step,
            scale,
            base: None,
        }
    }

    /// Logarithmic parameter with the given base
    pub fn logarithmic(
        unit: &str,
        initial: i32,
        minimum: i32,
        maximum: i32,
        step: i32,
        scale: f64,
        base: f64,
    ) -> Self {
        Self {
            base: Some(base),
            ..Self::linear(unit, initial, minimum, maximum, step, scale)
        }
    }

    /// Physical value at a control position
    pub fn value_at(&self, position: i32) -> f64 {
        let scaled = position as f64 / self.scale;
        match self.base {
            Some(base) => base.powf(scaled).floor(),
            None => scaled,
        }
    }

    /// Physical value at the initial position
    pub fn initial_value(&self) -> f64 {
        self.value_at(self.initial)
    }

    /// Bring a position back inside `[minimum, maximum]`
    pub fn clamp(&self, position: i32) -> i32 {
        position.clamp(self.minimum, self.maximum)
    }

    /// Every reachable control position, in increasing order
    pub fn positions(&self) -> impl Iterator<Item = i32> + '_ {
        let step = self.step.max(1) as usize;
        (self.minimum..=self.maximum).step_by(step)
    }

    /// Label shown next to the control, e.g. `Step [µm]: 2`
    pub fn label(&self, name: &str, position: i32) -> String {
        format!("{} [{}]: {}", name, self.unit, self.value_at(position))
    }
}

/// Horizontal extent of a plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRange {
    pub min: f64,
    pub max: f64,
}

impl PlotRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Spectrum plot extents, one per x-axis kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPlotRanges {
    /// In nm
    pub wavelengths: PlotRange,
    /// In µm⁻¹
    pub frequencies: PlotRange,
}

impl SpectrumPlotRanges {
    pub fn for_axis(&self, axis: AxisKind) -> PlotRange {
        match axis {
            AxisKind::Wavelengths => self.wavelengths,
            AxisKind::Frequencies => self.frequencies,
        }
    }
}

/// Parameters resolved from control positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanParameters {
    /// Sample step in µm
    pub step: f64,
    /// Scan length in µm
    pub range: f64,
    /// Noise parameter; its meaning depends on the configured noise model
    pub noise: f64,
}

impl ScanParameters {
    /// Scan geometry starting at the origin
    pub fn geometry(&self) -> AcquisitionGeometry {
        AcquisitionGeometry::with_step(0.0, self.range, self.step)
    }
}

/// Controls and plot extents of one light source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceParameters {
    pub step: ParameterSpec,
    pub range: ParameterSpec,
    pub noise: ParameterSpec,
    pub interferogram_limits: PlotRange,
    pub zoomed_interferogram_limits: PlotRange,
    pub fft_limits: SpectrumPlotRanges,
    pub zoomed_fft_limits: SpectrumPlotRanges,
}

impl SourceParameters {
    /// Resolve the three control positions, clamped to their bounds
    pub fn resolve(&self, step: i32, range: i32, noise: i32) -> ScanParameters {
        ScanParameters {
            step: self.step.value_at(self.step.clamp(step)),
            range: self.range.value_at(self.range.clamp(range)),
            noise: self.noise.value_at(self.noise.clamp(noise)),
        }
    }

    /// Parameters at the initial control positions
    pub fn initial(&self) -> ScanParameters {
        self.resolve(self.step.initial, self.range.initial, self.noise.initial)
    }

    /// Named controls, in display order
    pub fn controls(&self) -> [(&'static str, &ParameterSpec); 3] {
        [("Step", &self.step), ("Range", &self.range), ("SNR", &self.noise)]
    }

    fn hene() -> Self {
        Self {
            step: ParameterSpec::linear("µm", 20, 5, 40, 5, 10.0),
            range: ParameterSpec::linear("µm", 250, 200, 300, 5, 1.0),
            noise: ParameterSpec::logarithmic("ratio", 8, 0, 12, 1, 1.0, 2.0),
            interferogram_limits: PlotRange::new(0.0, 300.0),
            zoomed_interferogram_limits: PlotRange::new(0.0, 10.0),
            fft_limits: SpectrumPlotRanges {
                wavelengths: PlotRange::new(-5000.0, 5000.0),
                frequencies: PlotRange::new(-5.0, 5.0),
            },
            zoomed_fft_limits: SpectrumPlotRanges {
                wavelengths: PlotRange::new(500.0, 800.0),
                frequencies: PlotRange::new(1.4, 1.8),
            },
        }
    }

    fn white_light() -> Self {
        Self {
            step: ParameterSpec::linear("µm", 10, 5, 20, 1, 10.0),
            range: ParameterSpec::linear("µm", 60, 40, 100, 5, 1.0),
            noise: ParameterSpec::logarithmic("ratio", 8, 0, 12, 1, 1.0, 2.0),
            interferogram_limits: PlotRange::new(-50.0, 50.0),
            zoomed_interferogram_limits: PlotRange::new(-5.0, 5.0),
            fft_limits: SpectrumPlotRanges {
                wavelengths: PlotRange::new(-5000.0, 5000.0),
                frequencies: PlotRange::new(-5.0, 5.0),
            },
            zoomed_fft_limits: SpectrumPlotRanges {
                wavelengths: PlotRange::new(300.0, 1000.0),
                frequencies: PlotRange::new(1.0, 3.0),
            },
        }
    }
}

/// Parameter definitions of every light source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterferometerConfig {
    #[serde(default = "SourceParameters::hene")]
    pub hene: SourceParameters,
    #[serde(default = "SourceParameters::white_light")]
    pub white_light: SourceParameters,
}

impl InterferometerConfig {
    pub fn for_source(&self, source: SourceModel) -> &SourceParameters {
        match source {
            SourceModel::HeNeLaser => &self.hene,
            SourceModel::WhiteLight => &self.white_light,
        }
    }
}

impl Default for InterferometerConfig {
    fn default() -> Self {
        Self {
            hene: SourceParameters::hene(),
            white_light: SourceParameters::white_light(),
        }
    }
}
