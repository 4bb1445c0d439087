// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Motorized acquisition module
//!
//! This module drives a translation stage carrying the moving mirror and a
//! voltmeter reading the detector. The [`DataAcquirer`] jogs the stage point
//! after point on a background thread and accumulates averaged voltages into
//! an [`AcquiredData`] record that can be saved and turned into an
//! [`Interferogram`](crate::interferogram::Interferogram).

mod acquirer;
mod record;
mod simulated;


use std::thread;
use std::time::{Duration, Instant};

use log::warn;

use crate::config::{AcquisitionConfig, HardwareKind};
use crate::error::{MichelsonError, Result};
use crate::utility::NoiseSpec;

pub use acquirer::{AcquisitionCallback, AcquisitionParameters, DataAcquirer};
pub use record::AcquiredData;
pub use simulated::{SimulatedStage, SimulatedVoltmeter};

/// Direction of a stage jog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JogDirection {
    Forward,
    Backward,
}

impl JogDirection {
    pub fn from_forward(forward: bool) -> Self {
        if forward {
            JogDirection::Forward
        } else {
            JogDirection::Backward
        }
    }

    /// `+1` forward, `-1` backward
    pub fn sign(&self) -> f64 {
        match self {
            JogDirection::Forward => 1.0,
            JogDirection::Backward => -1.0,
        }
    }
}

/// Translation stage moving the mirror
///
/// Positions are in µm of screw travel. The relative position is measured
/// from the last call to [`Stage::reset_relative_position`].
pub trait Stage: Send {
    /// Device name used in error reports
    fn name(&self) -> &str;

    /// Set the distance covered by one jog
    fn set_step_size(&mut self, step_um: f64) -> Result<()>;

    /// Start one jog in the given direction
    fn jog(&mut self, direction: JogDirection) -> Result<()>;

    /// Whether the last jog has finished, without blocking
    fn move_completed(&mut self) -> Result<bool>;

    /// Block until the current move completes.
    ///
    /// Fails with `HardwareTimeout` when the stage does not report completion
    /// within `timeout`.
    fn wait_until_move_completed(&mut self, timeout: Duration) -> Result<()> {
        let device = self.name().to_string();
        poll_until_completed(&device, timeout, || self.move_completed())
    }

    fn absolute_position(&self) -> Result<f64>;

    fn relative_position(&self) -> Result<f64>;

    /// Make the current position the relative origin
    fn reset_relative_position(&mut self) -> Result<()>;
}

/// Interval between two completion checks of a moving stage
pub const MOVE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Call `completed` until it reports `true` or `timeout` elapses
pub(crate) fn poll_until_completed<F>(
    device: &str,
    timeout: Duration,
    mut completed: F,
) -> Result<()>
where
    F: FnMut() -> Result<bool>,
{
    let started = Instant::now();
    loop {
        if completed()? {
            return Ok(());
        }
        let elapsed = started.elapsed();
        if elapsed >= timeout {
            warn!("{} did not complete its move within {:?}", device, timeout);
            return Err(MichelsonError::HardwareTimeout {
                device: device.to_string(),
                timeout,
            });
        }
        thread::sleep(MOVE_POLL_INTERVAL.min(timeout - elapsed));
    }
}

/// Detector voltmeter
pub trait Voltmeter: Send {
    fn name(&self) -> &str;

    /// Take one voltage reading
    fn read(&mut self) -> Result<f64>;
}

/// Build the stage and voltmeter described by the acquisition settings
pub fn get_hardware(config: &AcquisitionConfig) -> Result<(Box<dyn Stage>, Box<dyn Voltmeter>)> {
    match config.hardware {
        HardwareKind::Simulated => {
            let simulation = &config.simulation;
            let stage = SimulatedStage::new(Duration::from_millis(simulation.move_duration_ms));
            let noise = match simulation.snr {
                Some(snr) => NoiseSpec::Snr { snr },
                None => NoiseSpec::None,
            };
            let voltmeter = SimulatedVoltmeter::new(
                stage.position_handle(),
                simulation.source,
                config.calibration_factor,
                simulation.zero_path_difference_um,
                noise,
                simulation.seed,
            )?;
            Ok((Box::new(stage), Box::new(voltmeter)))
        }
    }
}
