// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Simulated stage and voltmeter
//!
//! The stage and the voltmeter share the stage position, so the simulated
//! detector reads the fringe of a source model at the current mirror
//! displacement.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::debug;

use super::{JogDirection, Stage, Voltmeter};
use crate::error::{MichelsonError, Result};
use crate::interferogram::SourceModel;
use crate::utility::{NoiseGenerator, NoiseSpec};

const STAGE_NAME: &str = "simulated stage";
const VOLTMETER_NAME: &str = "simulated voltmeter";

fn lock_position<'a>(position: &'a Mutex<f64>, device: &str) -> Result<MutexGuard<'a, f64>> {
    position
        .lock()
        .map_err(|_| MichelsonError::hardware(device, "position lock poisoned"))
}

/// A move started by a jog and not yet acknowledged
#[derive(Debug, Clone, Copy)]
struct PendingMove {
    target: f64,
    done_at: Instant,
}

/// In-process stage with a configurable move duration
pub struct SimulatedStage {
    position: Arc<Mutex<f64>>,
    origin: f64,
    step_size: f64,
    move_duration: Duration,
    pending: Option<PendingMove>,
    stalled: bool,
}

impl SimulatedStage {
    /// Stage at absolute position 0 taking `move_duration` per jog
    pub fn new(move_duration: Duration) -> Self {
        Self {
            position: Arc::new(Mutex::new(0.0)),
            origin: 0.0,
            step_size: 0.0,
            move_duration,
            pending: None,
            stalled: false,
        }
    }

    /// Start from another absolute position
    pub fn starting_at(mut self, position: f64) -> Self {
        self.position = Arc::new(Mutex::new(position));
        self
    }

    /// Stage that never completes its moves
    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }

    /// Shared handle on the absolute position
    pub fn position_handle(&self) -> Arc<Mutex<f64>> {
        Arc::clone(&self.position)
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }
}

impl Stage for SimulatedStage {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    fn set_step_size(&mut self, step_um: f64) -> Result<()> {
        if !(step_um.is_finite() && step_um > 0.0) {
            return Err(MichelsonError::hardware(
                STAGE_NAME,
                format!("step size must be positive, got {}", step_um),
            ));
        }
        debug!("Stage step size set to {} µm", step_um);
        self.step_size = step_um;
        Ok(())
    }

    fn jog(&mut self, direction: JogDirection) -> Result<()> {
        if !self.move_completed()? {
            return Err(MichelsonError::hardware(
                STAGE_NAME,
                "jog requested while a move is in progress",
            ));
        }
        let current = *lock_position(&self.position, STAGE_NAME)?;
        self.pending = Some(PendingMove {
            target: current + direction.sign() * self.step_size,
            done_at: Instant::now() + self.move_duration,
        });
        Ok(())
    }

    fn move_completed(&mut self) -> Result<bool> {
        let Some(pending) = self.pending else {
            return Ok(true);
        };
        if self.stalled || Instant::now() < pending.done_at {
            return Ok(false);
        }
        *lock_position(&self.position, STAGE_NAME)? = pending.target;
        self.pending = None;
        debug!("{} reached {} µm", STAGE_NAME, pending.target);
        Ok(true)
    }

    fn absolute_position(&self) -> Result<f64> {
        Ok(*lock_position(&self.position, STAGE_NAME)?)
    }

    fn relative_position(&self) -> Result<f64> {
        Ok(self.absolute_position()? - self.origin)
    }

    fn reset_relative_position(&mut self) -> Result<()> {
        self.origin = self.absolute_position()?;
        debug!("Relative origin moved to {} µm", self.origin);
        Ok(())
    }
}

/// Voltmeter reading a source fringe at the stage position
///
/// The mirror displacement is the stage position divided by the calibration
/// factor; the fringe is evaluated relative to the zero path difference.
pub struct SimulatedVoltmeter {
    position: Arc<Mutex<f64>>,
    source: SourceModel,
    calibration: f64,
    zero_path_difference: f64,
    noise: NoiseSpec,
    generator: NoiseGenerator,
}

impl SimulatedVoltmeter {
    pub fn new(
        position: Arc<Mutex<f64>>,
        source: SourceModel,
        calibration: f64,
        zero_path_difference: f64,
        noise: NoiseSpec,
        seed: Option<u64>,
    ) -> Result<Self> {
        noise.validate()?;
        if !(calibration.is_finite() && calibration > 0.0) {
            return Err(MichelsonError::hardware(
                VOLTMETER_NAME,
                format!("calibration factor must be positive, got {}", calibration),
            ));
        }
        let generator = match seed {
            Some(seed) => NoiseGenerator::new(seed),
            None => NoiseGenerator::from_entropy(),
        };
        Ok(Self {
            position,
            source,
            calibration,
            zero_path_difference,
            noise,
            generator,
        })
    }

    /// Noiseless reading at the current position
    pub fn clean_reading(&self) -> Result<f64> {
        let stage_position = *lock_position(&self.position, VOLTMETER_NAME)?;
        let mirror = stage_position / self.calibration;
        Ok(self.source.intensity(mirror - self.zero_path_difference))
    }
}

impl Voltmeter for SimulatedVoltmeter {
    fn name(&self) -> &str {
        VOLTMETER_NAME
    }

    fn read(&mut self) -> Result<f64> {
        let clean = self.clean_reading()?;
        self.generator.perturb(&self.noise, clean)
    }
}
