// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Background acquisition loop
//!
//! Each iteration records the stage position and an averaged voltage, hands
//! the data to the registered callbacks, then jogs the stage and waits for
//! the move to complete. The running flag is checked once per iteration.
//! The stage is only locked for one jog or one completion check at a time, so
//! [`DataAcquirer::positions`] answers while a move is under way.
//!
//! With `measure_number == 0` the acquirer runs in monitor mode: callbacks
//! receive single readings and nothing is accumulated.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, RwLock,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info, warn};

use super::{poll_until_completed, AcquiredData, JogDirection, Stage, Voltmeter};
use crate::config::AcquisitionConfig;
use crate::error::{MichelsonError, Result};

/// Receives the data after every point, with `true` when data is accumulated
/// and `false` in monitor mode.
///
/// Callbacks run while the data buffer is read-locked and must not call
/// [`DataAcquirer::clear`].
pub type AcquisitionCallback = Box<dyn Fn(&AcquiredData, bool) + Send + Sync>;

/// Settings of one acquisition run
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionParameters {
    /// Stage jog in µm
    pub step_size_um: f64,
    /// Pause after every voltmeter reading
    pub delay: Duration,
    /// Readings averaged per point; 0 selects monitor mode
    pub measure_number: u32,
    pub direction: JogDirection,
    pub calibration: f64,
    pub move_timeout: Duration,
    pub max_points: Option<usize>,
}

impl AcquisitionParameters {
    pub fn is_monitor(&self) -> bool {
        self.measure_number == 0
    }
}

impl From<&AcquisitionConfig> for AcquisitionParameters {
    fn from(config: &AcquisitionConfig) -> Self {
        Self {
            step_size_um: config.step_size_um,
            delay: Duration::from_millis(config.delay_ms),
            measure_number: config.measure_number,
            direction: JogDirection::from_forward(config.forward),
            calibration: config.calibration_factor,
            move_timeout: Duration::from_millis(config.move_timeout_ms),
            max_points: config.max_points,
        }
    }
}

fn lock<'a, T: ?Sized>(mutex: &'a Mutex<T>, device: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| MichelsonError::hardware(device, "lock poisoned by a panicked thread"))
}

/// State shared between the acquirer handle and its worker thread
#[derive(Clone)]
struct Shared {
    stage: Arc<Mutex<Box<dyn Stage>>>,
    voltmeter: Arc<Mutex<Box<dyn Voltmeter>>>,
    data: Arc<RwLock<AcquiredData>>,
    callbacks: Arc<RwLock<Vec<AcquisitionCallback>>>,
    running: Arc<AtomicBool>,
}

impl Shared {
    fn positions(&self) -> Result<(f64, f64)> {
        let stage = lock(&self.stage, "stage")?;
        Ok((stage.absolute_position()?, stage.relative_position()?))
    }

    fn read_average(&self, params: &AcquisitionParameters) -> Result<f64> {
        let count = params.measure_number.max(1);
        let mut sum = 0.0;
        for _ in 0..count {
            sum += lock(&self.voltmeter, "voltmeter")?.read()?;
            if !params.delay.is_zero() {
                thread::sleep(params.delay);
            }
        }
        Ok(sum / count as f64)
    }

    fn notify(&self, data: &AcquiredData, accumulating: bool) {
        match self.callbacks.read() {
            Ok(callbacks) => {
                for callback in callbacks.iter() {
                    callback(data, accumulating);
                }
            }
            Err(_) => warn!("Callback list poisoned, skipping notification"),
        }
    }

    /// Append one point and hand the whole buffer to the callbacks
    fn record(&self, absolute: f64, relative: f64, voltage: f64, calibration: f64) -> Result<()> {
        {
            let mut data = self
                .data
                .write()
                .map_err(|_| MichelsonError::hardware("acquirer", "data buffer poisoned"))?;
            data.calibration = calibration;
            data.push(absolute, relative, voltage);
        }
        let data = self
            .data
            .read()
            .map_err(|_| MichelsonError::hardware("acquirer", "data buffer poisoned"))?;
        self.notify(&data, true);
        Ok(())
    }

    /// Wait for the stage, locking it only for each completion check
    fn wait_for_stage(&self, timeout: Duration) -> Result<()> {
        let device = lock(&self.stage, "stage")?.name().to_string();
        poll_until_completed(&device, timeout, || {
            lock(&self.stage, "stage")?.move_completed()
        })
    }

    fn move_stage(&self, params: &AcquisitionParameters) -> Result<()> {
        lock(&self.stage, "stage")?.jog(params.direction)?;
        self.wait_for_stage(params.move_timeout)
    }

    fn run(&self, params: &AcquisitionParameters) -> Result<usize> {
        lock(&self.stage, "stage")?.set_step_size(params.step_size_um)?;
        // A move left over from an aborted run must land before the first reading
        self.wait_for_stage(params.move_timeout)?;
        let accumulating = !params.is_monitor();
        let mut points = 0usize;

        while self.running.load(Ordering::SeqCst) {
            let (absolute, relative) = self.positions()?;
            if accumulating {
                let voltage = self.read_average(params)?;
                self.record(absolute, relative, voltage, params.calibration)?;
            } else {
                let voltage = lock(&self.voltmeter, "voltmeter")?.read()?;
                let data = AcquiredData::single(absolute, relative, voltage, params.calibration);
                self.notify(&data, false);
            }
            points += 1;

            if params.max_points.is_some_and(|max| points >= max) {
                info!("Acquisition reached {} points", points);
                break;
            }
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            self.move_stage(params)?;
        }

        Ok(points)
    }
}

/// Drives a stage and a voltmeter on a background thread
pub struct DataAcquirer {
    shared: Shared,
    worker: Option<JoinHandle<Result<usize>>>,
}

impl DataAcquirer {
    pub fn new(stage: Box<dyn Stage>, voltmeter: Box<dyn Voltmeter>) -> Self {
        Self {
            shared: Shared {
                stage: Arc::new(Mutex::new(stage)),
                voltmeter: Arc::new(Mutex::new(voltmeter)),
                data: Arc::new(RwLock::new(AcquiredData::default())),
                callbacks: Arc::new(RwLock::new(Vec::new())),
                running: Arc::new(AtomicBool::new(false)),
            },
            worker: None,
        }
    }

    /// Register a callback invoked after every point
    pub fn add_callback<F>(&self, callback: F)
    where
        F: Fn(&AcquiredData, bool) + Send + Sync + 'static,
    {
        match self.shared.callbacks.write() {
            Ok(mut callbacks) => callbacks.push(Box::new(callback)),
            Err(_) => error!("Callback list poisoned, callback dropped"),
        }
    }

    /// Start the acquisition loop; a no-op when already acquiring
    pub fn start(&mut self, params: AcquisitionParameters) -> Result<()> {
        if self.shared.running.load(Ordering::SeqCst) {
            warn!("Acquisition is already running");
            return Ok(());
        }
        // Collect the outcome of a previous run that ended on its own
        if let Some(handle) = self.worker.take() {
            if let Ok(Err(e)) = handle.join() {
                debug!("Previous acquisition ended with: {}", e);
            }
        }

        self.shared.running.store(true, Ordering::SeqCst);
        info!(
            "Starting acquisition: step {} µm, {} readings per point, {:?}",
            params.step_size_um, params.measure_number, params.direction
        );

        let shared = self.shared.clone();
        let spawned = thread::Builder::new()
            .name("michelson-acquisition".to_string())
            .spawn(move || {
                let outcome = shared.run(&params);
                shared.running.store(false, Ordering::SeqCst);
                match &outcome {
                    Ok(points) => info!("Acquisition stopped after {} points", points),
                    Err(e) => error!("Acquisition aborted: {}", e),
                }
                outcome
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                Err(MichelsonError::hardware(
                    "acquirer",
                    format!("cannot spawn acquisition thread: {}", e),
                ))
            }
        }
    }

    /// Ask the loop to stop after the current point
    pub fn stop(&self) {
        info!("Stopping acquisition");
        self.shared.running.store(false, Ordering::SeqCst);
    }

    pub fn is_acquiring(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Wait for the loop to end and return the number of points it produced
    pub fn join(&mut self) -> Result<usize> {
        match self.worker.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| MichelsonError::hardware("acquirer", "acquisition thread panicked"))?,
            None => Ok(0),
        }
    }

    /// Copy of the accumulated data
    pub fn snapshot(&self) -> AcquiredData {
        match self.shared.data.read() {
            Ok(data) => data.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drop the accumulated points
    pub fn clear(&self) {
        let mut data = match self.shared.data.write() {
            Ok(data) => data,
            Err(poisoned) => poisoned.into_inner(),
        };
        let calibration = data.calibration;
        *data = AcquiredData::new(calibration);
    }

    /// Current `(absolute, relative)` stage positions
    pub fn positions(&self) -> Result<(f64, f64)> {
        self.shared.positions()
    }

    /// Make the current stage position the relative origin
    pub fn reset_relative_position(&self) -> Result<()> {
        lock(&self.shared.stage, "stage")?.reset_relative_position()
    }
}

impl Drop for DataAcquirer {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
