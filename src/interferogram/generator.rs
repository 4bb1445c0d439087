// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

use super::{AcquisitionGeometry, Interferogram, SourceModel};
use crate::error::Result;
use crate::utility::noise_generator::{NoiseGenerator, NoiseSpec};

/// Synthesizes interferograms for a light source seen through the interferometer.
///
/// The generator owns its random source so that successive scans with the
/// same seed are reproducible.
///
/// # Examples
///
/// ```
/// use rust_michelson::interferogram::{AcquisitionGeometry, SignalGenerator, SourceModel};
/// use rust_michelson::utility::NoiseSpec;
///
/// let mut generator = SignalGenerator::seeded(42);
/// let scan = generator
///     .generate(
///         SourceModel::HeNeLaser,
///         &AcquisitionGeometry::with_step(0.0, 250.0, 1.0),
///         &NoiseSpec::Snr { snr: 256.0 },
///     )
///     .unwrap();
/// assert_eq!(scan.len(), 250);
/// ```
pub struct SignalGenerator<R = StdRng> {
    noise: NoiseGenerator<R>,
}

impl SignalGenerator<StdRng> {
    /// Generator with a deterministic random source
    pub fn seeded(seed: u64) -> Self {
        Self {
            noise: NoiseGenerator::new(seed),
        }
    }

    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            noise: NoiseGenerator::from_entropy(),
        }
    }
}

impl<R: Rng> SignalGenerator<R> {
    /// Generator drawing noise from the given random source
    pub fn with_rng(rng: R) -> Self {
        Self {
            noise: NoiseGenerator::with_rng(rng),
        }
    }

    /// Produce a noisy interferogram.
    ///
    /// For [`SourceModel::WhiteLight`] the returned positions are recentered
    /// on the scan midpoint, so the zero path difference sits at 0.
    pub fn generate(
        &mut self,
        source: SourceModel,
        geometry: &AcquisitionGeometry,
        noise: &NoiseSpec,
    ) -> Result<Interferogram> {
        noise.validate()?;
        let clean = clean_interferogram(source, geometry)?;
        let voltages = self.noise.apply(noise, &clean.voltages)?;

        debug!(
            "Generated {} interferogram: {} samples over [{}, {}], noise {:?}",
            source,
            clean.len(),
            geometry.start,
            geometry.end,
            noise
        );

        Interferogram::new(clean.positions, voltages)
    }
}

/// Noise-free interferogram for the given source and geometry
pub fn clean_interferogram(
    source: SourceModel,
    geometry: &AcquisitionGeometry,
) -> Result<Interferogram> {
    let mut positions = geometry.positions()?;
    if source.is_centered() {
        let offset = geometry.midpoint();
        for x in positions.iter_mut() {
            *x -= offset;
        }
    }
    let voltages = positions.iter().map(|&x| source.intensity(x)).collect();
    Interferogram::new(positions, voltages)
}
