// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Tests for the interferogram generator
//!
//! * **Geometry**: sample count, spacing and monotonic positions
//! * **Sources**: HeNe periodicity, white-light symmetry and zero crossing
//! * **Noise**: reproducibility and convergence toward the clean signal

use super::{clean_interferogram, AcquisitionGeometry, Interferogram, SignalGenerator, SourceModel};
use crate::error::MichelsonError;
use crate::utility::noise_generator::NoiseSpec;

#[cfg(test)]
mod tests {
    use super::*;

    const SNR: NoiseSpec = NoiseSpec::Snr { snr: 256.0 };

    #[test]
    fn test_positions_are_equidistant_and_increasing() {
        let geometries = [
            AcquisitionGeometry::with_step(0.0, 250.0, 1.0),
            AcquisitionGeometry::with_step(0.0, 250.0, 0.1),
            AcquisitionGeometry::with_step(-30.0, 30.0, 0.5),
            AcquisitionGeometry::with_count(5.0, 17.0, 97),
        ];
        let mut generator = SignalGenerator::seeded(3);

        for geometry in geometries {
            for source in SourceModel::ALL {
                let scan = generator.generate(source, &geometry, &SNR).unwrap();
                let n = geometry.validate().unwrap();
                assert_eq!(scan.positions.len(), n);
                assert_eq!(scan.voltages.len(), n);

                let dx = scan.positions[1] - scan.positions[0];
                for w in scan.positions.windows(2) {
                    assert!(w[1] > w[0]);
                    assert!(((w[1] - w[0]) - dx).abs() < 1e-9 * dx.max(1.0));
                }
            }
        }
    }

    #[test]
    fn test_hene_scan_spans_half_open_range() {
        let scan = SignalGenerator::seeded(1)
            .generate(
                SourceModel::HeNeLaser,
                &AcquisitionGeometry::with_step(0.0, 250.0, 1.0),
                &SNR,
            )
            .unwrap();
        assert_eq!(scan.len(), 250);
        assert_eq!(scan.positions[0], 0.0);
        assert!(*scan.positions.last().unwrap() < 250.0);
    }

    #[test]
    fn test_clean_hene_is_periodic() {
        let period = 0.6328;
        let geometry = AcquisitionGeometry::with_count(0.0, 100.0 * period, 10_001);
        let scan = clean_interferogram(SourceModel::HeNeLaser, &geometry).unwrap();
        // Samples spaced by exactly one period every 100 indices
        for i in 0..(scan.len() - 100) {
            assert!((scan.voltages[i] - scan.voltages[i + 100]).abs() < 1e-6);
        }
        assert!(scan.voltages.iter().all(|v| (0.0..=2.0).contains(v)));
    }

    #[test]
    fn test_clean_white_light_is_centered_and_point_symmetric() {
        let geometry = AcquisitionGeometry::with_step(-30.0, 30.0, 0.25);
        let scan = clean_interferogram(SourceModel::WhiteLight, &geometry).unwrap();

        // Range [-30, 30) is recentered around its midpoint 0
        assert_eq!(scan.positions[0], -30.0);
        let zero = scan.positions.iter().position(|&x| x == 0.0).unwrap();
        assert_eq!(scan.voltages[zero], 1.0);

        for k in 1..zero {
            let right = scan.voltages[zero + k] - 1.0;
            let left = scan.voltages[zero - k] - 1.0;
            assert!((right + left).abs() < 1e-12, "offset {}", k);
        }
    }

    #[test]
    fn test_white_light_recenters_shifted_scans() {
        let geometry = AcquisitionGeometry::with_step(100.0, 160.0, 1.0);
        let scan = clean_interferogram(SourceModel::WhiteLight, &geometry).unwrap();
        assert_eq!(scan.positions[0], -30.0);
        assert_eq!(scan.positions[30], 0.0);
        assert_eq!(scan.voltages[30], 1.0);
    }

    #[test]
    fn test_white_light_zero_crossing_has_no_nan() {
        let scan = SignalGenerator::seeded(11)
            .generate(
                SourceModel::WhiteLight,
                &AcquisitionGeometry::with_step(-30.0, 30.0, 1.0),
                &SNR,
            )
            .unwrap();
        assert_eq!(scan.len(), 60);
        assert!(scan.positions.contains(&0.0));
        assert!(scan.voltages.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let geometry = AcquisitionGeometry::with_step(0.0, 50.0, 0.5);
        let a = SignalGenerator::seeded(77)
            .generate(SourceModel::HeNeLaser, &geometry, &SNR)
            .unwrap();
        let b = SignalGenerator::seeded(77)
            .generate(SourceModel::HeNeLaser, &geometry, &SNR)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_high_snr_converges_to_clean_signal() {
        let geometry = AcquisitionGeometry::with_step(0.0, 50.0, 0.1);
        let clean = clean_interferogram(SourceModel::HeNeLaser, &geometry).unwrap();
        let mut generator = SignalGenerator::seeded(8);

        let mut previous = f64::INFINITY;
        for snr in [10.0, 1e3, 1e6] {
            let noisy = generator
                .generate(SourceModel::HeNeLaser, &geometry, &NoiseSpec::Snr { snr })
                .unwrap();
            let worst = noisy
                .voltages
                .iter()
                .zip(clean.voltages.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            assert!(worst < previous);
            previous = worst;
        }
        assert!(previous < 1e-4);

        let exact = generator
            .generate(
                SourceModel::HeNeLaser,
                &geometry,
                &NoiseSpec::Snr { snr: f64::INFINITY },
            )
            .unwrap();
        assert_eq!(exact, clean);
    }

    #[test]
    fn test_uniform_noise_only_adds() {
        let geometry = AcquisitionGeometry::with_count(0.0, 20.0, 200);
        let clean = clean_interferogram(SourceModel::HeNeLaser, &geometry).unwrap();
        let noisy = SignalGenerator::seeded(4)
            .generate(
                SourceModel::HeNeLaser,
                &geometry,
                &NoiseSpec::Uniform { level: 0.05 },
            )
            .unwrap();
        for (n, c) in noisy.voltages.iter().zip(clean.voltages.iter()) {
            assert!(*n >= *c && *n <= *c + 0.05);
        }
    }

    #[test]
    fn test_invalid_inputs_are_reported() {
        let mut generator = SignalGenerator::seeded(0);
        let err = generator
            .generate(
                SourceModel::HeNeLaser,
                &AcquisitionGeometry::with_step(10.0, 0.0, 1.0),
                &SNR,
            )
            .unwrap_err();
        assert!(matches!(err, MichelsonError::InvalidGeometry { .. }));

        let err = generator
            .generate(
                SourceModel::HeNeLaser,
                &AcquisitionGeometry::with_step(0.0, 10.0, 1.0),
                &NoiseSpec::Snr { snr: 0.0 },
            )
            .unwrap_err();
        assert!(matches!(err, MichelsonError::InvalidNoise { .. }));

        // A step finer than the float spacing at 1e16 cannot give increasing positions
        for source in SourceModel::ALL {
            let err = generator
                .generate(
                    source,
                    &AcquisitionGeometry::with_step(1e16, 1e16 + 8.0, 0.5),
                    &NoiseSpec::None,
                )
                .unwrap_err();
            assert!(matches!(err, MichelsonError::InvalidGeometry { .. }), "{:?}", err);
        }
    }

    #[test]
    fn test_interferogram_invariants() {
        assert!(Interferogram::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(Interferogram::new(vec![1.0, 1.0], vec![1.0, 2.0]).is_err());
        assert!(Interferogram::new(vec![2.0, 1.0], vec![1.0, 2.0]).is_err());

        let scan = Interferogram::new(vec![0.0, 1.0, 2.0], vec![1.0, 4.0, 2.0]).unwrap();
        let normalized = scan.normalized();
        assert_eq!(normalized.voltages, vec![0.25, 1.0, 0.5]);
        assert_eq!(normalized.positions, scan.positions);
    }
}
