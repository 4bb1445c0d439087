// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Tests for the noise generator
//!
//! Covers seeding, the two noise policies and parameter validation.

use super::noise_generator::{NoiseGenerator, NoiseSpec};
use crate::error::MichelsonError;

#[cfg(test)]
mod tests {
    use super::*;

    fn mean_and_std(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, variance.sqrt())
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let clean = vec![1.0; 64];
        let spec = NoiseSpec::Snr { snr: 10.0 };
        let a = NoiseGenerator::new(42).apply(&spec, &clean).unwrap();
        let b = NoiseGenerator::new(42).apply(&spec, &clean).unwrap();
        let c = NoiseGenerator::new(43).apply(&spec, &clean).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_snr_standard_deviation_matches_signal_scale() {
        let clean = vec![2.0; 20_000];
        let mut generator = NoiseGenerator::new(2024);
        let noisy = generator.apply(&NoiseSpec::Snr { snr: 10.0 }, &clean).unwrap();

        let (mean, std) = mean_and_std(&noisy);
        assert!((mean - 2.0).abs() < 0.01, "mean = {}", mean);
        assert!((std - 0.2).abs() < 0.01, "std = {}", std);
    }

    #[test]
    fn test_snr_noise_is_heteroscedastic() {
        let mut generator = NoiseGenerator::new(5);
        let spec = NoiseSpec::Snr { snr: 20.0 };

        let small = generator.apply(&spec, &vec![0.5; 10_000]).unwrap();
        let large = generator.apply(&spec, &vec![5.0; 10_000]).unwrap();
        let (_, small_std) = mean_and_std(&small);
        let (_, large_std) = mean_and_std(&large);

        let ratio = large_std / small_std;
        assert!((ratio - 10.0).abs() < 0.5, "ratio = {}", ratio);
    }

    #[test]
    fn test_infinite_snr_returns_clean_signal() {
        let clean = vec![0.0, 1.5, -2.0, 3.25];
        let mut generator = NoiseGenerator::new(1);
        let noisy = generator
            .apply(&NoiseSpec::Snr { snr: f64::INFINITY }, &clean)
            .unwrap();
        assert_eq!(noisy, clean);
    }

    #[test]
    fn test_zero_signal_is_untouched_by_snr_noise() {
        let mut generator = NoiseGenerator::new(1);
        let noisy = generator
            .apply(&NoiseSpec::Snr { snr: 3.0 }, &[0.0; 16])
            .unwrap();
        assert!(noisy.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_uniform_noise_stays_within_level() {
        let clean = vec![1.0; 5_000];
        let mut generator = NoiseGenerator::new(99);
        let noisy = generator
            .apply(&NoiseSpec::Uniform { level: 0.3 }, &clean)
            .unwrap();

        assert!(noisy.iter().all(|&v| (1.0..1.3).contains(&v)));
        let (mean, _) = mean_and_std(&noisy);
        assert!((mean - 1.15).abs() < 0.01, "mean = {}", mean);
    }

    #[test]
    fn test_no_noise_is_identity() {
        let clean = vec![0.1, 0.2, 0.3];
        let mut generator = NoiseGenerator::new(0);
        assert_eq!(generator.apply(&NoiseSpec::None, &clean).unwrap(), clean);
    }

    #[test]
    fn test_invalid_noise_parameters() {
        let mut generator = NoiseGenerator::new(0);
        for spec in [
            NoiseSpec::Snr { snr: 0.0 },
            NoiseSpec::Snr { snr: -4.0 },
            NoiseSpec::Snr { snr: f64::NAN },
            NoiseSpec::Uniform { level: -0.1 },
            NoiseSpec::Uniform { level: f64::INFINITY },
        ] {
            let err = generator.apply(&spec, &[1.0]).unwrap_err();
            assert!(matches!(err, MichelsonError::InvalidNoise { .. }), "{:?}", spec);
        }
    }
}
