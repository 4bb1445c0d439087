// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the Michelson interferometer simulator

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};

use rust_michelson::acquisition::{
    get_hardware, AcquiredData, AcquisitionParameters, DataAcquirer,
};
use rust_michelson::config::{self, Config, NoisePolicy};
use rust_michelson::interferogram::{
    AcquisitionGeometry, Interferogram, SignalGenerator, SourceModel,
};
use rust_michelson::spectral::{AxisKind, Spectrum, SpectrumAnalyzer, SpectrumView};
use rust_michelson::utility::NoiseSpec;
use rust_michelson::AnalysisResult;

/// Michelson interferometer simulator
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a configuration to validate and exit
    #[arg(long)]
    validate_config: Option<PathBuf>,

    /// Output the configuration schema as JSON and exit
    #[arg(long)]
    show_config_schema: bool,

    /// Light source (HeNe or WhiteLight)
    #[arg(long)]
    source: Option<SourceModel>,

    /// RNG seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Disable all logging
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Synthesize an interferogram and analyze its spectrum
    Generate {
        /// Control position of the step parameter
        #[arg(long)]
        step_position: Option<i32>,

        /// Control position of the range parameter
        #[arg(long)]
        range_position: Option<i32>,

        /// Control position of the noise parameter
        #[arg(long)]
        noise_position: Option<i32>,

        /// Sample step in µm, overrides the step control
        #[arg(long)]
        step: Option<f64>,

        /// Scan length in µm, overrides the range control
        #[arg(long)]
        range: Option<f64>,

        /// Noise parameter, overrides the noise control
        #[arg(long)]
        noise_value: Option<f64>,

        /// First mirror position in µm
        #[arg(long, default_value_t = 0.0)]
        start: f64,

        /// Sample a fixed number of points, end included, instead of stepping
        #[arg(long)]
        count: Option<usize>,

        /// Interpretation of the noise parameter
        #[arg(long, value_enum)]
        noise: Option<NoisePolicy>,

        /// X-axis of the spectrum
        #[arg(long, value_enum)]
        axis: Option<AxisKind>,

        /// Include the samples and the spectrum in the report
        #[arg(long)]
        full: bool,

        /// Output file for the report (JSON), stdout when absent
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also save the interferogram in the acquisition data format
        #[arg(long)]
        save_interferogram: Option<PathBuf>,
    },

    /// Run a motorized acquisition and save the data
    Acquire {
        /// Stage jog in µm
        #[arg(long)]
        step_size: Option<f64>,

        /// Readings averaged per point, 0 for monitoring
        #[arg(long)]
        measure_number: Option<u32>,

        /// Jog backward
        #[arg(long)]
        backward: bool,

        /// Stop after this many points
        #[arg(long)]
        max_points: Option<usize>,

        /// Stop after this many seconds
        #[arg(long)]
        duration: Option<u64>,

        /// Output file for the data (JSON)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, serde::Serialize)]
struct GenerationReport {
    #[serde(flatten)]
    result: AnalysisResult,
    step: f64,
    range: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    interferogram: Option<Interferogram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spectrum: Option<SpectrumView>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if args.show_config_schema {
        return config::output_config_schema();
    }

    if let Some(validate_path) = args.validate_config {
        if !validate_path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file does not exist: {}",
                validate_path.display()
            ));
        }
        Config::from_file(&validate_path)
            .map_err(|err| anyhow::anyhow!("Configuration validation failed: {}", err))?;
        println!("Configuration file is valid: {}", validate_path.display());
        return Ok(());
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.yaml"));
    let mut config = Config::from_file(&config_path)?;

    match args.command {
        Some(Command::Generate {
            step_position,
            range_position,
            noise_position,
            step,
            range,
            noise_value,
            start,
            count,
            noise,
            axis,
            full,
            output,
            save_interferogram,
        }) => {
            config.apply_args(args.source, args.seed, noise, axis, None, None, None, None);
            let source = config.generator.source;
            let controls = config.interferometer.for_source(source);
            let mut scan = controls.resolve(
                step_position.unwrap_or(controls.step.initial),
                range_position.unwrap_or(controls.range.initial),
                noise_position.unwrap_or(controls.noise.initial),
            );
            scan.step = step.unwrap_or(scan.step);
            scan.range = range.unwrap_or(scan.range);
            scan.noise = noise_value.unwrap_or(scan.noise);

            let geometry = match count {
                Some(count) => AcquisitionGeometry::with_count(start, start + scan.range, count),
                None => AcquisitionGeometry::with_step(start, start + scan.range, scan.step),
            };
            let noise = config.generator.noise.spec(scan.noise);

            let mut generator = match config.generator.seed {
                Some(seed) => SignalGenerator::seeded(seed),
                None => SignalGenerator::from_entropy(),
            };
            let mut interferogram = generator.generate(source, &geometry, &noise)?;
            if config.generator.normalize {
                interferogram = interferogram.normalized();
            }

            if let Some(path) = save_interferogram {
                let mut data = AcquiredData::new(1.0);
                let samples = interferogram.positions.iter().zip(&interferogram.voltages);
                for (x, v) in samples {
                    data.push(*x, *x, *v);
                }
                data.save_to_file(&path)?;
                info!("Interferogram saved to {}", path.display());
            }

            let spectrum = SpectrumAnalyzer::new().transform_interferogram(&interferogram)?;
            let axis = config.generator.axis;
            let view = SpectrumView::from_spectrum(&spectrum, axis);
            let result = analysis_result(source, noise, &spectrum, axis, &view);
            log_peak(&result);

            let report = GenerationReport {
                result,
                step: scan.step,
                range: scan.range,
                interferogram: full.then_some(interferogram),
                spectrum: full.then_some(view),
            };
            write_json(&report, output.as_deref())?;
        }
        Some(Command::Acquire {
            step_size,
            measure_number,
            backward,
            max_points,
            duration,
            output,
        }) => {
            let forward = if backward { Some(false) } else { None };
            config.apply_args(
                args.source,
                args.seed,
                None,
                None,
                step_size,
                measure_number,
                forward,
                max_points,
            );
            if duration.is_some() && max_points.is_none() {
                config.acquisition.max_points = None;
            }
            run_acquisition(&config, duration.map(Duration::from_secs), output)?;
        }
        None => {
            println!(
                "No command given, configuration loaded from {}",
                config_path.display()
            );
            println!("Run with --help to list the available commands");
        }
    }

    Ok(())
}

fn analysis_result(
    source: SourceModel,
    noise: NoiseSpec,
    spectrum: &Spectrum,
    axis: AxisKind,
    view: &SpectrumView,
) -> AnalysisResult {
    AnalysisResult {
        source,
        noise,
        samples: spectrum.len(),
        resolution: spectrum.resolution(),
        nyquist: spectrum.nyquist(),
        peak: spectrum.dominant_peak(),
        axis,
        limits: view.limits(),
        timestamp: chrono::Utc::now(),
    }
}

fn log_peak(result: &AnalysisResult) {
    match &result.peak {
        Some(peak) => info!(
            "Dominant component: {:.2} nm ({:.4} µm⁻¹), magnitude {:.3}",
            peak.wavelength * 1000.0,
            peak.frequency,
            peak.magnitude
        ),
        None => warn!("Spectrum has no positive frequency bin"),
    }
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_acquisition(
    config: &Config,
    duration: Option<Duration>,
    output: Option<PathBuf>,
) -> Result<()> {
    let (stage, voltmeter) = get_hardware(&config.acquisition)?;
    let mut acquirer = DataAcquirer::new(stage, voltmeter);
    acquirer.reset_relative_position()?;
    acquirer.add_callback(|data: &AcquiredData, accumulating| {
        if let (Some(position), Some(voltage)) =
            (data.relative_positions.last(), data.voltages.last())
        {
            debug!(
                "{} point {}: {:.3} µm, {:.4} V",
                if accumulating { "Acquired" } else { "Monitored" },
                data.len(),
                position,
                voltage
            );
        }
    });

    let params = AcquisitionParameters::from(&config.acquisition);
    let monitoring = params.is_monitor();
    acquirer.start(params)?;

    if let Some(duration) = duration {
        let started = Instant::now();
        while acquirer.is_acquiring() && started.elapsed() < duration {
            thread::sleep(Duration::from_millis(20));
        }
        acquirer.stop();
    }
    let points = acquirer.join()?;
    info!("Acquisition finished with {} points", points);

    if monitoring {
        return Ok(());
    }

    let data = acquirer.snapshot();
    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "interferogram_{}.json",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ))
    });
    data.save_to_file(&path)?;
    info!("Acquired data saved to {}", path.display());

    if data.len() >= 2 {
        let interferogram = data.interferogram()?;
        let spectrum = SpectrumAnalyzer::new().transform_interferogram(&interferogram)?;
        if let Some(peak) = spectrum.dominant_peak() {
            println!(
                "Dominant wavelength: {:.2} nm ({} points)",
                peak.wavelength * 1000.0,
                data.len()
            );
        }
    }
    Ok(())
}
