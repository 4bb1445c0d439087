// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-michelson project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error type shared by the generation, analysis and acquisition layers

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the interferometer core and its hardware collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MichelsonError {
    #[error("Invalid acquisition geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("Invalid signal: {reason}")]
    InvalidSignal { reason: String },

    #[error("Unknown source kind '{kind}' (expected HeNe or WhiteLight)")]
    UnknownSourceKind { kind: String },

    #[error("Invalid noise specification: {reason}")]
    InvalidNoise { reason: String },

    #[error("Hardware '{device}' did not acknowledge within {timeout:?}")]
    HardwareTimeout { device: String, timeout: Duration },

    #[error("Hardware '{device}' failure: {reason}")]
    Hardware { device: String, reason: String },
}

impl MichelsonError {
    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        MichelsonError::InvalidGeometry {
            reason: reason.into(),
        }
    }

    pub(crate) fn signal(reason: impl Into<String>) -> Self {
        MichelsonError::InvalidSignal {
            reason: reason.into(),
        }
    }

    pub(crate) fn noise(reason: impl Into<String>) -> Self {
        MichelsonError::InvalidNoise {
            reason: reason.into(),
        }
    }

    pub(crate) fn hardware(device: impl Into<String>, reason: impl Into<String>) -> Self {
        MichelsonError::Hardware {
            device: device.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, MichelsonError>;
