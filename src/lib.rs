//! Function Generator Firmware Library
//!
//! This library provides the core functionality for an STM32G474-based
//! DDS function generator. A hardware timer paces a DMA channel that
//! streams a pre-computed sample table into the DAC, so a configured
//! waveform plays back indefinitely without firmware intervention.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Playback Orchestrator  │  Request Mailbox                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  WAVEFORM PIPELINE                           │
//! │  Timing Resolver │ Table Synthesizer │ Pipeline Configurator │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  DAC (converter) │ DMA (transfer engine) │ TIM (pace timer)  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Type-driven design**: Custom types enforce invariants at compile time
//! - **Single source of truth**: feasibility and timing share one procedure
//! - **Stop-before-mutate**: all three pipeline stages are halted before the
//!   sample table or peripheral registers change
//! - **Explicit error handling**: All fallible operations return `Result`
//! - **No unsafe in application code**: All unsafe isolated in the HAL layer

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_sync;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Collaborator contracts for the converter, transfer engine and pace
/// timer, plus the STM32G474 implementations behind them.
pub mod hal;

/// Waveform Generation Pipeline
///
/// Timing resolution, table synthesis, pipeline configuration and the
/// playback orchestrator.
pub mod wavegen;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;
    pub use crate::wavegen::generator::WaveformGenerator;
    pub use crate::wavegen::timing::{is_parameter_allowed, resolve_timing};

    // Error handling
    pub use core::result::Result;

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Duration, Instant, Timer};

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}
