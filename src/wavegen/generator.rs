//! Playback orchestrator
//!
//! Top-level entry point of the waveform pipeline. Sequences timing
//! resolution, table synthesis and chain reconfiguration, and owns the
//! fail-closed policy: a rejected request silences the output rather
//! than leaving a stale or half-built waveform running.

use crate::config::{
    max_frequency_hz, min_frequency_hz, MAX_AMPLITUDE_VOLTS, MIN_AMPLITUDE_VOLTS,
};
use crate::hal::dac::Converter;
use crate::hal::dma::TransferEngine;
use crate::hal::timer::PaceTimer;
use crate::types::{Amplitude, Rejected, WaveformKind, WaveformRequest};
use crate::wavegen::pipeline::{PipelineConfig, WavePipeline};
use crate::wavegen::table::SampleTable;
use crate::wavegen::timing::resolve_timing;

/// Orchestrates waveform playback over one pipeline instance
///
/// Singly owns the sample table and the peripheral chain; the caller
/// (the operator input loop) invokes it synchronously and never
/// concurrently with itself. Once a request is applied, the hardware
/// plays autonomously until the next call.
pub struct WaveformGenerator<C, E, T> {
    pipeline: WavePipeline<C, E, T>,
    table: SampleTable,
    config: Option<PipelineConfig>,
}

impl<C, E, T> WaveformGenerator<C, E, T>
where
    C: Converter,
    E: TransferEngine,
    T: PaceTimer,
{
    /// Build a generator over an idle pipeline
    pub const fn new(pipeline: WavePipeline<C, E, T>) -> Self {
        Self {
            pipeline,
            table: SampleTable::new(),
            config: None,
        }
    }

    /// Resolve, synthesize and play one waveform request
    ///
    /// On success the chain runs the new waveform and the applied
    /// configuration is retained. On rejection the pace timer is
    /// stopped and the previous table and configuration are left
    /// untouched; either a fully new pipeline is running or the output
    /// is silent, never anything in between.
    pub fn generate(&mut self, request: WaveformRequest) -> Result<(), Rejected> {
        let plan = match resolve_timing(request.kind, request.frequency_hz, request.amplitude_volts)
        {
            Ok(plan) => plan,
            Err(_reason) => {
                #[cfg(feature = "embedded")]
                defmt::warn!("request {} rejected: {}", request, _reason);
                self.pipeline.silence();
                return Err(Rejected);
            }
        };

        // Amplitude validity is part of timing resolution; re-deriving
        // the code ceiling here cannot fail.
        let max_code = Amplitude::from_volts(request.amplitude_volts)
            .map(Amplitude::max_code)
            .unwrap_or_default();

        self.table.synthesize(request.kind, plan.sample_count, max_code);
        let config = self.pipeline.apply(&self.table, &plan);

        #[cfg(feature = "embedded")]
        defmt::info!("playing {}: {}", request, config);

        self.config = Some(config);
        Ok(())
    }

    /// Feasibility of a candidate request, with no side effects
    #[must_use]
    pub fn is_parameter_allowed(
        &self,
        kind: WaveformKind,
        frequency_hz: u32,
        amplitude_volts: f32,
    ) -> bool {
        crate::wavegen::timing::is_parameter_allowed(kind, frequency_hz, amplitude_volts)
    }

    /// The configuration currently applied to the chain, if any
    #[must_use]
    pub const fn current_config(&self) -> Option<PipelineConfig> {
        self.config
    }

    /// The synthesized codes currently wired into the transfer engine
    #[must_use]
    pub fn current_table(&self) -> &[u16] {
        self.table.codes()
    }

    /// Highest supported frequency in Hz
    #[must_use]
    pub const fn max_frequency(&self) -> u32 {
        max_frequency_hz()
    }

    /// Lowest supported frequency in Hz
    #[must_use]
    pub const fn min_frequency(&self) -> u32 {
        min_frequency_hz()
    }

    /// Highest supported amplitude in volts
    #[must_use]
    pub const fn max_amplitude(&self) -> f32 {
        MAX_AMPLITUDE_VOLTS
    }

    /// Lowest supported amplitude in volts
    #[must_use]
    pub const fn min_amplitude(&self) -> f32 {
        MIN_AMPLITUDE_VOLTS
    }
}
