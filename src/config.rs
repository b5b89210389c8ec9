//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the function generator
//! hardware. All pin mappings, clock frequencies, sampling limits and
//! converter parameters are centralized here; the operating frequency and
//! amplitude bounds exposed to the operator are derived from them at
//! compile time, never configured at runtime.

/// System clock frequency (STM32G474 @ 170MHz)
pub const SYSTEM_CLOCK_HZ: u32 = 170_000_000;

/// Input clock of the pace timer (runs off the system clock, undivided)
pub const TIMER_CLOCK_HZ: u32 = SYSTEM_CLOCK_HZ;

/// Largest value the 16-bit timer reload register can hold
pub const TIMER_MAX_RELOAD: u32 = 65_535;

/// Minimum output amplitude in volts
pub const MIN_AMPLITUDE_VOLTS: f32 = 1.0;

/// Maximum output amplitude in volts (analog supply rail)
pub const MAX_AMPLITUDE_VOLTS: f32 = 3.3;

/// DAC reference voltage; full-scale code corresponds to this output
pub const DAC_REFERENCE_VOLTS: f32 = 3.3;

/// Largest code the 12-bit converter accepts
pub const DAC_MAX_CODE: u16 = 4095;

/// Fewest samples that still represent one waveform cycle
pub const MIN_SAMPLES_PER_CYCLE: u32 = 10;

/// Per-sample output interval of the fine sampling regime, in nanoseconds
pub const BASE_SAMPLE_INTERVAL_NS: u32 = 1_000;

/// Per-sample output interval of the coarse (drag) regime, in nanoseconds
pub const DRAG_SAMPLE_INTERVAL_NS: u32 = 10_000;

/// Capacity of the sample table, in samples
pub const SAMPLE_BUFFER_CAPACITY: usize = 1_000;

/// Nanoseconds in one second, as used by all period arithmetic
pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Highest frequency any waveform may request, in Hz
///
/// Above this the fine regime cannot place [`MIN_SAMPLES_PER_CYCLE`]
/// points in one period.
#[must_use]
pub const fn max_frequency_hz() -> u32 {
    NANOS_PER_SEC / (BASE_SAMPLE_INTERVAL_NS * MIN_SAMPLES_PER_CYCLE)
}

/// Lowest frequency any waveform may request, in Hz
///
/// Below this even the coarse regime overflows the sample table.
#[must_use]
pub const fn min_frequency_hz() -> u32 {
    NANOS_PER_SEC / (DRAG_SAMPLE_INTERVAL_NS * SAMPLE_BUFFER_CAPACITY as u32)
}

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// Analog waveform output (DAC1 channel 1)
    pub const WAVE_OUT: &str = "PA4";
}

/// DMA channel assignments
pub mod dma {
    //! DMA channel assignments for the playback stream

    /// DAC1 channel 1 transfer request (sample table -> data register)
    pub const DAC1_CH1: u8 = 3;
}

/// Timer assignments
pub mod timers {
    //! Hardware timer assignments

    /// Sample pace timer (update event drives the DAC trigger)
    pub const WAVE_PACE: u8 = 6;
}
