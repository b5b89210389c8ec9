//! Pipeline configuration
//!
//! Turns a resolved per-sample interval into a 16-bit prescaler/reload
//! pair and applies it to the timer → transfer engine → converter chain
//! in the one order that never exposes a torn state: stop everything,
//! reprogram downstream-first, re-enable consumer-to-producer.

use crate::config::{NANOS_PER_SEC, TIMER_CLOCK_HZ, TIMER_MAX_RELOAD};
use crate::hal::dac::{Converter, ConverterChannel, ConverterConfig, Resolution, TriggerSource};
use crate::hal::dma::TransferEngine;
use crate::hal::timer::{MasterMode, PaceTimer, TimerConfig, TimerMode};
use crate::wavegen::table::SampleTable;
use crate::wavegen::timing::TimingPlan;

/// Prescaler/reload pair pacing one sample interval
///
/// The hardware divides the timer clock by `prescaler + 1`, so the
/// realized interval is `reload · (prescaler + 1)` timer-clock ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerDivider {
    /// Prescaler register value (divisor − 1, divisor a power of two)
    pub prescaler: u16,
    /// Ticks per update event after prescaling
    pub reload: u16,
}

/// Derive the smallest power-of-two prescaling that fits the 16-bit
/// reload register
///
/// The divisor doubles from 1 until `ticks / divisor` fits in the
/// register, converging in `O(log ticks)` steps; each doubling
/// truncates the realized interval more coarsely, which is the accepted
/// price for a fast deterministic search. The reload is floored and
/// never below 1.
#[must_use]
pub fn derive_divider(sample_interval_ns: u32) -> TimerDivider {
    let ticks =
        u64::from(sample_interval_ns) * u64::from(TIMER_CLOCK_HZ) / u64::from(NANOS_PER_SEC);

    let mut divisor: u64 = 1;
    while ticks / divisor > u64::from(TIMER_MAX_RELOAD) {
        divisor *= 2;
    }

    #[allow(clippy::cast_possible_truncation)]
    TimerDivider {
        prescaler: (divisor - 1) as u16,
        reload: (ticks / divisor).max(1) as u16,
    }
}

/// Applied configuration of the whole playback chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Prescaler register value of the pace timer
    pub timer_prescaler: u16,
    /// Reload register value of the pace timer
    pub timer_reload: u16,
    /// Codes per circular transfer
    pub transfer_count: u32,
    /// Converter channel the chain feeds
    pub converter_channel: ConverterChannel,
}

#[cfg(feature = "embedded")]
impl defmt::Format for PipelineConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "psc={} arr={} count={} ch={}",
            self.timer_prescaler,
            self.timer_reload,
            self.transfer_count,
            self.converter_channel
        );
    }
}

/// The timer → transfer engine → converter chain
///
/// Owns the three collaborators; all reconfiguration goes through
/// [`apply`](Self::apply) so the stop-before-mutate ordering cannot be
/// bypassed.
pub struct WavePipeline<C, E, T> {
    converter: C,
    engine: E,
    timer: T,
}

impl<C, E, T> WavePipeline<C, E, T>
where
    C: Converter,
    E: TransferEngine,
    T: PaceTimer,
{
    /// Assemble the chain from its three collaborators
    pub const fn new(converter: C, engine: E, timer: T) -> Self {
        Self {
            converter,
            engine,
            timer,
        }
    }

    /// Reprogram and restart the chain for a new waveform
    ///
    /// Infallible: earlier stages guarantee the table length fits the
    /// transfer counter and the interval fits the divider search.
    pub fn apply(&mut self, table: &SampleTable, plan: &TimingPlan) -> PipelineConfig {
        // Stop all autonomous activity before touching shared state
        self.timer.disable();
        self.engine.disable();
        self.converter.disable();

        self.converter.configure(ConverterConfig {
            resolution: Resolution::Bits12,
            trigger: TriggerSource::Timer,
            transfer_request: true,
        });

        self.engine
            .configure(table.codes(), self.converter.data_register(), true);

        let divider = derive_divider(plan.sample_interval_ns);
        self.timer.configure(TimerConfig {
            reload: divider.reload,
            prescaler: divider.prescaler,
            mode: TimerMode::Continuous,
            master_mode: MasterMode::Update,
            update_interrupt: false,
        });

        // Each downstream stage must be ready before the stage that
        // triggers it comes up
        self.converter.enable();
        self.engine.enable();
        self.timer.enable();

        PipelineConfig {
            timer_prescaler: divider.prescaler,
            timer_reload: divider.reload,
            transfer_count: table.len() as u32,
            converter_channel: self.converter.channel(),
        }
    }

    /// Silence the output by stopping the pace timer
    ///
    /// The transfer engine and converter keep their registers; with no
    /// update events the chain is inert.
    pub fn silence(&mut self) {
        self.timer.disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_interval_needs_no_prescaling() {
        // 1000ns at 170MHz is 170 ticks
        let divider = derive_divider(1_000);
        assert_eq!(divider.prescaler, 0);
        assert_eq!(divider.reload, 170);
    }

    #[test]
    fn long_interval_doubles_until_reload_fits() {
        // 5ms (square wave at the lowest frequencies) is 850_000 ticks
        let divider = derive_divider(5_000_000);
        assert_eq!(divider.prescaler, 15);
        assert_eq!(divider.reload, 53_125);
    }

    #[test]
    fn divider_picks_smallest_fitting_divisor() {
        let divider = derive_divider(1_000_000);
        let divisor = u32::from(divider.prescaler) + 1;
        assert!(divisor.is_power_of_two());
        assert!(u32::from(divider.reload) <= TIMER_MAX_RELOAD);
        if divisor > 1 {
            let ticks = 1_000_000u64 * u64::from(TIMER_CLOCK_HZ) / u64::from(NANOS_PER_SEC);
            assert!(ticks / (u64::from(divisor) / 2) > u64::from(TIMER_MAX_RELOAD));
        }
    }

    #[test]
    fn sub_tick_interval_still_counts_one() {
        let divider = derive_divider(0);
        assert_eq!(divider.reload, 1);
        assert_eq!(divider.prescaler, 0);
    }
}
