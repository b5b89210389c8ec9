//! Feasibility checking and timing resolution
//!
//! One procedure answers both questions the pipeline asks about a
//! request: *may* it play (feasibility), and *how* (sample count and
//! per-sample interval). The predicate is the resolver's `is_ok()`, so
//! the two can never drift apart.
//!
//! Two sampling regimes trade fidelity against the fixed table
//! capacity: the fine regime samples every [`BASE_SAMPLE_INTERVAL_NS`],
//! which low frequencies would blow past the table with, so those fall
//! back to the coarse [`DRAG_SAMPLE_INTERVAL_NS`] grid. Only a
//! frequency that fits neither regime is rejected.

use crate::config::{
    BASE_SAMPLE_INTERVAL_NS, DRAG_SAMPLE_INTERVAL_NS, MIN_SAMPLES_PER_CYCLE, NANOS_PER_SEC,
    SAMPLE_BUFFER_CAPACITY,
};
use crate::types::{Amplitude, GenerationError, WaveformKind};

/// Resolved playback timing for one accepted request
///
/// Recomputed wholesale per request, never partially updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingPlan {
    /// Number of samples forming one waveform period
    pub sample_count: u32,
    /// Interval between consecutive samples, in nanoseconds
    pub sample_interval_ns: u32,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TimingPlan {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} samples @ {}ns", self.sample_count, self.sample_interval_ns);
    }
}

/// Decide whether a request is playable and how to pace it
///
/// Amplitude rails are inclusive; a frequency is accepted exactly when
/// its fine-regime sample count reaches [`MIN_SAMPLES_PER_CYCLE`] and
/// one of the two regimes fits the table. Square waves pass the same
/// checks but always resolve to their two transition levels.
pub fn resolve_timing(
    kind: WaveformKind,
    frequency_hz: u32,
    amplitude_volts: f32,
) -> Result<TimingPlan, GenerationError> {
    let _ = Amplitude::from_volts(amplitude_volts)?;

    if frequency_hz == 0 {
        return Err(GenerationError::InfeasibleFrequency);
    }
    let period_ns = NANOS_PER_SEC / frequency_hz;

    let capacity = SAMPLE_BUFFER_CAPACITY as u32;
    let fine_count = period_ns / BASE_SAMPLE_INTERVAL_NS;
    if fine_count < MIN_SAMPLES_PER_CYCLE {
        return Err(GenerationError::InfeasibleFrequency);
    }

    let (sample_count, sample_interval_ns) = if fine_count <= capacity {
        (fine_count, period_ns / fine_count)
    } else {
        let drag_count = period_ns / DRAG_SAMPLE_INTERVAL_NS;
        if drag_count > capacity {
            return Err(GenerationError::InfeasibleFrequency);
        }
        // Capacity-limited: fill the whole table and stretch the
        // interval so one pass still spans one period.
        (capacity, period_ns / capacity)
    };

    let plan = match kind {
        WaveformKind::Square => TimingPlan {
            // A square wave needs only its two rails, one sample each.
            sample_count: 2,
            sample_interval_ns: period_ns / 2,
        },
        WaveformKind::Sine | WaveformKind::Sawtooth | WaveformKind::Triangle => TimingPlan {
            sample_count,
            sample_interval_ns,
        },
    };

    Ok(plan)
}

/// Pure feasibility predicate over a candidate request
///
/// Exactly [`resolve_timing`] without the plan: same checks, same
/// boundary policy, no side effects.
#[must_use]
pub fn is_parameter_allowed(kind: WaveformKind, frequency_hz: u32, amplitude_volts: f32) -> bool {
    resolve_timing(kind, frequency_hz, amplitude_volts).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{max_frequency_hz, min_frequency_hz};

    #[test]
    fn fine_regime_at_1khz() {
        let plan = resolve_timing(WaveformKind::Sine, 1_000, 3.3).unwrap();
        assert_eq!(plan.sample_count, 1_000);
        assert_eq!(plan.sample_interval_ns, 1_000);
    }

    #[test]
    fn coarse_regime_at_100hz() {
        let plan = resolve_timing(WaveformKind::Sine, 100, 3.3).unwrap();
        assert_eq!(plan.sample_count, SAMPLE_BUFFER_CAPACITY as u32);
        assert_eq!(plan.sample_interval_ns, 10_000);
    }

    #[test]
    fn below_coarse_regime_rejected() {
        assert_eq!(
            resolve_timing(WaveformKind::Sine, 99, 3.3),
            Err(GenerationError::InfeasibleFrequency)
        );
    }

    #[test]
    fn derived_bounds_match_regime_checks() {
        assert!(is_parameter_allowed(WaveformKind::Sine, min_frequency_hz(), 2.0));
        assert!(is_parameter_allowed(WaveformKind::Sine, max_frequency_hz(), 2.0));
        assert!(!is_parameter_allowed(WaveformKind::Sine, min_frequency_hz() - 1, 2.0));
        assert!(!is_parameter_allowed(WaveformKind::Sine, max_frequency_hz() + 1, 2.0));
    }

    #[test]
    fn square_resolves_to_two_samples() {
        let plan = resolve_timing(WaveformKind::Square, 25_000, 2.5).unwrap();
        assert_eq!(plan.sample_count, 2);
        assert_eq!(plan.sample_interval_ns, 20_000);
    }

    #[test]
    fn zero_frequency_is_infeasible() {
        assert_eq!(
            resolve_timing(WaveformKind::Sine, 0, 2.0),
            Err(GenerationError::InfeasibleFrequency)
        );
    }
}
