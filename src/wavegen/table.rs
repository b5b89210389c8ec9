//! Sample table synthesis
//!
//! The fixed-capacity buffer the transfer engine streams from, and the
//! routines that draw one waveform period into it as quantized
//! converter codes. There is exactly one table instance at runtime; it
//! is rewritten in place on every accepted request, only ever while the
//! playback chain is stopped.

use core::f32::consts::PI;
#[cfg(feature = "embedded")]
use micromath::F32Ext;

use crate::config::SAMPLE_BUFFER_CAPACITY;
use crate::types::WaveformKind;

/// One period of quantized amplitude codes
///
/// Logical length is the sample count of the current plan; slots past
/// it keep whatever the previous waveform left there and are never
/// transferred.
pub struct SampleTable {
    codes: heapless::Vec<u16, SAMPLE_BUFFER_CAPACITY>,
}

impl SampleTable {
    /// Create an empty table
    #[must_use]
    pub const fn new() -> Self {
        Self {
            codes: heapless::Vec::new(),
        }
    }

    /// The synthesized codes, in playback order
    #[must_use]
    pub fn codes(&self) -> &[u16] {
        &self.codes
    }

    /// Number of codes currently synthesized
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table holds no codes yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Redraw the table as one period of `kind`
    ///
    /// Codes span `[0, max_code]`. Quantization contract: the sine
    /// table rounds to the nearest code (half away from zero) and
    /// clamps its positive peak to `max_code`; ramp and triangle use
    /// integer floor division throughout.
    pub fn synthesize(&mut self, kind: WaveformKind, sample_count: u32, max_code: u16) {
        let n = sample_count.min(SAMPLE_BUFFER_CAPACITY as u32);
        let mc = u32::from(max_code);

        self.codes.clear();
        match kind {
            WaveformKind::Sine => {
                for i in 0..n {
                    let phase = 2.0 * PI * (i as f32) / (n as f32);
                    let scaled = (phase.sin() + 1.0) * ((mc + 1) as f32) / 2.0;
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let code = (scaled.round() as u32).min(mc);
                    let _ = self.codes.push(code as u16);
                }
            }
            WaveformKind::Sawtooth => {
                for i in 0..n {
                    let _ = self.codes.push((mc * i / n) as u16);
                }
            }
            WaveformKind::Triangle => {
                let half = n / 2;
                for i in 0..n {
                    let code = if i < half {
                        2 * mc * i / n
                    } else {
                        mc - 2 * mc * (i - half) / n
                    };
                    let _ = self.codes.push(code as u16);
                }
            }
            WaveformKind::Square => {
                let _ = self.codes.push(0);
                let _ = self.codes.push(max_code);
            }
        }
    }
}

impl Default for SampleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_starts_at_midpoint() {
        let mut table = SampleTable::new();
        table.synthesize(WaveformKind::Sine, 100, 4095);
        assert_eq!(table.codes()[0], 2048);
    }

    #[test]
    fn sawtooth_is_monotonic() {
        let mut table = SampleTable::new();
        table.synthesize(WaveformKind::Sawtooth, 200, 4095);
        let codes = table.codes();
        assert_eq!(codes[0], 0);
        assert!(codes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn square_is_two_rails() {
        let mut table = SampleTable::new();
        table.synthesize(WaveformKind::Square, 2, 1240);
        assert_eq!(table.codes(), &[0, 1240]);
    }

    #[test]
    fn resynthesis_replaces_previous_length() {
        let mut table = SampleTable::new();
        table.synthesize(WaveformKind::Sine, 500, 4095);
        table.synthesize(WaveformKind::Square, 2, 4095);
        assert_eq!(table.len(), 2);
    }
}
