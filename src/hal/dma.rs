//! Transfer engine (DMA) collaborator
//!
//! Contract for the DMA channel that streams sample codes from the
//! table into the converter's data register, and its STM32G474
//! implementation. In circular mode the hardware replays the table
//! indefinitely with no firmware involvement per sample.

/// Transfer engine collaborator contract
///
/// The engine reads `source` autonomously once enabled. Callers uphold
/// the stop-before-mutate discipline: the channel is disabled before
/// `source` or any register it was programmed with changes, and the
/// buffer outlives the transfer (the sample table has static storage in
/// the firmware).
pub trait TransferEngine {
    /// Reprogram the channel: stream `source` into `destination`,
    /// one code per trigger, restarting from the top when `circular`.
    /// Only called while the channel is disabled.
    fn configure(&mut self, source: &[u16], destination: *mut u16, circular: bool);

    /// Enable the channel
    fn enable(&mut self);

    /// Disable the channel
    fn disable(&mut self);
}

#[cfg(feature = "embedded")]
pub use self::stm32::WaveDma;

#[cfg(feature = "embedded")]
mod stm32 {
    use embassy_stm32::pac;

    use super::TransferEngine;
    use crate::config;

    /// DMAMUX request line for DAC1 channel 1 (RM0440 request table)
    const DMAMUX_REQ_DAC1_CH1: u8 = 6;

    /// Zero-based register index of the assigned DMA1 channel
    const CHANNEL: usize = (config::dma::DAC1_CH1 - 1) as usize;

    /// DMA1 channel streaming the sample table into DAC1
    pub struct WaveDma {
        _private: (),
    }

    impl WaveDma {
        /// Take ownership of the assigned DMA1 channel
        #[must_use]
        pub fn new() -> Self {
            pac::RCC.ahb1enr().modify(|w| {
                w.set_dma1en(true);
                w.set_dmamux1en(true);
            });
            pac::DMAMUX1
                .ccr(CHANNEL)
                .modify(|w| w.set_dmareq_id(DMAMUX_REQ_DAC1_CH1));
            Self { _private: () }
        }
    }

    impl Default for WaveDma {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TransferEngine for WaveDma {
        fn configure(&mut self, source: &[u16], destination: *mut u16, circular: bool) {
            let ch = pac::DMA1.ch(CHANNEL);
            ch.par().write_value(destination as u32);
            ch.mar().write_value(source.as_ptr() as u32);
            #[allow(clippy::cast_possible_truncation)]
            ch.ndtr().write(|w| w.set_ndt(source.len() as u16));
            ch.cr().write(|w| {
                w.set_dir(pac::bdma::vals::Dir::FROM_MEMORY);
                w.set_minc(true);
                w.set_pinc(false);
                w.set_msize(pac::bdma::vals::Size::BITS16);
                w.set_psize(pac::bdma::vals::Size::BITS16);
                w.set_circ(circular);
            });
        }

        fn enable(&mut self) {
            pac::DMA1.ch(CHANNEL).cr().modify(|w| w.set_en(true));
        }

        fn disable(&mut self) {
            pac::DMA1.ch(CHANNEL).cr().modify(|w| w.set_en(false));
        }
    }
}
