//! Converter (DAC) collaborator
//!
//! Contract for the digital-to-analog converter at the end of the
//! playback chain, and its STM32G474 implementation. The pipeline only
//! ever talks to the trait; the converter is reprogrammed exclusively
//! while the whole chain is stopped.

/// DAC channel identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConverterChannel {
    /// Channel 1 (output on PA4)
    #[default]
    One,
    /// Channel 2 (output on PA5)
    Two,
}

#[cfg(feature = "embedded")]
impl defmt::Format for ConverterChannel {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::One => defmt::write!(f, "DAC-CH1"),
            Self::Two => defmt::write!(f, "DAC-CH2"),
        }
    }
}

/// Conversion resolution of the data register in use
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Resolution {
    /// 8-bit right-aligned
    Bits8,
    /// 12-bit right-aligned
    #[default]
    Bits12,
}

impl Resolution {
    /// Largest code representable at this resolution
    #[must_use]
    pub const fn max_code(self) -> u16 {
        match self {
            Self::Bits8 => 0xFF,
            Self::Bits12 => 0xFFF,
        }
    }
}

/// What starts a conversion of the held data value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TriggerSource {
    /// Conversions start as soon as data is written
    #[default]
    None,
    /// Conversions start on a software trigger bit
    Software,
    /// Conversions start on the pace timer's update event
    Timer,
}

/// Configuration applied to a converter channel in one shot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Data register width
    pub resolution: Resolution,
    /// Conversion trigger
    pub trigger: TriggerSource,
    /// Raise a transfer request towards the DMA on each trigger
    pub transfer_request: bool,
}

/// Converter collaborator contract
///
/// Register writes cannot fail, so the methods are infallible; a
/// channel is bound at construction time.
pub trait Converter {
    /// Reprogram the channel. Only called while the channel is disabled.
    fn configure(&mut self, config: ConverterConfig);

    /// Enable the channel
    fn enable(&mut self);

    /// Disable the channel
    fn disable(&mut self);

    /// Which channel this collaborator drives
    fn channel(&self) -> ConverterChannel;

    /// Address of the input data register, for wiring as a transfer
    /// destination
    fn data_register(&self) -> *mut u16;
}

#[cfg(feature = "embedded")]
pub use self::stm32::WaveDac;

#[cfg(feature = "embedded")]
mod stm32 {
    use embassy_stm32::pac;

    use super::{Converter, ConverterChannel, ConverterConfig, Resolution, TriggerSource};

    /// TSEL value routing the TIM6 TRGO to DAC1 (RM0440 trigger table)
    const TSEL_TIM6_TRGO: u8 = 7;

    /// TSEL value for the software trigger
    const TSEL_SOFTWARE: u8 = 0;

    /// DAC1 channel 1 on PA4
    pub struct WaveDac {
        resolution: Resolution,
    }

    impl WaveDac {
        /// Take ownership of DAC1 channel 1
        ///
        /// Enables the peripheral clock; PA4 stays in its reset analog
        /// state so no pin configuration is needed.
        #[must_use]
        pub fn new() -> Self {
            pac::RCC.ahb2enr().modify(|w| w.set_dac1en(true));
            Self {
                resolution: Resolution::Bits12,
            }
        }
    }

    impl Default for WaveDac {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Converter for WaveDac {
        fn configure(&mut self, config: ConverterConfig) {
            self.resolution = config.resolution;
            pac::DAC1.cr().modify(|w| {
                match config.trigger {
                    TriggerSource::None => w.set_ten1(false),
                    TriggerSource::Software => {
                        w.set_tsel1(TSEL_SOFTWARE);
                        w.set_ten1(true);
                    }
                    TriggerSource::Timer => {
                        w.set_tsel1(TSEL_TIM6_TRGO);
                        w.set_ten1(true);
                    }
                }
                w.set_dmaen1(config.transfer_request);
            });
        }

        fn enable(&mut self) {
            pac::DAC1.cr().modify(|w| w.set_en1(true));
        }

        fn disable(&mut self) {
            pac::DAC1.cr().modify(|w| w.set_en1(false));
        }

        fn channel(&self) -> ConverterChannel {
            ConverterChannel::One
        }

        fn data_register(&self) -> *mut u16 {
            let reg = match self.resolution {
                Resolution::Bits8 => pac::DAC1.dhr8r1().as_ptr(),
                Resolution::Bits12 => pac::DAC1.dhr12r1().as_ptr(),
            };
            reg.cast::<u16>()
        }
    }
}
