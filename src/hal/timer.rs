//! Pace timer collaborator
//!
//! Contract for the hardware timer whose update events pace the
//! playback chain, and its STM32G474 implementation (TIM6, the basic
//! timer wired to the DAC trigger mux). The update event propagates to
//! the transfer engine through the trigger output; no interrupt fires
//! on the steady-state playback path.

/// Counting mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimerMode {
    /// Stop after one update event
    OnePulse,
    /// Free-run, reloading on every update event
    #[default]
    Continuous,
}

/// What the timer drives on its trigger output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MasterMode {
    /// Trigger output follows the counter reset
    #[default]
    Reset,
    /// Trigger output follows the counter enable
    Enable,
    /// Trigger output pulses on each update event
    Update,
}

/// Hook invoked from the update-event interrupt
pub type UpdateCallback = fn();

/// Configuration applied to the pace timer in one shot
///
/// The counter period is `(reload) · (prescaler + 1)` input-clock
/// ticks; both registers are 16 bits wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerConfig {
    /// Auto-reload value (ticks per update event before prescaling)
    pub reload: u16,
    /// Prescaler register value; the counter clock is divided by
    /// `prescaler + 1`
    pub prescaler: u16,
    /// Counting mode
    pub mode: TimerMode,
    /// Trigger-output routing
    pub master_mode: MasterMode,
    /// Raise an interrupt on update events
    pub update_interrupt: bool,
}

/// Pace timer collaborator contract
pub trait PaceTimer {
    /// Reprogram the timer. Only called while the timer is disabled.
    fn configure(&mut self, config: TimerConfig);

    /// Start the counter
    fn enable(&mut self);

    /// Stop the counter
    fn disable(&mut self);

    /// Register (or clear) the update-event hook
    ///
    /// Capability injection for callers that enable the update
    /// interrupt; the waveform pipeline itself never uses it.
    fn on_update_event(&mut self, callback: Option<UpdateCallback>);
}

#[cfg(feature = "embedded")]
pub use self::stm32::PaceTim6;

#[cfg(feature = "embedded")]
mod stm32 {
    use core::cell::Cell;

    use critical_section::Mutex;
    use embassy_stm32::pac;

    use super::{MasterMode, PaceTimer, TimerConfig, TimerMode, UpdateCallback};

    /// CR2.MMS encodings (RM0440, basic timer master mode selection)
    const MMS_RESET: u8 = 0b000;
    const MMS_ENABLE: u8 = 0b001;
    const MMS_UPDATE: u8 = 0b010;

    static UPDATE_HOOK: Mutex<Cell<Option<UpdateCallback>>> = Mutex::new(Cell::new(None));

    /// TIM6 as the sample pace timer
    pub struct PaceTim6 {
        _private: (),
    }

    impl PaceTim6 {
        /// Take ownership of TIM6
        #[must_use]
        pub fn new() -> Self {
            pac::RCC.apb1enr1().modify(|w| w.set_tim6en(true));
            Self { _private: () }
        }

        /// Forward the TIM6 update interrupt to the registered hook
        ///
        /// The application's `TIM6_DAC` interrupt handler calls this;
        /// it acknowledges the update flag before dispatching.
        pub fn handle_update_irq() {
            pac::TIM6.sr().modify(|w| w.set_uif(false));
            if let Some(hook) = critical_section::with(|cs| UPDATE_HOOK.borrow(cs).get()) {
                hook();
            }
        }
    }

    impl Default for PaceTim6 {
        fn default() -> Self {
            Self::new()
        }
    }

    impl PaceTimer for PaceTim6 {
        fn configure(&mut self, config: TimerConfig) {
            let tim = pac::TIM6;
            tim.psc().write_value(u32::from(config.prescaler));
            tim.arr().write(|w| w.set_arr(config.reload));
            tim.cr1().modify(|w| {
                w.set_opm(matches!(config.mode, TimerMode::OnePulse));
            });
            tim.cr2().modify(|w| {
                w.set_mms(match config.master_mode {
                    MasterMode::Reset => MMS_RESET,
                    MasterMode::Enable => MMS_ENABLE,
                    MasterMode::Update => MMS_UPDATE,
                });
            });
            tim.dier().modify(|w| w.set_uie(config.update_interrupt));
            // Latch ARR/PSC into the shadow registers before the first tick
            tim.egr().write(|w| w.set_ug(true));
        }

        fn enable(&mut self) {
            pac::TIM6.cr1().modify(|w| w.set_cen(true));
        }

        fn disable(&mut self) {
            pac::TIM6.cr1().modify(|w| w.set_cen(false));
        }

        fn on_update_event(&mut self, callback: Option<UpdateCallback>) {
            critical_section::with(|cs| UPDATE_HOOK.borrow(cs).set(callback));
        }
    }
}
