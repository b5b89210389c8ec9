//! Hardware Abstraction Layer
//!
//! Contracts for the three peripherals the waveform pipeline drives:
//! the converter (DAC), the transfer engine (DMA) and the pace timer.
//! The traits and their configuration types are target-independent so
//! the pipeline can be exercised on the host; the register-backed
//! STM32G474 implementations live behind the `embedded` feature.

pub mod dac;
pub mod dma;
pub mod timer;
