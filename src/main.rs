//! Function Generator Main Application
//!
//! Entry point for the STM32G474-based function generator firmware.
//! Initializes the playback chain and spawns async tasks; operator
//! requests reach the generator through a most-recent-wins mailbox.

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use funcgen_firmware::hal::dac::WaveDac;
use funcgen_firmware::hal::dma::WaveDma;
use funcgen_firmware::hal::timer::PaceTim6;
use funcgen_firmware::prelude::*;
use funcgen_firmware::wavegen::pipeline::WavePipeline;

/// Concrete generator over the STM32G474 playback chain
type Generator = WaveformGenerator<WaveDac, WaveDma, PaceTim6>;

/// Single-slot operator mailbox: posting overwrites any pending
/// request, so the generator always works on the latest one.
static REQUESTS: Signal<CriticalSectionRawMutex, WaveformRequest> = Signal::new();

static GENERATOR: StaticCell<Generator> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Function generator firmware v{}", env!("CARGO_PKG_VERSION"));

    // Initialize STM32G474 peripherals with default clock configuration
    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // Status LED (PA5 on Nucleo boards)
    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    // Assemble the playback chain; the generator owns it and the
    // sample table for the rest of the program.
    let pipeline = WavePipeline::new(WaveDac::new(), WaveDma::new(), PaceTim6::new());
    let generator = GENERATOR.init(WaveformGenerator::new(pipeline));

    info!(
        "Supported range: {}..={} Hz, {}..={} mV",
        generator.min_frequency(),
        generator.max_frequency(),
        (generator.min_amplitude() * 1000.0) as u32,
        (generator.max_amplitude() * 1000.0) as u32,
    );

    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(playback_task(generator)).unwrap();

    // Seed a default waveform until the operator asks for another
    REQUESTS.signal(WaveformRequest::new(WaveformKind::Sine, 1_000, 3.3));

    info!("Tasks spawned, entering main loop");

    loop {
        Timer::after(Duration::from_secs(10)).await;
        info!("Main loop tick");
    }
}

/// Applies operator requests to the playback chain, latest first
#[embassy_executor::task]
async fn playback_task(generator: &'static mut Generator) {
    loop {
        let request = REQUESTS.wait().await;
        match generator.generate(request) {
            Ok(()) => info!("request applied"),
            Err(rejected) => info!("request {}: output silenced", rejected),
        }
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
