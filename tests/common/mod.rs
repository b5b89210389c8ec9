//! Shared test harness: recording fakes for the three peripheral
//! collaborators, so ordering and register contents can be asserted
//! without hardware.

// Each test binary uses a different slice of the harness.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use funcgen_firmware::hal::dac::{Converter, ConverterChannel, ConverterConfig};
use funcgen_firmware::hal::dma::TransferEngine;
use funcgen_firmware::hal::timer::{PaceTimer, TimerConfig, UpdateCallback};

/// One observed call against the playback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOp {
    TimerDisable,
    EngineDisable,
    ConverterDisable,
    ConverterConfigure,
    EngineConfigure,
    TimerConfigure,
    ConverterEnable,
    EngineEnable,
    TimerEnable,
}

/// Everything the fakes observed, shared by the three of them
#[derive(Debug, Default)]
pub struct ChainLog {
    pub ops: Vec<ChainOp>,
    pub converter_config: Option<ConverterConfig>,
    pub engine_source: Vec<u16>,
    pub engine_destination: Option<usize>,
    pub engine_circular: Option<bool>,
    pub timer_config: Option<TimerConfig>,
}

pub type SharedLog = Rc<RefCell<ChainLog>>;

pub struct FakeConverter {
    log: SharedLog,
    register: Box<u16>,
}

impl Converter for FakeConverter {
    fn configure(&mut self, config: ConverterConfig) {
        let mut log = self.log.borrow_mut();
        log.ops.push(ChainOp::ConverterConfigure);
        log.converter_config = Some(config);
    }

    fn enable(&mut self) {
        self.log.borrow_mut().ops.push(ChainOp::ConverterEnable);
    }

    fn disable(&mut self) {
        self.log.borrow_mut().ops.push(ChainOp::ConverterDisable);
    }

    fn channel(&self) -> ConverterChannel {
        ConverterChannel::One
    }

    fn data_register(&self) -> *mut u16 {
        std::ptr::addr_of!(*self.register).cast_mut()
    }
}

pub struct FakeEngine {
    log: SharedLog,
}

impl TransferEngine for FakeEngine {
    fn configure(&mut self, source: &[u16], destination: *mut u16, circular: bool) {
        let mut log = self.log.borrow_mut();
        log.ops.push(ChainOp::EngineConfigure);
        log.engine_source = source.to_vec();
        log.engine_destination = Some(destination as usize);
        log.engine_circular = Some(circular);
    }

    fn enable(&mut self) {
        self.log.borrow_mut().ops.push(ChainOp::EngineEnable);
    }

    fn disable(&mut self) {
        self.log.borrow_mut().ops.push(ChainOp::EngineDisable);
    }
}

pub struct FakeTimer {
    log: SharedLog,
}

impl PaceTimer for FakeTimer {
    fn configure(&mut self, config: TimerConfig) {
        let mut log = self.log.borrow_mut();
        log.ops.push(ChainOp::TimerConfigure);
        log.timer_config = Some(config);
    }

    fn enable(&mut self) {
        self.log.borrow_mut().ops.push(ChainOp::TimerEnable);
    }

    fn disable(&mut self) {
        self.log.borrow_mut().ops.push(ChainOp::TimerDisable);
    }

    fn on_update_event(&mut self, _callback: Option<UpdateCallback>) {}
}

/// Build the three fakes around one shared log
pub fn recording_chain() -> (SharedLog, FakeConverter, FakeEngine, FakeTimer) {
    let log: SharedLog = Rc::new(RefCell::new(ChainLog::default()));
    (
        Rc::clone(&log),
        FakeConverter {
            log: Rc::clone(&log),
            register: Box::new(0),
        },
        FakeEngine {
            log: Rc::clone(&log),
        },
        FakeTimer { log },
    )
}
