//! Recording stand-ins for the bus, the control lines and the delay
//!
//! All parts share one [`Bus`] log, so a test can look at the exact order in
//! which commands, data bytes, reset edges, delays and busy reads happened.

extern crate std;

use core::cell::RefCell;
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::{
    delay::DelayNs,
    digital::{self, InputPin, OutputPin},
    spi::{self, Operation, SpiDevice},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    /// Byte sent with the data/command line low
    Command(u8),
    /// Byte sent with the data/command line high
    Data(u8),
    /// Level driven on the reset line
    Reset(bool),
    DelayMs(u32),
    /// A read of the busy line, `true` if it read busy
    BusyRead(bool),
}

#[derive(Default)]
pub(crate) struct Bus {
    pub events: Vec<Event>,
    dc_high: bool,
    /// Upcoming busy line readings, `true` = busy; idle once drained
    pub busy: VecDeque<bool>,
    /// Busy forever, ignoring `busy`
    pub stuck: bool,
    /// Make every reset line write fail
    pub rst_fault: bool,
}

impl Bus {
    /// Only the bytes that went over the wire
    pub fn wire(&self) -> Vec<Event> {
        self.events
            .iter()
            .copied()
            .filter(|e| matches!(e, Event::Command(_) | Event::Data(_)))
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::DelayMs(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

pub(crate) type Shared = Rc<RefCell<Bus>>;

pub(crate) struct FakeSpi(pub Shared);
pub(crate) struct FakeBusy(pub Shared);
pub(crate) struct FakeDc(pub Shared);
pub(crate) struct FakeRst(pub Shared);
pub(crate) struct FakeDelay(pub Shared);

/// A fresh log and every part wired to it
pub(crate) fn transport() -> (Shared, FakeSpi, FakeBusy, FakeDc, FakeRst, FakeDelay) {
    let bus = Shared::default();
    (
        bus.clone(),
        FakeSpi(bus.clone()),
        FakeBusy(bus.clone()),
        FakeDc(bus.clone()),
        FakeRst(bus.clone()),
        FakeDelay(bus),
    )
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl spi::ErrorType for FakeSpi {
    type Error = Infallible;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                for &byte in bytes.iter() {
                    let event = if bus.dc_high {
                        Event::Data(byte)
                    } else {
                        Event::Command(byte)
                    };
                    bus.events.push(event);
                }
            }
        }
        Ok(())
    }
}

impl digital::ErrorType for FakeDc {
    type Error = Infallible;
}

impl OutputPin for FakeDc {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().dc_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().dc_high = true;
        Ok(())
    }
}

impl FakeRst {
    fn drive(&mut self, level: bool) -> Result<(), PinFault> {
        let mut bus = self.0.borrow_mut();
        if bus.rst_fault {
            return Err(PinFault);
        }
        bus.events.push(Event::Reset(level));
        Ok(())
    }
}

impl digital::ErrorType for FakeRst {
    type Error = PinFault;
}

impl OutputPin for FakeRst {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

impl FakeBusy {
    fn read_busy(&mut self) -> bool {
        let mut bus = self.0.borrow_mut();
        let busy = bus.stuck || bus.busy.pop_front().unwrap_or(false);
        bus.events.push(Event::BusyRead(busy));
        busy
    }
}

impl digital::ErrorType for FakeBusy {
    type Error = Infallible;
}

impl InputPin for FakeBusy {
    // busy is LOW
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.read_busy())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read_busy())
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().events.push(Event::DelayMs(ms));
    }
}
