use crate::{error::Error, traits::Command};
use core::marker::PhantomData;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};
use log::trace;

/// The Connection Interface of the cascaded panel
///
/// Owns the control lines; the SPI device and the delay are borrowed per call.
/// Every byte leaves as its own bus transfer, right after the data/command
/// line has been driven for it.
pub(crate) struct DisplayInterface<SPI, BUSY, DC, RST, DELAY> {
    /// SPI
    _spi: PhantomData<SPI>,
    /// DELAY
    _delay: PhantomData<DELAY>,
    /// Low for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
}

impl<SPI, BUSY, DC, RST, DELAY> DisplayInterface<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new `DisplayInterface` struct
    pub fn new(busy: BUSY, dc: DC, rst: RST) -> Self {
        DisplayInterface {
            _spi: PhantomData,
            _delay: PhantomData,
            busy,
            dc,
            rst,
        }
    }

    /// Hands the pins back
    pub fn release(self) -> (BUSY, DC, RST) {
        (self.busy, self.dc, self.rst)
    }

    /// Drives the control lines to their idle levels (command mode, reset released).
    pub(crate) fn setup(&mut self) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.dc.set_low().map_err(Error::DcError)?;
        self.rst.set_high().map_err(Error::RstError)
    }

    /// Basic function for sending [Commands](Command).
    ///
    /// Enables direct interaction with the device with the help of [data()](DisplayInterface::data())
    pub(crate) fn cmd<T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        trace!("cmd {:#04x}", command.address());
        // low for commands
        self.dc.set_low().map_err(Error::DcError)?;

        // Transfer the command over spi
        self.write(spi, command.address())
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(
        &mut self,
        spi: &mut SPI,
        data: &[u8],
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.data_iter(spi, data.iter().copied())
    }

    /// Sends every byte the iterator yields as data, in order
    pub(crate) fn data_iter<I>(
        &mut self,
        spi: &mut SPI,
        data: I,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>>
    where
        I: IntoIterator<Item = u8>,
    {
        for val in data {
            // high for data
            self.dc.set_high().map_err(Error::DcError)?;
            self.write(spi, val)?;
        }
        Ok(())
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    pub(crate) fn cmd_with_data<T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
        data: &[u8],
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.cmd(spi, command)?;
        self.data(spi, data)
    }

    /// Basic function for sending the same byte of data (one u8) multiple times over spi
    pub(crate) fn data_x_times(
        &mut self,
        spi: &mut SPI,
        val: u8,
        repetitions: usize,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.data_iter(spi, core::iter::repeat(val).take(repetitions))
    }

    // spi write helper/abstraction function
    fn write(&mut self, spi: &mut SPI, byte: u8) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        spi.write(&[byte]).map_err(Error::SpiError)
    }

    /// Checks if device is still busy (busy == LOW)
    pub(crate) fn is_busy(&mut self) -> Result<bool, Error<SPI, BUSY, DC, RST>> {
        self.busy.is_low().map_err(Error::BusyError)
    }

    /// Polls the busy line until it reads idle (HIGH), sleeping `poll_ms` between polls.
    ///
    /// Without a `timeout_ms` this never gives up. With one, the sleeps never add up to
    /// more than `timeout_ms`. Returns the number of sleeps taken.
    pub(crate) fn wait_until_idle(
        &mut self,
        delay: &mut DELAY,
        poll_ms: u32,
        timeout_ms: Option<u32>,
    ) -> Result<u32, Error<SPI, BUSY, DC, RST>> {
        let mut polls = 0u32;
        let mut waited_ms = 0u32;
        while self.is_busy()? {
            let pause_ms = match timeout_ms {
                Some(limit) if waited_ms >= limit => {
                    return Err(Error::Timeout { waited_ms });
                }
                // the last pause ends right at the limit
                Some(limit) => poll_ms.min(limit - waited_ms),
                None => poll_ms,
            };
            trace!("busy, poll {}", polls);
            delay.delay_ms(pause_ms);
            polls += 1;
            // every poll counts as at least 1ms, so a zero interval still times out
            waited_ms = waited_ms.saturating_add(pause_ms.max(1));
        }
        Ok(polls)
    }

    /// Resets the device.
    ///
    /// The only way out of deep sleep. Holds the reset line low for `low_ms`,
    /// then keeps it released for `high_ms`.
    pub(crate) fn reset(
        &mut self,
        delay: &mut DELAY,
        low_ms: u32,
        high_ms: u32,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.rst.set_low().map_err(Error::RstError)?;
        delay.delay_ms(low_ms);
        self.rst.set_high().map_err(Error::RstError)?;
        delay.delay_ms(high_ms);
        Ok(())
    }
}
