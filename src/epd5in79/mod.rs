//! A driver for the 5.79" four color (black/white/yellow/red) E-Ink panel via SPI
//!
//! The panel is driven by two cascaded controllers, a master and a slave, each owning
//! one half of the 792 x 272 pixels. Both listen on the same bus; the
//! [`MS_CTRL`](Command::MS_CTRL) command picks which of them takes the following bytes.
//! Which half is master depends on how the panel is mounted, see [`Orientation`].
//!
//! # Example
//!
//!```rust, no_run
//!# use embedded_hal_mock::eh1::*;
//!# fn main() -> Result<(), core::convert::Infallible> {
//!use epd5in79_cascade::{epd5in79::*, prelude::*};
//!#
//!# let expectations = [];
//!# let mut spi = spi::Mock::new(&expectations);
//!# let expectations = [];
//!# let busy_in = digital::Mock::new(&expectations);
//!# let dc = digital::Mock::new(&expectations);
//!# let rst = digital::Mock::new(&expectations);
//!# let mut delay = delay::NoopDelay::new();
//!
//!let mut epd = Epd5in79::new(busy_in, dc, rst, Config::default());
//!let buffer = [QuadColor::White.byte(); Config::DEFAULT_BUFFER_LEN];
//!
//!if epd.init(&mut spi, &mut delay, Orientation::Left).is_ok() {
//!    epd.update_frame(&mut spi, &buffer).ok();
//!    epd.display_frame_and_sleep(&mut spi, &mut delay).ok();
//!}
//!# Ok(())
//!# }
//!```

mod command;
mod config;
mod partition;

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};
use log::{debug, trace, warn};

use crate::color::{encode_byte, QuadColor};
use crate::error::Error;
use crate::interface::DisplayInterface;

pub use command::{Command, Controller};
pub use config::*;
pub use partition::{FramePartition, Half};

/// Width of the display in landscape orientation
pub const WIDTH: u32 = 792;
/// Height of the display in landscape orientation
pub const HEIGHT: u32 = 272;
/// Default Background Color
pub const DEFAULT_BACKGROUND_COLOR: QuadColor = QuadColor::White;

/// What the driver knows about the panel
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PanelState {
    /// Not initialised since power up or the last reset
    Unconfigured,
    /// Initialised and accepting commands
    Ready,
    /// The busy line reads busy
    Busy,
    /// In deep sleep, only a hardware reset brings it back
    DeepSleep,
}

/// Epd5in79 driver
pub struct Epd5in79<SPI, BUSY, DC, RST, DELAY> {
    /// Connection Interface
    interface: DisplayInterface<SPI, BUSY, DC, RST, DELAY>,
    config: Config,
    /// Orientation given to the last `init`
    orientation: Option<Orientation>,
    state: PanelState,
}

impl<SPI, BUSY, DC, RST, DELAY> Epd5in79<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new driver from the Busy InputPin, DC and RST
    ///
    /// Nothing is sent yet; call [`init`](Epd5in79::init) before anything else.
    pub fn new(busy: BUSY, dc: DC, rst: RST, config: Config) -> Self {
        Epd5in79 {
            interface: DisplayInterface::new(busy, dc, rst),
            config,
            orientation: None,
            state: PanelState::Unconfigured,
        }
    }

    /// Consumes the driver, handing the pins back
    pub fn release(self) -> (BUSY, DC, RST) {
        self.interface.release()
    }

    /// Resets the panel and loads the register set for `orientation`.
    ///
    /// Always starts with a hardware reset, so this is also the way out of deep sleep.
    /// A failing pin or bus operation aborts the sequence; the panel must not be used
    /// until `init` succeeded. A [`Config`] that isn't [valid](Config::is_valid) is
    /// rejected before anything is sent.
    pub fn init(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        orientation: Orientation,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        debug!("init, orientation {:?}", orientation);
        if !self.config.is_valid() {
            warn!("unusable panel geometry {:?}", self.config);
            return Err(Error::InvalidConfig);
        }
        self.interface.setup()?;
        let setting = orientation.panel_setting();

        self.reset(delay)?;

        self.select(spi, Controller::Master)?;
        self.cmd_with_data(spi, Command::PSR, &[setting.master, PSR_SECOND])?;
        self.select(spi, Controller::Slave)?;
        self.cmd_with_data(spi, Command::PSR, &[setting.slave, PSR_SECOND])?;
        self.select(spi, Controller::Both)?;

        self.cmd_with_data(spi, Command::CCSET, &[CCSET_CASCADE])?;
        self.cmd_with_data(spi, Command::CDI, &[CDI_BORDER_WHITE])?;
        let (resolution, htotal) = (self.config.resolution(), self.config.htotal);
        self.cmd_with_data(spi, Command::TRES, &resolution)?;
        self.cmd_with_data(spi, Command::GSST, &[0x00, 0x00, 0x00, 0x00])?;
        self.cmd_with_data(spi, Command::HTOTAL, &htotal)?;
        self.cmd_with_data(spi, Command::OxE9, &[0x01])?;

        self.orientation = Some(orientation);
        self.state = PanelState::Ready;
        Ok(())
    }

    /// Like [`init`](Epd5in79::init), for a raw orientation value (1 left, 2 right, 3 up, 4 down)
    pub fn init_raw(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        orientation: u8,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        let orientation = Orientation::try_from(orientation).map_err(Error::InvalidOrientation)?;
        self.init(spi, delay, orientation)
    }

    /// Hardware reset, then waits for the panel to report idle.
    ///
    /// Wakes the panel from deep sleep, but leaves it unconfigured.
    pub fn reset(&mut self, delay: &mut DELAY) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        debug!("reset");
        self.interface
            .reset(delay, self.config.reset_low_ms, self.config.reset_high_ms)?;
        self.state = PanelState::Unconfigured;
        self.wait_until_idle(delay)
    }

    /// Sends a command of the panel's command set
    pub fn command(
        &mut self,
        spi: &mut SPI,
        command: Command,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.ensure_awake()?;
        self.interface.cmd(spi, command)
    }

    /// Sends a raw command byte
    pub fn send_command(
        &mut self,
        spi: &mut SPI,
        code: u8,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.ensure_awake()?;
        self.interface.cmd(spi, code)
    }

    /// Sends data bytes, one transfer per byte
    pub fn send_data(
        &mut self,
        spi: &mut SPI,
        data: &[u8],
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.ensure_awake()?;
        self.interface.data(spi, data)
    }

    /// Blocks until the busy line reads idle (HIGH)
    ///
    /// Reads the line every [`Config::busy_poll_ms`]. Without a
    /// [`Config::busy_timeout_ms`] an unresponsive panel blocks forever.
    pub fn wait_until_idle(
        &mut self,
        delay: &mut DELAY,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        match self.interface.wait_until_idle(
            delay,
            self.config.busy_poll_ms,
            self.config.busy_timeout_ms,
        ) {
            Ok(polls) => {
                trace!("idle after {} polls", polls);
                Ok(())
            }
            Err(e) => {
                if let Error::Timeout { waited_ms } = &e {
                    warn!("panel still busy after {}ms", waited_ms);
                }
                Err(e)
            }
        }
    }

    /// Checks the busy line once
    pub fn is_busy(&mut self) -> Result<bool, Error<SPI, BUSY, DC, RST>> {
        self.interface.is_busy()
    }

    /// Tracked state of the panel; never [`PanelState::Busy`]
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Tracked state, with [`PanelState::Busy`] while an awake panel reads busy
    pub fn poll_state(&mut self) -> Result<PanelState, Error<SPI, BUSY, DC, RST>> {
        if self.state != PanelState::DeepSleep && self.is_busy()? {
            return Ok(PanelState::Busy);
        }
        Ok(self.state)
    }

    /// Orientation the panel was last initialised with
    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Configuration the driver was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Width of the display for the current orientation
    pub fn width(&self) -> u32 {
        match self.orientation.map(Orientation::split) {
            Some(Split::Rows) => HEIGHT,
            _ => WIDTH,
        }
    }

    /// Height of the display for the current orientation
    pub fn height(&self) -> u32 {
        match self.orientation.map(Orientation::split) {
            Some(Split::Rows) => WIDTH,
            _ => HEIGHT,
        }
    }

    /// Fills the frame memory of both controllers with white.
    ///
    /// This won't update the display.
    pub fn clear_frame(&mut self, spi: &mut SPI) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.ensure_ready()?;
        let fill = DEFAULT_BACKGROUND_COLOR.panel_byte();
        let len = self.config.half_len();
        for controller in [Controller::Master, Controller::Slave] {
            self.select(spi, controller)?;
            self.interface.cmd(spi, Command::DTM)?;
            self.interface.data_x_times(spi, fill, len)?;
        }
        Ok(())
    }

    /// Transmits a landscape frame buffer (`Left`/`Right`) to the frame memory.
    ///
    /// This won't update the display.
    pub fn set_frame_horizontal(
        &mut self,
        spi: &mut SPI,
        buffer: &[u8],
        orientation: Orientation,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.set_frame_split(spi, buffer, orientation, Split::Columns)
    }

    /// Transmits a portrait frame buffer (`Up`/`Down`) to the frame memory.
    ///
    /// This won't update the display.
    pub fn set_frame_vertical(
        &mut self,
        spi: &mut SPI,
        buffer: &[u8],
        orientation: Orientation,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.set_frame_split(spi, buffer, orientation, Split::Rows)
    }

    /// Transmits a frame buffer laid out for the orientation given to `init`.
    pub fn update_frame(
        &mut self,
        spi: &mut SPI,
        buffer: &[u8],
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.ensure_ready()?;
        let orientation = self
            .orientation
            .ok_or(Error::InvalidState(PanelState::Unconfigured))?;
        self.set_frame_split(spi, buffer, orientation, orientation.split())
    }

    /// Refreshes the display from frame memory, then puts the panel into deep sleep.
    ///
    /// Only [`init`](Epd5in79::init) (or [`reset`](Epd5in79::reset)) wakes it up again.
    pub fn display_frame_and_sleep(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.ensure_ready()?;
        debug!("refresh");
        self.select(spi, Controller::Both)?;

        self.interface.cmd(spi, Command::PON)?;
        self.wait_until_idle(delay)?;

        self.cmd_with_data(spi, Command::DRF, &[0x00])?;
        self.wait_until_idle(delay)?;

        self.cmd_with_data(spi, Command::POF, &[0x00])?;
        self.wait_until_idle(delay)?;

        debug!("deep sleep");
        self.cmd_with_data(spi, Command::DSLP, &[0xA5])?;
        self.state = PanelState::DeepSleep;
        delay.delay_ms(self.config.sleep_settle_ms);
        Ok(())
    }

    fn set_frame_split(
        &mut self,
        spi: &mut SPI,
        buffer: &[u8],
        orientation: Orientation,
        split: Split,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.ensure_ready()?;
        if orientation.split() != split {
            warn!("{:?} can't be sent as {:?} split", orientation, split);
            return Err(Error::InvalidOrientation(orientation.value()));
        }
        let expected = self.config.buffer_len();
        if buffer.len() < expected {
            return Err(Error::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }

        let partition = FramePartition::new(&self.config, orientation);
        for half in partition.halves() {
            self.select(spi, half.controller)?;
            self.interface.cmd(spi, Command::DTM)?;
            self.interface
                .data_iter(spi, half.bytes(buffer).map(encode_byte))?;
        }
        Ok(())
    }

    fn select(
        &mut self,
        spi: &mut SPI,
        controller: Controller,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.cmd_with_data(spi, Command::MS_CTRL, &[controller.select_byte()])
    }

    fn cmd_with_data(
        &mut self,
        spi: &mut SPI,
        command: Command,
        data: &[u8],
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.interface.cmd_with_data(spi, command, data)
    }

    fn ensure_awake(&self) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        if self.state == PanelState::DeepSleep {
            warn!("panel is in deep sleep, reset it first");
            return Err(Error::InvalidState(self.state));
        }
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        if self.state != PanelState::Ready {
            return Err(Error::InvalidState(self.state));
        }
        Ok(())
    }
}
