//! A Driver for the 5.79" four color E-Ink panel with two cascaded controllers via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - Chip select is handled by the [`SpiDevice`](embedded_hal::spi::SpiDevice)
//!
//! ### Other....
//!
//! - Buffersize: a frame buffer is always [`Config::buffer_len`](epd5in79::Config::buffer_len)
//!   bytes (53856 for the stock panel), four pixels of logical [color indices](color) per byte.
//!   Both controllers receive 100 bytes of every line; the two bytes in the middle go to both.
//! - The busy line is LOW while the panel is working.
//!
//! # Examples
//!
//!```rust, no_run
//!# use embedded_hal_mock::eh1::*;
//!# fn main() -> Result<(), core::convert::Infallible> {
//!use epd5in79_cascade::{epd5in79::*, graphics::Display5in79, prelude::*};
//!use embedded_graphics::{
//!    prelude::*,
//!    primitives::{Circle, PrimitiveStyle},
//!};
//!#
//!# let expectations = [];
//!# let mut spi = spi::Mock::new(&expectations);
//!# let expectations = [];
//!# let busy_in = digital::Mock::new(&expectations);
//!# let dc = digital::Mock::new(&expectations);
//!# let rst = digital::Mock::new(&expectations);
//!# let mut delay = delay::NoopDelay::new();
//!
//!let mut epd = Epd5in79::new(busy_in, dc, rst, Config::default().with_busy_timeout(30_000));
//!let mut display = Display5in79::default();
//!
//!// draw something into the buffer
//!let _ = Circle::new(Point::new(100, 60), 120)
//!    .into_styled(PrimitiveStyle::with_fill(QuadColor::Red))
//!    .draw(&mut display);
//!
//!if epd.init(&mut spi, &mut delay, Orientation::Left).is_ok() {
//!    epd.update_frame(&mut spi, display.buffer()).ok();
//!    epd.display_frame_and_sleep(&mut spi, &mut delay).ok();
//!}
//!# Ok(())
//!# }
//!```
#![no_std]

#[cfg(feature = "graphics")]
pub mod graphics;

mod traits;

pub mod color;

mod error;
pub use error::Error;

/// Interface for the physical connection between display and the controlling device
mod interface;

pub mod epd5in79;

pub mod console;

#[cfg(test)]
mod fake;

pub mod prelude {
    pub use crate::color::QuadColor;
    pub use crate::console::{ConsoleCommand, Outcome, ParseError};
    pub use crate::epd5in79::{Config, Orientation, PanelState};
    pub use crate::error::Error;
    pub use crate::SPI_MODE;

    #[cfg(feature = "graphics")]
    pub use crate::graphics::{Display5in79, DisplayRotation, Layout};
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
