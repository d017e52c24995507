use core::fmt::{Debug, Display, Formatter};

use embedded_hal::{
    digital::{self, InputPin, OutputPin},
    spi::{self, SpiDevice},
};

use crate::epd5in79::PanelState;

/// Epd error type
pub enum Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Encountered an SPI error
    SpiError(SPI::Error),

    /// Encountered an error on Busy GPIO
    BusyError(BUSY::Error),

    /// Encountered an error on DC GPIO
    DcError(DC::Error),

    /// Encountered an error on RST GPIO
    RstError(RST::Error),

    /// Orientation value outside of `1..=4`, or an orientation that doesn't
    /// match the split direction of the requested frame transfer
    InvalidOrientation(u8),

    /// The busy line didn't report idle within the configured timeout
    Timeout {
        /// Milliseconds spent polling before giving up
        waited_ms: u32,
    },

    /// The pixel buffer is shorter than a full frame
    BufferSize {
        /// Bytes needed for a full frame
        expected: usize,
        /// Bytes handed in
        actual: usize,
    },

    /// The panel can't accept this operation in its current state
    InvalidState(PanelState),

    /// The configured geometry can't be driven, see [`Config::is_valid`](crate::epd5in79::Config::is_valid)
    InvalidConfig,
}

impl<SPI, BUSY, DC, RST> Clone for Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    SPI::Error: Copy,
    BUSY: InputPin,
    BUSY::Error: Copy,
    DC: OutputPin,
    DC::Error: Copy,
    RST: OutputPin,
    RST::Error: Copy,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<SPI, BUSY, DC, RST> Copy for Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    SPI::Error: Copy,
    BUSY: InputPin,
    BUSY::Error: Copy,
    DC: OutputPin,
    DC::Error: Copy,
    RST: OutputPin,
    RST::Error: Copy,
{
}

impl<SPI, BUSY, DC, RST> Display for Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "spi: {}", spi::Error::kind(err)),
            Self::BusyError(err) => write!(f, "busy pin: {}", digital::Error::kind(err)),
            Self::DcError(err) => write!(f, "dc pin: {}", digital::Error::kind(err)),
            Self::RstError(err) => write!(f, "rst pin: {}", digital::Error::kind(err)),
            Self::InvalidOrientation(value) => {
                write!(f, "invalid orientation {value}, expected 1 (left) to 4 (down)")
            }
            Self::Timeout { waited_ms } => {
                write!(f, "panel still busy after {waited_ms}ms")
            }
            Self::BufferSize { expected, actual } => {
                write!(f, "frame buffer has {actual} bytes, {expected} are needed")
            }
            Self::InvalidState(state) => write!(f, "operation not allowed while {state:?}"),
            Self::InvalidConfig => write!(f, "panel geometry out of range"),
        }
    }
}

impl<SPI, BUSY, DC, RST> Debug for Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => f.debug_tuple("SpiError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::DcError(err) => f.debug_tuple("DcError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
            Self::InvalidOrientation(value) => {
                f.debug_tuple("InvalidOrientation").field(value).finish()
            }
            Self::Timeout { waited_ms } => f
                .debug_struct("Timeout")
                .field("waited_ms", waited_ms)
                .finish(),
            Self::BufferSize { expected, actual } => f
                .debug_struct("BufferSize")
                .field("expected", expected)
                .field("actual", actual)
                .finish(),
            Self::InvalidState(state) => f.debug_tuple("InvalidState").field(state).finish(),
            Self::InvalidConfig => f.write_str("InvalidConfig"),
        }
    }
}
