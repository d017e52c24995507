//! Line based operator commands for bringing up a panel by hand
//!
//! A host reads a line, hands it to [`ConsoleCommand::parse`] and runs the
//! result with [`ConsoleCommand::execute`]. Every command maps onto exactly one
//! call of the [`Epd5in79`] driver.
//!
//! ```rust, no_run
//!# use embedded_hal_mock::eh1::*;
//!use epd5in79_cascade::{console::*, epd5in79::*};
//!# let expectations = [];
//!# let mut spi = spi::Mock::new(&expectations);
//!# let expectations = [];
//!# let busy_in = digital::Mock::new(&expectations);
//!# let dc = digital::Mock::new(&expectations);
//!# let rst = digital::Mock::new(&expectations);
//!# let mut delay = delay::NoopDelay::new();
//!let mut epd = Epd5in79::new(busy_in, dc, rst, Config::default());
//!
//!match ConsoleCommand::parse("write 0x04") {
//!    Ok(cmd) => {
//!        let _outcome = cmd.execute(&mut epd, &mut spi, &mut delay);
//!    }
//!    Err(ParseError::Empty) => {}
//!    Err(_e) => { /* print HELP */ }
//!}
//!```

use core::fmt::{self, Display, Formatter};

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};
use heapless::Vec;
use log::debug;

use crate::epd5in79::{Epd5in79, Orientation};
use crate::error::Error;

/// Data bytes a single `write` can carry
pub const MAX_DATA: usize = 15;

/// Usage text for the operator
pub const HELP: &str = "\
commands:
  write <cmd> [data...]  send a command byte and up to 15 data bytes
  read <reg>             read a register (not supported by this panel)
  init [1-4]             reset and initialise (1=left 2=right 3=up 4=down, default 1)
  clear                  fill the frame memory with white
  display                refresh the display, then deep sleep
  reset                  hardware reset
  status                 wait for the busy line to go idle
  help                   show this text
  exit | quit            leave the console
numbers are decimal or 0x hex, e.g. 16 or 0x10
common commands: PSR=0x00 PWR=0x01 PON=0x04 DSLP=0x07 DTM=0x10 DRF=0x12";

/// A parsed operator command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Raw command byte followed by its data bytes
    Write {
        command: u8,
        data: Vec<u8, MAX_DATA>,
    },
    /// Register read, which the panel can't do
    Read(u8),
    Init(Orientation),
    Clear,
    Display,
    Reset,
    Status,
    Help,
    Exit,
}

/// Why a line couldn't be parsed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseError<'a> {
    /// Nothing but whitespace
    Empty,
    /// First word isn't a known command
    Unknown(&'a str),
    /// A required argument is missing
    MissingArgument(&'static str),
    /// Argument is neither decimal nor `0x` hex
    BadNumber(&'a str),
    /// Number doesn't fit into a byte
    OutOfRange(u32),
    /// Orientation outside of `1..=4`
    InvalidOrientation(u32),
    /// More arguments than the command takes
    TooManyArguments,
}

impl Display for ParseError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty line"),
            ParseError::Unknown(word) => write!(f, "unknown command `{word}`, try `help`"),
            ParseError::MissingArgument(what) => write!(f, "missing argument: {what}"),
            ParseError::BadNumber(word) => write!(f, "`{word}` is not a number"),
            ParseError::OutOfRange(value) => write!(f, "{value:#x} doesn't fit into a byte"),
            ParseError::InvalidOrientation(value) => {
                write!(f, "orientation must be 1-4 (1=left 2=right 3=up 4=down), got {value}")
            }
            ParseError::TooManyArguments => write!(f, "too many arguments"),
        }
    }
}

/// What an executed command did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Command byte and `data_len` data bytes went out
    Sent { command: u8, data_len: usize },
    /// The panel is write only
    Unsupported,
    Initialized(Orientation),
    Cleared,
    /// Refreshed, now in deep sleep
    Refreshed,
    Reset,
    /// Busy line reads idle
    Idle,
    /// Caller should print [`HELP`]
    Help,
    /// Caller should leave the console
    Exit,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Sent { command, data_len } => {
                write!(f, "sent command {command:#04x} with {data_len} data bytes")
            }
            Outcome::Unsupported => write!(f, "this panel doesn't support reading over SPI"),
            Outcome::Initialized(orientation) => {
                write!(f, "initialised, orientation {}", orientation.value())
            }
            Outcome::Cleared => write!(f, "frame memory cleared"),
            Outcome::Refreshed => write!(f, "display refreshed, panel asleep"),
            Outcome::Reset => write!(f, "hardware reset done"),
            Outcome::Idle => write!(f, "panel ready (BUSY = HIGH)"),
            Outcome::Help => f.write_str(HELP),
            Outcome::Exit => write!(f, "bye"),
        }
    }
}

fn parse_number(word: &str) -> Result<u32, ParseError<'_>> {
    let parsed = match word
        .strip_prefix("0x")
        .or_else(|| word.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => word.parse::<u32>(),
    };
    parsed.map_err(|_| ParseError::BadNumber(word))
}

fn parse_byte(word: &str) -> Result<u8, ParseError<'_>> {
    let value = parse_number(word)?;
    u8::try_from(value).map_err(|_| ParseError::OutOfRange(value))
}

impl ConsoleCommand {
    /// Parses one input line
    ///
    /// Words are separated by any amount of whitespace. Command names are
    /// case sensitive.
    pub fn parse(line: &str) -> Result<ConsoleCommand, ParseError<'_>> {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().ok_or(ParseError::Empty)?;

        let command = match cmd {
            "write" => {
                let code = parts
                    .next()
                    .ok_or(ParseError::MissingArgument("command code"))?;
                let command = parse_byte(code)?;
                let mut data = Vec::new();
                for word in parts {
                    data.push(parse_byte(word)?)
                        .map_err(|_| ParseError::TooManyArguments)?;
                }
                return Ok(ConsoleCommand::Write { command, data });
            }
            "read" => {
                let reg = parts
                    .next()
                    .ok_or(ParseError::MissingArgument("register address"))?;
                ConsoleCommand::Read(parse_byte(reg)?)
            }
            "init" => match parts.next() {
                None => ConsoleCommand::Init(Orientation::default()),
                Some(word) => {
                    let value = parse_number(word)?;
                    let orientation = u8::try_from(value)
                        .ok()
                        .and_then(|v| Orientation::try_from(v).ok())
                        .ok_or(ParseError::InvalidOrientation(value))?;
                    ConsoleCommand::Init(orientation)
                }
            },
            "clear" => ConsoleCommand::Clear,
            "display" => ConsoleCommand::Display,
            "reset" => ConsoleCommand::Reset,
            "status" => ConsoleCommand::Status,
            "help" => ConsoleCommand::Help,
            "exit" | "quit" => ConsoleCommand::Exit,
            other => return Err(ParseError::Unknown(other)),
        };

        if parts.next().is_some() {
            return Err(ParseError::TooManyArguments);
        }
        Ok(command)
    }

    /// Runs the command against the driver
    pub fn execute<SPI, BUSY, DC, RST, DELAY>(
        &self,
        epd: &mut Epd5in79<SPI, BUSY, DC, RST, DELAY>,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<Outcome, Error<SPI, BUSY, DC, RST>>
    where
        SPI: SpiDevice,
        BUSY: InputPin,
        DC: OutputPin,
        RST: OutputPin,
        DELAY: DelayNs,
    {
        debug!("console: {:?}", self);
        let outcome = match self {
            ConsoleCommand::Write { command, data } => {
                epd.send_command(spi, *command)?;
                if !data.is_empty() {
                    epd.send_data(spi, data)?;
                }
                Outcome::Sent {
                    command: *command,
                    data_len: data.len(),
                }
            }
            ConsoleCommand::Read(_) => Outcome::Unsupported,
            ConsoleCommand::Init(orientation) => {
                epd.init(spi, delay, *orientation)?;
                Outcome::Initialized(*orientation)
            }
            ConsoleCommand::Clear => {
                epd.clear_frame(spi)?;
                Outcome::Cleared
            }
            ConsoleCommand::Display => {
                epd.display_frame_and_sleep(spi, delay)?;
                Outcome::Refreshed
            }
            ConsoleCommand::Reset => {
                epd.reset(delay)?;
                Outcome::Reset
            }
            ConsoleCommand::Status => {
                epd.wait_until_idle(delay)?;
                Outcome::Idle
            }
            ConsoleCommand::Help => Outcome::Help,
            ConsoleCommand::Exit => Outcome::Exit,
        };
        Ok(outcome)
    }
}
