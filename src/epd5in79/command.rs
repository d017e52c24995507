//! SPI Commands for the 5.79" cascaded four color panel

use crate::traits;

/// Epd5in79 commands
///
/// Should rarely (never?) be needed directly.
///
/// For more infos about the addresses and what they are doing look into the pdfs
#[allow(dead_code, non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Panel Setting Register: scan (UD) and shift (SHL) direction of one controller
    PSR = 0x00,
    /// Power Setting
    PWR = 0x01,
    /// Power OFF, takes a single dummy data byte
    POF = 0x02,
    /// Power OFF Sequence Setting
    PFS = 0x03,
    /// Power ON
    PON = 0x04,
    /// Booster Soft Start
    BTST = 0x06,
    /// Deep Sleep, only a hardware reset wakes the panel up again
    DSLP = 0x07,
    /// Data Start Transmission: frame memory of the selected controller(s)
    DTM = 0x10,
    /// Display Refresh
    DRF = 0x12,
    /// PLL Control
    PLL = 0x30,
    /// Temperature Sensor Enable
    TSE = 0x41,
    /// VCOM and Data Interval Setting (border)
    CDI = 0x50,
    /// TCON Setting
    TCON = 0x60,
    /// Resolution Setting
    TRES = 0x61,
    /// HTOTAL Setting
    HTOTAL = 0x62,
    /// Gate/Source Start Setting
    GSST = 0x65,
    /// Temperature input / cascade selection
    CCSET = 0xE0,
    /// Power Saving
    PWS = 0xE3,
    /// No documented name; the panel doesn't come up without it
    OxE9 = 0xE9,
    /// Cascade SPI selection: which controller(s) the following bytes go to
    MS_CTRL = 0xEE,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}

/// Payload of [`Command::MS_CTRL`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Controller {
    /// Master and slave at the same time
    Both = 0x04,
    /// Master only
    Master = 0x05,
    /// Slave only
    Slave = 0x06,
}

impl Controller {
    /// The select byte sent after [`Command::MS_CTRL`]
    pub fn select_byte(self) -> u8 {
        self as u8
    }
}
