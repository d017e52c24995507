use bit_field::BitField;

use super::command::Controller;

/// Bytes of one line of a controller half (400 pixels)
pub const LINE_BYTES: usize = 100;
/// Lines per controller half
pub const COLUMN_BYTES: usize = 272;
/// Bytes at the seam that both halves transmit
pub const SEAM_OVERLAP: usize = 2;

/// Second Panel Setting byte, identical for both controllers
pub(crate) const PSR_SECOND: u8 = 0x69;
/// Cascade mode, temperature taken from the master
pub(crate) const CCSET_CASCADE: u8 = 0x71;
/// Border white
pub(crate) const CDI_BORDER_WHITE: u8 = 0x37;

// Panel Setting bits shared by every orientation
const PSR_BASE: u8 = 0x23;
// gate scan direction
const PSR_UD_BIT: usize = 3;
// source shift direction
const PSR_SHL_BIT: usize = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// EPD Configuration
///
/// Geometry, timing and the register payloads that aren't fixed by the wire
/// protocol. `Config::default()` matches the 5.79" panel.
pub struct Config {
    /// Bytes per line of one controller half
    pub line_bytes: usize,
    /// Lines per controller half
    pub column_bytes: usize,
    /// Bytes at the seam that both halves transmit
    pub seam_overlap: usize,
    /// Pause between two reads of the busy line
    pub busy_poll_ms: u32,
    /// Give up waiting for the busy line after this long, `None` waits forever
    pub busy_timeout_ms: Option<u32>,
    /// How long the reset line is held low
    pub reset_low_ms: u32,
    /// How long to wait after releasing the reset line
    pub reset_high_ms: u32,
    /// Pause after the deep sleep command
    pub sleep_settle_ms: u32,
    /// HTOTAL register payload
    pub htotal: [u8; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_bytes: LINE_BYTES,
            column_bytes: COLUMN_BYTES,
            seam_overlap: SEAM_OVERLAP,
            busy_poll_ms: 100,
            busy_timeout_ms: None,
            reset_low_ms: 200,
            reset_high_ms: 200,
            sleep_settle_ms: 200,
            htotal: [0x6F, 0x5C],
        }
    }
}

impl Config {
    /// Frame buffer length of the default geometry
    pub const DEFAULT_BUFFER_LEN: usize = (2 * LINE_BYTES - SEAM_OVERLAP) * COLUMN_BYTES;

    /// Stop waiting for the busy line after `timeout_ms`
    pub fn with_busy_timeout(mut self, timeout_ms: u32) -> Self {
        self.busy_timeout_ms = Some(timeout_ms);
        self
    }

    /// Read the busy line every `poll_ms`
    pub fn with_busy_poll(mut self, poll_ms: u32) -> Self {
        self.busy_poll_ms = poll_ms;
        self
    }

    /// Whether the geometry can be driven at all
    ///
    /// Every half needs at least one byte per line, the seam can't be wider than a
    /// half line, and both resolution values must fit their 16 bit registers.
    pub fn is_valid(&self) -> bool {
        self.line_bytes > 0
            && self.column_bytes > 0
            && self.seam_overlap <= self.line_bytes
            && self.line_bytes <= usize::from(u16::MAX) / 4
            && self.column_bytes <= usize::from(u16::MAX)
    }

    /// Bytes per line of the full frame buffer, the seam counted once
    pub fn row_stride(&self) -> usize {
        self.line_bytes
            .saturating_mul(2)
            .saturating_sub(self.seam_overlap)
    }

    /// Bytes of a full frame buffer
    pub fn buffer_len(&self) -> usize {
        self.row_stride().saturating_mul(self.column_bytes)
    }

    /// Bytes each controller receives per frame
    pub fn half_len(&self) -> usize {
        self.line_bytes.saturating_mul(self.column_bytes)
    }

    /// Payload of the resolution register: width (pixels of one half) and height, big endian
    pub fn resolution(&self) -> [u8; 4] {
        let w = self.line_bytes.saturating_mul(4);
        let h = self.column_bytes;
        [(w >> 8) as u8, w as u8, (h >> 8) as u8, h as u8]
    }
}

/// Which way the flex cable (FPC) of the panel points
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Orientation {
    /// FPC facing left
    #[default]
    Left = 1,
    /// FPC facing right
    Right = 2,
    /// FPC facing upwards
    Up = 3,
    /// FPC facing downwards
    Down = 4,
}

/// How the frame buffer is cut between the two controllers
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Split {
    /// Left and right half, landscape buffer
    Columns,
    /// Upper and lower half, portrait buffer
    Rows,
}

/// Panel Setting register values for both controllers
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PanelSetting {
    /// PSR value for the master
    pub master: u8,
    /// PSR value for the slave
    pub slave: u8,
}

fn psr(ud: bool, shl: bool) -> u8 {
    let mut reg = PSR_BASE;
    reg.set_bit(PSR_UD_BIT, ud);
    reg.set_bit(PSR_SHL_BIT, shl);
    reg
}

impl Orientation {
    /// All orientations, in operator numbering order
    pub const ALL: [Orientation; 4] = [
        Orientation::Left,
        Orientation::Right,
        Orientation::Up,
        Orientation::Down,
    ];

    /// Operator number of the orientation (1 to 4)
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Direction the frame buffer is split in
    pub fn split(self) -> Split {
        match self {
            Orientation::Left | Orientation::Right => Split::Columns,
            Orientation::Up | Orientation::Down => Split::Rows,
        }
    }

    /// Scan (UD) and shift (SHL) direction of master and slave
    pub fn panel_setting(self) -> PanelSetting {
        let (master, slave) = match self {
            Orientation::Left => ((true, false), (true, true)),
            Orientation::Right => ((false, true), (false, false)),
            Orientation::Up => ((false, false), (false, true)),
            Orientation::Down => ((true, true), (true, false)),
        };
        PanelSetting {
            master: psr(master.0, master.1),
            slave: psr(slave.0, slave.1),
        }
    }

    /// Controllers behind the first (left/upper) and second (right/lower) half
    pub fn controllers(self) -> (Controller, Controller) {
        match self {
            Orientation::Left | Orientation::Up => (Controller::Slave, Controller::Master),
            Orientation::Right | Orientation::Down => (Controller::Master, Controller::Slave),
        }
    }
}

impl TryFrom<u8> for Orientation {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Orientation::Left),
            2 => Ok(Orientation::Right),
            3 => Ok(Orientation::Up),
            4 => Ok(Orientation::Down),
            e => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let config = Config::default();
        assert_eq!(config.row_stride(), 198);
        assert_eq!(config.buffer_len(), 53856);
        assert_eq!(Config::DEFAULT_BUFFER_LEN, config.buffer_len());
        assert_eq!(config.half_len(), 27200);
        assert_eq!(config.resolution(), [0x01, 0x90, 0x01, 0x10]);
        assert_eq!(config.busy_timeout_ms, None);
        assert_eq!(config.busy_poll_ms, 100);
    }

    #[test]
    fn geometry_limits() {
        assert!(Config::default().is_valid());

        let wide_seam = Config {
            seam_overlap: 101,
            ..Config::default()
        };
        assert!(!wide_seam.is_valid());
        // no overflow on the derived sizes either
        assert_eq!(wide_seam.row_stride(), 99);
        assert_eq!(wide_seam.buffer_len(), 99 * 272);

        let full_seam = Config {
            seam_overlap: 100,
            ..Config::default()
        };
        assert!(full_seam.is_valid());

        for config in [
            Config {
                line_bytes: 0,
                seam_overlap: 0,
                ..Config::default()
            },
            Config {
                column_bytes: 0,
                ..Config::default()
            },
            Config {
                line_bytes: 0x4000,
                ..Config::default()
            },
            Config {
                column_bytes: 0x1_0000,
                ..Config::default()
            },
        ] {
            assert!(!config.is_valid(), "{config:?}");
        }

        let huge = Config {
            line_bytes: usize::MAX,
            column_bytes: usize::MAX,
            ..Config::default()
        };
        assert_eq!(huge.buffer_len(), usize::MAX);
        assert_eq!(huge.half_len(), usize::MAX);
    }

    #[test]
    fn builder() {
        let config = Config::default().with_busy_timeout(500).with_busy_poll(10);
        assert_eq!(config.busy_timeout_ms, Some(500));
        assert_eq!(config.busy_poll_ms, 10);
    }

    #[test]
    fn panel_setting_values() {
        let expected = [
            (Orientation::Left, 0x2B, 0x2F),
            (Orientation::Right, 0x27, 0x23),
            (Orientation::Up, 0x23, 0x27),
            (Orientation::Down, 0x2F, 0x2B),
        ];
        for (orientation, master, slave) in expected {
            assert_eq!(
                orientation.panel_setting(),
                PanelSetting { master, slave },
                "{orientation:?}"
            );
        }
    }

    #[test]
    fn panel_settings_mirror_each_other() {
        // Down is Left with the shift direction flipped, Up is Right with it flipped
        for (a, b) in [
            (Orientation::Left, Orientation::Down),
            (Orientation::Right, Orientation::Up),
        ] {
            let (a, b) = (a.panel_setting(), b.panel_setting());
            assert_eq!(a.master ^ b.master, 1 << PSR_SHL_BIT);
            assert_eq!(a.slave ^ b.slave, 1 << PSR_SHL_BIT);
            assert_eq!(a.master, b.slave);
            assert_eq!(a.slave, b.master);
        }
        // within one orientation both controllers scan the same way
        for orientation in Orientation::ALL {
            let setting = orientation.panel_setting();
            assert_eq!(
                setting.master.get_bit(PSR_UD_BIT),
                setting.slave.get_bit(PSR_UD_BIT)
            );
            assert_ne!(
                setting.master.get_bit(PSR_SHL_BIT),
                setting.slave.get_bit(PSR_SHL_BIT)
            );
        }
    }

    #[test]
    fn orientation_from_u8() {
        for orientation in Orientation::ALL {
            assert_eq!(Orientation::try_from(orientation.value()), Ok(orientation));
        }
        assert_eq!(Orientation::try_from(0), Err(0));
        assert_eq!(Orientation::try_from(5), Err(5));
    }

    #[test]
    fn controllers_per_half() {
        assert_eq!(
            Orientation::Left.controllers(),
            (Controller::Slave, Controller::Master)
        );
        assert_eq!(
            Orientation::Right.controllers(),
            (Controller::Master, Controller::Slave)
        );
        assert_eq!(
            Orientation::Up.controllers(),
            (Controller::Slave, Controller::Master)
        );
        assert_eq!(
            Orientation::Down.controllers(),
            (Controller::Master, Controller::Slave)
        );
    }
}
