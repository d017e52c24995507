//! Cutting a full frame buffer into the two controller halves
//!
//! The frame buffer is `row_stride * column_bytes` bytes. Every controller gets
//! `column_bytes` blocks of `line_bytes` bytes. The second half starts
//! `line_bytes - seam_overlap` bytes (or lines) after the first one, so the
//! bytes at the seam are sent to both controllers.
//!
//! ```md
//!  Split::Columns (Left/Right)          Split::Rows (Up/Down)
//!
//!  0          98 100         198        byte i of line j: i + j * column_bytes
//!  +-----------+--+-----------+         +----------------+  0
//!  |  first    |##|  second   |         |     first      |
//!  |           |##|           |         +################+  98
//!  +-----------+--+-----------+         +################+  100
//!                                       |     second     |
//!                                       +----------------+  198
//! ```

use super::command::Controller;
use super::config::{Config, Orientation, Split};

/// One controller's share of a frame buffer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Half {
    /// Controller this half is sent to
    pub controller: Controller,
    /// Direction the buffer is cut in
    pub split: Split,
    /// First byte column (Columns) or line (Rows) of this half
    pub offset: usize,
    /// Blocks per half
    pub blocks: usize,
    /// Bytes per block
    pub block_len: usize,
    /// Distance between two blocks (Columns) or two bytes of a block (Rows)
    pub stride: usize,
}

impl Half {
    /// Number of bytes this half sends
    pub fn len(&self) -> usize {
        self.blocks * self.block_len
    }

    /// Whether this half sends nothing at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index into the frame buffer of byte `j` of block `i`
    pub fn source_index(&self, i: usize, j: usize) -> usize {
        match self.split {
            Split::Columns => i * self.stride + self.offset + j,
            Split::Rows => i + (j + self.offset) * self.stride,
        }
    }

    /// The bytes of this half, in transmission order, still logically encoded
    ///
    /// `buffer` must be at least [`Config::buffer_len`] long.
    pub(crate) fn bytes<'a>(&self, buffer: &'a [u8]) -> impl Iterator<Item = u8> + 'a {
        let half = *self;
        (0..half.blocks).flat_map(move |i| {
            (0..half.block_len).map(move |j| buffer[half.source_index(i, j)])
        })
    }
}

/// Both halves of a frame, in transmission order
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FramePartition {
    /// Left (Columns) or upper (Rows) half
    pub first: Half,
    /// Right (Columns) or lower (Rows) half
    pub second: Half,
}

impl FramePartition {
    /// Partition for a panel mounted with `orientation`
    ///
    /// Only meaningful for a [`Config::is_valid`] geometry.
    pub fn new(config: &Config, orientation: Orientation) -> Self {
        let split = orientation.split();
        let (first, second) = orientation.controllers();
        let stride = match split {
            Split::Columns => config.row_stride(),
            Split::Rows => config.column_bytes,
        };
        let half = |controller, offset| Half {
            controller,
            split,
            offset,
            blocks: config.column_bytes,
            block_len: config.line_bytes,
            stride,
        };
        FramePartition {
            first: half(first, 0),
            second: half(second, config.line_bytes.saturating_sub(config.seam_overlap)),
        }
    }

    /// Both halves, first one first
    pub fn halves(&self) -> [Half; 2] {
        [self.first, self.second]
    }
}
