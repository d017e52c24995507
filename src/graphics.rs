//! Graphics Support for the 5.79" panel
//!
//! [`Display5in79`] is a frame buffer in exactly the layout
//! [`Epd5in79::update_frame`](crate::epd5in79::Epd5in79::update_frame) expects,
//! holding logical color indices. Every byte packs four pixels, the first one
//! in the two highest bits.

use bit_field::BitField;
use embedded_graphics_core::prelude::*;

use crate::color::QuadColor;
use crate::epd5in79::{Config, Orientation, Split, HEIGHT, WIDTH};

/// Length of the frame buffer
pub const BUFFER_LEN: usize = Config::DEFAULT_BUFFER_LEN;

const ROW_STRIDE: usize = BUFFER_LEN / HEIGHT as usize;
const PIXELS_PER_BYTE: usize = 4;

/// Display rotation, only 90° increments supported
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// How pixels are arranged in the frame buffer
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// 792 x 272, for [`Orientation::Left`] and [`Orientation::Right`]
    ///
    /// Rows of 198 bytes, four horizontally adjacent pixels per byte.
    #[default]
    Horizontal,
    /// 272 x 792, for [`Orientation::Up`] and [`Orientation::Down`]
    ///
    /// Rows of 272 bytes, four vertically adjacent pixels per byte.
    Vertical,
}

impl Layout {
    /// Layout the driver sends for a panel mounted with `orientation`
    pub fn for_orientation(orientation: Orientation) -> Self {
        match orientation.split() {
            Split::Columns => Layout::Horizontal,
            Split::Rows => Layout::Vertical,
        }
    }

    /// Width and height in pixels, unrotated
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Layout::Horizontal => (WIDTH, HEIGHT),
            Layout::Vertical => (HEIGHT, WIDTH),
        }
    }

    // byte index and bit offset of the pixel field
    fn locate(self, x: usize, y: usize) -> (usize, usize) {
        let (index, field) = match self {
            Layout::Horizontal => (y * ROW_STRIDE + x / PIXELS_PER_BYTE, x % PIXELS_PER_BYTE),
            Layout::Vertical => (
                x + (y / PIXELS_PER_BYTE) * HEIGHT as usize,
                y % PIXELS_PER_BYTE,
            ),
        };
        (index, 2 * (PIXELS_PER_BYTE - 1 - field))
    }
}

/// Display buffer used for drawing with embedded graphics
///
/// Starts out white. At over 50kB it is best kept in a `static` or on the heap.
pub struct Display5in79 {
    buffer: [u8; BUFFER_LEN],
    layout: Layout,
    rotation: DisplayRotation,
}

impl Default for Display5in79 {
    // inline is necessary here to allow heap allocation via Box on stack limited programs
    #[inline(always)]
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

impl Display5in79 {
    /// A white frame buffer in `layout`
    #[inline(always)]
    pub fn new(layout: Layout) -> Self {
        Self {
            buffer: [QuadColor::White.byte(); BUFFER_LEN],
            layout,
            rotation: DisplayRotation::default(),
        }
    }

    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Pixel arrangement of the buffer
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Set the display rotation.
    ///
    /// This only concerns future drawing made to it. Anything already drawn
    /// stays as it is in the buffer.
    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    /// Get current rotation
    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Set a specific pixel color on this display
    pub fn set_pixel(&mut self, pixel: Pixel<QuadColor>) {
        let Pixel(point, color) = pixel;
        if let Some((index, shift)) = self.locate(point) {
            self.buffer[index].set_bits(shift..shift + 2, color.index());
        }
    }

    /// Color of a pixel, `None` outside of the display
    pub fn pixel(&self, point: Point) -> Option<QuadColor> {
        let (index, shift) = self.locate(point)?;
        Some(QuadColor::from_index(self.buffer[index].get_bits(shift..shift + 2)))
    }

    fn locate(&self, point: Point) -> Option<(usize, usize)> {
        let (width, height) = self.layout.dimensions();
        let (width, height) = (width as i32, height as i32);

        // final coordinates
        let (x, y) = match self.rotation {
            DisplayRotation::Rotate0 => (point.x, point.y),
            DisplayRotation::Rotate90 => (width - 1 - point.y, point.x),
            DisplayRotation::Rotate180 => (width - 1 - point.x, height - 1 - point.y),
            DisplayRotation::Rotate270 => (point.y, height - 1 - point.x),
        };

        if x < 0 || x >= width || y < 0 || y >= height {
            return None;
        }
        Some(self.layout.locate(x as usize, y as usize))
    }
}

/// For use with embedded-graphics
impl DrawTarget for Display5in79 {
    type Color = QuadColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for pixel in pixels {
            self.set_pixel(pixel);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buffer.fill(color.byte());
        Ok(())
    }
}

/// For use with embedded-graphics
impl OriginDimensions for Display5in79 {
    fn size(&self) -> Size {
        let (width, height) = self.layout.dimensions();
        match self.rotation {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => Size::new(width, height),
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => Size::new(height, width),
        }
    }
}
