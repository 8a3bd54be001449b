use crate::foundation::core::Rgb8;
use crate::foundation::error::{KeeperError, KeeperResult};

/// A background video frame as RGB8 pixels.
///
/// Frames carry no alpha. Bytes are tightly packed, row-major, three bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// Wrap raw RGB8 bytes, checking the buffer length against the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> KeeperResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(KeeperError::validation(format!(
                "frame data size mismatch: got {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgb8) -> Self {
        let data = [color.r, color.g, color.b].repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Fill `[x0, x1) x [y0, y1)` with `color`, clipped to the frame.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb8) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = self.offset(x, y);
                self.data[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]);
            }
        }
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        let i = self.offset(x, y);
        Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 3
    }

    /// Convert from an `image` RGB buffer.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Convert into an `image` RGB buffer.
    pub fn into_rgb_image(self) -> KeeperResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| KeeperError::validation("frame buffer does not match its dimensions"))
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> KeeperResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| KeeperError::validation("frame size overflow"))
}
