use serde::{Deserialize, Serialize};

use crate::hsv::{rgb_to_hsv, Hsv};

/// Byte order of the three color channels in a packed frame.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    /// Camera pipelines built on V4L2/GStreamer commonly hand out BGR.
    Bgr,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid color frame buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

/// Borrowed, packed 3-channel frame.
#[derive(Clone, Copy, Debug)]
pub struct ColorImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h*3
    pub order: ChannelOrder,
}

impl<'a> ColorImageView<'a> {
    pub const CHANNELS: usize = 3;

    /// Wrap a raw buffer, checking that it holds exactly `width * height` pixels.
    pub fn new(
        width: usize,
        height: usize,
        data: &'a [u8],
        order: ChannelOrder,
    ) -> Result<Self, FrameError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(Self::CHANNELS))
            .ok_or(FrameError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(FrameError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            order,
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel at `(x, y)` as `[r, g, b]` regardless of the storage order.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * Self::CHANNELS;
        let px = [self.data[i], self.data[i + 1], self.data[i + 2]];
        match self.order {
            ChannelOrder::Rgb => px,
            ChannelOrder::Bgr => [px[2], px[1], px[0]],
        }
    }

    #[inline]
    pub fn hsv(&self, x: usize, y: usize) -> Hsv {
        let [r, g, b] = self.rgb(x, y);
        rgb_to_hsv(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_short_buffer() {
        let data = [0u8; 11];
        let err = ColorImageView::new(2, 2, &data, ChannelOrder::Rgb).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidBuffer {
                expected: 12,
                got: 11
            }
        );
    }

    #[test]
    fn new_rejects_overflowing_dimensions() {
        let err = ColorImageView::new(usize::MAX, 2, &[], ChannelOrder::Rgb).unwrap_err();
        assert!(matches!(err, FrameError::InvalidDimensions { .. }));
    }

    #[test]
    fn bgr_view_swaps_channels() {
        let data = [10u8, 20, 30];
        let view = ColorImageView::new(1, 1, &data, ChannelOrder::Bgr).unwrap();
        assert_eq!(view.rgb(0, 0), [30, 20, 10]);

        let view = ColorImageView::new(1, 1, &data, ChannelOrder::Rgb).unwrap();
        assert_eq!(view.rgb(0, 0), [10, 20, 30]);
    }
}
