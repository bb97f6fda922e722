use crate::core::{ChannelOrder, ColorImageView, FrameError};
use crate::detector::{LaneDebug, LaneDetectionResult, LaneDetector, LaneDetectorParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid color image buffer length (expected {expected} bytes, got {got})")]
    InvalidColorBuffer { expected: usize, got: usize },

    #[error("invalid color image dimensions (width={width}, height={height})")]
    InvalidColorDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Convert an `image::RgbImage` into the lightweight `lane-marker-core` view type.
pub fn color_view(img: &::image::RgbImage) -> ColorImageView<'_> {
    ColorImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
        order: ChannelOrder::Rgb,
    }
}

/// Run the lane detector end-to-end on an RGB image.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn detect_lane_markers_rgb(
    img: &::image::RgbImage,
    params: &LaneDetectorParams,
) -> LaneDetectionResult {
    LaneDetector::new(params.clone()).detect(&color_view(img))
}

/// Like [`detect_lane_markers_rgb`], also returning intermediate images.
pub fn detect_lane_markers_rgb_debug(
    img: &::image::RgbImage,
    params: &LaneDetectorParams,
) -> (LaneDetectionResult, LaneDebug) {
    LaneDetector::new(params.clone()).detect_with_debug(&color_view(img))
}

/// Build an `image::RgbImage` from a packed buffer in either channel order.
pub fn rgb_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
    order: ChannelOrder,
) -> Result<::image::RgbImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidColorDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h).and_then(|n| n.checked_mul(3)) else {
        return Err(DetectError::InvalidColorDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidColorBuffer {
            expected,
            got: pixels.len(),
        });
    }

    let data = match order {
        ChannelOrder::Rgb => pixels.to_vec(),
        ChannelOrder::Bgr => pixels
            .chunks_exact(3)
            .flat_map(|px| [px[2], px[1], px[0]])
            .collect(),
    };
    ::image::RgbImage::from_raw(width, height, data)
        .ok_or(DetectError::InvalidColorDimensions { width, height })
}

/// Run the detector directly on a packed buffer without copying it.
pub fn detect_lane_markers_from_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    order: ChannelOrder,
    params: &LaneDetectorParams,
) -> Result<LaneDetectionResult, DetectError> {
    let view = ColorImageView::new(width as usize, height as usize, pixels, order)?;
    Ok(LaneDetector::new(params.clone()).detect(&view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_buffer_length() {
        let err = rgb_image_from_slice(4, 4, &[0u8; 10], ChannelOrder::Rgb).unwrap_err();
        assert!(matches!(
            err,
            DetectError::InvalidColorBuffer {
                expected: 48,
                got: 10
            }
        ));
    }

    #[test]
    fn bgr_buffer_is_reordered() {
        let img = rgb_image_from_slice(1, 1, &[1, 2, 3], ChannelOrder::Bgr).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [3, 2, 1]);
    }

    #[test]
    fn raw_buffer_detection_matches_image_detection() {
        let mut img = ::image::RgbImage::from_pixel(200, 80, ::image::Rgb([30, 30, 30]));
        for y in 10..50 {
            for x in 20..60 {
                img.put_pixel(x, y, ::image::Rgb([250, 210, 10]));
            }
        }
        let params = LaneDetectorParams::default();
        let a = detect_lane_markers_rgb(&img, &params);
        let b = detect_lane_markers_from_u8(200, 80, img.as_raw(), ChannelOrder::Rgb, &params)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.markers.len(), 1);
    }

    #[test]
    fn raw_buffer_size_mismatch_is_an_error() {
        let params = LaneDetectorParams::default();
        let err =
            detect_lane_markers_from_u8(2, 2, &[0u8; 5], ChannelOrder::Rgb, &params).unwrap_err();
        assert!(matches!(err, DetectError::Frame(_)));
    }
}
