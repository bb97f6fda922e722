//! Grayscale / blur / edge preview used when aiming a camera at the track.

use ::image::{GrayImage, RgbImage};

/// Settings for [`EdgePreview::from_rgb`].
#[derive(Clone, Copy, Debug)]
pub struct PreviewParams {
    /// Gaussian sigma; 1.1 matches a 5x5 kernel with automatic sigma.
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
}

impl Default for PreviewParams {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            canny_low: 100.0,
            canny_high: 200.0,
        }
    }
}

pub struct EdgePreview {
    pub gray: GrayImage,
    pub blurred: GrayImage,
    pub edges: GrayImage,
}

impl EdgePreview {
    pub fn from_rgb(img: &RgbImage, params: &PreviewParams) -> Self {
        let gray = grayscale(img);
        let blurred = gaussian_blur(&gray, params.blur_sigma);
        let edges = canny_edges(&gray, params.canny_low, params.canny_high);
        Self {
            gray,
            blurred,
            edges,
        }
    }
}

pub fn grayscale(img: &RgbImage) -> GrayImage {
    ::image::imageops::grayscale(img)
}

pub fn gaussian_blur(gray: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 || gray.width() == 0 || gray.height() == 0 {
        return gray.clone();
    }
    imageproc::filter::gaussian_blur_f32(gray, sigma)
}

pub fn canny_edges(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    imageproc::edges::canny(gray, low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::Rgb;

    #[test]
    fn step_edge_is_found_between_halves() {
        let img = RgbImage::from_fn(40, 20, |x, _| {
            if x < 20 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let preview = EdgePreview::from_rgb(&img, &PreviewParams::default());
        assert_eq!(preview.gray.dimensions(), (40, 20));
        assert_eq!(preview.blurred.dimensions(), (40, 20));

        let row = 10;
        let edge_cols: Vec<u32> = (0..40)
            .filter(|&x| preview.edges.get_pixel(x, row)[0] > 0)
            .collect();
        assert!(!edge_cols.is_empty());
        assert!(edge_cols.iter().all(|&x| (17..=22).contains(&x)));
    }

    #[test]
    fn blur_smooths_the_step() {
        let gray = GrayImage::from_fn(20, 4, |x, _| ::image::Luma([if x < 10 { 0 } else { 255 }]));
        let blurred = gaussian_blur(&gray, 1.1);
        let v = blurred.get_pixel(10, 2)[0];
        assert!(v > 0 && v < 255);
        assert_eq!(blurred.get_pixel(0, 2)[0], 0);
    }
}
