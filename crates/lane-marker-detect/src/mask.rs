//! Binary masks: HSV thresholding and hole filling.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use lane_marker_core::{ColorImageView, HsvRange};

pub(crate) const ON: u8 = 255;
pub(crate) const OFF: u8 = 0;

/// Mark every pixel whose HSV value lies inside `range` (inclusive) with 255.
pub fn threshold_hsv(frame: &ColorImageView<'_>, range: &HsvRange) -> GrayImage {
    let mut mask = GrayImage::new(frame.width as u32, frame.height as u32);
    for y in 0..frame.height {
        for x in 0..frame.width {
            if range.contains(frame.hsv(x, y)) {
                mask.put_pixel(x as u32, y as u32, Luma([ON]));
            }
        }
    }
    mask
}

/// Fill every background pocket that is not 4-connected to the image border.
///
/// Foreground is treated as 8-connected, so background must be 4-connected for
/// the two to form a consistent topology. After filling, each region is
/// described by its outer boundary alone and anything nested inside a hole
/// merges into the enclosing region.
pub fn fill_holes(mask: &GrayImage) -> GrayImage {
    let (w, h) = mask.dimensions();
    let mut out = mask.clone();
    if w == 0 || h == 0 {
        return out;
    }

    // Label the background; foreground pixels become label 0.
    let background = connected_components(mask, Connectivity::Four, Luma([ON]));

    let mut outside = std::collections::HashSet::new();
    let mut mark_outside = |x: u32, y: u32| {
        let l = background.get_pixel(x, y)[0];
        if l != 0 {
            outside.insert(l);
        }
    };
    for x in 0..w {
        mark_outside(x, 0);
        mark_outside(x, h - 1);
    }
    for y in 0..h {
        mark_outside(0, y);
        mark_outside(w - 1, y);
    }

    for (x, y, px) in out.enumerate_pixels_mut() {
        let l = background.get_pixel(x, y)[0];
        if l != 0 && !outside.contains(&l) {
            *px = Luma([ON]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_marker_core::{ChannelOrder, Hsv};

    fn mask_from_rows(rows: &[&str]) -> GrayImage {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        GrayImage::from_fn(w, h, |x, y| {
            if rows[y as usize].as_bytes()[x as usize] == b'#' {
                Luma([ON])
            } else {
                Luma([OFF])
            }
        })
    }

    #[test]
    fn threshold_selects_only_matching_pixels() {
        // yellow, blue
        let data = [255u8, 255, 0, 0, 0, 255];
        let frame = ColorImageView::new(2, 1, &data, ChannelOrder::Rgb).unwrap();
        let range = HsvRange::new(Hsv::new(18, 80, 50), Hsv::new(35, 255, 255));
        let mask = threshold_hsv(&frame, &range);
        assert_eq!(mask.get_pixel(0, 0)[0], ON);
        assert_eq!(mask.get_pixel(1, 0)[0], OFF);
    }

    #[test]
    fn enclosed_hole_is_filled() {
        let mask = mask_from_rows(&[
            ".......", //
            ".#####.", //
            ".#...#.", //
            ".#...#.", //
            ".#####.", //
            ".......", //
        ]);
        let filled = fill_holes(&mask);
        assert_eq!(filled.get_pixel(3, 2)[0], ON);
        assert_eq!(filled.get_pixel(0, 0)[0], OFF);
        assert_eq!(filled.get_pixel(6, 5)[0], OFF);
    }

    #[test]
    fn open_pocket_is_not_filled() {
        let mask = mask_from_rows(&[
            ".......", //
            ".##.##.", //
            ".#...#.", //
            ".#####.", //
            ".......", //
        ]);
        let filled = fill_holes(&mask);
        assert_eq!(filled.get_pixel(3, 2)[0], OFF);
    }

    #[test]
    fn diagonal_gap_closes_the_boundary() {
        // The ring is 8-connected through its corners, so the centre is a hole.
        let mask = mask_from_rows(&[
            ".....", //
            "..#..", //
            ".#.#.", //
            "..#..", //
            ".....", //
        ]);
        let filled = fill_holes(&mask);
        assert_eq!(filled.get_pixel(2, 2)[0], ON);
    }

    #[test]
    fn empty_mask_is_passed_through() {
        let mask = GrayImage::new(0, 0);
        assert_eq!(fill_holes(&mask).dimensions(), (0, 0));
    }
}
