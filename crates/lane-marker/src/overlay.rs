//! Diagnostic overlay: marker outlines, centroids, area and distance labels,
//! the centre band and the lane pair.

use ::image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::detector::{LaneDebug, LaneDetectionResult};
use crate::glyphs::{draw_label, GLYPH_H};

const CENTROID_RADIUS: i32 = 5;
const MIDPOINT_RADIUS: i32 = 6;
/// Label anchor relative to the point it describes: left and above.
const LABEL_DX: i32 = -40;
const LABEL_DY: i32 = -10;

#[derive(Clone, Copy, Debug)]
pub struct OverlayStyle {
    pub marker_outline: Rgb<u8>,
    pub centroid: Rgb<u8>,
    pub center_line: Rgb<u8>,
    pub band_edge: Rgb<u8>,
    pub pair_line: Rgb<u8>,
    pub midpoint: Rgb<u8>,
    pub area_label: Rgb<u8>,
    pub distance_label: Rgb<u8>,
    /// Glyph pixel size for labels; 0 disables them.
    pub label_scale: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            marker_outline: Rgb([0, 255, 0]),
            centroid: Rgb([255, 0, 0]),
            center_line: Rgb([0, 255, 0]),
            band_edge: Rgb([255, 0, 0]),
            pair_line: Rgb([0, 0, 255]),
            midpoint: Rgb([255, 255, 0]),
            area_label: Rgb([255, 255, 255]),
            distance_label: Rgb([0, 255, 0]),
            label_scale: 2,
        }
    }
}

/// Draw the detection on top of `img`.
///
/// With `debug` the exact region outlines are traced from the label map;
/// without it each marker gets its bounding box. The pair line, midpoint and
/// `Dist: Npx` label are drawn only when the lane was evaluated; labels go
/// last so they stay readable.
pub fn draw_overlay(
    img: &mut RgbImage,
    result: &LaneDetectionResult,
    debug: Option<&LaneDebug>,
    style: &OverlayStyle,
) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return;
    }

    match debug {
        Some(debug) if debug.labels.dimensions() == (w, h) => {
            draw_outlines(img, debug, style.marker_outline);
        }
        _ => {
            for m in &result.markers {
                let [x0, y0, x1, y1] = m.bbox;
                let rect = Rect::at(x0 as i32, y0 as i32).of_size(x1 - x0 + 1, y1 - y0 + 1);
                draw_hollow_rect_mut(img, rect, style.marker_outline);
            }
        }
    }

    for m in &result.markers {
        let [cx, cy] = m.pixel();
        draw_filled_circle_mut(img, (cx, cy), CENTROID_RADIUS, style.centroid);
    }

    let bottom = (h - 1) as f32;
    let band = result.band;
    for x in [band.center, band.center + 1] {
        draw_line_segment_mut(img, (x as f32, 0.0), (x as f32, bottom), style.center_line);
    }
    for x in [band.left(), band.right()] {
        draw_line_segment_mut(img, (x as f32, 0.0), (x as f32, bottom), style.band_edge);
    }

    if let (Some(lane), [a, b]) = (result.lane, result.markers.as_slice()) {
        let [ax, ay] = a.pixel();
        let [bx, by] = b.pixel();
        draw_line_segment_mut(
            img,
            (ax as f32, ay as f32),
            (bx as f32, by as f32),
            style.pair_line,
        );
        let [mx, my] = lane.midpoint;
        draw_filled_circle_mut(img, (mx, my), MIDPOINT_RADIUS, style.midpoint);
    }

    for m in &result.markers {
        let [cx, cy] = m.pixel();
        let text = format!("Area: {}", m.area);
        put_label(img, (cx, cy), &text, style.area_label, style.label_scale);
    }
    if let Some(lane) = result.lane {
        let text = format!("Dist: {}px", lane.distance);
        let [mx, my] = lane.midpoint;
        put_label(img, (mx, my), &text, style.distance_label, style.label_scale);
    }
}

/// Label whose bottom-left corner sits at `anchor + (LABEL_DX, LABEL_DY)`.
fn put_label(img: &mut RgbImage, anchor: (i32, i32), text: &str, color: Rgb<u8>, scale: u32) {
    let top = anchor.1 + LABEL_DY - (GLYPH_H * scale) as i32;
    draw_label(img, anchor.0 + LABEL_DX, top, text, color, scale);
}

/// Paint marker pixels that touch a pixel outside their own region.
fn draw_outlines(img: &mut RgbImage, debug: &LaneDebug, color: Rgb<u8>) {
    let (w, h) = debug.labels.dimensions();
    for y in 0..h {
        for x in 0..w {
            if !debug.is_marker_pixel(x, y) {
                continue;
            }
            let l = debug.labels.get_pixel(x, y)[0];
            let on_border = x == 0 || y == 0 || x + 1 == w || y + 1 == h;
            let touches_outside = on_border
                || [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                    .into_iter()
                    .any(|(nx, ny)| debug.labels.get_pixel(nx, ny)[0] != l);
            if touches_outside {
                img.put_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detect_lane_markers_rgb_debug;
    use crate::detector::LaneDetectorParams;

    fn two_marker_frame() -> RgbImage {
        let mut img = RgbImage::from_pixel(320, 120, Rgb([40, 40, 40]));
        for (x0, x1) in [(20u32, 59u32), (240, 279)] {
            for y in 40..70 {
                for x in x0..=x1 {
                    img.put_pixel(x, y, Rgb([255, 220, 0]));
                }
            }
        }
        img
    }

    #[test]
    fn overlay_marks_outline_centre_and_midpoint() {
        let img = two_marker_frame();
        let (res, debug) = detect_lane_markers_rgb_debug(&img, &LaneDetectorParams::default());
        let style = OverlayStyle::default();
        let mut out = img.clone();
        draw_overlay(&mut out, &res, Some(&debug), &style);

        // outline on the left edge of the first blob, interior untouched
        assert_eq!(*out.get_pixel(20, 55), style.marker_outline);
        assert_eq!(*out.get_pixel(30, 45), Rgb([255, 220, 0]));
        // centroid dot, above the pair line that runs through it
        assert_eq!(*out.get_pixel(39, 51), style.centroid);
        assert_eq!(*out.get_pixel(100, 54), style.pair_line);
        // centre line and band edges
        assert_eq!(*out.get_pixel(160, 5), style.center_line);
        assert_eq!(*out.get_pixel(130, 5), style.band_edge);
        assert_eq!(*out.get_pixel(190, 5), style.band_edge);
        // midpoint dot
        let lane = res.lane.expect("lane");
        assert_eq!(
            *out.get_pixel(lane.midpoint[0] as u32, lane.midpoint[1] as u32),
            style.midpoint
        );
    }

    #[test]
    fn overlay_labels_area_and_distance() {
        let img = two_marker_frame();
        let (res, debug) = detect_lane_markers_rgb_debug(&img, &LaneDetectorParams::default());
        let style = OverlayStyle::default();
        let mut out = img.clone();
        draw_overlay(&mut out, &res, Some(&debug), &style);

        // "Area: 1200" above the right marker at (259, 54): top-left (219, 30),
        // first row of `A` lights columns 1..=3.
        assert_eq!(*out.get_pixel(221, 30), style.area_label);
        assert_eq!(*out.get_pixel(219, 30), img.get_pixel(219, 30).to_owned());
        // "Dist: 220px" above the midpoint (149, 54): top-left (109, 30),
        // first row of `D` lights columns 0..=3.
        assert_eq!(*out.get_pixel(109, 30), style.distance_label);

        let mut plain = img.clone();
        let no_labels = OverlayStyle {
            label_scale: 0,
            ..style
        };
        draw_overlay(&mut plain, &res, Some(&debug), &no_labels);
        assert_eq!(*plain.get_pixel(221, 30), *img.get_pixel(221, 30));
        assert_eq!(*plain.get_pixel(109, 30), *img.get_pixel(109, 30));
    }

    #[test]
    fn overlay_without_debug_uses_bounding_boxes() {
        let img = two_marker_frame();
        let (res, _) = detect_lane_markers_rgb_debug(&img, &LaneDetectorParams::default());
        let style = OverlayStyle::default();
        let mut out = img.clone();
        draw_overlay(&mut out, &res, None, &style);
        assert_eq!(*out.get_pixel(20, 40), style.marker_outline);
        assert_eq!(*out.get_pixel(59, 69), style.marker_outline);
    }
}
