//! Connected regions of a binary mask and their image moments.

use std::collections::HashMap;

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::mask::OFF;

/// Per-pixel region labels; 0 is background.
pub type LabelMap = ImageBuffer<Luma<u32>, Vec<u32>>;

/// One 8-connected blob of selected pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Label in the accompanying [`LabelMap`].
    pub label: u32,
    /// Pixel count (zeroth moment).
    pub area: u32,
    /// First moments over the zeroth moment.
    pub centroid: Point2<f32>,
    /// Inclusive bounds `[x_min, y_min, x_max, y_max]`.
    pub bbox: [u32; 4],
    /// Position in raster order of each region's first pixel.
    pub discovery: usize,
}

#[derive(Default)]
struct Moments {
    m00: u64,
    m10: u64,
    m01: u64,
    bbox: [u32; 4],
}

impl Moments {
    fn push(&mut self, x: u32, y: u32) {
        if self.m00 == 0 {
            self.bbox = [x, y, x, y];
        } else {
            self.bbox[0] = self.bbox[0].min(x);
            self.bbox[1] = self.bbox[1].min(y);
            self.bbox[2] = self.bbox[2].max(x);
            self.bbox[3] = self.bbox[3].max(y);
        }
        self.m00 += 1;
        self.m10 += x as u64;
        self.m01 += y as u64;
    }

    fn centroid(&self) -> Option<Point2<f32>> {
        if self.m00 == 0 {
            return None;
        }
        let n = self.m00 as f64;
        Some(Point2::new(
            (self.m10 as f64 / n) as f32,
            (self.m01 as f64 / n) as f32,
        ))
    }
}

/// Label the 8-connected regions of `mask` (non-zero = selected).
///
/// Regions are returned in discovery order: the raster position
/// (top-to-bottom, then left-to-right) of each region's first pixel.
pub fn extract_regions(mask: &GrayImage) -> (Vec<Region>, LabelMap) {
    let (w, h) = mask.dimensions();
    if w == 0 || h == 0 {
        return (Vec::new(), LabelMap::new(w, h));
    }

    let labels = connected_components(mask, Connectivity::Eight, Luma([OFF]));

    let mut order: HashMap<u32, usize> = HashMap::new();
    let mut acc: Vec<(u32, Moments)> = Vec::new();
    for (x, y, px) in labels.enumerate_pixels() {
        let l = px[0];
        if l == 0 {
            continue;
        }
        let idx = *order.entry(l).or_insert_with(|| {
            acc.push((l, Moments::default()));
            acc.len() - 1
        });
        acc[idx].1.push(x, y);
    }

    let regions = acc
        .into_iter()
        .enumerate()
        .filter_map(|(discovery, (label, m))| {
            Some(Region {
                label,
                area: u32::try_from(m.m00).ok()?,
                centroid: m.centroid()?,
                bbox: m.bbox,
                discovery,
            })
        })
        .collect::<Vec<_>>();

    log::debug!("extracted {} regions from {}x{} mask", regions.len(), w, h);
    (regions, labels)
}
