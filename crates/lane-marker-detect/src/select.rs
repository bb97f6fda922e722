use std::cmp::Reverse;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::regions::Region;

/// A region that survived area filtering and ranking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub label: u32,
    pub area: u32,
    pub centroid: Point2<f32>,
    pub bbox: [u32; 4],
}

impl Marker {
    /// Centroid truncated to whole pixels.
    pub fn pixel(&self) -> [i32; 2] {
        [self.centroid.x as i32, self.centroid.y as i32]
    }
}

impl From<Region> for Marker {
    fn from(r: Region) -> Self {
        Self {
            label: r.label,
            area: r.area,
            centroid: r.centroid,
            bbox: r.bbox,
        }
    }
}

/// Keep at most `max_markers` regions with `area > min_area`, largest first.
///
/// The sort is stable, so equal areas keep the order the regions were
/// passed in (discovery order when fed from [`crate::extract_regions`]).
pub fn select_markers(regions: &[Region], min_area: u32, max_markers: usize) -> Vec<Marker> {
    let mut kept: Vec<&Region> = regions
        .iter()
        .filter(|r| r.area > 0 && r.area > min_area)
        .collect();
    kept.sort_by_key(|r| Reverse(r.area));
    kept.into_iter()
        .take(max_markers)
        .map(|r| Marker::from(*r))
        .collect()
}
