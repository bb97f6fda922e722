use lane_marker_core::HsvRange;
use serde::{Deserialize, Serialize};

/// Configuration for the lane detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneDetectorParams {
    /// Accepted marker color.
    pub hsv: HsvRange,
    /// Regions with `area <= min_area` pixels are discarded before ranking.
    pub min_area: u32,
    /// Keep at most this many regions, largest first.
    pub max_markers: usize,
    /// Two markers whose truncated distance is at most this (px) are not a
    /// lane pair.
    pub min_pair_separation: u32,
    /// Half-width (px) of the band around the frame's vertical centre line.
    pub band_half_width: u32,
}

impl Default for LaneDetectorParams {
    fn default() -> Self {
        Self {
            hsv: HsvRange::default(),
            min_area: 700,
            max_markers: 2,
            min_pair_separation: 50,
            band_half_width: 30,
        }
    }
}

impl LaneDetectorParams {
    pub fn with_hsv(hsv: HsvRange) -> Self {
        Self {
            hsv,
            ..Self::default()
        }
    }
}
