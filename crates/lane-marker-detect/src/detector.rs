use image::GrayImage;
use lane_marker_core::ColorImageView;
use serde::{Deserialize, Serialize};

use crate::lane::{LaneEstimate, ToleranceBand};
use crate::mask::{fill_holes, threshold_hsv};
use crate::params::LaneDetectorParams;
use crate::regions::{extract_regions, LabelMap};
use crate::select::{select_markers, Marker};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Per-frame detection result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneDetectionResult {
    pub frame_width: usize,
    pub frame_height: usize,
    /// Up to `max_markers` markers, largest first.
    pub markers: Vec<Marker>,
    /// Separation of the two markers when exactly two were found.
    pub distance: Option<u32>,
    /// Present only for a pair separated by more than `min_pair_separation`.
    pub lane: Option<LaneEstimate>,
    pub band: ToleranceBand,
    /// `true` when the lane midpoint lies strictly inside the band.
    pub crossed: bool,
}

/// Intermediate images for overlays and mask export.
#[derive(Clone, Debug)]
pub struct LaneDebug {
    /// Thresholded mask after hole filling (0 / 255).
    pub mask: GrayImage,
    pub labels: LabelMap,
    /// Labels of the selected markers, same order as `LaneDetectionResult::markers`.
    pub marker_labels: Vec<u32>,
    pub num_regions: usize,
}

impl LaneDebug {
    pub fn is_marker_pixel(&self, x: u32, y: u32) -> bool {
        let l = self.labels.get_pixel(x, y)[0];
        l != 0 && self.marker_labels.contains(&l)
    }
}

/// Lane detector: HSV mask, two largest regions, midpoint vs. centre band.
pub struct LaneDetector {
    params: LaneDetectorParams,
}

impl LaneDetector {
    pub fn new(mut params: LaneDetectorParams) -> Self {
        params.hsv = params.hsv.clamped();
        Self { params }
    }

    pub fn params(&self) -> &LaneDetectorParams {
        &self.params
    }

    /// Run the detector on one frame.
    pub fn detect(&self, frame: &ColorImageView<'_>) -> LaneDetectionResult {
        self.detect_with_debug(frame).0
    }

    /// Same as [`LaneDetector::detect`], also returning the mask and label map.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn detect_with_debug(
        &self,
        frame: &ColorImageView<'_>,
    ) -> (LaneDetectionResult, LaneDebug) {
        let p = &self.params;
        let band = ToleranceBand::for_width(frame.width, p.band_half_width);

        let mask = fill_holes(&threshold_hsv(frame, &p.hsv));
        let (regions, labels) = extract_regions(&mask);
        let markers = select_markers(&regions, p.min_area, p.max_markers);
        log::debug!(
            "regions={} markers={} (min_area={})",
            regions.len(),
            markers.len(),
            p.min_area
        );

        let (distance, lane) = match markers.as_slice() {
            [a, b] => {
                let est = LaneEstimate::from_pair(a.pixel(), b.pixel());
                let lane = est.is_separated(p.min_pair_separation).then_some(est);
                if lane.is_none() {
                    log::debug!(
                        "marker pair too close ({}px <= {}px), skipping lane",
                        est.distance,
                        p.min_pair_separation
                    );
                }
                (Some(est.distance), lane)
            }
            _ => (None, None),
        };
        let crossed = lane.is_some_and(|l| band.contains(l.midpoint[0]));

        let debug = LaneDebug {
            marker_labels: markers.iter().map(|m| m.label).collect(),
            num_regions: regions.len(),
            mask,
            labels,
        };
        let result = LaneDetectionResult {
            frame_width: frame.width,
            frame_height: frame.height,
            markers,
            distance,
            lane,
            band,
            crossed,
        };
        (result, debug)
    }
}

/// Free-function form of [`LaneDetector::detect`].
pub fn detect_lane_markers(
    frame: &ColorImageView<'_>,
    params: &LaneDetectorParams,
) -> LaneDetectionResult {
    LaneDetector::new(params.clone()).detect(frame)
}
