//! Two-marker lane detector built on top of `lane-marker-core`.
//!
//! ## Quickstart
//!
//! ```
//! use lane_marker_core::{ChannelOrder, ColorImageView};
//! use lane_marker_detect::{LaneDetector, LaneDetectorParams};
//!
//! let pixels = vec![0u8; 64 * 48 * 3];
//! let frame = ColorImageView::new(64, 48, &pixels, ChannelOrder::Rgb).unwrap();
//! let detector = LaneDetector::new(LaneDetectorParams::default());
//!
//! let result = detector.detect(&frame);
//! assert!(result.markers.is_empty());
//! assert!(!result.crossed);
//! ```
//!
//! Algorithm, one frame at a time:
//! 1. Convert every pixel to 8-bit HSV and keep those inside the configured range.
//! 2. Fill holes so each blob is described by its outer boundary only.
//! 3. Label 8-connected regions and compute area and centroid from moments.
//! 4. Drop small regions, keep the two largest (ties keep raster discovery order).
//! 5. With exactly two markers further apart than the separation gate, take the
//!    integer midpoint and test it against a band around the frame's vertical centre.

mod detector;
mod lane;
mod mask;
mod params;
mod regions;
mod select;

pub use detector::{detect_lane_markers, LaneDebug, LaneDetectionResult, LaneDetector};
pub use lane::{LaneEstimate, ToleranceBand};
pub use mask::{fill_holes, threshold_hsv};
pub use params::LaneDetectorParams;
pub use regions::{extract_regions, LabelMap, Region};
pub use select::{select_markers, Marker};
