//! High-level facade crate for the `lane-marker-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the core types and the lane detector
//! - (feature-gated) helpers that run the detector on `image::RgbImage` or raw
//!   buffers, draw diagnostic overlays and render grayscale/edge previews.
//!
//! ## Quickstart
//!
//! ```no_run
//! use lane_marker::detect;
//! use lane_marker::LaneDetectorParams;
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("frame.png")?.decode()?.to_rgb8();
//! let result = detect::detect_lane_markers_rgb(&img, &LaneDetectorParams::default());
//! if result.crossed {
//!     println!("lane midpoint inside the centre band");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `lane_marker::core`: frame views, HSV conversion and ranges.
//! - `lane_marker::detector`: masks, regions, marker selection, tolerance band.
//! - `lane_marker::detect` (feature `image`): end-to-end helpers from `image::RgbImage`.
//! - `lane_marker::overlay` (feature `image`): diagnostic drawing.
//! - `lane_marker::preview` (feature `image`): grayscale, blur and Canny edges.

pub use lane_marker_core as core;
pub use lane_marker_detect as detector;

pub use lane_marker_core::{ChannelOrder, ColorImageView, Hsv, HsvRange};
pub use lane_marker_detect::{
    LaneDebug, LaneDetectionResult, LaneDetector, LaneDetectorParams, LaneEstimate, Marker,
    ToleranceBand,
};

#[cfg(feature = "image")]
pub mod detect;
#[cfg(feature = "image")]
mod glyphs;
#[cfg(feature = "image")]
pub mod overlay;
#[cfg(feature = "image")]
pub mod preview;
