//! Core types for HSV lane-marker detection.
//!
//! This crate is intentionally small. It knows how to look at a borrowed
//! color buffer, convert pixels to the 8-bit HSV convention used by camera
//! tooling (H in `0..=179`, S and V in `0..=255`) and describe an acceptance
//! range in that space. It does *not* depend on any concrete image crate.

mod frame;
mod hsv;

pub use frame::{ChannelOrder, ColorImageView, FrameError};
pub use hsv::{rgb_to_hsv, Hsv, HsvRange, HUE_MAX, SAT_VAL_MAX};
