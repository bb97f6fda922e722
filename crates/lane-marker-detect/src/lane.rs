use serde::{Deserialize, Serialize};

/// Midpoint and separation of a marker pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneEstimate {
    /// Floor average of the two pixel centroids.
    pub midpoint: [i32; 2],
    /// Euclidean distance between the two pixel centroids, truncated to
    /// whole pixels.
    pub distance: u32,
}

impl LaneEstimate {
    pub fn from_pair(a: [i32; 2], b: [i32; 2]) -> Self {
        let dx = f64::from(b[0] - a[0]);
        let dy = f64::from(b[1] - a[1]);
        Self {
            midpoint: [(a[0] + b[0]).div_euclid(2), (a[1] + b[1]).div_euclid(2)],
            distance: dx.hypot(dy) as u32,
        }
    }

    /// `true` when the pair is far enough apart to be read as a lane.
    #[inline]
    pub fn is_separated(&self, min_separation: u32) -> bool {
        self.distance > min_separation
    }
}

/// Vertical strip of half-width `half_width` around `center`.
///
/// Both edges are exclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub center: i32,
    pub half_width: i32,
}

impl ToleranceBand {
    /// Band centred on `width / 2` (integer division).
    pub fn for_width(width: usize, half_width: u32) -> Self {
        Self {
            center: (width / 2) as i32,
            half_width: half_width as i32,
        }
    }

    pub fn left(&self) -> i32 {
        self.center - self.half_width
    }

    pub fn right(&self) -> i32 {
        self.center + self.half_width
    }

    #[inline]
    pub fn contains(&self, x: i32) -> bool {
        self.left() < x && x < self.right()
    }
}
