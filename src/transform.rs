//! Coordinate projection between data space and pane pixel space.

use serde::{Deserialize, Serialize};

use crate::data_types::{PixelPoint, PixelRect};

/// Linear data-domain -> pixel-range mapping. A degenerate domain is widened
/// by half a unit on both sides so inversion stays defined.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        let (mut d_min, mut d_max) = domain;
        if (d_max - d_min).abs() < f64::EPSILON {
            d_min -= 0.5;
            d_max += 0.5;
        }
        Self {
            domain: (d_min, d_max),
            range,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    pub fn map(&self, value: f64) -> f32 {
        let (m, c) = self.coeffs();
        let result = (value * m + c) as f32;
        if result.is_finite() {
            result
        } else {
            0.0
        }
    }

    pub fn invert(&self, pixel: f32) -> f64 {
        let (m, c) = self.coeffs();
        if m == 0.0 {
            return self.domain.0;
        }
        (pixel as f64 - c) / m
    }

    /// Returns (m, c) such that `pixel = value * m + c`.
    pub fn coeffs(&self) -> (f64, f64) {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;
        let m = (r_max - r_min) as f64 / (d_max - d_min);
        let c = r_min as f64 - m * d_min;
        (m, c)
    }
}

/// Per-pane transform handed out by the rendering backend: pane bounds plus
/// the two live axis scales. The Y scale runs top-down (range start at the
/// pane bottom), matching screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaneTransform {
    pub bounds: PixelRect,
    pub x: LinearScale,
    pub y: LinearScale,
}

impl PaneTransform {
    pub fn new(bounds: PixelRect, x_domain: (f64, f64), y_domain: (f64, f64)) -> Self {
        Self {
            bounds,
            x: LinearScale::new(x_domain, (0.0, bounds.width)),
            y: LinearScale::new(y_domain, (bounds.height, 0.0)),
        }
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        !self.bounds.is_empty() && self.bounds.contains(point)
    }

    pub fn data_to_pixel(&self, x: f64, y: f64) -> PixelPoint {
        PixelPoint::new(
            self.bounds.x + self.x.map(x),
            self.bounds.y + self.y.map(y),
        )
    }

    pub fn pixel_to_data(&self, point: PixelPoint) -> (f64, f64) {
        (
            self.x.invert(point.x - self.bounds.x),
            self.y.invert(point.y - self.bounds.y),
        )
    }
}
