//! Pixel <-> data conversion against the live backend transforms.

use crate::backend::RenderBackend;
use crate::data_types::{DataCoordinate, PixelPoint};

/// Stateless bridge over the backend's per-pane transforms. Both directions
/// return `None` as the not-found sentinel when the point or pane cannot be
/// resolved (e.g. before the first layout). Bar indices are
/// padding-adjusted dense slots; callers must not re-offset them.
pub struct CoordinateBridge<'a> {
    backend: &'a dyn RenderBackend,
}

impl<'a> CoordinateBridge<'a> {
    pub fn new(backend: &'a dyn RenderBackend) -> Self {
        Self { backend }
    }

    /// Hit-tests every pane top to bottom and inverse-transforms within the
    /// first match. The bar index is rounded to the nearest slot.
    pub fn pixel_to_data(&self, point: PixelPoint) -> Option<DataCoordinate> {
        for pane in 0..self.backend.pane_count() {
            let Some(transform) = self.backend.pane_transform(pane) else {
                continue;
            };
            if transform.contains(point) {
                let (x, y) = transform.pixel_to_data(point);
                return Some(DataCoordinate {
                    bar: x.round() as i64,
                    value: y,
                    pane,
                });
            }
        }
        None
    }

    pub fn data_to_pixel(&self, coord: &DataCoordinate) -> Option<PixelPoint> {
        let transform = self.backend.pane_transform(coord.pane)?;
        if transform.bounds.is_empty() {
            return None;
        }
        Some(transform.data_to_pixel(coord.bar as f64, coord.value))
    }
}
