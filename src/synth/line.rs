use crate::backend::{SeriesKind, SeriesSpec};

use super::{RenderContext, StyleRenderer};

/// Connects consecutive non-null slots; a null slot breaks the polyline.
/// Also the registry fallback for unknown styles.
pub struct LineRenderer;

impl StyleRenderer for LineRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec> {
        Some(SeriesSpec {
            name: ctx.series_name.clone(),
            x_axis: ctx.x_axis,
            y_axis: ctx.y_axis,
            z: 0,
            silent: true,
            kind: SeriesKind::Line {
                values: ctx.arrays.scalars(),
                colors: ctx.arrays.colors.clone(),
                width: ctx.line_width(),
            },
        })
    }
}
