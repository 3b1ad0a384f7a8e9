use crate::backend::{SeriesKind, SeriesSpec};

use super::{RenderContext, StyleRenderer};

/// One horizontal tick per slot, one bar wide; null slots stay empty.
pub struct StepRenderer;

impl StyleRenderer for StepRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec> {
        Some(SeriesSpec {
            name: ctx.series_name.clone(),
            x_axis: ctx.x_axis,
            y_axis: ctx.y_axis,
            z: 0,
            silent: true,
            kind: SeriesKind::Step {
                values: ctx.arrays.scalars(),
                colors: ctx.arrays.colors.clone(),
                width: ctx.line_width(),
            },
        })
    }
}
