use crate::backend::{SeriesKind, SeriesSpec};

use super::{RenderContext, StyleRenderer};

const BAND_OPACITY: f32 = 0.3;

/// Full-pane-height colored band per slot where a color is present. The
/// value only gates whether the band renders; it never feeds the Y axis.
pub struct BackgroundRenderer;

impl StyleRenderer for BackgroundRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec> {
        let scalars = ctx.arrays.scalars();
        let colors = scalars
            .iter()
            .enumerate()
            .map(|(slot, value)| {
                value
                    .is_some()
                    .then(|| ctx.arrays.colors[slot].clone())
                    .flatten()
            })
            .collect();

        Some(SeriesSpec {
            name: ctx.series_name.clone(),
            x_axis: ctx.x_axis,
            y_axis: ctx.y_axis,
            z: -10,
            silent: true,
            kind: SeriesKind::Background {
                colors,
                opacity: BAND_OPACITY,
            },
        })
    }
}
