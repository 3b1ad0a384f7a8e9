use crate::backend::{MarkerPoint, MarkerSymbol, SeriesKind, SeriesSpec};
use crate::data_types::PlotStyle;

use super::{RenderContext, StyleRenderer};

const CIRCLE_SIZE: f32 = 6.0;
const CROSS_SIZE: f32 = 16.0;

/// Scatter markers for `circles` and `cross`; `char` emits the same data as
/// an invisible series for tooltip/inspection use only.
pub struct ScatterRenderer;

impl StyleRenderer for ScatterRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec> {
        if ctx.plot.style == PlotStyle::Char {
            return Some(SeriesSpec {
                name: ctx.series_name.clone(),
                x_axis: ctx.x_axis,
                y_axis: ctx.y_axis,
                z: 0,
                silent: true,
                kind: SeriesKind::Hidden {
                    values: ctx.arrays.scalars(),
                },
            });
        }

        let is_cross = ctx.plot.style == PlotStyle::Cross;
        let size = if is_cross { CROSS_SIZE } else { CIRCLE_SIZE };

        let points = ctx
            .arrays
            .scalars()
            .into_iter()
            .enumerate()
            .filter_map(|(slot, value)| {
                let value = value?;
                Some(MarkerPoint {
                    slot,
                    value,
                    color: ctx.resolved_color(slot),
                    symbol: if is_cross {
                        MarkerSymbol::CrossGlyph
                    } else {
                        MarkerSymbol::Circle
                    },
                    size: [size, size],
                    offset_y_pct: 0.0,
                    label: None,
                })
            })
            .collect();

        Some(SeriesSpec {
            name: ctx.series_name.clone(),
            x_axis: ctx.x_axis,
            y_axis: ctx.y_axis,
            z: 0,
            silent: false,
            kind: SeriesKind::Markers { points },
        })
    }
}
