use crate::backend::{SeriesKind, SeriesSpec};
use crate::data_types::Color;

use super::{RenderContext, StyleRenderer, DEFAULT_SERIES_COLOR};

/// One bar per slot (`histogram` and `columns` tags share this). Slots
/// without an explicit color default by the sign of their value, matching
/// the market up/down palette.
pub struct HistogramRenderer;

impl StyleRenderer for HistogramRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec> {
        let values = ctx.arrays.scalars();
        let colors = values
            .iter()
            .enumerate()
            .map(|(slot, value)| {
                ctx.arrays.colors[slot].clone().or_else(|| {
                    value.map(|v| {
                        if v >= 0.0 {
                            ctx.chart.up_color.clone()
                        } else {
                            ctx.chart.down_color.clone()
                        }
                    })
                })
            })
            .collect();
        let base_color = ctx
            .plot
            .color
            .clone()
            .unwrap_or_else(|| Color::new(DEFAULT_SERIES_COLOR));

        Some(SeriesSpec {
            name: ctx.series_name.clone(),
            x_axis: ctx.x_axis,
            y_axis: ctx.y_axis,
            z: 0,
            silent: false,
            kind: SeriesKind::Histogram {
                values,
                colors,
                base_color,
            },
        })
    }
}
