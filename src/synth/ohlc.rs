use crate::backend::{OhlcItem, SeriesKind, SeriesSpec};
use crate::data_types::PlotStyle;

use super::{RenderContext, StyleRenderer};

/// Custom OHLC glyphs for 4-tuple valued plots. `candle` draws body plus
/// wicks, `bar` draws open/close ticks on a vertical line. Slots without a
/// full finite 4-tuple are skipped.
pub struct OhlcRenderer;

impl StyleRenderer for OhlcRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec> {
        let items = ctx
            .arrays
            .values
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| {
                let [open, high, low, close] = value.as_ref()?.as_ohlc()?;
                let point_opts = ctx.arrays.options[slot].as_ref();

                let color = point_opts
                    .and_then(|o| o.color.clone())
                    .or_else(|| ctx.arrays.colors[slot].clone())
                    .unwrap_or_else(|| ctx.resolved_color(slot));
                let wick_color = point_opts
                    .and_then(|o| o.wickcolor.clone())
                    .or_else(|| ctx.plot.wickcolor.clone())
                    .unwrap_or_else(|| color.clone());
                let border_color = point_opts
                    .and_then(|o| o.bordercolor.clone())
                    .or_else(|| ctx.plot.bordercolor.clone())
                    .unwrap_or_else(|| wick_color.clone());

                Some(OhlcItem {
                    slot,
                    open,
                    high,
                    low,
                    close,
                    color,
                    wick_color,
                    border_color,
                })
            })
            .collect();

        Some(SeriesSpec {
            name: ctx.series_name.clone(),
            x_axis: ctx.x_axis,
            y_axis: ctx.y_axis,
            z: 0,
            silent: false,
            kind: SeriesKind::OhlcGlyphs {
                items,
                draw_body: ctx.plot.style == PlotStyle::Candle,
            },
        })
    }
}
