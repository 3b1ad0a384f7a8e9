use super::{RenderContext, StyleRenderer};
use crate::backend::SeriesSpec;

/// Produces no series: writes into the shared per-bar color override array
/// consumed by the market candle series. Recoloring the market series, not
/// an indicator series, is the point.
pub struct BarColorRenderer;

impl StyleRenderer for BarColorRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec> {
        let mut bar_colors = ctx.bar_colors.borrow_mut();
        for (slot, value) in ctx.arrays.values.iter().enumerate() {
            if value.is_none() {
                continue;
            }
            if let Some(color) = &ctx.arrays.colors[slot] {
                if !color.is_na() {
                    bar_colors[slot] = Some(color.clone());
                }
            }
        }
        None
    }
}
