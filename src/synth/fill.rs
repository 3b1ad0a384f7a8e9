use tracing::warn;

use crate::axis_compat::series_key;
use crate::backend::{SeriesKind, SeriesSpec};
use crate::data_types::Color;

use super::{RenderContext, StyleRenderer};

/// Fills the region between two sibling plots. Synthesized after its
/// references (fills are deferred to the end of each indicator's plot
/// list); a missing reference logs a warning and omits the series rather
/// than failing the render.
pub struct FillRenderer;

impl StyleRenderer for FillRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec> {
        let (Some(name_a), Some(name_b)) = (&ctx.plot.plot_a, &ctx.plot.plot_b) else {
            warn!(
                plot = ctx.plot_name,
                "fill plot missing its two bound references"
            );
            return None;
        };

        let key_a = series_key(ctx.indicator_id, name_a);
        let key_b = series_key(ctx.indicator_id, name_b);
        let (Some(upper), Some(lower)) = (ctx.plot_arrays.get(&key_a), ctx.plot_arrays.get(&key_b))
        else {
            warn!(
                plot = ctx.plot_name,
                upper = name_a.as_str(),
                lower = name_b.as_str(),
                "fill plot references plots that were not synthesized"
            );
            return None;
        };

        let (color, opacity) = ctx
            .plot
            .color
            .clone()
            .unwrap_or_else(|| Color::new("rgba(128,128,128,0.2)"))
            .parse_opacity();

        Some(SeriesSpec {
            name: ctx.series_name.clone(),
            x_axis: ctx.x_axis,
            y_axis: ctx.y_axis,
            z: -5,
            silent: true,
            kind: SeriesKind::FillBetween {
                upper: upper.clone(),
                lower: lower.clone(),
                color,
                opacity,
            },
        })
    }
}
