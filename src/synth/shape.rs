use crate::backend::{LabelPosition, MarkerLabel, MarkerPoint, MarkerSymbol, SeriesKind, SeriesSpec};
use crate::data_types::{Color, MarkerSize, ShapeKind, ShapeLocation};

use super::{RenderContext, StyleRenderer};

/// Vertical nudge, in percent of marker size, pushing the glyph clear of
/// the bar it annotates.
const BAR_CLEARANCE_PCT: f32 = 150.0;
/// Label bubbles hold their text, so they draw larger than plain glyphs.
const LABEL_SCALE: f32 = 2.5;

/// Marker glyphs with location-dependent Y placement and label rules.
pub struct ShapeRenderer;

impl StyleRenderer for ShapeRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec> {
        let scalars = ctx.arrays.scalars();
        let mut points = Vec::new();

        for (slot, value) in scalars.iter().enumerate() {
            let opts = ctx.arrays.options[slot].as_ref();
            let location = opts
                .and_then(|o| o.location)
                .or(ctx.plot.location)
                .unwrap_or_default();

            // Bar-anchored and edge-pinned markers fire on truthy values
            // only; zero means "no signal here".
            if !location.is_price_anchored() && !value.map(|v| v != 0.0).unwrap_or(false) {
                continue;
            }
            // Even an absolute marker needs a Y coordinate.
            let Some(value) = *value else {
                continue;
            };

            let shape = opts
                .and_then(|o| o.shape)
                .or(ctx.plot.shape)
                .unwrap_or_default();
            let size = opts
                .and_then(|o| o.size)
                .or(ctx.plot.size)
                .unwrap_or_default();
            let color = opts
                .and_then(|o| o.color.clone())
                .or_else(|| ctx.plot.color.clone())
                .unwrap_or_else(|| Color::new("blue"));
            let text = opts
                .and_then(|o| o.text.clone())
                .or_else(|| ctx.plot.text.clone());
            let text_color = opts
                .and_then(|o| o.textcolor.clone())
                .or_else(|| ctx.plot.textcolor.clone())
                .unwrap_or_else(|| Color::new("white"));
            let width = opts.and_then(|o| o.width).or(ctx.plot.width);
            let height = opts.and_then(|o| o.height).or(ctx.plot.height);

            let (y_value, offset_y_pct) = match location {
                ShapeLocation::AboveBar => (
                    ctx.candle_at(slot).map(|bar| bar.high).unwrap_or(value),
                    -BAR_CLEARANCE_PCT,
                ),
                ShapeLocation::BelowBar => (
                    ctx.candle_at(slot).map(|bar| bar.low).unwrap_or(value),
                    BAR_CLEARANCE_PCT,
                ),
                // Viewport pinning is the backend's job; the value passes
                // through unchanged.
                ShapeLocation::Top | ShapeLocation::Bottom | ShapeLocation::Absolute => (value, 0.0),
            };

            points.push(MarkerPoint {
                slot,
                value: y_value,
                color,
                symbol: MarkerSymbol::Shape(shape),
                size: marker_size(shape, size, width, height),
                offset_y_pct,
                label: text.map(|text| MarkerLabel {
                    text,
                    color: text_color,
                    position: label_position(shape, location),
                }),
            });
        }

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

fn marker_size(
    shape: ShapeKind,
    size: MarkerSize,
    width: Option<f32>,
    height: Option<f32>,
) -> [f32; 2] {
    let base = match (width, height) {
        (Some(w), Some(h)) => [w, h],
        (Some(w), None) => [w, w],
        (None, Some(h)) => [h, h],
        (None, None) => [size.pixels(), size.pixels()],
    };
    if shape.is_label() {
        [base[0] * LABEL_SCALE, base[1] * LABEL_SCALE]
    } else {
        base
    }
}

/// Text placement follows the marker's location, not its glyph direction;
/// label bubbles at an absolute location carry their text inside.
fn label_position(shape: ShapeKind, location: ShapeLocation) -> LabelPosition {
    match location {
        ShapeLocation::AboveBar => LabelPosition::Above,
        ShapeLocation::BelowBar => LabelPosition::Below,
        ShapeLocation::Top => LabelPosition::Below,
        ShapeLocation::Bottom => LabelPosition::Above,
        ShapeLocation::Absolute => {
            if shape.is_label() {
                LabelPosition::Inside
            } else {
                LabelPosition::Above
            }
        }
    }
}
