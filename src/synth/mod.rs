//! Series synthesis: sparse indicator points -> dense per-bar arrays ->
//! style-dependent series descriptions.

pub mod background;
pub mod barcolor;
pub mod fill;
pub mod histogram;
pub mod line;
pub mod ohlc;
pub mod scatter;
pub mod shape;
pub mod step;

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;

use crate::axis_compat::{series_key, AxisAssignments};
use crate::backend::{PriceLine, SeriesKind, SeriesSpec};
use crate::data_types::{
    Bar, ChartOptions, Color, Indicator, Plot, PlotOptions, PlotStyle, PlotValue, PointOptions,
};
use crate::layout::PaneSlot;
use crate::time_index::TimeIndex;

pub const DEFAULT_SERIES_COLOR: &str = "#2962ff";

/// The three parallel dense arrays of one plot, with the phantom-slot lead
/// carried alongside so every consumer applies the same offset.
#[derive(Clone, Debug, Default)]
pub struct DenseArrays {
    pub lead: usize,
    pub values: Vec<Option<PlotValue>>,
    pub colors: Vec<Option<Color>>,
    pub options: Vec<Option<PointOptions>>,
}

impl DenseArrays {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scalar view of the value array; OHLC tuples and non-finite values
    /// read as gaps.
    pub fn scalars(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|v| v.as_ref().and_then(PlotValue::as_scalar))
            .collect()
    }

    /// Aligns one plot onto the padded dense range. Points whose timestamp
    /// has no bar are dropped; points whose resolved color is the
    /// not-available sentinel keep their slot but lose their value, breaking
    /// visual continuity there.
    pub fn align(plot: &Plot, index: &TimeIndex) -> Self {
        let len = index.padded_len();
        let mut arrays = Self {
            lead: index.padding().lead,
            values: vec![None; len],
            colors: vec![None; len],
            options: vec![None; len],
        };

        for point in &plot.data {
            let Some(position) = index.position(point.time) else {
                continue;
            };
            let offset = point
                .options
                .as_ref()
                .and_then(|o| o.offset)
                .unwrap_or(plot.options.offset);
            let slot = arrays.lead as i64 + position as i64 + offset;
            if slot < 0 || slot >= len as i64 {
                continue;
            }
            let slot = slot as usize;

            let point_color = point.options.as_ref().and_then(|o| o.color.clone());
            let na = point_color.as_ref().is_some_and(Color::is_na);

            arrays.values[slot] = if na { None } else { point.value };
            arrays.colors[slot] = point_color.or_else(|| plot.options.color.clone());
            arrays.options[slot] = point.options.clone();
        }
        arrays
    }
}

/// Everything one style renderer may consult while producing its series.
pub struct RenderContext<'a> {
    pub series_name: String,
    pub x_axis: usize,
    pub y_axis: usize,
    pub arrays: &'a DenseArrays,
    pub plot: &'a PlotOptions,
    pub indicator_id: &'a str,
    pub plot_name: &'a str,
    pub bars: &'a [Bar],
    pub chart: &'a ChartOptions,
    /// Scalar arrays of plots already synthesized this pass, keyed
    /// `indicator::plot`; what fill-between references.
    pub plot_arrays: &'a HashMap<String, Vec<Option<f64>>>,
    /// Shared per-bar recolor array consumed by the market candle series.
    pub bar_colors: &'a RefCell<Vec<Option<Color>>>,
}

impl RenderContext<'_> {
    /// The market bar under a dense slot, if the slot is not phantom.
    pub fn candle_at(&self, slot: usize) -> Option<&Bar> {
        let position = slot.checked_sub(self.arrays.lead)?;
        self.bars.get(position)
    }

    /// Slot color resolved against the plot color and the crate default.
    pub fn resolved_color(&self, slot: usize) -> Color {
        self.arrays.colors[slot]
            .clone()
            .or_else(|| self.plot.color.clone())
            .unwrap_or_else(|| Color::new(DEFAULT_SERIES_COLOR))
    }

    pub fn line_width(&self) -> f32 {
        self.plot.linewidth.unwrap_or(1.0)
    }
}

/// One visual style. Returns `None` when the style produces no series
/// (side-effecting styles, unresolvable references).
pub trait StyleRenderer {
    fn render(&self, ctx: &RenderContext) -> Option<SeriesSpec>;
}

/// Style tag -> renderer. Unknown or unregistered styles fall back to the
/// line renderer, so adding a style never touches a dispatcher.
pub struct StyleRegistry {
    renderers: HashMap<PlotStyle, Box<dyn StyleRenderer>>,
    fallback: line::LineRenderer,
}

impl StyleRegistry {
    pub fn register(&mut self, style: PlotStyle, renderer: Box<dyn StyleRenderer>) {
        self.renderers.insert(style, renderer);
    }

    pub fn get(&self, style: PlotStyle) -> &dyn StyleRenderer {
        match self.renderers.get(&style) {
            Some(renderer) => renderer.as_ref(),
            None => &self.fallback,
        }
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        let mut registry = Self {
            renderers: HashMap::new(),
            fallback: line::LineRenderer,
        };
        registry.register(PlotStyle::Line, Box::new(line::LineRenderer));
        registry.register(PlotStyle::Step, Box::new(step::StepRenderer));
        registry.register(PlotStyle::Histogram, Box::new(histogram::HistogramRenderer));
        registry.register(PlotStyle::Columns, Box::new(histogram::HistogramRenderer));
        registry.register(PlotStyle::Circles, Box::new(scatter::ScatterRenderer));
        registry.register(PlotStyle::Cross, Box::new(scatter::ScatterRenderer));
        registry.register(PlotStyle::Char, Box::new(scatter::ScatterRenderer));
        registry.register(PlotStyle::Bar, Box::new(ohlc::OhlcRenderer));
        registry.register(PlotStyle::Candle, Box::new(ohlc::OhlcRenderer));
        registry.register(PlotStyle::Shape, Box::new(shape::ShapeRenderer));
        registry.register(PlotStyle::Background, Box::new(background::BackgroundRenderer));
        registry.register(PlotStyle::Fill, Box::new(fill::FillRenderer));
        registry.register(PlotStyle::BarColor, Box::new(barcolor::BarColorRenderer));
        registry
    }
}

#[derive(Clone, Debug, Default)]
pub struct SynthesisResult {
    pub series: Vec<SeriesSpec>,
    pub bar_colors: Vec<Option<Color>>,
}

pub struct SeriesSynthesizer;

impl SeriesSynthesizer {
    /// Runs every visible indicator plot through the registry, fills
    /// deferred to the end of each indicator so their references resolve,
    /// and prepends the market candle series carrying the barcolor
    /// overrides.
    pub fn synthesize(
        registry: &StyleRegistry,
        bars: &[Bar],
        indicators: &[Indicator],
        index: &TimeIndex,
        assignments: &AxisAssignments,
        pane_layout: &[PaneSlot],
        options: &ChartOptions,
    ) -> SynthesisResult {
        let padded_len = index.padded_len();
        let bar_colors = RefCell::new(vec![None; padded_len]);
        let mut plot_arrays: HashMap<String, Vec<Option<f64>>> = HashMap::new();
        let mut series = Vec::new();

        for indicator in indicators {
            if indicator.collapsed {
                continue;
            }

            // Fills reference sibling arrays; they go last.
            let (fills, direct): (Vec<&Plot>, Vec<&Plot>) = indicator
                .plots
                .iter()
                .partition(|p| p.options.style == PlotStyle::Fill);

            for plot in direct.into_iter().chain(fills) {
                let arrays = DenseArrays::align(plot, index);
                let (x_axis, y_axis) = assignments.binding(indicator, plot, pane_layout);
                let key = series_key(&indicator.id, &plot.name);
                let ctx = RenderContext {
                    series_name: key.clone(),
                    x_axis,
                    y_axis,
                    arrays: &arrays,
                    plot: &plot.options,
                    indicator_id: &indicator.id,
                    plot_name: &plot.name,
                    bars,
                    chart: options,
                    plot_arrays: &plot_arrays,
                    bar_colors: &bar_colors,
                };
                if let Some(spec) = registry.get(plot.options.style).render(&ctx) {
                    series.push(spec);
                }
                plot_arrays.insert(key, arrays.scalars());
            }
        }

        let market = Self::market_series(bars, index, options, bar_colors.into_inner());
        series.insert(0, market);

        debug!(series = series.len(), bars = bars.len(), "series synthesis");
        SynthesisResult {
            bar_colors: match &series[0].kind {
                SeriesKind::Candles { overrides, .. } => overrides.clone(),
                _ => Vec::new(),
            },
            series,
        }
    }

    /// The market candle series: padded OHLC values, up/down colors, the
    /// barcolor override array, and the optional last-close line.
    fn market_series(
        bars: &[Bar],
        index: &TimeIndex,
        options: &ChartOptions,
        overrides: Vec<Option<Color>>,
    ) -> SeriesSpec {
        let mut values = vec![None; index.padded_len()];
        for (position, bar) in bars.iter().enumerate() {
            values[index.slot_of_position(position)] =
                Some([bar.open, bar.high, bar.low, bar.close]);
        }

        let last_price = if options.last_price_line {
            bars.last().map(|bar| PriceLine {
                value: bar.close,
                color: if bar.is_up() {
                    options.up_color.clone()
                } else {
                    options.down_color.clone()
                },
                dashed: true,
            })
        } else {
            None
        };

        SeriesSpec {
            name: options.title.clone(),
            x_axis: 0,
            y_axis: 0,
            z: 5,
            silent: false,
            kind: SeriesKind::Candles {
                values,
                up_color: options.up_color.clone(),
                down_color: options.down_color.clone(),
                overrides,
                last_price,
            },
        }
    }
}
