//! Y-axis assignment for overlay plots: share the price scale or get an
//! isolated hidden scale.

use std::collections::HashMap;

use crate::data_types::{Bar, Indicator, Plot, PlotStyle, ShapeLocation};
use crate::layout::{PaneSlot, YAxisSlot};

/// An overlay plot may ride on the price axis only while staying within
/// 1.5x the price range on the high side and 0.5x on the low side.
const HIGH_TOLERANCE: f64 = 1.5;
const LOW_TOLERANCE: f64 = 0.5;
/// Plots flatter than 1% of the price range would be invisible on the price
/// scale and are isolated as well.
const MIN_SPAN_RATIO: f64 = 0.01;

/// Key under which a plot's series is registered: `indicator::plot`.
pub fn series_key(indicator_id: &str, plot_name: &str) -> String {
    format!("{indicator_id}::{plot_name}")
}

/// Result of one analysis pass. Axis indices are assigned in plot-encounter
/// order and are only stable within a single render.
#[derive(Clone, Debug, Default)]
pub struct AxisAssignments {
    /// Hidden axes to splice into the Y-axis list right after the main axis.
    pub hidden_axes: Vec<YAxisSlot>,
    /// Series key -> global Y-axis index, for isolated overlay plots only.
    pub plot_axis: HashMap<String, usize>,
    /// Global Y-axis index of the first separate-pane axis.
    pub pane_axis_offset: usize,
}

impl AxisAssignments {
    /// Resolves the (x, y) axis indices for one plot, mirroring the pane
    /// layout produced in the same render pass.
    pub fn binding(
        &self,
        indicator: &Indicator,
        plot: &Plot,
        pane_layout: &[PaneSlot],
    ) -> (usize, usize) {
        let is_overlay = plot.options.overlay.unwrap_or(indicator.pane_index == 0);
        if is_overlay {
            let key = series_key(&indicator.id, &plot.name);
            (0, self.plot_axis.get(&key).copied().unwrap_or(0))
        } else {
            match pane_layout
                .iter()
                .position(|p| p.index == indicator.pane_index)
            {
                Some(position) => (position + 1, self.pane_axis_offset + position),
                None => (0, 0),
            }
        }
    }
}

/// Decides, for every overlay plot, whether it may share the main price axis.
/// Purely visual styles never share it; numeric plots share it only when the
/// compatibility heuristic passes.
pub fn analyze(indicators: &[Indicator], bars: &[Bar]) -> AxisAssignments {
    let price_range = bars
        .iter()
        .fold(None::<(f64, f64)>, |acc, bar| match acc {
            Some((lo, hi)) => Some((lo.min(bar.low), hi.max(bar.high))),
            None => Some((bar.low, bar.high)),
        });

    let mut assignments = AxisAssignments::default();
    let mut deferred_fills: Vec<(String, String)> = Vec::new();

    for indicator in indicators {
        for plot in &indicator.plots {
            let is_overlay = plot.options.overlay.unwrap_or(indicator.pane_index == 0);
            if !is_overlay {
                continue;
            }
            let key = series_key(&indicator.id, &plot.name);

            if plot.options.style == PlotStyle::Fill {
                // Fills inherit whatever axis their upper bound lands on;
                // resolved after every sibling has been classified.
                if let Some(upper) = &plot.options.plot_a {
                    deferred_fills.push((key, series_key(&indicator.id, upper)));
                }
                continue;
            }

            let isolated = if is_purely_visual(plot) {
                true
            } else {
                match (scalar_range(plot), price_range) {
                    (Some(plot_range), Some(price_range)) => {
                        !is_compatible(plot_range, price_range)
                    }
                    // Nothing numeric to place: sharing axis 0 renders
                    // nothing and distorts nothing.
                    _ => false,
                }
            };

            if isolated {
                let axis_index = 1 + assignments.hidden_axes.len();
                assignments.hidden_axes.push(YAxisSlot::hidden_overlay());
                assignments.plot_axis.insert(key, axis_index);
            }
        }
    }

    for (fill_key, upper_key) in deferred_fills {
        if let Some(axis) = assignments.plot_axis.get(&upper_key).copied() {
            assignments.plot_axis.insert(fill_key, axis);
        }
    }

    assignments.pane_axis_offset = 1 + assignments.hidden_axes.len();
    assignments
}

/// Styles that must never distort the price scale, whatever their values.
fn is_purely_visual(plot: &Plot) -> bool {
    match plot.options.style {
        PlotStyle::Background | PlotStyle::BarColor => true,
        PlotStyle::Shape => !plot
            .options
            .location
            .unwrap_or(ShapeLocation::Absolute)
            .is_price_anchored(),
        _ => false,
    }
}

fn is_compatible((plot_min, plot_max): (f64, f64), (price_min, price_max): (f64, f64)) -> bool {
    let price_span = price_max - price_min;
    plot_max <= price_max * HIGH_TOLERANCE
        && plot_min >= price_min * LOW_TOLERANCE
        && (plot_max - plot_min) >= price_span * MIN_SPAN_RATIO
}

/// Finite numeric range over all values of the plot; OHLC tuples contribute
/// all four components.
fn scalar_range(plot: &Plot) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    let mut extend = |v: f64| {
        if v.is_finite() {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
    };
    for point in &plot.data {
        match point.value {
            Some(value) => {
                if let Some(v) = value.as_scalar() {
                    extend(v);
                } else if let Some(ohlc) = value.as_ohlc() {
                    for v in ohlc {
                        extend(v);
                    }
                }
            }
            None => {}
        }
    }
    range
}
