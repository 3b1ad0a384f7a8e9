use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::data::{Color, IndicatorPoint};
use super::plot_configs::PlotOptions;

/// A named series of points plus its style options. The plot, not the
/// indicator, is the unit of Y-axis assignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub name: String,
    pub data: Vec<IndicatorPoint>,
    pub options: PlotOptions,
}

impl Plot {
    pub fn new(name: impl Into<String>, data: Vec<IndicatorPoint>, options: PlotOptions) -> Self {
        Self {
            name: name.into(),
            data,
            options,
        }
    }
}

/// Which header controls the host should offer for this indicator's pane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorControls {
    pub collapse: bool,
    pub maximize: bool,
}

impl Default for IndicatorControls {
    fn default() -> Self {
        Self {
            collapse: true,
            maximize: true,
        }
    }
}

/// An indicator: an ordered collection of named plots targeting one pane.
/// Pane 0 means overlay on the main price pane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    pub plots: Vec<Plot>,
    pub pane_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_color: Option<Color>,
    #[serde(default)]
    pub controls: IndicatorControls,
}

impl Indicator {
    pub fn new(id: impl Into<String>, plots: Vec<Plot>, pane_index: usize) -> Self {
        Self {
            id: id.into(),
            plots,
            pane_index,
            height: None,
            collapsed: false,
            title_color: None,
            controls: IndicatorControls::default(),
        }
    }

    pub fn toggle_collapse(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn is_visible(&self) -> bool {
        !self.collapsed
    }

    pub fn plot(&self, name: &str) -> Option<&Plot> {
        self.plots.iter().find(|p| p.name == name)
    }

    /// Point-wise merge by timestamp, later write wins, result sorted.
    /// Plots named here but absent from the indicator are created.
    pub fn merge_plots(&mut self, incoming: Vec<Plot>) {
        for plot in incoming {
            match self.plots.iter_mut().find(|p| p.name == plot.name) {
                Some(existing) => {
                    existing.data = merge_points(std::mem::take(&mut existing.data), plot.data);
                }
                None => {
                    let mut plot = plot;
                    plot.data = merge_points(Vec::new(), plot.data);
                    self.plots.push(plot);
                }
            }
        }
    }
}

/// Merge two point sets by time: incoming points replace existing points at
/// the same timestamp, output sorted ascending. Idempotent.
pub fn merge_points(
    existing: Vec<IndicatorPoint>,
    incoming: Vec<IndicatorPoint>,
) -> Vec<IndicatorPoint> {
    let mut by_time: BTreeMap<i64, IndicatorPoint> = BTreeMap::new();
    for point in existing.into_iter().chain(incoming) {
        // Keyed on millisecond bits; the time index tolerates sub-ms jitter
        // at lookup time, merge does not.
        by_time.insert(point.time.round() as i64, point);
    }
    by_time.into_values().collect()
}
