use serde::{Deserialize, Serialize};

use super::data::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomPosition {
    #[default]
    Top,
    Bottom,
}

/// Zoom/scrubber strip configuration. Heights are percent of the container.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataZoomOptions {
    pub visible: bool,
    pub position: ZoomPosition,
    pub height_pct: f32,
}

impl Default for DataZoomOptions {
    fn default() -> Self {
        Self {
            visible: true,
            position: ZoomPosition::Top,
            height_pct: 6.0,
        }
    }
}

/// Vertical layout knobs. The gap is a fixed pixel amount converted to
/// percent against the measured container height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub gap_px: f32,
    pub default_pane_height_pct: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            gap_px: 20.0,
            default_pane_height_pct: 15.0,
        }
    }
}

/// Phantom slots padded around the dense bar range so plotted data does not
/// touch the pane edges. Carried on the time index so every consumer applies
/// the same offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPadding {
    pub lead: usize,
    pub trail: usize,
}

impl SlotPadding {
    pub fn new(lead: usize, trail: usize) -> Self {
        Self { lead, trail }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub title: String,
    pub up_color: Color,
    pub down_color: Color,
    pub data_zoom: DataZoomOptions,
    pub layout: LayoutOptions,
    pub padding: SlotPadding,
    /// Draw the dashed last-close line on the candle series.
    pub last_price_line: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Market".to_string(),
            up_color: Color::new("#00da3c"),
            down_color: Color::new("#ec0000"),
            data_zoom: DataZoomOptions::default(),
            layout: LayoutOptions::default(),
            padding: SlotPadding::default(),
            last_price_line: true,
        }
    }
}
