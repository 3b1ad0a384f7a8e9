use serde::{Deserialize, Serialize};

use super::data::Color;

/// Visual style tag of a plot. Unknown strings deserialize to [`Other`]
/// which the renderer registry resolves as `line`.
///
/// [`Other`]: PlotStyle::Other
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStyle {
    #[default]
    Line,
    Step,
    Histogram,
    Columns,
    Circles,
    Cross,
    Char,
    Bar,
    Candle,
    Shape,
    Background,
    Fill,
    BarColor,
    #[serde(other)]
    Other,
}

/// Marker glyphs available to the `shape` style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
    Diamond,
    Cross,
    XCross,
    ArrowUp,
    ArrowDown,
    TriangleUp,
    TriangleDown,
    Flag,
    LabelUp,
    LabelDown,
}

impl ShapeKind {
    /// Label bubbles hold their text inside and draw at 2.5x the base size.
    pub fn is_label(&self) -> bool {
        matches!(self, Self::LabelUp | Self::LabelDown)
    }
}

/// Vertical anchoring of a shape marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeLocation {
    /// Anchored at the point value on the price/value axis.
    #[default]
    Absolute,
    /// Riding above the bar's high.
    AboveBar,
    /// Riding below the bar's low.
    BelowBar,
    Top,
    Bottom,
}

impl ShapeLocation {
    pub fn is_price_anchored(&self) -> bool {
        matches!(self, Self::Absolute)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSize {
    Tiny,
    Small,
    #[default]
    Normal,
    Auto,
    Large,
    Huge,
}

impl MarkerSize {
    pub fn pixels(&self) -> f32 {
        match self {
            Self::Tiny => 8.0,
            Self::Small => 12.0,
            Self::Normal | Self::Auto => 16.0,
            Self::Large => 24.0,
            Self::Huge => 32.0,
        }
    }
}

/// Plot-level style options. Per-point overrides win over these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    pub style: PlotStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<f32>,
    /// Shift every point of this plot by a whole number of bars.
    #[serde(default)]
    pub offset: i64,
    /// Overrides the indicator-level pane placement for this plot alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ShapeLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<MarkerSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textcolor: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wickcolor: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bordercolor: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Upper bound reference of a `fill` plot (sibling plot name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_a: Option<String>,
    /// Lower bound reference of a `fill` plot (sibling plot name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_b: Option<String>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            style: PlotStyle::Line,
            color: None,
            linewidth: None,
            offset: 0,
            overlay: None,
            shape: None,
            location: None,
            size: None,
            text: None,
            textcolor: None,
            wickcolor: None,
            bordercolor: None,
            width: None,
            height: None,
            plot_a: None,
            plot_b: None,
        }
    }
}

impl PlotOptions {
    pub fn styled(style: PlotStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(Color::new(color));
        self
    }
}
