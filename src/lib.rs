//! candlepane: multi-pane financial chart composition and interaction
//! engine. Renders nothing itself — it computes layout, synthesizes series
//! descriptions, and drives annotations against a pluggable rendering
//! backend.

pub mod axis_compat;
pub mod backend;
pub mod controller;
pub mod coordinate;
pub mod data_types;
pub mod drawing_editor;
pub mod events;
pub mod layout;
pub mod plugin;
pub mod synth;
pub mod time_index;
pub mod transform;
pub mod utils;

pub use backend::{HeadlessBackend, RenderBackend, SceneSpec, SeriesKind, SeriesSpec};
pub use controller::{ChartController, IndicatorSettings, ToggleAction, MAIN_PANE_ID};
pub use data_types::{
    Bar, ChartOptions, Color, DataCoordinate, DrawingElement, Indicator, IndicatorPoint,
    PixelPoint, Plot, PlotOptions, PlotStyle, PlotValue,
};
pub use layout::{LayoutEngine, LayoutResult, MaximizeTarget};
pub use time_index::TimeIndex;
