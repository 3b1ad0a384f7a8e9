//! Rendering backend boundary. The engine hands the backend a declarative
//! scene and receives pointer events and per-pane transforms back; nothing
//! here draws.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::data_types::{
    Color, DrawingElement, DrawingKind, DrawingStyle, PixelPoint, ShapeKind,
};
use crate::layout::{GridRect, PaneSlot, XAxisSlot, YAxisSlot, ZoomSlot};
use crate::transform::PaneTransform;

/// Last-close reference line on the candle series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    pub value: f64,
    pub color: Color,
    pub dashed: bool,
}

/// One OHLC glyph of a `bar`/`candle` styled plot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OhlcItem {
    pub slot: usize,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub color: Color,
    pub wick_color: Color,
    pub border_color: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MarkerSymbol {
    Circle,
    /// Plus-sign glyph of the `cross` style.
    CrossGlyph,
    Shape(ShapeKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Above,
    Below,
    Inside,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerLabel {
    pub text: String,
    pub color: Color,
    pub position: LabelPosition,
}

/// One scatter/shape marker, placed at (slot, value) with an optional
/// vertical offset in percent of the marker's own size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerPoint {
    pub slot: usize,
    pub value: f64,
    pub color: Color,
    pub symbol: MarkerSymbol,
    pub size: [f32; 2],
    pub offset_y_pct: f32,
    pub label: Option<MarkerLabel>,
}

/// Renderable payload of one series. Dense vectors are indexed by padded
/// slot; `None` breaks continuity where the style honors it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SeriesKind {
    Candles {
        /// `[open, high, low, close]` per slot.
        values: Vec<Option<[f64; 4]>>,
        up_color: Color,
        down_color: Color,
        /// Per-slot recolor written by `barcolor` plots.
        overrides: Vec<Option<Color>>,
        last_price: Option<PriceLine>,
    },
    Line {
        values: Vec<Option<f64>>,
        colors: Vec<Option<Color>>,
        width: f32,
    },
    Step {
        values: Vec<Option<f64>>,
        colors: Vec<Option<Color>>,
        width: f32,
    },
    Histogram {
        values: Vec<Option<f64>>,
        colors: Vec<Option<Color>>,
        base_color: Color,
    },
    Markers {
        points: Vec<MarkerPoint>,
    },
    OhlcGlyphs {
        items: Vec<OhlcItem>,
        /// true = candle body + wicks, false = open/close ticks.
        draw_body: bool,
    },
    Background {
        colors: Vec<Option<Color>>,
        opacity: f32,
    },
    FillBetween {
        upper: Vec<Option<f64>>,
        lower: Vec<Option<f64>>,
        color: Color,
        opacity: f32,
    },
    /// Data-only series, drawn with zero size (tooltip/inspection use).
    Hidden {
        values: Vec<Option<f64>>,
    },
    /// Annotation layer of one pane.
    Drawings {
        elements: Vec<DrawingElement>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub x_axis: usize,
    pub y_axis: usize,
    pub z: i32,
    pub silent: bool,
    pub kind: SeriesKind,
}

/// Whole-scene configuration, replaced wholesale on every render pass.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SceneSpec {
    pub grids: Vec<GridRect>,
    pub x_axes: Vec<XAxisSlot>,
    pub y_axes: Vec<YAxisSlot>,
    pub zoom: Vec<ZoomSlot>,
    pub series: Vec<SeriesSpec>,
    pub category_labels: Vec<String>,
    pub pane_layout: Vec<PaneSlot>,
}

/// Fast-path update: series data only, layout and axes untouched.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SeriesPatch {
    pub series: Vec<SeriesSpec>,
}

/// Transient pixel-space ghost shown while a drawing edit is in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct EditOverlay {
    pub kind: DrawingKind,
    pub anchors: [PixelPoint; 2],
    pub style: DrawingStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Click,
    Hover,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawingPart {
    Body,
    Anchor(usize),
}

/// What the backend's hit test identified under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerTarget {
    Drawing { id: String, part: DrawingPart },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: PixelPoint,
    pub target: Option<PointerTarget>,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: PixelPoint) -> Self {
        Self {
            kind,
            position,
            target: None,
        }
    }

    pub fn on_drawing(mut self, id: impl Into<String>, part: DrawingPart) -> Self {
        self.target = Some(PointerTarget::Drawing {
            id: id.into(),
            part,
        });
        self
    }
}

/// The 2D scene renderer, as seen from this engine.
pub trait RenderBackend {
    /// Replace the whole scene configuration.
    fn apply_scene(&mut self, scene: SceneSpec);

    /// Patch series data without touching layout/axes (high-frequency path).
    fn patch_series(&mut self, patch: SeriesPatch);

    fn container_height(&self) -> f32;

    fn pane_count(&self) -> usize;

    /// Live transform of one pane; `None` before the first layout or for an
    /// unknown pane.
    fn pane_transform(&self, pane: usize) -> Option<PaneTransform>;

    /// Suspend/resume the default zoom + tooltip interactions.
    fn set_interaction_enabled(&mut self, enabled: bool);

    /// Show or tear down the transient edit ghost.
    fn set_edit_overlay(&mut self, overlay: Option<EditOverlay>);
}

#[derive(Debug, Default)]
struct HeadlessState {
    scene: Option<SceneSpec>,
    patches: Vec<SeriesPatch>,
    interaction_enabled: bool,
    overlay: Option<EditOverlay>,
}

/// Shared observation handle onto a [`HeadlessBackend`].
#[derive(Clone)]
pub struct HeadlessHandle {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessHandle {
    pub fn scene(&self) -> Option<SceneSpec> {
        self.state.lock().scene.clone()
    }

    pub fn patches(&self) -> Vec<SeriesPatch> {
        self.state.lock().patches.clone()
    }

    pub fn interaction_enabled(&self) -> bool {
        self.state.lock().interaction_enabled
    }

    pub fn overlay(&self) -> Option<EditOverlay> {
        self.state.lock().overlay.clone()
    }
}

/// Backend with no drawing surface: records scenes and hands out transforms
/// configured by the host. Serves as the crate's headless test surface.
pub struct HeadlessBackend {
    height: f32,
    transforms: Vec<PaneTransform>,
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessBackend {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            transforms: Vec::new(),
            state: Arc::new(Mutex::new(HeadlessState {
                interaction_enabled: true,
                ..Default::default()
            })),
        }
    }

    pub fn with_panes(mut self, transforms: Vec<PaneTransform>) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn set_panes(&mut self, transforms: Vec<PaneTransform>) {
        self.transforms = transforms;
    }

    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            state: self.state.clone(),
        }
    }
}

impl RenderBackend for HeadlessBackend {
    fn apply_scene(&mut self, scene: SceneSpec) {
        self.state.lock().scene = Some(scene);
    }

    fn patch_series(&mut self, patch: SeriesPatch) {
        self.state.lock().patches.push(patch);
    }

    fn container_height(&self) -> f32 {
        self.height
    }

    fn pane_count(&self) -> usize {
        self.transforms.len()
    }

    fn pane_transform(&self, pane: usize) -> Option<PaneTransform> {
        self.transforms.get(pane).copied()
    }

    fn set_interaction_enabled(&mut self, enabled: bool) {
        self.state.lock().interaction_enabled = enabled;
    }

    fn set_edit_overlay(&mut self, overlay: Option<EditOverlay>) {
        self.state.lock().overlay = overlay;
    }
}
