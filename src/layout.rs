//! Vertical pane layout: container height + pane set + display options ->
//! percentage-based grid/axis/zoom geometry.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data_types::{ChartOptions, Color, ZoomPosition};

/// Height of a collapsed pane, percent of the container.
pub const COLLAPSED_PANE_PCT: f32 = 3.0;
/// Below this the main pane is considered crowded and the floor engages.
const MAIN_SOFT_MIN_PCT: f32 = 20.0;
/// Hard floor for the main pane height. Crowded layouts may overlap; the
/// clamp is the documented behavior, not a fix.
const MAIN_FLOOR_PCT: f32 = 10.0;
/// Horizontal margin reserved on both sides for axis labels.
const SIDE_MARGIN_PCT: f32 = 10.0;

/// One requested indicator pane, before layout.
#[derive(Clone, Debug, PartialEq)]
pub struct PaneRequest {
    pub index: usize,
    pub height_pct: Option<f32>,
    pub collapsed: bool,
    pub indicator_id: Option<String>,
    pub title_color: Option<Color>,
}

/// Maximize state: one pane (or the main pane) takes the whole chart area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaximizeTarget {
    Main,
    Pane(String),
}

/// A pane's resolved strip, percent units from the container top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaneSlot {
    pub index: usize,
    pub top_pct: f32,
    pub height_pct: f32,
    pub collapsed: bool,
    /// Zero-area placeholder emitted while another pane is maximized, kept
    /// so grid/axis indices stay aligned with the series array.
    pub hidden: bool,
    pub indicator_id: Option<String>,
    pub title_color: Option<Color>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridRect {
    pub left_pct: f32,
    pub right_pct: f32,
    pub top_pct: f32,
    pub height_pct: f32,
    pub hidden: bool,
}

impl GridRect {
    fn strip(top_pct: f32, height_pct: f32) -> Self {
        Self {
            left_pct: SIDE_MARGIN_PCT,
            right_pct: SIDE_MARGIN_PCT,
            top_pct,
            height_pct,
            hidden: false,
        }
    }

    fn placeholder() -> Self {
        Self {
            left_pct: SIDE_MARGIN_PCT,
            right_pct: SIDE_MARGIN_PCT,
            top_pct: 0.0,
            height_pct: 0.0,
            hidden: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct XAxisSlot {
    pub grid: usize,
    pub show_labels: bool,
    pub show_axis_line: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct YAxisSlot {
    pub grid: usize,
    /// Invisible axes carry incompatible overlay plots without distorting
    /// the price scale.
    pub visible: bool,
    pub show_labels: bool,
    pub show_split_lines: bool,
}

impl YAxisSlot {
    pub fn hidden_overlay() -> Self {
        Self {
            grid: 0,
            visible: false,
            show_labels: false,
            show_split_lines: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomKind {
    Inside,
    Slider,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomSlot {
    pub kind: ZoomKind,
    pub position: ZoomPosition,
    pub height_pct: f32,
    pub start: f32,
    pub end: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    pub grids: Vec<GridRect>,
    pub x_axes: Vec<XAxisSlot>,
    pub y_axes: Vec<YAxisSlot>,
    pub zoom: Vec<ZoomSlot>,
    pub pane_layout: Vec<PaneSlot>,
    pub main_top_pct: f32,
    pub main_height_pct: f32,
    /// Factor converting one pixel to container percent. Zero when the
    /// container is not yet measurable; callers must skip pixel conversions.
    pub pixel_to_percent: f32,
}

pub struct LayoutEngine;

impl LayoutEngine {
    pub fn calculate(
        container_height_px: f32,
        panes: &[PaneRequest],
        options: &ChartOptions,
        main_collapsed: bool,
        maximize: Option<&MaximizeTarget>,
    ) -> LayoutResult {
        let dz = &options.data_zoom;

        // Reserve the zoom strip, then size the chart area.
        let (main_top, chart_bottom) = if dz.visible {
            match dz.position {
                ZoomPosition::Top => (dz.height_pct + 4.0, 95.0),
                ZoomPosition::Bottom => (8.0, 100.0 - dz.height_pct - 2.0),
            }
        } else {
            (5.0, 95.0)
        };
        let usable = chart_bottom - main_top;

        let (gap_pct, pixel_to_percent) = if container_height_px > 0.0 {
            (
                options.layout.gap_px / container_height_px * 100.0,
                100.0 / container_height_px,
            )
        } else {
            (5.0, 0.0)
        };

        // Maximize short-circuits the stacking math entirely. Hidden panes
        // keep placeholder slots so grid/axis indices stay aligned with the
        // series array; re-indexing after suppressing panes would be far
        // more error-prone than a few zero-area entries.
        let maximize = maximize.filter(|target| match target {
            MaximizeTarget::Main => true,
            MaximizeTarget::Pane(id) => panes
                .iter()
                .any(|p| p.indicator_id.as_deref() == Some(id.as_str())),
        });
        if let Some(target) = maximize {
            return Self::maximized(target, panes, main_top, usable, pixel_to_percent, dz);
        }

        // Stacked arrangement: resolve each pane's effective height.
        let resolved: Vec<f32> = panes
            .iter()
            .map(|p| {
                if p.collapsed {
                    COLLAPSED_PANE_PCT
                } else {
                    p.height_pct
                        .unwrap_or(options.layout.default_pane_height_pct)
                }
            })
            .collect();

        let total_pane_space: f32 = resolved.iter().map(|h| h + gap_pct).sum();
        let mut main_height = if main_collapsed {
            COLLAPSED_PANE_PCT
        } else if panes.is_empty() {
            usable
        } else {
            usable - total_pane_space
        };
        if !main_collapsed && main_height < MAIN_SOFT_MIN_PCT {
            debug!(main_height, "main pane under-constrained, clamping");
            main_height = main_height.max(MAIN_FLOOR_PCT);
        }

        // Positions accumulate top to bottom.
        let mut pane_layout = Vec::with_capacity(panes.len());
        let mut current_top = main_top + main_height + gap_pct;
        for (request, height) in panes.iter().zip(&resolved) {
            pane_layout.push(PaneSlot {
                index: request.index,
                top_pct: current_top,
                height_pct: *height,
                collapsed: request.collapsed,
                hidden: false,
                indicator_id: request.indicator_id.clone(),
                title_color: request.title_color.clone(),
            });
            current_top += height + gap_pct;
        }

        let grids = std::iter::once(GridRect::strip(main_top, main_height))
            .chain(
                pane_layout
                    .iter()
                    .map(|p| GridRect::strip(p.top_pct, p.height_pct)),
            )
            .collect();

        LayoutResult {
            grids,
            x_axes: Self::x_axes(&pane_layout),
            y_axes: Self::y_axes(&pane_layout),
            zoom: Self::zoom_slots(dz),
            pane_layout,
            main_top_pct: main_top,
            main_height_pct: main_height,
            pixel_to_percent,
        }
    }

    fn maximized(
        target: &MaximizeTarget,
        panes: &[PaneRequest],
        main_top: f32,
        usable: f32,
        pixel_to_percent: f32,
        dz: &crate::data_types::DataZoomOptions,
    ) -> LayoutResult {
        let main_is_target = matches!(target, MaximizeTarget::Main);

        let pane_layout: Vec<PaneSlot> = panes
            .iter()
            .map(|p| {
                let selected = matches!(target, MaximizeTarget::Pane(id)
                    if p.indicator_id.as_deref() == Some(id.as_str()));
                PaneSlot {
                    index: p.index,
                    top_pct: if selected { main_top } else { 0.0 },
                    height_pct: if selected { usable } else { 0.0 },
                    collapsed: p.collapsed,
                    hidden: !selected,
                    indicator_id: p.indicator_id.clone(),
                    title_color: p.title_color.clone(),
                }
            })
            .collect();

        let main_grid = if main_is_target {
            GridRect::strip(main_top, usable)
        } else {
            GridRect::placeholder()
        };
        let grids = std::iter::once(main_grid)
            .chain(pane_layout.iter().map(|p| {
                if p.hidden {
                    GridRect::placeholder()
                } else {
                    GridRect::strip(p.top_pct, p.height_pct)
                }
            }))
            .collect();

        LayoutResult {
            grids,
            x_axes: Self::x_axes(&pane_layout),
            y_axes: Self::y_axes(&pane_layout),
            zoom: Self::zoom_slots(dz),
            main_top_pct: main_top,
            main_height_pct: if main_is_target { usable } else { 0.0 },
            pane_layout,
            pixel_to_percent,
        }
    }

    fn x_axes(pane_layout: &[PaneSlot]) -> Vec<XAxisSlot> {
        // Date labels only on the main axis; indicator panes share the
        // category data silently.
        std::iter::once(XAxisSlot {
            grid: 0,
            show_labels: true,
            show_axis_line: true,
        })
        .chain(pane_layout.iter().enumerate().map(|(i, p)| XAxisSlot {
            grid: i + 1,
            show_labels: false,
            show_axis_line: !p.collapsed && !p.hidden,
        }))
        .collect()
    }

    fn y_axes(pane_layout: &[PaneSlot]) -> Vec<YAxisSlot> {
        std::iter::once(YAxisSlot {
            grid: 0,
            visible: true,
            show_labels: true,
            show_split_lines: true,
        })
        .chain(pane_layout.iter().enumerate().map(|(i, p)| YAxisSlot {
            grid: i + 1,
            visible: !p.hidden,
            show_labels: !p.collapsed && !p.hidden,
            show_split_lines: !p.collapsed && !p.hidden,
        }))
        .collect()
    }

    fn zoom_slots(dz: &crate::data_types::DataZoomOptions) -> Vec<ZoomSlot> {
        if !dz.visible {
            return Vec::new();
        }
        vec![
            ZoomSlot {
                kind: ZoomKind::Inside,
                position: dz.position,
                height_pct: 0.0,
                start: 50.0,
                end: 100.0,
            },
            ZoomSlot {
                kind: ZoomKind::Slider,
                position: dz.position,
                height_pct: dz.height_pct,
                start: 50.0,
                end: 100.0,
            },
        ]
    }
}
