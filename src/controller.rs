//! Chart orchestration: owns market data, indicators, drawings and option
//! state; every mutation ends in a recompute-and-render against the
//! backend.

use std::collections::BTreeMap;

use eyre::{bail, Result};
use tracing::{debug, warn};

use crate::axis_compat::{self, AxisAssignments};
use crate::backend::{
    DrawingPart, PointerEvent, PointerKind, PointerTarget, RenderBackend, SceneSpec, SeriesKind,
    SeriesPatch, SeriesSpec,
};
use crate::coordinate::CoordinateBridge;
use crate::data_types::{
    Bar, ChartOptions, Color, DataCoordinate, DrawingElement, Indicator, IndicatorControls,
    PixelPoint, Plot,
};
use crate::drawing_editor::{DrawingEditor, EditOutcome};
use crate::events::{ChartEvent, EventBus, EventKind};
use crate::layout::{LayoutEngine, LayoutResult, MaximizeTarget, PaneRequest};
use crate::plugin::{Plugin, ToolCommand, ToolContext};
use crate::synth::{SeriesSynthesizer, StyleRegistry};
use crate::time_index::TimeIndex;
use crate::utils::category_labels;

/// Creation-time settings of one indicator.
#[derive(Clone, Debug, Default)]
pub struct IndicatorSettings {
    /// true = draw into the main pane, false = allocate a dedicated pane.
    pub overlay: bool,
    pub height_pct: Option<f32>,
    pub title_color: Option<Color>,
    pub controls: Option<IndicatorControls>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleAction {
    Collapse,
    Maximize,
}

/// Identifier accepted by [`ChartController::toggle`] for the main pane.
pub const MAIN_PANE_ID: &str = "main";

pub struct ChartController<B: RenderBackend> {
    backend: B,
    options: ChartOptions,
    bars: Vec<Bar>,
    indicators: Vec<Indicator>,
    drawings: Vec<DrawingElement>,
    time_index: TimeIndex,
    registry: StyleRegistry,
    editor: DrawingEditor,
    events: EventBus,
    plugins: Vec<Box<dyn Plugin>>,
    active_plugin: Option<usize>,
    main_collapsed: bool,
    maximized: Option<MaximizeTarget>,
    locked: bool,
}

impl<B: RenderBackend> ChartController<B> {
    pub fn new(backend: B, options: ChartOptions) -> Self {
        let time_index = TimeIndex::new(options.padding);
        Self {
            backend,
            options,
            bars: Vec::new(),
            indicators: Vec::new(),
            drawings: Vec::new(),
            time_index,
            registry: StyleRegistry::default(),
            editor: DrawingEditor::new(),
            events: EventBus::new(),
            plugins: Vec::new(),
            active_plugin: None,
            main_collapsed: false,
            maximized: None,
            locked: false,
        }
    }

    // --- Read-only snapshots ---

    pub fn market_data(&self) -> &[Bar] {
        &self.bars
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn drawings(&self) -> &[DrawingElement] {
        &self.drawings
    }

    pub fn time_index(&self) -> &TimeIndex {
        &self.time_index
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn registry_mut(&mut self) -> &mut StyleRegistry {
        &mut self.registry
    }

    // --- Market data ---

    /// Replaces the market data wholesale. Input order does not matter;
    /// duplicate timestamps collapse to the later write.
    pub fn set_market_data(&mut self, bars: Vec<Bar>) {
        self.bars = dedup_sorted(bars.into_iter());
        self.time_index.rebuild(&self.bars);
        self.render();
    }

    /// Incremental merge by timestamp, later write wins.
    pub fn update_data(&mut self, bars: Vec<Bar>) {
        let existing = std::mem::take(&mut self.bars);
        self.bars = dedup_sorted(existing.into_iter().chain(bars));
        self.time_index.rebuild(&self.bars);
        self.render();
    }

    /// High-frequency path: merges one bar and patches series data only,
    /// leaving layout, axes and graphics untouched.
    pub fn fast_update(&mut self, bar: Bar) {
        match self.bars.iter_mut().find(|b| b.time == bar.time) {
            Some(existing) => *existing = bar,
            None => {
                self.bars.push(bar);
                self.bars.sort_by_key(|b| b.time);
            }
        }
        self.time_index.rebuild(&self.bars);

        let layout = self.compute_layout();
        let assignments = axis_compat::analyze(&self.indicators, &self.bars);
        let synthesis = SeriesSynthesizer::synthesize(
            &self.registry,
            &self.bars,
            &self.indicators,
            &self.time_index,
            &assignments,
            &layout.pane_layout,
            &self.options,
        );
        self.backend.patch_series(SeriesPatch {
            series: synthesis.series,
        });
    }

    // --- Indicators ---

    /// Registers an indicator. Overlay indicators land in the main pane;
    /// the others get the next free pane index.
    pub fn add_indicator(
        &mut self,
        id: impl Into<String>,
        plots: Vec<Plot>,
        settings: IndicatorSettings,
    ) -> Result<()> {
        let id = id.into();
        if self.indicators.iter().any(|i| i.id == id) {
            bail!("indicator {id:?} already registered");
        }
        let pane_index = if settings.overlay {
            0
        } else {
            self.indicators
                .iter()
                .map(|i| i.pane_index)
                .max()
                .unwrap_or(0)
                + 1
        };

        let mut indicator = Indicator::new(id, Vec::new(), pane_index);
        indicator.merge_plots(plots);
        indicator.height = settings.height_pct;
        indicator.title_color = settings.title_color;
        indicator.controls = settings.controls.unwrap_or_default();
        self.indicators.push(indicator);
        self.render();
        Ok(())
    }

    /// Point-wise merge by time into the named indicator's plots.
    pub fn update_indicator_data(&mut self, id: &str, plots: Vec<Plot>) -> Result<()> {
        let Some(indicator) = self.indicators.iter_mut().find(|i| i.id == id) else {
            bail!("unknown indicator {id:?}");
        };
        indicator.merge_plots(plots);
        self.render();
        Ok(())
    }

    pub fn remove_indicator(&mut self, id: &str) {
        self.indicators.retain(|i| i.id != id);
        // A removed pane cannot stay maximized.
        if matches!(&self.maximized, Some(MaximizeTarget::Pane(p)) if p == id) {
            self.maximized = None;
        }
        self.render();
    }

    /// Collapse or maximize one pane; `MAIN_PANE_ID` addresses the main
    /// price pane.
    pub fn toggle(&mut self, id: &str, action: ToggleAction) {
        match action {
            ToggleAction::Maximize => {
                let target = if id == MAIN_PANE_ID {
                    MaximizeTarget::Main
                } else {
                    MaximizeTarget::Pane(id.to_string())
                };
                self.maximized = if self.maximized.as_ref() == Some(&target) {
                    None
                } else {
                    Some(target)
                };
            }
            ToggleAction::Collapse => {
                let collapsed = if id == MAIN_PANE_ID {
                    self.main_collapsed = !self.main_collapsed;
                    self.main_collapsed
                } else {
                    match self.indicators.iter_mut().find(|i| i.id == id) {
                        Some(indicator) => {
                            indicator.toggle_collapse();
                            indicator.collapsed
                        }
                        None => return,
                    }
                };
                self.events.emit(&ChartEvent::PaneToggled {
                    id: id.to_string(),
                    collapsed,
                });
            }
        }
        self.render();
    }

    // --- Drawings ---

    pub fn add_drawing(&mut self, drawing: DrawingElement) {
        self.drawings.push(drawing);
        self.render();
    }

    pub fn get_drawing(&self, id: &str) -> Option<&DrawingElement> {
        self.drawings.iter().find(|d| d.id == id)
    }

    pub fn update_drawing(&mut self, drawing: DrawingElement) {
        match self.drawings.iter_mut().find(|d| d.id == drawing.id) {
            Some(existing) => {
                *existing = drawing;
                self.render();
            }
            None => warn!(id = drawing.id.as_str(), "update for unknown drawing"),
        }
    }

    pub fn remove_drawing(&mut self, id: &str) {
        let before = self.drawings.len();
        self.drawings.retain(|d| d.id != id);
        if self.drawings.len() != before {
            self.events.emit(&ChartEvent::Drawing {
                kind: EventKind::DrawingDeleted,
                id: id.to_string(),
                point: None,
            });
            self.render();
        }
    }

    // --- Interaction locking ---

    pub fn lock_chart(&mut self) {
        if self.locked {
            return;
        }
        self.locked = true;
        self.backend.set_interaction_enabled(false);
    }

    pub fn unlock_chart(&mut self) {
        if !self.locked {
            return;
        }
        self.locked = false;
        self.backend.set_interaction_enabled(true);
    }

    // --- Coordinate conversion ---

    pub fn pixel_to_data(&self, point: PixelPoint) -> Option<DataCoordinate> {
        CoordinateBridge::new(&self.backend).pixel_to_data(point)
    }

    pub fn data_to_pixel(&self, coord: &DataCoordinate) -> Option<PixelPoint> {
        CoordinateBridge::new(&self.backend).data_to_pixel(coord)
    }

    // --- Plugins ---

    pub fn register_plugin(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        if self.plugins.iter().any(|p| p.id() == plugin.id()) {
            bail!("plugin {:?} already registered", plugin.id());
        }
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn activate_plugin(&mut self, id: &str) -> Result<()> {
        let Some(index) = self.plugins.iter().position(|p| p.id() == id) else {
            bail!("unknown plugin {id:?}");
        };
        self.deactivate_plugin();
        self.plugins[index].activate();
        self.active_plugin = Some(index);
        self.events.emit(&ChartEvent::Plugin {
            kind: EventKind::PluginActivated,
            id: id.to_string(),
        });
        Ok(())
    }

    pub fn deactivate_plugin(&mut self) {
        if let Some(index) = self.active_plugin.take() {
            self.plugins[index].deactivate();
            self.backend.set_edit_overlay(None);
            let id = self.plugins[index].id().to_string();
            self.events.emit(&ChartEvent::Plugin {
                kind: EventKind::PluginDeactivated,
                id,
            });
        }
    }

    pub fn active_plugin(&self) -> Option<&str> {
        self.active_plugin.map(|i| self.plugins[i].id())
    }

    // --- Pointer routing ---

    /// Entry point for backend pointer events: drives the drawing editor
    /// first, then drawing-edit entry, then the active creation tool.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.emit_pointer_events(&event);

        if self.editor.is_editing() {
            match event.kind {
                PointerKind::Move => {
                    if let Some(overlay) = self.editor.pointer_move(event.position) {
                        self.backend.set_edit_overlay(Some(overlay));
                    }
                }
                PointerKind::Up => {
                    let outcome = {
                        let bridge = CoordinateBridge::new(&self.backend);
                        self.editor.pointer_up(event.position, &bridge)
                    };
                    // One exit path: interaction is restored whatever the
                    // outcome, then a commit re-renders.
                    self.backend.set_edit_overlay(None);
                    self.unlock_chart();
                    if let EditOutcome::Committed(element) = outcome {
                        self.update_drawing(element);
                    }
                }
                _ => {}
            }
            return;
        }

        if event.kind == PointerKind::Down {
            if let Some(PointerTarget::Drawing { id, part }) = &event.target {
                let id = id.clone();
                let part = *part;
                self.begin_drawing_edit(&id, part, event.position);
                return;
            }
        }

        if let Some(index) = self.active_plugin {
            let commands = {
                let ctx = ToolContext {
                    bridge: CoordinateBridge::new(&self.backend),
                };
                self.plugins[index].on_pointer(&event, &ctx)
            };
            for command in commands {
                match command {
                    ToolCommand::AddDrawing(drawing) => self.add_drawing(drawing),
                    ToolCommand::ShowPreview(overlay) => {
                        self.backend.set_edit_overlay(Some(overlay))
                    }
                    ToolCommand::ClearPreview => self.backend.set_edit_overlay(None),
                    ToolCommand::Finish => self.deactivate_plugin(),
                }
            }
        }
    }

    /// Abandons any in-flight edit, restoring interaction state.
    pub fn cancel_edit(&mut self) {
        if self.editor.cancel() {
            self.backend.set_edit_overlay(None);
            self.unlock_chart();
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_editing()
    }

    fn begin_drawing_edit(&mut self, id: &str, part: DrawingPart, position: PixelPoint) {
        let Some(element) = self.drawings.iter().find(|d| d.id == id).cloned() else {
            return;
        };
        let overlay = {
            let bridge = CoordinateBridge::new(&self.backend);
            match part {
                DrawingPart::Body => self.editor.begin_shape_move(&element, position, &bridge),
                DrawingPart::Anchor(point) => {
                    self.editor.begin_point_edit(&element, point, &bridge)
                }
            }
        };
        if let Some(overlay) = overlay {
            self.lock_chart();
            self.backend.set_edit_overlay(Some(overlay));
        }
    }

    fn emit_pointer_events(&mut self, event: &PointerEvent) {
        let kind = match event.kind {
            PointerKind::Down => Some(EventKind::MouseDown),
            PointerKind::Move => Some(EventKind::MouseMove),
            PointerKind::Up => Some(EventKind::MouseUp),
            PointerKind::Click => Some(EventKind::MouseClick),
            PointerKind::Hover => None,
        };
        if let Some(kind) = kind {
            self.events.emit(&ChartEvent::Pointer {
                kind,
                position: event.position,
            });
        }
        if let Some(PointerTarget::Drawing { id, part }) = &event.target {
            let (kind, point) = match (event.kind, part) {
                (PointerKind::Hover, DrawingPart::Body) => (EventKind::DrawingHover, None),
                (PointerKind::Hover, DrawingPart::Anchor(i)) => {
                    (EventKind::DrawingPointHover, Some(*i))
                }
                (PointerKind::Down, DrawingPart::Body) => (EventKind::DrawingMouseDown, None),
                (PointerKind::Down, DrawingPart::Anchor(i)) => {
                    (EventKind::DrawingPointMouseDown, Some(*i))
                }
                (PointerKind::Click, DrawingPart::Body) => (EventKind::DrawingClick, None),
                (PointerKind::Click, DrawingPart::Anchor(i)) => {
                    (EventKind::DrawingPointClick, Some(*i))
                }
                _ => return,
            };
            self.events.emit(&ChartEvent::Drawing {
                kind,
                id: id.clone(),
                point,
            });
        }
    }

    // --- Render pipeline ---

    fn pane_requests(&self) -> Vec<PaneRequest> {
        let mut indices: Vec<usize> = self
            .indicators
            .iter()
            .map(|i| i.pane_index)
            .filter(|&i| i > 0)
            .collect();
        indices.sort_unstable();
        indices.dedup();

        indices
            .into_iter()
            .map(|index| {
                // The first indicator targeting the pane configures it.
                let owner = self.indicators.iter().find(|i| i.pane_index == index);
                PaneRequest {
                    index,
                    height_pct: owner.and_then(|i| i.height),
                    collapsed: owner.map(|i| i.collapsed).unwrap_or(false),
                    indicator_id: owner.map(|i| i.id.clone()),
                    title_color: owner.and_then(|i| i.title_color.clone()),
                }
            })
            .collect()
    }

    fn compute_layout(&self) -> LayoutResult {
        LayoutEngine::calculate(
            self.backend.container_height(),
            &self.pane_requests(),
            &self.options,
            self.main_collapsed,
            self.maximized.as_ref(),
        )
    }

    fn drawing_series(&self, assignments: &AxisAssignments) -> Vec<SeriesSpec> {
        let mut by_pane: BTreeMap<usize, Vec<DrawingElement>> = BTreeMap::new();
        for drawing in &self.drawings {
            by_pane.entry(drawing.pane).or_default().push(drawing.clone());
        }
        by_pane
            .into_iter()
            .map(|(pane, elements)| SeriesSpec {
                name: format!("drawings-pane-{pane}"),
                x_axis: pane,
                y_axis: if pane == 0 {
                    0
                } else {
                    assignments.pane_axis_offset + pane - 1
                },
                z: 100,
                silent: false,
                kind: SeriesKind::Drawings { elements },
            })
            .collect()
    }

    /// Full recompute: layout, axis assignment, synthesis, wholesale scene
    /// replacement. A chart without market data renders nothing.
    pub fn render(&mut self) {
        if self.bars.is_empty() {
            return;
        }

        let layout = self.compute_layout();
        let assignments = axis_compat::analyze(&self.indicators, &self.bars);

        // Global Y-axis order: main, hidden overlay axes, pane axes.
        let mut y_axes = Vec::with_capacity(layout.y_axes.len() + assignments.hidden_axes.len());
        y_axes.push(layout.y_axes[0]);
        y_axes.extend(assignments.hidden_axes.iter().copied());
        y_axes.extend(layout.y_axes.iter().skip(1).copied());

        let synthesis = SeriesSynthesizer::synthesize(
            &self.registry,
            &self.bars,
            &self.indicators,
            &self.time_index,
            &assignments,
            &layout.pane_layout,
            &self.options,
        );

        let mut series = synthesis.series;
        series.extend(self.drawing_series(&assignments));

        debug!(
            panes = layout.pane_layout.len(),
            series = series.len(),
            hidden_axes = assignments.hidden_axes.len(),
            "render pass"
        );

        self.backend.apply_scene(SceneSpec {
            grids: layout.grids,
            x_axes: layout.x_axes,
            y_axes,
            zoom: layout.zoom,
            series,
            category_labels: category_labels(&self.bars),
            pane_layout: layout.pane_layout,
        });
        self.events.emit(&ChartEvent::ChartUpdated);
    }
}

fn dedup_sorted(bars: impl Iterator<Item = Bar>) -> Vec<Bar> {
    let mut by_time: BTreeMap<i64, Bar> = BTreeMap::new();
    for bar in bars {
        by_time.insert(bar.time, bar);
    }
    by_time.into_values().collect()
}
