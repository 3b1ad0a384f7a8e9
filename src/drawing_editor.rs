//! In-place modification of existing drawing elements: a small state
//! machine driven by pointer events, committing through the coordinate
//! bridge on release.

use crate::backend::EditOverlay;
use crate::coordinate::CoordinateBridge;
use crate::data_types::{DrawingElement, PixelPoint};

enum EditState {
    Idle,
    /// Dragging one control point.
    Point {
        original: DrawingElement,
        point: usize,
        anchors_px: [PixelPoint; 2],
    },
    /// Dragging the whole element by its body.
    Shape {
        original: DrawingElement,
        drag_start: PixelPoint,
        anchors_px: [PixelPoint; 2],
    },
}

/// What a finished edit produced. The controller applies the side effects;
/// the editor itself never touches the drawing list or the backend.
#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome {
    /// Commit this updated element (pane reassignment already applied).
    Committed(DrawingElement),
    /// Conversion failed or the edit was cancelled; element stays as it was.
    Discarded,
    /// No edit was in flight.
    Inactive,
}

/// At most one edit is in flight at a time; a second pointer-down while
/// editing is refused. Every exit path (commit, discard, cancel) returns
/// the machine to idle so interaction can be restored — a leaked editing
/// state would leave the chart locked.
#[derive(Default)]
pub struct DrawingEditor {
    state: EditState,
}

impl Default for EditState {
    fn default() -> Self {
        Self::Idle
    }
}

impl DrawingEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        !matches!(self.state, EditState::Idle)
    }

    /// Pointer-down on a control point. Returns the initial overlay, or
    /// `None` when refused (already editing, or anchors not resolvable yet).
    pub fn begin_point_edit(
        &mut self,
        element: &DrawingElement,
        point: usize,
        bridge: &CoordinateBridge,
    ) -> Option<EditOverlay> {
        if self.is_editing() || point > 1 {
            return None;
        }
        let anchors_px = Self::anchors_px(element, bridge)?;
        self.state = EditState::Point {
            original: element.clone(),
            point,
            anchors_px,
        };
        Some(Self::overlay(element, anchors_px))
    }

    /// Pointer-down on the element body: whole-shape move.
    pub fn begin_shape_move(
        &mut self,
        element: &DrawingElement,
        position: PixelPoint,
        bridge: &CoordinateBridge,
    ) -> Option<EditOverlay> {
        if self.is_editing() {
            return None;
        }
        let anchors_px = Self::anchors_px(element, bridge)?;
        self.state = EditState::Shape {
            original: element.clone(),
            drag_start: position,
            anchors_px,
        };
        Some(Self::overlay(element, anchors_px))
    }

    /// Pointer motion while editing: mirrors the pointer in pixel space
    /// without mutating the authoritative element.
    pub fn pointer_move(&self, position: PixelPoint) -> Option<EditOverlay> {
        match &self.state {
            EditState::Idle => None,
            EditState::Point {
                original,
                point,
                anchors_px,
            } => {
                let mut anchors = *anchors_px;
                anchors[*point] = position;
                Some(Self::overlay(original, anchors))
            }
            EditState::Shape {
                original,
                drag_start,
                anchors_px,
            } => {
                let dx = position.x - drag_start.x;
                let dy = position.y - drag_start.y;
                let anchors = [
                    PixelPoint::new(anchors_px[0].x + dx, anchors_px[0].y + dy),
                    PixelPoint::new(anchors_px[1].x + dx, anchors_px[1].y + dy),
                ];
                Some(Self::overlay(original, anchors))
            }
        }
    }

    /// Pointer release: converts the final pixel geometry back to data
    /// coordinates and commits, or discards when any conversion fails
    /// (pointer outside every pane). Always returns to idle.
    pub fn pointer_up(&mut self, position: PixelPoint, bridge: &CoordinateBridge) -> EditOutcome {
        match std::mem::take(&mut self.state) {
            EditState::Idle => EditOutcome::Inactive,
            EditState::Point {
                original, point, ..
            } => match bridge.pixel_to_data(position) {
                Some(coord) => {
                    let mut updated = original;
                    updated.points[point] = coord;
                    // The first anchor owns the element's pane assignment.
                    if point == 0 {
                        updated.pane = coord.pane;
                    }
                    EditOutcome::Committed(updated)
                }
                None => EditOutcome::Discarded,
            },
            EditState::Shape {
                original,
                drag_start,
                anchors_px,
            } => {
                let dx = position.x - drag_start.x;
                let dy = position.y - drag_start.y;
                let moved = [
                    bridge.pixel_to_data(PixelPoint::new(
                        anchors_px[0].x + dx,
                        anchors_px[0].y + dy,
                    )),
                    bridge.pixel_to_data(PixelPoint::new(
                        anchors_px[1].x + dx,
                        anchors_px[1].y + dy,
                    )),
                ];
                match moved {
                    [Some(start), Some(end)] => {
                        let mut updated = original;
                        updated.points = [start, end];
                        updated.pane = start.pane;
                        EditOutcome::Committed(updated)
                    }
                    _ => EditOutcome::Discarded,
                }
            }
        }
    }

    /// Programmatic abort. Returns true when an edit was actually dropped,
    /// so the caller knows to restore interaction state.
    pub fn cancel(&mut self) -> bool {
        let was_editing = self.is_editing();
        self.state = EditState::Idle;
        was_editing
    }

    fn anchors_px(element: &DrawingElement, bridge: &CoordinateBridge) -> Option<[PixelPoint; 2]> {
        Some([
            bridge.data_to_pixel(&element.points[0])?,
            bridge.data_to_pixel(&element.points[1])?,
        ])
    }

    fn overlay(element: &DrawingElement, anchors: [PixelPoint; 2]) -> EditOverlay {
        EditOverlay {
            kind: element.kind,
            anchors,
            style: element.style.clone(),
        }
    }
}
