//! Tool plugins: two-click creation of drawing elements.
//!
//! A plugin is a capability interface, not a base class: each tool
//! implements [`Plugin`] directly, owns its own state, and answers pointer
//! events with commands the controller executes. Event-bus bookkeeping, when
//! a tool needs it, is an explicit [`Subscriptions`] field.
//!
//! [`Subscriptions`]: crate::events::Subscriptions

use crate::backend::{EditOverlay, PointerEvent, PointerKind};
use crate::coordinate::CoordinateBridge;
use crate::data_types::{DataCoordinate, DrawingElement, DrawingKind, DrawingStyle, PixelPoint};

/// What a tool asks the controller to do after a pointer event.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolCommand {
    AddDrawing(DrawingElement),
    /// Show/refresh the pixel-space creation preview.
    ShowPreview(EditOverlay),
    ClearPreview,
    /// The tool finished its gesture; deactivate it.
    Finish,
}

pub struct ToolContext<'a> {
    pub bridge: CoordinateBridge<'a>,
}

pub trait Plugin {
    fn id(&self) -> &str;

    fn name(&self) -> &str {
        self.id()
    }

    fn activate(&mut self) {}

    /// Deactivation must drop any in-progress gesture.
    fn deactivate(&mut self) {}

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &ToolContext) -> Vec<ToolCommand>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ToolState {
    Idle,
    Drawing { start: PixelPoint },
}

/// Shared two-click gesture: first click anchors, motion previews, second
/// click converts both anchors to data coordinates and emits the element.
/// A click landing outside every pane abandons the gesture.
struct TwoClickTool {
    state: ToolState,
    next_id: u64,
}

impl TwoClickTool {
    fn new() -> Self {
        Self {
            state: ToolState::Idle,
            next_id: 0,
        }
    }

    fn reset(&mut self) {
        self.state = ToolState::Idle;
    }

    fn on_pointer(
        &mut self,
        event: &PointerEvent,
        ctx: &ToolContext,
        build: impl FnOnce(String, DataCoordinate, DataCoordinate) -> DrawingElement,
        id_prefix: &str,
        preview_kind: DrawingKind,
    ) -> Vec<ToolCommand> {
        match (event.kind, self.state) {
            (PointerKind::Click, ToolState::Idle) => {
                self.state = ToolState::Drawing {
                    start: event.position,
                };
                vec![ToolCommand::ShowPreview(Self::preview(
                    preview_kind,
                    event.position,
                    event.position,
                ))]
            }
            (PointerKind::Move, ToolState::Drawing { start }) => {
                vec![ToolCommand::ShowPreview(Self::preview(
                    preview_kind,
                    start,
                    event.position,
                ))]
            }
            (PointerKind::Click, ToolState::Drawing { start }) => {
                self.state = ToolState::Idle;
                let mut commands = vec![ToolCommand::ClearPreview];
                let converted = (
                    ctx.bridge.pixel_to_data(start),
                    ctx.bridge.pixel_to_data(event.position),
                );
                if let (Some(p1), Some(p2)) = converted {
                    self.next_id += 1;
                    commands.push(ToolCommand::AddDrawing(build(
                        format!("{id_prefix}-{}", self.next_id),
                        p1,
                        p2,
                    )));
                }
                commands.push(ToolCommand::Finish);
                commands
            }
            _ => Vec::new(),
        }
    }

    fn preview(
        kind: DrawingKind,
        start: PixelPoint,
        end: PixelPoint,
    ) -> EditOverlay {
        EditOverlay {
            kind,
            anchors: [start, end],
            style: DrawingStyle::default(),
        }
    }
}

/// Trend-line creation tool.
pub struct LineTool {
    gesture: TwoClickTool,
}

impl LineTool {
    pub fn new() -> Self {
        Self {
            gesture: TwoClickTool::new(),
        }
    }
}

impl Default for LineTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for LineTool {
    fn id(&self) -> &str {
        "trend-line"
    }

    fn name(&self) -> &str {
        "Trend Line"
    }

    fn deactivate(&mut self) {
        self.gesture.reset();
    }

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &ToolContext) -> Vec<ToolCommand> {
        self.gesture.on_pointer(
            event,
            ctx,
            DrawingElement::line,
            "line",
            DrawingKind::Line,
        )
    }
}

/// Fibonacci retracement creation tool.
pub struct FibonacciTool {
    gesture: TwoClickTool,
}

impl FibonacciTool {
    pub fn new() -> Self {
        Self {
            gesture: TwoClickTool::new(),
        }
    }
}

impl Default for FibonacciTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for FibonacciTool {
    fn id(&self) -> &str {
        "fibonacci"
    }

    fn name(&self) -> &str {
        "Fib Retracement"
    }

    fn deactivate(&mut self) {
        self.gesture.reset();
    }

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &ToolContext) -> Vec<ToolCommand> {
        self.gesture.on_pointer(
            event,
            ctx,
            DrawingElement::fibonacci,
            "fib",
            DrawingKind::Fibonacci,
        )
    }
}
