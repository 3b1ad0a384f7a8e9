//! Typed event bus exposed to tool/plugin collaborators.

use std::collections::HashMap;

use crate::data_types::PixelPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    MouseClick,
    ChartUpdated,
    ZoomChanged,
    PaneToggled,
    DrawingHover,
    DrawingMouseOut,
    DrawingMouseDown,
    DrawingClick,
    DrawingPointHover,
    DrawingPointMouseOut,
    DrawingPointMouseDown,
    DrawingPointClick,
    DrawingSelected,
    DrawingDeselected,
    DrawingDeleted,
    PluginActivated,
    PluginDeactivated,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    Pointer {
        kind: EventKind,
        position: PixelPoint,
    },
    ChartUpdated,
    Zoom {
        start: f32,
        end: f32,
    },
    PaneToggled {
        id: String,
        collapsed: bool,
    },
    Drawing {
        kind: EventKind,
        id: String,
        point: Option<usize>,
    },
    Plugin {
        kind: EventKind,
        id: String,
    },
}

impl ChartEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Pointer { kind, .. } => *kind,
            Self::ChartUpdated => EventKind::ChartUpdated,
            Self::Zoom { .. } => EventKind::ZoomChanged,
            Self::PaneToggled { .. } => EventKind::PaneToggled,
            Self::Drawing { kind, .. } => *kind,
            Self::Plugin { kind, .. } => *kind,
        }
    }
}

/// Token identifying one registered handler, for later removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerId {
    kind: EventKind,
    id: u64,
}

type Handler = Box<dyn FnMut(&ChartEvent)>;

/// Plain synchronous dispatch: handlers run on the caller's stack in
/// registration order.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<(u64, Handler)>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&ChartEvent) + 'static) -> HandlerId {
        self.next_id += 1;
        let id = self.next_id;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        HandlerId { kind, id }
    }

    pub fn off(&mut self, handler: HandlerId) {
        if let Some(handlers) = self.handlers.get_mut(&handler.kind) {
            handlers.retain(|(id, _)| *id != handler.id);
        }
    }

    pub fn emit(&mut self, event: &ChartEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for (_, handler) in handlers.iter_mut() {
                handler(event);
            }
        }
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

/// Subscription bookkeeping for plugins: collect the tokens as listeners
/// are registered, drop them all on deactivate/destroy. Composition
/// replaces the protected-helper base class this pattern usually grows.
#[derive(Default)]
pub struct Subscriptions {
    tokens: Vec<HandlerId>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, token: HandlerId) {
        self.tokens.push(token);
    }

    pub fn clear(&mut self, bus: &mut EventBus) {
        for token in self.tokens.drain(..) {
            bus.off(token);
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
