use candlepane::backend::{HeadlessBackend, PointerEvent, PointerKind};
use candlepane::coordinate::CoordinateBridge;
use candlepane::data_types::{DrawingKind, PixelPoint, PixelRect};
use candlepane::plugin::{FibonacciTool, LineTool, Plugin, ToolCommand, ToolContext};
use candlepane::transform::PaneTransform;

fn backend() -> HeadlessBackend {
    HeadlessBackend::new(600.0).with_panes(vec![PaneTransform::new(
        PixelRect::new(0.0, 0.0, 1000.0, 400.0),
        (0.0, 100.0),
        (0.0, 100.0),
    )])
}

fn click(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(PointerKind::Click, PixelPoint::new(x, y))
}

fn moved(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(PointerKind::Move, PixelPoint::new(x, y))
}

#[test]
fn two_clicks_create_a_line_drawing() {
    let backend = backend();
    let ctx = ToolContext {
        bridge: CoordinateBridge::new(&backend),
    };
    let mut tool = LineTool::new();

    let first = tool.on_pointer(&click(100.0, 80.0), &ctx);
    assert!(matches!(first.as_slice(), [ToolCommand::ShowPreview(_)]));

    let during = tool.on_pointer(&moved(300.0, 200.0), &ctx);
    assert!(matches!(during.as_slice(), [ToolCommand::ShowPreview(_)]));

    let second = tool.on_pointer(&click(400.0, 320.0), &ctx);
    let added = second.iter().find_map(|c| match c {
        ToolCommand::AddDrawing(d) => Some(d.clone()),
        _ => None,
    });
    let drawing = added.expect("second click adds the drawing");
    assert_eq!(drawing.kind, DrawingKind::Line);
    assert_eq!(drawing.points[0].bar, 10);
    assert_eq!(drawing.points[1].bar, 40);
    assert!(second.contains(&ToolCommand::ClearPreview));
    assert!(second.contains(&ToolCommand::Finish));
}

#[test]
fn motion_before_the_first_click_does_nothing() {
    let backend = backend();
    let ctx = ToolContext {
        bridge: CoordinateBridge::new(&backend),
    };
    let mut tool = LineTool::new();
    assert!(tool.on_pointer(&moved(10.0, 10.0), &ctx).is_empty());
}

#[test]
fn gesture_outside_panes_is_abandoned_without_a_drawing() {
    let backend = backend();
    let ctx = ToolContext {
        bridge: CoordinateBridge::new(&backend),
    };
    let mut tool = LineTool::new();
    tool.on_pointer(&click(100.0, 80.0), &ctx);
    // Second click below the pane: conversion fails, gesture still ends.
    let commands = tool.on_pointer(&click(100.0, 500.0), &ctx);
    assert!(commands
        .iter()
        .all(|c| !matches!(c, ToolCommand::AddDrawing(_))));
    assert!(commands.contains(&ToolCommand::Finish));
}

#[test]
fn deactivate_clears_a_half_finished_gesture() {
    let backend = backend();
    let ctx = ToolContext {
        bridge: CoordinateBridge::new(&backend),
    };
    let mut tool = LineTool::new();
    tool.on_pointer(&click(100.0, 80.0), &ctx);
    tool.deactivate();
    // Next click starts a fresh gesture instead of finishing the old one.
    let commands = tool.on_pointer(&click(200.0, 100.0), &ctx);
    assert!(matches!(commands.as_slice(), [ToolCommand::ShowPreview(_)]));
}

#[test]
fn fibonacci_tool_emits_fibonacci_elements_with_distinct_ids() {
    let backend = backend();
    let ctx = ToolContext {
        bridge: CoordinateBridge::new(&backend),
    };
    let mut tool = FibonacciTool::new();

    let mut ids = Vec::new();
    for _ in 0..2 {
        tool.on_pointer(&click(100.0, 80.0), &ctx);
        let commands = tool.on_pointer(&click(400.0, 320.0), &ctx);
        let drawing = commands
            .iter()
            .find_map(|c| match c {
                ToolCommand::AddDrawing(d) => Some(d.clone()),
                _ => None,
            })
            .expect("fib created");
        assert_eq!(drawing.kind, DrawingKind::Fibonacci);
        ids.push(drawing.id);
    }
    assert_ne!(ids[0], ids[1]);
}
