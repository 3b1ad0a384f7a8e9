use std::cell::RefCell;
use std::rc::Rc;

use candlepane::backend::{
    DrawingPart, HeadlessBackend, PointerEvent, PointerKind, SeriesKind,
};
use candlepane::controller::{ChartController, IndicatorSettings, ToggleAction, MAIN_PANE_ID};
use candlepane::data_types::{
    Bar, ChartOptions, DataCoordinate, DrawingElement, IndicatorPoint, PixelPoint, PixelRect,
    Plot, PlotOptions, PlotStyle,
};
use candlepane::events::{ChartEvent, EventKind};
use candlepane::plugin::LineTool;
use candlepane::transform::PaneTransform;

const T0: i64 = 1_700_000_000_000;
const STEP: i64 = 60_000;

fn bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| Bar {
            time: T0 + i as i64 * STEP,
            open: 10.0,
            high: 12.0,
            low: 9.0,
            close: 11.0,
            volume: 100.0,
        })
        .collect()
}

fn t(i: usize) -> f64 {
    (T0 + i as i64 * STEP) as f64
}

fn chart() -> (
    ChartController<HeadlessBackend>,
    candlepane::backend::HeadlessHandle,
) {
    let backend = HeadlessBackend::new(800.0);
    let handle = backend.handle();
    let chart = ChartController::new(backend, ChartOptions::default());
    (chart, handle)
}

fn rsi_plot(values: &[f64]) -> Plot {
    let data = values
        .iter()
        .enumerate()
        .map(|(i, v)| IndicatorPoint::scalar(t(i), *v))
        .collect();
    Plot::new("rsi", data, PlotOptions::styled(PlotStyle::Line))
}

#[test]
fn render_produces_one_grid_per_pane() {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(10));
    chart
        .add_indicator("rsi", vec![rsi_plot(&[30.0, 70.0])], IndicatorSettings::default())
        .unwrap();

    let scene = handle.scene().expect("scene applied");
    assert_eq!(scene.grids.len(), 2);
    assert_eq!(scene.pane_layout.len(), 1);
    assert_eq!(scene.category_labels.len(), 10);
    // Market candles plus the indicator line.
    assert!(matches!(scene.series[0].kind, SeriesKind::Candles { .. }));
    assert!(scene.series.iter().any(|s| s.name == "rsi::rsi"));
}

#[test]
fn empty_market_data_renders_nothing() {
    let (mut chart, handle) = chart();
    chart
        .add_indicator("rsi", vec![rsi_plot(&[1.0])], IndicatorSettings::default())
        .unwrap();
    assert!(handle.scene().is_none());
}

#[test]
fn update_data_merge_is_idempotent_and_later_write_wins() {
    let (mut chart, _handle) = chart();
    chart.set_market_data(bars(5));

    let mut replacement = bars(5)[2];
    replacement.close = 99.0;
    chart.update_data(vec![replacement]);
    chart.update_data(vec![replacement]);

    assert_eq!(chart.market_data().len(), 5);
    assert_eq!(chart.market_data()[2].close, 99.0);
    let times: Vec<i64> = chart.market_data().iter().map(|b| b.time).collect();
    let mut sorted = times.clone();
    sorted.sort_unstable();
    assert_eq!(times, sorted);
}

#[test]
fn indicator_point_merge_is_idempotent() {
    let (mut chart, _handle) = chart();
    chart.set_market_data(bars(5));
    chart
        .add_indicator("rsi", vec![rsi_plot(&[30.0, 40.0])], IndicatorSettings::default())
        .unwrap();

    let update = vec![Plot::new(
        "rsi",
        vec![
            IndicatorPoint::scalar(t(1), 55.0),
            IndicatorPoint::scalar(t(2), 60.0),
        ],
        PlotOptions::styled(PlotStyle::Line),
    )];
    chart.update_indicator_data("rsi", update.clone()).unwrap();
    let once = chart.indicators()[0].plots[0].data.clone();
    chart.update_indicator_data("rsi", update).unwrap();
    let twice = chart.indicators()[0].plots[0].data.clone();

    assert_eq!(once, twice);
    assert_eq!(once.len(), 3);
    assert_eq!(once[1].value.unwrap().as_scalar(), Some(55.0));
}

#[test]
fn pane_allocation_counts_up_and_overlay_stays_on_main() {
    let (mut chart, _handle) = chart();
    chart.set_market_data(bars(5));
    chart
        .add_indicator(
            "ma",
            vec![rsi_plot(&[10.0, 11.0])],
            IndicatorSettings {
                overlay: true,
                ..Default::default()
            },
        )
        .unwrap();
    chart
        .add_indicator("rsi", vec![rsi_plot(&[30.0])], IndicatorSettings::default())
        .unwrap();
    chart
        .add_indicator("macd", vec![rsi_plot(&[1.0])], IndicatorSettings::default())
        .unwrap();

    let panes: Vec<usize> = chart.indicators().iter().map(|i| i.pane_index).collect();
    assert_eq!(panes, vec![0, 1, 2]);
}

#[test]
fn duplicate_indicator_id_is_rejected() {
    let (mut chart, _handle) = chart();
    chart.set_market_data(bars(3));
    chart
        .add_indicator("rsi", vec![rsi_plot(&[1.0])], IndicatorSettings::default())
        .unwrap();
    assert!(chart
        .add_indicator("rsi", vec![rsi_plot(&[2.0])], IndicatorSettings::default())
        .is_err());
    assert!(chart.update_indicator_data("nope", vec![]).is_err());
}

#[test]
fn removing_an_indicator_leaves_no_orphan_pane() {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(5));
    chart
        .add_indicator("rsi", vec![rsi_plot(&[30.0])], IndicatorSettings::default())
        .unwrap();
    chart
        .add_indicator("macd", vec![rsi_plot(&[1.0])], IndicatorSettings::default())
        .unwrap();
    chart.remove_indicator("rsi");

    let scene = handle.scene().unwrap();
    // Pane layout indices exactly match the surviving indicator panes.
    let layout_indices: Vec<usize> = scene.pane_layout.iter().map(|p| p.index).collect();
    assert_eq!(layout_indices, vec![2]);
    assert_eq!(scene.grids.len(), 2);
}

#[test]
fn collapse_toggle_emits_event_and_shrinks_the_pane() {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(5));
    chart
        .add_indicator("rsi", vec![rsi_plot(&[30.0])], IndicatorSettings::default())
        .unwrap();

    let toggles: Rc<RefCell<Vec<(String, bool)>>> = Rc::default();
    let sink = toggles.clone();
    chart.events_mut().on(EventKind::PaneToggled, move |event| {
        if let ChartEvent::PaneToggled { id, collapsed } = event {
            sink.borrow_mut().push((id.clone(), *collapsed));
        }
    });

    chart.toggle("rsi", ToggleAction::Collapse);
    assert_eq!(toggles.borrow().as_slice(), &[("rsi".to_string(), true)]);
    let scene = handle.scene().unwrap();
    assert_eq!(scene.pane_layout[0].height_pct, 3.0);
    // Collapsed indicators stop emitting series.
    assert!(scene.series.iter().all(|s| s.name != "rsi::rsi"));

    chart.toggle("rsi", ToggleAction::Collapse);
    assert_eq!(toggles.borrow().len(), 2);
    assert!(!toggles.borrow()[1].1);
}

#[test]
fn maximize_toggles_on_and_off() {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(5));
    chart
        .add_indicator("rsi", vec![rsi_plot(&[30.0])], IndicatorSettings::default())
        .unwrap();

    chart.toggle("rsi", ToggleAction::Maximize);
    let scene = handle.scene().unwrap();
    assert!(scene.grids[0].hidden);
    assert!(!scene.grids[1].hidden);

    chart.toggle("rsi", ToggleAction::Maximize);
    let scene = handle.scene().unwrap();
    assert!(!scene.grids[0].hidden);

    chart.toggle(MAIN_PANE_ID, ToggleAction::Maximize);
    let scene = handle.scene().unwrap();
    assert!(scene.grids[1].hidden);
}

#[test]
fn drawing_crud_round_trip() {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(5));

    let start = DataCoordinate {
        bar: 1,
        value: 10.0,
        pane: 0,
    };
    let end = DataCoordinate {
        bar: 3,
        value: 11.0,
        pane: 0,
    };
    chart.add_drawing(DrawingElement::line("l1", start, end));
    assert!(chart.get_drawing("l1").is_some());

    let scene = handle.scene().unwrap();
    assert!(scene.series.iter().any(|s| s.name == "drawings-pane-0"));

    let deleted: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = deleted.clone();
    chart
        .events_mut()
        .on(EventKind::DrawingDeleted, move |event| {
            if let ChartEvent::Drawing { id, .. } = event {
                sink.borrow_mut().push(id.clone());
            }
        });
    chart.remove_drawing("l1");
    assert!(chart.get_drawing("l1").is_none());
    assert_eq!(deleted.borrow().as_slice(), &["l1".to_string()]);
}

#[test]
fn update_for_unknown_drawing_is_a_no_op() {
    let (mut chart, _handle) = chart();
    chart.set_market_data(bars(3));
    let ghost = DrawingElement::line(
        "ghost",
        DataCoordinate {
            bar: 0,
            value: 1.0,
            pane: 0,
        },
        DataCoordinate {
            bar: 1,
            value: 2.0,
            pane: 0,
        },
    );
    chart.update_drawing(ghost);
    assert!(chart.drawings().is_empty());
}

fn editable_chart() -> (
    ChartController<HeadlessBackend>,
    candlepane::backend::HeadlessHandle,
) {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(5));
    chart.backend_mut().set_panes(vec![PaneTransform::new(
        PixelRect::new(0.0, 0.0, 1000.0, 400.0),
        (0.0, 100.0),
        (0.0, 100.0),
    )]);
    chart.add_drawing(DrawingElement::line(
        "l1",
        DataCoordinate {
            bar: 10,
            value: 80.0,
            pane: 0,
        },
        DataCoordinate {
            bar: 40,
            value: 20.0,
            pane: 0,
        },
    ));
    (chart, handle)
}

#[test]
fn aborted_edit_leaves_element_unchanged_and_chart_unlocked() {
    let (mut chart, handle) = editable_chart();
    let before = chart.get_drawing("l1").unwrap().clone();

    chart.handle_pointer(
        PointerEvent::new(PointerKind::Down, PixelPoint::new(400.0, 320.0))
            .on_drawing("l1", DrawingPart::Anchor(1)),
    );
    assert!(chart.is_locked());
    assert!(chart.is_editing());
    assert!(!handle.interaction_enabled());
    assert!(handle.overlay().is_some());

    chart.handle_pointer(PointerEvent::new(
        PointerKind::Move,
        PixelPoint::new(600.0, 200.0),
    ));
    // Release outside every pane: the edit is discarded.
    chart.handle_pointer(PointerEvent::new(
        PointerKind::Up,
        PixelPoint::new(600.0, 900.0),
    ));

    assert_eq!(chart.get_drawing("l1").unwrap(), &before);
    assert!(!chart.is_locked());
    assert!(!chart.is_editing());
    assert!(handle.interaction_enabled());
    assert!(handle.overlay().is_none());
}

#[test]
fn committed_edit_moves_the_anchor() {
    let (mut chart, handle) = editable_chart();
    chart.handle_pointer(
        PointerEvent::new(PointerKind::Down, PixelPoint::new(400.0, 320.0))
            .on_drawing("l1", DrawingPart::Anchor(1)),
    );
    chart.handle_pointer(PointerEvent::new(
        PointerKind::Up,
        PixelPoint::new(600.0, 200.0),
    ));

    let updated = chart.get_drawing("l1").unwrap();
    assert_eq!(updated.points[1].bar, 60);
    assert!((updated.points[1].value - 50.0).abs() < 1.0);
    assert!(!chart.is_locked());
    assert!(handle.overlay().is_none());
}

#[test]
fn fast_update_patches_data_without_replacing_the_scene() {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(5));
    let scene_before = handle.scene().unwrap();

    let mut last = bars(5)[4];
    last.close = 55.0;
    chart.fast_update(last);

    // Scene untouched, one data patch recorded.
    assert_eq!(handle.scene().unwrap(), scene_before);
    let patches = handle.patches();
    assert_eq!(patches.len(), 1);
    let SeriesKind::Candles { values, .. } = &patches[0].series[0].kind else {
        panic!("patch must carry the market series");
    };
    assert_eq!(values[4].unwrap()[3], 55.0);
}

#[test]
fn fast_update_appends_a_new_bar() {
    let (mut chart, _handle) = chart();
    chart.set_market_data(bars(5));
    let mut next = bars(6)[5];
    next.close = 42.0;
    chart.fast_update(next);
    assert_eq!(chart.market_data().len(), 6);
    assert_eq!(chart.time_index().len(), 6);
}

#[test]
fn line_tool_creates_a_drawing_through_the_controller() {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(5));
    chart.backend_mut().set_panes(vec![PaneTransform::new(
        PixelRect::new(0.0, 0.0, 1000.0, 400.0),
        (0.0, 100.0),
        (0.0, 100.0),
    )]);
    chart.register_plugin(Box::new(LineTool::new())).unwrap();
    chart.activate_plugin("trend-line").unwrap();
    assert_eq!(chart.active_plugin(), Some("trend-line"));

    chart.handle_pointer(PointerEvent::new(
        PointerKind::Click,
        PixelPoint::new(100.0, 80.0),
    ));
    assert!(handle.overlay().is_some());
    chart.handle_pointer(PointerEvent::new(
        PointerKind::Click,
        PixelPoint::new(400.0, 320.0),
    ));

    assert_eq!(chart.drawings().len(), 1);
    assert_eq!(chart.drawings()[0].points[0].bar, 10);
    // The gesture finished: tool deactivated, preview gone.
    assert_eq!(chart.active_plugin(), None);
    assert!(handle.overlay().is_none());
}

#[test]
fn overlay_incompatible_plot_gets_a_hidden_axis_in_the_scene() {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(5));
    chart
        .add_indicator(
            "sig",
            vec![rsi_plot(&[50.0, 50.0])],
            IndicatorSettings {
                overlay: true,
                ..Default::default()
            },
        )
        .unwrap();

    let scene = handle.scene().unwrap();
    // Main axis + one hidden overlay axis.
    assert_eq!(scene.y_axes.len(), 2);
    assert!(scene.y_axes[0].visible);
    assert!(!scene.y_axes[1].visible);
    let series = scene.series.iter().find(|s| s.name == "sig::rsi").unwrap();
    assert_eq!(series.y_axis, 1);
}

#[test]
fn separate_pane_series_bind_past_the_hidden_axes() {
    let (mut chart, handle) = chart();
    chart.set_market_data(bars(5));
    chart
        .add_indicator(
            "sig",
            vec![rsi_plot(&[500.0, 600.0])],
            IndicatorSettings {
                overlay: true,
                ..Default::default()
            },
        )
        .unwrap();
    chart
        .add_indicator("rsi", vec![rsi_plot(&[30.0, 70.0])], IndicatorSettings::default())
        .unwrap();

    let scene = handle.scene().unwrap();
    // y axes: main, hidden overlay, pane.
    assert_eq!(scene.y_axes.len(), 3);
    let pane_series = scene.series.iter().find(|s| s.name == "rsi::rsi").unwrap();
    assert_eq!(pane_series.x_axis, 1);
    assert_eq!(pane_series.y_axis, 2);
}
