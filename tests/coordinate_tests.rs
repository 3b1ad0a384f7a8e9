use candlepane::backend::HeadlessBackend;
use candlepane::coordinate::CoordinateBridge;
use candlepane::data_types::{DataCoordinate, PixelPoint, PixelRect};
use candlepane::transform::PaneTransform;

fn two_pane_backend() -> HeadlessBackend {
    // Main pane 0..400px vertically, indicator pane 420..600px.
    HeadlessBackend::new(600.0).with_panes(vec![
        PaneTransform::new(
            PixelRect::new(60.0, 0.0, 800.0, 400.0),
            (0.0, 100.0),
            (9.0, 12.0),
        ),
        PaneTransform::new(
            PixelRect::new(60.0, 420.0, 800.0, 180.0),
            (0.0, 100.0),
            (-50.0, 50.0),
        ),
    ])
}

#[test]
fn round_trip_stays_within_one_pixel() {
    let backend = two_pane_backend();
    let bridge = CoordinateBridge::new(&backend);

    for &(x, y) in &[(61.0, 10.0), (400.0, 200.0), (859.0, 399.0)] {
        let p = PixelPoint::new(x, y);
        let data = bridge.pixel_to_data(p).expect("inside main pane");
        let back = bridge.data_to_pixel(&data).expect("same pane");
        // Bar index rounding moves X by at most half a slot; Y must come
        // back almost exactly. One slot is 8px here.
        assert!((back.y - p.y).abs() <= 1.0, "y {} -> {}", p.y, back.y);
        assert!((back.x - p.x).abs() <= 4.0 + 1.0, "x {} -> {}", p.x, back.x);
    }
}

#[test]
fn exact_slot_coordinates_round_trip_exactly() {
    let backend = two_pane_backend();
    let bridge = CoordinateBridge::new(&backend);

    let coord = DataCoordinate {
        bar: 25,
        value: 10.5,
        pane: 0,
    };
    let pixel = bridge.data_to_pixel(&coord).unwrap();
    let data = bridge.pixel_to_data(pixel).unwrap();
    assert_eq!(data.bar, 25);
    assert!((data.value - 10.5).abs() < 1e-6);
    assert_eq!(data.pane, 0);
}

#[test]
fn pane_is_resolved_by_hit_test() {
    let backend = two_pane_backend();
    let bridge = CoordinateBridge::new(&backend);

    let in_main = bridge.pixel_to_data(PixelPoint::new(100.0, 100.0)).unwrap();
    assert_eq!(in_main.pane, 0);

    let in_sub = bridge.pixel_to_data(PixelPoint::new(100.0, 500.0)).unwrap();
    assert_eq!(in_sub.pane, 1);
    // Sub-pane Y domain is [-50, 50]; bottom half maps below zero.
    assert!(in_sub.value > 0.0);
}

#[test]
fn outside_every_pane_returns_the_sentinel() {
    let backend = two_pane_backend();
    let bridge = CoordinateBridge::new(&backend);

    // In the gap between panes.
    assert!(bridge.pixel_to_data(PixelPoint::new(100.0, 410.0)).is_none());
    // Left of the plot area.
    assert!(bridge.pixel_to_data(PixelPoint::new(10.0, 100.0)).is_none());
}

#[test]
fn unknown_pane_returns_the_sentinel() {
    let backend = two_pane_backend();
    let bridge = CoordinateBridge::new(&backend);
    let coord = DataCoordinate {
        bar: 0,
        value: 0.0,
        pane: 7,
    };
    assert!(bridge.data_to_pixel(&coord).is_none());
}

#[test]
fn before_first_layout_everything_is_unresolvable() {
    let backend = HeadlessBackend::new(600.0);
    let bridge = CoordinateBridge::new(&backend);
    assert!(bridge.pixel_to_data(PixelPoint::new(10.0, 10.0)).is_none());
    assert!(bridge
        .data_to_pixel(&DataCoordinate {
            bar: 0,
            value: 0.0,
            pane: 0
        })
        .is_none());
}
