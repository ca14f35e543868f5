mod common;

use fibertrace::geo::{EARTH_RADIUS_M, cable_length, haversine_distance, polyline_length};
use fibertrace::model::{Cable, LatLng};

#[test]
fn one_degree_of_longitude_at_the_equator() {
    let d = haversine_distance(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
    let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
    assert!((d - expected).abs() < 1e-6, "got {}", d);
    // Roughly the textbook 111.3 km per degree.
    assert!((d - 111_320.0).abs() < 200.0, "got {}", d);
}

#[test]
fn distance_is_symmetric_and_zero_for_same_point() {
    let a = LatLng::new(-23.5505, -46.6333);
    let b = LatLng::new(-22.9068, -43.1729);
    common::assert_close(haversine_distance(a, b), haversine_distance(b, a));
    assert_eq!(haversine_distance(a, a), 0.0);
    // Sao Paulo to Rio de Janeiro, about 360 km.
    let d = haversine_distance(a, b);
    assert!(d > 350_000.0 && d < 370_000.0, "got {}", d);
}

#[test]
fn cable_length_is_sum_of_segments() {
    let pts = vec![
        LatLng::new(-23.0, -46.0),
        LatLng::new(-23.001, -46.002),
        LatLng::new(-23.003, -46.002),
        LatLng::new(-23.004, -46.0),
    ];
    let expected: f64 = pts
        .windows(2)
        .map(|w| haversine_distance(w[0], w[1]))
        .sum();
    let cable = Cable {
        id: "c1".into(),
        coordinates: pts.clone(),
        ..Default::default()
    };
    common::assert_close(cable_length(&cable), expected);
    common::assert_close(polyline_length(&pts), expected);
}

#[test]
fn degenerate_polylines_have_zero_length() {
    assert_eq!(polyline_length(&[]), 0.0);
    assert_eq!(polyline_length(&[LatLng::new(10.0, 10.0)]), 0.0);
    let cable = Cable {
        id: "c1".into(),
        ..Default::default()
    };
    assert_eq!(cable_length(&cable), 0.0);
}

#[test]
fn fixture_cable_has_requested_length() {
    let c = common::cable("c1", "a", "b", 1000.0, None);
    assert!((cable_length(&c) - 1000.0).abs() < 1e-6);
}
