use super::*;
use crate::{foundation::core::PixelSize, model::annotation::Severity};

const EPS: f64 = 1e-9;

fn strict() -> MapperSettings {
    MapperSettings {
        on_mismatch: MismatchPolicy::Strict,
    }
}

fn degrade() -> MapperSettings {
    MapperSettings {
        on_mismatch: MismatchPolicy::Degrade,
    }
}

fn layout(sizes: &[(u32, u32)]) -> CompositeLayout {
    let sizes: Vec<_> = sizes.iter().map(|&(w, h)| PixelSize::new(w, h)).collect();
    CompositeLayout::from_sizes(&sizes)
}

fn point(id: u32, x: f64, y: f64) -> AnnotationPoint {
    AnnotationPoint {
        id,
        x,
        y,
        category: "layout".to_string(),
        severity: Severity::Minor,
        tag: "t".to_string(),
        title: String::new(),
        current: String::new(),
        suggested: String::new(),
        impact: String::new(),
    }
}

#[test]
fn equal_heights_center_rows_map_to_slide_middles() {
    for n in 1..=6usize {
        let h = 240u32;
        let l = layout(&vec![(100, h); n]);
        for k in 0..n {
            let row = k as f64 * f64::from(h) + f64::from(h) / 2.0;
            let y = row / (n as f64 * f64::from(h)) * 100.0;
            let p = map_point(50.0, y, n, Some(&l), &strict()).unwrap();
            assert_eq!(p.slide_index, k, "n={n} k={k}");
            assert!((p.y - 50.0).abs() < 1e-6, "n={n} k={k} y={}", p.y);
        }
    }
}

#[test]
fn bottom_edge_always_maps_to_last_slide() {
    for sizes in [
        vec![(10, 50), (10, 100)],
        vec![(10, 3), (10, 7), (10, 1)],
        vec![(640, 1136); 9],
    ] {
        let n = sizes.len();
        let l = layout(&sizes);
        let p = map_point(50.0, 100.0, n, Some(&l), &strict()).unwrap();
        assert_eq!(p.slide_index, n - 1);
        assert!(p.y <= 100.0);
    }
}

#[test]
fn single_slide_is_identity() {
    for (x, y) in [(0.0, 0.0), (12.5, 87.25), (100.0, 100.0), (33.3, 0.01)] {
        let p = map_point(x, y, 1, None, &strict()).unwrap();
        assert_eq!((p.slide_index, p.x, p.y), (0, x, y));

        let l = layout(&[(300, 900)]);
        let p = map_point(x, y, 1, Some(&l), &strict()).unwrap();
        assert_eq!((p.slide_index, p.x, p.y), (0, x, y));
    }
}

#[test]
fn two_slide_end_to_end_example() {
    let l = layout(&[(100, 50), (100, 100)]);
    assert_eq!(l.total_height(), 150);
    let p = map_point(50.0, 40.0, 2, Some(&l), &strict()).unwrap();
    assert_eq!(p.slide_index, 1);
    assert!((p.y - 10.0).abs() < EPS);
    assert!((p.x - 50.0).abs() < EPS);
}

#[test]
fn exact_seam_belongs_to_lower_slide() {
    let l = layout(&[(10, 50), (10, 50)]);
    let p = map_point(50.0, 50.0, 2, Some(&l), &strict()).unwrap();
    assert_eq!(p.slide_index, 1);
    assert!(p.y.abs() < EPS);
}

#[test]
fn horizontal_correction_undoes_centering() {
    let l = layout(&[(100, 50), (200, 80), (150, 60)]);
    let y = 160.0 / 190.0 * 100.0;
    let p = map_point(50.0, y, 3, Some(&l), &strict()).unwrap();
    assert_eq!(p.slide_index, 2);
    assert!((p.x - 50.0).abs() < EPS);
    assert!((p.y - 50.0).abs() < 1e-6);

    // Left edge of the narrow first slide sits at canvas x=50.
    let p = map_point(25.0, 10.0, 3, Some(&l), &strict()).unwrap();
    assert_eq!(p.slide_index, 0);
    assert!(p.x.abs() < EPS);
}

#[test]
fn margin_points_pin_to_slide_edge() {
    let l = layout(&[(100, 50), (200, 80)]);
    let p = map_point(10.0, 5.0, 2, Some(&l), &strict()).unwrap();
    assert_eq!(p.slide_index, 0);
    assert_eq!(p.x, 0.0);

    let p = map_point(95.0, 5.0, 2, Some(&l), &strict()).unwrap();
    assert_eq!(p.x, 100.0);
}

#[test]
fn legacy_layout_skips_horizontal_correction() {
    let l = CompositeLayout {
        heights: vec![50, 50],
        widths: None,
        canvas_width: None,
    };
    let p = map_point(17.0, 75.0, 2, Some(&l), &strict()).unwrap();
    assert_eq!(p.slide_index, 1);
    assert_eq!(p.x, 17.0);
    assert!((p.y - 50.0).abs() < EPS);
}

#[test]
fn out_of_range_inputs_are_clamped() {
    let l = layout(&[(100, 50), (100, 50)]);
    let p = map_point(-4.0, 130.0, 2, Some(&l), &strict()).unwrap();
    assert_eq!(p.slide_index, 1);
    assert_eq!(p.x, 0.0);

    let p = map_point(f64::NAN, -1.0, 2, Some(&l), &strict()).unwrap();
    assert_eq!(p.slide_index, 0);
    assert_eq!((p.x, p.y), (0.0, 0.0));
}

#[test]
fn mismatched_layout_strict_errors() {
    let l = layout(&[(100, 50), (100, 50)]);
    let err = map_point(50.0, 50.0, 3, Some(&l), &strict()).unwrap_err();
    assert!(matches!(err, FlowlensError::Layout(_)));

    let err = map_point(50.0, 50.0, 2, None, &strict()).unwrap_err();
    assert!(matches!(err, FlowlensError::Layout(_)));
}

#[test]
fn mismatched_layout_degrades_to_slide_zero() {
    let l = layout(&[(100, 50), (200, 50)]);
    let p = map_point(10.0, 90.0, 3, Some(&l), &degrade()).unwrap();
    assert_eq!((p.slide_index, p.x, p.y), (0, 10.0, 90.0));

    let p = map_point(10.0, 90.0, 2, None, &degrade()).unwrap();
    assert_eq!(p.slide_index, 0);
}

#[test]
fn to_composite_inverts_map_point() {
    let l = layout(&[(100, 50), (200, 80), (150, 60)]);
    for (slide, x, y) in [(0, 10.0, 20.0), (1, 50.0, 99.0), (2, 75.0, 33.0)] {
        let (cx, cy) = to_composite(slide, x, y, &l).unwrap();
        let p = map_point(cx, cy, 3, Some(&l), &strict()).unwrap();
        assert_eq!(p.slide_index, slide);
        assert!((p.x - x).abs() < 1e-6);
        assert!((p.y - y).abs() < 1e-6);
    }
    assert!(to_composite(3, 0.0, 0.0, &l).is_err());
}

#[test]
fn map_annotations_keeps_one_result_per_point_in_order() {
    let l = layout(&[(100, 50), (100, 100)]);
    let points = vec![point(3, 50.0, 90.0), point(1, 20.0, 10.0), point(2, 50.0, 40.0)];
    let mapped = map_annotations(&points, 2, Some(&l), &strict()).unwrap();
    assert_eq!(mapped.len(), 3);
    let ids: Vec<_> = mapped.iter().map(|a| a.point.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(mapped[1].slide_index, 0);
    assert!((mapped[1].slide_y - 30.0).abs() < EPS);

    let on_second: Vec<_> = annotations_for_slide(&mapped, 1).map(|a| a.point.id).collect();
    assert_eq!(on_second, vec![3, 2]);
}

#[test]
fn zero_annotations_is_empty_not_error() {
    let mapped = map_annotations(&[], 4, None, &degrade()).unwrap();
    assert!(mapped.is_empty());
}

#[test]
fn empty_slide_list_rejects_points() {
    for policy in [strict(), degrade()] {
        assert!(map_point(30.0, 40.0, 0, None, &policy).is_err());
        let empty = CompositeLayout::from_sizes(&[]);
        assert!(map_point(30.0, 40.0, 0, Some(&empty), &policy).is_err());
    }
    let err = map_annotations(&[point(1, 30.0, 40.0)], 0, None, &degrade()).unwrap_err();
    assert!(matches!(err, FlowlensError::Validation(_)));
}

#[test]
fn empty_slide_list_without_points_maps_to_nothing() {
    let mapped = map_annotations(&[], 0, None, &strict()).unwrap();
    assert!(mapped.is_empty());
}
