use super::*;

fn three_slides() -> CompositeLayout {
    CompositeLayout::from_sizes(&[
        PixelSize::new(100, 50),
        PixelSize::new(200, 80),
        PixelSize::new(150, 60),
    ])
}

#[test]
fn from_sizes_preserves_order() {
    let l = three_slides();
    assert_eq!(l.heights, vec![50, 80, 60]);
    assert_eq!(l.widths.as_deref(), Some(&[100, 200, 150][..]));
    assert_eq!(l.canvas_width, Some(200));
    assert_eq!(l.total_height(), 190);
    assert_eq!(l.y_offsets(), vec![0, 50, 130]);
}

#[test]
fn x_offsets_center_narrow_slides() {
    let l = three_slides();
    let xs: Vec<_> = (0..3).map(|i| l.x_offset(i).unwrap()).collect();
    assert_eq!(xs, vec![50, 0, 25]);
    assert_eq!(l.x_offset(3), None);
}

#[test]
fn canvas_width_falls_back_to_widest() {
    let l = CompositeLayout {
        heights: vec![1, 1],
        widths: Some(vec![30, 90]),
        canvas_width: None,
    };
    assert_eq!(l.canvas_width(), Some(90));
    assert_eq!(l.x_offset(0), Some(30));
}

#[test]
fn legacy_layout_has_no_horizontal_geometry() {
    let l = CompositeLayout {
        heights: vec![10, 10],
        widths: None,
        canvas_width: None,
    };
    assert!(l.horizontal().is_none());
    l.validate_for(2).unwrap();
}

#[test]
fn validate_reports_length_mismatch() {
    let l = three_slides();
    l.validate_for(3).unwrap();
    assert!(matches!(l.validate_for(2), Err(FlowlensError::Layout(_))));

    let mut bad = three_slides();
    bad.widths = Some(vec![100, 200]);
    assert!(bad.validate_for(3).is_err());

    let mut zero = three_slides();
    zero.heights[1] = 0;
    assert!(zero.validate_for(3).is_err());

    let mut narrow = three_slides();
    narrow.canvas_width = Some(120);
    assert!(narrow.validate_for(3).is_err());
}

#[test]
fn serializes_camel_case() {
    let v = serde_json::to_value(three_slides()).unwrap();
    assert_eq!(v["canvasWidth"], 200);
    assert_eq!(v["heights"][2], 60);
}
