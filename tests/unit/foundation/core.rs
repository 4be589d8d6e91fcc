use super::*;

#[test]
fn pixel_size_empty_and_len() {
    assert!(PixelSize::new(0, 10).is_empty());
    assert!(PixelSize::new(10, 0).is_empty());
    assert!(!PixelSize::new(1, 1).is_empty());
    assert_eq!(PixelSize::new(3, 2).rgba8_len().unwrap(), 24);
}

#[test]
fn premul_from_straight_scales_channels() {
    let px = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(px.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::from_straight_rgba(9, 9, 9, 0).to_array(), [0, 0, 0, 0]);
}

#[test]
fn clamp_pct_pins_overshoot_and_nan() {
    assert_eq!(clamp_pct(-3.0), 0.0);
    assert_eq!(clamp_pct(104.2), 100.0);
    assert_eq!(clamp_pct(42.5), 42.5);
    assert_eq!(clamp_pct(f64::NAN), 0.0);
    assert_eq!(clamp_pct(f64::INFINITY), 0.0);
}
