use super::*;

#[test]
fn anchors_hit_pure_colors() {
    assert_eq!(ramp_rgb(0.0), [0, 0, 255]);
    assert_eq!(ramp_rgb(0.25), [0, 255, 255]);
    assert_eq!(ramp_rgb(0.5), [0, 255, 0]);
    assert_eq!(ramp_rgb(0.75), [255, 255, 0]);
    assert_eq!(ramp_rgb(1.0), [255, 0, 0]);
}

#[test]
fn segments_interpolate_linearly() {
    assert_eq!(ramp_rgb(0.125), [0, 128, 255]);
    assert_eq!(ramp_rgb(0.375), [0, 255, 128]);
    assert_eq!(ramp_rgb(0.625), [128, 255, 0]);
    assert_eq!(ramp_rgb(0.875), [255, 128, 0]);
}

#[test]
fn out_of_range_density_clamps() {
    assert_eq!(ramp_rgb(-1.0), ramp_rgb(0.0));
    assert_eq!(ramp_rgb(7.0), ramp_rgb(1.0));
    assert_eq!(ramp_rgb(f32::NAN), ramp_rgb(0.0));
}

#[test]
fn haze_is_transparent_and_dense_regions_cap() {
    let s = HeatmapSettings::default();
    assert_eq!(alpha_for(0.0, &s), 0);
    assert_eq!(alpha_for(0.049, &s), 0);
    assert!(alpha_for(0.05, &s) > 0);
    let cap = (s.max_alpha * 255.0).round() as u8;
    assert_eq!(alpha_for(1.0, &s), cap);
    assert_eq!(alpha_for(0.9, &s), cap);
    assert!(alpha_for(0.3, &s) < cap);
}

#[test]
fn alpha_is_monotonic() {
    let s = HeatmapSettings::default();
    let mut prev = 0u8;
    for i in 0..=1000 {
        let a = alpha_for(i as f32 / 1000.0, &s);
        assert!(a >= prev);
        prev = a;
    }
}

#[test]
fn transparent_pixels_carry_no_color() {
    let s = HeatmapSettings::default();
    assert_eq!(colorize_density(0.01, &s), [0, 0, 0, 0]);
    let px = colorize_density(1.0, &s);
    assert_eq!(&px[..3], &[255, 0, 0]);
}
